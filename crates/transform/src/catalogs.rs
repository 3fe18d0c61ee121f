//! `Transform.Catalogs`: a fixed-order chain of handlers that walk a
//! `CatalogBundle` and ensure the corresponding `body -> mission ->
//! platform -> instrument -> collection` nodes exist in the mirrored STAC
//! tree, updating an already-present node only when the incoming
//! description is longer (`pdsstac_models::should_replace`).
//!
//! There is no `*Handler` class hierarchy to port from
//! `examples/original_source/pds_crawler/transformer/pds_to_stac.py` — that
//! module's `StacTransformer`/`StacRecordsTransformer` pair do not split
//! per-catalog-type responsibility the way `spec.md` §4.8 asks for. The
//! chain here is a fresh sequence of functions, one per stage named in the
//! spec's fixed order, each grounded on the `create_stac_*` factory already
//! built for its catalog type in `pdsstac_models::pds3`.
//!
//! The `projection-catalog` stage named in that order has no function here:
//! `GrammarKind::DataSetMapProjection` never produces a `ParsedCatalog` (see
//! `pdsstac_pds3::factory::parse_catalog`'s doc comment), so a `CatalogBundle`
//! can never carry one to act on.

use crate::bundle::CatalogBundle;
use crate::error::Error;
use pdsstac_core::{Catalog, Collection, Provider};
use pdsstac_models::pds3::DataSet;
use pdsstac_models::{should_replace, urn, CollectionDescriptor};
use pdsstac_storage::{layout, StacNode, StacTree};
use std::path::{Path, PathBuf};

const CATALOG_FILE: &str = "catalog.json";
const COLLECTION_FILE: &str = "collection.json";

/// One instrument-level node built (or confirmed) by [`build_catalogs`].
#[derive(Debug, Clone)]
pub struct InstrumentNode {
    /// The raw `INSTRUMENT_ID` (e.g. `"MDIS"`), not the STAC urn.
    pub instrument_id: String,
    /// The instrument catalog's on-disk directory.
    pub dir: PathBuf,
}

/// One dataset-level node built (or confirmed) by [`build_catalogs`],
/// attached under one specific instrument.
#[derive(Debug, Clone)]
pub struct DatasetNode {
    /// The raw `DATA_SET_ID`.
    pub dataset_id: String,
    /// The raw instrument id this copy of the collection is attached under.
    pub instrument_id: String,
    /// The collection's on-disk directory.
    pub dir: PathBuf,
}

/// Every node [`build_catalogs`] ensured exists, keyed for lookup by
/// `Transform.Records`.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The body-level catalog directory (e.g. `<root>/mercury`).
    pub body_dir: PathBuf,
    /// The mission-level catalog directory.
    pub mission_dir: PathBuf,
    /// The platform-level catalog directory.
    pub platform_dir: PathBuf,
    /// Every instrument-level node built under `platform_dir`.
    pub instruments: Vec<InstrumentNode>,
    /// Every dataset-level node built, one per (dataset, instrument) pair.
    pub datasets: Vec<DatasetNode>,
}

impl BuildOutcome {
    /// The directory of the dataset collection attached under
    /// `instrument_id`, if one was built.
    pub fn dataset_dir(&self, instrument_id: &str, dataset_id: &str) -> Option<&Path> {
        self.datasets
            .iter()
            .find(|node| node.instrument_id == instrument_id && node.dataset_id == dataset_id)
            .map(|node| node.dir.as_path())
    }
}

/// Runs the fixed-order handler chain for one collection, ensuring every
/// ancestor node named in `spec.md` §4.8 exists under `tree`'s root.
///
/// `desc` seeds two kinds of fallback when `bundle` is missing a catalog
/// type the registry nonetheless implies must exist: a mission or platform
/// node keyed off `desc.ihid` when no `mission.cat`/`host.cat` was
/// reachable, and an instrument/dataset node keyed off `desc.iid`/
/// `desc.dataset_id` when `bundle.instrument`/`bundle.dataset` don't
/// mention them. Every archive volume this pipeline has seen carries a
/// `voldesc.cat`, but not every volume carries the optional catalogs —
/// `Extract.Website` already tolerates that (see its `sink`-reported parse
/// failures), so `Transform.Catalogs` must too.
pub fn build_catalogs(tree: &StacTree, desc: &CollectionDescriptor, bundle: &CatalogBundle) -> Result<BuildOutcome, Error> {
    let body_dir = ensure_body(tree, desc)?;

    let mission_catalog = bundle.mission.first().map(|mission| mission.create_stac_catalog()).unwrap_or_else(|| {
        tracing::debug!(ihid = %desc.ihid, "no mission.cat reachable, synthesizing fallback mission catalog");
        fallback_mission_catalog(desc)
    });
    let (mission_dir, _) = ensure_catalog(tree, &body_dir, mission_catalog)?;

    let platform_catalog = bundle.instrument_host.first().map(|host| host.create_stac_catalog()).unwrap_or_else(|| {
        tracing::debug!(ihid = %desc.ihid, "no host.cat reachable, synthesizing fallback platform catalog");
        fallback_platform_catalog(desc)
    });
    let (platform_dir, _) = ensure_catalog(tree, &mission_dir, platform_catalog)?;

    let mut instruments = Vec::new();
    for instrument in &bundle.instrument {
        let (dir, _) = ensure_catalog(tree, &platform_dir, instrument.create_stac_catalog())?;
        instruments.push(InstrumentNode {
            instrument_id: instrument.instrument_id.clone(),
            dir,
        });
    }
    if !instruments.iter().any(|node| node.instrument_id == desc.iid) {
        let (dir, _) = ensure_catalog(tree, &platform_dir, fallback_instrument_catalog(desc))?;
        instruments.push(InstrumentNode {
            instrument_id: desc.iid.clone(),
            dir,
        });
    }

    let references = bundle.merged_references();
    let personnel_providers = bundle.personnel_providers();

    let mut datasets_to_build = bundle.dataset.clone();
    if !datasets_to_build.iter().any(|dataset| dataset.data_set_id == desc.dataset_id) {
        datasets_to_build.push(fallback_dataset(desc));
    }

    let mut datasets = Vec::new();
    for dataset in &datasets_to_build {
        let targets = instrument_targets(dataset, desc, &instruments);
        for instrument_id in targets {
            let Some(instrument_dir) = instruments.iter().find(|node| node.instrument_id == instrument_id).map(|node| node.dir.clone()) else {
                continue;
            };
            let dir = ensure_dataset_collection(tree, &instrument_dir, dataset, &references, bundle.volume_description.as_ref(), &personnel_providers)?;
            datasets.push(DatasetNode {
                dataset_id: dataset.data_set_id.clone(),
                instrument_id,
                dir,
            });
        }
    }

    Ok(BuildOutcome {
        body_dir,
        mission_dir,
        platform_dir,
        instruments,
        datasets,
    })
}

/// Which instrument ids `dataset` should be attached under: its own
/// reported ids, intersected with the instruments actually built this run,
/// falling back to `desc.iid` alone when that intersection is empty (a
/// dataset catalog naming instruments the host catalog never mentioned, or
/// naming none at all).
fn instrument_targets(dataset: &DataSet, desc: &CollectionDescriptor, instruments: &[InstrumentNode]) -> Vec<String> {
    let known: Vec<String> = dataset
        .instrument_ids
        .iter()
        .filter(|id| instruments.iter().any(|node| &node.instrument_id == *id))
        .cloned()
        .collect();
    if known.is_empty() {
        vec![desc.iid.clone()]
    } else {
        known
    }
}

fn ensure_body(tree: &StacTree, desc: &CollectionDescriptor) -> Result<PathBuf, Error> {
    let id = urn::body(&desc.body);
    let dir = tree.root_dir().join(layout::last_segment(&id));
    let path = dir.join(CATALOG_FILE);
    if load_catalog(&path).is_none() {
        let catalog = Catalog::new(id, format!("{} collections", desc.body));
        let mut node = StacNode::Catalog(catalog);
        tree.normalize_and_save(&mut node, tree.root_dir())?;
    }
    Ok(dir)
}

/// Ensures a Catalog node exists under `parent_dir`: writes `built` fresh
/// if absent, or, if one is already on disk, keeps it unless `built`'s
/// description is strictly longer (`should_replace`). Returns the node's
/// own directory, where children attach, and whether it was newly created.
fn ensure_catalog(tree: &StacTree, parent_dir: &Path, built: Catalog) -> Result<(PathBuf, bool), Error> {
    let dir = parent_dir.join(layout::last_segment(&built.id));
    let path = dir.join(CATALOG_FILE);
    let (node, created) = match load_catalog(&path) {
        Some(existing) => {
            let node = if should_replace(&existing.description, &built.description) { built } else { existing };
            (node, false)
        }
        None => (built, true),
    };
    let mut stac_node = StacNode::Catalog(node);
    tree.normalize_and_save(&mut stac_node, parent_dir)?;
    Ok((dir, created))
}

/// Same as [`ensure_catalog`], but for the dataset's Collection node: also
/// tags the winning node with `pds:volume_id` (when a volume description
/// was reachable) and merges in personnel providers regardless of whether
/// the stored or the freshly-built description wins, since provider
/// attribution isn't part of the length comparison.
fn ensure_dataset_collection(
    tree: &StacTree,
    parent_dir: &Path,
    dataset: &DataSet,
    references: &pdsstac_models::pds3::References,
    volume: Option<&pdsstac_models::pds3::Volume>,
    personnel_providers: &[Provider],
) -> Result<PathBuf, Error> {
    let mut built = dataset.create_stac_collection(references, volume.and_then(|v| v.data_supplier.as_ref()), volume.and_then(|v| v.data_producer.as_ref()));
    if let Some(volume) = volume {
        built.additional_fields.insert("pds:volume_id".to_string(), volume.volume_id.clone().into());
    }

    let dir = parent_dir.join(layout::last_segment(&built.id));
    let path = dir.join(COLLECTION_FILE);
    let mut collection = match load_collection(&path) {
        Some(existing) => {
            if should_replace(&existing.description, &built.description) {
                built
            } else {
                existing
            }
        }
        None => built,
    };

    merge_providers(&mut collection, personnel_providers);

    let mut stac_node = StacNode::Collection(collection);
    tree.normalize_and_save(&mut stac_node, parent_dir)?;
    Ok(dir)
}

fn merge_providers(collection: &mut Collection, providers: &[Provider]) {
    if providers.is_empty() {
        return;
    }
    let mut merged = collection.providers.take().unwrap_or_default();
    for provider in providers {
        if !merged.iter().any(|existing| existing.name == provider.name) {
            merged.push(provider.clone());
        }
    }
    collection.providers = Some(merged);
}

fn load_catalog(path: &Path) -> Option<Catalog> {
    let bytes = std::fs::read(path).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    Catalog::from_value(value).ok()
}

fn load_collection(path: &Path) -> Option<Collection> {
    let bytes = std::fs::read(path).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    Collection::from_value(value).ok()
}

/// A minimal mission node keyed on `desc.ihid`, used when no `mission.cat`
/// was reachable for this volume. The ODE archive does not guarantee one —
/// `ihid` is the one identifier every `CollectionDescriptor` is guaranteed
/// to carry, so it is the only stable choice for the mission segment of the
/// `body -> mission -> platform -> ...` path when the registry rather than
/// a catalog file is the only source of truth.
fn fallback_mission_catalog(desc: &CollectionDescriptor) -> Catalog {
    let mut catalog = Catalog::new(urn::mission(&desc.ihid), format!("Mission catalog unavailable for {}", desc.ihid));
    catalog.title = Some(desc.ihid.clone());
    catalog
}

fn fallback_platform_catalog(desc: &CollectionDescriptor) -> Catalog {
    let mut catalog = Catalog::new(urn::platform(&desc.ihid), format!("Platform catalog unavailable for {}", desc.ihid));
    catalog.title = Some(desc.ihid.clone());
    catalog
}

fn fallback_instrument_catalog(desc: &CollectionDescriptor) -> Catalog {
    let mut catalog = Catalog::new(urn::instrument(&desc.iid), format!("Instrument catalog unavailable for {}", desc.iid));
    catalog.title = Some(desc.iid.clone());
    catalog
}

fn fallback_dataset(desc: &CollectionDescriptor) -> DataSet {
    DataSet {
        data_set_id: desc.dataset_id.clone(),
        data_set_name: desc.dataset_id.clone(),
        abstract_desc: None,
        data_set_desc: format!("Dataset catalog unavailable for {}", desc.dataset_id),
        start_time: None,
        stop_time: None,
        producer_full_names: Vec::new(),
        targets: desc.valid_targets.clone(),
        instrument_host_id: desc.ihid.clone(),
        instrument_ids: vec![desc.iid.clone()],
        mission_name: None,
        reference_keys: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdsstac_models::pds3::{InstrumentHost, Mission};

    fn sample_desc() -> CollectionDescriptor {
        CollectionDescriptor {
            body: "mercury".to_string(),
            ihid: "MESS".to_string(),
            iid: "MDIS".to_string(),
            pt: "EDR".to_string(),
            dataset_id: "izenberg-data".to_string(),
            product_count: 1,
            has_valid_footprints: true,
            min_orbit: None,
            max_orbit: None,
            min_observation_time: None,
            max_observation_time: None,
            special_values: Vec::new(),
            valid_targets: vec!["MERCURY".to_string()],
        }
    }

    #[test]
    fn builds_full_chain_from_empty_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let desc = sample_desc();
        let bundle = CatalogBundle::default();

        let outcome = build_catalogs(&tree, &desc, &bundle).unwrap();

        assert!(outcome.body_dir.join(CATALOG_FILE).exists());
        assert!(outcome.mission_dir.join(CATALOG_FILE).exists());
        assert!(outcome.platform_dir.join(CATALOG_FILE).exists());
        assert_eq!(outcome.instruments.len(), 1);
        assert_eq!(outcome.datasets.len(), 1);
        assert!(outcome.dataset_dir("MDIS", "izenberg-data").unwrap().join(COLLECTION_FILE).exists());
    }

    #[test]
    fn reruns_without_duplicating_nodes_or_links() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let desc = sample_desc();
        let bundle = CatalogBundle::default();

        build_catalogs(&tree, &desc, &bundle).unwrap();
        let outcome = build_catalogs(&tree, &desc, &bundle).unwrap();

        let dataset_path = outcome.dataset_dir("MDIS", "izenberg-data").unwrap().join(COLLECTION_FILE);
        let collection = load_collection(&dataset_path).unwrap();
        assert_eq!(collection.links.iter().filter(|link| link.is_self()).count(), 1);
        assert_eq!(collection.links.iter().filter(|link| link.is_root()).count(), 1);
    }

    #[test]
    fn longer_description_replaces_stored_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let desc = sample_desc();

        let mut bundle = CatalogBundle::default();
        bundle.mission.push(Mission {
            alias_name: "MESS".to_string(),
            name: "short".to_string(),
            description: "short".to_string(),
            objectives_summary: "s".to_string(),
            start_date: "2004".to_string(),
            stop_date: "2015".to_string(),
            instrument_host_id: "MESS".to_string(),
            targets: vec!["MERCURY".to_string()],
            reference_keys: Vec::new(),
        });
        build_catalogs(&tree, &desc, &bundle).unwrap();

        bundle.mission[0].description = "a much longer mission description than before".to_string();
        let outcome = build_catalogs(&tree, &desc, &bundle).unwrap();

        let saved = load_catalog(&outcome.mission_dir.join(CATALOG_FILE)).unwrap();
        assert_eq!(saved.description, "a much longer mission description than before");
    }

    #[test]
    fn shorter_description_keeps_stored_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let desc = sample_desc();

        let mut bundle = CatalogBundle::default();
        bundle.instrument_host.push(InstrumentHost {
            instrument_host_id: "MESS".to_string(),
            name: "MESSENGER".to_string(),
            description: "a long and thorough description of the spacecraft".to_string(),
            host_type: "Spacecraft".to_string(),
            reference_keys: Vec::new(),
        });
        build_catalogs(&tree, &desc, &bundle).unwrap();

        bundle.instrument_host[0].description = "short".to_string();
        let outcome = build_catalogs(&tree, &desc, &bundle).unwrap();

        let saved = load_catalog(&outcome.platform_dir.join(CATALOG_FILE)).unwrap();
        assert_eq!(saved.description, "a long and thorough description of the spacecraft");
    }

    #[test]
    fn personnel_merges_into_dataset_providers_across_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let desc = sample_desc();
        let bundle = CatalogBundle::default();
        build_catalogs(&tree, &desc, &bundle).unwrap();

        let mut with_personnel = CatalogBundle::default();
        with_personnel.personnel.push(pdsstac_models::pds3::PersonnelList {
            entries: vec![pdsstac_models::pds3::Personnel {
                pds_user_id: "NIZENBERG".to_string(),
                full_name: "Noam Izenberg".to_string(),
                institution_name: "JHU/APL".to_string(),
                electronic_mail_id: None,
            }],
        });
        let outcome = build_catalogs(&tree, &desc, &with_personnel).unwrap();

        let saved = load_collection(&outcome.dataset_dir("MDIS", "izenberg-data").unwrap().join(COLLECTION_FILE)).unwrap();
        let providers = saved.providers.unwrap();
        assert!(providers.iter().any(|p| p.name == "Noam Izenberg"));
    }

    #[test]
    fn dataset_fans_out_across_every_reported_instrument() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let desc = sample_desc();

        let mut bundle = CatalogBundle::default();
        bundle.instrument.push(pdsstac_models::pds3::Instrument {
            instrument_host_id: "MESS".to_string(),
            instrument_id: "MDIS".to_string(),
            name: "MDIS".to_string(),
            description: "d".to_string(),
            instrument_type: "Imaging Camera".to_string(),
            reference_keys: Vec::new(),
        });
        bundle.instrument.push(pdsstac_models::pds3::Instrument {
            instrument_host_id: "MESS".to_string(),
            instrument_id: "GRS".to_string(),
            name: "GRS".to_string(),
            description: "d".to_string(),
            instrument_type: "Spectrometer".to_string(),
            reference_keys: Vec::new(),
        });
        bundle.dataset.push(DataSet {
            data_set_id: desc.dataset_id.clone(),
            data_set_name: "d".to_string(),
            abstract_desc: None,
            data_set_desc: "d".to_string(),
            start_time: None,
            stop_time: None,
            producer_full_names: Vec::new(),
            targets: Vec::new(),
            instrument_host_id: "MESS".to_string(),
            instrument_ids: vec!["MDIS".to_string(), "GRS".to_string()],
            mission_name: None,
            reference_keys: Vec::new(),
        });

        let outcome = build_catalogs(&tree, &desc, &bundle).unwrap();
        assert!(outcome.dataset_dir("MDIS", &desc.dataset_id).is_some());
        assert!(outcome.dataset_dir("GRS", &desc.dataset_id).is_some());
    }
}

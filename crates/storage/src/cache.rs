//! Per-collection on-disk cache of downloaded PDS3 catalog and record
//! files.
//!
//! Grounded on `Hdf5Storage.get_root_filepath` /
//! `PdsLocalFileSystem` in
//! `examples/original_source/pds_crawler/load/{database,filesystem}.py`.

use crate::error::{self, Error};
use pdsstac_http::Fetcher;
use pdsstac_models::CollectionDescriptor;
use pdsstac_pds3::GrammarKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// The on-disk file cache for downloaded catalog and record files, rooted
/// at `base/files/<identity path>` per collection.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Opens the file cache rooted at `base`.
    pub fn open(base: impl AsRef<Path>) -> FileCache {
        FileCache { root: base.as_ref().join("files") }
    }

    /// Resolves (and creates, if absent) the directory for `desc`.
    pub fn collection_dir(&self, desc: &CollectionDescriptor) -> Result<PathBuf, Error> {
        let dir = self.root.join(desc.sanitized_path());
        std::fs::create_dir_all(&dir).map_err(error::io(&dir))?;
        Ok(dir)
    }

    /// Lists every file in `desc`'s cache directory.
    pub fn list_files(&self, desc: &CollectionDescriptor) -> Result<Vec<PathBuf>, Error> {
        let dir = self.collection_dir(desc)?;
        list_dir(&dir)
    }

    /// Lists every `.json` file in `desc`'s cache directory.
    pub fn list_record_files(&self, desc: &CollectionDescriptor) -> Result<Vec<PathBuf>, Error> {
        Ok(self
            .list_files(desc)?
            .into_iter()
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect())
    }

    /// Parses `voldesc.cat` from `desc`'s cache directory into a `Volume`.
    pub fn get_volume_description(
        &self,
        desc: &CollectionDescriptor,
        parser_timeout: Duration,
    ) -> Result<pdsstac_models::pds3::Volume, Error> {
        let text = self.read_to_string(desc, "voldesc.cat")?;
        match pdsstac_pds3::parse_catalog(GrammarKind::VolumeDescription, text, parser_timeout)? {
            pdsstac_pds3::ParsedCatalog::VolumeDescription(volume) => Ok(volume),
            _ => unreachable!("VolumeDescription grammar always yields ParsedCatalog::VolumeDescription"),
        }
    }

    /// Returns the catalog-type → filename(s) map from `desc`'s volume
    /// description.
    pub fn list_catalogs(
        &self,
        desc: &CollectionDescriptor,
        parser_timeout: Duration,
    ) -> Result<Vec<(&'static str, String)>, Error> {
        Ok(self.get_volume_description(desc, parser_timeout)?.catalog.entries())
    }

    /// Parses one named catalog file under `desc`'s cache directory.
    pub fn get_catalog(
        &self,
        desc: &CollectionDescriptor,
        filename: &str,
        kind: GrammarKind,
        parser_timeout: Duration,
    ) -> Result<pdsstac_pds3::ParsedCatalog, Error> {
        let text = self.read_to_string(desc, filename)?;
        Ok(pdsstac_pds3::parse_catalog(kind, text, parser_timeout)?)
    }

    fn read_to_string(&self, desc: &CollectionDescriptor, filename: &str) -> Result<String, Error> {
        let path = self.collection_dir(desc)?.join(filename.to_ascii_lowercase());
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        std::fs::read_to_string(&path).map_err(error::io(&path))
    }

    /// Downloads `urls` into `desc`'s cache directory via `pdsstac-http`,
    /// returning how many were newly fetched.
    pub async fn download(
        &self,
        desc: &CollectionDescriptor,
        fetcher: Fetcher,
        urls: &[String],
        workers: usize,
        sleep_between: Duration,
    ) -> Result<usize, Error> {
        let dir = self.collection_dir(desc)?;
        let targets = urls
            .iter()
            .map(|url| (url.clone(), dir.join(destination_filename(url))))
            .collect();
        let outcomes = pdsstac_http::download_all(fetcher, targets, workers, sleep_between).await;
        let mut downloaded = 0;
        for outcome in outcomes {
            match outcome.result {
                Ok(true) => downloaded += 1,
                Ok(false) => {}
                Err(err) => tracing::warn!(url = outcome.url, error = %err, "file cache download failed"),
            }
        }
        Ok(downloaded)
    }
}

/// Derives the destination filename for a downloaded URL: the records API
/// shape (`<target>_<ihid>_<iid>_<pt>_<offset>.json`) when the query string
/// carries `ihid`, else the lowercased basename of the URL path.
pub fn destination_filename(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.rsplit('/').next().unwrap_or(url).to_ascii_lowercase();
    };
    let params: std::collections::HashMap<_, _> = parsed.query_pairs().collect();
    if let Some(ihid) = params.get("ihid") {
        let target = params.get("target").map(|v| v.as_ref()).unwrap_or("target");
        let iid = params.get("iid").map(|v| v.as_ref()).unwrap_or("iid");
        let pt = params.get("pt").map(|v| v.as_ref()).unwrap_or("pt");
        let offset = params.get("offset").map(|v| v.as_ref()).unwrap_or("0");
        return format!("{}_{}_{}_{}_{}.json", target, ihid, iid, pt, offset).to_ascii_lowercase();
    }
    parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("index")
        .to_ascii_lowercase()
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(error::io(dir))? {
        let entry = entry.map_err(error::io(dir))?;
        if entry.file_type().map_err(error::io(dir))?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CollectionDescriptor {
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
            valid_targets: Vec::new(),
        }
    }

    #[test]
    fn records_api_filename_uses_five_fields() {
        let url = "https://oderest.rsl.wustl.edu/live2/?target=mercury&ihid=MESS&iid=MDIS&pt=EDR&offset=200&query=product";
        assert_eq!(destination_filename(url), "mercury_mess_mdis_edr_200.json");
    }

    #[test]
    fn generic_url_uses_lowercased_basename() {
        assert_eq!(destination_filename("https://pds-imaging.jpl.nasa.gov/data/VOLDESC.CAT"), "voldesc.cat");
    }

    #[test]
    fn lists_json_files_only() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::open(tmp.path());
        let dir = cache.collection_dir(&sample()).unwrap();
        std::fs::write(dir.join("a.json"), b"{}").unwrap();
        std::fs::write(dir.join("voldesc.cat"), b"END").unwrap();
        let records = cache.list_record_files(&sample()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(cache.list_files(&sample()).unwrap().len(), 2);
    }

    #[test]
    fn get_catalog_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::open(tmp.path());
        let result = cache.get_volume_description(&sample(), Duration::from_secs(1));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}

use crate::error::Error;
use chrono::{DateTime, Utc};
use pdsstac_core::{Asset, Bbox, Item};
use serde::{Deserialize, Serialize};

/// One file attached to a product (`ProductFile` in
/// `examples/original_source/pds_crawler/models/ode_ws_models.py`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFile {
    /// The file's name.
    pub name: String,
    /// The file's role/type (e.g. `"Product"`, `"Browse"`).
    pub r#type: Option<String>,
    /// Download URL.
    pub url: Option<String>,
    /// A human-readable description.
    pub description: Option<String>,
    /// Creation date, as reported upstream.
    pub creation_date: Option<String>,
    /// File size in kilobytes.
    pub size_kb: Option<f64>,
}

/// One observation record returned by the ODE records API.
///
/// Grounded on `PdsRecordModel` in
/// `examples/original_source/pds_crawler/models/ode_ws_models.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    /// Stable synthetic id for this record (`ode_id`).
    pub ode_id: String,
    /// The PDS product id (`pdsid`).
    pub pdsid: String,
    /// Instrument host id.
    pub ihid: String,
    /// Instrument id.
    pub iid: String,
    /// Product type.
    pub pt: String,
    /// Dataset id.
    pub data_set_id: String,
    /// PDS3 volume id this record belongs to (`PDSVolume_Id`), used by the
    /// website crawler's dataset-explorer URL template.
    pub pds_volume_id: String,
    /// Label filename.
    pub label_filename: String,
    /// Product creation time, as reported upstream.
    pub product_creation_time: String,
    /// Target body name.
    pub target_name: String,

    /// Westernmost longitude of the bounding box.
    pub westernmost_longitude: f64,
    /// Easternmost longitude of the bounding box.
    pub easternmost_longitude: f64,
    /// Minimum latitude of the bounding box.
    pub minimum_latitude: f64,
    /// Maximum latitude of the bounding box.
    pub maximum_latitude: f64,

    /// WKT polygon footprint, longitudes normalized to -180..180.
    pub footprint_c0_geometry: Option<String>,

    /// Observation start time, if reported.
    pub observation_time: Option<String>,
    /// Product release date, if reported.
    pub product_release_date: Option<String>,
    /// Orbit number at observation start.
    pub start_orbit_number: Option<i64>,
    /// Orbit number at observation stop.
    pub stop_orbit_number: Option<i64>,
    /// Emission angle, degrees.
    pub emission_angle: Option<f64>,
    /// Phase angle, degrees.
    pub phase_angle: Option<f64>,
    /// Incidence angle, degrees.
    pub incidence_angle: Option<f64>,
    /// Map resolution / scale, meters per pixel.
    pub map_resolution: Option<f64>,
    /// Solar distance, in AU.
    pub solar_distance: Option<f64>,
    /// Solar longitude, degrees.
    pub solar_longitude: Option<f64>,
    /// Footprint center latitude.
    pub center_latitude: Option<f64>,
    /// Footprint center longitude.
    pub center_longitude: Option<f64>,

    /// Product files attached to this record.
    pub product_files: Vec<ProductFile>,
    /// Browse/thumbnail image URL.
    pub browse_url: Option<String>,
    /// Thumbnail image URL.
    pub thumbnail_url: Option<String>,
    /// Other externally-hosted URLs.
    pub external_urls: Vec<String>,
}

impl RecordDescriptor {
    /// Resolves the record's best-available datetime by trying, in order,
    /// `observation_time`, `product_creation_time`, and
    /// `product_release_date`. Returns `Err` if none parse, per the
    /// `DateConversionError` contract in `spec.md` §7.
    pub fn best_datetime(&self) -> Result<DateTime<Utc>, Error> {
        [
            self.observation_time.as_deref(),
            Some(self.product_creation_time.as_str()),
            self.product_release_date.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find_map(|candidate| parse_upstream_datetime(candidate))
        .ok_or_else(|| Error::DateConversion(self.ode_id.clone()))
    }

    /// Converts this record into a STAC item. Returns
    /// `Error::MissingFootprint` if `footprint_c0_geometry` is absent, per
    /// the drop-at-conversion invariant in `spec.md` §3.
    pub fn to_stac_item(&self) -> Result<Item, Error> {
        let wkt = self
            .footprint_c0_geometry
            .as_deref()
            .ok_or_else(|| Error::MissingFootprint(self.ode_id.clone()))?;
        let geometry = wkt_polygon_to_geojson(wkt)?;
        let bbox = Bbox::new(
            self.westernmost_longitude,
            self.minimum_latitude,
            self.easternmost_longitude,
            self.maximum_latitude,
        )?;

        let mut item = Item::new(self.ode_id.clone())
            .with_collection(crate::urn::collection(&self.data_set_id))
            .with_bbox(bbox);
        item.geometry = Some(geometry);

        if let Ok(datetime) = self.best_datetime() {
            item.properties.datetime = Some(datetime);
        }
        item.properties
            .additional_fields
            .insert("ssys:targets".to_string(), serde_json::json!([self.target_name]));
        item.properties
            .additional_fields
            .insert("pds:label_filename".to_string(), serde_json::json!(self.label_filename));
        if let Some(angle) = self.emission_angle {
            item.properties
                .additional_fields
                .insert("view:incidence_angle".to_string(), serde_json::json!(angle));
        }

        for file in &self.product_files {
            if let Some(url) = &file.url {
                let mut asset = Asset::new(url).with_title(file.name.clone());
                if let Some(description) = &file.description {
                    asset = asset.with_description(description.clone());
                }
                item.assets.insert(file.name.clone(), asset);
            }
        }
        if let Some(browse) = &self.browse_url {
            item.assets.insert(
                "browse".to_string(),
                Asset::new(browse).with_title("Browse image").with_type("image/jpeg"),
            );
        }
        if let Some(thumbnail) = &self.thumbnail_url {
            item.assets.insert(
                "thumbnail".to_string(),
                Asset::new(thumbnail).with_title("Thumbnail").with_type("image/jpeg"),
            );
        }

        Ok(item)
    }
}

fn parse_upstream_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Parses a `POLYGON((lon lat, lon lat, ...))` WKT string into a GeoJSON
/// polygon geometry. The PDS3/ODE footprint format is always a single
/// simple polygon ring; multipolygon WKT is not produced upstream and is
/// out of scope.
fn wkt_polygon_to_geojson(wkt: &str) -> Result<geojson::Geometry, Error> {
    let trimmed = wkt.trim();
    let upper = trimmed.to_ascii_uppercase();
    let body = if let Some(rest) = upper.strip_prefix("POLYGON") {
        rest
    } else {
        return Err(Error::MissingField("POLYGON", "RecordDescriptor.footprint_c0_geometry"));
    };
    let inner = trimmed[trimmed.len() - body.len()..]
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim_start_matches('(');
    let ring: Vec<Vec<f64>> = inner
        .split(',')
        .filter_map(|pair| {
            let mut parts = pair.split_whitespace();
            let lon: f64 = parts.next()?.parse().ok()?;
            let lat: f64 = parts.next()?.parse().ok()?;
            Some(vec![lon, lat])
        })
        .collect();
    if ring.len() < 3 {
        return Err(Error::MissingField("ring", "RecordDescriptor.footprint_c0_geometry"));
    }
    Ok(geojson::Geometry::new(geojson::Value::Polygon(vec![ring])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordDescriptor {
        RecordDescriptor {
            ode_id: "rec-1".to_string(),
            pdsid: "PDS-1".to_string(),
            ihid: "MESS".to_string(),
            iid: "MDIS".to_string(),
            pt: "EDR".to_string(),
            data_set_id: "izenberg_pdart14_meap-data_tnmap".to_string(),
            pds_volume_id: "MSGRMDS_1001".to_string(),
            label_filename: "rec-1.lbl".to_string(),
            product_creation_time: "2020-01-01T00:00:00".to_string(),
            target_name: "MERCURY".to_string(),
            westernmost_longitude: -10.0,
            easternmost_longitude: 10.0,
            minimum_latitude: -5.0,
            maximum_latitude: 5.0,
            footprint_c0_geometry: Some(
                "POLYGON((-10 -5, 10 -5, 10 5, -10 5, -10 -5))".to_string(),
            ),
            observation_time: Some("2020-01-01T00:00:00Z".to_string()),
            product_release_date: None,
            start_orbit_number: None,
            stop_orbit_number: None,
            emission_angle: None,
            phase_angle: None,
            incidence_angle: None,
            map_resolution: None,
            solar_distance: None,
            solar_longitude: None,
            center_latitude: None,
            center_longitude: None,
            product_files: Vec::new(),
            browse_url: None,
            thumbnail_url: None,
            external_urls: Vec::new(),
        }
    }

    #[test]
    fn to_stac_item_bbox_matches_spec_order() {
        let item = sample().to_stac_item().unwrap();
        let bbox = item.bbox.unwrap();
        assert_eq!(bbox.west(), -10.0);
        assert_eq!(bbox.south(), -5.0);
        assert_eq!(bbox.east(), 10.0);
        assert_eq!(bbox.north(), 5.0);
    }

    #[test]
    fn to_stac_item_missing_footprint_is_dropped() {
        let mut record = sample();
        record.footprint_c0_geometry = None;
        assert!(matches!(record.to_stac_item(), Err(Error::MissingFootprint(_))));
    }

    #[test]
    fn best_datetime_prefers_observation_time() {
        let record = sample();
        let datetime = record.best_datetime().unwrap();
        assert_eq!(datetime.to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }

    #[test]
    fn best_datetime_falls_back_to_creation_time() {
        let mut record = sample();
        record.observation_time = None;
        assert!(record.best_datetime().is_ok());
    }

    #[test]
    fn best_datetime_errors_when_nothing_parses() {
        let mut record = sample();
        record.observation_time = None;
        record.product_creation_time = "not-a-date".to_string();
        record.product_release_date = None;
        assert!(matches!(record.best_datetime(), Err(Error::DateConversion(_))));
    }
}

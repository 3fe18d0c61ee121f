use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A bounding box, either two-dimensional (`[west, south, east, north]`) or
/// three-dimensional (`[west, south, min_elevation, east, north,
/// max_elevation]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bbox {
    /// A two-dimensional bounding box.
    TwoDimensional([f64; 4]),
    /// A three-dimensional bounding box.
    ThreeDimensional([f64; 6]),
}

impl Bbox {
    /// Creates a new two-dimensional bounding box from west/south/east/north
    /// values.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdsstac_core::Bbox;
    /// let bbox = Bbox::new(-180.0, -90.0, 180.0, 90.0).unwrap();
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Bbox> {
        let bbox = Bbox::TwoDimensional([west, south, east, north]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Returns the westernmost coordinate.
    pub fn west(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[0],
            Bbox::ThreeDimensional(b) => b[0],
        }
    }

    /// Returns the southernmost coordinate.
    pub fn south(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[1],
            Bbox::ThreeDimensional(b) => b[1],
        }
    }

    /// Returns the easternmost coordinate.
    pub fn east(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[2],
            Bbox::ThreeDimensional(b) => b[4],
        }
    }

    /// Returns the northernmost coordinate.
    pub fn north(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[3],
            Bbox::ThreeDimensional(b) => b[5],
        }
    }

    fn validate(&self) -> Result<()> {
        let (south, north) = (self.south(), self.north());
        if south > north {
            return Err(Error::InvalidBbox(
                self.to_vec(),
                "south is greater than north",
            ));
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(Error::InvalidBbox(
                self.to_vec(),
                "latitude out of range [-90, 90]",
            ));
        }
        Ok(())
    }

    fn to_vec(&self) -> Vec<f64> {
        match self {
            Bbox::TwoDimensional(b) => b.to_vec(),
            Bbox::ThreeDimensional(b) => b.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Bbox;

    #[test]
    fn new() {
        let bbox = Bbox::new(-180.0, -90.0, 180.0, 90.0).unwrap();
        assert_eq!(bbox.west(), -180.0);
        assert_eq!(bbox.south(), -90.0);
        assert_eq!(bbox.east(), 180.0);
        assert_eq!(bbox.north(), 90.0);
    }

    #[test]
    fn invalid() {
        assert!(Bbox::new(-180.0, 90.0, 180.0, -90.0).is_err());
        assert!(Bbox::new(-180.0, -100.0, 180.0, 90.0).is_err());
    }

    #[test]
    fn roundtrip() {
        let bbox = Bbox::new(10.0, 20.0, 30.0, 40.0).unwrap();
        let value = serde_json::to_value(&bbox).unwrap();
        assert_eq!(value, serde_json::json!([10.0, 20.0, 30.0, 40.0]));
        let back: Bbox = serde_json::from_value(value).unwrap();
        assert_eq!(bbox, back);
    }
}

use crate::geo::GeoCoordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cone category in the unified model.
///
/// Strings outside the canonical set (including the retired `leftPointer` and
/// `rightPointer`) are kept verbatim in `Unknown` so they survive a save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConeType {
    Starting,
    Pointer,
    #[default]
    Single,
    Unknown(String),
}

impl ConeType {
    pub fn as_str(&self) -> &str {
        match self {
            ConeType::Starting => "starting",
            ConeType::Pointer => "pointer",
            ConeType::Single => "single",
            ConeType::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ConeType::Unknown(_))
    }
}

impl From<String> for ConeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "starting" => ConeType::Starting,
            "pointer" => ConeType::Pointer,
            "single" => ConeType::Single,
            _ => ConeType::Unknown(value),
        }
    }
}

impl From<&str> for ConeType {
    fn from(value: &str) -> Self {
        ConeType::from(value.to_string())
    }
}

impl From<ConeType> for String {
    fn from(value: ConeType) -> Self {
        match value {
            ConeType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded course marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConeRecord", into = "ConeRecord")]
pub struct Cone {
    pub location: GeoCoordinate,
    pub cone_type: ConeType,
    /// Heading of the cone in degrees. Only drawn for pointer cones.
    pub rotation: f64,
}

impl Cone {
    pub fn new(location: GeoCoordinate, cone_type: ConeType, rotation: f64) -> Self {
        Self {
            location,
            cone_type,
            rotation,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.location.is_finite() && self.rotation.is_finite()
    }
}

/// Persisted shape of a cone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeRecord {
    pub latitude: f64,
    pub longitude: f64,
    // Files written before pointer headings existed carry no rotation.
    #[serde(default)]
    pub rotation: f64,
    #[serde(rename = "type")]
    pub cone_type: ConeType,
}

impl From<ConeRecord> for Cone {
    fn from(record: ConeRecord) -> Self {
        Cone::new(
            GeoCoordinate::new(record.latitude, record.longitude),
            record.cone_type,
            record.rotation,
        )
    }
}

impl From<Cone> for ConeRecord {
    fn from(cone: Cone) -> Self {
        ConeRecord {
            latitude: cone.location.latitude,
            longitude: cone.location.longitude,
            rotation: cone.rotation,
            cone_type: cone.cone_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_types_parse() {
        assert_eq!(ConeType::from("starting"), ConeType::Starting);
        assert_eq!(ConeType::from("pointer"), ConeType::Pointer);
        assert_eq!(ConeType::from("single"), ConeType::Single);
    }

    #[test]
    fn retired_types_are_preserved_as_unknown() {
        let legacy = ConeType::from("leftPointer");
        assert_eq!(legacy, ConeType::Unknown("leftPointer".into()));
        assert!(!legacy.is_known());
        assert_eq!(String::from(legacy), "leftPointer");
    }

    #[test]
    fn cone_record_fields_are_tagged() {
        let cone = Cone::new(GeoCoordinate::new(40.0, -75.0), ConeType::Pointer, 45.5);
        let value = serde_json::to_value(&cone).unwrap();
        assert_eq!(value["latitude"], 40.0);
        assert_eq!(value["longitude"], -75.0);
        assert_eq!(value["rotation"], 45.5);
        assert_eq!(value["type"], "pointer");
    }

    #[test]
    fn missing_rotation_defaults_to_zero() {
        let cone: Cone =
            serde_json::from_str(r#"{"latitude":1.5,"longitude":2.5,"type":"single"}"#).unwrap();
        assert_eq!(cone.rotation, 0.0);
        assert_eq!(cone.cone_type, ConeType::Single);
    }

    #[test]
    fn missing_type_is_rejected() {
        let result = serde_json::from_str::<Cone>(r#"{"latitude":1.5,"longitude":2.5}"#);
        assert!(result.is_err());
        assert_eq!(ConeType::default(), ConeType::Single);
    }

    #[test]
    fn missing_latitude_is_rejected() {
        let result = serde_json::from_str::<Cone>(r#"{"longitude":2.5,"type":"single"}"#);
        assert!(result.is_err());
    }
}

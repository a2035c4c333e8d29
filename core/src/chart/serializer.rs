//! Chart encoding.
//!
//! Charts are stored as pretty-printed JSON with the field names
//! `name`, `coneData`, `rotationAngle` and, per cone, `latitude`,
//! `longitude`, `rotation`, `type`.

use crate::chart::saved::SavedChart;
use crate::chart::storage::ChartStorage;
use crate::prelude::{ChartError, ChartResult, DecodeError, IndexError};
use serde::{Deserialize, Serialize};

/// Ordered list of saved charts persisted as one blob.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartCollection {
    charts: Vec<SavedChart>,
}

impl ChartCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chart: SavedChart) {
        self.charts.push(chart);
    }

    pub fn remove(&mut self, index: usize) -> Result<SavedChart, IndexError> {
        if index < self.charts.len() {
            Ok(self.charts.remove(index))
        } else {
            Err(IndexError::new(index, self.charts.len()))
        }
    }

    pub fn get(&self, index: usize) -> Option<&SavedChart> {
        self.charts.get(index)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SavedChart> {
        self.charts.iter()
    }

    pub fn charts(&self) -> &[SavedChart] {
        &self.charts
    }

    pub fn into_inner(self) -> Vec<SavedChart> {
        self.charts
    }
}

impl From<Vec<SavedChart>> for ChartCollection {
    fn from(charts: Vec<SavedChart>) -> Self {
        Self { charts }
    }
}

impl<'a> IntoIterator for &'a ChartCollection {
    type Item = &'a SavedChart;
    type IntoIter = std::slice::Iter<'a, SavedChart>;

    fn into_iter(self) -> Self::IntoIter {
        self.charts.iter()
    }
}

fn ensure_finite(chart: &SavedChart) -> ChartResult<()> {
    if chart.is_finite() {
        Ok(())
    } else {
        Err(ChartError::Encode(format!(
            "chart {:?} contains a non-finite coordinate or rotation",
            chart.name
        )))
    }
}

pub fn serialize(chart: &SavedChart) -> ChartResult<Vec<u8>> {
    ensure_finite(chart)?;
    serde_json::to_vec_pretty(chart).map_err(|err| ChartError::Encode(err.to_string()))
}

pub fn deserialize(bytes: &[u8]) -> Result<SavedChart, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn serialize_collection(collection: &ChartCollection) -> ChartResult<Vec<u8>> {
    for chart in collection {
        ensure_finite(chart)?;
    }
    serde_json::to_vec_pretty(collection).map_err(|err| ChartError::Encode(err.to_string()))
}

pub fn deserialize_collection(bytes: &[u8]) -> Result<ChartCollection, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Loads the collection under `key`, or an empty one when nothing is stored.
pub fn load_collection<S>(storage: &S, key: &str) -> ChartResult<ChartCollection>
where
    S: ChartStorage + ?Sized,
{
    match storage.read(key)? {
        Some(bytes) => Ok(deserialize_collection(&bytes)?),
        None => Ok(ChartCollection::new()),
    }
}

/// Read-modify-write append of `chart` to the collection under `key`.
///
/// The whole collection is encoded before the write, so an encode or decode
/// failure leaves the stored blob untouched. Concurrent writers are not
/// detected; callers own the collection through a single writer.
pub fn append_and_persist<S>(
    storage: &mut S,
    key: &str,
    chart: SavedChart,
) -> ChartResult<ChartCollection>
where
    S: ChartStorage + ?Sized,
{
    let mut collection = load_collection(storage, key)?;
    collection.push(chart);
    let bytes = serialize_collection(&collection)?;
    storage.write(key, &bytes)?;
    Ok(collection)
}

pub fn delete_at(mut collection: ChartCollection, index: usize) -> Result<ChartCollection, IndexError> {
    collection.remove(index)?;
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::storage::MemoryStorage;
    use crate::course::{Cone, ConeType};
    use crate::geo::GeoCoordinate;

    const KEY: &str = "savedCharts";

    fn chart(name: &str) -> SavedChart {
        SavedChart::new(
            name,
            vec![
                Cone::new(GeoCoordinate::new(40.0, -75.0), ConeType::Starting, 0.0),
                Cone::new(GeoCoordinate::new(40.00012, -74.99991), ConeType::Pointer, 33.75),
                Cone::new(GeoCoordinate::new(40.0002, -74.9998), ConeType::Single, 0.0),
                Cone::new(
                    GeoCoordinate::new(40.0003, -74.9997),
                    ConeType::Unknown("rightPointer".into()),
                    -190.125,
                ),
            ],
            -17.5,
        )
    }

    #[test]
    fn chart_round_trips() {
        let original = chart("Lot A");
        let bytes = serialize(&original).unwrap();
        assert_eq!(deserialize(&bytes).unwrap(), original);
    }

    #[test]
    fn edge_case_charts_round_trip() {
        let cases = vec![
            SavedChart::new("", Vec::new(), 0.0),
            SavedChart::new("empty course", Vec::new(), -180.0),
            SavedChart::new(
                "odd angles",
                vec![
                    Cone::new(GeoCoordinate::new(-33.8688, 151.2093), ConeType::Pointer, -359.999),
                    Cone::new(GeoCoordinate::new(89.99999, -179.99999), ConeType::Pointer, 1e-9),
                    Cone::new(GeoCoordinate::new(0.1 + 0.2, -0.0), ConeType::Single, 720.25),
                ],
                -0.3333333333333333,
            ),
            SavedChart::new(
                "Chart_2024-05-01_09:15:42 \"north lot\"",
                vec![Cone::new(
                    GeoCoordinate::new(40.0, -75.0),
                    ConeType::Unknown(String::new()),
                    f64::MAX,
                )],
                f64::MIN_POSITIVE,
            ),
        ];

        for original in cases {
            let bytes = serialize(&original).unwrap();
            assert_eq!(deserialize(&bytes).unwrap(), original, "{:?}", original.name);
        }
    }

    #[test]
    fn encoding_uses_persisted_field_names_in_order() {
        let text = String::from_utf8(serialize(&chart("Lot A")).unwrap()).unwrap();
        let name = text.find("\"name\"").unwrap();
        let cones = text.find("\"coneData\"").unwrap();
        let rotation = text.find("\"rotationAngle\"").unwrap();
        assert!(name < cones && cones < rotation);

        let latitude = text.find("\"latitude\"").unwrap();
        let longitude = text.find("\"longitude\"").unwrap();
        let cone_rotation = text.find("\"rotation\"").unwrap();
        let kind = text.find("\"type\"").unwrap();
        assert!(latitude < longitude && longitude < cone_rotation && cone_rotation < kind);
    }

    #[test]
    fn unknown_type_decodes() {
        let json = br#"{"name":"legacy","coneData":[
            {"latitude":40.0,"longitude":-75.0,"type":"starting"},
            {"latitude":40.0001,"longitude":-75.0,"type":"zigzag"}
        ],"rotationAngle":0}"#;
        let chart = deserialize(json).unwrap();
        assert_eq!(chart.cone_data[1].cone_type, ConeType::Unknown("zigzag".into()));
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        assert!(deserialize(b"{\"name\": 3").is_err());
        assert!(deserialize(br#"{"name":"x","rotationAngle":0}"#).is_err());
        assert!(deserialize_collection(b"not json").is_err());
    }

    #[test]
    fn non_finite_chart_is_not_encoded() {
        let mut bad = chart("bad");
        bad.rotation_angle = f64::NAN;
        assert!(matches!(serialize(&bad), Err(ChartError::Encode(_))));
    }

    #[test]
    fn append_and_persist_starts_from_empty() {
        let mut storage = MemoryStorage::new();
        let collection = append_and_persist(&mut storage, KEY, chart("one")).unwrap();
        assert_eq!(collection.len(), 1);

        let collection = append_and_persist(&mut storage, KEY, chart("two")).unwrap();
        assert_eq!(collection.len(), 2);

        let stored = load_collection(&storage, KEY).unwrap();
        assert_eq!(stored, collection);
        assert_eq!(stored.get(1).unwrap().name, "two");
    }

    #[test]
    fn failed_append_leaves_storage_untouched() {
        let mut storage = MemoryStorage::new();
        append_and_persist(&mut storage, KEY, chart("one")).unwrap();
        let before = storage.read(KEY).unwrap();

        let mut bad = chart("bad");
        bad.cone_data[0].location.latitude = f64::INFINITY;
        assert!(append_and_persist(&mut storage, KEY, bad).is_err());
        assert_eq!(storage.read(KEY).unwrap(), before);

        storage.write(KEY, b"garbage").unwrap();
        let result = append_and_persist(&mut storage, KEY, chart("two"));
        assert!(matches!(result, Err(ChartError::Decode(_))));
        assert_eq!(storage.read(KEY).unwrap().as_deref(), Some(&b"garbage"[..]));
    }

    #[test]
    fn delete_at_checks_bounds() {
        let collection = ChartCollection::from(vec![chart("a"), chart("b"), chart("c")]);
        let trimmed = delete_at(collection.clone(), 1).unwrap();
        let names: Vec<_> = trimmed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);

        assert_eq!(delete_at(collection, 3).unwrap_err(), IndexError::new(3, 3));
    }
}

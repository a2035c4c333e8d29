use crate::chart::saved::{ChartSummary, SavedChart};
use crate::chart::serializer::{
    append_and_persist, deserialize, load_collection, serialize, serialize_collection,
    ChartCollection,
};
use crate::chart::storage::{ChartFiles, ChartStorage};
use crate::prelude::{ChartError, ChartResult, IndexError};
use crate::telemetry::log::LogManager;

/// Storage key holding the chart collection.
pub const SAVED_CHARTS_KEY: &str = "savedCharts";

/// File name used when the whole collection is exported.
pub const COLLECTION_EXPORT_FILE: &str = "exportedCharts.json";

/// Chart collection bound to a storage collaborator.
///
/// Every mutation is a read-modify-write of the whole collection. Mutating
/// methods take `&mut self`, so one owner serializes writes; sharing across
/// tasks needs an outer lock.
pub struct ChartLibrary<S> {
    storage: S,
    key: String,
    logger: LogManager,
}

impl<S: ChartStorage> ChartLibrary<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SAVED_CHARTS_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            logger: LogManager::new(),
        }
    }

    pub fn load(&self) -> ChartResult<ChartCollection> {
        load_collection(&self.storage, &self.key)
    }

    /// Appends `chart` and persists the collection. Returns the chart's index.
    pub fn save(&mut self, chart: SavedChart) -> ChartResult<usize> {
        let name = chart.name.clone();
        let collection = append_and_persist(&mut self.storage, &self.key, chart)?;
        self.logger.record(&format!(
            "chart {:?} saved ({} charts stored)",
            name,
            collection.len()
        ));
        Ok(collection.len() - 1)
    }

    pub fn delete(&mut self, index: usize) -> ChartResult<SavedChart> {
        let mut collection = self.load()?;
        let removed = collection.remove(index)?;
        let bytes = serialize_collection(&collection)?;
        self.storage.write(&self.key, &bytes)?;
        self.logger
            .record(&format!("chart {:?} deleted", removed.name));
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> ChartResult<SavedChart> {
        let collection = self.load()?;
        collection
            .get(index)
            .cloned()
            .ok_or_else(|| ChartError::from(IndexError::new(index, collection.len())))
    }

    pub fn summaries(&self) -> ChartResult<Vec<ChartSummary>> {
        Ok(self.load()?.iter().map(SavedChart::summary).collect())
    }

    /// Writes the chart at `index` as `<name>.json`. Returns the file name.
    pub fn export<F>(&self, index: usize, files: &mut F) -> ChartResult<String>
    where
        F: ChartFiles + ?Sized,
    {
        let chart = self.get(index)?;
        let file_name = chart.export_file_name();
        let bytes = serialize(&chart)?;
        files.write_file(&file_name, &bytes)?;
        self.logger
            .record(&format!("chart {:?} exported to {}", chart.name, file_name));
        Ok(file_name)
    }

    /// Writes every stored chart into one file. Returns `None` when there is
    /// nothing to export.
    pub fn export_all<F>(&self, files: &mut F) -> ChartResult<Option<String>>
    where
        F: ChartFiles + ?Sized,
    {
        let collection = self.load()?;
        if collection.is_empty() {
            self.logger.warn("no charts available to export");
            return Ok(None);
        }
        let bytes = serialize_collection(&collection)?;
        files.write_file(COLLECTION_EXPORT_FILE, &bytes)?;
        self.logger.record(&format!(
            "{} charts exported to {}",
            collection.len(),
            COLLECTION_EXPORT_FILE
        ));
        Ok(Some(COLLECTION_EXPORT_FILE.to_string()))
    }

    /// Reads one chart from the file collaborator and appends it.
    pub fn import<F>(&mut self, files: &mut F) -> ChartResult<SavedChart>
    where
        F: ChartFiles + ?Sized,
    {
        let bytes = files.pick_and_read()?;
        let chart = match deserialize(&bytes) {
            Ok(chart) => chart,
            Err(err) => {
                self.logger.warn(&format!("failed to load chart: {}", err));
                return Err(err.into());
            }
        };
        self.save(chart.clone())?;
        Ok(chart)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

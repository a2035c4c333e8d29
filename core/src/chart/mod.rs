pub mod library;
pub mod saved;
pub mod serializer;
pub mod storage;

pub use library::{ChartLibrary, COLLECTION_EXPORT_FILE, SAVED_CHARTS_KEY};
pub use saved::{generate_chart_name, ChartSummary, SavedChart};
pub use serializer::{
    append_and_persist, delete_at, deserialize, deserialize_collection, load_collection, serialize,
    serialize_collection, ChartCollection,
};
pub use storage::{ChartFiles, ChartStorage, MemoryFiles, MemoryStorage};

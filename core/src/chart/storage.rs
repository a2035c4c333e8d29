use crate::prelude::StorageError;
use std::collections::HashMap;

/// Key-value persistence for chart collections.
pub trait ChartStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Standalone file exchange used for single-chart export and import.
pub trait ChartFiles {
    fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;
    fn pick_and_read(&mut self) -> Result<Vec<u8>, StorageError>;
}

impl<S: ChartStorage + ?Sized> ChartStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, bytes)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// In-memory file exchange. `pick_and_read` hands out queued files in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryFiles {
    written: Vec<(String, Vec<u8>)>,
    pending: Vec<Vec<u8>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, bytes: impl Into<Vec<u8>>) {
        self.pending.push(bytes.into());
    }

    pub fn written(&self) -> &[(String, Vec<u8>)] {
        &self.written
    }
}

impl ChartFiles for MemoryFiles {
    fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.written.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }

    fn pick_and_read(&mut self) -> Result<Vec<u8>, StorageError> {
        if self.pending.is_empty() {
            return Err(StorageError::NothingSelected("no file queued".into()));
        }
        Ok(self.pending.remove(0))
    }
}

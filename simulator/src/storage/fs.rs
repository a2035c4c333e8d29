use conecore::chart::{ChartFiles, ChartStorage};
use conecore::prelude::StorageError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Chart storage keeping each key in `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }
}

impl ChartStorage for DirectoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(path.display(), err)),
        }
    }

    /// Writes through a sibling temp file so readers never see a torn blob.
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|err| StorageError::io(self.root.display(), err))?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(|err| StorageError::io(staging.display(), err))?;
        fs::rename(&staging, &path).map_err(|err| StorageError::io(path.display(), err))
    }
}

/// File exchange backed by an export directory and an optional import path.
#[derive(Debug, Clone)]
pub struct DirectoryFiles {
    export_dir: PathBuf,
    import_path: Option<PathBuf>,
}

impl DirectoryFiles {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            import_path: None,
        }
    }

    pub fn with_import(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_path = Some(path.into());
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

impl ChartFiles for DirectoryFiles {
    fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.export_dir)
            .map_err(|err| StorageError::io(self.export_dir.display(), err))?;
        let path = self.export_dir.join(file_stem(name));
        fs::write(&path, bytes).map_err(|err| StorageError::io(path.display(), err))
    }

    fn pick_and_read(&mut self) -> Result<Vec<u8>, StorageError> {
        let path = self
            .import_path
            .as_ref()
            .ok_or_else(|| StorageError::NothingSelected("no import path given".into()))?;
        fs::read(path).map_err(|err| StorageError::io(path.display(), err))
    }
}

// Chart names become file names; keep them inside the target directory.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conecore::chart::{ChartLibrary, SavedChart};
    use conecore::course::{Cone, ConeType};
    use conecore::geo::GeoCoordinate;
    use tempfile::tempdir;

    fn chart(name: &str) -> SavedChart {
        SavedChart::new(
            name,
            vec![Cone::new(GeoCoordinate::new(40.0, -75.0), ConeType::Starting, 0.0)],
            0.0,
        )
    }

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        assert!(storage.read("savedCharts").unwrap().is_none());
    }

    #[test]
    fn library_persists_across_instances() {
        let dir = tempdir().unwrap();
        let mut library = ChartLibrary::new(DirectoryStorage::new(dir.path().join("store")));
        library.save(chart("one")).unwrap();

        let reopened = ChartLibrary::new(DirectoryStorage::new(dir.path().join("store")));
        assert_eq!(reopened.load().unwrap().len(), 1);
        assert!(dir.path().join("store/savedCharts.json").exists());
        assert!(!dir.path().join("store/savedCharts.json.tmp").exists());
    }

    #[test]
    fn export_and_import_through_files() {
        let dir = tempdir().unwrap();
        let mut library = ChartLibrary::new(DirectoryStorage::new(dir.path()));
        library.save(chart("a/b")).unwrap();
        let mut files = DirectoryFiles::new(dir.path().join("exports"));

        let name = library.export(0, &mut files).unwrap();
        assert_eq!(name, "a/b.json");
        let exported = dir.path().join("exports/a_b.json");
        assert!(exported.exists());

        let mut picker = DirectoryFiles::new(dir.path()).with_import(&exported);
        let imported = library.import(&mut picker).unwrap();
        assert_eq!(imported.name, "a/b");
        assert_eq!(library.load().unwrap().len(), 2);
    }

    #[test]
    fn import_without_path_is_reported() {
        let dir = tempdir().unwrap();
        let mut library = ChartLibrary::new(DirectoryStorage::new(dir.path()));
        let mut files = DirectoryFiles::new(dir.path());
        assert!(library.import(&mut files).is_err());
    }
}

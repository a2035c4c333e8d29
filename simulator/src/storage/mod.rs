pub mod fs;

pub use fs::{DirectoryFiles, DirectoryStorage};

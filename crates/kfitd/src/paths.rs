//! Cross-platform application paths

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the OS data directory. Nothing is created on disk; the service
    /// only reads from here.
    pub fn new() -> Result<Self, String> {
        let base = dirs::data_dir().ok_or("Could not determine data directory")?;
        Ok(Self::with_data_dir(base.join("kfit")))
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }
}

//! Service configuration: `config.json` in the data dir, then env overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const ENV_ADDR: &str = "KFITD_ADDR";
pub const ENV_WWW: &str = "KFITD_WWW";
pub const ENV_MAX_UPLOAD: &str = "KFITD_MAX_UPLOAD";

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_www_dir() -> PathBuf {
    PathBuf::from("www")
}

fn default_max_upload_bytes() -> usize {
    8 * 1024 * 1024
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Static page root (index.html, index.js, pkg/).
    #[serde(default = "default_www_dir")]
    pub www_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Use rayon for the k-means assignment step (needs the `parallel` feature).
    #[serde(default)]
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            www_dir: default_www_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            parallel: false,
        }
    }
}

impl Config {
    /// Read `path` if it exists; a missing file gives the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Apply `KFITD_*` overrides from `lookup` (normally `std::env::var`).
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_ADDR) {
            self.addr = addr;
        }
        if let Some(www) = lookup(ENV_WWW) {
            self.www_dir = PathBuf::from(www);
        }
        if let Some(max) = lookup(ENV_MAX_UPLOAD) {
            self.max_upload_bytes = max.trim().parse().map_err(|_| Error::Config {
                message: format!("{ENV_MAX_UPLOAD} must be a byte count, got {max:?}"),
            })?;
        }
        Ok(self)
    }

    pub fn load(config_file: &Path) -> Result<Self> {
        Self::from_file(config_file)?.with_env(|k| std::env::var(k).ok())
    }
}

//! kfitd - HTTP service behind the plotting page
//!
//! Serves the static page and answers `POST /draw` with an SVG scatter
//! plot, optionally overlaid with k-means cluster centres.
//!
//! Configuration is read from:
//! - Linux: ~/.local/share/kfit/config.json
//! - Windows: %APPDATA%\kfit\config.json
//! - MacOS: ~/Library/Application Support/kfit/config.json
//!
//! and then overridden by `KFITD_ADDR`, `KFITD_WWW` and `KFITD_MAX_UPLOAD`.

pub mod config;
pub mod error;
pub mod paths;
pub mod routes;

pub use config::Config;
pub use error::{Error, Result};
pub use routes::router;

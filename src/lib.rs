//! # kfit
//!
//! Cluster 2-D points from a CSV file with k-means and plot them as SVG.
//!
//! ## Quick Start
//!
//! ```
//! use kfit::prelude::*;
//!
//! let csv = b"x,y\n0,0\n0,1\n10,10\n10,11\n";
//! let data = parse_csv(csv).unwrap();
//! let fit = kmeans::fit(&data, &KMeansConfig::with_k(2)).unwrap();
//! assert_eq!(fit.centers.len(), 2);
//!
//! let svg = kfit::fit_draw(csv, 2, &PlotSpec::default()).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization for points, fit results and plot specs
//! - `parallel`: run the k-means assignment step on rayon's thread pool
//!
//! ## Modules
//!
//! - [`dataset`]: CSV point parsing
//! - [`kmeans`]: Lloyd's algorithm with k-means++ seeding
//! - [`plot`]: layout and SVG rendering

#[path = "core/dataset.rs"]
pub mod dataset;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/float_fmt.rs"]
pub mod float_fmt;

#[path = "core/kmeans.rs"]
pub mod kmeans;

#[path = "core/plot.rs"]
pub mod plot;

#[path = "core/prng.rs"]
pub mod prng;

pub use error::{Error, Result};

/// Prelude module for convenient imports.
///
/// ```
/// use kfit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dataset::{parse_csv, Dataset, Point};
    pub use crate::error::{Error, Result};
    pub use crate::kmeans::{self, ExecutionTier, FitResult, KMeansConfig};
    pub use crate::plot::{Bounds, Graph, Layout, PlotSpec};
}

use dataset::parse_csv;
use kmeans::KMeansConfig;
use plot::{Graph, PlotSpec};

/// Scatter plot of the CSV points, no clustering.
pub fn draw(csv: &[u8], spec: &PlotSpec) -> Result<String> {
    let data = parse_csv(csv)?;
    Graph::new(spec.title.clone(), &data)?.draw_svg(spec, &[])
}

/// Scatter plot of the CSV points with `k` fitted cluster centres overlaid.
pub fn fit_draw(csv: &[u8], k: usize, spec: &PlotSpec) -> Result<String> {
    fit_draw_with(csv, &KMeansConfig::with_k(k), spec)
}

pub fn fit_draw_with(csv: &[u8], cfg: &KMeansConfig, spec: &PlotSpec) -> Result<String> {
    spec.validate()?;
    let data = parse_csv(csv)?;
    let graph = Graph::new(spec.title.clone(), &data)?;
    let fit = kmeans::fit(&data, cfg)?;
    graph.draw_svg(spec, &fit.centers)
}

/// Flattened `[x0, y0, x1, y1, ...]` centres, returned by the browser module's `fit` export.
pub fn fit_centers_flat(csv: &[u8], k: usize) -> Result<Vec<f64>> {
    let data = parse_csv(csv)?;
    let fit = kmeans::fit(&data, &KMeansConfig::with_k(k))?;
    Ok(fit.centers.iter().flat_map(|c| [c.x, c.y]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"x,y\n1,1\n1.5,2\n2,1\n8,8\n8.5,9\n9,8\n";

    #[test]
    fn draw_plots_every_point() {
        let svg = draw(CSV, &PlotSpec::default()).unwrap();
        assert_eq!(svg.matches(r#"r="3""#).count(), 6);
        assert!(!svg.contains("class=\"centers\""));
    }

    #[test]
    fn fit_draw_overlays_centres() {
        let svg = fit_draw(CSV, 2, &PlotSpec::default()).unwrap();
        assert_eq!(svg.matches(r#"r="7""#).count(), 2);
    }

    #[test]
    fn flat_centres_pair_up() {
        let flat = fit_centers_flat(CSV, 2).unwrap();
        assert_eq!(flat.len(), 4);
        let mut xs = vec![flat[0], flat[2]];
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((xs[0] - 1.5).abs() < 1e-9);
        assert!((xs[1] - 8.5).abs() < 1e-9);
    }

    #[test]
    fn errors_propagate() {
        assert!(matches!(
            fit_draw(b"x,y\n1,nope\n", 1, &PlotSpec::default()),
            Err(Error::InvalidNumber { .. })
        ));
        assert!(matches!(
            fit_draw(CSV, 0, &PlotSpec::default()),
            Err(Error::InvalidClusterCount)
        ));
        assert!(matches!(
            draw(b"x,y\n", &PlotSpec::default()),
            Err(Error::EmptyDataset)
        ));
    }
}

//! Lloyd's k-means over 2-D points.
//!
//! Centres are seeded with k-means++ from the crate's xorshift PRNG, so a fit
//! is reproducible for a fixed `seed`. A cluster that loses all its points
//! keeps its previous centre.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Point};
use crate::error::{Error, Result};
use crate::prng::Prng;

pub const DEFAULT_SEED: u64 = 0x6B66_6974;

/// Execution tier for the assignment step.
///
/// - `Scalar`: single-threaded (wasm, small inputs)
/// - `Parallel`: multi-threaded via rayon (requires `parallel` feature)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutionTier {
    #[default]
    Scalar,
    Parallel,
}

impl ExecutionTier {
    /// The tier actually used; `Parallel` degrades to `Scalar` without the feature.
    pub fn effective(self) -> ExecutionTier {
        match self {
            ExecutionTier::Parallel if cfg!(feature = "parallel") => ExecutionTier::Parallel,
            _ => ExecutionTier::Scalar,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KMeansConfig {
    pub k: usize,
    pub max_iterations: usize,
    /// Stop once no centre moves by more than this (euclidean).
    pub tolerance: f64,
    pub seed: u64,
    pub tier: ExecutionTier,
}

impl KMeansConfig {
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tier(mut self, tier: ExecutionTier) -> Self {
        self.tier = tier;
        self
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 1,
            max_iterations: 100,
            tolerance: 1.0e-6,
            seed: DEFAULT_SEED,
            tier: ExecutionTier::Scalar,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitResult {
    pub centers: Vec<Point>,
    /// Index into `centers` for each input point.
    pub assignments: Vec<usize>,
    pub iterations: usize,
    /// Sum of squared distances from each point to its centre.
    pub inertia: f64,
}

pub fn fit(data: &Dataset, cfg: &KMeansConfig) -> Result<FitResult> {
    if cfg.k == 0 {
        return Err(Error::InvalidClusterCount);
    }
    if data.is_empty() {
        return Err(Error::EmptyDataset);
    }
    if data.len() < cfg.k {
        return Err(Error::NotEnoughPoints {
            needed: cfg.k,
            got: data.len(),
        });
    }

    let points = data.points();
    let mut rng = Prng::new(cfg.seed);
    let mut centers = seed_plus_plus(points, cfg.k, &mut rng);
    let mut assignments = vec![0usize; points.len()];
    let tier = cfg.tier.effective();

    let mut iterations = 0;
    while iterations < cfg.max_iterations.max(1) {
        iterations += 1;
        assign(points, &centers, &mut assignments, tier);

        let moved = update_centers(points, &assignments, &mut centers);
        if moved <= cfg.tolerance {
            break;
        }
    }

    // Final assignment against the converged centres.
    assign(points, &centers, &mut assignments, tier);
    let inertia = points
        .iter()
        .zip(&assignments)
        .map(|(p, &c)| p.dist2(&centers[c]))
        .sum();

    Ok(FitResult {
        centers,
        assignments,
        iterations,
        inertia,
    })
}

fn seed_plus_plus(points: &[Point], k: usize, rng: &mut Prng) -> Vec<Point> {
    let mut centers = Vec::with_capacity(k);
    centers.push(points[rng.gen_range_usize(0, points.len())]);

    let mut d2: Vec<f64> = points.iter().map(|p| p.dist2(&centers[0])).collect();
    while centers.len() < k {
        let total: f64 = d2.iter().sum();
        let idx = if total > 0.0 && total.is_finite() {
            let mut target = rng.next_f64_01() * total;
            let mut chosen = points.len() - 1;
            for (i, &w) in d2.iter().enumerate() {
                if target < w {
                    chosen = i;
                    break;
                }
                target -= w;
            }
            chosen
        } else {
            // All remaining points coincide with a centre.
            rng.gen_range_usize(0, points.len())
        };

        let c = points[idx];
        centers.push(c);
        for (d, p) in d2.iter_mut().zip(points) {
            *d = d.min(p.dist2(&c));
        }
    }
    centers
}

#[inline]
fn nearest(p: &Point, centers: &[Point]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = p.dist2(c);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

fn assign(points: &[Point], centers: &[Point], out: &mut [usize], tier: ExecutionTier) {
    match tier {
        #[cfg(feature = "parallel")]
        ExecutionTier::Parallel => {
            out.par_iter_mut()
                .zip(points.par_iter())
                .for_each(|(slot, p)| *slot = nearest(p, centers));
        }
        _ => {
            for (slot, p) in out.iter_mut().zip(points) {
                *slot = nearest(p, centers);
            }
        }
    }
}

/// Recompute centres as cluster means. Returns the largest centre shift.
fn update_centers(points: &[Point], assignments: &[usize], centers: &mut [Point]) -> f64 {
    let k = centers.len();
    let mut sum = vec![(0.0f64, 0.0f64); k];
    let mut count = vec![0usize; k];
    for (p, &c) in points.iter().zip(assignments) {
        sum[c].0 += p.x;
        sum[c].1 += p.y;
        count[c] += 1;
    }

    let mut moved = 0.0f64;
    for i in 0..k {
        if count[i] == 0 {
            continue;
        }
        let n = count[i] as f64;
        let next = Point::new(sum[i].0 / n, sum[i].1 / n);
        moved = moved.max(next.dist2(&centers[i]).sqrt());
        centers[i] = next;
    }
    moved
}

//! Density-based spatial clustering (DBSCAN) over agent positions.
//!
//! A point with at least `min_samples` points (itself included) within `eps` is a
//! core point. Core points within `eps` of each other share a cluster; a non-core
//! point within `eps` of a core point joins the first cluster that reaches it.
//! Clusters are expanded one at a time, seeded from the lowest unlabeled core
//! index, so a border point between two clusters always takes the lower id.

use crate::grid::SpatialGrid;
use flock_common::{ClusterParams, Vec2};
use log::trace;
use rayon::prelude::*;

/// Label of a point that belongs to no cluster.
pub const NOISE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterResult {
    /// Number of distinct non-noise labels.
    pub count: usize,
    /// Per-point cluster id in `0..count`, or [`NOISE`].
    pub labels: Vec<i32>,
}

impl ClusterResult {
    fn all_noise(n: usize) -> Self {
        Self { count: 0, labels: vec![NOISE; n] }
    }

    pub fn is_noise(&self, idx: usize) -> bool {
        self.labels.get(idx).map_or(true, |&label| label == NOISE)
    }

    /// Cluster id of point `idx`, or `None` for noise.
    pub fn label(&self, idx: usize) -> Option<usize> {
        self.labels.get(idx).and_then(|&label| usize::try_from(label).ok())
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|&&label| label == NOISE).count()
    }

    /// Member count per cluster id.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.count];
        for label in self.labels.iter().filter_map(|&label| usize::try_from(label).ok()) {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Stateless clustering pass; every call recomputes from the given positions.
#[derive(Debug, Clone)]
pub struct ClusterDetector {
    params: ClusterParams,
}

impl ClusterDetector {
    pub fn new(params: ClusterParams) -> Self {
        Self { params }
    }

    pub fn detect(&self, positions: &[Vec2]) -> ClusterResult {
        let n = positions.len();
        let min_samples = self.params.min_samples;
        if n == 0 || n < min_samples {
            return ClusterResult::all_noise(n);
        }

        let neighborhoods = self.neighborhoods(positions);
        let is_core: Vec<bool> = neighborhoods.iter().map(|nb| nb.len() >= min_samples).collect();

        let mut labels = vec![NOISE; n];
        let mut count = 0usize;
        let mut stack = Vec::new();
        for seed in 0..n {
            if labels[seed] != NOISE || !is_core[seed] {
                continue;
            }
            let cluster_id = count as i32;
            labels[seed] = cluster_id;
            stack.push(seed);
            // Only core points are pushed, so every popped point expands.
            while let Some(point) = stack.pop() {
                for &neighbor in &neighborhoods[point] {
                    if labels[neighbor] == NOISE {
                        labels[neighbor] = cluster_id;
                        if is_core[neighbor] {
                            stack.push(neighbor);
                        }
                    }
                }
            }
            count += 1;
        }

        trace!(
            "Cluster pass: {} points, {} core, {} clusters (eps={}, min_samples={}).",
            n,
            is_core.iter().filter(|&&core| core).count(),
            count,
            self.params.eps,
            min_samples
        );
        ClusterResult { count, labels }
    }

    /// Region query for every point, over an immutable snapshot (Parallel).
    fn neighborhoods(&self, positions: &[Vec2]) -> Vec<Vec<usize>> {
        let eps = self.params.eps;
        let grid = SpatialGrid::build(positions, eps);
        positions
            .par_iter()
            .map(|&pos| {
                let mut neighbors = Vec::new();
                grid.for_each_within(pos, eps, positions, |idx| neighbors.push(idx));
                neighbors.sort_unstable();
                neighbors
            })
            .collect()
    }
}

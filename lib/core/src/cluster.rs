//! K-Means cluster assignment over TF-IDF vectors.
//!
//! Lloyd's algorithm with k-means++ seeding. Documents stay sparse;
//! centroids are dense over the vocabulary.

use crate::vector::SparseVector;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub n_clusters: usize,
    /// Seed for k-means++ initialization
    pub seed: u64,
    /// Independent restarts; the lowest-inertia run wins
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold on centroid movement
    pub tol: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            n_clusters: 10,
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
        }
    }
}

/// Result of a k-means fit
#[derive(Debug, Clone)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f32>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f32,
    pub n_iter: usize,
}

impl Clustering {
    /// Number of documents per cluster
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

pub struct KMeans {
    config: ClusterConfig,
}

impl KMeans {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Fit over `vectors` living in a `dims`-dimensional space
    pub fn fit(&self, vectors: &[SparseVector], dims: usize) -> Result<Clustering> {
        let k = self.config.n_clusters;
        if k == 0 {
            return Err(Error::InvalidConfig("n_clusters must be at least 1".to_string()));
        }
        if vectors.len() < k {
            return Err(Error::InvalidConfig(format!(
                "n_clusters ({}) exceeds number of documents ({})",
                k,
                vectors.len()
            )));
        }

        let norms: Vec<f32> = vectors.iter().map(|v| v.dot(v)).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut best: Option<Clustering> = None;
        for _ in 0..self.config.n_init.max(1) {
            let centroids = self.init_centroids(vectors, &norms, dims, &mut rng);
            let run = self.lloyd(vectors, &norms, centroids);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        best.ok_or_else(|| Error::InvalidConfig("k-means produced no run".to_string()))
    }

    /// k-means++ seeding: each new centroid is drawn with probability
    /// proportional to its squared distance from the nearest existing one
    fn init_centroids(
        &self,
        vectors: &[SparseVector],
        norms: &[f32],
        dims: usize,
        rng: &mut StdRng,
    ) -> Vec<Vec<f32>> {
        let n = vectors.len();
        let mut centroids = Vec::with_capacity(self.config.n_clusters);
        let first = densify(&vectors[rng.random_range(0..n)], dims);
        let first_norm = dense_sq_norm(&first);

        let mut min_dist: Vec<f32> = vectors
            .par_iter()
            .zip(norms.par_iter())
            .map(|(v, &vn)| sq_distance(v, vn, &first, first_norm))
            .collect();
        centroids.push(first);

        while centroids.len() < self.config.n_clusters {
            let total: f32 = min_dist.iter().sum();
            let chosen = if total <= f32::EPSILON {
                rng.random_range(0..n)
            } else {
                let mut target = rng.random::<f32>() * total;
                let mut chosen = n - 1;
                for (i, &d) in min_dist.iter().enumerate() {
                    if target < d {
                        chosen = i;
                        break;
                    }
                    target -= d;
                }
                chosen
            };

            let centroid = densify(&vectors[chosen], dims);
            let cn = dense_sq_norm(&centroid);
            min_dist
                .par_iter_mut()
                .zip(vectors.par_iter().zip(norms.par_iter()))
                .for_each(|(d, (v, &vn))| {
                    *d = d.min(sq_distance(v, vn, &centroid, cn));
                });
            centroids.push(centroid);
        }

        centroids
    }

    fn lloyd(
        &self,
        vectors: &[SparseVector],
        norms: &[f32],
        mut centroids: Vec<Vec<f32>>,
    ) -> Clustering {
        let mut n_iter = 0;

        for iter in 0..self.config.max_iter {
            let labels: Vec<usize> = assign(vectors, norms, &centroids)
                .into_iter()
                .map(|(label, _)| label)
                .collect();

            let updated = update_centroids(vectors, &labels, &centroids);
            let shift: f32 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| old.iter().zip(new).map(|(a, b)| (a - b) * (a - b)).sum::<f32>())
                .sum();
            centroids = updated;
            n_iter = iter + 1;

            if shift <= self.config.tol * self.config.tol {
                break;
            }
        }

        let assignment = assign(vectors, norms, &centroids);
        let inertia = assignment.iter().map(|&(_, d)| d).sum();
        let labels = assignment.into_iter().map(|(label, _)| label).collect();

        Clustering {
            labels,
            centroids,
            inertia,
            n_iter,
        }
    }
}

fn densify(vector: &SparseVector, dims: usize) -> Vec<f32> {
    let mut dense = vec![0.0; dims];
    for (idx, value) in vector.iter() {
        if let Some(slot) = dense.get_mut(idx as usize) {
            *slot = value;
        }
    }
    dense
}

#[inline]
fn dense_sq_norm(dense: &[f32]) -> f32 {
    dense.iter().map(|x| x * x).sum()
}

/// `||v - c||^2` expanded so only the sparse entries of `v` are touched
#[inline]
fn sq_distance(vector: &SparseVector, vector_sq_norm: f32, centroid: &[f32], centroid_sq_norm: f32) -> f32 {
    (vector_sq_norm - 2.0 * vector.dot_dense(centroid) + centroid_sq_norm).max(0.0)
}

/// Nearest centroid and squared distance for every vector; ties go to the lower cluster
fn assign(vectors: &[SparseVector], norms: &[f32], centroids: &[Vec<f32>]) -> Vec<(usize, f32)> {
    let centroid_norms: Vec<f32> = centroids.iter().map(|c| dense_sq_norm(c)).collect();
    vectors
        .par_iter()
        .zip(norms.par_iter())
        .map(|(v, &vn)| {
            let mut best = (0, f32::INFINITY);
            for (k, (c, &cn)) in centroids.iter().zip(&centroid_norms).enumerate() {
                let d = sq_distance(v, vn, c, cn);
                if d < best.1 {
                    best = (k, d);
                }
            }
            best
        })
        .collect()
}

/// Mean of assigned members; an emptied cluster keeps its previous centroid
fn update_centroids(vectors: &[SparseVector], labels: &[usize], previous: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let dims = previous.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0f32; dims]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (vector, &label) in vectors.iter().zip(labels) {
        counts[label] += 1;
        for (idx, value) in vector.iter() {
            if let Some(slot) = sums[label].get_mut(idx as usize) {
                *slot += value;
            }
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((mut sum, count), prev)| {
            if count == 0 {
                prev.clone()
            } else {
                let inv = 1.0 / count as f32;
                sum.iter_mut().for_each(|x| *x *= inv);
                sum
            }
        })
        .collect()
}

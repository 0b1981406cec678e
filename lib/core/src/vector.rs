use serde::{Deserialize, Serialize};

/// A sparse vector of term weights, indices strictly increasing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from `(dimension, weight)` pairs. Pairs are sorted, duplicate
    /// dimensions summed, zero weights dropped.
    #[must_use]
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(idx, _)| idx);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }

        let mut v = Self { indices, values };
        v.prune_zeros();
        v
    }

    fn prune_zeros(&mut self) {
        if self.values.iter().all(|&v| v != 0.0) {
            return;
        }
        let (indices, values) = self
            .indices
            .iter()
            .zip(&self.values)
            .filter(|(_, &v)| v != 0.0)
            .map(|(&i, &v)| (i, v))
            .unzip();
        self.indices = indices;
        self.values = values;
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Sparse dot product by merging the two index lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Dot product against a dense vector (k-means centroids)
    #[inline]
    pub fn dot_dense(&self, dense: &[f32]) -> f32 {
        self.iter()
            .filter_map(|(idx, v)| dense.get(idx as usize).map(|d| v * d))
            .sum()
    }

    /// Cosine similarity; zero when either side has no weight
    #[inline]
    pub fn cosine_similarity(&self, other: &SparseVector) -> f32 {
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        self.dot(other) / (norm_a * norm_b)
    }

    /// Normalize the vector to unit length
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.values {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

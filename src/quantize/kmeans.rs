//! Mini-batch K-means over 3-channel color points.
//!
//! Each step draws a random batch, assigns it to the nearest centers and
//! moves every touched center towards the batch mean with a per-center
//! learning rate of `1 / count`. Centers are seeded with k-means++ on a
//! random subsample. Results vary between runs unless a seed is set.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ReduceError;

pub type Point = [f32; 3];

/// Squared Euclidean distance.
#[inline]
fn dist2(a: &Point, b: &Point) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index of the closest center and the squared distance to it.
#[inline]
fn nearest(point: &Point, centers: &[Point]) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for (i, c) in centers.iter().enumerate() {
        let d = dist2(point, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MiniBatchKMeans {
    k: usize,
    batch_size: usize,
    max_iter: usize,
    max_no_improvement: usize,
    seed: Option<u64>,
}

impl MiniBatchKMeans {
    pub const DEFAULT_BATCH_SIZE: usize = 1024;
    pub const DEFAULT_MAX_ITER: usize = 100;
    pub const DEFAULT_MAX_NO_IMPROVEMENT: usize = 10;

    pub fn new(k: usize) -> Self {
        Self {
            k,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            max_iter: Self::DEFAULT_MAX_ITER,
            max_no_improvement: Self::DEFAULT_MAX_NO_IMPROVEMENT,
            seed: None,
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Upper bound on full passes over the data.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    /// Stop after this many steps without improvement of the smoothed
    /// batch inertia. `0` disables early stopping.
    pub fn max_no_improvement(mut self, steps: usize) -> Self {
        self.max_no_improvement = steps;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn fit(&self, points: &[Point]) -> Result<FittedModel, ReduceError> {
        if self.k == 0 {
            return Err(ReduceError::InvalidColorCount(0));
        }
        if points.is_empty() {
            return Err(ReduceError::EmptyImage);
        }
        if self.k > points.len() {
            return Err(ReduceError::TooManyColors {
                k: self.k,
                pixels: points.len(),
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let n = points.len();

        let init_size = self
            .batch_size
            .saturating_mul(3)
            .max(self.k.saturating_mul(3))
            .min(n);
        let sample: Vec<Point> = rand::seq::index::sample(&mut rng, n, init_size)
            .into_iter()
            .map(|i| points[i])
            .collect();
        let mut centers = kmeans_plus_plus(&sample, self.k, &mut rng);
        let mut counts = vec![0u64; self.k];

        let batch_size = self.batch_size.min(n);
        let n_steps = (self.max_iter.saturating_mul(n) / batch_size).max(1);
        let alpha = (2.0 * batch_size as f64 / (n as f64 + 1.0)).min(1.0);

        let mut ewa_inertia: Option<f64> = None;
        let mut best_inertia = f64::INFINITY;
        let mut no_improvement = 0;
        let mut sums = vec![[0f32; 3]; self.k];
        let mut batch_counts = vec![0u64; self.k];
        let mut steps = 0;

        for _ in 0..n_steps {
            steps += 1;
            sums.iter_mut().for_each(|s| *s = [0.0; 3]);
            batch_counts.iter_mut().for_each(|c| *c = 0);

            let mut inertia = 0f64;
            for _ in 0..batch_size {
                let p = &points[rng.gen_range(0..n)];
                let (label, d) = nearest(p, &centers);
                inertia += d as f64;
                batch_counts[label] += 1;
                for ch in 0..3 {
                    sums[label][ch] += p[ch];
                }
            }

            for (c, center) in centers.iter_mut().enumerate() {
                let m = batch_counts[c];
                if m == 0 {
                    continue;
                }
                counts[c] += m;
                let total = counts[c] as f32;
                for ch in 0..3 {
                    center[ch] += (sums[c][ch] - m as f32 * center[ch]) / total;
                }
            }

            let inertia = inertia / batch_size as f64;
            let ewa = match ewa_inertia {
                None => inertia,
                Some(prev) => prev * (1.0 - alpha) + inertia * alpha,
            };
            ewa_inertia = Some(ewa);

            if ewa < best_inertia {
                best_inertia = ewa;
                no_improvement = 0;
            } else {
                no_improvement += 1;
                if self.max_no_improvement > 0 && no_improvement >= self.max_no_improvement {
                    log::debug!("k-means converged after {steps} steps");
                    break;
                }
            }
        }

        log::debug!(
            "k-means: {} centers, {steps}/{n_steps} steps, smoothed inertia {:.6}",
            self.k,
            best_inertia
        );
        Ok(FittedModel { centers, steps })
    }
}

/// k-means++ seeding. When every candidate already coincides with a chosen
/// center, the remaining centers are drawn uniformly.
fn kmeans_plus_plus(sample: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut centers = Vec::with_capacity(k);
    centers.push(sample[rng.gen_range(0..sample.len())]);
    let mut dists: Vec<f32> = sample.iter().map(|p| dist2(p, &centers[0])).collect();

    while centers.len() < k {
        let total: f64 = dists.iter().map(|&d| d as f64).sum();
        let next = if total <= 0.0 {
            rng.gen_range(0..sample.len())
        } else {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = sample.len() - 1;
            for (i, &d) in dists.iter().enumerate() {
                target -= d as f64;
                if target <= 0.0 && d > 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        };
        let center = sample[next];
        for (d, p) in dists.iter_mut().zip(sample) {
            *d = d.min(dist2(p, &center));
        }
        centers.push(center);
    }
    centers
}

// ---------------------------------------------------------------------------
// Fitted model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FittedModel {
    centers: Vec<Point>,
    steps: usize,
}

impl FittedModel {
    pub fn centers(&self) -> &[Point] {
        &self.centers
    }

    /// Mini-batch steps actually run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Label of the nearest center for every point.
    pub fn predict(&self, points: &[Point]) -> Vec<usize> {
        points.iter().map(|p| nearest(p, &self.centers).0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn two_blobs() -> Vec<Point> {
        let mut points = Vec::new();
        for i in 0..200 {
            let jitter = (i % 10) as f32 * 0.001;
            points.push([0.1 + jitter, 0.1, 0.1 - jitter]);
            points.push([0.9 - jitter, 0.8, 0.9 + jitter / 2.0]);
        }
        points
    }

    #[test]
    fn separates_well_spaced_groups() {
        let points = two_blobs();
        let model = MiniBatchKMeans::new(2)
            .batch_size(64)
            .seed(Some(7))
            .fit(&points)
            .unwrap();
        let labels = model.predict(&points);
        assert_eq!(labels.len(), points.len());
        for pair in labels.chunks(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert!(labels.iter().step_by(2).all(|&l| l == labels[0]));
    }

    #[test]
    fn returns_exactly_k_centers_inside_unit_cube() {
        let points = two_blobs();
        let model = MiniBatchKMeans::new(5).fit(&points).unwrap();
        assert_eq!(model.centers().len(), 5);
        assert!(model
            .centers()
            .iter()
            .flatten()
            .all(|c| (0.0..=1.0).contains(c)));
        assert!(model.steps() >= 1);
    }

    #[test]
    fn more_clusters_than_distinct_points_is_fine() {
        let points = vec![[0.2, 0.4, 0.6]; 50];
        let model = MiniBatchKMeans::new(8).seed(Some(1)).fit(&points).unwrap();
        let labels = model.predict(&points);
        let used: HashSet<usize> = labels.into_iter().collect();
        assert!(used.len() <= 8);
        for &label in &used {
            let c = model.centers()[label];
            assert!(dist2(&c, &[0.2, 0.4, 0.6]) < 1e-8, "{c:?}");
        }
    }

    #[test]
    fn rejects_zero_clusters_and_empty_input() {
        assert!(matches!(
            MiniBatchKMeans::new(0).fit(&two_blobs()),
            Err(ReduceError::InvalidColorCount(0))
        ));
        assert!(matches!(
            MiniBatchKMeans::new(3).fit(&[]),
            Err(ReduceError::EmptyImage)
        ));
    }

    #[test]
    fn rejects_more_clusters_than_pixels() {
        let points = [[0.1, 0.2, 0.3]; 4];
        assert!(matches!(
            MiniBatchKMeans::new(usize::MAX / 2).fit(&points),
            Err(ReduceError::TooManyColors { k, pixels: 4 }) if k == usize::MAX / 2
        ));
        assert!(matches!(
            MiniBatchKMeans::new(5).fit(&points),
            Err(ReduceError::TooManyColors { k: 5, pixels: 4 })
        ));
        assert!(MiniBatchKMeans::new(4).fit(&points).is_ok());
    }

    #[test]
    fn huge_iteration_and_batch_limits_do_not_overflow() {
        let points = two_blobs();
        let model = MiniBatchKMeans::new(2)
            .max_iter(usize::MAX)
            .batch_size(usize::MAX)
            .seed(Some(5))
            .fit(&points)
            .unwrap();
        assert_eq!(model.centers().len(), 2);
    }

    #[test]
    fn early_stopping_can_be_disabled() {
        let points = vec![[0.5, 0.5, 0.5]; 64];
        let stopped = MiniBatchKMeans::new(1)
            .batch_size(16)
            .max_iter(2)
            .seed(Some(9))
            .fit(&points)
            .unwrap();
        let full = MiniBatchKMeans::new(1)
            .batch_size(16)
            .max_iter(2)
            .max_no_improvement(0)
            .seed(Some(9))
            .fit(&points)
            .unwrap();
        assert_eq!(full.steps(), 8);
        assert!(stopped.steps() <= full.steps());
    }

    #[test]
    fn same_seed_gives_same_centers() {
        let points = two_blobs();
        let a = MiniBatchKMeans::new(3).seed(Some(42)).fit(&points).unwrap();
        let b = MiniBatchKMeans::new(3).seed(Some(42)).fit(&points).unwrap();
        assert_eq!(a.centers(), b.centers());
    }
}

//! K-means palette generation.
//!
//! Lloyd's algorithm (or a mini-batch variant) over flat color points.
//! Unseeded runs use k-means++ initialization and keep the best of several
//! restarts; seeded runs start from the given palette and run once.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::PaletteError;
use super::palette::{distance_squared, Palette};

/// K-means clustering configuration.
///
/// # Defaults
///
/// - 10 restarts (unseeded runs only)
/// - 300 Lloyd iterations, 100 for mini-batch
/// - tolerance 1e-4, relative to the mean channel variance of the points
/// - mini-batch size 1024
/// - RNG seed 0, so repeated runs over the same pixels give the same palette
///
/// # Example
///
/// ```
/// use snes_gfx::palette::KMeans;
///
/// let points = [0.0, 0.0, 0.0, 0.1, 0.0, 0.0, 0.9, 1.0, 1.0, 1.0, 1.0, 1.0];
/// let palette = KMeans::new(2).fit(&points, 3, None).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    clusters: usize,
    mini_batch: bool,
    restarts: usize,
    max_iterations: Option<usize>,
    tolerance: f64,
    batch_size: usize,
    rng_seed: u64,
}

impl KMeans {
    /// Cluster into `clusters` colors with default settings.
    pub fn new(clusters: usize) -> Self {
        Self {
            clusters,
            mini_batch: false,
            restarts: 10,
            max_iterations: None,
            tolerance: 1e-4,
            batch_size: 1024,
            rng_seed: 0,
        }
    }

    /// Use mini-batch updates instead of full Lloyd iterations.
    #[inline]
    pub fn mini_batch(mut self, enabled: bool) -> Self {
        self.mini_batch = enabled;
        self
    }

    /// Number of k-means++ restarts for unseeded runs (at least 1).
    #[inline]
    pub fn restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts.max(1);
        self
    }

    /// Iteration cap per run.
    #[inline]
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    #[inline]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Seed for the k-means++ and mini-batch sampling RNG.
    #[inline]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    #[inline]
    pub fn clusters(&self) -> usize {
        self.clusters
    }

    /// Cluster `points` and return exactly `clusters` centroids.
    ///
    /// Points are clamped to `[0, 1]` before fitting and the centroids are
    /// clamped again afterwards. Without a seed, when the points contain no
    /// more distinct colors than requested, those colors are returned
    /// directly (in order of first appearance) and repeated to fill the
    /// palette. With a seed, entry `i` of the result is the centroid that
    /// started at seed entry `i`; entries no point is nearest to keep their
    /// seed color.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::NoPoints`] if `points` holds no complete point
    /// - [`PaletteError::SeedChannels`] if `seed` has a different channel count
    pub fn fit(
        &self,
        points: &[f32],
        channels: usize,
        seed: Option<&Palette>,
    ) -> Result<Palette, PaletteError> {
        if self.clusters == 0 {
            return Err(PaletteError::Empty);
        }
        if channels == 0 || points.len() < channels {
            return Err(PaletteError::NoPoints);
        }
        if let Some(seed) = seed {
            if seed.channels() != channels {
                return Err(PaletteError::SeedChannels {
                    seed: seed.channels(),
                    points: channels,
                });
            }
        }

        let usable = points.len() - points.len() % channels;
        // + 0.0 folds -0.0 into 0.0 so equal colors hash equally
        let clipped: Vec<f32> = points[..usable]
            .iter()
            .map(|v| v.clamp(0.0, 1.0) + 0.0)
            .collect();

        // A seed fixes index order, so it always goes through clustering
        if seed.is_none() {
            if let Some(distinct) = distinct_colors(&clipped, channels, self.clusters) {
                tracing::trace!(
                    distinct = distinct.len() / channels,
                    clusters = self.clusters,
                    "few distinct colors, skipping clustering"
                );
                return Ok(Palette::new(distinct, channels)?.resized(self.clusters));
            }
        }

        let tolerance = self.tolerance * mean_variance(&clipped, channels);
        let mut rng = StdRng::seed_from_u64(self.rng_seed);

        let centroids = match seed {
            Some(seed) => {
                let init = seed.resized(self.clusters).as_slice().to_vec();
                self.run(&clipped, channels, init, tolerance, &mut rng).0
            }
            None => {
                let init = kmeans_plus_plus(&clipped, channels, self.clusters, &mut rng);
                let mut best = self.run(&clipped, channels, init, tolerance, &mut rng);
                for _ in 1..self.restarts {
                    let init = kmeans_plus_plus(&clipped, channels, self.clusters, &mut rng);
                    let candidate = self.run(&clipped, channels, init, tolerance, &mut rng);
                    if candidate.1 < best.1 {
                        best = candidate;
                    }
                }
                best.0
            }
        };

        Ok(Palette::new(centroids, channels)?.clamped())
    }

    /// One clustering run from `centroids`; returns the centroids and their inertia.
    fn run(
        &self,
        points: &[f32],
        channels: usize,
        centroids: Vec<f32>,
        tolerance: f64,
        rng: &mut StdRng,
    ) -> (Vec<f32>, f64) {
        let centroids = if self.mini_batch {
            let iterations = self.max_iterations.unwrap_or(100);
            mini_batch(points, channels, centroids, iterations, self.batch_size, tolerance, rng)
        } else {
            let iterations = self.max_iterations.unwrap_or(300);
            lloyd(points, channels, centroids, iterations, tolerance)
        };
        let inertia = inertia(points, channels, &centroids);
        (centroids, inertia)
    }
}

/// Distinct colors of `points` in first-appearance order, or `None` once
/// there are more than `limit` of them.
fn distinct_colors(points: &[f32], channels: usize, limit: usize) -> Option<Vec<f32>> {
    let bits: Vec<u32> = points.iter().map(|v| v.to_bits()).collect();
    let mut seen: HashSet<&[u32]> = HashSet::new();
    let mut distinct = Vec::new();

    for (key, color) in bits
        .chunks_exact(channels)
        .zip(points.chunks_exact(channels))
    {
        if seen.insert(key) {
            if seen.len() > limit {
                return None;
            }
            distinct.extend_from_slice(color);
        }
    }

    Some(distinct)
}

/// Nearest centroid and its squared distance; lowest index on ties.
#[inline]
fn nearest(centroids: &[f32], channels: usize, point: &[f32]) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.chunks_exact(channels).enumerate() {
        let d = distance_squared(point, c);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
        }
    }
    (best_idx, best_dist)
}

fn inertia(points: &[f32], channels: usize, centroids: &[f32]) -> f64 {
    points
        .chunks_exact(channels)
        .map(|p| nearest(centroids, channels, p).1 as f64)
        .sum()
}

fn mean_variance(points: &[f32], channels: usize) -> f64 {
    let n = (points.len() / channels) as f64;
    let mut total = 0.0;
    for c in 0..channels {
        let column = || points.iter().skip(c).step_by(channels).map(|&v| v as f64);
        let mean = column().sum::<f64>() / n;
        total += column().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    }
    total / channels as f64
}

fn shift(old: &[f32], new: &[f32]) -> f64 {
    old.iter()
        .zip(new)
        .map(|(a, b)| ((a - b) as f64).powi(2))
        .sum()
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the closest chosen one.
fn kmeans_plus_plus(points: &[f32], channels: usize, k: usize, rng: &mut StdRng) -> Vec<f32> {
    let n = points.len() / channels;
    let point = |i: usize| &points[i * channels..(i + 1) * channels];

    let mut centroids = Vec::with_capacity(k * channels);
    centroids.extend_from_slice(point(rng.gen_range(0..n)));

    let mut dist: Vec<f64> = (0..n)
        .map(|i| distance_squared(point(i), &centroids[..channels]) as f64)
        .collect();

    for _ in 1..k {
        let total: f64 = dist.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = n - 1;
            for (i, &d) in dist.iter().enumerate() {
                if target < d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        } else {
            rng.gen_range(0..n)
        };

        let new = point(chosen);
        centroids.extend_from_slice(new);
        for (i, d) in dist.iter_mut().enumerate() {
            *d = d.min(distance_squared(point(i), new) as f64);
        }
    }

    centroids
}

/// Full-batch Lloyd iterations. Empty clusters keep their previous centroid.
fn lloyd(
    points: &[f32],
    channels: usize,
    mut centroids: Vec<f32>,
    max_iterations: usize,
    tolerance: f64,
) -> Vec<f32> {
    let k = centroids.len() / channels;
    let mut sums = vec![0.0f64; k * channels];
    let mut counts = vec![0usize; k];

    for _ in 0..max_iterations {
        sums.fill(0.0);
        counts.fill(0);

        for p in points.chunks_exact(channels) {
            let (c, _) = nearest(&centroids, channels, p);
            counts[c] += 1;
            for (s, &v) in sums[c * channels..(c + 1) * channels].iter_mut().zip(p) {
                *s += v as f64;
            }
        }

        let mut updated = centroids.clone();
        for c in 0..k {
            if counts[c] == 0 {
                continue;
            }
            for ch in 0..channels {
                updated[c * channels + ch] = (sums[c * channels + ch] / counts[c] as f64) as f32;
            }
        }

        let moved = shift(&centroids, &updated);
        centroids = updated;
        if moved <= tolerance {
            break;
        }
    }

    centroids
}

/// Mini-batch k-means with per-centroid learning rate `1 / count`.
fn mini_batch(
    points: &[f32],
    channels: usize,
    mut centroids: Vec<f32>,
    max_iterations: usize,
    batch_size: usize,
    tolerance: f64,
    rng: &mut StdRng,
) -> Vec<f32> {
    let n = points.len() / channels;
    let k = centroids.len() / channels;
    let mut counts = vec![0usize; k];

    for _ in 0..max_iterations {
        let before = centroids.clone();

        for _ in 0..batch_size {
            let i = rng.gen_range(0..n);
            let p = &points[i * channels..(i + 1) * channels];
            let (c, _) = nearest(&centroids, channels, p);
            counts[c] += 1;
            let eta = 1.0 / counts[c] as f32;
            for (v, &x) in centroids[c * channels..(c + 1) * channels]
                .iter_mut()
                .zip(p)
            {
                *v += eta * (x - *v);
            }
        }

        if shift(&before, &centroids) <= tolerance {
            break;
        }
    }

    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(colors: &[[f32; 3]]) -> Vec<f32> {
        colors.iter().flatten().copied().collect()
    }

    /// Two tight blobs around dark red and light blue.
    fn two_blobs() -> Vec<f32> {
        let mut colors = Vec::new();
        for i in 0..20 {
            let j = i as f32 * 0.002;
            colors.push([0.6 + j, 0.1, 0.1 - j]);
            colors.push([0.2, 0.5 - j, 0.9 + j]);
        }
        flat(&colors)
    }

    #[test]
    fn test_returns_exact_count_with_few_distinct_colors() {
        let points = flat(&[[0.2, 0.4, 0.6]; 30]);
        for clusters in [4, 16, 256] {
            let palette = KMeans::new(clusters).fit(&points, 3, None).unwrap();
            assert_eq!(palette.len(), clusters);
            assert!(palette.iter().all(|c| c == [0.2, 0.4, 0.6]));
        }
    }

    #[test]
    fn test_fewer_points_than_clusters() {
        let points = flat(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.5, 0.0, 0.5]]);
        let palette = KMeans::new(16).fit(&points, 3, None).unwrap();
        assert_eq!(palette.len(), 16);
        // Distinct colors come first, then repeat
        assert_eq!(palette.color(0), &[0.0, 0.0, 0.0]);
        assert_eq!(palette.color(2), &[0.5, 0.0, 0.5]);
        assert_eq!(palette.color(3), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_finds_two_clusters() {
        let palette = KMeans::new(2).fit(&two_blobs(), 3, None).unwrap();
        assert_eq!(palette.len(), 2);
        let red = palette.find_nearest(&[0.62, 0.1, 0.08]);
        let blue = palette.find_nearest(&[0.2, 0.48, 0.92]);
        assert_ne!(red, blue);
        assert!((palette.color(red)[0] - 0.619).abs() < 0.01);
        assert!((palette.color(blue)[2] - 0.919).abs() < 0.01);
    }

    #[test]
    fn test_mini_batch_finds_two_clusters() {
        let palette = KMeans::new(2)
            .mini_batch(true)
            .batch_size(64)
            .fit(&two_blobs(), 3, None)
            .unwrap();
        let red = palette.find_nearest(&[0.62, 0.1, 0.08]);
        let blue = palette.find_nearest(&[0.2, 0.48, 0.92]);
        assert_ne!(red, blue);
        assert!((palette.color(red)[0] - 0.62).abs() < 0.05);
    }

    #[test]
    fn test_seed_initializes_centroids() {
        // Seed order decides which cluster lands on which index
        let seed = Palette::from_colors(&[[0.2, 0.5, 0.9], [0.6, 0.1, 0.1]]);
        let palette = KMeans::new(2).fit(&two_blobs(), 3, Some(&seed)).unwrap();
        assert!(palette.color(0)[2] > 0.8, "index 0 should stay blue");
        assert!(palette.color(1)[0] > 0.5, "index 1 should stay red");
    }

    #[test]
    fn test_seed_order_kept_with_few_distinct_colors() {
        let red = [0.6, 0.1, 0.1];
        let blue = [0.2, 0.5, 0.9];
        let points = flat(&[red, red, blue, red, blue]);
        let seed = Palette::from_colors(&[[0.1, 0.4, 1.0], [0.7, 0.0, 0.2]]);

        let palette = KMeans::new(2).fit(&points, 3, Some(&seed)).unwrap();
        assert_eq!(palette, Palette::from_colors(&[blue, red]));

        // Unused seed entries stay where they were
        let seed = Palette::from_colors(&[blue, [0.0, 1.0, 0.0], red, [1.0, 1.0, 1.0]]);
        let palette = KMeans::new(4).fit(&points, 3, Some(&seed)).unwrap();
        assert_eq!(palette, seed);
    }

    #[test]
    fn test_seed_channel_mismatch() {
        let seed = Palette::new(vec![0.0, 0.0, 0.0, 0.0], 4).unwrap();
        assert_eq!(
            KMeans::new(2).fit(&two_blobs(), 3, Some(&seed)),
            Err(PaletteError::SeedChannels { seed: 4, points: 3 })
        );
    }

    #[test]
    fn test_centroids_clamped() {
        let mut colors = Vec::new();
        for i in 0..40 {
            colors.push([1.5, -0.5, i as f32 / 40.0]);
        }
        let palette = KMeans::new(4).fit(&flat(&colors), 3, None).unwrap();
        for c in palette.iter() {
            assert!(c.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_deterministic_for_same_rng_seed() {
        let points: Vec<f32> = (0..600).map(|i| ((i * 53) % 97) as f32 / 96.0).collect();
        let a = KMeans::new(8).rng_seed(7).fit(&points, 3, None).unwrap();
        let b = KMeans::new(8).rng_seed(7).fit(&points, 3, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_points_rejected() {
        assert_eq!(KMeans::new(4).fit(&[], 3, None), Err(PaletteError::NoPoints));
    }
}

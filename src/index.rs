//! Tolerance-aware scalar indices (C2 impl): a shared `ScalarIndex<T>`
//! contract with two implementations, a bucketed index for O(1)
//! amortized lookups at a fixed resolution, and a sorted/binary index
//! for exact neighbour scans (needed when the query tolerance is
//! relative, i.e. ppm, and so has no fixed bucket width).

use crate::tolerance::Tolerance;

/// One bucket or array slot: a scalar key with every item sharing it.
#[derive(Debug, Clone)]
struct Point<T> {
    value: f64,
    content: Vec<T>,
}

impl<T> Point<T> {
    fn new(value: f64) -> Self {
        Self { value, content: Vec::new() }
    }
}

/// A lookup structure over items keyed by an `f64`: given a target
/// value and a tolerance, return every item whose key matches.
pub trait ScalarIndex<T> {
    /// Every item whose key is within `tolerance` of `target`.
    fn query(&self, target: f64, tolerance: Tolerance) -> Vec<&T>;

    /// Whether any item's key is within `tolerance` of `target`.
    fn contains(&self, target: f64, tolerance: Tolerance) -> bool {
        !self.query(target, tolerance).is_empty()
    }
}

/// A fixed-width bucketed index, amortized O(1) per query at a given
/// `resolution`. Only sound for tolerances whose absolute width is at
/// least `resolution`; `resolution` should be chosen at or below the
/// smallest width the engine will ever query with (the configured
/// tolerance evaluated at the lowest mass expected in practice).
#[derive(Debug, Clone)]
pub struct BucketIndex<T> {
    buckets: Vec<Point<(f64, T)>>,
    min: f64,
    resolution: f64,
}

impl<T> BucketIndex<T> {
    /// Build a bucket index over `items` (each paired with its scalar
    /// key), bucketed at `resolution` (an absolute width).
    pub fn build(items: Vec<(f64, T)>, resolution: f64) -> Self {
        assert!(resolution > 0.0, "bucket resolution must be positive");
        if items.is_empty() {
            return Self { buckets: Vec::new(), min: 0.0, resolution };
        }

        let min = items.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
        let max = items.iter().map(|(v, _)| *v).fold(f64::NEG_INFINITY, f64::max);
        let bucket_count = (((max - min) / resolution) as usize) + 1;

        let mut buckets: Vec<Point<(f64, T)>> =
            (0..bucket_count).map(|i| Point::new(min + i as f64 * resolution)).collect();
        for (value, item) in items {
            let index = Self::bucket_index(min, resolution, value).min(bucket_count - 1);
            buckets[index].content.push((value, item));
        }
        Self { buckets, min, resolution }
    }

    fn bucket_index(min: f64, resolution: f64, value: f64) -> usize {
        ((value - min) / resolution).max(0.0) as usize
    }
}

impl<T> ScalarIndex<T> for BucketIndex<T> {
    fn query(&self, target: f64, tolerance: Tolerance) -> Vec<&T> {
        if self.buckets.is_empty() {
            return Vec::new();
        }
        let (low, high) = tolerance.bounds(target);
        let center = Self::bucket_index(self.min, self.resolution, target).min(self.buckets.len() - 1);
        let lo_bucket = center.saturating_sub(1);
        let hi_bucket = (center + 1).min(self.buckets.len() - 1);

        self.buckets[lo_bucket..=hi_bucket]
            .iter()
            .flat_map(|bucket| &bucket.content)
            .filter(|(value, _)| *value >= low && *value <= high)
            .map(|(_, item)| item)
            .collect()
    }
}

/// A sorted-array index: exact binary search to the nearest key, then
/// a linear walk in both directions while still within tolerance.
/// Correct for both ppm and dalton tolerances, at O(log n + k) per
/// query where `k` is the number of matches.
#[derive(Debug, Clone)]
pub struct BinaryIndex<T> {
    sorted: Vec<(f64, T)>,
}

impl<T> BinaryIndex<T> {
    /// Build a binary index over `items` (each paired with its scalar key).
    pub fn build(mut items: Vec<(f64, T)>) -> Self {
        items.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        Self { sorted: items }
    }
}

impl<T> ScalarIndex<T> for BinaryIndex<T> {
    fn query(&self, target: f64, tolerance: Tolerance) -> Vec<&T> {
        if self.sorted.is_empty() {
            return Vec::new();
        }
        let (low, high) = tolerance.bounds(target);
        let start = self.sorted.partition_point(|(value, _)| *value < low);

        let mut matches = Vec::new();
        for (value, item) in &self.sorted[start..] {
            if *value > high {
                break;
            }
            matches.push(item);
        }
        matches
    }

    fn contains(&self, target: f64, tolerance: Tolerance) -> bool {
        if self.sorted.is_empty() {
            return false;
        }
        let (low, high) = tolerance.bounds(target);
        let start = self.sorted.partition_point(|(value, _)| *value < low);
        self.sorted.get(start).is_some_and(|(value, _)| *value <= high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<(f64, &'static str)> {
        vec![(1000.0, "a"), (1000.5, "b"), (2000.0, "c"), (2000.3, "d")]
    }

    #[test]
    fn bucket_index_finds_neighbours_within_tolerance() {
        let index = BucketIndex::build(items(), 1.0);
        let hits = index.query(1000.05, Tolerance::Dalton(0.1));
        assert_eq!(hits.len(), 1);
        assert_eq!(*hits[0], "a");
    }

    #[test]
    fn bucket_index_finds_both_neighbours_at_a_bucket_boundary() {
        // A target that lies right at a bucket boundary must still
        // find matches that landed in the adjacent bucket.
        let index = BucketIndex::build(items(), 1.0);
        let hits = index.query(1000.5, Tolerance::Dalton(0.6));
        let mut names: Vec<_> = hits.into_iter().copied().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn binary_index_respects_ppm_tolerance_at_different_masses() {
        // Ppm tolerance widens with mass, so the same absolute
        // delta can fall inside tolerance at high mass and outside it
        // at low mass: 100 ppm of 1000 Da is 0.1 Da, of 2000 Da is 0.2 Da.
        let index = BinaryIndex::build(items());
        let tol = Tolerance::Ppm(100.0);
        assert!(index.contains(1000.0 + 0.09, tol));
        assert!(!index.contains(1000.0 + 0.11, tol));
        assert!(index.contains(2000.0 + 0.19, tol));
    }

    #[test]
    fn binary_index_query_returns_every_match_in_range() {
        let index = BinaryIndex::build(items());
        let hits = index.query(2000.15, Tolerance::Dalton(0.2));
        let mut names: Vec<_> = hits.into_iter().copied().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["c", "d"]);
    }

    #[test]
    fn empty_index_matches_nothing() {
        let index: BinaryIndex<&str> = BinaryIndex::build(Vec::new());
        assert!(!index.contains(100.0, Tolerance::Dalton(1.0)));
        let bucket: BucketIndex<&str> = BucketIndex::build(Vec::new(), 1.0);
        assert!(!bucket.contains(100.0, Tolerance::Dalton(1.0)));
    }
}

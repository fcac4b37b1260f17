//! Online, capacity-bounded vector quantization.
//!
//! [`OnlineClusterer`] consumes a stream of samples one at a time and
//! maintains a bounded, ordered set of representative points ("groups").
//! It never stores the stream: each sample either founds a new group,
//! nudges the nearest existing group, or triggers a merge of two
//! redundant groups to free capacity.
//!
//! The ordering of the group list is significant: groups keep their
//! creation/merge order, and that order becomes the palette-index order
//! of indexed output.

mod error;

pub use error::ClusterError;

use std::ops::{Add, Div, Mul};

/// Distance strategy between two points of the clustered type.
///
/// Implemented by concrete metric types and, via the blanket impl, by any
/// `Fn(&T, &T) -> f64` closure. Distances must be non-negative and zero
/// for identical inputs; symmetry is expected but not enforced.
pub trait Metric<T> {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &T, b: &T) -> f64;
}

impl<T, F> Metric<T> for F
where
    F: Fn(&T, &T) -> f64,
{
    #[inline]
    fn distance(&self, a: &T, b: &T) -> f64 {
        self(a, b)
    }
}

/// An online vector quantizer with a pluggable distance metric.
///
/// The point type needs value semantics and enough arithmetic to form
/// weighted averages: the winner update is an exponential moving average
/// and a merge replaces two groups by their midpoint.
///
/// # Example
///
/// ```
/// use chroma_quant::cluster::OnlineClusterer;
///
/// let mut clusterer = OnlineClusterer::new(|a: &f64, b: &f64| (a - b).abs());
/// clusterer.train_step(1.0, 4, 0.5, 0.1, 0.01);
/// clusterer.train_step(9.0, 4, 0.5, 0.1, 0.01);
/// assert_eq!(clusterer.groups(), &[1.0, 9.0]);
/// ```
#[derive(Debug, Clone)]
pub struct OnlineClusterer<T, M> {
    groups: Vec<T>,
    metric: M,
}

impl<T, M> OnlineClusterer<T, M>
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T> + Div<f64, Output = T>,
    M: Metric<T>,
{
    /// Create an empty clusterer using the given distance metric.
    pub fn new(metric: M) -> Self {
        Self {
            groups: Vec::new(),
            metric,
        }
    }

    /// Absorb one training sample.
    ///
    /// Calls are order-dependent: each step works on the cumulative state
    /// left by the previous one, so the same samples in a different order
    /// can produce a different group set.
    ///
    /// - An empty clusterer adopts the sample as its first group.
    /// - When the set is full and the sample is farther than
    ///   `max_distance` from every group, one redundant pair (mutual
    ///   distance below `min_distance`) is merged to make room.
    /// - When the set is (still) full, or the sample lies within
    ///   `max_distance` of its nearest group, that group alone moves
    ///   towards the sample by `learning_rate`.
    /// - Otherwise a sample at least `min_distance` away founds a new
    ///   group.
    /// - A sample closer than `min_distance` but farther than
    ///   `max_distance`, with spare capacity, is dropped; that case only
    ///   exists when `min_distance > max_distance`.
    ///
    /// The group count never exceeds `max_clusters`.
    pub fn train_step(
        &mut self,
        sample: T,
        max_clusters: usize,
        max_distance: f64,
        min_distance: f64,
        learning_rate: f64,
    ) {
        if self.groups.is_empty() {
            self.groups.push(sample);
            return;
        }
        let Some((winner, dist)) = self.nearest(&sample) else {
            return;
        };
        if self.groups.len() == max_clusters && dist > max_distance {
            self.merge_one_redundant(min_distance);
        }
        // A successful merge leaves the set below capacity and this branch
        // is skipped (dist > max_distance here), so the winner index is
        // only reused when nothing was removed.
        if self.groups.len() == max_clusters || dist <= max_distance {
            self.groups[winner] = self.groups[winner] * (1.0 - learning_rate) + sample * learning_rate;
        } else if dist >= min_distance {
            self.groups.push(sample);
        }
    }

    /// The learned representatives, in creation/merge order.
    #[inline]
    pub fn groups(&self) -> &[T] {
        &self.groups
    }

    /// Number of groups currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True until the first sample has been absorbed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The nearest group to `point`, by value.
    pub fn closest_group(&self, point: &T) -> Result<T, ClusterError> {
        self.closest_group_index(point).map(|i| self.groups[i])
    }

    /// Index of the nearest group to `point`; ties go to the earliest
    /// group in order.
    pub fn closest_group_index(&self, point: &T) -> Result<usize, ClusterError> {
        self.nearest(point)
            .map(|(index, _)| index)
            .ok_or(ClusterError::Untrained)
    }

    /// Distances from `point` to every group, in group order.
    pub fn distances(&self, point: &T) -> Vec<f64> {
        self.groups
            .iter()
            .map(|group| self.metric.distance(point, group))
            .collect()
    }

    fn nearest(&self, point: &T) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, group) in self.groups.iter().enumerate() {
            let dist = self.metric.distance(point, group);
            match best {
                Some((_, min)) if dist >= min => {}
                _ => best = Some((index, dist)),
            }
        }
        best
    }

    /// Merge the first pair of groups (scanning pairs in list order) whose
    /// mutual distance is below `min_distance` into their midpoint,
    /// removing the later of the two. Does nothing when no such pair
    /// exists.
    ///
    /// This is a first-found heuristic, not a search for the globally
    /// nearest pair, and is therefore sensitive to group order.
    fn merge_one_redundant(&mut self, min_distance: f64) {
        for i in 0..self.groups.len().saturating_sub(1) {
            for j in (i + 1)..self.groups.len() {
                if self.metric.distance(&self.groups[i], &self.groups[j]) < min_distance {
                    self.groups[i] = (self.groups[i] + self.groups[j]) / 2.0;
                    self.groups.remove(j);
                    return;
                }
            }
        }
    }
}

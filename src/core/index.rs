//! Position index over irregularly sampled tracks
//!
//! Wiggle positions are experimentally sampled, so a requested base pair is
//! often missing. Lookups fall back to the nearest row on the requested side
//! using binary search over the sorted positions.

use crate::core::error::{Bound, SignalError, SignalResult};
use crate::core::track::{ChromosomeTrack, TrackPoint};
use std::ops::Range;

/// Binary-search lookups on a sorted track
#[derive(Debug, Clone, Copy)]
pub struct PositionIndexer<'a> {
    points: &'a [TrackPoint],
}

impl<'a> PositionIndexer<'a> {
    pub fn new(track: &'a ChromosomeTrack) -> Self {
        Self {
            points: track.points(),
        }
    }

    /// Index of the row at exactly `target`
    pub fn exact(&self, target: u64) -> Option<usize> {
        self.points
            .binary_search_by_key(&target, |p| p.position)
            .ok()
    }

    /// Index of the row at `target`, else of the greatest position below it
    ///
    /// Used for the end of left-arm windows.
    pub fn floor(&self, target: u64) -> SignalResult<usize> {
        let idx = self.points.partition_point(|p| p.position <= target);
        if idx == 0 {
            return Err(self.out_of_range(target, Bound::Floor));
        }
        Ok(idx - 1)
    }

    /// Index of the row at `target`, else of the least position above it
    ///
    /// Used for the start of right-arm windows.
    pub fn ceiling(&self, target: u64) -> SignalResult<usize> {
        let idx = self.points.partition_point(|p| p.position < target);
        if idx == self.points.len() {
            return Err(self.out_of_range(target, Bound::Ceiling));
        }
        Ok(idx)
    }

    /// Row range covering positions in `start..=end`
    ///
    /// Returns `None` when no row falls inside the interval.
    pub fn range(&self, start: u64, end: u64) -> Option<Range<usize>> {
        if start > end {
            return None;
        }
        let first = self.ceiling(start).ok()?;
        let last = self.floor(end).ok()?;
        (first <= last).then(|| first..last + 1)
    }

    fn out_of_range(&self, target: u64, bound: Bound) -> SignalError {
        SignalError::OutOfRange {
            target,
            bound,
            first: self.points.first().map(|p| p.position),
            last: self.points.last().map(|p| p.position),
        }
    }
}

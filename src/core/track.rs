//! Per-chromosome signal tracks
//!
//! A track is an ordered table of (position, signal) rows. Positions are
//! strictly increasing but need not be contiguous.

use crate::core::error::{SignalError, SignalResult};
use std::collections::BTreeMap;

/// One observed (position, signal) row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub position: u64,
    pub signal: f64,
}

impl TrackPoint {
    pub fn new(position: u64, signal: f64) -> Self {
        Self { position, signal }
    }
}

/// Signal track for a single chromosome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromosomeTrack {
    points: Vec<TrackPoint>,
}

impl ChromosomeTrack {
    /// Build a track from rows already sorted by position
    ///
    /// Fails if any position is not strictly greater than its predecessor.
    pub fn new(points: Vec<TrackPoint>) -> SignalResult<Self> {
        for pair in points.windows(2) {
            if pair[1].position == pair[0].position {
                return Err(SignalError::DuplicatePosition(pair[0].position));
            }
            if pair[1].position < pair[0].position {
                return Err(SignalError::UnsortedTrack {
                    previous: pair[0].position,
                    next: pair[1].position,
                });
            }
        }
        Ok(Self { points })
    }

    /// Build a track from rows in any order
    ///
    /// Rows are sorted by position; repeated positions are still rejected.
    pub fn from_unsorted(mut points: Vec<TrackPoint>) -> SignalResult<Self> {
        points.sort_by_key(|p| p.position);
        Self::new(points)
    }

    /// Build a track from parallel (position, signal) pairs
    pub fn from_pairs<I>(pairs: I) -> SignalResult<Self>
    where
        I: IntoIterator<Item = (u64, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(position, signal)| TrackPoint::new(position, signal))
                .collect(),
        )
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First observed position
    pub fn first_position(&self) -> Option<u64> {
        self.points.first().map(|p| p.position)
    }

    /// Last observed position
    pub fn last_position(&self) -> Option<u64> {
        self.points.last().map(|p| p.position)
    }

    pub fn signals(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.signal)
    }
}

/// Chromosome label → track mapping produced by a reader
///
/// Labels are kept verbatim (for example `chrI`, `chr01.wig`); the naming
/// scheme is resolved separately by [`crate::core::detect_scheme`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenomeTrackSet {
    tracks: BTreeMap<String, ChromosomeTrack>,
}

impl GenomeTrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, track: ChromosomeTrack) {
        self.tracks.insert(label.into(), track);
    }

    pub fn get(&self, label: &str) -> Option<&ChromosomeTrack> {
        self.tracks.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChromosomeTrack)> {
        self.tracks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total number of rows across all tracks
    pub fn total_points(&self) -> usize {
        self.tracks.values().map(|t| t.len()).sum()
    }
}

impl FromIterator<(String, ChromosomeTrack)> for GenomeTrackSet {
    fn from_iter<T: IntoIterator<Item = (String, ChromosomeTrack)>>(iter: T) -> Self {
        Self {
            tracks: iter.into_iter().collect(),
        }
    }
}

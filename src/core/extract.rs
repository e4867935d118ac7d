//! Anchor-relative region extraction
//!
//! Slices chromosome tracks around telomeres, centromeres or arbitrary
//! summits and re-expresses positions as distances to the anchor.
//!
//! Telomere profiles use unsigned-style distances that grow away from the
//! chromosome end on both arms; summit profiles use signed distances
//! (negative upstream, positive downstream).

use crate::core::anchors::{AnchorRecord, AnchorTable};
use crate::core::error::{SignalError, SignalResult};
use crate::core::index::PositionIndexer;
use crate::core::scheme::{ChromosomeEntry, GenomeLayout, SizeClass};
use crate::core::track::{ChromosomeTrack, GenomeTrackSet};
use rayon::prelude::*;

/// Default telomere-flanking window (bp)
pub const DEFAULT_TELOMERE_WINDOW: u64 = 120_000;

/// Default half-window around centromeres (bp)
pub const DEFAULT_CENTROMERE_WINDOW: u64 = 50_000;

/// Default half-window around summits (bp)
pub const DEFAULT_SUMMIT_WINDOW: u64 = 1_000;

/// Chromosome arm a telomere profile was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arm::Left => "left",
            Arm::Right => "right",
        }
    }
}

/// One (distance, signal) row of a region profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub distance: i64,
    pub signal: f64,
}

/// Signal around one anchor, ordered by increasing distance
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProfile {
    /// Canonical chromosome name
    pub chrom: String,
    /// Anchor coordinate the distances are relative to
    pub anchor: u64,
    /// Arm for telomere profiles, `None` for windows spanning the anchor
    pub arm: Option<Arm>,
    pub size_class: SizeClass,
    pub points: Vec<ProfilePoint>,
}

impl RegionProfile {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn distances(&self) -> impl Iterator<Item = i64> + '_ {
        self.points.iter().map(|p| p.distance)
    }
}

/// A named anchor coordinate (peak summit, ORF boundary, centromere)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summit {
    pub chrom: String,
    pub position: u64,
}

impl Summit {
    pub fn new(chrom: impl Into<String>, position: u64) -> Self {
        Self {
            chrom: chrom.into(),
            position,
        }
    }
}

/// Window options for summit-relative extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummitOptions {
    /// Half-window: rows within `anchor ± window` are kept
    pub window: u64,
    /// Drop anchors whose window runs past the track instead of truncating
    pub only_complete: bool,
}

impl Default for SummitOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_SUMMIT_WINDOW,
            only_complete: false,
        }
    }
}

/// Extraction statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub total: usize,
    pub extracted: usize,
    pub skipped: usize,
}

/// Distance of `position` from the right telomere of a chromosome of `chrom_length` bp
///
/// The last base of the chromosome is at distance 1, so the right arm uses
/// the same "larger is farther from the telomere" convention as the left arm.
/// Positions past the reference end yield zero or negative distances; they
/// are returned as-is.
///
/// # Examples
/// ```
/// use yeastwig::core::telomere_distance;
/// assert_eq!(telomere_distance(1000, 1000), 1);
/// assert_eq!(telomere_distance(1000, 901), 100);
/// assert_eq!(telomere_distance(1000, 1002), -1);
/// ```
pub fn telomere_distance(chrom_length: u64, position: u64) -> i64 {
    chrom_length as i64 - position as i64 + 1
}

fn check_window(window: u64) -> SignalResult<()> {
    if window == 0 {
        return Err(SignalError::InvalidParameter(
            "window length must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Left and right telomere profiles of one chromosome
///
/// The left profile holds rows with position `< window`, positions used as
/// distances. The right profile holds rows with position
/// `> length - window`, with distances from [`telomere_distance`] and rows
/// reordered so distance increases.
pub fn extract_telomeres(
    track: &ChromosomeTrack,
    entry: &ChromosomeEntry,
    anchor: &AnchorRecord,
    window: u64,
) -> SignalResult<(RegionProfile, RegionProfile)> {
    check_window(window)?;
    let length = anchor.length;
    if window > length {
        return Err(SignalError::WindowOutOfBounds {
            chrom: entry.name.clone(),
            start: 0,
            end: window as i64,
        });
    }

    let index = PositionIndexer::new(track);
    let points = track.points();

    let left_end = index
        .floor(window - 1)
        .map_err(|_| SignalError::WindowOutOfBounds {
            chrom: entry.name.clone(),
            start: 0,
            end: window as i64 - 1,
        })?;
    let left = RegionProfile {
        chrom: entry.name.clone(),
        anchor: 0,
        arm: Some(Arm::Left),
        size_class: entry.size_class,
        points: points[..=left_end]
            .iter()
            .map(|p| ProfilePoint {
                distance: p.position as i64,
                signal: p.signal,
            })
            .collect(),
    };

    let right_start_target = length - window + 1;
    let right_start = index
        .ceiling(right_start_target)
        .map_err(|_| SignalError::WindowOutOfBounds {
            chrom: entry.name.clone(),
            start: right_start_target as i64,
            end: length as i64,
        })?;
    let right_points: Vec<ProfilePoint> = points[right_start..]
        .iter()
        .rev()
        .map(|p| ProfilePoint {
            distance: telomere_distance(length, p.position),
            signal: p.signal,
        })
        .collect();
    if right_points.first().is_some_and(|p| p.distance <= 0) {
        log::debug!(
            "{}: track extends past reference length {}; keeping non-positive telomere distances",
            entry.name,
            length
        );
    }
    let right = RegionProfile {
        chrom: entry.name.clone(),
        anchor: length,
        arm: Some(Arm::Right),
        size_class: entry.size_class,
        points: right_points,
    };

    Ok((left, right))
}

/// Telomere profiles for all 16 chromosomes
///
/// Returns 32 profiles in chromosome order, left arm before right arm.
/// Chromosomes are processed in parallel.
pub fn signal_from_telomeres(
    set: &GenomeTrackSet,
    layout: &GenomeLayout,
    anchors: &AnchorTable,
    window: u64,
) -> SignalResult<Vec<RegionProfile>> {
    warn_scheme_mismatch(layout, anchors);

    let pairs: Vec<(RegionProfile, RegionProfile)> = layout
        .chromosomes
        .par_iter()
        .map(|entry| {
            let track = layout.track(set, entry)?;
            let anchor = anchors.lookup(&entry.name)?;
            log::debug!("Extracting telomere windows for {}", entry.name);
            extract_telomeres(track, entry, anchor, window)
        })
        .collect::<SignalResult<_>>()?;

    Ok(pairs
        .into_iter()
        .flat_map(|(left, right)| [left, right])
        .collect())
}

/// Signed-distance profile around one anchor
///
/// A window with no rows at all is an error whatever `only_complete` says.
/// Otherwise, with `only_complete` set, a window running past either end of
/// the track gives `Ok(None)`; without it the window is truncated at the
/// track ends.
pub fn extract_summit(
    track: &ChromosomeTrack,
    entry: &ChromosomeEntry,
    anchor: u64,
    options: &SummitOptions,
) -> SignalResult<Option<RegionProfile>> {
    check_window(options.window)?;
    let (lower, upper) = summit_bounds(anchor, options.window)?;

    let range = PositionIndexer::new(track)
        .range(lower.max(0) as u64, upper as u64)
        .ok_or_else(|| SignalError::WindowOutOfBounds {
            chrom: entry.name.clone(),
            start: lower,
            end: upper,
        })?;

    if options.only_complete {
        let complete = match (track.first_position(), track.last_position()) {
            (Some(first), Some(last)) => lower >= first as i64 && upper as u64 <= last,
            _ => false,
        };
        if !complete {
            log::debug!(
                "{}:{} window {}..={} incomplete, dropped",
                entry.name,
                anchor,
                lower,
                upper
            );
            return Ok(None);
        }
    }

    let origin = lower + options.window as i64;
    Ok(Some(RegionProfile {
        chrom: entry.name.clone(),
        anchor,
        arm: None,
        size_class: entry.size_class,
        points: track.points()[range]
            .iter()
            .map(|p| ProfilePoint {
                distance: p.position as i64 - origin,
                signal: p.signal,
            })
            .collect(),
    }))
}

/// `anchor ± window` as signed coordinates
///
/// Both ends must fit in `i64` so distances can be taken without wrapping.
fn summit_bounds(anchor: u64, window: u64) -> SignalResult<(i64, i64)> {
    let overflow = || {
        SignalError::InvalidParameter(format!(
            "summit {} with half-window {} exceeds the coordinate range",
            anchor, window
        ))
    };
    let anchor = i64::try_from(anchor).map_err(|_| overflow())?;
    let window = i64::try_from(window).map_err(|_| overflow())?;
    let upper = anchor.checked_add(window).ok_or_else(overflow)?;
    Ok((anchor - window, upper))
}

/// Signed-distance profiles around each summit
///
/// Summit chromosome labels may use either naming scheme. Output order
/// follows the input order, minus dropped incomplete windows.
pub fn signal_at_summit(
    set: &GenomeTrackSet,
    layout: &GenomeLayout,
    summits: &[Summit],
    options: &SummitOptions,
) -> SignalResult<(Vec<RegionProfile>, ExtractionStats)> {
    let extracted: Vec<Option<RegionProfile>> = summits
        .par_iter()
        .map(|summit| {
            let entry = layout
                .find(&summit.chrom)
                .ok_or_else(|| SignalError::MissingChromosome(summit.chrom.clone()))?;
            let track = layout.track(set, entry)?;
            extract_summit(track, entry, summit.position, options)
        })
        .collect::<SignalResult<_>>()?;

    let mut stats = ExtractionStats {
        total: summits.len(),
        ..Default::default()
    };
    let profiles: Vec<RegionProfile> = extracted.into_iter().flatten().collect();
    stats.extracted = profiles.len();
    stats.skipped = stats.total - stats.extracted;

    Ok((profiles, stats))
}

/// Signed-distance profiles around every centromere midpoint
pub fn signal_at_centromeres(
    set: &GenomeTrackSet,
    layout: &GenomeLayout,
    anchors: &AnchorTable,
    options: &SummitOptions,
) -> SignalResult<(Vec<RegionProfile>, ExtractionStats)> {
    warn_scheme_mismatch(layout, anchors);
    let summits = centromere_summits(layout, anchors)?;
    signal_at_summit(set, layout, &summits, options)
}

/// Centromere midpoints of a layout as summits
pub fn centromere_summits(
    layout: &GenomeLayout,
    anchors: &AnchorTable,
) -> SignalResult<Vec<Summit>> {
    layout
        .chromosomes
        .iter()
        .map(|entry| {
            let record = anchors.lookup(&entry.name)?;
            Ok(Summit::new(entry.name.clone(), record.centromere))
        })
        .collect()
}

fn warn_scheme_mismatch(layout: &GenomeLayout, anchors: &AnchorTable) {
    if layout.scheme != anchors.scheme() {
        log::warn!(
            "Tracks use {} naming but anchors are {} coordinates",
            layout.scheme,
            anchors.scheme()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheme::GenomeScheme;

    fn entry(index: usize) -> ChromosomeEntry {
        let name = GenomeScheme::S288C.chrom_name(index).unwrap();
        ChromosomeEntry {
            index,
            label: name.clone(),
            name,
            size_class: SizeClass::of_index(index),
        }
    }

    fn uniform_track(end: u64) -> ChromosomeTrack {
        ChromosomeTrack::from_pairs((0..=end).map(|p| (p, p as f64))).unwrap()
    }

    #[test]
    fn test_telomere_distance() {
        assert_eq!(telomere_distance(100, 100), 1);
        assert_eq!(telomere_distance(100, 1), 100);
        assert_eq!(telomere_distance(100, 101), 0);
    }

    #[test]
    fn test_extract_telomeres_uniform() {
        let track = uniform_track(100);
        let anchor = AnchorRecord::new("chrI", 100, 50).unwrap();
        let (left, right) = extract_telomeres(&track, &entry(1), &anchor, 10).unwrap();

        assert_eq!(left.arm, Some(Arm::Left));
        assert_eq!(left.distances().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());

        // positions 91..=100 -> distances 10..=1, reversed to 1..=10
        assert_eq!(right.arm, Some(Arm::Right));
        assert_eq!(right.distances().collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
        assert_eq!(right.points[0].signal, 100.0);
        assert_eq!(right.size_class, SizeClass::Small);
    }

    #[test]
    fn test_extract_telomeres_irregular() {
        let track =
            ChromosomeTrack::from_pairs([(3, 1.0), (8, 2.0), (12, 3.0), (88, 4.0), (97, 5.0)])
                .unwrap();
        let anchor = AnchorRecord::new("chrII", 100, 50).unwrap();
        let (left, right) = extract_telomeres(&track, &entry(2), &anchor, 12).unwrap();

        assert_eq!(left.distances().collect::<Vec<_>>(), vec![3, 8]);
        // rows with position > 88
        assert_eq!(right.distances().collect::<Vec<_>>(), vec![4]);
        assert_eq!(right.size_class, SizeClass::Large);
    }

    #[test]
    fn test_extract_telomeres_keeps_negative_distance() {
        let track = ChromosomeTrack::from_pairs([(0, 1.0), (95, 2.0), (102, 3.0)]).unwrap();
        let anchor = AnchorRecord::new("chrIV", 100, 50).unwrap();
        let (_, right) = extract_telomeres(&track, &entry(4), &anchor, 10).unwrap();
        assert_eq!(right.distances().collect::<Vec<_>>(), vec![-1, 6]);
    }

    #[test]
    fn test_extract_telomeres_window_too_large() {
        let track = uniform_track(100);
        let anchor = AnchorRecord::new("chrI", 100, 50).unwrap();
        let result = extract_telomeres(&track, &entry(1), &anchor, 101);
        assert!(matches!(result, Err(SignalError::WindowOutOfBounds { .. })));
    }

    #[test]
    fn test_extract_telomeres_no_rows() {
        let track = ChromosomeTrack::from_pairs([(40, 1.0), (60, 1.0)]).unwrap();
        let anchor = AnchorRecord::new("chrI", 100, 50).unwrap();
        let result = extract_telomeres(&track, &entry(1), &anchor, 10);
        assert!(matches!(result, Err(SignalError::WindowOutOfBounds { start: 0, .. })));
    }

    #[test]
    fn test_extract_telomeres_zero_window() {
        let track = uniform_track(100);
        let anchor = AnchorRecord::new("chrI", 100, 50).unwrap();
        let result = extract_telomeres(&track, &entry(1), &anchor, 0);
        assert!(matches!(result, Err(SignalError::InvalidParameter(_))));
    }

    #[test]
    fn test_extract_summit_truncates() {
        let track = uniform_track(100);
        let options = SummitOptions {
            window: 10,
            only_complete: false,
        };
        let profile = extract_summit(&track, &entry(5), 5, &options)
            .unwrap()
            .unwrap();
        assert_eq!(profile.points.first().map(|p| p.distance), Some(-5));
        assert_eq!(profile.points.last().map(|p| p.distance), Some(10));
        assert_eq!(profile.len(), 16);
        assert_eq!(profile.arm, None);
    }

    #[test]
    fn test_extract_summit_only_complete_drops() {
        let track = uniform_track(100);
        let options = SummitOptions {
            window: 10,
            only_complete: true,
        };
        assert_eq!(extract_summit(&track, &entry(5), 5, &options).unwrap(), None);
        assert_eq!(extract_summit(&track, &entry(5), 95, &options).unwrap(), None);
        let profile = extract_summit(&track, &entry(5), 50, &options)
            .unwrap()
            .unwrap();
        assert_eq!(profile.len(), 21);
        assert_eq!(profile.points[10].distance, 0);
    }

    #[test]
    fn test_extract_summit_outside_track() {
        let track = uniform_track(1_000);
        for only_complete in [false, true] {
            let options = SummitOptions {
                window: 10,
                only_complete,
            };
            let result = extract_summit(&track, &entry(5), 50_000, &options);
            assert_eq!(
                result,
                Err(SignalError::WindowOutOfBounds {
                    chrom: "chrV".to_string(),
                    start: 49_990,
                    end: 50_010,
                })
            );
        }
    }

    #[test]
    fn test_extract_summit_coordinate_overflow() {
        let track = uniform_track(100);
        let options = SummitOptions {
            window: 10,
            only_complete: false,
        };
        for anchor in [u64::MAX, i64::MAX as u64] {
            let result = extract_summit(&track, &entry(5), anchor, &options);
            assert!(matches!(result, Err(SignalError::InvalidParameter(_))));
        }
        let wide = SummitOptions {
            window: u64::MAX,
            only_complete: false,
        };
        assert!(matches!(
            extract_summit(&track, &entry(5), 50, &wide),
            Err(SignalError::InvalidParameter(_))
        ));
    }
}

//! Signal aggregation
//!
//! Genome-wide scalar averages and per-coordinate averaging of region
//! profiles across chromosomes or replicate anchors.

use crate::core::error::{SignalError, SignalResult};
use crate::core::extract::RegionProfile;
use crate::core::scheme::{GenomeLayout, SizeClass};
use crate::core::track::GenomeTrackSet;
use std::collections::BTreeMap;

/// Incremental arithmetic mean
///
/// Updating the mean rather than dividing a running sum keeps the result
/// exact when every value is equal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RunningMean {
    mean: f64,
    n: usize,
}

impl RunningMean {
    fn push(&mut self, value: f64) {
        self.n += 1;
        self.mean += (value - self.mean) / self.n as f64;
    }
}

/// One row of an averaged profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPoint {
    /// Position or distance shared by the inputs
    pub coordinate: i64,
    pub mean: f64,
    /// Number of inputs observed at this coordinate
    pub n_observations: usize,
}

/// Per-coordinate mean across several profiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedProfile {
    pub points: Vec<AggregatedPoint>,
}

impl AggregatedProfile {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Mean signal of one chromosome
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeAverage {
    pub chrom: String,
    pub mean: f64,
    pub n_observations: usize,
}

/// Telomere profiles pooled by chromosome size class
#[derive(Debug, Clone, PartialEq)]
pub struct TelomereSummary {
    pub small: AggregatedProfile,
    pub large: AggregatedProfile,
}

/// Unweighted mean of every signal value on the 16 nuclear chromosomes
///
/// Each observation counts once regardless of which chromosome it is on.
/// Tracks outside `layout` (mitochondrial, 2-micron) are not included.
pub fn genome_average(set: &GenomeTrackSet, layout: &GenomeLayout) -> SignalResult<f64> {
    let mut acc = RunningMean::default();
    for entry in &layout.chromosomes {
        for value in layout.track(set, entry)?.signals() {
            acc.push(value);
        }
    }

    if acc.n == 0 {
        return Err(SignalError::EmptyInput("track set has no observations".to_string()));
    }
    log::debug!("Genome average over {} observations: {}", acc.n, acc.mean);
    Ok(acc.mean)
}

/// Mean signal of each chromosome in layout order
///
/// Chromosomes without observations are reported with `n_observations == 0`
/// and a NaN mean.
pub fn chromosome_averages(
    set: &GenomeTrackSet,
    layout: &GenomeLayout,
) -> SignalResult<Vec<ChromosomeAverage>> {
    layout
        .chromosomes
        .iter()
        .map(|entry| {
            let track = layout.track(set, entry)?;
            let mut acc = RunningMean::default();
            for value in track.signals() {
                acc.push(value);
            }
            Ok(ChromosomeAverage {
                chrom: entry.name.clone(),
                mean: if acc.n == 0 { f64::NAN } else { acc.mean },
                n_observations: acc.n,
            })
        })
        .collect()
}

/// Average profiles coordinate by coordinate
///
/// Every coordinate seen in any input gets one output row; its mean covers
/// only the inputs observed there, and `n_observations` says how many.
/// With `require_complete`, coordinates missing from any input are dropped.
pub fn signal_average(
    profiles: &[RegionProfile],
    require_complete: bool,
) -> SignalResult<AggregatedProfile> {
    if profiles.is_empty() {
        return Err(SignalError::EmptyInput("no profiles to average".to_string()));
    }

    let mut by_coordinate: BTreeMap<i64, RunningMean> = BTreeMap::new();
    for profile in profiles {
        for point in &profile.points {
            by_coordinate
                .entry(point.distance)
                .or_default()
                .push(point.signal);
        }
    }

    let total = profiles.len();
    let points: Vec<AggregatedPoint> = by_coordinate
        .into_iter()
        .filter(|(_, acc)| !require_complete || acc.n == total)
        .map(|(coordinate, acc)| AggregatedPoint {
            coordinate,
            mean: acc.mean,
            n_observations: acc.n,
        })
        .collect();

    log::debug!(
        "Averaged {} profiles into {} coordinates",
        total,
        points.len()
    );
    Ok(AggregatedProfile { points })
}

/// Average telomere profiles separately for small and large chromosomes
///
/// Both arms are pooled; their distances share one convention. Profiles
/// without an arm tag (summit windows) are ignored.
pub fn telomere_summary(profiles: &[RegionProfile]) -> SignalResult<TelomereSummary> {
    let pick = |class: SizeClass| -> Vec<RegionProfile> {
        profiles
            .iter()
            .filter(|p| p.arm.is_some() && p.size_class == class)
            .cloned()
            .collect()
    };

    Ok(TelomereSummary {
        small: signal_average(&pick(SizeClass::Small), false)?,
        large: signal_average(&pick(SizeClass::Large), false)?,
    })
}

//! Track smoothing
//!
//! Two interchangeable strategies turn an irregularly sampled series into a
//! smoothed one:
//!
//! - sliding-window mean over non-overlapping windows of fixed width in bp
//! - Gaussian kernel regression (Nadaraya-Watson) with the kernel scaled so
//!   its quartiles sit at ±0.25 × bandwidth, truncated at 4 standard deviations

use crate::core::error::{SignalError, SignalResult};
use crate::core::extract::RegionProfile;
use crate::core::scheme::GenomeLayout;
use crate::core::track::{ChromosomeTrack, GenomeTrackSet};
use rayon::prelude::*;

/// Default smoothing bandwidth (bp)
pub const DEFAULT_BANDWIDTH: u64 = 1_000;

/// Standard normal upper quartile
const NORMAL_QUARTILE: f64 = 0.674_489_750_196_081_7;

/// Kernel truncation in standard deviations
const KERNEL_CUTOFF_SD: f64 = 4.0;

/// Where kernel regression is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationGrid {
    /// At every input position
    #[default]
    Original,
    /// Every `step` bp from the first to the last input position
    Regular { step: u64 },
}

/// Smoothing strategy and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingStrategy {
    SlidingWindow { bandwidth: u64 },
    Kernel { bandwidth: u64, grid: EvaluationGrid },
}

impl Default for SmoothingStrategy {
    fn default() -> Self {
        SmoothingStrategy::SlidingWindow {
            bandwidth: DEFAULT_BANDWIDTH,
        }
    }
}

/// Shape of the data handed to the smoother
#[derive(Debug, Clone, Copy)]
pub enum SmoothInput<'a> {
    /// Whole genome; `chromosome` is the 1-based index to smooth
    Genome {
        set: &'a GenomeTrackSet,
        layout: &'a GenomeLayout,
        chromosome: usize,
    },
    /// A single chromosome track
    Track(&'a ChromosomeTrack),
    /// An extracted region profile
    Region(&'a RegionProfile),
}

impl SmoothInput<'_> {
    fn series(&self) -> SignalResult<Vec<(i64, f64)>> {
        let track = match self {
            SmoothInput::Genome {
                set,
                layout,
                chromosome,
            } => {
                let entry = layout
                    .entry(*chromosome)
                    .ok_or_else(|| SignalError::MissingChromosome(chromosome.to_string()))?;
                layout.track(set, entry)?
            }
            SmoothInput::Track(track) => track,
            SmoothInput::Region(profile) => {
                return Ok(profile
                    .points
                    .iter()
                    .map(|p| (p.distance, p.signal))
                    .collect())
            }
        };
        Ok(track
            .points()
            .iter()
            .map(|p| (p.position as i64, p.signal))
            .collect())
    }
}

/// One smoothed row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPoint {
    pub position: i64,
    pub signal: f64,
}

/// Smoothed series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothedTrack {
    pub points: Vec<SmoothedPoint>,
    /// Kernel evaluation positions with no input inside the kernel support
    pub unsupported: Vec<i64>,
}

impl SmoothedTrack {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Smooth one input with the given strategy
pub fn smooth(input: SmoothInput<'_>, strategy: &SmoothingStrategy) -> SignalResult<SmoothedTrack> {
    let series = input.series()?;
    match *strategy {
        SmoothingStrategy::SlidingWindow { bandwidth } => sliding_window_mean(&series, bandwidth),
        SmoothingStrategy::Kernel { bandwidth, grid } => {
            kernel_regression(&series, bandwidth, grid)
        }
    }
}

/// Smooth all 16 chromosomes in parallel, in layout order
pub fn smooth_genome(
    set: &GenomeTrackSet,
    layout: &GenomeLayout,
    strategy: &SmoothingStrategy,
) -> SignalResult<Vec<(String, SmoothedTrack)>> {
    layout
        .chromosomes
        .par_iter()
        .map(|entry| {
            let input = SmoothInput::Genome {
                set,
                layout,
                chromosome: entry.index,
            };
            log::debug!("Smoothing {}", entry.name);
            Ok((entry.name.clone(), smooth(input, strategy)?))
        })
        .collect()
}

fn check_bandwidth(bandwidth: u64) -> SignalResult<()> {
    if bandwidth == 0 {
        return Err(SignalError::InvalidParameter(
            "bandwidth must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Mean signal over consecutive non-overlapping windows of `bandwidth` bp
///
/// Windows are laid out by position value starting at the first position:
/// `[s, s + bandwidth)`, each reported at `s + (bandwidth - 1) / 2`.
/// Windows without observations are omitted. `series` must be sorted by
/// position.
///
/// The series collapses to a single window once `bandwidth` reaches the
/// inclusive span `last - first + 1`. At `bandwidth == last - first` the last
/// position starts a second window.
pub fn sliding_window_mean(series: &[(i64, f64)], bandwidth: u64) -> SignalResult<SmoothedTrack> {
    check_bandwidth(bandwidth)?;
    let origin = match series.first() {
        Some(&(position, _)) => position,
        None => return Err(SignalError::EmptyInput("nothing to smooth".to_string())),
    };
    let width = bandwidth as i64;

    let mut points = Vec::new();
    let mut current: Option<(i64, f64, usize)> = None;
    for &(position, signal) in series {
        let window = (position - origin).div_euclid(width);
        if let Some((w, sum, n)) = current.as_mut() {
            if *w == window {
                *sum += signal;
                *n += 1;
                continue;
            }
        }
        if let Some((w, sum, n)) = current.replace((window, signal, 1)) {
            points.push(window_point(origin, width, w, sum, n));
        }
    }
    if let Some((w, sum, n)) = current {
        points.push(window_point(origin, width, w, sum, n));
    }

    Ok(SmoothedTrack {
        points,
        unsupported: Vec::new(),
    })
}

fn window_point(origin: i64, width: i64, window: i64, sum: f64, n: usize) -> SmoothedPoint {
    let start = origin + window * width;
    SmoothedPoint {
        position: start + (width - 1) / 2,
        signal: sum / n as f64,
    }
}

/// Gaussian kernel regression of `series` at the positions of `grid`
///
/// Points without any input inside the kernel support are left out of the
/// result and listed in [`SmoothedTrack::unsupported`]. `series` must be
/// sorted by position.
pub fn kernel_regression(
    series: &[(i64, f64)],
    bandwidth: u64,
    grid: EvaluationGrid,
) -> SignalResult<SmoothedTrack> {
    check_bandwidth(bandwidth)?;
    let (first, last) = match (series.first(), series.last()) {
        (Some(&(first, _)), Some(&(last, _))) => (first, last),
        _ => return Err(SignalError::EmptyInput("nothing to smooth".to_string())),
    };

    let eval: Vec<i64> = match grid {
        EvaluationGrid::Original => series.iter().map(|&(p, _)| p).collect(),
        EvaluationGrid::Regular { step: 0 } => {
            return Err(SignalError::InvalidParameter(
                "grid step must be positive".to_string(),
            ))
        }
        EvaluationGrid::Regular { step } => (first..=last).step_by(step as usize).collect(),
    };

    let sd = 0.25 * bandwidth as f64 / NORMAL_QUARTILE;
    let cutoff = KERNEL_CUTOFF_SD * sd;

    let mut track = SmoothedTrack::default();
    for x in eval {
        let xf = x as f64;
        let lo = series.partition_point(|&(p, _)| (p as f64) <= xf - cutoff);
        let mut weight_sum = 0.0;
        let mut weighted = 0.0;
        for &(p, signal) in &series[lo..] {
            let d = p as f64 - xf;
            if d >= cutoff {
                break;
            }
            let w = (-0.5 * (d / sd).powi(2)).exp();
            weight_sum += w;
            weighted += w * signal;
        }

        if weight_sum > 0.0 {
            track.points.push(SmoothedPoint {
                position: x,
                signal: weighted / weight_sum,
            });
        } else {
            track.unsupported.push(x);
        }
    }

    if !track.unsupported.is_empty() {
        log::warn!(
            "{} kernel evaluation point(s) have no data within {:.0} bp and were left out",
            track.unsupported.len(),
            cutoff
        );
    }
    Ok(track)
}

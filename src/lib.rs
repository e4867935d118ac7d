//! yeastwig - anchor-relative signal extraction for yeast wiggle tracks
//!
//! Turns per-chromosome ChIP-seq coverage tracks from S288C or SK1 into
//! telomere-, centromere- and summit-relative profiles, genome-wide
//! averages and smoothed series.
//!
//! # Features
//!
//! - Automatic detection of S288C (`chrI`) vs SK1 (`chr01`) chromosome naming
//! - Bundled centromere and chromosome length tables
//! - Arm-aware telomere distances, signed summit distances
//! - Sliding-window and Gaussian kernel smoothing
//! - Parallel per-chromosome processing with rayon
//!
//! # Example
//!
//! ```ignore
//! use yeastwig::core::{detect_scheme, signal_from_telomeres, telomere_summary, AnchorTable};
//! use yeastwig::formats::read_tracks;
//!
//! let (tracks, _) = read_tracks("sample_wigs/")?;
//! let layout = detect_scheme(&tracks)?;
//! let anchors = AnchorTable::bundled(layout.scheme);
//! let profiles = signal_from_telomeres(&tracks, &layout, anchors, 120_000)?;
//! let summary = telomere_summary(&profiles)?;
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    detect_scheme, genome_average, signal_at_summit, signal_average, signal_from_telomeres,
    smooth, AnchorTable, ChromosomeTrack, GenomeLayout, GenomeScheme, GenomeTrackSet,
    RegionProfile, SignalError, SmoothingStrategy, YeastWigError,
};

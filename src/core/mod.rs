//! Core signal extraction functionality
//!
//! This module contains genome scheme detection, the anchor reference
//! tables, position lookup, region extraction, aggregation and smoothing.

pub mod aggregate;
pub mod anchors;
mod error;
pub mod extract;
mod index;
pub mod io;
pub mod scheme;
pub mod smooth;
mod track;

pub use aggregate::{
    chromosome_averages, genome_average, signal_average, telomere_summary, AggregatedPoint,
    AggregatedProfile, ChromosomeAverage, TelomereSummary,
};
pub use anchors::{lookup, AnchorRecord, AnchorTable};
pub use error::{Bound, Result, SignalError, SignalResult, YeastWigError};
pub use extract::{
    centromere_summits, extract_summit, extract_telomeres, signal_at_centromeres,
    signal_at_summit, signal_from_telomeres, telomere_distance, Arm, ExtractionStats,
    ProfilePoint, RegionProfile, Summit, SummitOptions, DEFAULT_CENTROMERE_WINDOW,
    DEFAULT_SUMMIT_WINDOW, DEFAULT_TELOMERE_WINDOW,
};
pub use index::PositionIndexer;
pub use io::{detect_compression, open_input, CompressionFormat, DEFAULT_BUFFER_SIZE};
pub use scheme::{
    chrom_index, detect_scheme, label_matches, translate_label, ChromosomeEntry, GenomeLayout,
    GenomeScheme, SizeClass, CHROMOSOME_COUNT,
};
pub use smooth::{
    kernel_regression, sliding_window_mean, smooth, smooth_genome, EvaluationGrid,
    SmoothInput, SmoothedPoint, SmoothedTrack, SmoothingStrategy, DEFAULT_BANDWIDTH,
};
pub use track::{ChromosomeTrack, GenomeTrackSet, TrackPoint};

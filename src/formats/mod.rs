//! File format adapters
//!
//! Readers for wiggle/bedGraph/BigWig tracks and anchor lists, and writers
//! for the tab-separated output tables.

pub mod table;
pub mod wig;

pub use table::{
    append_aggregated, read_summits, write_aggregated, write_chromosome_averages,
    write_region_profiles, write_smoothed,
};
pub use wig::{
    read_track_dir, read_track_set, read_tracks, read_wig_file, ReadStats, WigDataPoint,
    WigDeclaration, WigFormat, WigParseError, WigReader,
};

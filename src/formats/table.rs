//! Tab-separated tables
//!
//! Output tables for profiles and smoothed tracks, and the anchor list
//! reader used for summit extraction.

use crate::core::{
    AggregatedProfile, ChromosomeAverage, RegionProfile, Result, SmoothedTrack, Summit,
    YeastWigError,
};
use std::io::{BufRead, Write};

/// Write region profiles, one row per point
pub fn write_region_profiles<W: Write>(out: &mut W, profiles: &[RegionProfile]) -> Result<()> {
    writeln!(out, "chrom\tarm\tsize_class\tanchor\tdistance\tsignal")?;
    for profile in profiles {
        let arm = profile.arm.map(|a| a.as_str()).unwrap_or(".");
        for point in &profile.points {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}",
                profile.chrom,
                arm,
                profile.size_class.as_str(),
                profile.anchor,
                point.distance,
                point.signal
            )?;
        }
    }
    Ok(())
}

/// Write an averaged profile, optionally tagged with a group name
pub fn write_aggregated<W: Write>(
    out: &mut W,
    profile: &AggregatedProfile,
    group: Option<&str>,
) -> Result<()> {
    match group {
        Some(_) => writeln!(out, "group\tcoordinate\tmean_signal\tn_observations")?,
        None => writeln!(out, "coordinate\tmean_signal\tn_observations")?,
    }
    append_aggregated(out, profile, group)
}

/// Append averaged profile rows without a header
pub fn append_aggregated<W: Write>(
    out: &mut W,
    profile: &AggregatedProfile,
    group: Option<&str>,
) -> Result<()> {
    for point in &profile.points {
        if let Some(group) = group {
            write!(out, "{}\t", group)?;
        }
        writeln!(
            out,
            "{}\t{}\t{}",
            point.coordinate, point.mean, point.n_observations
        )?;
    }
    Ok(())
}

/// Write smoothed tracks as `chrom position signal`
pub fn write_smoothed<W: Write>(out: &mut W, tracks: &[(String, SmoothedTrack)]) -> Result<()> {
    writeln!(out, "chrom\tposition\tsmoothed_signal")?;
    for (chrom, track) in tracks {
        for point in &track.points {
            writeln!(out, "{}\t{}\t{}", chrom, point.position, point.signal)?;
        }
    }
    Ok(())
}

/// Write per-chromosome averages
pub fn write_chromosome_averages<W: Write>(
    out: &mut W,
    averages: &[ChromosomeAverage],
) -> Result<()> {
    writeln!(out, "chrom\tmean_signal\tn_observations")?;
    for avg in averages {
        writeln!(out, "{}\t{}\t{}", avg.chrom, avg.mean, avg.n_observations)?;
    }
    Ok(())
}

/// Read anchors from `chrom position` or BED `chrom start end ...` lines
///
/// BED intervals are reduced to their midpoint `(start + end) / 2`.
/// Blank, `#`, `track` and `browser` lines are skipped.
pub fn read_summits<R: BufRead>(reader: R) -> Result<Vec<Summit>> {
    let mut summits = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let number = |value: &str| {
            value.parse::<u64>().map_err(|e| YeastWigError::InvalidTable {
                line: line_no,
                message: format!("'{}': {}", value, e),
            })
        };

        let position = match fields.len() {
            0 | 1 => {
                return Err(YeastWigError::InvalidTable {
                    line: line_no,
                    message: "expected chrom and position".to_string(),
                })
            }
            2 => number(fields[1])?,
            _ => {
                let start = number(fields[1])?;
                let end = number(fields[2])?;
                if end < start {
                    return Err(YeastWigError::InvalidTable {
                        line: line_no,
                        message: format!("end {} before start {}", end, start),
                    });
                }
                (start + end) / 2
            }
        };
        summits.push(Summit::new(fields[0], position));
    }
    Ok(summits)
}

//! Wiggle/BigWig track reader
//!
//! Reads variableStep, fixedStep and bedGraph-style lines into a
//! [`GenomeTrackSet`]. Positions are kept 1-based, as written in wiggle
//! files; bedGraph starts are shifted by one to match.

use crate::core::io::open_input;
use crate::core::{ChromosomeTrack, GenomeTrackSet, Result, TrackPoint};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

/// Wiggle parsing error
#[derive(Debug, Error)]
pub enum WigParseError {
    #[error("Invalid format at line {line}: {message}")]
    InvalidFormat { line: usize, message: String },

    #[error("Invalid number at line {line}: {value}")]
    InvalidNumber { line: usize, value: String },

    #[error("Missing chrom parameter at line {0}")]
    MissingChrom(usize),

    #[error("Missing start parameter at line {0}")]
    MissingStart(usize),

    #[error("Data line before declaration at line {0}")]
    DataBeforeDeclaration(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wiggle format type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WigFormat {
    VariableStep,
    FixedStep,
}

/// Wiggle declaration line parameters
#[derive(Debug, Clone)]
pub struct WigDeclaration {
    pub format: WigFormat,
    pub chrom: String,
    pub span: u64,
    pub start: Option<u64>, // Only for fixedStep
    pub step: Option<u64>,  // Only for fixedStep
}

impl WigDeclaration {
    /// Parse a declaration line (variableStep or fixedStep)
    pub fn parse(line: &str, line_no: usize) -> std::result::Result<Self, WigParseError> {
        let line = line.trim();

        let (format, rest) = if let Some(rest) = line.strip_prefix("variableStep") {
            (WigFormat::VariableStep, rest)
        } else if let Some(rest) = line.strip_prefix("fixedStep") {
            (WigFormat::FixedStep, rest)
        } else {
            return Err(WigParseError::InvalidFormat {
                line: line_no,
                message: "expected variableStep or fixedStep".to_string(),
            });
        };

        let number = |value: &str| {
            value.parse::<u64>().map_err(|_| WigParseError::InvalidNumber {
                line: line_no,
                value: value.to_string(),
            })
        };

        let mut chrom = None;
        let mut span = 1u64;
        let mut start = None;
        let mut step = None;

        for part in rest.split_whitespace() {
            if let Some((key, value)) = part.split_once('=') {
                match key {
                    "chrom" => chrom = Some(value.to_string()),
                    "span" => span = number(value)?,
                    "start" => start = Some(number(value)?),
                    "step" => step = Some(number(value)?),
                    _ => {}
                }
            }
        }

        let chrom = chrom.ok_or(WigParseError::MissingChrom(line_no))?;
        if format == WigFormat::FixedStep && start.is_none() {
            return Err(WigParseError::MissingStart(line_no));
        }

        Ok(Self {
            format,
            chrom,
            span,
            start,
            step,
        })
    }
}

/// A single wiggle observation
#[derive(Debug, Clone, PartialEq)]
pub struct WigDataPoint {
    pub chrom: String,
    /// 1-based position
    pub position: u64,
    pub value: f64,
}

/// Read statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
}

/// Parse a wiggle stream and yield data points
pub struct WigReader<R: BufRead> {
    reader: R,
    current_decl: Option<WigDeclaration>,
    current_pos: u64, // For fixedStep
    line_no: usize,
    line_buffer: String,
}

impl<R: BufRead> WigReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            current_decl: None,
            current_pos: 0,
            line_no: 0,
            line_buffer: String::with_capacity(256),
        }
    }

    fn parse_data_line(&mut self) -> std::result::Result<WigDataPoint, WigParseError> {
        let line_no = self.line_no;
        let line = self.line_buffer.trim();
        let parts: Vec<&str> = line.split_whitespace().collect();

        // bedGraph: chrom start end value (0-based start)
        if parts.len() >= 4 {
            if let (Ok(start), Ok(value)) = (parts[1].parse::<u64>(), parts[3].parse::<f64>()) {
                return Ok(WigDataPoint {
                    chrom: parts[0].to_string(),
                    position: start + 1,
                    value,
                });
            }
        }

        let decl = self
            .current_decl
            .as_ref()
            .ok_or(WigParseError::DataBeforeDeclaration(line_no))?;
        let invalid = |value: &str| WigParseError::InvalidNumber {
            line: line_no,
            value: value.to_string(),
        };

        match decl.format {
            WigFormat::VariableStep => {
                if parts.len() < 2 {
                    return Err(WigParseError::InvalidFormat {
                        line: line_no,
                        message: format!("expected position and value: {}", line),
                    });
                }
                let position: u64 = parts[0].parse().map_err(|_| invalid(parts[0]))?;
                let value: f64 = parts[1].parse().map_err(|_| invalid(parts[1]))?;
                Ok(WigDataPoint {
                    chrom: decl.chrom.clone(),
                    position,
                    value,
                })
            }
            WigFormat::FixedStep => {
                let value: f64 = line.parse().map_err(|_| invalid(line))?;
                let position = self.current_pos;
                self.current_pos += decl.step.unwrap_or(decl.span);
                Ok(WigDataPoint {
                    chrom: decl.chrom.clone(),
                    position,
                    value,
                })
            }
        }
    }
}

impl<R: BufRead> Iterator for WigReader<R> {
    type Item = std::result::Result<WigDataPoint, WigParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_buffer.clear();
            match self.reader.read_line(&mut self.line_buffer) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => return Some(Err(e.into())),
            }

            let line = self.line_buffer.trim();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with("track")
                || line.starts_with("browser")
            {
                continue;
            }

            if line.starts_with("variableStep") || line.starts_with("fixedStep") {
                match WigDeclaration::parse(line, self.line_no) {
                    Ok(decl) => {
                        if let Some(start) = decl.start {
                            self.current_pos = start;
                        }
                        self.current_decl = Some(decl);
                        continue;
                    }
                    Err(e) => return Some(Err(e)),
                }
            }

            return Some(self.parse_data_line());
        }
    }
}

/// Collect points into per-label tracks
///
/// `label_for` picks the track label of each point. Malformed lines are
/// logged and skipped; I/O errors and repeated positions abort the read.
fn collect_tracks<R, F>(
    reader: WigReader<R>,
    stats: &mut ReadStats,
    by_label: &mut BTreeMap<String, Vec<TrackPoint>>,
    label_for: F,
) -> Result<()>
where
    R: BufRead,
    F: Fn(&WigDataPoint) -> String,
{
    for result in reader {
        stats.total += 1;
        match result {
            Ok(point) => {
                by_label
                    .entry(label_for(&point))
                    .or_default()
                    .push(TrackPoint::new(point.position, point.value));
                stats.loaded += 1;
            }
            Err(WigParseError::Io(e)) => return Err(e.into()),
            Err(e) => {
                log::warn!("{}", e);
                stats.failed += 1;
            }
        }
    }
    Ok(())
}

fn build_track_set(by_label: BTreeMap<String, Vec<TrackPoint>>) -> Result<GenomeTrackSet> {
    let mut set = GenomeTrackSet::new();
    for (label, points) in by_label {
        set.insert(label, ChromosomeTrack::from_unsorted(points)?);
    }
    Ok(set)
}

/// Read a multi-chromosome wiggle stream, one track per declared chromosome
pub fn read_track_set<R: BufRead>(reader: R) -> Result<(GenomeTrackSet, ReadStats)> {
    let mut stats = ReadStats::default();
    let mut by_label = BTreeMap::new();
    collect_tracks(WigReader::new(reader), &mut stats, &mut by_label, |p| {
        p.chrom.clone()
    })?;
    Ok((build_track_set(by_label)?, stats))
}

/// Read a (possibly compressed) wiggle file
pub fn read_wig_file<P: AsRef<Path>>(path: P) -> Result<(GenomeTrackSet, ReadStats)> {
    let reader = open_input(path.as_ref())?;
    let (set, stats) = read_track_set(reader)?;
    log::info!(
        "Loaded {} chromosome(s), {} points from {:?}",
        set.len(),
        stats.loaded,
        path.as_ref()
    );
    Ok((set, stats))
}

/// Read a directory holding one wiggle file per chromosome
///
/// Each file becomes one track labelled with its file name (for example
/// `chr01.wig`), whatever chromosome its declarations name. Hidden files
/// are skipped.
pub fn read_track_dir<P: AsRef<Path>>(dir: P) -> Result<(GenomeTrackSet, ReadStats)> {
    let mut stats = ReadStats::default();
    let mut by_label = BTreeMap::new();

    let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let label = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if !name.starts_with('.') => name.to_string(),
            _ => continue,
        };
        log::debug!("Reading {:?} as {}", path, label);
        let reader = WigReader::new(open_input(&path)?);
        collect_tracks(reader, &mut stats, &mut by_label, |_| label.clone())?;
    }

    let set = build_track_set(by_label)?;
    log::info!(
        "Loaded {} chromosome file(s), {} points from {:?}",
        set.len(),
        stats.loaded,
        dir.as_ref()
    );
    Ok((set, stats))
}

/// Read tracks from a directory, a BigWig file or a wiggle file
pub fn read_tracks<P: AsRef<Path>>(path: P) -> Result<(GenomeTrackSet, ReadStats)> {
    let path = path.as_ref();
    if path.is_dir() {
        return read_track_dir(path);
    }
    #[cfg(feature = "bigwig")]
    {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        if matches!(ext.as_deref(), Some("bw") | Some("bigwig")) {
            return bigwig::read_bigwig(path);
        }
    }
    read_wig_file(path)
}

/// BigWig support module
#[cfg(feature = "bigwig")]
pub mod bigwig {
    use super::*;
    use bigtools::BigWigRead;

    fn io_error(message: impl ToString) -> WigParseError {
        WigParseError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            message.to_string(),
        ))
    }

    /// Read every interval of a BigWig file, one row per interval start
    pub fn read_bigwig<P: AsRef<Path>>(path: P) -> Result<(GenomeTrackSet, ReadStats)> {
        let path_str = path
            .as_ref()
            .to_str()
            .ok_or_else(|| io_error(format!("non UTF-8 path {:?}", path.as_ref())))?;
        let mut reader = BigWigRead::open_file(path_str).map_err(io_error)?;

        let chroms = reader.chroms().to_vec();
        let mut stats = ReadStats::default();
        let mut by_label: BTreeMap<String, Vec<TrackPoint>> = BTreeMap::new();

        for chrom_info in chroms {
            let intervals = reader
                .get_interval(&chrom_info.name, 0, chrom_info.length)
                .map_err(io_error)?;

            let points = by_label.entry(chrom_info.name.clone()).or_default();
            for interval in intervals {
                let interval = interval.map_err(io_error)?;
                stats.total += 1;
                stats.loaded += 1;
                points.push(TrackPoint::new(
                    interval.start as u64 + 1,
                    interval.value as f64,
                ));
            }
        }

        let set = build_track_set(by_label)?;
        log::info!(
            "Loaded {} chromosome(s), {} intervals from {:?}",
            set.len(),
            stats.loaded,
            path.as_ref()
        );
        Ok((set, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_variable_step_declaration() {
        let decl = WigDeclaration::parse("variableStep chrom=chrI span=10", 1).unwrap();
        assert_eq!(decl.format, WigFormat::VariableStep);
        assert_eq!(decl.chrom, "chrI");
        assert_eq!(decl.span, 10);
        assert!(decl.start.is_none());
    }

    #[test]
    fn test_fixed_step_declaration() {
        let decl = WigDeclaration::parse("fixedStep chrom=chr02 start=1000 step=100", 1).unwrap();
        assert_eq!(decl.format, WigFormat::FixedStep);
        assert_eq!(decl.start, Some(1000));
        assert_eq!(decl.step, Some(100));
        assert_eq!(decl.span, 1);
    }

    #[test]
    fn test_missing_chrom_error() {
        let result = WigDeclaration::parse("variableStep span=10", 7);
        assert!(matches!(result, Err(WigParseError::MissingChrom(7))));
    }

    #[test]
    fn test_fixed_step_missing_start_error() {
        let result = WigDeclaration::parse("fixedStep chrom=chrI step=100", 2);
        assert!(matches!(result, Err(WigParseError::MissingStart(2))));
    }

    #[test]
    fn test_reader_variable_step_keeps_positions() {
        let wig = "variableStep chrom=chrI\n1000 1.5\n2000 2.5\n";
        let points: Vec<_> = WigReader::new(Cursor::new(wig))
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(
            points,
            vec![
                WigDataPoint { chrom: "chrI".into(), position: 1000, value: 1.5 },
                WigDataPoint { chrom: "chrI".into(), position: 2000, value: 2.5 },
            ]
        );
    }

    #[test]
    fn test_reader_fixed_step() {
        let wig = "fixedStep chrom=chrI start=11 step=5\n1.0\n2.0\n3.0\n";
        let positions: Vec<u64> = WigReader::new(Cursor::new(wig))
            .map(|p| p.unwrap().position)
            .collect();
        assert_eq!(positions, vec![11, 16, 21]);
    }

    #[test]
    fn test_reader_bedgraph_line() {
        let wig = "chrII\t99\t100\t4.0\n";
        let point = WigReader::new(Cursor::new(wig)).next().unwrap().unwrap();
        assert_eq!(point.chrom, "chrII");
        assert_eq!(point.position, 100);
    }

    #[test]
    fn test_reader_skips_headers() {
        let wig = "# comment\ntrack type=wiggle_0\nbrowser position chrI:1-10\nvariableStep chrom=chrI\n5 1.0\n";
        let points: Vec<_> = WigReader::new(Cursor::new(wig)).collect();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_reader_data_before_declaration() {
        let wig = "5 1.0\n";
        let result = WigReader::new(Cursor::new(wig)).next().unwrap();
        assert!(matches!(result, Err(WigParseError::DataBeforeDeclaration(1))));
    }

    #[test]
    fn test_read_track_set_groups_and_sorts() {
        let wig = "\
variableStep chrom=chrI
30 3.0
10 1.0
variableStep chrom=chrII
5 5.0
bad line here
";
        let (set, stats) = read_track_set(Cursor::new(wig)).unwrap();
        assert_eq!(set.len(), 2);
        let chr1: Vec<u64> = set.get("chrI").unwrap().points().iter().map(|p| p.position).collect();
        assert_eq!(chr1, vec![10, 30]);
        assert_eq!(stats.loaded, 3);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_read_track_set_duplicate_position() {
        let wig = "variableStep chrom=chrI\n10 1.0\n10 2.0\n";
        assert!(read_track_set(Cursor::new(wig)).is_err());
    }
}

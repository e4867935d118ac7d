//! Reference anchor coordinates
//!
//! Chromosome lengths and centromere midpoints for the two supported
//! assemblies. The bundled tables are built once on first use and shared
//! read-only; a table can also be loaded from a tab-separated file to
//! override the bundled coordinates.

use crate::core::error::{Result, SignalError, SignalResult, YeastWigError};
use crate::core::scheme::{chrom_index, translate_label, GenomeScheme, CHROMOSOME_COUNT};
use once_cell::sync::Lazy;
use std::io::BufRead;

/// (length, centromere midpoint) per chromosome, S288C R64 coordinates
const S288C_ROWS: [(u64, u64); CHROMOSOME_COUNT] = [
    (230_218, 151_524),
    (813_184, 238_265),
    (316_620, 114_443),
    (1_531_933, 449_766),
    (576_874, 152_045),
    (270_161, 148_568),
    (1_090_940, 496_979),
    (562_643, 105_644),
    (439_888, 355_687),
    (745_751, 436_366),
    (666_816, 440_187),
    (1_078_177, 150_887),
    (924_431, 268_090),
    (784_333, 628_816),
    (1_091_291, 326_643),
    (948_066, 556_015),
];

/// (length, centromere midpoint) per chromosome, SK1 coordinates
///
/// Approximate values, not taken from a named SK1 assembly release. Runs that
/// need exact positions should pass a table built from their own SK1
/// assembly through [`AnchorTable::from_reader`].
const SK1_ROWS: [(u64, u64); CHROMOSOME_COUNT] = [
    (203_893, 137_832),
    (794_508, 226_428),
    (342_718, 112_566),
    (1_490_682, 436_318),
    (589_812, 150_020),
    (271_539, 148_380),
    (1_080_849, 488_660),
    (546_207, 100_590),
    (440_036, 341_985),
    (728_650, 427_345),
    (660_900, 433_990),
    (1_050_939, 147_570),
    (913_390, 266_890),
    (768_418, 622_690),
    (1_070_770, 321_750),
    (933_700, 552_400),
];

static S288C_TABLE: Lazy<AnchorTable> =
    Lazy::new(|| AnchorTable::from_rows(GenomeScheme::S288C, &S288C_ROWS));

static SK1_TABLE: Lazy<AnchorTable> = Lazy::new(|| {
    log::warn!("Using approximate bundled SK1 coordinates; pass --anchors for exact positions");
    AnchorTable::from_rows(GenomeScheme::SK1, &SK1_ROWS)
});

/// Reference coordinates of one chromosome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRecord {
    /// Canonical chromosome name
    pub chrom: String,
    /// Chromosome length in bp
    pub length: u64,
    /// Centromere midpoint in bp
    pub centromere: u64,
}

impl AnchorRecord {
    /// Create a record, checking that the midpoint lies strictly inside the chromosome
    pub fn new(chrom: impl Into<String>, length: u64, centromere: u64) -> SignalResult<Self> {
        let chrom = chrom.into();
        if centromere == 0 || centromere >= length {
            return Err(SignalError::InvalidAnchor {
                chrom,
                length,
                centromere,
            });
        }
        Ok(Self {
            chrom,
            length,
            centromere,
        })
    }
}

/// Anchor lookup for one genome scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorTable {
    scheme: GenomeScheme,
    records: Vec<AnchorRecord>,
}

impl AnchorTable {
    fn from_rows(scheme: GenomeScheme, rows: &[(u64, u64); CHROMOSOME_COUNT]) -> Self {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, &(length, centromere))| AnchorRecord {
                chrom: scheme.chrom_name(i + 1).unwrap_or_default(),
                length,
                centromere,
            })
            .collect();
        Self { scheme, records }
    }

    /// Bundled reference table for `scheme`
    pub fn bundled(scheme: GenomeScheme) -> &'static AnchorTable {
        match scheme {
            GenomeScheme::S288C => &S288C_TABLE,
            GenomeScheme::SK1 => &SK1_TABLE,
        }
    }

    /// Build a table from explicit records
    ///
    /// Record names may use either naming scheme; they are stored under the
    /// canonical name of `scheme`. All 16 chromosomes must be present.
    pub fn new(scheme: GenomeScheme, records: Vec<AnchorRecord>) -> SignalResult<Self> {
        let mut canonical = Vec::with_capacity(records.len());
        for record in records {
            let chrom = translate_label(&record.chrom, scheme).ok_or_else(|| {
                SignalError::UnknownChromosome {
                    scheme: scheme.to_string(),
                    chrom: record.chrom.clone(),
                }
            })?;
            canonical.push(AnchorRecord::new(chrom, record.length, record.centromere)?);
        }

        for name in scheme.chrom_names() {
            if !canonical.iter().any(|r| r.chrom == name) {
                return Err(SignalError::MissingChromosome(name));
            }
        }
        canonical.sort_by_key(|r| chrom_index(&r.chrom));

        Ok(Self {
            scheme,
            records: canonical,
        })
    }

    /// Read a table of `chrom<TAB>length<TAB>centromere` lines
    ///
    /// Blank lines, `#` comments and a leading `chrom` header are skipped.
    pub fn from_reader<R: BufRead>(scheme: GenomeScheme, reader: R) -> Result<Self> {
        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields[0].eq_ignore_ascii_case("chrom") {
                continue;
            }
            if fields.len() < 3 {
                return Err(YeastWigError::InvalidTable {
                    line: line_no,
                    message: format!("expected 3 columns, found {}", fields.len()),
                });
            }
            let parse = |value: &str| {
                value.parse::<u64>().map_err(|e| YeastWigError::InvalidTable {
                    line: line_no,
                    message: format!("'{}': {}", value, e),
                })
            };
            records.push(AnchorRecord {
                chrom: fields[0].to_string(),
                length: parse(fields[1])?,
                centromere: parse(fields[2])?,
            });
        }
        Ok(Self::new(scheme, records)?)
    }

    pub fn scheme(&self) -> GenomeScheme {
        self.scheme
    }

    pub fn records(&self) -> &[AnchorRecord] {
        &self.records
    }

    /// Record for a chromosome label
    ///
    /// Labels in the other scheme's convention are translated first.
    pub fn lookup(&self, label: &str) -> SignalResult<&AnchorRecord> {
        let name = translate_label(label, self.scheme);
        name.as_deref()
            .and_then(|name| self.records.iter().find(|r| r.chrom == name))
            .ok_or_else(|| SignalError::UnknownChromosome {
                scheme: self.scheme.to_string(),
                chrom: label.to_string(),
            })
    }
}

/// Look up a chromosome in the bundled table of `scheme`
pub fn lookup(scheme: GenomeScheme, label: &str) -> SignalResult<&'static AnchorRecord> {
    AnchorTable::bundled(scheme).lookup(label)
}

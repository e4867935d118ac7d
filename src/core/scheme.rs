//! Reference genome naming schemes
//!
//! Yeast tracks come labelled either with roman numerals (`chrI`..`chrXVI`,
//! S288C) or with zero-padded arabic numbers (`chr01`..`chr16`, SK1). The
//! scheme is detected once per track set and threaded through every later
//! step as a [`GenomeLayout`].

use crate::core::error::{SignalError, SignalResult};
use crate::core::track::{ChromosomeTrack, GenomeTrackSet};

/// Number of nuclear chromosomes in both reference assemblies
pub const CHROMOSOME_COUNT: usize = 16;

const ROMAN: [&str; CHROMOSOME_COUNT] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV",
    "XV", "XVI",
];

/// 1-based indices of the small chromosomes (I, III, VI)
const SMALL_CHROMOSOMES: [usize; 3] = [1, 3, 6];

/// Supported reference genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenomeScheme {
    /// Roman numeral labels
    S288C,
    /// Zero-padded arabic labels
    SK1,
}

impl GenomeScheme {
    /// Canonical name of the 1-based chromosome `index`
    ///
    /// # Examples
    /// ```
    /// use yeastwig::core::GenomeScheme;
    /// assert_eq!(GenomeScheme::S288C.chrom_name(4).as_deref(), Some("chrIV"));
    /// assert_eq!(GenomeScheme::SK1.chrom_name(4).as_deref(), Some("chr04"));
    /// assert_eq!(GenomeScheme::SK1.chrom_name(17), None);
    /// ```
    pub fn chrom_name(&self, index: usize) -> Option<String> {
        if !(1..=CHROMOSOME_COUNT).contains(&index) {
            return None;
        }
        Some(match self {
            GenomeScheme::S288C => format!("chr{}", ROMAN[index - 1]),
            GenomeScheme::SK1 => format!("chr{:02}", index),
        })
    }

    /// All 16 canonical names in chromosome order
    pub fn chrom_names(&self) -> Vec<String> {
        (1..=CHROMOSOME_COUNT)
            .filter_map(|i| self.chrom_name(i))
            .collect()
    }

    /// Label of chromosome 1, used to tell the schemes apart
    pub fn leading_label(&self) -> &'static str {
        match self {
            GenomeScheme::S288C => "chrI",
            GenomeScheme::SK1 => "chr01",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenomeScheme::S288C => "S288C",
            GenomeScheme::SK1 => "SK1",
        }
    }

    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s288c" => Some(GenomeScheme::S288C),
            "sk1" => Some(GenomeScheme::SK1),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenomeScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chromosome size class used to pool telomere profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Large,
}

impl SizeClass {
    /// Size class of the 1-based chromosome `index`
    pub fn of_index(index: usize) -> Self {
        if SMALL_CHROMOSOMES.contains(&index) {
            SizeClass::Small
        } else {
            SizeClass::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Large => "large",
        }
    }
}

/// Parse the 1-based chromosome index out of a label in either scheme
///
/// Accepts an optional `chr` prefix and ignores anything after the first `.`.
///
/// # Examples
/// ```
/// use yeastwig::core::chrom_index;
/// assert_eq!(chrom_index("chrXIV"), Some(14));
/// assert_eq!(chrom_index("chr14.wig"), Some(14));
/// assert_eq!(chrom_index("IX"), Some(9));
/// assert_eq!(chrom_index("chrM"), None);
/// ```
pub fn chrom_index(label: &str) -> Option<usize> {
    let base = label.split('.').next().unwrap_or(label);
    let body = match base.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &base[3..],
        _ => base,
    };

    if let Ok(n) = body.parse::<usize>() {
        return (1..=CHROMOSOME_COUNT).contains(&n).then_some(n);
    }
    let upper = body.to_uppercase();
    ROMAN.iter().position(|r| *r == upper).map(|i| i + 1)
}

/// Rewrite a chromosome label into the naming convention of `target`
///
/// # Examples
/// ```
/// use yeastwig::core::{translate_label, GenomeScheme};
/// assert_eq!(translate_label("chrXVI", GenomeScheme::SK1).as_deref(), Some("chr16"));
/// assert_eq!(translate_label("chr03", GenomeScheme::S288C).as_deref(), Some("chrIII"));
/// ```
pub fn translate_label(label: &str, target: GenomeScheme) -> Option<String> {
    chrom_index(label).and_then(|i| target.chrom_name(i))
}

/// Check whether an input label refers to the canonical chromosome `name`
///
/// A label matches when it equals the name or contains the name followed by
/// a dot (per-chromosome file names such as `chrI.wig`).
pub fn label_matches(label: &str, name: &str) -> bool {
    label == name || label.contains(&format!("{}.", name))
}

/// One chromosome of a detected layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeEntry {
    /// 1-based chromosome number
    pub index: usize,
    /// Canonical name in the detected scheme
    pub name: String,
    /// Key of this chromosome in the input track set
    pub label: String,
    pub size_class: SizeClass,
}

/// Detected scheme plus canonical chromosome order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeLayout {
    pub scheme: GenomeScheme,
    pub chromosomes: Vec<ChromosomeEntry>,
}

impl GenomeLayout {
    /// Entry for the 1-based chromosome `index`
    pub fn entry(&self, index: usize) -> Option<&ChromosomeEntry> {
        self.chromosomes.iter().find(|c| c.index == index)
    }

    /// Entry whose canonical name or input label equals `label`
    pub fn find(&self, label: &str) -> Option<&ChromosomeEntry> {
        self.chromosomes
            .iter()
            .find(|c| c.name == label || c.label == label)
            .or_else(|| {
                let index = chrom_index(label)?;
                self.entry(index)
            })
    }

    /// Canonical names in chromosome order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chromosomes.iter().map(|c| c.name.as_str())
    }

    /// Look up the track of a layout entry
    pub fn track<'a>(
        &self,
        set: &'a GenomeTrackSet,
        entry: &ChromosomeEntry,
    ) -> SignalResult<&'a ChromosomeTrack> {
        set.get(&entry.label)
            .ok_or_else(|| SignalError::MissingChromosome(entry.name.clone()))
    }
}

/// Classify a track set into one of the supported schemes
///
/// Exactly one scheme's leading label must be present; both or neither is an
/// [`SignalError::UnrecognizedGenome`]. Every one of the 16 chromosomes must
/// then resolve to an input label. Extra labels (for example `chrM`) are ignored.
pub fn detect_scheme(set: &GenomeTrackSet) -> SignalResult<GenomeLayout> {
    let has = |scheme: GenomeScheme| {
        set.labels()
            .any(|label| label_matches(label, scheme.leading_label()))
    };

    let scheme = match (has(GenomeScheme::SK1), has(GenomeScheme::S288C)) {
        (true, false) => GenomeScheme::SK1,
        (false, true) => GenomeScheme::S288C,
        (true, true) => {
            return Err(SignalError::UnrecognizedGenome(
                "labels match both SK1 (chr01) and S288C (chrI) naming".to_string(),
            ))
        }
        (false, false) => {
            return Err(SignalError::UnrecognizedGenome(
                "labels match neither SK1 (chr01) nor S288C (chrI) naming".to_string(),
            ))
        }
    };

    let mut chromosomes = Vec::with_capacity(CHROMOSOME_COUNT);
    for index in 1..=CHROMOSOME_COUNT {
        let name = scheme
            .chrom_name(index)
            .ok_or_else(|| SignalError::MissingChromosome(index.to_string()))?;
        let mut matches = set.labels().filter(|label| label_matches(label, &name));
        let label = matches
            .next()
            .ok_or_else(|| SignalError::MissingChromosome(name.clone()))?
            .to_string();
        if let Some(other) = matches.next() {
            log::warn!("{} matches several labels; using {} and ignoring {}", name, label, other);
        }
        chromosomes.push(ChromosomeEntry {
            index,
            name,
            label,
            size_class: SizeClass::of_index(index),
        });
    }

    let extra = set.len().saturating_sub(CHROMOSOME_COUNT);
    if extra > 0 {
        log::debug!("Ignoring {} label(s) outside the 16 nuclear chromosomes", extra);
    }
    log::debug!("Detected {} genome", scheme);

    Ok(GenomeLayout {
        scheme,
        chromosomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_set(labels: &[String]) -> GenomeTrackSet {
        labels
            .iter()
            .map(|l| (l.clone(), ChromosomeTrack::default()))
            .collect()
    }

    #[test]
    fn test_chrom_names() {
        let s288c = GenomeScheme::S288C.chrom_names();
        assert_eq!(s288c.len(), 16);
        assert_eq!(s288c[0], "chrI");
        assert_eq!(s288c[15], "chrXVI");

        let sk1 = GenomeScheme::SK1.chrom_names();
        assert_eq!(sk1[0], "chr01");
        assert_eq!(sk1[9], "chr10");
    }

    #[test]
    fn test_chrom_index_both_schemes() {
        for i in 1..=16 {
            assert_eq!(chrom_index(&GenomeScheme::S288C.chrom_name(i).unwrap()), Some(i));
            assert_eq!(chrom_index(&GenomeScheme::SK1.chrom_name(i).unwrap()), Some(i));
        }
        assert_eq!(chrom_index("chr0"), None);
        assert_eq!(chrom_index("chr17"), None);
        assert_eq!(chrom_index("chrXVII"), None);
    }

    #[test]
    fn test_label_matches() {
        assert!(label_matches("chrI", "chrI"));
        assert!(label_matches("chrI.wig", "chrI"));
        assert!(label_matches("sample_chrI.wig", "chrI"));
        assert!(!label_matches("chrII.wig", "chrI"));
        assert!(!label_matches("chrXI.wig", "chrI"));
        assert!(!label_matches("chr010", "chr01"));
    }

    #[test]
    fn test_detect_sk1() {
        let labels: Vec<String> = (1..=16).map(|i| format!("chr{:02}.wig", i)).collect();
        let layout = detect_scheme(&track_set(&labels)).unwrap();
        assert_eq!(layout.scheme, GenomeScheme::SK1);
        assert_eq!(layout.chromosomes.len(), 16);
        assert_eq!(layout.chromosomes[2].name, "chr03");
        assert_eq!(layout.chromosomes[2].label, "chr03.wig");
    }

    #[test]
    fn test_detect_s288c() {
        let labels = GenomeScheme::S288C.chrom_names();
        let layout = detect_scheme(&track_set(&labels)).unwrap();
        assert_eq!(layout.scheme, GenomeScheme::S288C);
        assert_eq!(layout.chromosomes[10].label, "chrXI");
    }

    #[test]
    fn test_detect_mixed_fails() {
        let mut labels = GenomeScheme::S288C.chrom_names();
        labels.push("chr01".to_string());
        let result = detect_scheme(&track_set(&labels));
        assert!(matches!(result, Err(SignalError::UnrecognizedGenome(_))));
    }

    #[test]
    fn test_detect_neither_fails() {
        let labels: Vec<String> = (1..=16).map(|i| format!("chr{}", i)).collect();
        let result = detect_scheme(&track_set(&labels));
        assert!(matches!(result, Err(SignalError::UnrecognizedGenome(_))));
    }

    #[test]
    fn test_detect_missing_chromosome() {
        let mut labels = GenomeScheme::S288C.chrom_names();
        labels.retain(|l| l != "chrXII");
        let result = detect_scheme(&track_set(&labels));
        assert_eq!(result, Err(SignalError::MissingChromosome("chrXII".to_string())));
    }

    #[test]
    fn test_detect_ignores_mito() {
        let mut labels = GenomeScheme::S288C.chrom_names();
        labels.push("chrM".to_string());
        let layout = detect_scheme(&track_set(&labels)).unwrap();
        assert_eq!(layout.chromosomes.len(), 16);
    }

    #[test]
    fn test_size_classes() {
        let small: Vec<usize> = (1..=16)
            .filter(|&i| SizeClass::of_index(i) == SizeClass::Small)
            .collect();
        assert_eq!(small, vec![1, 3, 6]);
    }

    #[test]
    fn test_layout_find_translates() {
        let labels = GenomeScheme::S288C.chrom_names();
        let layout = detect_scheme(&track_set(&labels)).unwrap();
        assert_eq!(layout.find("chr04").map(|c| c.name.as_str()), Some("chrIV"));
        assert_eq!(layout.find("chrIV").map(|c| c.index), Some(4));
        assert!(layout.find("chrM").is_none());
    }
}

// Dataset loading with per-dataset fallback.
//
// A data directory may hold any subset of the four dataset files. Each one is
// loaded independently: a missing file silently falls back to the embedded
// default, an unreadable or malformed file falls back with a warning. The
// caller therefore always gets a complete lexicon, and `LoadedLexicon::origins`
// records where every dataset actually came from.

use crate::{
    Lexicon, LexiconError, parse_affinities, parse_emotions, parse_references, parse_styles,
};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

const DEFAULT_EMOTIONS: &str = include_str!("../../data/emotions.json");
const DEFAULT_STYLES: &str = include_str!("../../data/styles.json");
const DEFAULT_REFERENCES: &str = include_str!("../../data/references.json");
const DEFAULT_AFFINITIES: &str = include_str!("../../data/emotion_to_styles.json");

/// The four named datasets that make up a lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Emotions,
    Styles,
    References,
    Affinities,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::Emotions,
        Dataset::Styles,
        Dataset::References,
        Dataset::Affinities,
    ];

    /// File name inside a data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Emotions => "emotions.json",
            Dataset::Styles => "styles.json",
            Dataset::References => "references.json",
            Dataset::Affinities => "emotion_to_styles.json",
        }
    }

    /// The JSON compiled into the binary for this dataset.
    pub fn embedded_json(self) -> &'static str {
        match self {
            Dataset::Emotions => DEFAULT_EMOTIONS,
            Dataset::Styles => DEFAULT_STYLES,
            Dataset::References => DEFAULT_REFERENCES,
            Dataset::Affinities => DEFAULT_AFFINITIES,
        }
    }

    /// Accepts the file name with or without `.json`, or the short name.
    pub fn from_name(name: &str) -> Option<Dataset> {
        let stem = name.strip_suffix(".json").unwrap_or(name);
        match stem {
            "emotions" => Some(Dataset::Emotions),
            "styles" => Some(Dataset::Styles),
            "references" => Some(Dataset::References),
            "emotion_to_styles" | "affinities" => Some(Dataset::Affinities),
            _ => None,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Where a dataset in a [`LoadedLexicon`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    File,
    /// File absent; embedded default used.
    Default,
    /// File present but unreadable or malformed; embedded default used.
    Fallback,
}

/// A lexicon plus the provenance of each of its datasets.
#[derive(Debug, Clone)]
pub struct LoadedLexicon {
    pub lexicon: Lexicon,
    pub origins: Vec<(Dataset, DatasetOrigin)>,
}

impl LoadedLexicon {
    pub fn origin(&self, dataset: Dataset) -> Option<DatasetOrigin> {
        self.origins
            .iter()
            .find(|(d, _)| *d == dataset)
            .map(|(_, o)| *o)
    }
}

/// Load the lexicon embedded at compile time.
///
/// Panics if the embedded JSON is malformed, which is a build defect rather
/// than a runtime condition.
pub fn default_lexicon() -> Lexicon {
    Lexicon::from_json_parts(
        DEFAULT_EMOTIONS,
        DEFAULT_STYLES,
        DEFAULT_REFERENCES,
        DEFAULT_AFFINITIES,
    )
    .expect("embedded lexicon datasets are malformed")
}

/// Read a dataset file. `Ok(None)` when the file does not exist.
pub fn read_dataset(dir: &Path, dataset: Dataset) -> Result<Option<String>, LexiconError> {
    let path = dir.join(dataset.file_name());
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(&path)
        .map(Some)
        .map_err(|source| LexiconError::Io { path, source })
}

/// Load every dataset from `dir`, falling back per dataset to the embedded
/// defaults.
pub fn load_dir(dir: &Path) -> LoadedLexicon {
    let mut origins = Vec::with_capacity(Dataset::ALL.len());

    let emotions = load_one(dir, Dataset::Emotions, parse_emotions, &mut origins);
    let styles = load_one(dir, Dataset::Styles, parse_styles, &mut origins);
    let references = load_one(dir, Dataset::References, parse_references, &mut origins);
    let affinities = load_one(dir, Dataset::Affinities, parse_affinities, &mut origins);

    info!(
        emotions = emotions.len(),
        styles = styles.len(),
        reference_buckets = references.len(),
        affinities = affinities.len(),
        "lexicon loaded from {}",
        dir.display()
    );

    LoadedLexicon {
        lexicon: Lexicon::from_parts(emotions, styles, references, affinities),
        origins,
    }
}

impl Lexicon {
    /// [`load_dir`] without the per-dataset origins.
    pub fn load_dir(dir: &Path) -> Lexicon {
        load_dir(dir).lexicon
    }
}

fn load_one<T>(
    dir: &Path,
    dataset: Dataset,
    parse: fn(&str) -> Result<T, LexiconError>,
    origins: &mut Vec<(Dataset, DatasetOrigin)>,
) -> T {
    let from_file = match read_dataset(dir, dataset) {
        Ok(Some(json)) => parse(&json).map(Some),
        Ok(None) => Ok(None),
        Err(e) => Err(e),
    };

    let (value, origin) = match from_file {
        Ok(Some(value)) => (Some(value), DatasetOrigin::File),
        Ok(None) => {
            debug!(
                "{dataset} not found in {}, using embedded default",
                dir.display()
            );
            (None, DatasetOrigin::Default)
        }
        Err(e) => {
            warn!("{e}; using embedded default for {dataset}");
            (None, DatasetOrigin::Fallback)
        }
    };
    origins.push((dataset, origin));

    match value {
        Some(v) => v,
        None => parse(dataset.embedded_json())
            .unwrap_or_else(|e| panic!("embedded {dataset} is malformed: {e}")),
    }
}

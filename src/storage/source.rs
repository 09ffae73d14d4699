//! Where corpora and hymnal categories come from.
//!
//! [`DirectorySource`] reads JSON documents laid out under a data root:
//!
//! ```text
//! <root>/lectern.toml
//! <root>/bible/bible_<language>.json
//! <root>/hymnal/<category>.json
//! ```

use std::{
    ffi::OsStr,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::domain::{Config, Corpus, HymnCategory};

/// Name of the configuration file at the data root.
pub const CONFIG_FILE: &str = "lectern.toml";

/// Directory holding one corpus file per language.
pub const BIBLE_DIR: &str = "bible";

/// Directory holding one file per hymnal category.
pub const HYMNAL_DIR: &str = "hymnal";

/// Errors that can occur when loading a corpus or hymnal category.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The file is not a valid corpus document.
    #[error("failed to parse {}", path.display())]
    Json {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The language is not in the configured list.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The file is valid JSON but not a hymnal category.
    #[error("invalid hymnal format in {}", path.display())]
    InvalidHymnal {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// A provider of corpora and hymnal categories.
pub trait CorpusSource: Send + Sync {
    /// Loads the scripture corpus for a language.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the language is unsupported or its corpus
    /// cannot be read.
    fn load_bible(&self, language: &str) -> Result<Corpus, LoadError>;

    /// Loads one hymnal category.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the category cannot be read or is not a
    /// valid hymnal document.
    fn load_hymnal(&self, category: &str) -> Result<HymnCategory, LoadError>;

    /// The names of every hymnal category available, sorted.
    fn hymnal_categories(&self) -> Vec<String>;
}

/// A filesystem backed source rooted at a data directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    config: Config,
}

impl DirectorySource {
    /// Opens a data root, reading its configuration if present.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        let config = load_config(&root);
        Self { root, config }
    }

    /// Opens a data root with an explicit configuration.
    #[must_use]
    pub const fn with_config(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// The data root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The path of the corpus file for a language.
    #[must_use]
    pub fn bible_path(&self, language: &str) -> PathBuf {
        self.root
            .join(BIBLE_DIR)
            .join(format!("bible_{}.json", language.to_lowercase()))
    }

    /// The path of the file for a hymnal category.
    ///
    /// File names are matched ignoring case, so `FFPM` finds `ffpm.json`.
    #[must_use]
    pub fn hymnal_path(&self, category: &str) -> PathBuf {
        let dir = self.root.join(HYMNAL_DIR);
        let exact = dir.join(format!("{category}.json"));
        if exact.is_file() {
            return exact;
        }
        hymnal_paths(&dir)
            .into_iter()
            .find(|path| stem(path).is_some_and(|s| s.eq_ignore_ascii_case(category)))
            .unwrap_or(exact)
    }
}

impl CorpusSource for DirectorySource {
    #[tracing::instrument(level = "debug", skip(self))]
    fn load_bible(&self, language: &str) -> Result<Corpus, LoadError> {
        if !self.config.is_language_supported(language) {
            return Err(LoadError::UnsupportedLanguage(language.to_string()));
        }
        read_json(&self.bible_path(language), |path, source| {
            LoadError::Json { path, source }
        })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn load_hymnal(&self, category: &str) -> Result<HymnCategory, LoadError> {
        read_json(&self.hymnal_path(category), |path, source| {
            if source.is_data() {
                LoadError::InvalidHymnal { path, source }
            } else {
                LoadError::Json { path, source }
            }
        })
    }

    fn hymnal_categories(&self) -> Vec<String> {
        let mut names: Vec<String> = hymnal_paths(&self.root.join(HYMNAL_DIR))
            .iter()
            .filter_map(|path| stem(path).map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

/// Loads the configuration at the data root, or the default.
fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

/// Opens and deserializes a JSON file.
///
/// `invalid` classifies parse failures that are not I/O errors.
fn read_json<T, F>(path: &Path, invalid: F) -> Result<T, LoadError>
where
    T: DeserializeOwned,
    F: FnOnce(PathBuf, serde_json::Error) -> LoadError,
{
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e.into(),
            }
        } else {
            invalid(path.to_path_buf(), e)
        }
    })
}

fn hymnal_paths(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new("json")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(OsStr::to_str)
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{corpus::ChapterMatch, weighted::WeightedCategories};

/// Configuration for a data root.
///
/// Holds the languages that may be loaded, the default among them, how
/// chapter numbers are matched and the hymnal category weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The language read when none is given.
    default_language: String,

    /// The languages a corpus may be loaded for.
    ///
    /// A request for any other language is rejected before touching the
    /// filesystem.
    languages: Vec<String>,

    /// How positional reads match chapter numbers.
    pub chapter_matching: ChapterMatch,

    /// Hymnal categories and their weights for random selection, in order.
    hymnal_categories: WeightedCategories,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            languages: default_languages(),
            chapter_matching: ChapterMatch::default(),
            hymnal_categories: default_hymnal_categories(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The default language code.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// The supported language codes.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Checks if a language may be loaded. Codes are compared ignoring case.
    #[must_use]
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }

    /// The hymnal category weight table.
    #[must_use]
    pub const fn hymnal_categories(&self) -> &WeightedCategories {
        &self.hymnal_categories
    }

    /// Adds a hymnal category with the given weight.
    ///
    /// Returns `false` if the category was already configured.
    pub fn add_hymnal_category(&mut self, name: impl Into<String>, weight: f64) -> bool {
        self.hymnal_categories.add(name, weight)
    }
}

fn default_language() -> String {
    "mg".to_string()
}

fn default_languages() -> Vec<String> {
    ["mg", "fr", "en"].map(String::from).to_vec()
}

fn default_hymnal_categories() -> WeightedCategories {
    [("ff", 0.3), ("FFPM", 0.6), ("antema", 0.08), ("tsanta", 0.02)]
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight))
        .collect()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_language")]
        default_language: String,

        #[serde(default = "default_languages")]
        languages: Vec<String>,

        #[serde(default)]
        chapter_matching: ChapterMatch,

        /// Ordered; a draw walks the cumulative weights in this order.
        #[serde(default = "default_hymnal_categories")]
        hymnal_categories: WeightedCategories,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                default_language,
                languages,
                chapter_matching,
                hymnal_categories,
            } => Self {
                default_language,
                languages,
                chapter_matching,
                hymnal_categories,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            default_language: config.default_language,
            languages: config.languages,
            chapter_matching: config.chapter_matching,
            hymnal_categories: config.hymnal_categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"_version = "1"
default_language = "fr"
languages = ["fr", "en"]
chapter_matching = "exact"

[[hymnal_categories]]
name = "ff"
weight = 1.0

[[hymnal_categories]]
name = "tsanta"
weight = 3.0
"#,
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.default_language(), "fr");
        assert_eq!(config.languages(), &["fr".to_string(), "en".to_string()]);
        assert_eq!(config.chapter_matching, ChapterMatch::Exact);
        assert_eq!(config.hymnal_categories().len(), 2);
        assert_eq!(config.hymnal_categories().category_at(1.5), Some("tsanta"));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nchapter_matching = \"closest\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("lectern.toml");

        let mut config = Config::default();
        config.chapter_matching = ChapterMatch::Exact;
        assert!(config.add_hymnal_category("fihirana", 0.5));
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn defaults_match_the_shipped_hymnal() {
        let config = Config::default();
        let names: Vec<&str> = config
            .hymnal_categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["ff", "FFPM", "antema", "tsanta"]);
        assert!(config.is_language_supported("MG"));
        assert!(!config.is_language_supported("de"));
    }
}

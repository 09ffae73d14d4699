//! Hymnal entries and their lookup.
//!
//! A hymnal category is a flat map from `"<category>_<number>"` keys to
//! hymns. Unlike scripture lookup there is no fuzzy matching: a hymn either
//! exists under its exact key or it does not.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use super::Error;

/// Characters of lyrics kept on each side of a search match.
const CONTEXT_CHARS: usize = 20;

/// Length at which a fallback display title is truncated.
const TITLE_CHARS: usize = 50;

/// Display title for a hymn with neither title nor lyrics.
pub const UNTITLED: &str = "Sans titre";

/// One stanza of a hymn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strophe {
    #[serde(rename = "andininy", deserialize_with = "number_or_string")]
    number: u32,
    #[serde(rename = "tononkira")]
    text: String,
    #[serde(rename = "fiverenany", default, deserialize_with = "null_as_false")]
    refrain: bool,
}

/// A single hymn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hymn {
    #[serde(rename = "laharana", deserialize_with = "number_or_string")]
    number: u32,
    #[serde(rename = "lohateny")]
    title: String,
    #[serde(rename = "hira")]
    strophes: Vec<Strophe>,
}

/// All hymns of one category, keyed by `"<lowercased category>_<number>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HymnCategory {
    hymns: BTreeMap<String, Hymn>,
}

/// The storage key of a hymn.
#[must_use]
pub fn hymn_key(category: &str, number: u32) -> String {
    format!("{}_{number}", category.to_lowercase())
}

impl Strophe {
    /// Creates a strophe.
    #[must_use]
    pub fn new(number: u32, text: impl Into<String>, refrain: bool) -> Self {
        Self {
            number,
            text: text.into(),
            refrain,
        }
    }

    /// The strophe number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// The lyrics.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this strophe is a refrain.
    #[must_use]
    pub const fn is_refrain(&self) -> bool {
        self.refrain
    }
}

impl Hymn {
    /// Creates a hymn.
    #[must_use]
    pub fn new(number: u32, title: impl Into<String>, strophes: Vec<Strophe>) -> Self {
        Self {
            number,
            title: title.into(),
            strophes,
        }
    }

    /// The hymn number within its category.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// The title as stored, possibly empty.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The strophes in order.
    #[must_use]
    pub fn strophes(&self) -> &[Strophe] {
        &self.strophes
    }

    /// The number of strophes that are not refrains.
    #[must_use]
    pub fn strophe_count(&self) -> usize {
        self.strophes.iter().filter(|s| !s.refrain).count()
    }

    /// The title to show for this hymn.
    ///
    /// An empty title is replaced by the opening of the first non-refrain
    /// strophe, cut at 50 characters. Without such a strophe the first
    /// strophe is used instead, or [`UNTITLED`] if it has no lyrics.
    #[must_use]
    pub fn display_title(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        if let Some(strophe) = self.strophes.iter().find(|s| !s.refrain) {
            return truncate(&strophe.text, TITLE_CHARS);
        }
        self.strophes
            .first()
            .map(|s| truncate(&s.text, TITLE_CHARS))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string())
    }
}

impl HymnCategory {
    /// Builds a category from `(key, hymn)` pairs.
    #[must_use]
    pub fn new(hymns: impl IntoIterator<Item = (String, Hymn)>) -> Self {
        Self {
            hymns: hymns.into_iter().collect(),
        }
    }

    /// Looks a hymn up by its exact key.
    #[must_use]
    pub fn get(&self, category: &str, number: u32) -> Option<&Hymn> {
        self.hymns.get(&hymn_key(category, number))
    }

    /// The number of hymns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hymns.len()
    }

    /// Whether the category has no hymn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hymns.is_empty()
    }

    /// Hymns ordered by number.
    #[must_use]
    pub fn hymns(&self) -> Vec<&Hymn> {
        let mut hymns: Vec<&Hymn> = self.hymns.values().collect();
        hymns.sort_by_key(|h| h.number);
        hymns
    }
}

/// A parsed `"<CATEGORY> <number>"` hymn reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HymnRef {
    /// Upper-cased display form, e.g. `FFPM 12`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Lower-cased category name.
    pub category: String,
    /// The hymn number.
    pub number: u32,
}

impl HymnRef {
    /// Creates a reference from its parts.
    #[must_use]
    pub fn new(category: &str, number: u32) -> Self {
        let category = category.to_lowercase();
        Self {
            reference: format!("{category} {number}").to_uppercase(),
            category,
            number,
        }
    }
}

impl FromStr for HymnRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next().map(str::parse::<u32>), parts.next()) {
            (Some(category), Some(Ok(number)), None) => Ok(Self::new(category, number)),
            _ => Err(Error::Format(s.to_string())),
        }
    }
}

impl fmt::Display for HymnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}

/// A strophe as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StropheView {
    /// The strophe number.
    pub number: u32,
    /// The lyrics.
    #[serde(rename = "chant")]
    pub text: String,
    /// Whether the strophe is a refrain.
    pub refrain: bool,
}

/// A resolved hymn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HymnalEntry {
    /// Upper-cased `"<CATEGORY> <number>"`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// The category as requested.
    #[serde(rename = "type")]
    pub category: String,
    /// The hymn number.
    pub number: u32,
    /// The title in its stored case.
    pub title: String,
    /// Every strophe, refrains included.
    pub content: Vec<StropheView>,
}

/// Looks up hymn `number` of `category` in the loaded category data.
///
/// # Errors
///
/// Returns [`Error::HymnNotFound`] naming the key that was tried.
pub fn resolve(
    data: &HymnCategory,
    category: &str,
    number: u32,
) -> Result<HymnalEntry, Error> {
    let hymn = data
        .get(category, number)
        .ok_or_else(|| Error::HymnNotFound(hymn_key(category, number)))?;

    Ok(HymnalEntry {
        reference: format!("{category} {number}").to_uppercase(),
        category: category.to_string(),
        number,
        title: hymn.title.clone(),
        content: hymn
            .strophes
            .iter()
            .map(|s| StropheView {
                number: s.number,
                text: s.text.clone(),
                refrain: s.refrain,
            })
            .collect(),
    })
}

/// A hymn title, with its reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HymnTitle {
    /// Upper-cased `"<CATEGORY> <number>"`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// The title.
    pub title: String,
}

/// The number of non-refrain strophes of a hymn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StropheCount {
    /// Upper-cased `"<CATEGORY> <number>"`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Strophes that are not refrains.
    pub count: usize,
}

/// A strophe whose lyrics matched a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StropheMatch {
    /// The matching strophe's number.
    pub strophe_number: u32,
    /// Whether that strophe is a refrain.
    pub is_refrain: bool,
    /// Lyrics around the first occurrence of the keyword.
    pub match_context: String,
}

/// A hymn found by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HymnMatch {
    /// Upper-cased `"<CATEGORY> <number>"`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Display title.
    pub title: String,
    /// Matching strophes; empty for title searches.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matching_strophes: Vec<StropheMatch>,
}

/// Search hits for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryMatches {
    /// Number of matching hymns.
    pub count: usize,
    /// The matching hymns, by number.
    #[serde(rename = "chants")]
    pub hymns: Vec<HymnMatch>,
}

/// Searches hymn lyrics for `keyword`, ignoring case.
///
/// Every category given appears in the result, with a zero count when
/// nothing matched.
pub fn search_lyrics<'a>(
    categories: impl IntoIterator<Item = (&'a str, &'a HymnCategory)>,
    keyword: &str,
) -> BTreeMap<String, CategoryMatches> {
    let needle = keyword.to_lowercase();
    search_with(categories, |category, hymn| {
        let strophes: Vec<StropheMatch> = hymn
            .strophes
            .iter()
            .filter_map(|s| {
                match_context(&s.text, &needle).map(|context| StropheMatch {
                    strophe_number: s.number,
                    is_refrain: s.refrain,
                    match_context: context,
                })
            })
            .collect();

        (!strophes.is_empty()).then(|| HymnMatch {
            reference: HymnRef::new(category, hymn.number).reference,
            title: hymn.display_title(),
            matching_strophes: strophes,
        })
    })
}

/// Searches hymn titles for `keyword`, ignoring case.
pub fn search_titles<'a>(
    categories: impl IntoIterator<Item = (&'a str, &'a HymnCategory)>,
    keyword: &str,
) -> BTreeMap<String, CategoryMatches> {
    let needle = keyword.to_lowercase();
    search_with(categories, |category, hymn| {
        (!hymn.title.is_empty() && hymn.title.to_lowercase().contains(&needle)).then(|| {
            HymnMatch {
                reference: HymnRef::new(category, hymn.number).reference,
                title: hymn.title.clone(),
                matching_strophes: Vec::new(),
            }
        })
    })
}

fn search_with<'a, F>(
    categories: impl IntoIterator<Item = (&'a str, &'a HymnCategory)>,
    matcher: F,
) -> BTreeMap<String, CategoryMatches>
where
    F: Fn(&str, &Hymn) -> Option<HymnMatch>,
{
    categories
        .into_iter()
        .map(|(category, data)| {
            let hymns: Vec<HymnMatch> = data
                .hymns()
                .into_iter()
                .filter_map(|hymn| matcher(category, hymn))
                .collect();
            (
                category.to_string(),
                CategoryMatches {
                    count: hymns.len(),
                    hymns,
                },
            )
        })
        .collect()
}

/// The lyrics surrounding the first occurrence of `needle` (already
/// lower-cased), trimmed.
///
/// Matching runs over the lower-cased characters, each mapped back to the
/// character of `text` it came from, so the window is measured in characters
/// of `text` even where lower-casing changes the length.
fn match_context(text: &str, needle: &str) -> Option<String> {
    let (folded, owners): (Vec<char>, Vec<usize>) = text
        .chars()
        .enumerate()
        .flat_map(|(index, c)| c.to_lowercase().map(move |lower| (lower, index)))
        .unzip();
    let needle: Vec<char> = needle.chars().collect();

    let at = (0..=folded.len().checked_sub(needle.len())?)
        .find(|&i| folded[i..i + needle.len()] == needle[..])?;
    let start = owners.get(at).copied().unwrap_or_default();
    let end = match needle.len() {
        0 => start,
        len => owners[at + len - 1] + 1,
    };

    let from = start.saturating_sub(CONTEXT_CHARS);
    let to = end + CONTEXT_CHARS;
    Some(
        text.chars()
            .skip(from)
            .take(to - from)
            .collect::<String>()
            .trim()
            .to_string(),
    )
}

fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

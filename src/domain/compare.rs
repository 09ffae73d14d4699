//! The same verse read across several versions.

use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use nonempty::NonEmpty;
use rayon::prelude::*;
use serde::Serialize;

use super::{
    Error,
    corpus::{BookToken, ChapterMatch, Corpus, capitalize},
    passage::read_passage,
};

/// A verse's text keyed by upper-cased version code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// `"<Book> <chapter>:<verse>"` as requested.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Verse text per version, e.g. `"FR"`.
    pub versions: BTreeMap<String, String>,
}

/// Splits a version list such as `"fr, en mg"` into lower-cased codes.
///
/// Commas and whitespace both separate codes. Duplicates are dropped,
/// keeping the first occurrence.
#[must_use]
pub fn parse_versions(input: &str) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();
    for code in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|code| !code.is_empty())
        .map(str::to_lowercase)
    {
        if !versions.contains(&code) {
            versions.push(code);
        }
    }
    versions
}

/// Reads `chapter:verse` of `book` in every version.
///
/// The book is located in `primary` and addressed in the other versions by
/// its position, so names need not agree between languages. `load` fetches
/// the corpus of each version; the reads run in parallel. A version that
/// fails to load or lacks the verse is logged and left out.
///
/// # Errors
///
/// Returns [`Error::BookNotFound`] if the book is not in `primary`, or
/// [`Error::NoResultsInVersions`] if no version produced the verse.
pub fn compare<F, E>(
    primary: &Corpus,
    book: &BookToken,
    chapter: u32,
    verse: u32,
    versions: &NonEmpty<String>,
    matching: ChapterMatch,
    load: F,
) -> Result<Comparison, Error>
where
    F: Fn(&str) -> Result<Arc<Corpus>, E> + Sync,
    E: Display,
{
    let label = capitalize(&book.to_string());
    let ordinal = primary
        .find_book(book)
        .and_then(|found| primary.ordinal_of(found))
        .map(BookToken::Ordinal)
        .ok_or_else(|| Error::BookNotFound(label.clone()))?;

    let versions: Vec<&String> = versions.iter().collect();
    let outcomes: Vec<(String, Result<String, String>)> = versions
        .into_par_iter()
        .map(|version| {
            let text = load(version)
                .map_err(|e| e.to_string())
                .and_then(|corpus| {
                    read_passage(
                        &corpus,
                        &ordinal,
                        Some(chapter),
                        Some(verse),
                        None,
                        matching,
                    )
                    .map_err(|e| e.to_string())
                })
                .and_then(|passage| {
                    passage
                        .verses
                        .into_iter()
                        .next()
                        .map(|entry| entry.text)
                        .ok_or_else(|| "verse not found".to_string())
                });
            (version.to_uppercase(), text)
        })
        .collect();

    let mut found = BTreeMap::new();
    for (version, outcome) in outcomes {
        match outcome {
            Ok(text) => {
                found.insert(version, text);
            }
            Err(error) => tracing::warn!(%version, %error, "version skipped in comparison"),
        }
    }

    if found.is_empty() {
        return Err(Error::NoResultsInVersions);
    }

    Ok(Comparison {
        reference: format!("{label} {chapter}:{verse}"),
        versions: found,
    })
}

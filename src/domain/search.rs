//! Keyword search over a corpus.

use serde::Serialize;

use super::corpus::{Corpus, VerseLocation};

/// A verse identified by its full reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseHit {
    /// `"<book> <chapter>:<verse>"`
    #[serde(rename = "ref")]
    pub reference: String,
    /// The verse text.
    #[serde(rename = "texte")]
    pub text: String,
}

impl From<VerseLocation<'_>> for VerseHit {
    fn from(location: VerseLocation<'_>) -> Self {
        Self {
            reference: location.reference(),
            text: location.verse.text().to_string(),
        }
    }
}

/// All verses matching a keyword, in corpus order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Number of matching verses.
    pub count: usize,
    /// The matching verses.
    pub results: Vec<VerseHit>,
}

/// Finds every verse whose text contains `keyword`, ignoring case.
///
/// Results follow corpus order and are neither ranked nor deduplicated.
#[must_use]
pub fn search(corpus: &Corpus, keyword: &str) -> SearchResults {
    let needle = keyword.to_lowercase();
    let results: Vec<VerseHit> = corpus
        .verses()
        .filter(|location| location.verse.text().to_lowercase().contains(&needle))
        .map(VerseHit::from)
        .collect();

    tracing::debug!(keyword, count = results.len(), "keyword search");

    SearchResults {
        count: results.len(),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;

    #[test]
    fn unique_term_has_one_hit() {
        let corpus = fixtures::genesis_exodus();
        let found = search(&corpus, "BEGINNING");
        assert_eq!(found.count, 1);
        assert_eq!(found.results[0].reference, "Genesis 1:1");
        assert!(found.results[0].text.starts_with("In the beginning"));
    }

    #[test]
    fn results_follow_corpus_order() {
        let corpus = fixtures::genesis_exodus();
        let found = search(&corpus, "text of 13:");
        let references: Vec<&str> = found.results.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(found.count, 13);
        assert_eq!(references.first(), Some(&"1 Corinthiens 13:1"));
        assert_eq!(references.last(), Some(&"1 Corinthiens 13:13"));

        let found = search(&corpus, "of 1:1.");
        let references: Vec<&str> = found.results.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(references, vec!["Exode 1:1", "Judges 1:1", "Jude 1:1"]);
    }

    #[test]
    fn missing_term_is_empty() {
        let corpus = fixtures::genesis_exodus();
        let found = search(&corpus, "leviathan");
        assert_eq!(found.count, 0);
        assert!(found.results.is_empty());
    }

    #[test]
    fn serializes_with_presentation_field_names() {
        let corpus = fixtures::genesis_exodus();
        let json = serde_json::to_value(search(&corpus, "beginning")).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["ref"], "Genesis 1:1");
        assert!(json["results"][0]["texte"].is_string());
    }
}

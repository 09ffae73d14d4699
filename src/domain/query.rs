//! Free-text queries that may be either a reference or a keyword.

use serde::Serialize;

use super::{
    corpus::Corpus,
    passage::{ResolvedRange, read},
    search::{SearchResults, search},
};

/// What a free-text query turned out to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    /// The query read as a reference.
    Passage(ResolvedRange),
    /// The query was searched for as a keyword.
    Search(SearchResults),
}

/// Answers a query the way a single search box would.
///
/// Input containing a digit is first read as a reference; if that fails it
/// is searched for instead. Input without digits is always a keyword.
#[must_use]
pub fn query(corpus: &Corpus, input: &str) -> QueryOutcome {
    let input = input.trim();
    if input.chars().any(|c| c.is_ascii_digit()) {
        match read(corpus, input) {
            Ok(range) => return QueryOutcome::Passage(range),
            Err(error) => tracing::debug!(input, %error, "not a reference, searching instead"),
        }
    }
    QueryOutcome::Search(search(corpus, input))
}

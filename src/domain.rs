//! Domain models for scripture and hymnal lookup.
//!
//! This module contains the corpus data model, the reference parser and
//! resolver, keyword search, verse-of-the-day selection, cross-version
//! comparison, the hymnal model and configuration.

/// Scripture corpus model and accessors.
pub mod corpus;
pub use corpus::{Book, BookToken, Chapter, ChapterMatch, Corpus, Testament, Verse};

/// Reference parsing.
pub mod reference;
pub use reference::{ParsedReference, Reference, Shape, VerseBound};

/// Verse range extraction.
pub mod passage;
pub use passage::{Passage, ResolvedRange, VerseEntry};

pub mod search;
pub use search::{SearchResults, VerseHit};

pub mod daily;

pub mod compare;
pub use compare::Comparison;

pub mod query;
pub use query::QueryOutcome;

/// Hymnal model, lookup and search.
pub mod hymnal;
pub use hymnal::{HymnCategory, HymnRef, HymnalEntry};

pub mod weighted;
pub use weighted::WeightedCategories;

mod config;
pub use config::Config;

mod error;
pub use error::Error;

#[cfg(test)]
mod fixtures;

//! Scripture and hymnal lookup
//!
//! Scripture corpora and hymnal categories are JSON documents stored in a
//! directory. References such as `Genesis 1:30-2:5` are parsed, completed
//! against a corpus and resolved to the verses they name.

pub mod domain;
pub use domain::{BookToken, Config, Corpus, Error, ParsedReference, Reference};

/// Filesystem-backed loading and caching of corpora and hymnals.
pub mod storage;
pub use storage::{CorpusRegistry, CorpusSource, DirectorySource, HymnalStore, LoadError};

//! A load-once cache of corpora, one per language.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use nonempty::NonEmpty;

use crate::{
    domain::{BookToken, ChapterMatch, Comparison, Corpus, Error, compare},
    storage::{CorpusSource, DirectorySource, LoadError},
};

/// Caches the corpus of each language loaded through a [`CorpusSource`].
///
/// A corpus is read from its source at most once until it is invalidated.
/// Callers receive shared, immutable snapshots.
#[derive(Debug)]
pub struct CorpusRegistry<S = DirectorySource> {
    source: S,
    cache: RwLock<HashMap<String, Arc<Corpus>>>,
}

impl<S: CorpusSource> CorpusRegistry<S> {
    /// Creates an empty registry over a source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the corpus for `language`, loading it on first use.
    ///
    /// Language codes are compared ignoring case.
    ///
    /// # Errors
    ///
    /// Returns the source's [`LoadError`] if the corpus cannot be loaded.
    /// Failures are not cached.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get(&self, language: &str) -> Result<Arc<Corpus>, LoadError> {
        let key = language.to_lowercase();

        if let Some(corpus) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!(language = %key, "corpus cache hit");
            return Ok(Arc::clone(corpus));
        }

        let corpus = Arc::new(self.source.load_bible(&key)?);
        tracing::debug!(language = %key, books = corpus.book_count(), "corpus loaded");

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(corpus)))
    }

    /// Whether the corpus for `language` is cached.
    pub fn is_loaded(&self, language: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&language.to_lowercase())
    }

    /// Drops the cached corpus for `language`, returning whether one was
    /// cached. Snapshots already handed out remain valid.
    pub fn invalidate(&self, language: &str) -> bool {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&language.to_lowercase())
            .is_some()
    }

    /// Drops every cached corpus.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Compares a verse across `versions`, locating the book in the corpus
    /// of `primary`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoaded`] if the primary corpus cannot be loaded,
    /// otherwise any error of [`compare::compare`].
    pub fn compare(
        &self,
        primary: &str,
        book: &BookToken,
        chapter: u32,
        verse: u32,
        versions: &NonEmpty<String>,
        matching: ChapterMatch,
    ) -> Result<Comparison, Error> {
        let corpus = self.get(primary)?;
        compare::compare(&corpus, book, chapter, verse, versions, matching, |version| {
            self.get(version)
        })
    }
}

impl From<LoadError> for Error {
    fn from(error: LoadError) -> Self {
        Self::NotLoaded(error.to_string())
    }
}

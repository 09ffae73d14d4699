//! Hymnal categories loaded on demand.

use std::collections::{BTreeMap, btree_map::Entry};

use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    domain::{
        Error, HymnCategory, HymnalEntry, WeightedCategories,
        hymnal::{self, CategoryMatches, HymnTitle, StropheCount},
    },
    storage::{CorpusSource, DirectorySource, LoadError},
};

/// Loaded hymnal categories and the weights used to pick among them.
#[derive(Debug)]
pub struct HymnalStore<S = DirectorySource> {
    source: S,
    weights: WeightedCategories,
    loaded: BTreeMap<String, HymnCategory>,
}

impl<S: CorpusSource> HymnalStore<S> {
    /// Creates an empty store.
    pub const fn new(source: S, weights: WeightedCategories) -> Self {
        Self {
            source,
            weights,
            loaded: BTreeMap::new(),
        }
    }

    /// The category weight table.
    pub const fn weights(&self) -> &WeightedCategories {
        &self.weights
    }

    /// Returns a category, loading it on first use.
    ///
    /// Category names are compared ignoring case.
    ///
    /// # Errors
    ///
    /// Returns the source's [`LoadError`] if the category cannot be loaded.
    pub fn category(&mut self, name: &str) -> Result<&HymnCategory, LoadError> {
        match self.loaded.entry(name.to_lowercase()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let category = self.source.load_hymnal(name)?;
                tracing::debug!(category = %entry.key(), hymns = category.len(), "hymnal category loaded");
                Ok(entry.insert(category))
            }
        }
    }

    /// Loads every category the source knows about.
    ///
    /// Categories that fail to load are skipped with a warning. Returns the
    /// number of categories now loaded.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn load_all(&mut self) -> usize {
        let pending: Vec<String> = self
            .source
            .hymnal_categories()
            .into_iter()
            .filter(|name| !self.loaded.contains_key(&name.to_lowercase()))
            .collect();

        let source = &self.source;
        let (loaded, failed): (Vec<_>, Vec<_>) = pending
            .into_par_iter()
            .map(|name| match source.load_hymnal(&name) {
                Ok(category) => Ok((name.to_lowercase(), category)),
                Err(error) => Err((name, error)),
            })
            .partition(Result::is_ok);

        for (name, error) in failed.into_iter().filter_map(Result::err) {
            tracing::warn!(category = %name, %error, "skipping hymnal category");
        }
        self.loaded.extend(loaded.into_iter().filter_map(Result::ok));

        self.loaded.len()
    }

    /// Names of the loaded categories, lower-cased.
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.loaded.keys().map(String::as_str)
    }

    /// Looks up one hymn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoaded`] if the category cannot be loaded, or
    /// [`Error::HymnNotFound`].
    pub fn hymn(&mut self, category: &str, number: u32) -> Result<HymnalEntry, Error> {
        hymnal::resolve(self.category(category)?, category, number)
    }

    /// The number of hymns in a category, or 0 if it cannot be loaded.
    pub fn count(&mut self, category: &str) -> usize {
        self.category(category).map_or_else(
            |error| {
                tracing::warn!(category, %error, "hymnal category unavailable");
                0
            },
            HymnCategory::len,
        )
    }

    /// The title of a hymn.
    ///
    /// # Errors
    ///
    /// As for [`HymnalStore::hymn`].
    pub fn title(&mut self, category: &str, number: u32) -> Result<HymnTitle, Error> {
        let entry = self.hymn(category, number)?;
        Ok(HymnTitle {
            reference: entry.reference,
            title: entry.title,
        })
    }

    /// The number of non-refrain strophes of a hymn.
    ///
    /// # Errors
    ///
    /// As for [`HymnalStore::hymn`].
    pub fn strophes(&mut self, category: &str, number: u32) -> Result<StropheCount, Error> {
        let entry = self.hymn(category, number)?;
        Ok(StropheCount {
            reference: entry.reference,
            count: entry.content.iter().filter(|s| !s.refrain).count(),
        })
    }

    /// Picks a random hymn: a category by weight, then a number uniformly
    /// from `1..=count`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCategories`] without weights,
    /// [`Error::EmptyCategory`] if the chosen category has no hymn, or any
    /// error of [`HymnalStore::hymn`].
    pub fn random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<HymnalEntry, Error> {
        let category = self.weights.choose(rng)?.to_string();
        let count = u32::try_from(self.count(&category)).unwrap_or(u32::MAX);
        if count == 0 {
            return Err(Error::EmptyCategory(category));
        }
        let number = rng.gen_range(1..=count);
        tracing::debug!(%category, number, "random hymn");
        self.hymn(&category, number)
    }

    /// Adds a category to the weight table.
    ///
    /// Returns `false`, with a warning, if it is already present.
    pub fn add_category(&mut self, name: impl Into<String>, weight: f64) -> bool {
        self.weights.add(name, weight)
    }

    /// Searches the lyrics of every loaded category.
    pub fn search_lyrics(&self, keyword: &str) -> BTreeMap<String, CategoryMatches> {
        hymnal::search_lyrics(self.entries(), keyword)
    }

    /// Searches the titles of every loaded category.
    pub fn search_titles(&self, keyword: &str) -> BTreeMap<String, CategoryMatches> {
        hymnal::search_titles(self.entries(), keyword)
    }

    /// Drops every loaded category. The weight table is kept.
    pub fn clear(&mut self) {
        self.loaded.clear();
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &HymnCategory)> {
        self.loaded.iter().map(|(name, data)| (name.as_str(), data))
    }
}

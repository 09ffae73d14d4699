//! Weighted random choice of a hymnal category.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Error;

/// A category name paired with its selection weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    /// The category name, as used to load the category.
    pub name: String,
    /// Relative selection weight. Weights need not sum to one.
    pub weight: f64,
}

/// An ordered table of category weights.
///
/// Insertion order matters: cumulative weights are accumulated in that order
/// and a draw selects the first category whose cumulative weight exceeds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedCategories {
    categories: Vec<CategoryWeight>,
}

impl WeightedCategories {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Adds a category at the end of the table.
    ///
    /// Negative or NaN weights count as zero. Returns `false`, leaving the
    /// table unchanged, if the category is already present.
    pub fn add(&mut self, name: impl Into<String>, weight: f64) -> bool {
        let name = name.into();
        if self.contains(&name) {
            tracing::warn!(category = %name, "category already exists");
            return false;
        }
        self.categories.push(CategoryWeight {
            name,
            weight: weight.max(0.0),
        });
        true
    }

    /// Whether a category with this exact name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// The categories in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryWeight> {
        self.categories.iter()
    }

    /// The number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }

    /// Cumulative weights in table order.
    #[must_use]
    pub fn cumulative(&self) -> Vec<(&str, f64)> {
        self.categories
            .iter()
            .scan(0.0, |total, c| {
                *total += c.weight;
                Some((c.name.as_str(), *total))
            })
            .collect()
    }

    /// The category selected by a draw in `[0, total_weight)`.
    ///
    /// This is a linear scan for the first cumulative weight strictly greater
    /// than `draw`. A draw at or beyond the total selects nothing.
    #[must_use]
    pub fn category_at(&self, draw: f64) -> Option<&str> {
        self.cumulative()
            .into_iter()
            .find(|&(_, cumulative)| draw < cumulative)
            .map(|(name, _)| name)
    }

    /// Draws a category with probability proportional to its weight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCategories`] if the table is empty or all weights
    /// are zero.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str, Error> {
        let total = self.total_weight();
        if total <= 0.0 {
            return Err(Error::NoCategories);
        }
        let draw = rng.r#gen::<f64>() * total;
        self.category_at(draw)
            .or_else(|| self.categories.last().map(|c| c.name.as_str()))
            .ok_or(Error::NoCategories)
    }
}

impl FromIterator<(String, f64)> for WeightedCategories {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, weight) in iter {
            table.add(name, weight);
        }
        table
    }
}

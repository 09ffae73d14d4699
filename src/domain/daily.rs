//! Deterministic verse-of-the-day selection.

use chrono::{Datelike, NaiveDate};

use super::{Error, corpus::Corpus, search::VerseHit};

/// Derives the daily seed: `year * 366 + month0 * 31 + day`.
///
/// This is not a day-of-year count; some dates in consecutive years share a
/// seed (31 December and 6 January of the next year, for instance).
#[must_use]
pub fn daily_seed(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 366 + i64::from(date.month0()) * 31 + i64::from(date.day())
}

/// A sine-based pseudo-random sequence.
///
/// Each value is the fractional part of `sin(seed) * 10000`; the seed then
/// increments by one. The sequence is fully determined by its first seed.
#[derive(Debug, Clone)]
pub struct SineRandom {
    seed: i64,
}

impl SineRandom {
    /// Starts a sequence at `seed`.
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }
}

impl Iterator for SineRandom {
    type Item = f64;

    #[allow(clippy::cast_precision_loss)]
    fn next(&mut self) -> Option<f64> {
        let x = (self.seed as f64).sin() * 10_000.0;
        self.seed += 1;
        Some(x - x.floor())
    }
}

/// Picks the verse of the day for `date`.
///
/// The same date always selects the same verse of a given corpus.
///
/// # Errors
///
/// Returns [`Error::NotLoaded`] if the corpus has no verse.
pub fn verse_of_day(corpus: &Corpus, date: NaiveDate) -> Result<VerseHit, Error> {
    let total = corpus.verses().count();
    let Some(last) = total.checked_sub(1) else {
        return Err(Error::NotLoaded("corpus has no verse".to_string()));
    };

    let random = SineRandom::new(daily_seed(date)).next().unwrap_or_default();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let index = ((random * total as f64).floor() as usize).min(last);

    tracing::debug!(%date, index, total, "verse of the day");

    corpus
        .verses()
        .nth(index)
        .map(VerseHit::from)
        .ok_or_else(|| Error::NotLoaded("corpus has no verse".to_string()))
}

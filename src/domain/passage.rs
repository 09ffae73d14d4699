//! Extraction of verse ranges from a corpus.
//!
//! [`resolve`] turns a completed [`Reference`] into a [`ResolvedRange`].
//! [`read_passage`] is the positional reader used for cross-version
//! comparison: it tolerates a missing chapter by reading the nearest one.

use serde::Serialize;

use super::{
    Error,
    corpus::{Book, BookToken, Chapter, ChapterMatch, Corpus, Verse, capitalize},
    reference::{ParsedReference, Reference, VerseBound},
};

/// One verse of a result, labelled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseEntry {
    /// `"<verse>"`, or `"<chapter>.<verse>"` in ranges spanning chapters.
    #[serde(rename = "verse")]
    pub label: String,
    /// The verse text.
    pub text: String,
    /// Section title attached to the verse.
    #[serde(rename = "titre", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl VerseEntry {
    fn bare(verse: &Verse) -> Self {
        Self::labelled(verse.number().to_string(), verse)
    }

    fn qualified(chapter: &Chapter, verse: &Verse) -> Self {
        Self::labelled(format!("{}.{}", chapter.number(), verse.number()), verse)
    }

    fn labelled(label: String, verse: &Verse) -> Self {
        Self {
            label,
            text: verse.text().to_string(),
            title: verse.title().map(str::to_string),
        }
    }
}

/// The verses selected by a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    /// Canonical reference string, e.g. `Genesis 1:30-2:5`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Numbers of the chapters that were found, ascending.
    #[serde(rename = "chapitres")]
    pub chapters: Vec<u32>,
    /// The selected verses in reading order.
    pub verses: Vec<VerseEntry>,
}

/// Parses, completes and resolves a reference string in one go.
///
/// # Errors
///
/// Returns any error of [`ParsedReference::parse`],
/// [`ParsedReference::complete`] or [`resolve`].
pub fn read(corpus: &Corpus, input: &str) -> Result<ResolvedRange, Error> {
    let reference = ParsedReference::parse(input)?.complete(corpus)?;
    resolve(&reference, corpus)
}

/// Extracts the verses covered by `reference`.
///
/// Chapters are matched by number; numbers missing from the book are
/// skipped, and a range that matches no chapter yields an empty verse list
/// rather than an error.
///
/// # Errors
///
/// Returns [`Error::BookNotFound`] if the book is not in the corpus.
pub fn resolve(reference: &Reference, corpus: &Corpus) -> Result<ResolvedRange, Error> {
    let book = find_book(corpus, reference.book())?;

    let mut range = ResolvedRange {
        reference: full_reference(
            book.name(),
            reference.start_chapter(),
            reference.start_verse(),
            reference.end_chapter(),
            reference.end_verse(),
        ),
        chapters: Vec::new(),
        verses: Vec::new(),
    };

    let chapters = book.chapters_in(reference.start_chapter(), reference.end_chapter());
    let Some(last_index) = chapters.len().checked_sub(1) else {
        tracing::debug!(reference = %range.reference, "no chapter in range");
        return Ok(range);
    };

    let qualified = reference.is_inter_chapter();
    for (index, chapter) in chapters.iter().enumerate() {
        let start = if index == 0 {
            reference.start_verse()
        } else {
            1
        };
        let end = if index == last_index {
            reference.end_verse()
        } else {
            u32::try_from(chapter.verses().len()).unwrap_or(u32::MAX)
        };

        range.verses.extend(
            chapter
                .slice_verses(Some(start), Some(end))
                .iter()
                .map(|verse| {
                    if qualified {
                        VerseEntry::qualified(chapter, verse)
                    } else {
                        VerseEntry::bare(verse)
                    }
                }),
        );
    }
    range.chapters = chapters.iter().map(|c| c.number()).collect();

    Ok(range)
}

/// Builds `"<book> <c1>:<v1>"`, with `-<c2>:<v2>` when the chapters differ
/// or `-<v2>` when only the verses do.
#[must_use]
pub fn full_reference(
    book: &str,
    start_chapter: u32,
    start_verse: u32,
    end_chapter: u32,
    end_verse: u32,
) -> String {
    let mut reference = format!("{book} {start_chapter}:{start_verse}");
    if start_chapter != end_chapter {
        reference.push_str(&format!("-{end_chapter}:{end_verse}"));
    } else if start_verse != end_verse {
        reference.push_str(&format!("-{end_verse}"));
    }
    reference
}

/// The result of a positional read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    /// Reference string describing what was read.
    #[serde(rename = "ref")]
    pub reference: String,
    /// The chapter number, when exactly one chapter was read.
    #[serde(rename = "chapitre")]
    pub chapter: Option<u32>,
    /// Number of the first verse read.
    #[serde(rename = "verse_debut")]
    pub first_verse: Option<u32>,
    /// Number of the last verse read, when more than one verse was read.
    #[serde(rename = "verse_fin")]
    pub last_verse: Option<u32>,
    /// The verses, with bare labels.
    pub verses: Vec<VerseEntry>,
}

/// Reads verses by position rather than by reference string.
///
/// With no `chapter` the whole book is read. Otherwise the chapter is chosen
/// according to `matching`. `from` and `to` select verses within each chapter
/// read (see [`Chapter::slice_verses`]). `to` may be the end-of-chapter
/// sentinel: with an explicit chapter it resolves to that chapter's verse
/// count, without one it means the end of each chapter read.
///
/// # Errors
///
/// Returns [`Error::BookNotFound`], or [`Error::ChapterNotFound`] when the
/// sentinel names a chapter that does not exist.
pub fn read_passage(
    corpus: &Corpus,
    book: &BookToken,
    chapter: Option<u32>,
    from: Option<u32>,
    to: Option<VerseBound>,
    matching: ChapterMatch,
) -> Result<Passage, Error> {
    let found = find_book(corpus, book)?;

    let to = match (to, chapter) {
        (Some(VerseBound::Verse(verse)), _) => Some(verse),
        (Some(VerseBound::EndOfChapter), Some(number)) => {
            let count = corpus.verse_count(book, number)?;
            Some(u32::try_from(count).unwrap_or(u32::MAX))
        }
        (Some(VerseBound::EndOfChapter), None) => Some(u32::MAX),
        (None, _) => None,
    };

    let chapters = found.find_chapters(chapter, matching);
    let verses: Vec<&Verse> = chapters
        .iter()
        .copied()
        .flat_map(|c| c.slice_verses(from, to))
        .collect();

    let chapter = match chapters.as_slice() {
        [only] => Some(only.number()),
        _ => None,
    };

    let mut reference = match chapter {
        Some(number) => format!("{} {number}", found.name()),
        None => found.name().to_string(),
    };
    if let Some(from) = from.filter(|&f| f > 0) {
        if chapter.is_none() {
            reference.push(' ');
        }
        reference.push_str(&format!(":{from}"));
        let to = to.unwrap_or(from);
        if to != from && to != u32::MAX {
            reference.push_str(&format!("-{to}"));
        }
    }

    Ok(Passage {
        reference,
        chapter,
        first_verse: verses.first().map(|v| v.number()),
        last_verse: match verses.as_slice() {
            [_, .., last] => Some(last.number()),
            _ => None,
        },
        verses: verses.into_iter().map(VerseEntry::bare).collect(),
    })
}

fn find_book<'a>(corpus: &'a Corpus, token: &BookToken) -> Result<&'a Book, Error> {
    corpus
        .find_book(token)
        .ok_or_else(|| Error::BookNotFound(capitalize(&token.to_string())))
}

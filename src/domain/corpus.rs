//! In-memory scripture corpus and its accessor operations.
//!
//! A [`Corpus`] is an ordered list of testaments, each holding an ordered list
//! of books, chapters and verses. It is deserialized once by a corpus source
//! and never mutated afterwards.

use std::{fmt, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use super::Error;

/// Number of characters compared by the abbreviated book-name fallback.
const PREFIX_LEN: usize = 3;

/// A full scripture text for one language or version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(rename = "bible")]
    testaments: Vec<Testament>,
}

/// A named group of books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testament {
    #[serde(rename = "testament", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    books: Vec<Book>,
}

/// A book of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "book_name")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_chapters: Option<usize>,
    chapters: Vec<Chapter>,
}

/// A chapter of a book.
///
/// Chapter numbers are not guaranteed to match the chapter's position in its
/// book; lookups always compare by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(rename = "chapter_number")]
    number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_verses: Option<usize>,
    verses: Vec<Verse>,
}

/// A single verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(rename = "verse_number")]
    number: u32,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

/// Identifies a book either by name or by its 1-based position in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookToken {
    /// A full or abbreviated book name, matched case- and accent-insensitively.
    Name(NonEmptyString),
    /// A 1-based ordinal into the flattened book sequence.
    Ordinal(usize),
}

impl BookToken {
    /// Builds a token from user input.
    ///
    /// Purely numeric input becomes an [`BookToken::Ordinal`], anything else a
    /// [`BookToken::Name`]. Returns `None` for blank input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Ok(ordinal) = trimmed.parse::<usize>() {
            return Some(Self::Ordinal(ordinal));
        }
        NonEmptyString::new(trimmed.to_string()).ok().map(Self::Name)
    }
}

impl FromStr for BookToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::BookNotFound(s.to_string()))
    }
}

impl From<usize> for BookToken {
    fn from(ordinal: usize) -> Self {
        Self::Ordinal(ordinal)
    }
}

impl fmt::Display for BookToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Ordinal(ordinal) => write!(f, "{ordinal}"),
        }
    }
}

/// How a requested chapter number is matched against a book's chapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterMatch {
    /// Fall back to the chapter whose number is closest to the request.
    ///
    /// This never misses, but a wildly out-of-range request silently reads
    /// the first or last chapter.
    #[default]
    Nearest,
    /// Only a chapter with exactly the requested number matches.
    Exact,
}

/// A verse together with the book and chapter that contain it.
#[derive(Debug, Clone, Copy)]
pub struct VerseLocation<'a> {
    /// The containing book.
    pub book: &'a Book,
    /// The containing chapter.
    pub chapter: &'a Chapter,
    /// The verse itself.
    pub verse: &'a Verse,
}

impl VerseLocation<'_> {
    /// The `"<book> <chapter>:<verse>"` reference of this verse.
    #[must_use]
    pub fn reference(&self) -> String {
        format!(
            "{} {}:{}",
            self.book.name, self.chapter.number, self.verse.number
        )
    }
}

impl Corpus {
    /// Creates a corpus from its testaments.
    #[must_use]
    pub const fn new(testaments: Vec<Testament>) -> Self {
        Self { testaments }
    }

    /// The testaments in corpus order.
    #[must_use]
    pub fn testaments(&self) -> &[Testament] {
        &self.testaments
    }

    /// Iterates over all books across testaments, in corpus order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.testaments.iter().flat_map(|t| t.books.iter())
    }

    /// The total number of books.
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.testaments.iter().map(|t| t.books.len()).sum()
    }

    /// Returns `true` if the corpus contains no verse at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses().next().is_none()
    }

    /// Names of all books in corpus order.
    #[must_use]
    pub fn book_names(&self) -> Vec<&str> {
        self.books().map(Book::name).collect()
    }

    /// Iterates over every verse in testament, book, chapter, verse order.
    pub fn verses(&self) -> impl Iterator<Item = VerseLocation<'_>> {
        self.books().flat_map(|book| {
            book.chapters.iter().flat_map(move |chapter| {
                chapter.verses.iter().map(move |verse| VerseLocation {
                    book,
                    chapter,
                    verse,
                })
            })
        })
    }

    /// Looks up a book by token.
    ///
    /// Ordinals are 1-based indices into the flattened book list. Names are
    /// matched by [`Corpus::find_book_by_name`].
    #[must_use]
    pub fn find_book(&self, token: &BookToken) -> Option<&Book> {
        match token {
            BookToken::Ordinal(ordinal) => self.book_by_ordinal(*ordinal),
            BookToken::Name(name) => self.find_book_by_name(name.as_str()),
        }
    }

    /// Returns the book at the given 1-based position.
    #[must_use]
    pub fn book_by_ordinal(&self, ordinal: usize) -> Option<&Book> {
        ordinal.checked_sub(1).and_then(|index| self.books().nth(index))
    }

    /// Looks up a book by name.
    ///
    /// An exact match (ignoring case and accents) is tried first. Failing
    /// that, the abbreviated fallback of [`Corpus::find_book_by_prefix`]
    /// applies.
    #[must_use]
    pub fn find_book_by_name(&self, name: &str) -> Option<&Book> {
        let wanted = fold(name.trim());
        self.books()
            .find(|book| fold(&book.name) == wanted)
            .or_else(|| self.find_book_by_prefix(name))
    }

    /// Lossy fallback: the first book whose first three characters match
    /// those of `name`, ignoring case and accents.
    ///
    /// Several books can share a prefix ("Judges", "Jude"); the first one in
    /// corpus order always wins.
    #[must_use]
    pub fn find_book_by_prefix(&self, name: &str) -> Option<&Book> {
        let wanted = prefix(name.trim());
        self.books().find(|book| prefix(&book.name) == wanted)
    }

    /// The 1-based position of `book` in this corpus.
    #[must_use]
    pub fn ordinal_of(&self, book: &Book) -> Option<usize> {
        self.books()
            .position(|candidate| std::ptr::eq(candidate, book))
            .map(|index| index + 1)
    }

    /// The number of chapters of a book.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BookNotFound`] if no book matches the token.
    pub fn chapter_count(&self, token: &BookToken) -> Result<usize, Error> {
        self.find_book(token)
            .map(Book::total_chapters)
            .ok_or_else(|| Error::BookNotFound(capitalize(&token.to_string())))
    }

    /// The number of verses of a chapter, matched by exact chapter number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BookNotFound`] or [`Error::ChapterNotFound`].
    pub fn verse_count(&self, token: &BookToken, chapter: u32) -> Result<usize, Error> {
        let book = self
            .find_book(token)
            .ok_or_else(|| Error::BookNotFound(capitalize(&token.to_string())))?;
        book.chapter(chapter)
            .map(Chapter::total_verses)
            .ok_or_else(|| Error::ChapterNotFound {
                book: book.name.clone(),
                chapter,
            })
    }
}

impl Testament {
    /// Creates a testament.
    #[must_use]
    pub fn new(name: impl Into<String>, books: Vec<Book>) -> Self {
        Self {
            name: Some(name.into()),
            books,
        }
    }

    /// The testament's name, if the corpus provides one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The books of this testament.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }
}

impl Book {
    /// Creates a book.
    #[must_use]
    pub fn new(name: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            name: name.into(),
            total_chapters: None,
            chapters,
        }
    }

    /// The book's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The chapters of this book, in stored order.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// The declared chapter count, or the number of stored chapters.
    #[must_use]
    pub fn total_chapters(&self) -> usize {
        self.total_chapters.unwrap_or(self.chapters.len())
    }

    /// The chapter with exactly this number.
    #[must_use]
    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }

    /// Chapters whose number lies in `start..=end`, ascending by number.
    ///
    /// Numbers with no stored chapter are skipped. When a number is stored
    /// twice the first occurrence is kept.
    #[must_use]
    pub fn chapters_in(&self, start: u32, end: u32) -> Vec<&Chapter> {
        let mut found: Vec<&Chapter> = self
            .chapters
            .iter()
            .filter(|c| (start..=end).contains(&c.number))
            .collect();
        found.sort_by_key(|c| c.number);
        found.dedup_by_key(|c| c.number);
        found
    }

    /// Selects the chapters to read for an optional chapter number.
    ///
    /// `None` selects the whole book. Otherwise a single chapter is chosen
    /// according to `matching`; with [`ChapterMatch::Nearest`] ties go to the
    /// earliest stored chapter.
    #[must_use]
    pub fn find_chapters(&self, number: Option<u32>, matching: ChapterMatch) -> Vec<&Chapter> {
        let Some(number) = number else {
            return self.chapters.iter().collect();
        };

        let chosen = match matching {
            ChapterMatch::Exact => self.chapter(number),
            ChapterMatch::Nearest => self
                .chapters
                .iter()
                .reduce(|best, c| {
                    if c.number.abs_diff(number) < best.number.abs_diff(number) {
                        c
                    } else {
                        best
                    }
                }),
        };

        chosen.into_iter().collect()
    }
}

impl Chapter {
    /// Creates a chapter.
    #[must_use]
    pub const fn new(number: u32, verses: Vec<Verse>) -> Self {
        Self {
            number,
            total_verses: None,
            verses,
        }
    }

    /// The chapter number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// The verses of this chapter, in stored order.
    #[must_use]
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    /// The declared verse count, or the number of stored verses.
    #[must_use]
    pub fn total_verses(&self) -> usize {
        self.total_verses.unwrap_or(self.verses.len())
    }

    /// Returns the verses at positions `start..=end` (1-based).
    ///
    /// A missing or zero `start` means 1. A missing or zero `end` means
    /// `start`, or the last verse when `start` is also missing. `end` is
    /// clamped to the number of stored verses. A `start` past the last verse,
    /// or a `start` greater than `end`, yields an empty slice.
    #[must_use]
    pub fn slice_verses(&self, start: Option<u32>, end: Option<u32>) -> &[Verse] {
        let count = self.verses.len();
        let start = start.filter(|&s| s > 0).map(to_usize);
        let end = end.filter(|&e| e > 0).map(to_usize);

        let first = start.unwrap_or(1);
        if first > count {
            return &[];
        }
        let last = end.or(start).unwrap_or(count).min(count);
        if first > last {
            return &[];
        }
        &self.verses[first - 1..last]
    }
}

impl Verse {
    /// Creates an untitled verse.
    #[must_use]
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            title: None,
        }
    }

    /// Attaches a section title to the verse.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The verse number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// The verse text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The section title annotating this verse, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Upper-cases the first character and lower-cases the rest.
///
/// This is the canonical case used for book names in messages.
#[must_use]
pub fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Lower-cases and strips combining accents.
fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn prefix(s: &str) -> String {
    fold(s).chars().take(PREFIX_LEN).collect()
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

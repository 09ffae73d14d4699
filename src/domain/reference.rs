//! Parsing of free-form scripture references such as `Genesis 3:5-8`.
//!
//! Parsing happens in two phases. [`ParsedReference::parse`] is purely
//! syntactic and never touches a corpus. A parsed reference may end at the
//! `fin` sentinel ("through the end of the chapter"), which
//! [`ParsedReference::complete`] replaces with the chapter's actual verse
//! count, producing a [`Reference`].

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use super::{
    Error,
    corpus::{BookToken, Corpus},
};

/// Book names: an optional leading numeral, then one or more groups of
/// letters, apostrophes and hyphens separated by whitespace.
const BOOK: &str = r"([0-9]*\s*[\p{L}'’\-]+(?:\s+[\p{L}'’\-]+)*)";

/// The literal token that stands for the last verse of a chapter.
pub const END_OF_CHAPTER: &str = "fin";

/// The recognised reference shapes.
///
/// The variant order is the matching priority: the first shape whose
/// pattern matches the whole input wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `<book> <c1>:<v1>-<c2>:<v2>`
    InterChapter,
    /// `<book> <c>:<v>-fin`
    ToChapterEnd,
    /// `<book> <c>:<v1>-<v2>`
    VerseRange,
    /// `<book> <c>:<v>`
    SingleVerse,
    /// `<book> <c>`
    WholeChapter,
}

impl Shape {
    /// All shapes in matching order.
    pub const ALL: [Self; 5] = [
        Self::InterChapter,
        Self::ToChapterEnd,
        Self::VerseRange,
        Self::SingleVerse,
        Self::WholeChapter,
    ];

    fn pattern(self) -> String {
        let tail = match self {
            Self::InterChapter => r"([0-9]+):([0-9]+)\s*-\s*([0-9]+):([0-9]+)".to_string(),
            Self::ToChapterEnd => format!(r"([0-9]+):([0-9]+)\s*-\s*{END_OF_CHAPTER}"),
            Self::VerseRange => r"([0-9]+):([0-9]+)\s*-\s*([0-9]+)".to_string(),
            Self::SingleVerse => r"([0-9]+):([0-9]+)".to_string(),
            Self::WholeChapter => r"([0-9]+)".to_string(),
        };
        format!(r"(?i)^{BOOK}\s+{tail}$")
    }
}

struct Rule {
    shape: Shape,
    pattern: Regex,
}

static GRAMMAR: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    Shape::ALL
        .into_iter()
        .map(|shape| Rule {
            shape,
            pattern: Regex::new(&shape.pattern()).expect("reference grammar must compile"),
        })
        .collect()
});

/// The last verse of a parsed reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseBound {
    /// A concrete verse number.
    Verse(u32),
    /// The last verse of the end chapter, not yet looked up.
    EndOfChapter,
}

impl fmt::Display for VerseBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verse(n) => write!(f, "{n}"),
            Self::EndOfChapter => f.write_str(END_OF_CHAPTER),
        }
    }
}

impl FromStr for VerseBound {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(END_OF_CHAPTER) {
            return Ok(Self::EndOfChapter);
        }
        s.parse()
            .map(Self::Verse)
            .map_err(|_| Error::Format(s.to_string()))
    }
}

/// The syntactic structure of a reference string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    shape: Shape,
    book: BookToken,
    start_chapter: u32,
    start_verse: u32,
    end_chapter: u32,
    end_verse: VerseBound,
}

impl ParsedReference {
    /// Parses a reference string.
    ///
    /// Surrounding whitespace is ignored and the shapes of [`Shape::ALL`]
    /// are tried in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] carrying the original input if no shape
    /// matches or a number does not fit in a `u32`.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let invalid = || Error::Format(input.to_string());
        let trimmed = input.trim();

        let (shape, captures) = GRAMMAR
            .iter()
            .find_map(|rule| rule.pattern.captures(trimmed).map(|c| (rule.shape, c)))
            .ok_or_else(invalid)?;

        let number = |group: usize| {
            captures
                .get(group)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .ok_or_else(invalid)
        };

        let book = captures
            .get(1)
            .and_then(|m| BookToken::parse(m.as_str()))
            .ok_or_else(invalid)?;

        let chapter = number(2)?;
        let (start_verse, end_chapter, end_verse) = match shape {
            Shape::InterChapter => (number(3)?, number(4)?, VerseBound::Verse(number(5)?)),
            Shape::ToChapterEnd => (number(3)?, chapter, VerseBound::EndOfChapter),
            Shape::VerseRange => (number(3)?, chapter, VerseBound::Verse(number(4)?)),
            Shape::SingleVerse => {
                let verse = number(3)?;
                (verse, chapter, VerseBound::Verse(verse))
            }
            Shape::WholeChapter => (1, chapter, VerseBound::EndOfChapter),
        };

        Ok(Self {
            shape,
            book,
            start_chapter: chapter,
            start_verse,
            end_chapter,
            end_verse,
        })
    }

    /// The shape that matched.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// The book token, exactly as written.
    #[must_use]
    pub const fn book(&self) -> &BookToken {
        &self.book
    }

    /// The first chapter.
    #[must_use]
    pub const fn start_chapter(&self) -> u32 {
        self.start_chapter
    }

    /// The first verse.
    #[must_use]
    pub const fn start_verse(&self) -> u32 {
        self.start_verse
    }

    /// The last chapter.
    #[must_use]
    pub const fn end_chapter(&self) -> u32 {
        self.end_chapter
    }

    /// The last verse, possibly still the end-of-chapter sentinel.
    #[must_use]
    pub const fn end_verse(&self) -> VerseBound {
        self.end_verse
    }

    /// Replaces the end-of-chapter sentinel with a concrete verse number.
    ///
    /// The end chapter is looked up by exact number. References without the
    /// sentinel are converted without consulting the corpus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BookNotFound`] or [`Error::ChapterNotFound`] when the
    /// sentinel cannot be resolved.
    pub fn complete(self, corpus: &Corpus) -> Result<Reference, Error> {
        let end_verse = match self.end_verse {
            VerseBound::Verse(verse) => verse,
            VerseBound::EndOfChapter => {
                let count = corpus.verse_count(&self.book, self.end_chapter)?;
                tracing::trace!(book = %self.book, chapter = self.end_chapter, count, "resolved end of chapter");
                u32::try_from(count).unwrap_or(u32::MAX)
            }
        };

        Ok(Reference {
            book: self.book,
            start_chapter: self.start_chapter,
            start_verse: self.start_verse,
            end_chapter: self.end_chapter,
            end_verse,
        })
    }
}

impl FromStr for ParsedReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ParsedReference {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// A fully resolved reference: every coordinate is a concrete number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    book: BookToken,
    start_chapter: u32,
    start_verse: u32,
    end_chapter: u32,
    end_verse: u32,
}

impl Reference {
    /// Creates a reference from explicit coordinates.
    #[must_use]
    pub const fn new(
        book: BookToken,
        start_chapter: u32,
        start_verse: u32,
        end_chapter: u32,
        end_verse: u32,
    ) -> Self {
        Self {
            book,
            start_chapter,
            start_verse,
            end_chapter,
            end_verse,
        }
    }

    /// The book token.
    #[must_use]
    pub const fn book(&self) -> &BookToken {
        &self.book
    }

    /// The first chapter.
    #[must_use]
    pub const fn start_chapter(&self) -> u32 {
        self.start_chapter
    }

    /// The first verse.
    #[must_use]
    pub const fn start_verse(&self) -> u32 {
        self.start_verse
    }

    /// The last chapter.
    #[must_use]
    pub const fn end_chapter(&self) -> u32 {
        self.end_chapter
    }

    /// The last verse.
    #[must_use]
    pub const fn end_verse(&self) -> u32 {
        self.end_verse
    }

    /// Whether the reference spans more than one chapter number.
    #[must_use]
    pub const fn is_inter_chapter(&self) -> bool {
        self.start_chapter != self.end_chapter
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::fixtures;

    fn book_name(parsed: &ParsedReference) -> String {
        parsed.book().to_string()
    }

    #[test_case("Genesis 1:30-2:5", Shape::InterChapter, 1, 30, 2, VerseBound::Verse(5))]
    #[test_case("Genesis 3:5-fin", Shape::ToChapterEnd, 3, 5, 3, VerseBound::EndOfChapter)]
    #[test_case("Genesis 3:5-FIN", Shape::ToChapterEnd, 3, 5, 3, VerseBound::EndOfChapter)]
    #[test_case("Genesis 3:5-8", Shape::VerseRange, 3, 5, 3, VerseBound::Verse(8))]
    #[test_case("Genesis 3:5 - 8", Shape::VerseRange, 3, 5, 3, VerseBound::Verse(8))]
    #[test_case("Genesis 3:5", Shape::SingleVerse, 3, 5, 3, VerseBound::Verse(5))]
    #[test_case("Genesis 3", Shape::WholeChapter, 3, 1, 3, VerseBound::EndOfChapter)]
    #[test_case("  Genesis 3:5  ", Shape::SingleVerse, 3, 5, 3, VerseBound::Verse(5))]
    fn parses_each_shape(
        input: &str,
        shape: Shape,
        start_chapter: u32,
        start_verse: u32,
        end_chapter: u32,
        end_verse: VerseBound,
    ) {
        let parsed = ParsedReference::parse(input).unwrap();
        assert_eq!(parsed.shape(), shape);
        assert_eq!(book_name(&parsed), "Genesis");
        assert_eq!(parsed.start_chapter(), start_chapter);
        assert_eq!(parsed.start_verse(), start_verse);
        assert_eq!(parsed.end_chapter(), end_chapter);
        assert_eq!(parsed.end_verse(), end_verse);
    }

    #[test_case("1 Corinthiens 13:4", "1 Corinthiens"; "leading numeral")]
    #[test_case("1Corinthiens 13:4", "1Corinthiens"; "numeral without space")]
    #[test_case("Cantique des cantiques 2:1", "Cantique des cantiques"; "multi word")]
    #[test_case("Ésaïe 53:5", "Ésaïe"; "accented")]
    #[test_case("Saint-Jean 3:16", "Saint-Jean"; "hyphenated")]
    #[test_case("L'Exode 3:14", "L'Exode"; "apostrophe")]
    fn book_token_grammar(input: &str, expected: &str) {
        let parsed = ParsedReference::parse(input).unwrap();
        assert_eq!(book_name(&parsed), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("Genesis"; "book only")]
    #[test_case("Genesis 1:"; "dangling colon")]
    #[test_case("Genesis 1:2-"; "dangling dash")]
    #[test_case("Genesis a:b"; "letters for numbers")]
    #[test_case("3:16"; "no book")]
    #[test_case("Genesis 1:2-3:"; "incomplete end")]
    #[test_case("Genesis 1:2-end"; "english sentinel")]
    #[test_case("Genesis 99999999999:1"; "overflowing chapter")]
    fn rejects_invalid_input(input: &str) {
        assert_eq!(
            ParsedReference::parse(input),
            Err(Error::Format(input.to_string()))
        );
    }

    #[test]
    fn format_error_keeps_original_input() {
        let error = ParsedReference::parse("  not a reference ").unwrap_err();
        assert_eq!(error.to_string(), "Invalid reference format: \"  not a reference \"");
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: ParsedReference = "Exode 20:1-17".parse().unwrap();
        assert_eq!(parsed, ParsedReference::parse("Exode 20:1-17").unwrap());
    }

    #[test]
    fn complete_resolves_sentinel_to_chapter_length() {
        let corpus = fixtures::genesis_exodus();

        let reference = ParsedReference::parse("Genesis 2:5-fin")
            .unwrap()
            .complete(&corpus)
            .unwrap();
        assert_eq!(reference.end_verse(), 25);

        let reference = ParsedReference::parse("genesis 3")
            .unwrap()
            .complete(&corpus)
            .unwrap();
        assert_eq!(reference.start_verse(), 1);
        assert_eq!(reference.end_verse(), 24);
    }

    #[test]
    fn complete_without_sentinel_does_not_need_the_book() {
        let corpus = fixtures::genesis_exodus();
        let reference = ParsedReference::parse("Nowhere 1:2-3")
            .unwrap()
            .complete(&corpus)
            .unwrap();
        assert_eq!(reference.end_verse(), 3);
        assert!(!reference.is_inter_chapter());
    }

    #[test]
    fn complete_reports_missing_book_and_chapter() {
        let corpus = fixtures::genesis_exodus();

        let error = ParsedReference::parse("Nowhere 1")
            .unwrap()
            .complete(&corpus)
            .unwrap_err();
        assert_eq!(error, Error::BookNotFound("Nowhere".to_string()));

        let error = ParsedReference::parse("Genesis 40:1-fin")
            .unwrap()
            .complete(&corpus)
            .unwrap_err();
        assert_eq!(
            error,
            Error::ChapterNotFound {
                book: "Genesis".to_string(),
                chapter: 40
            }
        );
    }

    #[test_case("fin", VerseBound::EndOfChapter)]
    #[test_case(" Fin ", VerseBound::EndOfChapter)]
    #[test_case("12", VerseBound::Verse(12))]
    fn verse_bound_from_str(input: &str, expected: VerseBound) {
        assert_eq!(input.parse::<VerseBound>().unwrap(), expected);
    }
}

/// Errors returned by lookup operations over a corpus or hymnal.
///
/// Every failure of the lookup engine is reported through this type so that
/// callers can branch on the variant rather than on message text.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The reference string matched none of the recognised shapes.
    #[error("Invalid reference format: \"{0}\"")]
    Format(String),

    /// No book matched the given token.
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// The book exists but has no chapter with this number.
    #[error("Chapter {chapter} not found in {book}")]
    ChapterNotFound {
        /// Name of the book that was searched.
        book: String,
        /// The requested chapter number.
        chapter: u32,
    },

    /// The corpus needed for the operation is absent or empty.
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    /// A cross-version comparison found the verse in none of the versions.
    #[error("No verse found in the requested versions")]
    NoResultsInVersions,

    /// No hymn is stored under this key.
    #[error("Hymn not found: {0}")]
    HymnNotFound(String),

    /// The category exists but holds no hymns.
    #[error("No hymns found in category {0}")]
    EmptyCategory(String),

    /// A weighted draw was requested from an empty weight table.
    #[error("No hymnal category available")]
    NoCategories,
}

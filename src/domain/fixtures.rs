//! Small hand-built corpora shared by unit tests.

use super::corpus::{Book, Chapter, Corpus, Testament, Verse};

/// A chapter with `count` generic verses numbered from 1.
pub fn chapter(number: u32, count: u32) -> Chapter {
    Chapter::new(
        number,
        (1..=count)
            .map(|v| Verse::new(v, format!("Text of {number}:{v}.")))
            .collect(),
    )
}

/// Genesis, Exode and a few books that exercise name matching.
///
/// Genesis has three chapters of 31, 25 and 24 verses. Its first verse is the
/// only one containing the word "beginning".
pub fn genesis_exodus() -> Corpus {
    let mut genesis_one = chapter(1, 31);
    let mut verses = genesis_one.verses().to_vec();
    verses[0] = Verse::new(1, "In the beginning God created the heaven and the earth.")
        .with_title("The Creation");
    genesis_one = Chapter::new(1, verses);

    Corpus::new(vec![
        Testament::new(
            "Old",
            vec![
                Book::new("Genesis", vec![genesis_one, chapter(2, 25), chapter(3, 24)]),
                Book::new("Exode", vec![chapter(1, 22), chapter(20, 26)]),
                Book::new("Judges", vec![chapter(1, 36)]),
            ],
        ),
        Testament::new(
            "New",
            vec![
                Book::new("1 Corinthiens", vec![chapter(13, 13)]),
                Book::new("Jude", vec![chapter(1, 25)]),
            ],
        ),
    ])
}

/// A single book whose chapters are numbered 1, 5 and 9.
pub fn sparse() -> Corpus {
    Corpus::new(vec![Testament::new(
        "Old",
        vec![Book::new(
            "Sparse",
            vec![chapter(1, 3), chapter(5, 4), chapter(9, 2)],
        )],
    )])
}

/// A 66-book corpus split 39/27 across two testaments, books named
/// `Book <ordinal>`.
pub fn canonical() -> Corpus {
    let book = |n: usize| Book::new(format!("Book {n}"), vec![chapter(1, 3)]);
    Corpus::new(vec![
        Testament::new("Old", (1..=39).map(book).collect()),
        Testament::new("New", (40..=66).map(book).collect()),
    ])
}

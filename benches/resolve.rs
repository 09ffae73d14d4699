//! Throughput of reference parsing and resolution over a full-size corpus,
//! and of loading that corpus from disk.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use lectern::{
    CorpusRegistry, DirectorySource, ParsedReference,
    domain::{Book, Chapter, Corpus, Testament, Verse, passage, search},
    storage::BIBLE_DIR,
};
use tempfile::TempDir;

/// Book names may not contain digits, so ordinals are spelled with letters:
/// 42 becomes `Bookec`.
fn book_name(n: usize) -> String {
    let letters: String = n
        .to_string()
        .bytes()
        .map(|d| char::from(b'a' + (d - b'0')))
        .collect();
    format!("Book{letters}")
}

/// A 66-book corpus of 50 chapters with 30 verses each.
fn corpus() -> Corpus {
    let book = |n: usize| {
        let chapters = (1..=50)
            .map(|c| {
                let verses = (1..=30)
                    .map(|v| Verse::new(v, format!("Book {n} chapter {c} verse {v} of the text.")))
                    .collect();
                Chapter::new(c, verses)
            })
            .collect();
        Book::new(book_name(n), chapters)
    };
    Corpus::new(vec![
        Testament::new("Old", (1..=39).map(book).collect()),
        Testament::new("New", (40..=66).map(book).collect()),
    ])
}

fn parse(c: &mut Criterion) {
    c.bench_function("parse inter-chapter reference", |b| {
        b.iter(|| ParsedReference::parse(black_box("Bookec 12:5-14:7")).ok());
    });
}

fn resolve(c: &mut Criterion) {
    let corpus = corpus();
    c.bench_function("resolve chapter range", |b| {
        b.iter(|| passage::read(&corpus, black_box("Bookga 3:10-7:20")).unwrap());
    });
    c.bench_function("resolve by prefix", |b| {
        b.iter(|| passage::read(&corpus, black_box("boo 1:1-fin")).unwrap());
    });
}

fn keyword(c: &mut Criterion) {
    let corpus = corpus();
    c.bench_function("keyword search", |b| {
        b.iter(|| search::search(&corpus, black_box("chapter 49 verse 30")));
    });
}

fn load(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join(BIBLE_DIR)).unwrap();
    std::fs::write(
        tmp.path().join(BIBLE_DIR).join("bible_en.json"),
        serde_json::to_vec(&corpus()).unwrap(),
    )
    .unwrap();

    c.bench_function("load corpus", |b| {
        b.iter_batched(
            || CorpusRegistry::new(DirectorySource::new(tmp.path().to_path_buf())),
            |registry| registry.get("en").unwrap(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, parse, resolve, keyword, load);
criterion_main!(benches);

use clap::Parser;
use lectern::domain::BookToken;
use serde_json::json;
use tracing::instrument;

use super::{Context, OutputFormat, emit, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Books {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Books {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let corpus = context.corpus()?;

        match self.output {
            OutputFormat::Pretty => {
                let mut ordinal = 0;
                for testament in corpus.testaments() {
                    if let Some(name) = testament.name() {
                        println!("{}", name.dim());
                    }
                    for book in testament.books() {
                        ordinal += 1;
                        println!("{ordinal:>3}  {}", book.name());
                    }
                }
            }
            OutputFormat::Json => print_json(&corpus.book_names())?,
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Chapters {
    /// Book name, abbreviation or position
    book: BookToken,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Chapters {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let corpus = context.corpus()?;
        let count = corpus
            .chapter_count(&self.book)
            .map(|count| json!({ "chapters": count }));
        emit(self.output, count, |count| println!("{}", count["chapters"]))
    }
}

#[derive(Debug, Parser)]
pub struct Verses {
    /// Book name, abbreviation or position
    book: BookToken,

    /// Chapter number, matched exactly
    chapter: u32,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Verses {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let corpus = context.corpus()?;
        let count = corpus
            .verse_count(&self.book, self.chapter)
            .map(|count| json!({ "verses": count }));
        emit(self.output, count, |count| println!("{}", count["verses"]))
    }
}

#[cfg(test)]
mod tests {
    use lectern::Error;

    use super::*;
    use crate::cli::fixtures;

    fn token(s: &str) -> BookToken {
        BookToken::parse(s).unwrap()
    }

    #[test]
    fn books_run_lists_in_any_output() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        for output in [OutputFormat::Pretty, OutputFormat::Json] {
            Books { output }
                .run(&context)
                .expect("books command should succeed");
        }
    }

    #[test]
    fn chapters_run_reports_an_unknown_book() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        Chapters {
            book: token("2"),
            output: OutputFormat::Pretty,
        }
        .run(&context)
        .expect("chapters command should succeed");

        let error = Chapters {
            book: token("9"),
            output: OutputFormat::Pretty,
        }
        .run(&context)
        .unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::BookNotFound("9".to_string()))
        );
    }

    #[test]
    fn verses_run_matches_chapters_exactly() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        Verses {
            book: token("exodus"),
            chapter: 5,
            output: OutputFormat::Json,
        }
        .run(&context)
        .expect("verses command should succeed");

        let error = Verses {
            book: token("exodus"),
            chapter: 4,
            output: OutputFormat::Pretty,
        }
        .run(&context)
        .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::ChapterNotFound { chapter: 4, .. })
        ));
    }
}

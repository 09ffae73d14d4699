use clap::Parser;
use lectern::domain::{BookToken, VerseBound, passage};
use tracing::instrument;

use super::{Context, OutputFormat, emit, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Passage {
    /// Book name, abbreviation or 1-based position
    book: BookToken,

    /// Chapter number; the whole book is read when omitted
    chapter: Option<u32>,

    /// First verse
    from: Option<u32>,

    /// Last verse, or "fin" for the end of the chapter
    to: Option<VerseBound>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Passage {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let corpus = context.corpus()?;
        let passage = passage::read_passage(
            &corpus,
            &self.book,
            self.chapter,
            self.from,
            self.to,
            context.config().chapter_matching,
        );
        emit(self.output, passage, print_passage)
    }
}

fn print_passage(found: &passage::Passage) {
    println!("{}", found.reference.info());
    for verse in &found.verses {
        println!("{:>3}  {}", verse.label, super::terminal::wrap(&verse.text, 5));
    }
    if found.verses.is_empty() {
        println!("{}", "No verses found".warning());
    }
}

#[cfg(test)]
mod tests {
    use lectern::Error;

    use super::*;
    use crate::cli::fixtures;

    fn parse(args: &[&str]) -> Passage {
        Passage::try_parse_from(std::iter::once("passage").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positional_arguments_are_parsed() {
        let passage = parse(&["2", "5", "1", "fin"]);
        assert_eq!(passage.book, BookToken::Ordinal(2));
        assert_eq!(passage.chapter, Some(5));
        assert_eq!(passage.from, Some(1));
        assert_eq!(passage.to, Some(VerseBound::EndOfChapter));
    }

    #[test]
    fn passage_run_reads_the_nearest_chapter() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        parse(&["Exodus", "4", "1", "2"])
            .run(&context)
            .expect("passage command should succeed");
        parse(&["exo", "5", "1", "fin", "--output", "json"])
            .run(&context)
            .expect("passage command should succeed");
    }

    #[test]
    fn passage_run_reports_a_missing_chapter_for_fin() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        let error = parse(&["Exodus", "4", "1", "fin"])
            .run(&context)
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::ChapterNotFound {
                book: "Exodus".to_string(),
                chapter: 4
            })
        );
    }
}

use clap::Parser;
use lectern::domain::{ResolvedRange, passage};
use tracing::instrument;

use super::{Context, OutputFormat, emit, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Read {
    /// The reference to read, e.g. "Genesis 1:30-2:5" or "Jaona 3:16-fin"
    #[arg(required = true, num_args = 1..)]
    reference: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Read {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let corpus = context.corpus()?;
        let range = passage::read(&corpus, &self.reference.join(" "));
        emit(self.output, range, print_range)
    }
}

/// Prints a resolved range with one verse per line.
pub fn print_range(range: &ResolvedRange) {
    println!("{}", range.reference.info());
    if range.verses.is_empty() {
        println!("{}", "No verses in this range".warning());
        return;
    }

    let width = range
        .verses
        .iter()
        .map(|v| v.label.chars().count())
        .max()
        .unwrap_or(1);

    for verse in &range.verses {
        if let Some(title) = &verse.title {
            println!("\n{}", title.dim());
        }
        println!(
            "{:>width$}  {}",
            verse.label,
            super::terminal::wrap(&verse.text, width + 2)
        );
    }
}

#[cfg(test)]
mod tests {
    use lectern::Error;

    use super::*;
    use crate::cli::fixtures;

    fn read(reference: &str, output: OutputFormat) -> Read {
        Read {
            reference: reference.split_whitespace().map(String::from).collect(),
            output,
        }
    }

    #[test]
    fn read_run_prints_a_resolved_reference() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        read("Genesis 1:1-fin", OutputFormat::Pretty)
            .run(&context)
            .expect("read command should succeed");
        assert!(context.registry.is_loaded("en"));
    }

    #[test]
    fn read_run_reports_an_unknown_book() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        let error = read("Tobit 1:1", OutputFormat::Pretty)
            .run(&context)
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::BookNotFound("Tobit".to_string()))
        );
    }

    #[test]
    fn read_run_reports_json_failures_as_records() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        read("Tobit 1:1", OutputFormat::Json)
            .run(&context)
            .expect("json output reports the failure in-band");
        read("Genesis 1:30-2:5", OutputFormat::Json)
            .run(&context)
            .expect("read command should succeed");
    }

    #[test]
    fn read_run_needs_a_corpus() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "mg");

        let error = read("Genesis 1:1", OutputFormat::Json)
            .run(&context)
            .unwrap_err();
        assert!(error.to_string().contains("'mg' corpus"));
    }
}

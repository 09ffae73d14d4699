use clap::Parser;
use lectern::domain::{SearchResults, search};
use tracing::instrument;

use super::{Context, OutputFormat, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Search {
    /// The text to look for, ignoring case
    #[arg(required = true, num_args = 1..)]
    keyword: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Search {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let corpus = context.corpus()?;
        let results = search::search(&corpus, &self.keyword.join(" "));

        match self.output {
            OutputFormat::Pretty => print_results(&results),
            OutputFormat::Json => print_json(&results)?,
        }
        Ok(())
    }
}

pub fn print_results(results: &SearchResults) {
    for hit in &results.results {
        println!("{}", hit.reference.info());
        println!("  {}", super::terminal::wrap(&hit.text, 2));
    }
    match results.count {
        0 => println!("{}", "No matching verses".warning()),
        1 => println!("\n{}", "1 matching verse".dim()),
        n => println!("\n{}", format!("{n} matching verses").dim()),
    }
}

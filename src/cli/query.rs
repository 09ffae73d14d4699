use clap::Parser;
use lectern::domain::{QueryOutcome, query};
use tracing::instrument;

use super::{Context, OutputFormat, print_json, read::print_range, search::print_results};

#[derive(Debug, Parser)]
pub struct Query {
    /// A reference such as "Salamo 23" or any text to search for
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Query {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let corpus = context.corpus()?;
        let outcome = query::query(&corpus, &self.text.join(" "));

        match (self.output, &outcome) {
            (OutputFormat::Json, _) => print_json(&outcome)?,
            (OutputFormat::Pretty, QueryOutcome::Passage(range)) => print_range(range),
            (OutputFormat::Pretty, QueryOutcome::Search(results)) => print_results(results),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fixtures;

    fn query(text: &str, output: OutputFormat) -> Query {
        Query {
            text: vec![text.to_string()],
            output,
        }
    }

    #[test]
    fn query_run_reads_or_searches() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        for output in [OutputFormat::Pretty, OutputFormat::Json] {
            query("Genesis 1:1-2", output)
                .run(&context)
                .expect("a reference is read");
            query("Tobit 1:1", output)
                .run(&context)
                .expect("a failed reference is searched for");
            query("light", output)
                .run(&context)
                .expect("a keyword is searched for");
        }
    }
}

use clap::Parser;
use lectern::domain::{BookToken, Comparison, compare::parse_versions};
use nonempty::NonEmpty;
use tracing::instrument;

use super::{Context, OutputFormat, emit, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Compare {
    /// Book name or abbreviation in the primary language, or its position
    book: BookToken,

    /// Chapter number
    chapter: u32,

    /// Verse number
    verse: u32,

    /// Versions to compare, separated by commas or spaces
    #[arg(long, default_value = "fr,en,mg")]
    versions: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Compare {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let Some(versions) = NonEmpty::from_vec(parse_versions(&self.versions)) else {
            anyhow::bail!("At least one version is required");
        };

        let names: Vec<&str> = versions.iter().map(String::as_str).collect();
        let spinner = super::terminal::spinner(format!("Loading {}", names.join(", ")));
        let comparison = context.registry.compare(
            &context.language,
            &self.book,
            self.chapter,
            self.verse,
            &versions,
            context.config().chapter_matching,
        );
        spinner.finish_and_clear();

        emit(self.output, comparison, |comparison| {
            print_comparison(comparison, &names);
        })
    }
}

fn print_comparison(comparison: &Comparison, requested: &[&str]) {
    println!("{}", comparison.reference.info());
    for version in requested {
        let code = version.to_uppercase();
        match comparison.versions.get(&code) {
            Some(text) => println!("{:>4}  {}", code.dim(), super::terminal::wrap(text, 6)),
            None => println!("{:>4}  {}", code.dim(), "not available".warning()),
        }
    }
}

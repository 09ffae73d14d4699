use std::collections::BTreeMap;

use clap::Parser;
use lectern::domain::{HymnRef, HymnalEntry, hymnal::CategoryMatches};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;
use tracing::instrument;

use super::{Context, OutputFormat, emit, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Hymn {
    #[command(subcommand)]
    command: HymnCommand,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty", global = true)]
    output: OutputFormat,
}

#[derive(Debug, clap::Subcommand)]
enum HymnCommand {
    /// Show a hymn with all of its strophes
    Show(HymnArgs),

    /// Show a hymn picked at random, weighted by category
    Random {
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the number of hymns in a category
    Count {
        /// Category name
        category: String,
    },

    /// Show the number of strophes of a hymn, refrains excluded
    Strophes(HymnArgs),

    /// Show the title of a hymn
    Title(HymnArgs),

    /// Search every category for a keyword
    Search {
        /// The text to look for, ignoring case
        #[arg(required = true, num_args = 1..)]
        keyword: Vec<String>,

        /// Search titles instead of lyrics
        #[arg(long)]
        titles: bool,
    },

    /// List the configured categories and their weights
    Categories,
}

/// A hymn given either as `<category> <number>` or as one `"CAT N"` argument.
#[derive(Debug, clap::Args)]
struct HymnArgs {
    /// Category, e.g. "ff" or "FFPM", or a whole reference such as "FFPM 12"
    category: String,

    /// Hymn number within the category
    number: Option<u32>,
}

impl HymnArgs {
    fn resolve(self) -> Result<(String, u32), lectern::Error> {
        match self.number {
            Some(number) => Ok((self.category, number)),
            None => {
                let reference: HymnRef = self.category.parse()?;
                Ok((reference.category, reference.number))
            }
        }
    }
}

impl Hymn {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut store = context.hymnal();
        let output = self.output;

        match self.command {
            HymnCommand::Show(hymn) => {
                let entry = hymn
                    .resolve()
                    .and_then(|(category, number)| store.hymn(&category, number));
                emit(output, entry, print_entry)?;
            }
            HymnCommand::Random { seed } => {
                let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
                emit(output, store.random(&mut rng), print_entry)?;
            }
            HymnCommand::Count { category } => {
                let count = store.count(&category);
                match output {
                    OutputFormat::Pretty if count == 0 => {
                        println!("{}", format!("No hymns in {category}").warning());
                    }
                    OutputFormat::Pretty => println!("{count}"),
                    OutputFormat::Json => print_json(&json!({ "count": count }))?,
                }
            }
            HymnCommand::Strophes(hymn) => {
                let strophes = hymn
                    .resolve()
                    .and_then(|(category, number)| store.strophes(&category, number));
                emit(output, strophes, |strophes| println!("{}", strophes.count))?;
            }
            HymnCommand::Title(hymn) => {
                let title = hymn
                    .resolve()
                    .and_then(|(category, number)| store.title(&category, number));
                emit(output, title, |title| {
                    println!("{}  {}", title.reference.info(), title.title);
                })?;
            }
            HymnCommand::Search { keyword, titles } => {
                let spinner = super::terminal::spinner("Loading hymnal".to_string());
                store.load_all();
                spinner.finish_and_clear();

                let keyword = keyword.join(" ");
                let results = if titles {
                    store.search_titles(&keyword)
                } else {
                    store.search_lyrics(&keyword)
                };
                match output {
                    OutputFormat::Pretty => print_matches(&results),
                    OutputFormat::Json => print_json(&results)?,
                }
            }
            HymnCommand::Categories => match output {
                OutputFormat::Pretty => {
                    for category in store.weights().iter() {
                        println!("{:<10} {:.2}", category.name, category.weight);
                    }
                }
                OutputFormat::Json => print_json(store.weights())?,
            },
        }
        Ok(())
    }
}

fn print_entry(entry: &HymnalEntry) {
    println!("{}  {}", entry.reference.info(), entry.title);
    for strophe in &entry.content {
        println!();
        if strophe.refrain {
            println!("{}", "Refrain".dim());
        } else {
            println!("{}", strophe.number.to_string().dim());
        }
        for line in strophe.text.lines() {
            println!("  {}", line.trim());
        }
    }
}

fn print_matches(results: &BTreeMap<String, CategoryMatches>) {
    let mut total = 0;
    for matches in results.values() {
        for hymn in &matches.hymns {
            total += 1;
            println!("{}  {}", hymn.reference.info(), hymn.title);
            for strophe in &hymn.matching_strophes {
                let label = if strophe.is_refrain {
                    "R".to_string()
                } else {
                    strophe.strophe_number.to_string()
                };
                println!("  {:>2}  {}", label.dim(), strophe.match_context);
            }
        }
    }
    match total {
        0 => println!("{}", "No matching hymns".warning()),
        1 => println!("\n{}", "1 matching hymn".dim()),
        n => println!("\n{}", format!("{n} matching hymns").dim()),
    }
}

#[cfg(test)]
mod tests {
    use lectern::Error;
    use test_case::test_case;

    use super::*;
    use crate::cli::fixtures;

    fn hymn(args: &[&str]) -> Hymn {
        Hymn::try_parse_from(std::iter::once("hymn").chain(args.iter().copied())).unwrap()
    }

    fn args(category: &str, number: Option<u32>) -> HymnArgs {
        HymnArgs {
            category: category.to_string(),
            number,
        }
    }

    #[test_case(args("FFPM", Some(12)), ("FFPM", 12); "separate arguments")]
    #[test_case(args("FFPM 12", None), ("ffpm", 12); "one reference")]
    #[test_case(args(" ff  3 ", None), ("ff", 3); "padded reference")]
    fn hymn_is_given_either_way(args: HymnArgs, expected: (&str, u32)) {
        let (category, number) = args.resolve().unwrap();
        assert_eq!((category.as_str(), number), expected);
    }

    #[test]
    fn category_without_number_is_a_format_error() {
        assert_eq!(
            args("FFPM", None).resolve(),
            Err(Error::Format("FFPM".to_string()))
        );
    }

    #[test]
    fn hymn_run_shows_a_hymn_from_a_reference() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        hymn(&["show", "FFPM 1"])
            .run(&context)
            .expect("hymn show should succeed");
        hymn(&["title", "ff", "1", "--output", "json"])
            .run(&context)
            .expect("hymn title should succeed");
        hymn(&["strophes", "antema 1"])
            .run(&context)
            .expect("hymn strophes should succeed");
    }

    #[test]
    fn hymn_run_reports_a_missing_hymn() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        let error = hymn(&["show", "ff", "2"]).run(&context).unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::HymnNotFound("ff_2".to_string()))
        );
        hymn(&["show", "ff", "2", "--output", "json"])
            .run(&context)
            .expect("json output reports the failure in-band");
    }

    #[test]
    fn hymn_run_random_search_and_listing() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        let commands: [&[&str]; 6] = [
            &["random", "--seed", "7"],
            &["count", "tsanta"],
            &["count", "missing"],
            &["search", "haleloia"],
            &["search", "tompo", "--titles", "--output", "json"],
            &["categories"],
        ];
        for command in commands {
            hymn(command)
                .run(&context)
                .expect("hymn command should succeed");
        }
    }
}

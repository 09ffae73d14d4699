use std::{path::PathBuf, sync::Arc};

mod books;
mod compare;
mod daily;
#[cfg(test)]
mod fixtures;
mod hymn;
mod init;
mod passage;
mod query;
mod read;
mod search;
mod terminal;

use anyhow::Context as _;
use books::{Books, Chapters, Verses};
use clap::ArgAction;
use compare::Compare;
use daily::Daily;
use hymn::Hymn;
use init::Init;
use lectern::{Config, Corpus, CorpusRegistry, DirectorySource, HymnalStore};
use passage::Passage;
use query::Query;
use read::Read;
use search::Search;
use serde::Serialize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the data root holding `lectern.toml`, `bible/` and `hymnal/`
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// The corpus language to read (defaults to the configured language)
    #[arg(short, long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let context = Context::new(self.root, self.lang);
        self.command.run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Read the verses named by a reference, e.g. "Genesis 1:30-2:5"
    Read(Read),

    /// Read verses by book, chapter and verse positions
    ///
    /// A chapter that does not exist falls back to the nearest one unless
    /// `chapter_matching = "exact"` is configured.
    Passage(Passage),

    /// Find every verse containing a keyword
    Search(Search),

    /// Show the verse of the day
    Daily(Daily),

    /// Show one verse in several languages
    Compare(Compare),

    /// List the books of the corpus
    Books(Books),

    /// Show the number of chapters of a book
    Chapters(Chapters),

    /// Show the number of verses of a chapter
    Verses(Verses),

    /// Read a reference, or search for the text if it is not one
    Query(Query),

    /// Look up and search hymns
    Hymn(Hymn),

    /// Initialize a new data root
    Init(Init),
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Read(command) => command.run(context)?,
            Self::Passage(command) => command.run(context)?,
            Self::Search(command) => command.run(context)?,
            Self::Daily(command) => command.run(context)?,
            Self::Compare(command) => command.run(context)?,
            Self::Books(command) => command.run(context)?,
            Self::Chapters(command) => command.run(context)?,
            Self::Verses(command) => command.run(context)?,
            Self::Query(command) => command.run(context)?,
            Self::Hymn(command) => command.run(context)?,
            Self::Init(command) => command.run(context.source().root())?,
        }
        Ok(())
    }
}

/// State shared by every command that reads data.
pub struct Context {
    registry: CorpusRegistry,
    language: String,
}

impl Context {
    fn new(root: PathBuf, language: Option<String>) -> Self {
        let source = DirectorySource::new(root);
        let language = language
            .unwrap_or_else(|| source.config().default_language().to_string())
            .to_lowercase();
        Self {
            registry: CorpusRegistry::new(source),
            language,
        }
    }

    fn source(&self) -> &DirectorySource {
        self.registry.source()
    }

    fn config(&self) -> &Config {
        self.source().config()
    }

    /// Loads the corpus of the selected language.
    fn corpus(&self) -> anyhow::Result<Arc<Corpus>> {
        let spinner = terminal::spinner(format!("Loading {} corpus", self.language));
        let corpus = self
            .registry
            .get(&self.language)
            .with_context(|| format!("Failed to load the '{}' corpus", self.language));
        spinner.finish_and_clear();
        corpus
    }

    fn hymnal(&self) -> HymnalStore {
        HymnalStore::new(
            self.source().clone(),
            self.config().hymnal_categories().clone(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// A failed lookup as reported in JSON output.
#[derive(Debug, Serialize)]
struct ErrorRecord {
    error: String,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders a lookup result, a failure becoming an `{error}` record.
fn json_record<T: Serialize>(result: &Result<T, lectern::Error>) -> serde_json::Result<String> {
    match result {
        Ok(value) => serde_json::to_string_pretty(value),
        Err(error) => serde_json::to_string_pretty(&ErrorRecord {
            error: error.to_string(),
        }),
    }
}

/// Prints the result of a lookup.
///
/// JSON output reports a failed lookup as a record on stdout. Pretty output
/// returns it as the command's error.
fn emit<T, F>(
    output: OutputFormat,
    result: Result<T, lectern::Error>,
    pretty: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match output {
        OutputFormat::Pretty => pretty(&result?),
        OutputFormat::Json => println!("{}", json_record(&result)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use lectern::Error;
    use serde_json::{Value, json};

    use super::*;

    fn parsed(rendered: &str) -> Value {
        serde_json::from_str(rendered).unwrap()
    }

    #[test]
    fn failed_lookup_is_an_error_record() {
        let result: Result<u32, Error> = Err(Error::BookNotFound("Tobit".to_string()));
        assert_eq!(
            parsed(&json_record(&result).unwrap()),
            json!({ "error": "Book not found: Tobit" })
        );
    }

    #[test]
    fn successful_lookup_is_the_value() {
        let result: Result<Vec<u32>, Error> = Ok(vec![1, 2]);
        assert_eq!(parsed(&json_record(&result).unwrap()), json!([1, 2]));
    }

    #[test]
    fn pretty_output_returns_the_failure() {
        let result: Result<u32, Error> = Err(Error::NoCategories);
        let error = emit(OutputFormat::Pretty, result, |_| {}).unwrap_err();
        assert_eq!(error.downcast_ref::<Error>(), Some(&Error::NoCategories));

        let result: Result<u32, Error> = Err(Error::NoCategories);
        assert!(emit(OutputFormat::Json, result, |_| {}).is_ok());
    }

    #[test]
    fn global_flags_are_parsed() {
        use clap::Parser;

        let cli =
            Cli::try_parse_from(["lectern", "-vv", "--lang", "fr", "read", "Genesis", "1:1"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.lang.as_deref(), Some("fr"));
        assert!(matches!(cli.command, Command::Read(_)));
    }
}

use chrono::NaiveDate;
use clap::Parser;
use lectern::domain::daily;
use tracing::instrument;

use super::{Context, OutputFormat, emit, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Daily {
    /// The date to pick a verse for, as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Daily {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let date = self
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let corpus = context.corpus()?;

        emit(self.output, daily::verse_of_day(&corpus, date), |verse| {
            println!("{}", date.format("%A %-d %B %Y").to_string().dim());
            println!("{}", verse.reference.info());
            println!("{}", super::terminal::wrap(&verse.text, 0));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fixtures;

    #[test]
    fn daily_run_accepts_an_explicit_date() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "en");

        let daily = Daily::try_parse_from(["daily", "--date", "2024-12-25"]).unwrap();
        assert_eq!(daily.date, NaiveDate::from_ymd_opt(2024, 12, 25));
        daily.run(&context).expect("daily command should succeed");
    }

    #[test]
    fn daily_run_defaults_to_today() {
        let root = fixtures::data_root();
        let context = fixtures::context(&root, "fr");

        Daily {
            date: None,
            output: OutputFormat::Json,
        }
        .run(&context)
        .expect("daily command should succeed");
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(Daily::try_parse_from(["daily", "--date", "25/12/2024"]).is_err());
    }
}

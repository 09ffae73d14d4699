use std::{fs, path::Path};

use clap::Parser;
use lectern::{
    Config,
    storage::{BIBLE_DIR, CONFIG_FILE, HYMNAL_DIR},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Init {}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(&self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!("Data root already initialized (found existing {CONFIG_FILE})");
        }

        for dir in [BIBLE_DIR, HYMNAL_DIR] {
            fs::create_dir_all(root.join(dir))
                .map_err(|e| anyhow::anyhow!("Failed to create {dir} directory: {e}"))?;
        }

        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!(
            "{}",
            format!("Initialized data root in {}", root.display()).success()
        );
        println!("  Created: {CONFIG_FILE}");
        println!("  Created: {BIBLE_DIR}/");
        println!("  Created: {HYMNAL_DIR}/");
        println!();
        println!("Next steps:");
        println!("  copy bible_<language>.json files into {BIBLE_DIR}/");
        println!("  copy <category>.json hymnal files into {HYMNAL_DIR}/");

        Ok(())
    }
}

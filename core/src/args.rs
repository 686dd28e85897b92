use std::path::PathBuf;

use clap::Parser;
use log::debug;
use ttable::{TableConfig, TableError};

#[derive(Parser, Debug)]
#[command(name = "ttstress")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drives a transposition table with synthetic search traffic")]
pub struct Args {
    /// Number of table entries (one extra address slot is added).
    #[arg(short, long)]
    pub entries: Option<usize>,

    /// Search generations to simulate.
    #[arg(short, long, default_value_t = 8)]
    pub generations: u32,

    /// Records probed and stored per generation.
    #[arg(short, long, default_value_t = 1_000_000)]
    pub inserts: usize,

    /// Deepest search depth attached to a record.
    #[arg(long, default_value_t = 32)]
    pub max_depth: u8,

    /// Number of distinct positions. Smaller values produce more transpositions.
    #[arg(long, default_value_t = 1 << 21)]
    pub key_space: usize,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Clear the table between generations instead of aging it.
    #[arg(long)]
    pub clear: bool,

    /// Table option as NAME=VALUE. May be repeated.
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Write the log to a file instead of the terminal.
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Builds the table configuration: defaults, then `--option`, then dedicated flags.
    pub fn table_config(&self) -> Result<TableConfig, TableError> {
        let mut config = TableConfig::default();

        for option in &self.options {
            let (name, value) =
                option
                    .split_once('=')
                    .ok_or_else(|| TableError::InvalidOption {
                        name: option.clone(),
                        reason: "expected NAME=VALUE".to_string(),
                    })?;
            config.update(name, value)?;
            debug!("Set option '{}' to '{}'", name.trim(), value.trim());
        }

        if let Some(entries) = self.entries {
            config.update("Hash Entries", &entries.to_string())?;
        }
        if self.clear {
            config.clear_between_searches.value = true;
        }

        for line in config.describe() {
            debug!("{}", line);
        }

        Ok(config)
    }
}

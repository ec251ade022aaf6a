//! Command-line argument parsing for the SQL sandbox.

use clap::Parser;
use sql_sandbox::config::Config;
use sql_sandbox::render::OutputFormat;
use std::path::PathBuf;

/// An in-memory SQL sandbox with sample data.
#[derive(Parser, Debug)]
#[command(name = "sql-sandbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "SQL_SANDBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Statement to run; repeat to run several in order
    #[arg(short = 'e', long = "execute", value_name = "SQL")]
    pub execute: Vec<String>,

    /// Script file to run (use "-" for stdin)
    #[arg(long, value_name = "PATH", conflicts_with = "execute")]
    pub script: Option<String>,

    /// Output format (overrides config)
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Start without the sample tables
    #[arg(long)]
    pub empty: bool,

    /// SQL file run after the sample data (overrides config)
    #[arg(long, value_name = "PATH")]
    pub seed: Option<PathBuf>,

    /// Table in front at start-up (overrides config)
    #[arg(long, value_name = "TABLE")]
    pub default_table: Option<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns true when input comes from the terminal rather than flags.
    pub fn is_interactive(&self) -> bool {
        self.execute.is_empty() && self.script.is_none()
    }

    /// Layers the flags over the file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if self.empty {
            config.store.sample_data = false;
        }
        if let Some(seed) = &self.seed {
            config.store.seed_file = Some(seed.clone());
        }
        if let Some(table) = &self.default_table {
            config.view.default_table = table.clone();
        }
        if let Some(format) = self.format {
            config.view.format = format;
        }
    }
}

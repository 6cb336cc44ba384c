//! CLI definitions for xstatus.
//!
//! Uses clap for argument parsing with derive macros.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// xstatus - decode status payloads into typed statuses
#[derive(Parser, Debug)]
#[command(name = "xstatus")]
#[command(version)]
#[command(about = "Decode status JSON payloads into typed statuses")]
#[command(long_about = r#"
xstatus reads status payloads as served by the timeline and search
endpoints and prints the decoded statuses.

Input shapes:
  - a timeline array:   [{...}, {...}]
  - a search envelope:  {"results": [{...}]}   (use --search)

Quick start:
  xstatus parse timeline.json
  xstatus mentions --format json timeline.json
  cat results.json | xstatus display --search -
"#)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Be verbose (show debug info)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Be quiet (suppress non-error output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Keep the case of @mentioned screen names
    #[arg(long, global = true)]
    pub case_sensitive: bool,

    /// Read configuration from this file instead of the user config
    #[arg(long, env = "XSTATUS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a payload and print every status
    Parse(InputArgs),

    /// List the screen names mentioned by each status
    Mentions(InputArgs),

    /// Print each status with its short links expanded
    Display(InputArgs),

    /// Show or manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Payload file, or `-` for stdin
    pub input: PathBuf,

    /// Treat the input as a search envelope instead of a timeline
    #[arg(long, short = 's')]
    pub search: bool,
}

impl InputArgs {
    /// Whether the payload is read from stdin.
    #[must_use]
    pub fn is_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Write a default config file if none exists
    #[arg(long)]
    pub init: bool,

    /// Set a configuration value (key=value)
    #[arg(long)]
    pub set: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

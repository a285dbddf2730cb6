//! CLI parse: clap types for pagesmith. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pagesmith CLI - generate a small business website from a company name and a topic
#[derive(Parser)]
#[command(name = "pagesmith")]
#[command(about = "Generate website copy and imagery as a single layout document")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Research, write and illustrate a site, then write content/data.json
    Generate {
        /// Company name (prompted for when omitted)
        company: Option<String>,
        /// Topic the site is about (prompted for when omitted)
        topic: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show token usage totals per stage
    Usage {
        /// Only count rows for this company
        #[arg(long)]
        company: Option<String>,
    },
    /// Show the resolved configuration with credentials masked
    Config,
}

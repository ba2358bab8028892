//! CLI argument definitions using clap
//!
//! Commands:
//! - formcheck check [--language <tag>]
//! - formcheck batch [--language <tag>]
//! - formcheck catalog [--language <tag>]
//! - formcheck languages

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formcheck - declarative validation of form records
#[derive(Parser, Debug)]
#[command(name = "formcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one request read from stdin
    Check {
        /// Message language when the request names none
        #[arg(long)]
        language: Option<String>,
    },

    /// Validate one request per stdin line
    Batch {
        /// Message language when a request names none
        #[arg(long)]
        language: Option<String>,
    },

    /// Print the built-in messages for a language
    Catalog {
        #[arg(long)]
        language: Option<String>,
    },

    /// List supported languages
    Languages,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

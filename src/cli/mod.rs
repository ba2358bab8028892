//! CLI module for formcheck
//!
//! Provides command-line interface for:
//! - check: validate one request from stdin
//! - batch: validate one request per stdin line
//! - catalog: print built-in messages
//! - languages: list built-in languages

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    batch, batch_from, catalog, check, handle_request, languages, run, run_command, BatchSummary,
    CheckRequest,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests_from, write_error, write_response};

//! formcheck CLI entry point
//!
//! Parses nothing and configures nothing itself; everything is delegated
//! to `cli::run`. Errors go to stderr with a non-zero exit.

use formcheck::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

//! CLI command implementations
//!
//! A request is one JSON object:
//!
//! ```json
//! {
//!   "schema":   { "email": { "required": true, "regexp": "^[^@]+@[^@]+$" } },
//!   "data":     { "email": "ana@example.com" },
//!   "language": "pt"
//! }
//! ```
//!
//! `catalog` (error code to message) may replace `language`.

use std::collections::BTreeMap;
use std::io::{self, BufRead};

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::config::Config;
use crate::messages::{Catalog, Language, MessageSource};
use crate::observability;
use crate::schema::{record_from_json, SchemaLoader};
use crate::validator::{validate, ValidationResult};

use super::args::{Cli, Command};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_request, read_requests_from, write_error, write_response};

/// One validation request
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckRequest {
    pub schema: Map<String, Value>,

    #[serde(default)]
    pub data: Map<String, Value>,

    /// Built-in language tag
    #[serde(default)]
    pub language: Option<String>,

    /// Full caller catalog keyed by error code
    #[serde(default)]
    pub catalog: Option<BTreeMap<String, String>>,
}

impl CheckRequest {
    fn message_source(&self, fallback: Language) -> CliResult<MessageSource> {
        match (&self.language, &self.catalog) {
            (Some(_), Some(_)) => Err(CliError::bad_request(
                "Request may name a language or a catalog, not both",
            )),
            (Some(tag), None) => Ok(MessageSource::from_tag(tag)?),
            (None, Some(entries)) => Ok(Catalog::from_names(entries.clone())?.into()),
            (None, None) => Ok(fallback.into()),
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments, loads configuration, installs logging and dispatches
/// to the command on a single-threaded runtime.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load_or_default(cli.config.as_deref())?;
    observability::init(config.log_format, &config.log_level);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_command(cli.command, &config))
}

/// Run the appropriate command based on CLI args
pub async fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Check { language } => check(select_language(language, config)?).await,
        Command::Batch { language } => batch(select_language(language, config)?).await,
        Command::Catalog { language } => catalog(select_language(language, config)?),
        Command::Languages => languages(),
    }
}

/// `--language` wins over the configured language.
fn select_language(flag: Option<String>, config: &Config) -> CliResult<Language> {
    match flag {
        Some(tag) => Ok(tag.parse::<Language>()?),
        None => config.language(),
    }
}

/// Validates one request. Validation failures are part of the result;
/// an `Err` means the request itself is broken.
pub async fn handle_request(request: Value, fallback: Language) -> CliResult<ValidationResult> {
    let request: CheckRequest = serde_json::from_value(request)?;
    let messages = request.message_source(fallback)?;
    let schema = SchemaLoader::from_map(&request.schema)?;
    let data = record_from_json(&Value::Object(request.data))?;

    Ok(validate(&schema, &data, &messages).await?)
}

/// Validate a single request from stdin
pub async fn check(language: Language) -> CliResult<()> {
    let request = read_request()?;

    match handle_request(request, language).await {
        Ok(result) => write_response(serde_json::to_value(result)?),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Counts reported at the end of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Validate one request per stdin line
pub async fn batch(language: Language) -> CliResult<()> {
    batch_from(io::stdin().lock(), language).await.map(|_| ())
}

/// Validate one request per line of `reader`
///
/// A broken request produces an error line and the loop continues; only a
/// failing read or write stops it.
pub async fn batch_from<R: BufRead>(reader: R, language: Language) -> CliResult<BatchSummary> {
    let mut summary = BatchSummary::default();

    for request in read_requests_from(reader) {
        let outcome = match request {
            Ok(request) => handle_request(request, language).await,
            Err(e) if e.code() == &CliErrorCode::IoError => return Err(e),
            Err(e) => Err(e),
        };
        summary.processed += 1;

        match outcome {
            Ok(result) => write_response(serde_json::to_value(result)?)?,
            Err(e) => {
                summary.failed += 1;
                warn!(line = summary.processed, code = e.code_str(), "request failed");
                write_error(e.code_str(), e.message())?;
            }
        }
    }

    info!(
        processed = summary.processed,
        failed = summary.failed,
        "batch finished"
    );
    Ok(summary)
}

/// Print the built-in catalog for a language
pub fn catalog(language: Language) -> CliResult<()> {
    write_response(catalog_json(language))
}

/// List supported languages
pub fn languages() -> CliResult<()> {
    write_response(languages_json())
}

fn catalog_json(language: Language) -> Value {
    let messages: Map<String, Value> = Catalog::builtin(language)
        .iter()
        .map(|(code, message)| (code.as_str().to_string(), json!(message)))
        .collect();

    json!({
        "language": language,
        "name": language.native_name(),
        "messages": messages
    })
}

fn languages_json() -> Value {
    Value::Array(
        Language::ALL
            .iter()
            .map(|language| json!({"tag": language, "name": language.native_name()}))
            .collect(),
    )
}

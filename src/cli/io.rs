//! JSON I/O handling for CLI
//!
//! - Input: JSON requests via stdin
//! - Output: one JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, BufRead, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read one JSON request from the whole of stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::bad_request("Empty input"));
    }

    let value: Value = serde_json::from_str(&input)?;
    Ok(value)
}

/// Read one JSON request per line of `reader`, skipping blank lines
///
/// A line that is not UTF-8 or not JSON is a bad request; only a failing
/// read is an I/O error.
pub fn read_requests_from<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Value>> {
    reader.split(b'\n').filter_map(|line| {
        let bytes = match line {
            Ok(bytes) => bytes,
            Err(e) => return Some(Err(CliError::from(e))),
        };
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => return Some(Err(CliError::bad_request(format!("Invalid UTF-8: {}", e)))),
        };
        if line.trim().is_empty() {
            return None;
        }
        Some(serde_json::from_str(&line).map_err(CliError::from))
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    emit(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    emit(&json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn emit(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use std::io::Cursor;

    #[test]
    fn test_invalid_utf8_line_is_bad_request() {
        let input = b"{\"a\": 1}\n\xff\xfe\n\n{\"b\": 2}\n".to_vec();
        let results: Vec<_> = read_requests_from(Cursor::new(input)).collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &json!({"a": 1}));
        assert_eq!(results[1].as_ref().unwrap_err().code(), &CliErrorCode::BadRequest);
        assert_eq!(results[2].as_ref().unwrap(), &json!({"b": 2}));
    }

    #[test]
    fn test_invalid_json_line_is_bad_request() {
        let input = b"not json\r\n{}".to_vec();
        let results: Vec<_> = read_requests_from(Cursor::new(input)).collect();

        assert_eq!(results[0].as_ref().unwrap_err().code(), &CliErrorCode::BadRequest);
        assert_eq!(results[1].as_ref().unwrap(), &json!({}));
    }
}

use serde_json::Value;
use std::io::{self, Read};

use super::parse_document;

/// Read a piped enquiry from stdin. JSON first, then YAML.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match parse_document(trimmed, false) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => parse_document(trimmed, true)
            .map(Some)
            .map_err(|_| format!("stdin is neither JSON nor YAML: {json_err}").into()),
    }
}

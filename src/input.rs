//! Reading JSON documents for the command-line front ends

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::{BufReader, Read};

/// Read every JSON document from `reader`.
///
/// A top-level array yields its elements, a single value yields itself, and
/// with `ndjson` (or when whole-input parsing fails) each non-empty line is
/// parsed on its own.
pub fn read_documents<R: Read>(reader: R, ndjson: bool) -> Result<Vec<Value>> {
    let mut content = Vec::new();
    BufReader::new(reader)
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if !ndjson {
        // SIMD parsing mutates its buffer, so keep the original for the fallback.
        // Deserializing straight into serde_json keeps object keys in document order.
        let mut scratch = content.clone();
        match simd_json::serde::from_slice::<Value>(&mut scratch) {
            Ok(Value::Array(arr)) => return Ok(arr),
            Ok(value) => return Ok(vec![value]),
            Err(_) => {}
        }
    }

    let text = String::from_utf8_lossy(&content);
    let mut documents = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", number + 1))?;
        documents.push(value);
    }
    Ok(documents)
}

/// Documents must be JSON objects to be flattened as records
pub fn expect_object(value: &Value) -> Result<&serde_json::Map<String, Value>> {
    match value {
        Value::Object(obj) => Ok(obj),
        other => bail!("expected a JSON object, got {}", kind_of(other)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

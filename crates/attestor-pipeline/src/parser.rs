//! Parse oracle replies into partial records
//!
//! The oracle is not a trusted structured-data source. Replies routinely
//! arrive wrapped in markdown code fences, preceded by commentary, or with
//! fields missing. The reply is never evaluated as code: the only path from
//! text to data is a strict JSON parse followed by field-by-field coercion.

use crate::error::ParseError;
use attestor_domain::{ExceptionEntry, PartialRecord, StatusCounts};
use serde_json::Value;

/// Parse one oracle reply into a `PartialRecord`.
///
/// Handling order: strip any leading/trailing code-fence markers, discard
/// everything before the first `{`, parse the remainder as JSON, then
/// coerce fields. A missing field defaults (empty string, empty list, zero
/// count); a field present with the wrong shape is an error.
pub fn parse_oracle_response(response: &str) -> Result<PartialRecord, ParseError> {
    let stripped = strip_code_fences(response);

    // Oracles routinely prepend commentary before the object.
    let brace = stripped.find('{').ok_or(ParseError::MissingObject)?;
    let json: Value = serde_json::from_str(&stripped[brace..])?;

    coerce_record(&json)
}

/// Remove leading/trailing markdown code-fence markers.
///
/// The opening fence may carry a language tag; both markers may be absent
/// independently (a fenced block after prose keeps its prose but loses the
/// closing fence — the first-`{` scan deals with the prose).
pub(crate) fn strip_code_fences(response: &str) -> &str {
    let mut text = response.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

fn coerce_record(json: &Value) -> Result<PartialRecord, ParseError> {
    let obj = json.as_object().ok_or(ParseError::MissingObject)?;

    Ok(PartialRecord {
        auditor: string_field(obj, "Auditor")?,
        time_period: string_field(obj, "Time Period")?,
        scope: string_field(obj, "Scope")?,
        exceptions: exceptions_field(obj)?,
        tags: string_list_field(obj, "Tags")?,
        system_description: string_list_field(obj, "System Description")?,
        status_counts: status_counts_field(obj)?,
    })
}

type JsonObject = serde_json::Map<String, Value>;

fn string_field(obj: &JsonObject, field: &str) -> Result<String, ParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParseError::Field {
            field: field.to_string(),
            problem: "must be a string".to_string(),
        }),
    }
}

fn string_list_field(obj: &JsonObject, field: &str) -> Result<Vec<String>, ParseError> {
    let items = match obj.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ParseError::Field {
                field: field.to_string(),
                problem: "must be a list of strings".to_string(),
            })
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(ParseError::Field {
                field: field.to_string(),
                problem: "contains a non-string entry".to_string(),
            }),
        })
        .collect()
}

fn exceptions_field(obj: &JsonObject) -> Result<Vec<ExceptionEntry>, ParseError> {
    let items = match obj.get("Exceptions") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ParseError::Field {
                field: "Exceptions".to_string(),
                problem: "must be a list of objects".to_string(),
            })
        }
    };

    items
        .iter()
        .map(|item| {
            let entry = item.as_object().ok_or_else(|| ParseError::Field {
                field: "Exceptions".to_string(),
                problem: "contains a non-object entry".to_string(),
            })?;
            Ok(ExceptionEntry {
                control: string_field(entry, "Control")?,
                exception: string_field(entry, "Exception")?,
                response: string_field(entry, "Response")?,
            })
        })
        .collect()
}

fn status_counts_field(obj: &JsonObject) -> Result<StatusCounts, ParseError> {
    let counts = match obj.get("Status Counts") {
        None | Some(Value::Null) => return Ok(StatusCounts::default()),
        Some(Value::Object(counts)) => counts,
        Some(_) => {
            return Err(ParseError::Field {
                field: "Status Counts".to_string(),
                problem: "must be an object".to_string(),
            })
        }
    };

    Ok(StatusCounts {
        passed: count_field(counts, "Passed")?,
        passed_with_exception: count_field(counts, "Passed with Exception")?,
        excluded: count_field(counts, "Excluded")?,
    })
}

fn count_field(obj: &JsonObject, field: &str) -> Result<u64, ParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value.as_u64().ok_or_else(|| ParseError::Field {
            field: field.to_string(),
            problem: "must be a non-negative integer".to_string(),
        }),
    }
}

//! Classification of RDAP response bodies.

use serde_json::Value;

use crate::error::{Result, ScoutError};
use crate::types::Outcome;

/// `errorCode` the registry uses for "object not found".
pub const NOT_FOUND_CODE: i64 = 404;

/// Outcome derived from one response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub outcome: Outcome,
    /// `errorCode` carried by the body, if any
    pub error_code: Option<i64>,
}

/// Classify a response body.
///
/// Only the body decides: `errorCode == 404` is `Available`, any other JSON
/// (a registration record, another error object, an array) is `Taken`.
/// A body that is not JSON is a parse error.
pub fn classify_body(body: &str) -> Result<Classification> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        ScoutError::parse(format!("RDAP body is not JSON: {}", e), Some(body.to_string()))
    })?;

    let error_code = value.get("errorCode").and_then(error_code_of);
    let outcome = if error_code == Some(NOT_FOUND_CODE) {
        Outcome::Available
    } else {
        Outcome::Taken
    };

    if let Some(code) = error_code.filter(|c| *c != NOT_FOUND_CODE) {
        tracing::debug!(error_code = code, "RDAP error object counted as taken");
    }

    Ok(Classification { outcome, error_code })
}

fn error_code_of(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

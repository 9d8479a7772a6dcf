//! Show how a JSON value is coerced

use serde_json::Value as Json;

use super::CliError;
use crate::{ValueKind, of};

/// Result of a coerce operation
#[derive(Debug)]
pub struct CoerceResult {
    /// Value tag chosen by the dispatcher (`None` when left unchanged)
    pub kind: Option<ValueKind>,
    /// Rendered wire form
    pub rendered: Json,
}

/// Coerce one JSON value and render it back
pub fn execute_coerce(input: Option<&str>) -> Result<CoerceResult, CliError> {
    let json_str = input.ok_or(CliError::NoInput)?;
    let json_value: Json = serde_json::from_str(json_str)?;

    let coerced = of(json_value);
    Ok(CoerceResult {
        kind: coerced.kind(),
        rendered: coerced.render()?,
    })
}

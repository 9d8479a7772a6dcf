//! JSON text output for rendered pipelines.
//!
//! Rendering produces `serde_json` values; this module turns them into text.
//! Object keys keep the order they were rendered in, so stage documents and
//! field maps print in the order they were built.
//!
//! # Examples
//!
//! ```
//! use mql_pipeline::output::{to_json, to_json_pretty};
//! use serde_json::json;
//!
//! let stage = json!({"$match": {"$eq": ["$status", "A"]}});
//!
//! assert_eq!(to_json(&stage), r#"{"$match":{"$eq":["$status","A"]}}"#);
//! assert!(to_json_pretty(&stage).starts_with("{\n  \"$match\""));
//! ```

use serde_json::Value as Json;

/// Compact JSON, no whitespace.
pub fn to_json(value: &Json) -> String {
    value.to_string()
}

/// Pretty JSON with 2-space indentation, one element or property per line.
pub fn to_json_pretty(value: &Json) -> String {
    format!("{:#}", value)
}

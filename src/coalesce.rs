//! Type-coalescing capabilities.
//!
//! Each `is_<kind>_or` method would produce an expression that keeps the
//! value when it has the named type and falls back to `other` otherwise.
//! Every method has a default body that fails with
//! [`MqlError::NotSupported`], so a value type can adopt them one at a time.
//! No value type provides any of them yet.

use crate::{error::MqlError, value::Value};

pub trait Coalesce {
    fn is_boolean_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_boolean_or"))
    }

    fn is_number_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_number_or"))
    }

    fn is_integer_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_integer_or"))
    }

    fn is_string_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_string_or"))
    }

    fn is_date_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_date_or"))
    }

    fn is_array_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_array_or"))
    }

    fn is_document_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_document_or"))
    }

    fn is_map_or(&self, _other: Value) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("is_map_or"))
    }

    /// String conversion expression (`$toString`).
    fn as_string(&self) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("as_string"))
    }

    /// Branching expression (`$switch`) over `(case, then)` pairs.
    fn switch_on(&self, _branches: Vec<(Value, Value)>) -> Result<Value, MqlError> {
        Err(MqlError::NotSupported("switch_on"))
    }
}

impl Coalesce for Value {}

//! Array expression operators: `$map`, `$reduce` and `$filter`.
//!
//! Inputs and bodies are coerced on construction. Inside the bodies the
//! current element is `"$$this"` and, for `$reduce`, the running value is
//! `"$$value"`.
use serde_json::{Map as JsonMap, Value as Json};

use crate::{
    coerce::{Coerced, Host, of},
    error::MqlError,
};

/// `$map`: applies `in` to every element of `input`.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    input: Coerced,
    transform: Coerced,
}

impl Map {
    pub fn new(input: impl Into<Host>, transform: impl Into<Host>) -> Self {
        Map {
            input: of(input),
            transform: of(transform),
        }
    }

    pub fn input(&self) -> &Coerced {
        &self.input
    }

    pub fn transform(&self) -> &Coerced {
        &self.transform
    }

    pub fn payload(&self) -> Result<Json, MqlError> {
        let mut doc = JsonMap::new();
        doc.insert("input".to_string(), self.input.render()?);
        doc.insert("in".to_string(), self.transform.render()?);
        Ok(Json::Object(doc))
    }
}

/// `$reduce`: folds `input` into a single value starting at `initialValue`.
///
/// Shares `input` and `in` with [`Map`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reduce {
    map: Map,
    initial_value: Coerced,
}

impl Reduce {
    pub fn new(
        input: impl Into<Host>,
        initial_value: impl Into<Host>,
        transform: impl Into<Host>,
    ) -> Self {
        Reduce {
            map: Map::new(input, transform),
            initial_value: of(initial_value),
        }
    }

    pub fn input(&self) -> &Coerced {
        self.map.input()
    }

    pub fn initial_value(&self) -> &Coerced {
        &self.initial_value
    }

    pub fn transform(&self) -> &Coerced {
        self.map.transform()
    }

    pub fn payload(&self) -> Result<Json, MqlError> {
        let mut doc = JsonMap::new();
        doc.insert("input".to_string(), self.map.input.render()?);
        doc.insert("initialValue".to_string(), self.initial_value.render()?);
        doc.insert("in".to_string(), self.map.transform.render()?);
        Ok(Json::Object(doc))
    }
}

/// `$filter`: keeps the elements of `input` for which `cond` holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    input: Coerced,
    cond: Coerced,
}

impl Filter {
    pub fn new(input: impl Into<Host>, cond: impl Into<Host>) -> Self {
        Filter {
            input: of(input),
            cond: of(cond),
        }
    }

    pub fn input(&self) -> &Coerced {
        &self.input
    }

    pub fn cond(&self) -> &Coerced {
        &self.cond
    }

    pub fn payload(&self) -> Result<Json, MqlError> {
        let mut doc = JsonMap::new();
        doc.insert("input".to_string(), self.input.render()?);
        doc.insert("cond".to_string(), self.cond.render()?);
        Ok(Json::Object(doc))
    }
}

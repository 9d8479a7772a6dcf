use serde_json::Value as Json;

use crate::{
    coerce::{Coerced, Host, of},
    error::MqlError,
};

/// `$match`: keeps documents satisfying a query expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    query: Coerced,
}

impl Match {
    pub fn new(query: impl Into<Host>) -> Self {
        Match { query: of(query) }
    }

    pub fn query(&self) -> &Coerced {
        &self.query
    }

    pub fn payload(&self) -> Result<Json, MqlError> {
        self.query.render()
    }
}

use serde_json::{Map as JsonMap, Value as Json};
use tracing::warn;

use crate::{error::MqlError, stage::Fields};

/// `$group`: groups documents by an id and computes accumulators.
///
/// The id is taken verbatim and never coerced, so `"$x"` or `{"x": "$x"}`
/// reach the wire exactly as supplied.
///
/// ```
/// use mql_pipeline::stage::{Fields, Group};
/// use serde_json::json;
///
/// let group = Group::new(json!({"x": "$x"}), Fields::new().with("y", json!({"$sum": "$y"})));
/// assert_eq!(
///     group.payload().unwrap(),
///     json!({"_id": {"x": "$x"}, "y": {"$sum": "$y"}})
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: Json,
    accumulators: Fields,
}

impl Group {
    /// An accumulator named `_id` would collide with the group id and is
    /// dropped here.
    pub fn new(id: impl Into<Json>, accumulators: impl Into<Fields>) -> Self {
        let mut accumulators = accumulators.into();
        if accumulators.remove("_id") {
            warn!("group accumulator named _id ignored; the group id is set separately");
        }
        Group {
            id: id.into(),
            accumulators,
        }
    }

    pub fn id(&self) -> &Json {
        &self.id
    }

    pub fn accumulators(&self) -> &Fields {
        &self.accumulators
    }

    pub fn payload(&self) -> Result<Json, MqlError> {
        let mut doc = JsonMap::new();
        doc.insert("_id".to_string(), self.id.clone());

        doc.extend(self.accumulators.render()?);
        Ok(Json::Object(doc))
    }
}

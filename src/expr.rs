//! Expression nodes: an operator applied to an ordered list of operands.
//!
//! Expressions are built through the comparison and arithmetic builders on
//! [`Value`](crate::Value) rather than constructed by hand:
//!
//! ```
//! use mql_pipeline::Value;
//!
//! let even = Value::variable("this").modulo(2).equals(0);
//! assert_eq!(
//!     even.render().unwrap(),
//!     serde_json::json!({"$eq": [{"$mod": ["$$this", 2]}, 0]})
//! );
//! ```
pub mod operators;

pub use operators::Operator;

use serde_json::{Map as JsonMap, Value as Json};

use crate::{coerce::Coerced, error::MqlError};

/// An operator document in the making: `{ <symbol>: [operand, ...] }`.
///
/// Operand order is exactly the order the operands were supplied in.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    operator: Operator,
    operands: Vec<Coerced>,
}

impl Expression {
    pub fn new(operator: Operator, operands: Vec<Coerced>) -> Self {
        Expression { operator, operands }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &[Coerced] {
        &self.operands
    }

    /// Renders the operator document, rendering every operand in order.
    pub fn render(&self) -> Result<Json, MqlError> {
        let operands = self
            .operands
            .iter()
            .map(Coerced::render)
            .collect::<Result<Vec<_>, _>>()?;

        let mut doc = JsonMap::new();
        doc.insert(self.operator.symbol().to_string(), Json::Array(operands));
        Ok(Json::Object(doc))
    }
}

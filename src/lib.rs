pub mod coalesce;
pub mod coerce;
pub mod error;
pub mod expr;
pub mod output;
pub mod pipeline;
pub mod stage;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use coalesce::Coalesce;
pub use coerce::{Coerced, Host, of};
pub use error::MqlError;
pub use expr::{Expression, Operator};
pub use output::{to_json, to_json_pretty};
pub use pipeline::{Model, Pipeline, TypedPipeline};
pub use stage::{Stage, StageKeyword};
pub use value::{Array, Number, Value, ValueKind};

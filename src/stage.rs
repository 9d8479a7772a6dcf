//! Pipeline stage operators.
//!
//! Every stage binds one fixed keyword and renders to a single-key document
//! `{ <keyword>: <payload> }`:
//!
//! | Keyword      | Payload                                         |
//! |--------------|-------------------------------------------------|
//! | `$addFields` | field name → rendered value                     |
//! | `$project`   | field name → rendered value                     |
//! | `$match`     | rendered query expression                       |
//! | `$group`     | `_id` verbatim, then rendered accumulators      |
//! | `$map`       | `input`, `in`                                   |
//! | `$reduce`    | `input`, `initialValue`, `in`                   |
//! | `$filter`    | `input`, `cond`                                 |
//!
//! `$map`, `$reduce` and `$filter` are usually nested inside another stage
//! rather than appended to a pipeline; any stage converts into a
//! [`Host`](crate::Host) for that.
pub mod array;
pub mod fields;
pub mod group;
pub mod query;

pub use array::{Filter, Map, Reduce};
pub use fields::{AddFields, Fields, Project};
pub use group::Group;
pub use query::Match;

use serde_json::{Map as JsonMap, Value as Json};

use crate::error::MqlError;

/// Stage keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKeyword {
    AddFields,
    Project,
    Match,
    Group,
    Map,
    Reduce,
    Filter,
}

impl StageKeyword {
    pub fn symbol(self) -> &'static str {
        match self {
            StageKeyword::AddFields => "$addFields",
            StageKeyword::Project => "$project",
            StageKeyword::Match => "$match",
            StageKeyword::Group => "$group",
            StageKeyword::Map => "$map",
            StageKeyword::Reduce => "$reduce",
            StageKeyword::Filter => "$filter",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "$addFields" => Some(StageKeyword::AddFields),
            "$project" => Some(StageKeyword::Project),
            "$match" => Some(StageKeyword::Match),
            "$group" => Some(StageKeyword::Group),
            "$map" => Some(StageKeyword::Map),
            "$reduce" => Some(StageKeyword::Reduce),
            "$filter" => Some(StageKeyword::Filter),
            _ => None,
        }
    }
}

impl std::fmt::Display for StageKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Any stage operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    AddFields(AddFields),
    Project(Project),
    Match(Match),
    Group(Group),
    Map(Map),
    Reduce(Reduce),
    Filter(Filter),
}

impl Stage {
    pub fn keyword(&self) -> StageKeyword {
        match self {
            Stage::AddFields(_) => StageKeyword::AddFields,
            Stage::Project(_) => StageKeyword::Project,
            Stage::Match(_) => StageKeyword::Match,
            Stage::Group(_) => StageKeyword::Group,
            Stage::Map(_) => StageKeyword::Map,
            Stage::Reduce(_) => StageKeyword::Reduce,
            Stage::Filter(_) => StageKeyword::Filter,
        }
    }

    /// The rendered payload, without the keyword wrapper.
    pub fn payload(&self) -> Result<Json, MqlError> {
        match self {
            Stage::AddFields(stage) => stage.payload(),
            Stage::Project(stage) => stage.payload(),
            Stage::Match(stage) => stage.payload(),
            Stage::Group(stage) => stage.payload(),
            Stage::Map(stage) => stage.payload(),
            Stage::Reduce(stage) => stage.payload(),
            Stage::Filter(stage) => stage.payload(),
        }
    }

    /// Renders `{ <keyword>: <payload> }`.
    pub fn render(&self) -> Result<Json, MqlError> {
        let mut doc = JsonMap::new();
        doc.insert(self.keyword().symbol().to_string(), self.payload()?);
        Ok(Json::Object(doc))
    }
}

macro_rules! stage_conversions {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Stage {
                fn from(stage: $variant) -> Self {
                    Stage::$variant(stage)
                }
            }

            impl From<$variant> for crate::coerce::Host {
                fn from(stage: $variant) -> Self {
                    crate::coerce::Host::Stage(Box::new(Stage::$variant(stage)))
                }
            }
        )*
    };
}

stage_conversions!(AddFields, Project, Match, Group, Map, Reduce, Filter);

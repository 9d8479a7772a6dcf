//! The pipeline builder.
//!
//! Stages live in an arena and are chained by forward links from `head`.
//! Appending touches only the tail, and rendering walks the links, so both
//! are independent of anything but the stage being added or visited.
//!
//! ```
//! use mql_pipeline::{Pipeline, stage::Fields};
//! use serde_json::json;
//!
//! let pipeline = Pipeline::new()
//!     .add_fields(Fields::new().with("a", 1))
//!     .project(Fields::new());
//!
//! assert_eq!(
//!     pipeline.render().unwrap(),
//!     vec![json!({"$addFields": {"a": 1}}), json!({"$project": {}})]
//! );
//! ```

use serde_json::Value as Json;
use tracing::trace;

use crate::{
    coerce::Host,
    error::MqlError,
    output,
    stage::{AddFields, Fields, Group, Match, Project, Stage},
};

#[derive(Debug, Clone)]
struct Link {
    stage: Stage,
    next: Option<usize>,
}

/// An ordered, append-only chain of stages.
///
/// Not synchronized: callers sharing one builder across threads must
/// serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    arena: Vec<Link>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends any stage at the end of the chain.
    pub fn append(mut self, stage: impl Into<Stage>) -> Self {
        self.push(stage.into());
        self
    }

    pub fn add_fields(self, fields: impl Into<Fields>) -> Self {
        self.append(AddFields::new(fields))
    }

    pub fn project(self, fields: impl Into<Fields>) -> Self {
        self.append(Project::new(fields))
    }

    pub fn r#match(self, query: impl Into<Host>) -> Self {
        self.append(Match::new(query))
    }

    /// Appends a `$group` stage. `id` is passed through verbatim.
    pub fn group(self, id: impl Into<Json>, accumulators: impl Into<Fields>) -> Self {
        self.append(Group::new(id, accumulators))
    }

    fn push(&mut self, stage: Stage) {
        let index = self.arena.len();
        trace!(index, keyword = %stage.keyword(), "appending stage");
        self.arena.push(Link { stage, next: None });

        match self.tail {
            None => self.head = Some(index),
            Some(tail) => self.arena[tail].next = Some(index),
        }
        self.tail = Some(index);
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Stages in chain order.
    pub fn stages(&self) -> Stages<'_> {
        Stages {
            arena: &self.arena,
            cursor: self.head,
        }
    }

    /// Renders the full pipeline: one single-key document per stage, in
    /// append order. Rendering does not touch the builder and can be
    /// repeated.
    pub fn render(&self) -> Result<Vec<Json>, MqlError> {
        trace!(stages = self.len(), "rendering pipeline");
        self.stages().map(Stage::render).collect()
    }

    pub fn to_json(&self) -> Result<String, MqlError> {
        Ok(output::to_json(&Json::Array(self.render()?)))
    }

    pub fn to_json_pretty(&self) -> Result<String, MqlError> {
        Ok(output::to_json_pretty(&Json::Array(self.render()?)))
    }
}

/// Iterator over a pipeline's stages, following forward links from the head.
pub struct Stages<'a> {
    arena: &'a [Link],
    cursor: Option<usize>,
}

impl<'a> Iterator for Stages<'a> {
    type Item = &'a Stage;

    fn next(&mut self) -> Option<Self::Item> {
        let link = &self.arena[self.cursor?];
        self.cursor = link.next;
        Some(&link.stage)
    }
}

/// A document model whose fields can be referenced while building stages.
///
/// `placeholder` returns a concrete instance whose fields hold field-path
/// values rather than data:
///
/// ```
/// use mql_pipeline::{Model, TypedPipeline, Value};
/// use serde_json::json;
///
/// struct Order {
///     qty: Value,
///     price: Value,
/// }
///
/// impl Model for Order {
///     fn placeholder() -> Self {
///         Order {
///             qty: Value::field("qty"),
///             price: Value::field("price"),
///         }
///     }
/// }
///
/// let pipeline = TypedPipeline::<Order>::new()
///     .add_field("total", |o| o.qty.multiply(o.price.clone()));
///
/// assert_eq!(
///     pipeline.render().unwrap(),
///     vec![json!({"$addFields": {"total": {"$multiply": ["$qty", "$price"]}}})]
/// );
/// ```
pub trait Model {
    fn placeholder() -> Self;
}

/// A [`Pipeline`] whose stage callbacks receive a model placeholder.
pub struct TypedPipeline<M: Model> {
    pipeline: Pipeline,
    model: M,
}

impl<M: Model> Default for TypedPipeline<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> TypedPipeline<M> {
    pub fn new() -> Self {
        TypedPipeline {
            pipeline: Pipeline::new(),
            model: M::placeholder(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Appends `$addFields` with one field computed from the model.
    pub fn add_field<F, V>(mut self, name: &str, f: F) -> Self
    where
        F: FnOnce(&M) -> V,
        V: Into<Host>,
    {
        let value = f(&self.model);
        self.pipeline = self.pipeline.add_fields(Fields::new().with(name, value));
        self
    }

    /// Appends `$project` with one field computed from the model.
    pub fn project_field<F, V>(mut self, name: &str, f: F) -> Self
    where
        F: FnOnce(&M) -> V,
        V: Into<Host>,
    {
        let value = f(&self.model);
        self.pipeline = self.pipeline.project(Fields::new().with(name, value));
        self
    }

    /// Appends `$match` with a query built from the model.
    pub fn match_with<F, V>(mut self, f: F) -> Self
    where
        F: FnOnce(&M) -> V,
        V: Into<Host>,
    {
        let query = f(&self.model);
        self.pipeline = self.pipeline.r#match(query);
        self
    }

    /// Appends a stage built from the model.
    pub fn append_with<F, S>(mut self, f: F) -> Self
    where
        F: FnOnce(&M) -> S,
        S: Into<Stage>,
    {
        let stage = f(&self.model);
        self.pipeline = self.pipeline.append(stage);
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn into_inner(self) -> Pipeline {
        self.pipeline
    }

    pub fn render(&self) -> Result<Vec<Json>, MqlError> {
        self.pipeline.render()
    }
}

//! Rebuild a JSON pipeline through the typed stages

use serde_json::{Map as JsonMap, Value as Json};

use super::CliError;
use crate::{
    Host, Pipeline, StageKeyword,
    stage::{AddFields, Fields, Filter, Group, Map, Match, Project, Reduce, Stage},
};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// JSON array of stage documents
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Parse the input pipeline, rebuild it and return the normalized wire array.
pub fn execute_render(options: &RenderOptions) -> Result<Json, CliError> {
    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: Json = serde_json::from_str(json_str)?;

    let pipeline = pipeline_from_json(json_value)?;
    Ok(Json::Array(pipeline.render()?))
}

/// Build a [`Pipeline`] from `[{"$stage": payload}, ...]`.
///
/// Payload values go through the coercion dispatcher; a `$group` id is kept
/// verbatim.
pub fn pipeline_from_json(json: Json) -> Result<Pipeline, CliError> {
    let Json::Array(docs) = json else {
        return Err(CliError::InvalidStage("pipeline must be a JSON array".to_string()));
    };

    let mut pipeline = Pipeline::new();
    for doc in docs {
        pipeline = pipeline.append(stage_from_json(doc)?);
    }
    Ok(pipeline)
}

fn stage_from_json(doc: Json) -> Result<Stage, CliError> {
    let Json::Object(doc) = doc else {
        return Err(CliError::InvalidStage("stage must be a JSON object".to_string()));
    };
    if doc.len() != 1 {
        return Err(CliError::InvalidStage(format!(
            "stage must have exactly one key, found {}",
            doc.len()
        )));
    }
    let Some((symbol, payload)) = doc.into_iter().next() else {
        return Err(CliError::InvalidStage("empty stage document".to_string()));
    };
    let keyword =
        StageKeyword::from_symbol(&symbol).ok_or_else(|| CliError::UnknownStage(symbol.clone()))?;

    let stage: Stage = match keyword {
        StageKeyword::AddFields => AddFields::new(fields(payload_object(&symbol, payload)?)).into(),
        StageKeyword::Project => Project::new(fields(payload_object(&symbol, payload)?)).into(),
        StageKeyword::Match => Match::new(payload).into(),
        StageKeyword::Group => {
            let mut payload = payload_object(&symbol, payload)?;
            let id = payload.shift_remove("_id").unwrap_or(Json::Null);
            Group::new(id, fields(payload)).into()
        }
        StageKeyword::Map => {
            let mut payload = payload_object(&symbol, payload)?;
            Map::new(take(&mut payload, "input"), take(&mut payload, "in")).into()
        }
        StageKeyword::Reduce => {
            let mut payload = payload_object(&symbol, payload)?;
            Reduce::new(
                take(&mut payload, "input"),
                take(&mut payload, "initialValue"),
                take(&mut payload, "in"),
            )
            .into()
        }
        StageKeyword::Filter => {
            let mut payload = payload_object(&symbol, payload)?;
            Filter::new(take(&mut payload, "input"), take(&mut payload, "cond")).into()
        }
    };
    Ok(stage)
}

fn payload_object(symbol: &str, payload: Json) -> Result<JsonMap<String, Json>, CliError> {
    match payload {
        Json::Object(map) => Ok(map),
        _ => Err(CliError::InvalidStage(format!("{} payload must be an object", symbol))),
    }
}

fn fields(payload: JsonMap<String, Json>) -> Fields {
    payload.into_iter().collect()
}

/// A missing argument becomes null, which fails at render time.
fn take(payload: &mut JsonMap<String, Json>, key: &str) -> Host {
    payload.shift_remove(key).map_or(Host::Null, Host::from)
}

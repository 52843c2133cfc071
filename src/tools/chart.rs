//! `render_chart`: Chart.js config → image via `POST /chart`.

use super::{trimmed, DEFAULT_FORMAT};
use crate::client::RemoteCall;
use crate::schema::{JsonShape, ParamKind, ParamSpec, ValidatedParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PATH: &str = "/chart";
pub const FORMATS: &[&str] = &["png", "webp", "jpg", "jpeg", "svg", "pdf"];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::required("config", ParamKind::Json(JsonShape::Object)),
    ParamSpec::optional("width", ParamKind::PositiveInt),
    ParamSpec::optional("height", ParamKind::PositiveInt),
    ParamSpec::optional("format", ParamKind::Choice(FORMATS)),
    ParamSpec::optional("background", ParamKind::Text),
];

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ChartRequest {
    #[schemars(description = "Chart.js configuration as a JSON object or JSON string")]
    #[serde(alias = "chart", skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[schemars(description = "Image width in pixels (positive integer)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[schemars(description = "Image height in pixels (positive integer)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[schemars(description = "Output format: png (default), webp, jpg, jpeg, svg, pdf")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[schemars(description = "Background color (e.g. white, #ffffff, transparent)")]
    #[serde(alias = "background_color", skip_serializing_if = "Option::is_none")]
    pub background: Option<Value>,
}

pub fn build_call(params: &ValidatedParams) -> RemoteCall {
    let format = params.choice("format").unwrap_or(DEFAULT_FORMAT);
    let mut body = Map::new();
    if let Some(config) = params.json("config") {
        body.insert("chart".into(), config.clone());
    }
    if let Some(width) = params.int("width") {
        body.insert("width".into(), width.into());
    }
    if let Some(height) = params.int("height") {
        body.insert("height".into(), height.into());
    }
    if let Some(background) = trimmed(params, "background") {
        body.insert("backgroundColor".into(), background.into());
    }
    body.insert("format".into(), format.into());
    RemoteCall::post_json(PATH, Value::Object(body), format)
}

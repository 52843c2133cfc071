//! `render_wordcloud`: weighted words → word cloud via `POST /wordcloud`.

use super::DEFAULT_FORMAT;
use crate::client::RemoteCall;
use crate::schema::{JsonShape, ParamKind, ParamSpec, ValidatedParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PATH: &str = "/wordcloud";
pub const FORMATS: &[&str] = &["png", "svg", "jpg", "jpeg"];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::required("words", ParamKind::Json(JsonShape::ObjectOrArray)),
    ParamSpec::optional("width", ParamKind::PositiveInt),
    ParamSpec::optional("height", ParamKind::PositiveInt),
    ParamSpec::optional("format", ParamKind::Choice(FORMATS)),
];

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct WordCloudRequest {
    #[schemars(
        description = "Weighted words as JSON, e.g. {\"rust\": 10, \"mcp\": 4} or [[\"rust\", 10], [\"mcp\", 4]]"
    )]
    #[serde(alias = "weights", skip_serializing_if = "Option::is_none")]
    pub words: Option<Value>,
    #[schemars(description = "Image width in pixels (positive integer)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[schemars(description = "Image height in pixels (positive integer)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[schemars(description = "Output format: png (default), svg, jpg, jpeg")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
}

pub fn build_call(params: &ValidatedParams) -> RemoteCall {
    let format = params.choice("format").unwrap_or(DEFAULT_FORMAT);
    let mut body = Map::new();
    if let Some(words) = params.json("words") {
        body.insert("weights".into(), words.clone());
    }
    body.insert("format".into(), format.into());
    if let Some(width) = params.int("width") {
        body.insert("width".into(), width.into());
    }
    if let Some(height) = params.int("height") {
        body.insert("height".into(), height.into());
    }
    RemoteCall::post_json(PATH, Value::Object(body), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;
    use serde_json::json;

    #[test]
    fn words_string_is_parsed_into_weights() {
        let map = json!({"words": r#"{"rust": 10, "mcp": 4}"#, "width": 800});
        let params = validate(PARAMS, map.as_object().expect("object")).expect("valid");
        let call = build_call(&params);
        assert_eq!(call.path, "/wordcloud");
        assert_eq!(
            call.json_body(),
            Some(&json!({"weights": {"rust": 10, "mcp": 4}, "format": "png", "width": 800}))
        );
    }

    #[test]
    fn empty_word_list_is_rejected() {
        let map = json!({"words": "[]"});
        let err = validate(PARAMS, map.as_object().expect("object")).expect_err("invalid");
        assert_eq!(
            err.to_string(),
            "Validation error: words must be a non-empty JSON object or array."
        );
    }

    #[test]
    fn malformed_words_cite_parse_failure() {
        let map = json!({"words": "[\"rust\", 10"});
        let err = validate(PARAMS, map.as_object().expect("object")).expect_err("invalid");
        assert!(err.to_string().contains("Invalid words JSON"));
    }
}

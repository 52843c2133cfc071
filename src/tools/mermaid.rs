//! `render_mermaid`: Mermaid source → image via `POST /mermaid`.

use super::DEFAULT_FORMAT;
use crate::client::RemoteCall;
use crate::schema::{ParamKind, ParamSpec, ValidatedParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PATH: &str = "/mermaid";
pub const FORMATS: &[&str] = &["png", "svg"];
pub const THEMES: &[&str] = &["default", "neutral", "dark", "forest", "base"];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::required("mermaid", ParamKind::Text),
    ParamSpec::optional("theme", ParamKind::Choice(THEMES)),
    ParamSpec::optional("format", ParamKind::Choice(FORMATS)),
];

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct MermaidRequest {
    #[schemars(description = "Mermaid diagram definition, e.g. \"graph TD; A-->B\"")]
    #[serde(alias = "diagram", skip_serializing_if = "Option::is_none")]
    pub mermaid: Option<Value>,
    #[schemars(description = "Theme: default, neutral, dark, forest, base")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Value>,
    #[schemars(description = "Output format: png (default) or svg")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
}

pub fn build_call(params: &ValidatedParams) -> RemoteCall {
    let format = params.choice("format").unwrap_or(DEFAULT_FORMAT);
    let mut body = Map::new();
    if let Some(source) = params.text("mermaid") {
        body.insert("chart".into(), source.into());
    }
    if let Some(theme) = params.choice("theme") {
        body.insert("theme".into(), theme.into());
    }
    body.insert("format".into(), format.into());
    RemoteCall::post_json(PATH, Value::Object(body), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;
    use serde_json::json;

    #[test]
    fn source_goes_in_chart_field() {
        let map = json!({"mermaid": "graph TD; A-->B", "theme": "Dark"});
        let params = validate(PARAMS, map.as_object().expect("object")).expect("valid");
        let call = build_call(&params);
        assert_eq!(call.path, "/mermaid");
        assert_eq!(
            call.json_body(),
            Some(&json!({"chart": "graph TD; A-->B", "theme": "dark", "format": "png"}))
        );
    }

    #[test]
    fn pdf_is_not_a_mermaid_format() {
        let map = json!({"mermaid": "graph TD; A-->B", "format": "pdf"});
        assert!(validate(PARAMS, map.as_object().expect("object")).is_err());
    }
}

//! `render_graphviz`: DOT source → image via `POST /graphviz`.

use super::DEFAULT_FORMAT;
use crate::client::RemoteCall;
use crate::schema::{ParamKind, ParamSpec, ValidatedParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PATH: &str = "/graphviz";
pub const FORMATS: &[&str] = &["png", "svg", "jpg", "jpeg"];
pub const LAYOUTS: &[&str] = &[
    "dot",
    "neato",
    "fdp",
    "sfdp",
    "circo",
    "twopi",
    "osage",
    "patchwork",
];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::required("graph", ParamKind::Text),
    ParamSpec::optional("layout", ParamKind::Choice(LAYOUTS)),
    ParamSpec::optional("format", ParamKind::Choice(FORMATS)),
];

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct GraphvizRequest {
    #[schemars(description = "Graphviz DOT source, e.g. \"digraph { a -> b }\"")]
    #[serde(alias = "dot", skip_serializing_if = "Option::is_none")]
    pub graph: Option<Value>,
    #[schemars(
        description = "Layout engine: dot, neato, fdp, sfdp, circo, twopi, osage, patchwork"
    )]
    #[serde(alias = "engine", skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
    #[schemars(description = "Output format: png (default), svg, jpg, jpeg")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
}

pub fn build_call(params: &ValidatedParams) -> RemoteCall {
    let format = params.choice("format").unwrap_or(DEFAULT_FORMAT);
    let mut body = Map::new();
    if let Some(graph) = params.text("graph") {
        body.insert("graph".into(), graph.into());
    }
    if let Some(layout) = params.choice("layout") {
        body.insert("layout".into(), layout.into());
    }
    body.insert("format".into(), format.into());
    RemoteCall::post_json(PATH, Value::Object(body), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::schema::validate;
    use serde_json::json;

    #[test]
    fn graph_text_is_sent_verbatim() {
        let source = "digraph G {\n  a -> b;\n}\n";
        let map = json!({"graph": source, "layout": "NEATO", "format": "svg"});
        let params = validate(PARAMS, map.as_object().expect("object")).expect("valid");
        let call = build_call(&params);
        assert_eq!(call.path, "/graphviz");
        assert_eq!(
            call.json_body(),
            Some(&json!({"graph": source, "layout": "neato", "format": "svg"}))
        );
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let map = json!({"graph": "graph { a }", "layout": "spring"});
        let err = validate(PARAMS, map.as_object().expect("object")).expect_err("invalid");
        assert!(matches!(err, ToolError::Validation(ref m) if m.starts_with("layout must be one of")));
    }
}

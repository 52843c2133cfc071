//! `render_qrcode`: text → QR code via `GET /qr`.

use super::{trimmed, DEFAULT_FORMAT};
use crate::client::RemoteCall;
use crate::schema::{ParamKind, ParamSpec, ValidatedParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PATH: &str = "/qr";
pub const FORMATS: &[&str] = &["png", "svg"];
/// Error correction levels, low to high.
pub const CORRECTION_LEVELS: &[&str] = &["L", "M", "Q", "H"];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::required("text", ParamKind::Text),
    ParamSpec::optional("size", ParamKind::PositiveInt),
    ParamSpec::optional("correction", ParamKind::Choice(CORRECTION_LEVELS)),
    ParamSpec::optional("format", ParamKind::Choice(FORMATS)),
];

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct QrCodeRequest {
    #[schemars(description = "Text or URL to encode")]
    #[serde(alias = "data", skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[schemars(description = "Image size in pixels (positive integer)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Value>,
    #[schemars(description = "Error correction level: L, M, Q or H")]
    #[serde(alias = "ec_level", alias = "ecLevel", skip_serializing_if = "Option::is_none")]
    pub correction: Option<Value>,
    #[schemars(description = "Output format: png (default) or svg")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
}

pub fn build_call(params: &ValidatedParams) -> RemoteCall {
    let format = params.choice("format").unwrap_or(DEFAULT_FORMAT);
    let mut query = Vec::with_capacity(4);
    if let Some(text) = trimmed(params, "text") {
        query.push(("text", text.to_string()));
    }
    if let Some(size) = params.int("size") {
        query.push(("size", size.to_string()));
    }
    if let Some(level) = params.choice("correction") {
        query.push(("ecLevel", level.to_string()));
    }
    query.push(("format", format.to_string()));
    RemoteCall::get_query(PATH, query, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn builds_query_with_uppercase_level() {
        let map = json!({"text": "  https://example.com  ", "size": "300", "correction": "h"});
        let params = validate(PARAMS, map.as_object().expect("object")).expect("valid");
        let call = build_call(&params);
        assert_eq!(call.method, Method::GET);
        assert_eq!(call.path, "/qr");
        assert_eq!(call.query_param("text"), Some("https://example.com"));
        assert_eq!(call.query_param("size"), Some("300"));
        assert_eq!(call.query_param("ecLevel"), Some("H"));
        assert_eq!(call.query_param("format"), Some("png"));
    }

    #[test]
    fn omits_unset_size_and_level() {
        let map = json!({"text": "hi"});
        let params = validate(PARAMS, map.as_object().expect("object")).expect("valid");
        let call = build_call(&params);
        assert_eq!(call.query_param("size"), None);
        assert_eq!(call.query_param("ecLevel"), None);
    }

    #[test]
    fn non_numeric_size_is_rejected() {
        let map = json!({"text": "hi", "size": "big"});
        let err = validate(PARAMS, map.as_object().expect("object")).expect_err("invalid");
        assert_eq!(err.to_string(), "Validation error: size must be an integer.");
    }
}

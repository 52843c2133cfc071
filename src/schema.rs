//! Per-tool parameter schemas.
//!
//! Each tool declares an ordered list of [`ParamSpec`]s. [`validate`] walks
//! that list before any network call and either returns typed values or the
//! first [`ToolError::Validation`] it hits.
//!
//! Hosts are loose about types, so inputs are accepted as JSON strings or
//! numbers, and JSON-shaped params may also arrive already structured.
//! `null` and blank strings mean "not provided".

use crate::error::ToolError;
use serde_json::{Map, Value};

/// Shape a JSON parameter must decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    ObjectOrArray,
}

impl JsonShape {
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Object(map)) => !map.is_empty(),
            (Self::ObjectOrArray, Value::Array(items)) => !items.is_empty(),
            _ => false,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            Self::Object => "a non-empty JSON object",
            Self::ObjectOrArray => "a non-empty JSON object or array",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Free text, passed through untouched.
    Text,
    /// JSON document, given as a string or as structured JSON.
    Json(JsonShape),
    /// Integer greater than zero.
    PositiveInt,
    /// One of a fixed set of values, matched case-insensitively.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Json(Value),
    Int(u32),
    Choice(&'static str),
}

/// Parameters that passed validation, in schema order. Unset optionals are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedParams {
    values: Vec<(&'static str, ParamValue)>,
}

impl ValidatedParams {
    fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn json(&self, name: &str) -> Option<&Value> {
        match self.get(name) {
            Some(ParamValue::Json(v)) => Some(v),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<u32> {
        match self.get(name) {
            Some(ParamValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn choice(&self, name: &str) -> Option<&'static str> {
        match self.get(name) {
            Some(ParamValue::Choice(c)) => Some(c),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check `params` against `specs` in order.
///
/// Names not present in `specs` are ignored.
pub fn validate(
    specs: &[ParamSpec],
    params: &Map<String, Value>,
) -> Result<ValidatedParams, ToolError> {
    let mut values = Vec::with_capacity(specs.len());
    for spec in specs {
        let raw = params.get(spec.name).filter(|v| !is_unset(v));
        let Some(raw) = raw else {
            if spec.required {
                return Err(ToolError::validation(format!("{} is required.", spec.name)));
            }
            continue;
        };
        values.push((spec.name, coerce(spec, raw)?));
    }
    Ok(ValidatedParams { values })
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce(spec: &ParamSpec, raw: &Value) -> Result<ParamValue, ToolError> {
    match spec.kind {
        ParamKind::Text => match raw {
            Value::String(s) => Ok(ParamValue::Text(s.clone())),
            Value::Number(n) => Ok(ParamValue::Text(n.to_string())),
            Value::Bool(b) => Ok(ParamValue::Text(b.to_string())),
            _ => Err(ToolError::validation(format!(
                "{} must be a string.",
                spec.name
            ))),
        },
        ParamKind::Json(shape) => {
            let parsed = match raw {
                Value::String(s) => serde_json::from_str::<Value>(s).map_err(|e| {
                    ToolError::validation(format!("Invalid {} JSON ({e}).", spec.name))
                })?,
                other => other.clone(),
            };
            if shape.accepts(&parsed) {
                Ok(ParamValue::Json(parsed))
            } else {
                Err(ToolError::validation(format!(
                    "{} must be {}.",
                    spec.name,
                    shape.expected()
                )))
            }
        }
        ParamKind::PositiveInt => parse_positive_int(spec.name, raw).map(ParamValue::Int),
        ParamKind::Choice(options) => {
            let given = match raw {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            };
            options
                .iter()
                .copied()
                .find(|opt| opt.eq_ignore_ascii_case(&given))
                .map(ParamValue::Choice)
                .ok_or_else(|| {
                    ToolError::validation(format!(
                        "{} must be one of: {}.",
                        spec.name,
                        options.join(", ")
                    ))
                })
        }
    }
}

fn parse_positive_int(name: &str, raw: &Value) -> Result<u32, ToolError> {
    let not_integer = || ToolError::validation(format!("{name} must be an integer."));
    let parsed: i64 = match raw {
        Value::Number(n) => match n.as_i64() {
            Some(v) => v,
            // Accept whole floats like 400.0, reject 400.5.
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
                _ => return Err(not_integer()),
            },
        },
        Value::String(s) => s.trim().parse().map_err(|_| not_integer())?,
        _ => return Err(not_integer()),
    };
    if parsed <= 0 {
        return Err(ToolError::validation(format!("{name} must be positive.")));
    }
    u32::try_from(parsed).map_err(|_| ToolError::validation(format!("{name} is too large.")))
}

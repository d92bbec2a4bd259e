use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a job submission answer. `jobId` may arrive as a number or a string.
#[derive(Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "jobId")]
    pub job_id: Option<Value>,
}

/// Body of `GetAppResults`.
#[derive(Deserialize)]
pub struct AppResultsResponse {
    #[serde(rename = "Status")]
    pub status: JobStatusBlock,

    #[serde(rename = "ResultProps", default)]
    pub result_props: Option<Vec<Value>>,
}

#[derive(Deserialize)]
pub struct JobStatusBlock {
    #[serde(rename = "Status", default)]
    pub status: Option<Value>,

    #[serde(rename = "CompletedSuccesfully", default)]
    pub completed_successfully: Option<bool>,
}

impl JobStatusBlock {
    /// The status label, numbers and other scalars are read as text.
    pub fn label(&self) -> Option<String> {
        self.status.as_ref().and_then(scalar_string)
    }
}

/// A single entry of `ResultProps`. Every field is optional, entries missing
/// one of them are skipped when the report is built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultProp {
    #[serde(rename = "Type", default)]
    pub kind: Option<Value>,

    #[serde(rename = "Value", default)]
    pub value: Option<Value>,

    #[serde(rename = "Name", default)]
    pub name: Option<Value>,
}

impl ResultProp {
    /// Non-object entries turn into an empty property.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn kind(&self) -> Option<String> {
        self.kind.as_ref().and_then(scalar_string)
    }

    pub fn value(&self) -> Option<String> {
        self.value.as_ref().and_then(scalar_string)
    }

    pub fn name(&self) -> Option<String> {
        self.name.as_ref().and_then(scalar_string)
    }
}

/// Standard envelope used when a report is requested by application code.
#[derive(Debug, Serialize)]
pub struct AppRequest<'de> {
    #[serde(rename = "AppCode")]
    pub app_code: &'de str,

    #[serde(rename = "Pars")]
    pub pars: Vec<AppParameter<'de>>,
}

#[derive(Debug, Serialize)]
pub struct AppParameter<'de> {
    #[serde(rename = "Name")]
    pub name: &'de str,

    #[serde(rename = "Value")]
    pub value: &'de str,
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Reads an integer out of a number or a numeric string. Fractions are
/// truncated toward zero.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

/// Like [`coerce_integer`] but refuses fractions, `"9.0"` is fine, `"9.7"` is not.
pub fn strict_integer(value: &Value) -> Option<i64> {
    let whole = |value: f64| if value.fract() == 0.0 { truncate(value) } else { None };
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

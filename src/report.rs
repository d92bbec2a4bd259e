use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    jobs::{JobId, RawJobResult},
    response::{strict_integer, ResultProp},
    urls::Endpoints,
};

pub const PLAIN_TEXT: &str = "plaintext";
pub const PDF: &str = "pdf";

/// What a finished job hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub succeeded: bool,
    pub results: Vec<ReportResult>,
}

impl Report {
    pub fn get(&self, name: &str) -> Option<&ResultValue> {
        self.results
            .iter()
            .find(|result| result.name == name)
            .map(|result| &result.value)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter_map(|result| match &result.value {
            ResultValue::File(file) => Some(file),
            ResultValue::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportResult {
    pub name: String,
    pub value: ResultValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Text(String),
    File(FileResult),
}

/// A report file that lives on the server. Nothing is downloaded until the
/// caller asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub name: String,
    pub extension: String,
    pub url: Url,
}

impl FileResult {
    pub fn new(job_id: JobId, extension: &str, url: Url) -> Self {
        Self {
            name: format!("report_{}.{}", job_id, extension),
            extension: extension.to_string(),
            url,
        }
    }
}

/// Builds a typed report out of a terminal poll result.
///
/// Properties missing `Type`, `Value` or `Name`, with an unknown type, or a
/// file reference that is not an integer are dropped. Results are kept even
/// when the job did not succeed.
pub fn transform(raw: &RawJobResult, endpoints: &Endpoints) -> Report {
    let results = raw
        .result_props
        .iter()
        .filter_map(|prop| transform_prop(raw.job_id, prop, endpoints))
        .collect::<Vec<_>>();

    debug!(
        "[Job {}] Built report with {} of {} result properties",
        raw.job_id,
        results.len(),
        raw.result_props.len()
    );

    Report {
        succeeded: raw.succeeded,
        results,
    }
}

fn transform_prop(job_id: JobId, prop: &ResultProp, endpoints: &Endpoints) -> Option<ReportResult> {
    let (kind, value, name) = match (prop.kind(), prop.value(), prop.name()) {
        (Some(kind), Some(value), Some(name)) => (kind.to_lowercase(), value, name),
        _ => {
            debug!("[Job {}] Skipping incomplete result property", job_id);
            return None
        }
    };

    let value = match kind.as_str() {
        PLAIN_TEXT => ResultValue::Text(value),
        PDF => {
            let file_id = strict_integer(&Value::String(value.clone()));
            let url = file_id.and_then(|id| endpoints.report_file(id).ok());
            match url {
                Some(url) => ResultValue::File(FileResult::new(job_id, &kind, url)),
                None => {
                    warn!("[Job {}] Result {} has an invalid file id {:?}", job_id, name, value);
                    return None
                }
            }
        }
        other => {
            debug!("[Job {}] Ignoring result {} of type {}", job_id, name, other);
            return None
        }
    };

    Some(ReportResult { name, value })
}

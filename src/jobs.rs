use std::fmt;

use serde_json::Value;

use crate::{
    errors::{AppChainsError, Result},
    response::{coerce_integer, AppParameter, AppRequest, AppResultsResponse, ResultProp, SubmitResponse},
    transport::HttpResponse,
};

#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy, PartialOrd, Ord)]
pub struct JobId(pub i64);

impl From<i64> for JobId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<JobId> for i64 {
    fn from(value: JobId) -> Self {
        value.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server side handle of a submitted report computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    id: JobId,
}

impl Job {
    pub fn new(id: i64) -> Self {
        Self { id: JobId(id) }
    }

    pub fn id(&self) -> JobId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    /// "completed" and "failed" (any case) are terminal, every other label is pending.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("completed") {
            JobStatus::Completed
        } else if label.eq_ignore_ascii_case("failed") {
            JobStatus::Failed
        } else {
            JobStatus::Pending
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// One decoded `GetAppResults` answer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawJobResult {
    pub job_id: JobId,
    pub completed: bool,
    pub succeeded: bool,
    pub status: String,
    pub source: Value,
    pub result_props: Vec<ResultProp>,
}

impl RawJobResult {
    /// Decodes a status response. A missing `Status` block or label is an
    /// error, a missing `ResultProps` list is not.
    pub fn decode(job: &Job, body: &[u8]) -> Result<Self> {
        let source: Value = serde_json::from_slice(body)?;
        let decoded: AppResultsResponse = serde_json::from_value(source.clone())?;

        let status = decoded
            .status
            .label()
            .ok_or_else(|| AppChainsError::Decode("Status.Status is missing".into()))?;
        let completed = JobStatus::from_label(&status).is_terminal();
        let result_props = decoded
            .result_props
            .unwrap_or_default()
            .into_iter()
            .map(ResultProp::from_value)
            .collect();

        Ok(Self {
            job_id: job.id(),
            completed,
            succeeded: decoded.status.completed_successfully.unwrap_or(false),
            status,
            source,
            result_props,
        })
    }

    pub fn job_status(&self) -> JobStatus {
        JobStatus::from_label(&self.status)
    }
}

/// Serializes `{"AppCode": ..., "Pars": [{"Name": "dataSourceId", "Value": ...}]}`.
pub fn build_request_body(app_code: &str, datasource_id: &str) -> Result<String> {
    let request = AppRequest {
        app_code,
        pars: vec![AppParameter {
            name: "dataSourceId",
            value: datasource_id,
        }],
    };

    Ok(serde_json::to_string(&request)?)
}

/// Turns a submission answer into a job, rejecting non-200 statuses and
/// unusable identifiers.
pub fn job_from_response(response: &HttpResponse) -> Result<Job> {
    if response.status != 200 {
        return Err(AppChainsError::JobSubmission {
            status: response.status,
            body: response.text(),
        })
    }

    let parsed: SubmitResponse = serde_json::from_slice(&response.body)
        .map_err(|_| AppChainsError::InvalidJobId)?;

    parsed
        .job_id
        .as_ref()
        .and_then(coerce_integer)
        .map(Job::new)
        .ok_or(AppChainsError::InvalidJobId)
}

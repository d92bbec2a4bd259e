use reqwest::Method;

use crate::jobs::JobId;

pub type Result<T> = std::result::Result<T, AppChainsError>;

#[derive(Debug, thiserror::Error)]
pub enum AppChainsError {
    /// The connection could not be opened, the request could not be sent
    /// or the response could not be read.
    #[error("Unable to talk to the AppChains server: {0}")]
    Transport(String),

    /// Only GET and POST are spoken by the transport.
    #[error("HTTP method {0} is not supported")]
    UnsupportedMethod(Method),

    /// Submission answered with anything but 200.
    #[error("AppChains returned error HTTP code {status} with message {body}")]
    JobSubmission { status: u16, body: String },

    #[error("AppChains returned invalid job identifier")]
    InvalidJobId,

    /// Any failure while polling aborts the whole loop.
    #[error("Error processing job {job_id}: {source}")]
    Polling {
        job_id: JobId,
        #[source]
        source: Box<AppChainsError>,
    },

    #[error("Job {job_id} did not reach a terminal state after {attempts} attempts")]
    PollTimeout { job_id: JobId, attempts: u32 },

    #[error("Invalid response from AppChains: {0}")]
    Decode(String),

    #[error("Invalid AppChains URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Report and job operations need a bearer token.
    #[error("This operation requires an authentication token")]
    MissingToken,

    #[error("Downloading {url} failed with HTTP code {status}")]
    FileDownload { url: String, status: u16 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AppChainsError {
    fn from(err: serde_json::Error) -> Self {
        AppChainsError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for AppChainsError {
    fn from(err: reqwest::Error) -> Self {
        AppChainsError::Transport(err.to_string())
    }
}

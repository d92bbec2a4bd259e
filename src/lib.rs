pub mod config;
pub mod errors;
pub mod transport;
pub mod urls;
pub mod response;
pub mod jobs;
pub mod report;
pub mod client;
pub mod beacon;


pub use client::AppChains;
pub use config::{AppChainsConfig, PollPolicy};
pub use errors::{AppChainsError, Result};
pub use jobs::{Job, JobId, JobStatus, RawJobResult};
pub use report::{FileResult, Report, ReportResult, ResultValue};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

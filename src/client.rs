use std::path::Path;

use serde_json::Value;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::{
    config::{AppChainsConfig, PollPolicy},
    errors::{AppChainsError, Result},
    jobs::{build_request_body, job_from_response, Job, RawJobResult},
    report::{transform, FileResult, Report},
    transport::{HttpRequest, ReqwestTransport, Transport},
    urls::Endpoints,
};

/// Client for the AppChains report service and the sequencing beacons.
pub struct AppChains<T = ReqwestTransport> {
    pub(crate) transport: T,
    pub(crate) endpoints: Endpoints,
    token: Option<String>,
    poll: PollPolicy,
}

impl AppChains<ReqwestTransport> {
    /// Client for report operations.
    pub fn new(token: impl Into<String>, hostname: impl Into<String>) -> Result<Self> {
        Self::from_config(AppChainsConfig::new(token, hostname))
    }

    /// Client without credentials, good for beacon lookups only.
    pub fn unauthenticated(hostname: impl Into<String>) -> Result<Self> {
        Self::from_config(AppChainsConfig::unauthenticated(hostname))
    }

    pub fn from_config(config: AppChainsConfig) -> Result<Self> {
        let transport = match config.request_timeout {
            Some(limit) => ReqwestTransport::with_timeout(limit)?,
            None => ReqwestTransport::new()?,
        };
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> AppChains<T> {
    pub fn with_transport(config: AppChainsConfig, transport: T) -> Self {
        Self {
            endpoints: Endpoints::new(&config),
            token: config.token,
            poll: config.poll,
            transport,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    /// Submits an application job for a data source and waits for its report.
    pub async fn get_report(
        &self,
        remote_method_name: &str,
        app_code: &str,
        datasource_id: &str,
    ) -> Result<Report> {
        let job = self.submit_app_job(remote_method_name, app_code, datasource_id).await?;
        self.report_for(&job).await
    }

    /// Same as [`AppChains::get_report`] with a pre-built JSON body.
    pub async fn get_report_with_body(&self, remote_method_name: &str, request_body: &str) -> Result<Report> {
        let job = self.submit_job(remote_method_name, request_body).await?;
        self.report_for(&job).await
    }

    /// The untransformed payload of the terminal status response.
    pub async fn get_raw_report(
        &self,
        remote_method_name: &str,
        app_code: &str,
        datasource_id: &str,
    ) -> Result<Value> {
        let job = self.submit_app_job(remote_method_name, app_code, datasource_id).await?;
        Ok(self.poll_job(&job).await?.source)
    }

    pub async fn get_raw_report_with_body(&self, remote_method_name: &str, request_body: &str) -> Result<Value> {
        let job = self.submit_job(remote_method_name, request_body).await?;
        Ok(self.poll_job(&job).await?.source)
    }

    pub async fn report_for(&self, job: &Job) -> Result<Report> {
        let raw = self.poll_job(job).await?;
        Ok(transform(&raw, &self.endpoints))
    }

    pub async fn submit_app_job(
        &self,
        remote_method_name: &str,
        app_code: &str,
        datasource_id: &str,
    ) -> Result<Job> {
        let body = build_request_body(app_code, datasource_id)?;
        self.submit_job(remote_method_name, &body).await
    }

    /// Posts `request_body` to `<base>/<remote_method_name>` and reads the job id.
    pub async fn submit_job(&self, remote_method_name: &str, request_body: &str) -> Result<Job> {
        let url = self.endpoints.job_submission(remote_method_name)?;
        let request = self.authenticated(HttpRequest::post(url, request_body))?;

        info!("Submitting job to {}", remote_method_name);
        let response = self.transport.send(request).await?;
        let job = job_from_response(&response).map_err(|err| {
            warn!("Job submission to {} failed: {}", remote_method_name, err);
            err
        })?;

        info!("[Job {}] Submitted to {}", job.id(), remote_method_name);
        Ok(job)
    }

    /// Polls until the job reports a terminal status. A failed job is still
    /// returned normally, check `succeeded` on the result.
    pub async fn poll_job(&self, job: &Job) -> Result<RawJobResult> {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let fetched = match self.poll.remaining(started.elapsed()) {
                Some(remaining) => match timeout(remaining, self.fetch_job_result(job)).await {
                    Ok(fetched) => fetched,
                    Err(_) => {
                        warn!("[Job {}] Status request outlived the poll deadline", job.id());
                        return Err(AppChainsError::PollTimeout {
                            job_id: job.id(),
                            attempts,
                        })
                    }
                },
                None => self.fetch_job_result(job).await,
            };

            let raw = fetched
                .map_err(|err| {
                    warn!("[Job {}] Polling failed: {}", job.id(), err);
                    AppChainsError::Polling {
                        job_id: job.id(),
                        source: Box::new(err),
                    }
                })?;

            if raw.completed {
                info!(
                    "[Job {}] Reached status {} after {} attempt(s), succeeded: {}",
                    job.id(),
                    raw.status,
                    attempts,
                    raw.succeeded
                );
                return Ok(raw)
            }

            if !self.poll.allows(attempts, started.elapsed()) {
                warn!("[Job {}] Giving up after {} attempt(s)", job.id(), attempts);
                return Err(AppChainsError::PollTimeout {
                    job_id: job.id(),
                    attempts,
                })
            }

            debug!("[Job {}] Status {}, retrying in {:?}", job.id(), raw.status, self.poll.interval);
            sleep(self.poll.interval).await;
        }
    }

    /// A single status request, no retry.
    pub async fn fetch_job_result(&self, job: &Job) -> Result<RawJobResult> {
        let url = self.endpoints.job_results(job.id())?;
        let request = self.authenticated(HttpRequest::get(url))?;
        let response = self.transport.send(request).await?;

        RawJobResult::decode(job, &response.body)
    }

    /// Downloads the content behind a file result.
    pub async fn fetch_file(&self, file: &FileResult) -> Result<Vec<u8>> {
        let request = self.authenticated(HttpRequest::get(file.url.clone()))?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(AppChainsError::FileDownload {
                url: file.url.to_string(),
                status: response.status,
            })
        }

        debug!("Downloaded {} ({} bytes)", file.name, response.body.len());
        Ok(response.body)
    }

    /// Writes the file to exactly `path`.
    pub async fn save_file_as(&self, file: &FileResult, path: impl AsRef<Path>) -> Result<()> {
        let content = self.fetch_file(file).await?;
        tokio::fs::write(path.as_ref(), content).await?;

        info!("Saved {} to {}", file.name, path.as_ref().display());
        Ok(())
    }

    /// Writes the file into `dir` under its report name.
    pub async fn save_file_to(&self, file: &FileResult, dir: impl AsRef<Path>) -> Result<()> {
        let path = dir.as_ref().join(&file.name);
        self.save_file_as(file, path).await
    }

    fn authenticated(&self, request: HttpRequest) -> Result<HttpRequest> {
        match &self.token {
            Some(token) => Ok(request.bearer(token.clone())),
            None => Err(AppChainsError::MissingToken),
        }
    }
}

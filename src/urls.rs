use reqwest::Url;

use crate::{
    config::AppChainsConfig,
    errors::{AppChainsError, Result},
    jobs::JobId,
};

/// Builds every URL the client talks to. All report endpoints live under
/// `<scheme>://<hostname>:<port>/<version>/`.
#[derive(Debug, Clone)]
pub struct Endpoints {
    scheme: String,
    hostname: String,
    port: u16,
    protocol_version: String,
    beacon_hostname: String,
}

impl Endpoints {
    pub fn new(config: &AppChainsConfig) -> Self {
        Self {
            scheme: config.scheme.clone(),
            hostname: config.hostname.clone(),
            port: config.port,
            protocol_version: config.protocol_version.clone(),
            beacon_hostname: config.beacon_hostname.clone(),
        }
    }

    pub fn base(&self, context: &str) -> Result<Url> {
        parse(format!(
            "{}://{}:{}/{}/{}",
            self.scheme, self.hostname, self.port, self.protocol_version, context
        ))
    }

    pub fn job_submission(&self, remote_method_name: &str) -> Result<Url> {
        self.base(remote_method_name)
    }

    pub fn job_results(&self, job_id: JobId) -> Result<Url> {
        self.base(&format!("GetAppResults?idJob={}", job_id))
    }

    pub fn report_file(&self, file_id: i64) -> Result<Url> {
        self.base(&format!("GetReportFile?id={}", file_id))
    }

    /// Beacon URL with the parameters URL-encoded into the query string.
    pub fn beacon(&self, method_name: &str, parameters: &[(&str, &str)]) -> Result<Url> {
        let raw = self.beacon_root(method_name);
        Url::parse_with_params(&raw, parameters).map_err(|err| AppChainsError::InvalidUrl {
            url: raw,
            reason: err.to_string(),
        })
    }

    /// Beacon URL with a caller supplied, already encoded query string.
    pub fn beacon_with_query(&self, method_name: &str, query: &str) -> Result<Url> {
        parse(format!("{}?{}", self.beacon_root(method_name), query))
    }

    fn beacon_root(&self, method_name: &str) -> String {
        format!(
            "{}://{}:{}/{}/",
            self.scheme, self.beacon_hostname, self.port, method_name
        )
    }
}

fn parse(raw: String) -> Result<Url> {
    Url::parse(&raw).map_err(|err| AppChainsError::InvalidUrl {
        url: raw,
        reason: err.to_string(),
    })
}

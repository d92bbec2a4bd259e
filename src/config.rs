use std::{env, str::FromStr, time::Duration};

use crate::errors::{AppChainsError, Result};

pub const DEFAULT_HOSTNAME: &str = "api.sequencing.com";
pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_PORT: u16 = 443;
pub const PROTOCOL_VERSION: &str = "v1";
pub const BEACON_HOSTNAME: &str = "beacon.sequencing.com";

/// Seconds to wait between two job status requests.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// How the poller waits for a job. Without caps it waits forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_duration: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RETRY_INTERVAL,
            max_attempts: None,
            max_duration: None,
        }
    }
}

impl PollPolicy {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    /// Time left before `max_duration` runs out, `None` when uncapped.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.max_duration.map(|max| max.saturating_sub(elapsed))
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows(&self, attempts: u32, elapsed: Duration) -> bool {
        if let Some(max) = self.max_attempts {
            if attempts >= max {
                return false
            }
        }

        match self.max_duration {
            Some(max) => elapsed + self.interval <= max,
            None => true,
        }
    }
}

/// Settings fixed for the lifetime of a client.
#[derive(Debug, Clone)]
pub struct AppChainsConfig {
    pub token: Option<String>,
    pub hostname: String,
    pub scheme: String,
    pub port: u16,
    pub protocol_version: String,
    pub beacon_hostname: String,
    pub poll: PollPolicy,
    /// Caps every single HTTP request made by the default transport.
    pub request_timeout: Option<Duration>,
}

impl AppChainsConfig {
    /// Config for report and job operations.
    pub fn new(token: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::unauthenticated(hostname)
        }
    }

    /// Config for beacon lookups only.
    pub fn unauthenticated(hostname: impl Into<String>) -> Self {
        Self {
            token: None,
            hostname: hostname.into(),
            scheme: DEFAULT_SCHEME.into(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.into(),
            beacon_hostname: BEACON_HOSTNAME.into(),
            poll: PollPolicy::default(),
            request_timeout: None,
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_request_timeout(mut self, limit: Duration) -> Self {
        self.request_timeout = Some(limit);
        self
    }

    /// Reads `APPCHAINS_*` variables. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        let hostname = env::var("APPCHAINS_HOSTNAME")
            .unwrap_or_else(|_| DEFAULT_HOSTNAME.to_string());

        let mut config = match env::var("APPCHAINS_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Self::new(token, hostname),
            _ => Self::unauthenticated(hostname),
        };

        if let Some(secs) = parse_var::<u64>("APPCHAINS_POLL_INTERVAL_SECS")? {
            config.poll.interval = Duration::from_secs(secs);
        }
        config.poll.max_attempts = parse_var::<u32>("APPCHAINS_POLL_MAX_ATTEMPTS")?;
        config.poll.max_duration = parse_var::<u64>("APPCHAINS_POLL_TIMEOUT_SECS")?
            .map(Duration::from_secs);
        config.request_timeout = parse_var::<u64>("APPCHAINS_REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppChainsError::Config(format!("{} must be a number, got {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

use std::{future::Future, time::Duration};

use reqwest::{header, Method, Url};
use tracing::{debug, warn};

use crate::errors::{AppChainsError, Result};

/// One outgoing request. `bearer_token` is `None` for unauthenticated calls.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<String>,
    pub bearer_token: Option<String>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
            bearer_token: None,
        }
    }

    pub fn post(url: Url, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url,
            body: Some(body.into()),
            bearer_token: None,
        }
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Only GET and POST go over the wire.
    pub fn check_method(&self) -> Result<()> {
        if self.method == Method::GET || self.method == Method::POST {
            Ok(())
        } else {
            Err(AppChainsError::UnsupportedMethod(self.method.clone()))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Lossy text, for error messages.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The body as text, failing instead of replacing invalid UTF-8.
    pub fn into_text(self) -> Result<String> {
        String::from_utf8(self.body)
            .map_err(|err| AppChainsError::Decode(format!("Response body is not UTF-8: {}", err)))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the AppChains and beacon hosts.
///
/// Non-2xx statuses are not errors at this level, callers decide what a
/// status means.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_client(reqwest::Client::builder())
    }

    /// Caps every single request, not the whole polling loop.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_client(reqwest::Client::builder().timeout(timeout))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn with_client(builder: reqwest::ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|err| AppChainsError::Transport(format!("Failed to create HTTP client: {}", err)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        request.check_method()?;

        let HttpRequest {
            method,
            url,
            body,
            bearer_token,
        } = request;

        debug!("Sending {} request to {}", method, url);
        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(token) = &bearer_token {
            builder = builder.bearer_auth(token);
        }

        if method == Method::POST {
            let body = body.unwrap_or_default();
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_LENGTH, body.len())
                .body(body);
        }

        let response = builder.send().await.map_err(|err| {
            warn!("Unable to connect to {}: {}", url, err);
            AppChainsError::Transport(format!("Unable to connect to AppChains server: {}", err))
        })?;

        let status = response.status().as_u16();
        // Reading the body to the end hands the connection back to the pool.
        let bytes = response.bytes().await.map_err(|err| {
            warn!("Unable to read response from {}: {}", url, err);
            AppChainsError::Transport(format!("Unable to read response from the AppChains server: {}", err))
        })?;

        debug!("Received {} ({} bytes) from {}", status, bytes.len(), url);
        Ok(HttpResponse::new(status, bytes.to_vec()))
    }
}

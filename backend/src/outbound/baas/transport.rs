//! Client construction and response helpers shared by the REST and auth
//! clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};

const USER_AGENT: &str = "rentify-backend/0.1";

/// Base URL and project API key of a hosted backend.
#[derive(Debug, Clone)]
pub struct BaasEndpoint {
    base: Url,
    api_key: String,
}

impl BaasEndpoint {
    /// `base` is the project root, e.g. `https://abc.supabase.co/`.
    pub fn new(base: Url, api_key: impl Into<String>) -> Self {
        Self {
            base,
            api_key: api_key.into(),
        }
    }

    /// Resolve `path` (no leading slash) against the base URL.
    pub(super) fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
    }

    /// Attach the project key, authorising as `bearer` or as the project
    /// itself when no user token applies.
    pub(super) fn authorise(&self, request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer.unwrap_or(self.api_key.as_str());
        request
            .header("apikey", self.api_key.as_str())
            .bearer_auth(token)
    }
}

/// Build the shared reqwest client with an explicit request timeout.
///
/// # Errors
///
/// Returns an error when the reqwest client cannot be constructed.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// How a request failed before producing a usable status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum SendFailure {
    Timeout(String),
    Transport(String),
}

impl From<reqwest::Error> for SendFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// `status N: <body preview>` for error messages.
pub(super) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

pub(super) fn is_timeout_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT
    )
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

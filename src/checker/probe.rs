//! HTTP client construction and single timed probes
//!
//! Two client identities exist. The probe client looks like a desktop
//! browser (plus an identifying extension and header) and is used against
//! friend sites. The API client keeps the identity but drops content
//! negotiation headers: the status API returns mangled bytes when an
//! `Accept-Language` header is present.

use crate::config::CheckerConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};

/// Browser-like identity carrying the tool's own name and contact
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/123.0.0.0 Safari/537.36 \
     (linkpulse/1.0; +https://github.com/linkpulse/linkpulse)";

/// Builds the probe client used by the direct and proxy tiers
///
/// `verify` controls TLS certificate verification; the standard tiers pass
/// true, and only a deliberately degraded caller would pass false.
pub fn build_probe_client(config: &CheckerConfig, verify: bool) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));
    headers.insert("X-Linkpulse", HeaderValue::from_static("1.0"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.probe_timeout_secs))
        .danger_accept_invalid_certs(!verify)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the minimal-identity client for the status API and source fetches
pub fn build_api_client(config: &CheckerConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert("X-Linkpulse", HeaderValue::from_static("1.0"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.api_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Which strategy produced a probe outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Direct,
    Proxy,
    RemoteApi,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::Proxy => "proxy",
            Self::RemoteApi => "remote-api",
        };
        write!(f, "{}", name)
    }
}

/// Result of one timed GET
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// HTTP 200 within the timeout
    Reachable { latency: f64 },

    /// A response arrived, but with a non-200 status
    BadStatus { code: u16 },

    /// Timeout, DNS, connect, or TLS failure
    Failed { error: String },
}

impl ProbeOutcome {
    pub fn latency(&self) -> Option<f64> {
        match self {
            Self::Reachable { latency } => Some(*latency),
            _ => None,
        }
    }
}

/// Performs one timed GET against a URL
///
/// Success is exactly HTTP 200. Everything else, including any transport
/// failure, is returned as a classified outcome; retrying is the caller's
/// business, not this function's.
pub async fn probe_url(client: &Client, url: &str) -> ProbeOutcome {
    let start = Instant::now();

    match client.get(url).send().await {
        Ok(response) => {
            let latency = round_latency(start.elapsed());
            if response.status() == StatusCode::OK {
                ProbeOutcome::Reachable { latency }
            } else {
                ProbeOutcome::BadStatus {
                    code: response.status().as_u16(),
                }
            }
        }
        Err(e) => ProbeOutcome::Failed {
            error: describe_error(&e),
        },
    }
}

/// Rounds wall-clock latency to two decimals
pub fn round_latency(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}

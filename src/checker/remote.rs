//! Remote status API resolution
//!
//! Links that fail both local tiers get one last chance through a
//! third-party "is this URL up" API. The provider is slow and rate
//! limited, so unlike the fully parallel first pass, the queue is drained
//! strictly serially with a minimum spacing slept around every call.

use crate::checker::backlink::BacklinkChecker;
use crate::checker::chain::{ChainOutcome, UnresolvedQueue};
use crate::checker::probe::{round_latency, Tier};
use crate::config::StatusApiConfig;
use crate::report::UNREACHABLE_LATENCY;
use crate::source::LinkEntry;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Serial drain of the unresolved queue against the status API
pub struct RemoteStatusResolver<'a> {
    client: &'a Client,
    api: &'a StatusApiConfig,
    interval: Duration,
    backlink: Option<&'a BacklinkChecker>,
}

impl<'a> RemoteStatusResolver<'a> {
    pub fn new(
        client: &'a Client,
        api: &'a StatusApiConfig,
        interval_ms: u64,
        backlink: Option<&'a BacklinkChecker>,
    ) -> Self {
        Self {
            client,
            api,
            interval: Duration::from_millis(interval_ms),
            backlink,
        }
    }

    /// Resolves every queued entry, in order, one at a time
    ///
    /// Whatever this returns is final for the entry: the caller replaces
    /// the chain's interim -1.0 with it, success or not.
    pub async fn drain(&self, queue: &UnresolvedQueue) -> Vec<ChainOutcome> {
        let entries = queue.drain();
        if entries.is_empty() {
            return Vec::new();
        }

        tracing::info!("Re-checking {} links through the status API", entries.len());

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            tokio::time::sleep(self.interval).await;
            let outcome = self.resolve_one(entry).await;
            tokio::time::sleep(self.interval).await;
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn resolve_one(&self, entry: LinkEntry) -> ChainOutcome {
        let request_url = match &self.api.key {
            Some(key) => format!("{}?url={}&key={}", self.api.url, entry.link, key),
            None => format!("{}?url={}", self.api.url, entry.link),
        };

        let start = Instant::now();
        let accepted = match self.client.get(&request_url).send().await {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => {
                    let accepted = is_accessible(&body);
                    if !accepted {
                        tracing::warn!("[remote-api] {} reported down: {}", entry.link, body);
                    }
                    accepted
                }
                Err(e) => {
                    tracing::warn!("[remote-api] Malformed body for {}: {}", entry.link, e);
                    false
                }
            },
            Err(e) => {
                tracing::warn!("[remote-api] Request failed for {}: {}", entry.link, e);
                false
            }
        };

        if !accepted {
            return ChainOutcome {
                entry,
                latency: UNREACHABLE_LATENCY,
                tier: Some(Tier::RemoteApi),
                backlink: None,
            };
        }

        let latency = round_latency(start.elapsed());
        tracing::info!("[remote-api] {} reachable in {:.2}s", entry.link, latency);

        let backlink = match (&entry.linkpage, self.backlink) {
            (Some(page), Some(checker)) => Some(checker.check(page).await),
            _ => None,
        };

        ChainOutcome {
            entry,
            latency,
            tier: Some(Tier::RemoteApi),
            backlink,
        }
    }
}

/// Accepts only a double positive: the top-level `code` and the embedded
/// `data` must both indicate success
fn is_accessible(body: &Value) -> bool {
    if status_code(body.get("code")) != Some(200) {
        return false;
    }

    match body.get("data") {
        Some(Value::Object(data)) => content_acceptable(data),
        other => status_code(other) == Some(200),
    }
}

/// Reads a status field that may arrive as a number or a numeric string
fn status_code(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Content variant: a non-empty title that survived transport unmangled.
/// Any non-ASCII byte in the metadata fields is treated as mangling.
fn content_acceptable(data: &serde_json::Map<String, Value>) -> bool {
    let title = match data.get("title").and_then(Value::as_str) {
        Some(title) if !title.trim().is_empty() => title,
        _ => return false,
    };

    let mut fields = vec![title];
    for key in ["keywords", "description"] {
        if let Some(value) = data.get(key).and_then(Value::as_str) {
            fields.push(value);
        }
    }

    fields.iter().all(|field| field.is_ascii())
}

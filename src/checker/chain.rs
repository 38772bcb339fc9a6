//! Tiered fallback resolution for one link
//!
//! Tiers are data, not control flow: each entry gets an ordered candidate
//! list (direct access, then the proxy rewrite when configured), and the
//! first HTTP 200 wins. A link that exhausts its candidates is handed to
//! the remote status API via the shared unresolved queue.

use crate::checker::backlink::BacklinkChecker;
use crate::checker::probe::{probe_url, ProbeOutcome, Tier};
use crate::report::{BacklinkPresence, UNREACHABLE_LATENCY};
use crate::source::{is_http_url, LinkEntry};
use reqwest::Client;
use std::sync::Mutex;

/// Work queue shared between pool workers and the remote resolver
///
/// Workers only append; the resolver drains exactly once, after the pool
/// has fully joined.
#[derive(Debug, Default)]
pub struct UnresolvedQueue {
    inner: Mutex<Vec<LinkEntry>>,
}

impl UnresolvedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: LinkEntry) {
        self.inner.lock().unwrap().push(entry);
    }

    pub fn drain(&self) -> Vec<LinkEntry> {
        std::mem::take(&mut *self.inner.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of the chain (or the remote resolver) for one entry
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub entry: LinkEntry,

    /// Accepted latency, or -1.0 while/because unresolved
    pub latency: f64,

    /// The tier that produced the accepted outcome, if any
    pub tier: Option<Tier>,

    pub backlink: Option<BacklinkPresence>,
}

struct TierCandidate {
    tier: Tier,
    url: String,
}

/// Builds the ordered candidate list for an entry
///
/// An unconfigured tier yields no candidate; a malformed candidate URL is
/// dropped with a warning. Neither counts as a probe failure.
fn tier_candidates(entry: &LinkEntry, proxy_prefix: Option<&str>) -> Vec<TierCandidate> {
    let raw = [
        (Tier::Direct, Some(entry.link.clone())),
        (
            Tier::Proxy,
            proxy_prefix.map(|prefix| format!("{}{}", prefix, entry.link)),
        ),
    ];

    let mut candidates = Vec::with_capacity(raw.len());
    for (tier, url) in raw {
        match url {
            Some(url) if is_http_url(&url) => candidates.push(TierCandidate { tier, url }),
            Some(url) => {
                tracing::warn!("[{}] Invalid candidate for {}: {}", tier, entry.link, url)
            }
            None => {}
        }
    }

    candidates
}

/// Resolves one entry through the local tiers
///
/// Invoked once per entry from the worker pool; the queue is the only
/// shared state. On success the backlink check (when configured and the
/// entry has a links page) runs before returning, without affecting the
/// reachability verdict. On exhaustion the entry is queued for the remote
/// resolver and the interim latency is -1.0; the caller must overwrite it
/// with the resolver's outcome.
pub async fn resolve(
    client: &Client,
    entry: LinkEntry,
    proxy_prefix: Option<&str>,
    backlink: Option<&BacklinkChecker>,
    queue: &UnresolvedQueue,
) -> ChainOutcome {
    for candidate in tier_candidates(&entry, proxy_prefix) {
        match probe_url(client, &candidate.url).await {
            ProbeOutcome::Reachable { latency } => {
                tracing::info!(
                    "[{}] {} reachable in {:.2}s",
                    candidate.tier,
                    entry.link,
                    latency
                );

                let backlink_result = match (&entry.linkpage, backlink) {
                    (Some(page), Some(checker)) => Some(checker.check(page).await),
                    _ => None,
                };

                return ChainOutcome {
                    entry,
                    latency,
                    tier: Some(candidate.tier),
                    backlink: backlink_result,
                };
            }
            ProbeOutcome::BadStatus { code } => {
                tracing::warn!("[{}] {} returned status {}", candidate.tier, entry.link, code);
            }
            ProbeOutcome::Failed { error } => {
                tracing::warn!("[{}] {} failed: {}", candidate.tier, entry.link, error);
            }
        }
    }

    queue.push(entry.clone());
    ChainOutcome {
        entry,
        latency: UNREACHABLE_LATENCY,
        tier: None,
        backlink: None,
    }
}

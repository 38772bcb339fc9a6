//! Run coordination
//!
//! One invocation is one pass: fetch the current link list, fan it out
//! across the probe pool, give the stragglers to the remote resolver,
//! reconcile against the previous report, persist, and exit. Continuity
//! between runs lives entirely in the persisted report.

use crate::checker::backlink::BacklinkChecker;
use crate::checker::chain::{self, ChainOutcome, UnresolvedQueue};
use crate::checker::probe::{build_api_client, build_probe_client};
use crate::checker::remote::RemoteStatusResolver;
use crate::config::Config;
use crate::report::{self, Observation, RunReport};
use crate::source;
use crate::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::Path;

/// Runs one complete check pass and returns the persisted report
///
/// The sequence is: source fetch (fatal when empty) → previous-report load
/// (never fatal) → parallel fallback chains → serial remote resolution,
/// spliced back by link → reconciliation → atomic save.
pub async fn run_check(config: &Config) -> Result<RunReport> {
    match &config.proxy_prefix {
        Some(prefix) => tracing::info!(
            "Proxy tier enabled ({})",
            prefix.split(':').next().unwrap_or("unknown scheme")
        ),
        None => tracing::info!("No proxy configured, proxy tier disabled"),
    }

    let api_client = build_api_client(&config.checker)?;
    let probe_client = build_probe_client(&config.checker, true)?;

    let entries = source::fetch_entries(&api_client, &config.source).await?;

    let result_path = Path::new(&config.output.result_path);
    let previous = report::load_previous(result_path);

    let backlink_checker = config
        .author_url
        .as_deref()
        .map(|author| BacklinkChecker::new(probe_client.clone(), author));

    let queue = UnresolvedQueue::new();

    tracing::info!(
        "Probing {} links across {} workers",
        entries.len(),
        config.checker.workers
    );

    let mut outcomes: Vec<ChainOutcome> = stream::iter(entries.iter().map(|entry| {
        let client = &probe_client;
        let proxy = config.proxy_prefix.as_deref();
        let backlink = backlink_checker.as_ref();
        let queue = &queue;
        let entry = entry.clone();
        async move { chain::resolve(client, entry, proxy, backlink, queue).await }
    }))
    .buffer_unordered(config.checker.workers)
    .collect()
    .await;

    // The resolver's verdict is final: it replaces the interim -1.0 the
    // chain recorded for each queued entry.
    let resolver = RemoteStatusResolver::new(
        &api_client,
        &config.status_api,
        config.checker.api_interval_ms,
        backlink_checker.as_ref(),
    );
    for resolved in resolver.drain(&queue).await {
        if let Some(slot) = outcomes
            .iter_mut()
            .find(|outcome| outcome.entry.link == resolved.entry.link)
        {
            *slot = resolved;
        }
    }

    for outcome in &outcomes {
        if let Some(tier) = outcome.tier {
            tracing::debug!(
                "{} resolved via {} ({:.2}s)",
                outcome.entry.link,
                tier,
                outcome.latency
            );
        }
    }

    let observations: HashMap<String, Observation> = outcomes
        .into_iter()
        .map(|outcome| {
            (
                outcome.entry.link.clone(),
                Observation {
                    latency: outcome.latency,
                    backlink: outcome.backlink,
                },
            )
        })
        .collect();

    let new_report = report::reconcile(
        &entries,
        &observations,
        &previous,
        backlink_checker.is_some(),
    );

    report::save(result_path, &new_report)?;

    tracing::info!(
        "Checked {} links: {} accessible, {} inaccessible",
        new_report.total_count,
        new_report.accessible_count,
        new_report.inaccessible_count
    );

    Ok(new_report)
}

//! Reconciliation of probe outcomes against the previous run

use crate::report::status::{BacklinkPresence, LinkStatus, RunReport, UNREACHABLE_LATENCY};
use crate::source::LinkEntry;
use std::collections::HashMap;

/// One link's observed outcome for the current run, keyed externally by `link`
#[derive(Debug, Clone)]
pub struct Observation {
    pub latency: f64,
    pub backlink: Option<BacklinkPresence>,
}

/// Merges this run's observations with the previous report
///
/// The output walks `entries` in source order, which is also the pruning
/// step: a link no longer present in the source cannot appear in the new
/// report, whatever the previous report says.
///
/// Fail counts: any success resets to 0; a failure extends the previous
/// streak by one, and a link with no history starts its streak at 1.
///
/// `backlink_active` controls whether `has_author_link_count` is emitted at
/// all; it counts entries whose friend page actually links back in markup.
pub fn reconcile(
    entries: &[LinkEntry],
    observations: &HashMap<String, Observation>,
    previous: &RunReport,
    backlink_active: bool,
) -> RunReport {
    let mut link_status = Vec::with_capacity(entries.len());

    for entry in entries {
        let observation = observations.get(&entry.link);
        let latency = observation
            .map(|o| o.latency)
            .unwrap_or(UNREACHABLE_LATENCY);

        let fail_count = if latency >= 0.0 {
            0
        } else {
            previous
                .find(&entry.link)
                .map(|prev| prev.fail_count)
                .unwrap_or(0)
                + 1
        };

        link_status.push(LinkStatus {
            name: entry.name.clone(),
            link: entry.link.clone(),
            latency,
            fail_count,
            has_author_link: observation.and_then(|o| o.backlink),
            linkpage: entry.linkpage.clone(),
        });
    }

    let total_count = link_status.len();
    let accessible_count = link_status.iter().filter(|s| s.is_accessible()).count();
    let has_author_link_count = backlink_active.then(|| {
        link_status
            .iter()
            .filter(|s| s.has_author_link.map(|b| b.is_linked()).unwrap_or(false))
            .count()
    });

    RunReport {
        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        accessible_count,
        inaccessible_count: total_count - accessible_count,
        total_count,
        has_author_link_count,
        link_status,
    }
}

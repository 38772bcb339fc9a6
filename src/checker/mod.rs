//! Checker module: the tiered verification engine
//!
//! This module contains the core checking logic:
//! - HTTP client construction and single timed probes
//! - Tiered fallback per link (direct, then proxy)
//! - Serial last-resort resolution through the remote status API
//! - Author backlink detection on friend pages
//! - Overall run coordination

mod backlink;
mod chain;
mod coordinator;
mod probe;
mod remote;

pub use backlink::{author_variants, classify, BacklinkChecker};
pub use chain::{resolve, ChainOutcome, UnresolvedQueue};
pub use coordinator::run_check;
pub use probe::{build_api_client, build_probe_client, probe_url, ProbeOutcome, Tier};
pub use remote::RemoteStatusResolver;

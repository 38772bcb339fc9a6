use serde::{Deserialize, Serialize};

/// Sentinel latency marking a link as unreachable this run
pub const UNREACHABLE_LATENCY: f64 = -1.0;

/// Outcome of the author backlink check for one friend page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklinkPresence {
    /// The author URL appears inside a quoted attribute value
    Linked,

    /// The author URL appears only as page text
    TextOnly,

    /// No variant of the author URL appears at all
    Absent,
}

impl BacklinkPresence {
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked)
    }
}

/// Persisted per-link result, keyed by `link`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub name: String,
    pub link: String,

    /// Seconds to first successful response, or -1.0 when unreachable
    pub latency: f64,

    /// Consecutive failed runs; reset to 0 on any success
    pub fail_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_author_link: Option<BacklinkPresence>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkpage: Option<String>,
}

impl LinkStatus {
    pub fn is_accessible(&self) -> bool {
        self.latency >= 0.0
    }
}

/// The persisted run artifact, replaced wholesale each run
///
/// Field tolerance on deserialization is deliberate: a previous report with
/// missing fields still loads, and anything worse degrades to empty history
/// at the store layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunReport {
    pub timestamp: String,
    pub accessible_count: usize,
    pub inaccessible_count: usize,
    pub total_count: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_author_link_count: Option<usize>,

    pub link_status: Vec<LinkStatus>,
}

impl RunReport {
    /// A report with no history
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up the previous status for a link
    pub fn find(&self, link: &str) -> Option<&LinkStatus> {
        self.link_status.iter().find(|status| status.link == link)
    }
}

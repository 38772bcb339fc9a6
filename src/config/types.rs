/// Main configuration structure for linkpulse
#[derive(Debug, Clone)]
pub struct Config {
    /// Link source: a URL or a local file path (JSON or CSV)
    pub source: String,

    /// Proxy URL prefix; the target URL is appended verbatim
    pub proxy_prefix: Option<String>,

    /// Remote status API used for links that fail both local tiers
    pub status_api: StatusApiConfig,

    /// The operator's own site URL, enables the backlink check
    pub author_url: Option<String>,

    pub checker: CheckerConfig,
    pub output: OutputConfig,
}

/// Checker behavior configuration
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Number of concurrent workers in the probe pool
    pub workers: usize,

    /// Timeout for direct/proxy probes (seconds)
    pub probe_timeout_secs: u64,

    /// Timeout for status API and source fetches (seconds)
    pub api_timeout_secs: u64,

    /// Minimum spacing around each status API call (milliseconds)
    pub api_interval_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            probe_timeout_secs: 15,
            api_timeout_secs: 30,
            api_interval_ms: 200,
        }
    }
}

/// Remote status API configuration
#[derive(Debug, Clone)]
pub struct StatusApiConfig {
    /// API endpoint; queried as `<url>?url=<link>`
    pub url: String,

    /// Optional API key appended to each request
    pub key: Option<String>,
}

impl Default for StatusApiConfig {
    fn default() -> Self {
        Self {
            url: "https://v2.xxapi.cn/api/status".to_string(),
            key: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Path of the persisted run report (also the previous-run input)
    pub result_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            result_path: "./result.json".to_string(),
        }
    }
}

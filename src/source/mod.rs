//! Link source ingestion
//!
//! The friend-link list arrives either as a JSON document (an object with a
//! `link_list` array, or a bare array) or as a two/three-column CSV
//! (`name,link[,linkpage]`), fetched from a URL or read from a local path.
//! Format detection is by attempt: JSON first, CSV as the fallback.

use crate::{PulseError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// One configured friend link
///
/// `link` is the identity key: reconciliation and result splicing match on
/// it. `linkpage` points at the friend's links page and enables the
/// backlink check for this entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub name: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkpage: Option<String>,
}

/// Returns true if the value parses as an absolute http(s) URL
pub fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Fetches and parses the link source
///
/// URL sources are fetched with the given client; anything else is treated
/// as a local path. An empty or unparsable source is an error: with no
/// entries there is nothing to check, and a silently empty run would prune
/// every previously known link from the report.
pub async fn fetch_entries(client: &Client, source: &str) -> Result<Vec<LinkEntry>> {
    tracing::info!("Reading link source: {}", source);

    let content = if is_http_url(source) {
        client
            .get(source)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?
    } else {
        std::fs::read_to_string(source)?
    };

    let entries = parse_entries(&content)?;
    if entries.is_empty() {
        return Err(PulseError::Source(
            "link source is empty or unparsable".to_string(),
        ));
    }

    tracing::info!("Loaded {} link entries", entries.len());
    Ok(entries)
}

/// Parses source content, trying JSON shapes first and CSV as fallback
pub fn parse_entries(content: &str) -> Result<Vec<LinkEntry>> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        match value {
            Value::Object(mut map) => {
                if let Some(list) = map.remove("link_list") {
                    let entries: Vec<LinkEntry> = serde_json::from_value(list)
                        .map_err(|e| PulseError::Source(format!("malformed link_list: {}", e)))?;
                    tracing::debug!("Parsed JSON object source");
                    return Ok(entries);
                }
                // JSON, but not a shape we know; fall through to CSV, which
                // will yield nothing and surface as an empty source.
            }
            Value::Array(_) => {
                let entries: Vec<LinkEntry> = serde_json::from_value(value)
                    .map_err(|e| PulseError::Source(format!("malformed link array: {}", e)))?;
                tracing::debug!("Parsed JSON array source");
                return Ok(entries);
            }
            _ => {}
        }
    }

    Ok(parse_csv(content))
}

/// Parses `name,link[,linkpage]` rows; other row shapes are skipped
fn parse_csv(content: &str) -> Vec<LinkEntry> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [name, link] => entries.push(LinkEntry {
                name: name.to_string(),
                link: link.to_string(),
                linkpage: None,
            }),
            [name, link, linkpage] => entries.push(LinkEntry {
                name: name.to_string(),
                link: link.to_string(),
                linkpage: (!linkpage.is_empty()).then(|| linkpage.to_string()),
            }),
            _ => tracing::warn!("Skipping malformed source row: {}", line),
        }
    }

    if !entries.is_empty() {
        tracing::debug!("Parsed CSV source");
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com/"));
        assert!(is_http_url("http://example.com/list.json"));

        assert!(!is_http_url("./link.csv"));
        assert!(!is_http_url("ftp://example.com/"));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn test_parse_json_object_source() {
        let content = r#"{
            "link_list": [
                {"name": "A", "link": "https://a.example/"},
                {"name": "B", "link": "https://b.example/", "linkpage": "https://b.example/links"}
            ]
        }"#;

        let entries = parse_entries(content).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "A");
        assert!(entries[0].linkpage.is_none());
        assert_eq!(
            entries[1].linkpage.as_deref(),
            Some("https://b.example/links")
        );
    }

    #[test]
    fn test_parse_json_array_source() {
        let content = r#"[{"name": "A", "link": "https://a.example/"}]"#;

        let entries = parse_entries(content).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "https://a.example/");
    }

    #[test]
    fn test_parse_csv_two_columns() {
        let content = "Site A,https://a.example/\nSite B,https://b.example/\n";

        let entries = parse_entries(content).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "Site B");
        assert!(entries[1].linkpage.is_none());
    }

    #[test]
    fn test_parse_csv_three_columns() {
        let content = "Site A,https://a.example/,https://a.example/friends";

        let entries = parse_entries(content).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].linkpage.as_deref(),
            Some("https://a.example/friends")
        );
    }

    #[test]
    fn test_parse_csv_skips_malformed_rows() {
        let content = "just-one-field\nSite A,https://a.example/\na,b,c,d\n\n";

        let entries = parse_entries(content).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Site A");
    }

    #[test]
    fn test_parse_csv_empty_linkpage_column() {
        let content = "Site A,https://a.example/,";

        let entries = parse_entries(content).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].linkpage.is_none());
    }

    #[test]
    fn test_unknown_json_shape_yields_nothing() {
        let entries = parse_entries(r#"{"other": 1}"#).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_link_list_is_an_error() {
        let content = r#"{"link_list": [{"name": "A"}]}"#;
        assert!(parse_entries(content).is_err());
    }
}

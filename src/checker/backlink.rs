//! Author backlink detection on friend pages
//!
//! Friends that expose a links page are expected to link back to the
//! operator's site. The check is a substring scan over the raw page body,
//! not an HTML parse: false negatives are acceptable, and a collision with
//! an unrelated longer URL can produce a false positive.

use crate::report::BacklinkPresence;
use reqwest::Client;
use url::Url;

/// Expands the author URL into its reasonable textual variants
///
/// The input may carry a scheme or be a bare host. Variants produced, in
/// match order: the https form, the http form, the scheme-relative form,
/// and the bare `host[/path]` form, deduplicated with trailing slashes
/// trimmed.
pub fn author_variants(author: &str) -> Vec<String> {
    let candidate = if author.contains("://") {
        author.to_string()
    } else {
        format!("https://{}", author)
    };

    let base = match Url::parse(&candidate) {
        Ok(url) => match url.host_str() {
            Some(host) => format!("{}{}", host, url.path().trim_end_matches('/')),
            None => author.trim_end_matches('/').to_string(),
        },
        Err(_) => author.trim_end_matches('/').to_string(),
    };

    let mut variants = Vec::with_capacity(4);
    for variant in [
        format!("https://{}", base),
        format!("http://{}", base),
        format!("//{}", base),
        base,
    ] {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }

    variants
}

/// Classifies a page body against the author URL variants
///
/// A variant inside a quoted attribute value (either quote style, with or
/// without one trailing slash) counts as a markup link; a variant anywhere
/// else in the body counts as a text mention.
pub fn classify(body: &str, variants: &[String]) -> BacklinkPresence {
    for variant in variants {
        for quote in ['"', '\''] {
            let exact = format!("{}{}{}", quote, variant, quote);
            let slashed = format!("{}{}/{}", quote, variant, quote);
            if body.contains(&exact) || body.contains(&slashed) {
                return BacklinkPresence::Linked;
            }
        }
    }

    if variants.iter().any(|variant| body.contains(variant.as_str())) {
        return BacklinkPresence::TextOnly;
    }

    BacklinkPresence::Absent
}

/// Fetches friend pages and classifies them against one author URL
pub struct BacklinkChecker {
    client: Client,
    variants: Vec<String>,
}

impl BacklinkChecker {
    pub fn new(client: Client, author_url: &str) -> Self {
        let variants = author_variants(author_url);
        tracing::debug!("Backlink check active, matching {:?}", variants);

        Self { client, variants }
    }

    /// Fetches a friend page and scans it; an unreachable page is `absent`
    ///
    /// This never influences reachability: the caller records the result
    /// alongside the probe outcome, nothing more.
    pub async fn check(&self, page_url: &str) -> BacklinkPresence {
        let response = match self.client.get(page_url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Backlink page fetch failed for {}: {}", page_url, e);
                return BacklinkPresence::Absent;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Backlink page {} returned status {}",
                page_url,
                response.status()
            );
            return BacklinkPresence::Absent;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Backlink page body read failed for {}: {}", page_url, e);
                return BacklinkPresence::Absent;
            }
        };

        let presence = classify(&body, &self.variants);
        tracing::debug!("Backlink on {}: {:?}", page_url, presence);
        presence
    }
}

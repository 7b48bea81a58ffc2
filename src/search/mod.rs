//! SearxNG web search client
//!
//! Queries the configured SearxNG instance and normalizes its JSON results:
//! entries without both a title and a url are discarded, the rest are sorted
//! by score descending.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// One normalized search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source: String,
    pub score: f64,
    pub published_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    engine: Option<String>,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    published_date: Option<String>,
}

/// HTTP client for a SearxNG instance.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl SearchClient {
    /// Create a client from the search section of the config.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        if !config.enabled {
            return Err(Error::Search("search service is disabled".to_string()));
        }

        let base_url = Url::parse(&config.url)
            .map_err(|e| Error::Search(format!("invalid search URL '{}': {e}", config.url)))?;
        let client = reqwest::Client::new();

        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Perform a web search.
    ///
    /// A timed-out request fails immediately; transport failures and server
    /// errors are retried per the policy.
    pub async fn search(
        &self,
        query: &str,
        num_results: usize,
        timeout: Duration,
    ) -> Result<Vec<SearchResult>> {
        let url = self
            .base_url
            .join("/search")
            .map_err(|e| Error::Search(format!("invalid endpoint path: {e}")))?;
        let params = [
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("pageno", "1".to_string()),
            ("num_results", num_results.to_string()),
            ("categories", "general".to_string()),
            ("language", "en".to_string()),
        ];

        let mut attempt = 0;
        loop {
            match self.request_search(&url, &params, timeout).await {
                Ok(results) => {
                    if results.is_empty() {
                        tracing::info!(query, "no search results");
                    }
                    return Ok(results);
                }
                Err((error, retryable)) => {
                    attempt += 1;
                    if !retryable || attempt >= self.retry.max_attempts {
                        return Err(error);
                    }
                    let delay = self.retry.delay(attempt - 1);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "search request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn request_search(
        &self,
        url: &Url,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> std::result::Result<Vec<SearchResult>, (Error, bool)> {
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    (Error::Search("search request timed out".to_string()), false)
                } else {
                    (Error::Search(format!("failed to perform search: {e}")), true)
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err((
                Error::Search(format!("search failed with status: {status}")),
                true,
            ));
        }
        if !status.is_success() {
            return Err((
                Error::Search(format!("search failed with status: {status}")),
                false,
            ));
        }

        let data: SearxResponse = response.json().await.map_err(|e| {
            (
                Error::Search(format!("invalid search response: {e}")),
                false,
            )
        })?;

        Ok(process_results(data.results))
    }
}

/// Normalize raw results: drop entries missing title or url, sort by score
/// descending.
fn process_results(raw: Vec<RawResult>) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = raw
        .into_iter()
        .map(|r| SearchResult {
            title: r.title.trim().to_string(),
            url: r.url,
            snippet: r.content.trim().to_string(),
            source: r.engine.unwrap_or_else(|| "unknown".to_string()),
            score: r.score,
            published_date: r.published_date,
        })
        .filter(|r| !r.title.is_empty() && !r.url.is_empty())
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, url: &str, score: f64) -> RawResult {
        RawResult {
            title: title.to_string(),
            url: url.to_string(),
            content: "snippet".to_string(),
            engine: Some("duckduckgo".to_string()),
            score,
            published_date: None,
        }
    }

    #[test]
    fn test_results_sorted_by_score_descending() {
        let results = process_results(vec![
            raw("low", "https://a", 0.2),
            raw("high", "https://b", 2.5),
            raw("mid", "https://c", 1.0),
        ]);
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_results_without_title_or_url_are_dropped() {
        let results = process_results(vec![
            raw("", "https://a", 1.0),
            raw("no url", "", 1.0),
            raw("kept", "https://b", 1.0),
        ]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "kept");
    }

    #[test]
    fn test_missing_engine_becomes_unknown() {
        let mut entry = raw("t", "https://a", 0.0);
        entry.engine = None;
        let results = process_results(vec![entry]);
        assert_eq!(results[0].source, "unknown");
    }

    #[test]
    fn test_title_and_snippet_are_trimmed() {
        let mut entry = raw("  spaced  ", "https://a", 0.0);
        entry.content = "  padded snippet ".to_string();
        let results = process_results(vec![entry]);
        assert_eq!(results[0].title, "spaced");
        assert_eq!(results[0].snippet, "padded snippet");
    }

    #[test]
    fn test_disabled_service_is_an_error() {
        let config = SearchConfig {
            enabled: false,
            url: "http://localhost:4000".to_string(),
        };
        let err = SearchClient::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::Search(_)));
    }
}

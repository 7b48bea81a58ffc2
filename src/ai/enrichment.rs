//! AI-powered thought enrichment
//!
//! Extracts tags for a stored thought via the completion endpoint,
//! optionally fetches related web results, and persists the tags back onto
//! the thought. Search failures downgrade to a warning; a failed tag write
//! propagates.

use std::time::Duration;

use uuid::Uuid;

use super::client::{CompletionOptions, OllamaClient};
use crate::config::Config;
use crate::core::storage::Storage;
use crate::error::{Error, Result};
use crate::search::{SearchClient, SearchResult};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const ENRICHMENT_SEARCH_RESULTS: usize = 3;
const MAX_QUERY_LENGTH: usize = 100;

fn tag_extraction_prompt(content: &str) -> String {
    format!(
        "Analyze this text and extract relevant tags/keywords.\n\
         Return only a comma-separated list of lowercase tags.\n\
         Text: {content}\n\nTags:"
    )
}

/// Enrichment produced for one thought.
#[derive(Debug)]
pub struct Enrichment {
    pub generated_tags: Vec<String>,
    pub search_results: Vec<SearchResult>,
}

/// Service wiring storage, the completion client, and (optionally) search.
pub struct EnrichmentService {
    client: OllamaClient,
    search: Option<SearchClient>,
    storage: Storage,
}

impl EnrichmentService {
    pub fn new(config: &Config) -> Result<Self> {
        let storage = Storage::open(&config.storage_dir)?;
        let client = OllamaClient::from_config(&config.ai)?;
        let search = match SearchClient::from_config(&config.search) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "search service unavailable");
                None
            }
        };

        Ok(Self {
            client,
            search,
            storage,
        })
    }

    /// Enrich a thought with generated tags and related search results.
    pub async fn enrich_thought(&self, id: Uuid, include_search: bool) -> Result<Enrichment> {
        let thought = self
            .storage
            .get_thought(id)?
            .ok_or_else(|| Error::Validation(format!("thought not found: {id}")))?;

        tracing::info!(
            thought = %id,
            content_length = thought.content.len(),
            "enriching thought"
        );

        let response = self
            .client
            .generate(
                &tag_extraction_prompt(&thought.content),
                &CompletionOptions::default(),
            )
            .await?;
        let tags = extract_tags(&response);

        let mut search_results = Vec::new();
        if include_search {
            if let Some(search) = &self.search {
                let query = build_search_query(&thought.content, &tags);
                match search
                    .search(&query, ENRICHMENT_SEARCH_RESULTS, SEARCH_TIMEOUT)
                    .await
                {
                    Ok(results) => search_results = results,
                    Err(e) => tracing::warn!(error = %e, "search failed during enrichment"),
                }
            }
        }

        self.storage.update_thought_tags(id, &tags)?;

        tracing::info!(
            thought = %id,
            num_tags = tags.len(),
            num_search_results = search_results.len(),
            "thought enriched"
        );

        Ok(Enrichment {
            generated_tags: tags,
            search_results,
        })
    }
}

/// Clean up the model's comma-separated tag list: trimmed, lowercased,
/// longer than three characters, first-seen order, deduplicated.
fn extract_tags(response: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in response.split(',') {
        let tag = raw.trim().to_lowercase();
        if tag.len() > 3 && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Build a short search query from the first sentence plus up to three tags.
fn build_search_query(content: &str, tags: &[String]) -> String {
    let first_sentence = content
        .split(['.', '!', '?'])
        .next()
        .unwrap_or("")
        .trim();
    let tag_string = tags
        .iter()
        .take(3)
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let query = format!("{first_sentence} {tag_string}");
    query.chars().take(MAX_QUERY_LENGTH).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tags_lowercases_and_trims() {
        let tags = extract_tags("Rust , OWNERSHIP, systems ");
        assert_eq!(tags, vec!["rust", "ownership", "systems"]);
    }

    #[test]
    fn test_extract_tags_drops_short_tokens() {
        let tags = extract_tags("rust, ai, io, borrowing");
        assert_eq!(tags, vec!["rust", "borrowing"]);
    }

    #[test]
    fn test_extract_tags_deduplicates_in_order() {
        let tags = extract_tags("memory, Rust, memory, rust, lifetimes");
        assert_eq!(tags, vec!["memory", "rust", "lifetimes"]);
    }

    #[test]
    fn test_search_query_uses_first_sentence_and_tags() {
        let query = build_search_query(
            "Ownership moves values. Borrowing lends them.",
            &["rust".to_string(), "ownership".to_string()],
        );
        assert_eq!(query, "Ownership moves values rust ownership");
    }

    #[test]
    fn test_search_query_takes_at_most_three_tags() {
        let tags: Vec<String> = ["one", "two", "three", "four"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let query = build_search_query("Topic", &tags);
        assert_eq!(query, "Topic one two three");
    }

    #[test]
    fn test_search_query_is_capped() {
        let content = "x".repeat(300);
        let query = build_search_query(&content, &[]);
        assert!(query.chars().count() <= MAX_QUERY_LENGTH);
    }
}

//! AI collaborator boundary: Ollama client plus the enrichment and
//! suggestion services built on it.

pub mod client;
pub mod enrichment;
pub mod suggestions;

pub use client::{CompletionOptions, OllamaClient};
pub use enrichment::{Enrichment, EnrichmentService};
pub use suggestions::SuggestionService;

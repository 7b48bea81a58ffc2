//! AI-powered suggestions
//!
//! Drafts an answer for a stored question, or related follow-up questions
//! for a topic. Output goes to the terminal only; nothing is persisted.

use uuid::Uuid;

use super::client::{CompletionOptions, OllamaClient};
use crate::config::Config;
use crate::core::storage::Storage;
use crate::error::{Error, Result};

fn answer_prompt(question: &str) -> String {
    format!(
        "Given this question: {question}\n\n\
         Please provide a clear, concise, and accurate answer. Consider:\n\
         1. The specific context of the question\n\
         2. Any relevant technical details\n\
         3. Practical implications\n\n\
         Answer:"
    )
}

fn questions_prompt(content: &str) -> String {
    format!(
        "Based on this topic or question: {content}\n\n\
         Generate 3-5 related follow-up questions that would help explore \
         this topic further. Consider:\n\
         1. Different aspects of the topic\n\
         2. Practical applications\n\
         3. Common misconceptions\n\
         4. Current developments\n\n\
         Questions:"
    )
}

/// Service generating answer and question suggestions.
pub struct SuggestionService {
    client: OllamaClient,
    storage: Storage,
}

impl SuggestionService {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::from_config(&config.ai)?,
            storage: Storage::open(&config.storage_dir)?,
        })
    }

    /// Draft an answer for a stored question.
    pub async fn suggest_answer(&self, question_id: Uuid) -> Result<String> {
        let question = self
            .storage
            .get_question(question_id)?
            .ok_or_else(|| Error::Validation(format!("question not found: {question_id}")))?;

        self.client
            .generate(
                &answer_prompt(&question.content),
                &CompletionOptions::default(),
            )
            .await
    }

    /// Generate related follow-up questions for a topic.
    pub async fn suggest_questions(&self, content: &str) -> Result<Vec<String>> {
        let options = CompletionOptions {
            temperature: 0.8,
            ..Default::default()
        };
        let response = self
            .client
            .generate(&questions_prompt(content), &options)
            .await?;

        Ok(response
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect())
    }
}

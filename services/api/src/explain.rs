//! Explanation gateway
//!
//! Picks a concept from the fixed catalog, asks the text generation provider
//! to explain it for a five-year-old, and serves a canned explanation when
//! the provider should not be contacted at all.

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub mod catalog;
pub mod gemini;

use catalog::{CONCEPTS, FALLBACK_CONCEPT, FALLBACK_EXPLANATION};

/// Explanation used when the provider answers with no text
pub const EMPTY_GENERATION_TEXT: &str = "Unable to generate explanation";

/// External text generation provider, treated as an opaque prompt-to-text function
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate free text for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Source of randomness for concept selection
pub trait RandomSource: Send + Sync {
    /// Uniformly chosen index in `0..len`; `len` is never zero
    fn pick_index(&self, len: usize) -> usize;
}

/// [`RandomSource`] backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Errors raised by [`ExplanationGateway::explain`]
#[derive(Error, Debug)]
pub enum ExplainError {
    /// No provider client was configured at startup
    #[error("Gemini API not configured - please set GEMINI_API_KEY environment variable")]
    NotConfigured,

    /// The provider call failed
    #[error("{0}")]
    Provider(String),
}

/// A concept together with its simplified explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub concept: String,
    pub explanation: String,
}

/// Build the prompt sent to the provider for `concept`
pub fn build_prompt(concept: &str) -> String {
    format!(
        "Explain the computer science concept of '{concept}' so that a five-year-old \
         could understand it. Use simple words and everyday analogies, and avoid \
         technical jargon. Keep it engaging, clear and educational. Format the answer \
         in markdown with headings, lists and bold text where they help, and finish \
         with a short Python code example that illustrates the concept."
    )
}

/// Gateway to the text generation provider
#[derive(Clone)]
pub struct ExplanationGateway {
    generator: Option<Arc<dyn TextGenerator>>,
    random: Arc<dyn RandomSource>,
}

impl ExplanationGateway {
    /// Create a gateway; without a generator only the fallback is available
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, random: Arc<dyn RandomSource>) -> Self {
        Self { generator, random }
    }

    /// Pick one concept from the catalog
    pub fn pick_concept(&self) -> &'static str {
        CONCEPTS[self.random.pick_index(CONCEPTS.len()) % CONCEPTS.len()]
    }

    /// Explain a randomly chosen concept using the provider
    ///
    /// Provider failures are returned as-is; nothing is retried or cached.
    pub async fn explain(&self) -> Result<Explanation, ExplainError> {
        let concept = self.pick_concept();
        info!("Randomly selected concept: {}", concept);

        let generator = self.generator.as_ref().ok_or_else(|| {
            error!("Explanation requested but no provider is configured");
            ExplainError::NotConfigured
        })?;

        let text = generator
            .generate(&build_prompt(concept))
            .await
            .map_err(|e| ExplainError::Provider(e.to_string()))?;

        info!("Generated explanation for concept: {}", concept);

        let explanation = if text.trim().is_empty() {
            EMPTY_GENERATION_TEXT.to_string()
        } else {
            text
        };

        Ok(Explanation {
            concept: concept.to_string(),
            explanation,
        })
    }

    /// Canned explanation that never contacts the provider
    pub fn fallback_explain() -> Explanation {
        Explanation {
            concept: FALLBACK_CONCEPT.to_string(),
            explanation: FALLBACK_EXPLANATION.to_string(),
        }
    }
}

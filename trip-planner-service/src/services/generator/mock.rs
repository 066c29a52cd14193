//! Mock generator for tests and model-free development runs.

use super::{FinishReason, Generation, GenerationParams, GeneratorError, TextGenerator};
use async_trait::async_trait;

/// Mock text generator that echoes the prompt back.
pub struct MockTextGenerator {
    enabled: bool,
}

impl MockTextGenerator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, GeneratorError> {
        if !self.enabled {
            return Err(GeneratorError::NotConfigured(
                "Mock generator not enabled".to_string(),
            ));
        }

        let text = format!("Mock itinerary for: {}", prompt);
        let output_tokens = text.split_whitespace().count();

        Ok(Generation {
            candidates: vec![text],
            output_tokens,
            finish_reason: if output_tokens >= params.max_length {
                FinishReason::Length
            } else {
                FinishReason::Complete
            },
        })
    }

    async fn health_check(&self) -> Result<(), GeneratorError> {
        if self.enabled {
            Ok(())
        } else {
            Err(GeneratorError::NotConfigured(
                "Mock generator not enabled".to_string(),
            ))
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

//! Text generation engine abstractions and implementations.
//!
//! The itinerary service talks to a [`TextGenerator`] trait object so the local
//! T5 model can be swapped for the mock engine in tests and development.

pub mod mock;
pub mod t5;

pub use mock::MockTextGenerator;
pub use t5::T5Generator;

use async_trait::async_trait;
use candle_transformers::generation::Sampling;
use thiserror::Error;

/// Candidate pool size used when sampling, as in the Hugging Face generation defaults.
pub const DEFAULT_TOP_K: usize = 50;

/// Error type for generation engine operations.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Inference error: {0}")]
    Inference(#[from] candle_core::Error),

    #[error("Generation task failed: {0}")]
    Task(String),

    #[error("Model returned no candidates")]
    EmptyOutput,
}

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Maximum output length in tokens.
    pub max_length: usize,

    /// Stochastic decoding when true, greedy (argmax) otherwise.
    pub sample: bool,

    /// Sampling temperature, ignored unless `sample` is set.
    pub temperature: f64,

    /// Sample only among the `top_k` most likely tokens; `0` samples the full vocabulary.
    pub top_k: usize,

    /// Fixed RNG seed.
    pub seed: Option<u64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 512,
            sample: true,
            temperature: 0.8,
            top_k: DEFAULT_TOP_K,
            seed: None,
        }
    }
}

impl GenerationParams {
    /// Decoding strategy for the logits processor.
    pub fn sampling(&self) -> Sampling {
        match (self.sample, self.top_k) {
            (false, _) => Sampling::ArgMax,
            (true, 0) => Sampling::All {
                temperature: self.temperature,
            },
            (true, k) => Sampling::TopK {
                k,
                temperature: self.temperature,
            },
        }
    }

    /// Seed for this call: the fixed one, or a fresh random draw.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
}

/// Output of a generation call.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Generated texts; callers use the first.
    pub candidates: Vec<String>,

    /// Tokens produced for the first candidate.
    pub output_tokens: usize,

    pub finish_reason: FinishReason,
}

impl Generation {
    /// Consume the generation, returning the first candidate.
    pub fn into_first(self) -> Result<String, GeneratorError> {
        self.candidates
            .into_iter()
            .next()
            .ok_or(GeneratorError::EmptyOutput)
    }
}

/// A loaded text generation model.
///
/// Implementations are shared across request tasks behind an `Arc` and must
/// tolerate concurrent `generate` calls.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, GeneratorError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), GeneratorError>;

    /// Identifier of the loaded model, for logs.
    fn model_name(&self) -> &str;
}

//! Local T5 text-to-text generator.
//!
//! Weights, config and tokenizer are fetched by model id from the Hugging Face
//! hub (and cached on disk by `hf-hub`), then run on the CPU with candle.

use super::{FinishReason, Generation, GenerationParams, GeneratorError, TextGenerator};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5;
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokenizers::Tokenizer;

/// T5 encoder-decoder loaded once and shared by all requests.
pub struct T5Generator {
    model_id: String,
    engine: Arc<T5Engine>,
}

struct T5Engine {
    model: t5::T5ForConditionalGeneration,
    config: t5::Config,
    tokenizer: Tokenizer,
    device: Device,
}

impl T5Generator {
    /// Download (or reuse the cached copy of) `model_id` at `revision` and load it.
    ///
    /// Blocking: call it from a blocking context.
    pub fn load(model_id: &str, revision: &str) -> Result<Self, GeneratorError> {
        let started = Instant::now();
        let api = Api::new().map_err(|e| GeneratorError::ModelLoad(e.to_string()))?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));
        let fetch = |file: &str| -> Result<PathBuf, GeneratorError> {
            repo.get(file)
                .map_err(|e| GeneratorError::ModelLoad(format!("{}: {}", file, e)))
        };

        let config_path = fetch("config.json")?;
        let tokenizer_path = fetch("tokenizer.json")?;
        let weights_path = fetch("model.safetensors")?;

        let raw_config = std::fs::read_to_string(&config_path)
            .map_err(|e| GeneratorError::ModelLoad(format!("config.json: {}", e)))?;
        let config: t5::Config = serde_json::from_str(&raw_config)
            .map_err(|e| GeneratorError::ModelLoad(format!("config.json: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| GeneratorError::Tokenizer(e.to_string()))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(None)
            .map_err(|e| GeneratorError::Tokenizer(e.to_string()))?;

        let device = Device::Cpu;
        // SAFETY: the weights file lives in the hub cache and is not modified
        // while the process holds the mapping.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
        }
        .map_err(|e| GeneratorError::ModelLoad(e.to_string()))?;
        let model = t5::T5ForConditionalGeneration::load(vb, &config)
            .map_err(|e| GeneratorError::ModelLoad(e.to_string()))?;

        tracing::info!(
            model = %model_id,
            revision = %revision,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded T5 model"
        );

        Ok(Self {
            model_id: model_id.to_string(),
            engine: Arc::new(T5Engine {
                model,
                config,
                tokenizer,
                device,
            }),
        })
    }
}

impl T5Engine {
    fn decoder_start_token(&self) -> u32 {
        self.config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32
    }

    fn run(&self, prompt: &str, params: &GenerationParams) -> Result<Generation, GeneratorError> {
        // Weights are reference-counted; the clone only gives this call its own KV cache.
        let mut model = self.model.clone();
        model.clear_kv_cache();

        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| GeneratorError::Tokenizer(e.to_string()))?;
        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let encoder_output = model.encode(&input_ids)?;

        let mut logits_processor =
            LogitsProcessor::from_sampling(params.resolve_seed(), params.sampling());

        let mut output_ids = vec![self.decoder_start_token()];
        let mut finish_reason = FinishReason::Length;

        while output_ids.len() < params.max_length {
            let decoder_input = if output_ids.len() == 1 || !self.config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };

            let logits = model
                .decode(&decoder_input, &encoder_output)?
                .squeeze(0)?
                .to_dtype(DType::F32)?;
            let next_token = logits_processor.sample(&logits)?;

            if next_token as usize == self.config.eos_token_id {
                finish_reason = FinishReason::Complete;
                break;
            }
            output_ids.push(next_token);
        }

        let generated = &output_ids[1..];
        let text = self
            .tokenizer
            .decode(generated, true)
            .map_err(|e| GeneratorError::Tokenizer(e.to_string()))?;

        Ok(Generation {
            candidates: vec![text],
            output_tokens: generated.len(),
            finish_reason,
        })
    }
}

#[async_trait]
impl TextGenerator for T5Generator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, GeneratorError> {
        let engine = Arc::clone(&self.engine);
        let prompt = prompt.to_owned();
        let params = params.clone();
        let started = Instant::now();

        let generation = tokio::task::spawn_blocking(move || engine.run(&prompt, &params))
            .await
            .map_err(|e| GeneratorError::Task(e.to_string()))??;

        tracing::debug!(
            model = %self.model_id,
            output_tokens = generation.output_tokens,
            finish_reason = ?generation.finish_reason,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "T5 generation finished"
        );

        Ok(generation)
    }

    async fn health_check(&self) -> Result<(), GeneratorError> {
        Ok(())
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}

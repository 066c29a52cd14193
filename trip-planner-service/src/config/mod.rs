use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

use crate::services::generator::GenerationParams;

/// Default hub id of the text-to-text model.
pub const DEFAULT_MODEL_ID: &str = "t5-small";

#[derive(Debug, Clone)]
pub struct TripPlannerConfig {
    pub common: core_config::Config,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub backend: GeneratorBackend,
    /// Model id on the Hugging Face hub (e.g., t5-small)
    pub model_id: String,
    pub revision: String,
    /// Upper bound on generated tokens, decoder start token included
    pub max_length: usize,
    pub sample: bool,
    pub temperature: f64,
    /// Sampling pool size; 0 disables the top-k cut
    pub top_k: usize,
    /// Fixed sampling seed; a fresh one is drawn per call when unset
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorBackend {
    T5,
    Mock,
}

impl FromStr for GeneratorBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "t5" => Ok(GeneratorBackend::T5),
            "mock" => Ok(GeneratorBackend::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown GENERATOR_BACKEND '{}', expected 't5' or 'mock'",
                other
            ))),
        }
    }
}

impl TripPlannerConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let seed = match env::var("GENERATOR_SEED") {
            Ok(raw) => Some(parse_value("GENERATOR_SEED", &raw)?),
            Err(_) => None,
        };

        let temperature: f64 = parse_value(
            "GENERATOR_TEMPERATURE",
            &get_env("GENERATOR_TEMPERATURE", Some("0.8"), is_prod)?,
        )?;
        if temperature <= 0.0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GENERATOR_TEMPERATURE must be positive, got {}",
                temperature
            )));
        }

        let max_length: usize = parse_value(
            "GENERATOR_MAX_LENGTH",
            &get_env("GENERATOR_MAX_LENGTH", Some("512"), is_prod)?,
        )?;
        if max_length == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GENERATOR_MAX_LENGTH must be at least 1"
            )));
        }

        Ok(TripPlannerConfig {
            common: common_config,
            generator: GeneratorConfig {
                backend: get_env("GENERATOR_BACKEND", Some("t5"), is_prod)?.parse()?,
                model_id: get_env("GENERATOR_MODEL_ID", Some(DEFAULT_MODEL_ID), is_prod)?,
                revision: get_env("GENERATOR_REVISION", Some("main"), is_prod)?,
                max_length,
                sample: parse_value(
                    "GENERATOR_SAMPLE",
                    &get_env("GENERATOR_SAMPLE", Some("true"), is_prod)?,
                )?,
                temperature,
                top_k: parse_value(
                    "GENERATOR_TOP_K",
                    &get_env("GENERATOR_TOP_K", Some("50"), is_prod)?,
                )?,
                seed,
            },
        })
    }
}

impl GeneratorConfig {
    /// Sampling configuration applied to every itinerary request.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_length: self.max_length,
            sample: self.sample,
            temperature: self.temperature,
            top_k: self.top_k,
            seed: self.seed,
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("invalid value '{}' for {}: {}", raw, key, e))
    })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("T5".parse::<GeneratorBackend>().unwrap(), GeneratorBackend::T5);
        assert_eq!("mock".parse::<GeneratorBackend>().unwrap(), GeneratorBackend::Mock);
        assert!("gpt".parse::<GeneratorBackend>().is_err());
    }

    #[test]
    fn parse_value_reports_key_on_failure() {
        let err = parse_value::<f64>("GENERATOR_TEMPERATURE", "warm").unwrap_err();
        assert!(err.to_string().contains("GENERATOR_TEMPERATURE"));
        assert_eq!(parse_value::<usize>("GENERATOR_MAX_LENGTH", " 256 ").unwrap(), 256);
        assert!(parse_value::<bool>("GENERATOR_SAMPLE", "true").unwrap());
    }

    #[test]
    fn get_env_falls_back_outside_prod() {
        let value = get_env("TRIP_PLANNER_TEST_UNSET_KEY", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
        assert!(get_env("TRIP_PLANNER_TEST_UNSET_KEY", Some("fallback"), true).is_err());
        assert!(get_env("TRIP_PLANNER_TEST_UNSET_KEY", None, false).is_err());
    }

    #[test]
    fn generation_params_mirror_config() {
        let config = GeneratorConfig {
            backend: GeneratorBackend::Mock,
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: "main".to_string(),
            max_length: 512,
            sample: true,
            temperature: 0.8,
            top_k: 50,
            seed: Some(7),
        };

        let params = config.generation_params();
        assert_eq!(params.max_length, 512);
        assert!(params.sample);
        assert_eq!(params.temperature, 0.8);
        assert_eq!(params.top_k, 50);
        assert_eq!(params.seed, Some(7));
    }
}

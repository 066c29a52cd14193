#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use trip_planner_service::config::TripPlannerConfig;
use trip_planner_service::services::generator::{
    FinishReason, Generation, GenerationParams, GeneratorError, MockTextGenerator, TextGenerator,
};
use trip_planner_service::startup::Application;

/// Generator that records every call and answers with a randomised itinerary,
/// the way a sampling model would.
#[derive(Default)]
pub struct RecordingGenerator {
    pub calls: Mutex<Vec<(String, GenerationParams)>>,
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, GeneratorError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), params.clone()));

        let variant: u32 = rand::random();
        Ok(Generation {
            candidates: vec![
                format!("Day 1: Arrive and explore (variant {})", variant),
                "Day 1: unused second candidate".to_string(),
            ],
            output_tokens: 6,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), GeneratorError> {
        Ok(())
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
}

impl TestApp {
    /// Spawn the application on a random port with the echoing mock generator.
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(MockTextGenerator::new(true))).await
    }

    pub async fn spawn_with(generator: Arc<dyn TextGenerator>) -> Self {
        let mut config = TripPlannerConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing

        let app = Application::build_with_generator(config, generator)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_itinerary(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!(
                "{}/agents/trip-planner/generate-itinerary/",
                self.address
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn trip_body() -> serde_json::Value {
    serde_json::json!({
        "destination": "Reykjavik",
        "start_date": "2024-01-01",
        "end_date": "2024-01-03",
        "interests": ["hiking", "food"],
        "travel_style": "Adventure",
        "preferred_activities": ["Outdoor Activities", "Sightseeing"]
    })
}

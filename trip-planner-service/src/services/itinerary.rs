//! Itinerary generation: trip request -> prompt -> model output.

use crate::dtos::TripRequest;
use crate::services::generator::{GenerationParams, GeneratorError, TextGenerator};
use std::sync::Arc;
use std::time::Instant;

/// Clause every prompt ends with.
pub const PROMPT_SUFFIX: &str = "Give a day-by-day breakdown.";

/// Compose the generation prompt for `request`.
///
/// Deterministic: the same request always yields the same prompt.
pub fn build_prompt(request: &TripRequest) -> String {
    let mut prompt = format!(
        "Create a {}-day travel itinerary to {} for someone interested in {} and prefers {} travel. \
         They want to do activities like {}. ",
        request.trip_days(),
        request.destination,
        request.interests.join(", "),
        request.travel_style,
        request.preferred_activities.join(", "),
    );

    if let Some(budget) = request.budget() {
        prompt.push_str(&format!("The daily budget is ${}. ", budget));
    }

    prompt.push_str(PROMPT_SUFFIX);
    prompt
}

/// Turns trip requests into itineraries using the shared generator.
#[derive(Clone)]
pub struct ItineraryPlanner {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl ItineraryPlanner {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Generate an itinerary; the text of the first candidate is returned verbatim.
    pub async fn plan(&self, request: &TripRequest) -> Result<String, GeneratorError> {
        let days = request.trip_days();
        if days < 1 {
            tracing::warn!(
                start_date = %request.start_date,
                end_date = %request.end_date,
                days,
                "End date precedes start date; using the computed day count as-is"
            );
        }

        let prompt = build_prompt(request);
        let started = Instant::now();

        // Failures are logged once, where the handler maps them to a 500.
        let generation = self.generator.generate(&prompt, &self.params).await?;

        tracing::info!(
            model = %self.generator.model_name(),
            days,
            prompt_len = prompt.len(),
            output_tokens = generation.output_tokens,
            finish_reason = ?generation.finish_reason,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generated itinerary"
        );

        generation.into_first()
    }
}

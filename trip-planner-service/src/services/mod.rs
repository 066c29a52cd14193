pub mod generator;
pub mod itinerary;
pub mod metrics;

pub use generator::{GenerationParams, GeneratorError, TextGenerator};
pub use itinerary::{build_prompt, ItineraryPlanner};
pub use metrics::{get_metrics, init_metrics};

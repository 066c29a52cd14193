//! HTTP handlers for the trip planner service.

pub mod health;
pub mod trip_planner;

pub use health::{health_check, metrics, readiness_check};
pub use trip_planner::{generate_itinerary, trip_planner_status};

/// Route prefix of the trip planner agent.
pub const TRIP_PLANNER_PREFIX: &str = "/agents/trip-planner";

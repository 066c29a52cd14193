pub mod trip;

pub use trip::{ItineraryResponse, StatusResponse, TripRequest};

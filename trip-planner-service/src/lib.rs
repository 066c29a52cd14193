//! Trip planner agent: turns a structured trip description into a generated,
//! day-by-day itinerary.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;

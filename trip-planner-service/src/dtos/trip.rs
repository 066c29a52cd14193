use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /agents/trip-planner/generate-itinerary/`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct TripRequest {
    /// Free text; empty is accepted and rendered as-is
    pub destination: String,
    /// ISO-8601 calendar date (YYYY-MM-DD); datetimes are rejected
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interests: Vec<String>,
    pub travel_style: String,
    pub preferred_activities: Vec<String>,
    /// Absent, `null` and `0` all mean "no budget"
    #[serde(default)]
    pub daily_budget: Option<u64>,
}

impl TripRequest {
    /// Inclusive trip length: `(end - start) + 1` whole days.
    ///
    /// Not clamped; an end date before the start date yields zero or a
    /// negative count.
    pub fn trip_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Daily budget, if one was given and is non-zero.
    pub fn budget(&self) -> Option<u64> {
        self.daily_budget.filter(|budget| *budget > 0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub itinerary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(start: &str, end: &str) -> TripRequest {
        serde_json::from_value(json!({
            "destination": "Lisbon",
            "start_date": start,
            "end_date": end,
            "interests": ["History", "Food"],
            "travel_style": "Budget",
            "preferred_activities": ["Museums"],
        }))
        .unwrap()
    }

    #[test]
    fn trip_days_is_inclusive() {
        assert_eq!(request("2024-01-01", "2024-01-03").trip_days(), 3);
        assert_eq!(request("2024-02-28", "2024-03-01").trip_days(), 3);
        assert_eq!(request("2023-12-31", "2024-01-01").trip_days(), 2);
    }

    #[test]
    fn same_day_trip_is_one_day() {
        assert_eq!(request("2024-06-15", "2024-06-15").trip_days(), 1);
    }

    #[test]
    fn inverted_dates_are_not_clamped() {
        assert_eq!(request("2024-01-05", "2024-01-04").trip_days(), 0);
        assert_eq!(request("2024-01-05", "2024-01-01").trip_days(), -3);
    }

    #[test]
    fn budget_is_optional() {
        let trip = request("2024-01-01", "2024-01-02");
        assert_eq!(trip.daily_budget, None);
        assert_eq!(trip.budget(), None);

        let with_null: TripRequest = serde_json::from_value(json!({
            "destination": "Lisbon",
            "start_date": "2024-01-01",
            "end_date": "2024-01-02",
            "interests": [],
            "travel_style": "Budget",
            "preferred_activities": [],
            "daily_budget": null,
        }))
        .unwrap();
        assert_eq!(with_null.budget(), None);
    }

    #[test]
    fn zero_budget_counts_as_absent() {
        let trip = TripRequest {
            daily_budget: Some(0),
            ..request("2024-01-01", "2024-01-02")
        };
        assert_eq!(trip.budget(), None);

        let trip = TripRequest {
            daily_budget: Some(150),
            ..request("2024-01-01", "2024-01-02")
        };
        assert_eq!(trip.budget(), Some(150));
    }

    #[test]
    fn rejects_malformed_dates() {
        let result: Result<TripRequest, _> = serde_json::from_value(json!({
            "destination": "Lisbon",
            "start_date": "01/02/2024",
            "end_date": "2024-01-03",
            "interests": [],
            "travel_style": "Budget",
            "preferred_activities": [],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_budget() {
        let result: Result<TripRequest, _> = serde_json::from_value(json!({
            "destination": "Lisbon",
            "start_date": "2024-01-01",
            "end_date": "2024-01-03",
            "interests": [],
            "travel_style": "Budget",
            "preferred_activities": [],
            "daily_budget": -20,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn requires_list_fields() {
        let result: Result<TripRequest, _> = serde_json::from_value(json!({
            "destination": "Lisbon",
            "start_date": "2024-01-01",
            "end_date": "2024-01-03",
            "travel_style": "Budget",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_text_fields_pass_validation() {
        let trip = TripRequest {
            destination: String::new(),
            travel_style: String::new(),
            ..request("2024-01-01", "2024-01-02")
        };
        assert!(trip.validate().is_ok());
    }

    #[test]
    fn rejects_datetime_strings() {
        let result: Result<TripRequest, _> = serde_json::from_value(json!({
            "destination": "Lisbon",
            "start_date": "2024-01-01T09:00:00",
            "end_date": "2024-01-03",
            "interests": [],
            "travel_style": "Budget",
            "preferred_activities": [],
        }));
        assert!(result.is_err());
    }
}

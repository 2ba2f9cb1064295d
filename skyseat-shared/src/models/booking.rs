use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One submitted booking: a trip plus the passengers travelling on it.
///
/// `passengers` stays untyped so that a single bad entry does not reject
/// the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub from_city: String,
    #[serde(default)]
    pub to_city: String,
    #[serde(default)]
    pub selected_flight: String,
    #[serde(default)]
    pub travel_type: Option<String>,
    #[serde(default)]
    pub passengers: Vec<Value>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl BookingDocument {
    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }
}

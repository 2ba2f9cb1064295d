use serde_json::Number;
use skyseat_shared::{BookingDocument, PassengerRecord};
use std::collections::HashSet;
use tracing::{debug, info};

/// Travel type applied when a booking does not name one.
pub const DEFAULT_TRAVEL_TYPE: &str = "solo";

/// Turn booking documents into passenger records for allocation.
///
/// Each passenger takes the booking's travel type, submission time (epoch
/// milliseconds) and id. Bookings without passengers and passengers without a
/// name are skipped.
pub fn flatten_bookings(bookings: &[BookingDocument]) -> Vec<PassengerRecord> {
    let mut records = Vec::new();
    let mut used = 0;

    for booking in bookings {
        if booking.passenger_count() == 0 {
            debug!("Booking {} has no passengers", booking.id.as_deref().unwrap_or("?"));
            continue;
        }
        used += 1;

        let travel_type = booking
            .travel_type
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TRAVEL_TYPE.to_string());
        let timestamp = booking.timestamp.map(|t| Number::from(t.timestamp_millis()));

        for value in &booking.passengers {
            let Some(mut record) = PassengerRecord::from_value(value.clone()) else {
                continue;
            };
            if record.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                continue;
            }

            record.travel_type = Some(travel_type.clone());
            if timestamp.is_some() {
                record.timestamp = timestamp.clone();
            }
            if booking.id.is_some() {
                record.booking_id = booking.id.clone();
            }
            records.push(record);
        }
    }

    info!("Fetched {} passengers from {} bookings", records.len(), used);
    records
}

/// Stored passengers followed by local ones whose names are not taken yet.
/// Names match after trimming, as they do once admitted.
pub fn merge_passengers(stored: Vec<PassengerRecord>, local: Vec<PassengerRecord>) -> Vec<PassengerRecord> {
    let mut names: HashSet<String> = stored.iter().filter_map(trimmed_name).collect();
    let mut merged = stored;

    for record in local {
        let fresh = trimmed_name(&record).is_some_and(|n| names.insert(n));
        if fresh {
            merged.push(record);
        } else {
            debug!("Local passenger {:?} already present", record.name);
        }
    }
    merged
}

fn trimmed_name(record: &PassengerRecord) -> Option<String> {
    record.name.as_deref().map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}

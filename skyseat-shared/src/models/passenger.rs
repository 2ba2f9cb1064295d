use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Age as it arrives from booking intake: either a JSON number or free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AgeValue {
    Number(Number),
    Text(String),
}

impl AgeValue {
    /// Whole years, if the value reads as a non-negative number.
    pub fn years(&self) -> Option<u32> {
        match self {
            AgeValue::Number(n) => {
                if let Some(v) = n.as_u64() {
                    u32::try_from(v).ok()
                } else {
                    n.as_f64().and_then(whole_years)
                }
            }
            AgeValue::Text(s) => {
                let s = s.trim();
                s.parse::<u32>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_years))
            }
        }
    }

    /// Intake forms submit an empty string when the field was never filled.
    pub fn is_blank(&self) -> bool {
        matches!(self, AgeValue::Text(s) if s.trim().is_empty())
    }
}

fn whole_years(v: f64) -> Option<u32> {
    if v.is_finite() && v >= 0.0 && v < u32::MAX as f64 {
        Some(v.trunc() as u32)
    } else {
        None
    }
}

impl From<u32> for AgeValue {
    fn from(years: u32) -> Self {
        AgeValue::Number(Number::from(years))
    }
}

/// A raw passenger record as supplied by the booking side.
///
/// Every field is optional on the wire; validation happens when the record is
/// admitted into an allocation run. Fields this model does not know about are
/// kept in `extra` so they survive into the assignment table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<AgeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Booking time in epoch milliseconds. Any JSON number, fractions included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PassengerRecord {
    /// Decode one element of an untyped passenger list.
    ///
    /// Anything that is not a JSON object, or whose known fields have the wrong
    /// shape, yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    pub fn solo(name: &str, age: u32) -> Self {
        Self {
            name: Some(name.to_string()),
            age: Some(AgeValue::from(age)),
            gender: Some(String::new()),
            disability: Some("No".to_string()),
            travel_type: Some("solo".to_string()),
            ..Default::default()
        }
    }

    pub fn family(name: &str, age: u32, booking_id: &str) -> Self {
        Self {
            travel_type: Some("family".to_string()),
            booking_id: Some(booking_id.to_string()),
            ..Self::solo(name, age)
        }
    }

    pub fn with_disability(mut self) -> Self {
        self.disability = Some("Yes".to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(Number::from(timestamp));
        self
    }

    /// Booking time for ordering; records without one sort first.
    pub fn booking_time(&self) -> f64 {
        self.timestamp.as_ref().and_then(Number::as_f64).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_age_forms() {
        assert_eq!(AgeValue::from(25u32).years(), Some(25));
        assert_eq!(AgeValue::Text(" 29 ".into()).years(), Some(29));
        assert_eq!(AgeValue::Text("29.9".into()).years(), Some(29));
        assert_eq!(AgeValue::Text("abc".into()).years(), None);
        assert!(AgeValue::Text("".into()).is_blank());
        assert!(!AgeValue::Text("abc".into()).is_blank());
    }

    #[test]
    fn test_from_value_keeps_unknown_fields() {
        let record = PassengerRecord::from_value(json!({
            "name": "Asha",
            "age": "34",
            "gender": "F",
            "disability": "No",
            "travelType": "family",
            "bookingId": "bk-1",
            "timestamp": 1700000000000i64,
            "lastUpdated": 5
        }))
        .unwrap();

        assert_eq!(record.name.as_deref(), Some("Asha"));
        assert_eq!(record.travel_type.as_deref(), Some("family"));
        assert_eq!(record.extra.get("lastUpdated"), Some(&json!(5)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["bookingId"], json!("bk-1"));
        assert_eq!(back["lastUpdated"], json!(5));
    }

    #[test]
    fn test_fractional_timestamp_is_kept() {
        let record = PassengerRecord::from_value(json!({
            "name": "Asha",
            "age": 30,
            "timestamp": 1717230000000.5
        }))
        .unwrap();
        assert_eq!(record.booking_time(), 1717230000000.5);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["timestamp"], json!(1717230000000.5));
        assert_eq!(PassengerRecord::solo("Ravi", 30).with_timestamp(7).booking_time(), 7.0);
        assert_eq!(PassengerRecord::solo("Ravi", 30).booking_time(), 0.0);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(PassengerRecord::from_value(json!("Asha")).is_none());
        assert!(PassengerRecord::from_value(json!(null)).is_none());
        assert!(PassengerRecord::from_value(json!({ "name": 12 })).is_none());
    }
}

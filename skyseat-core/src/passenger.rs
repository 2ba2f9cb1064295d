use serde::{Serialize, Serializer};
use serde_json::Number;
use skyseat_shared::PassengerRecord;
use std::ops::Range;

/// Ages that may sit in the emergency-exit row.
pub const EXIT_ROW_AGES: Range<u32> = 18..30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelType {
    Solo,
    Family,
}

impl TravelType {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") => Some(TravelType::Solo),
            Some(s) if s.eq_ignore_ascii_case("solo") => Some(TravelType::Solo),
            Some(s) if s.eq_ignore_ascii_case("family") => Some(TravelType::Family),
            Some(_) => None,
        }
    }
}

/// A passenger admitted into an allocation run.
///
/// Keeps the original record so the assignment table can echo every field the
/// booking side sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub name: String,
    pub age: Option<u32>,
    pub disabled: bool,
    pub travel_type: TravelType,
    pub booking_id: Option<String>,
    pub timestamp: Option<Number>,
    record: PassengerRecord,
}

impl Passenger {
    /// Validate a raw record. Records without a name, with an unreadable age or
    /// with an unknown travel type are not admitted.
    pub fn admit(record: PassengerRecord) -> Option<Self> {
        let name = record.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?.to_string();

        let age = match &record.age {
            None => None,
            Some(a) if a.is_blank() => None,
            Some(a) => Some(a.years()?),
        };

        let travel_type = TravelType::parse(record.travel_type.as_deref())?;
        let disabled = record.disability.as_deref() == Some("Yes");
        let booking_id = record.booking_id.clone().filter(|id| !id.trim().is_empty());

        Some(Self {
            name,
            age,
            disabled,
            travel_type,
            booking_id,
            timestamp: record.timestamp.clone(),
            record,
        })
    }

    pub fn record(&self) -> &PassengerRecord {
        &self.record
    }

    pub fn is_solo(&self) -> bool {
        self.travel_type == TravelType::Solo
    }

    pub fn is_young(&self) -> bool {
        self.age.is_some_and(|a| EXIT_ROW_AGES.contains(&a))
    }

    /// Solo travellers aged 18 to 29 are the ones placed at the exit row.
    pub fn is_exit_eligible(&self) -> bool {
        self.is_solo() && self.is_young()
    }
}

/// Serializes as the record it was admitted from.
impl Serialize for Passenger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.record.serialize(serializer)
    }
}

use crate::passenger::{Passenger, TravelType};
use serde_json::Value;
use skyseat_shared::PassengerRecord;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Display colors handed to family groups in discovery order.
pub const FAMILY_COLORS: [&str; 10] = [
    "#FF9AA2", // Soft red
    "#FFB7B2", // Salmon
    "#FFDAC1", // Peach
    "#E2F0CB", // Light green
    "#B5EAD7", // Mint
    "#C7CEEA", // Light blue
    "#9BB7D4", // Steel blue
    "#B5B9FF", // Lavender
    "#DCD3FF", // Light purple
    "#F7D794", // Light yellow
];

/// Grouping key for family travellers who arrive with neither booking id nor timestamp.
pub const UNBOOKED_FAMILY_KEY: &str = "unbooked";

/// Family travellers sharing one booking.
#[derive(Debug, Clone)]
pub struct FamilyGroup {
    pub id: String,
    pub key: String,
    pub color: &'static str,
    pub members: Vec<Passenger>,
    pub disabled_count: usize,
}

impl FamilyGroup {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn has_disabled_member(&self) -> bool {
        self.disabled_count > 0
    }

    /// Rows a row-block placement needs at three seats per side.
    pub fn rows_needed(&self) -> usize {
        self.size().div_ceil(3)
    }
}

/// Passengers partitioned into the classes the allocator consumes, each in
/// processing order.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub families: Vec<FamilyGroup>,
    pub disabled_solos: Vec<Passenger>,
    pub young_solos: Vec<Passenger>,
    pub remaining_solos: Vec<Passenger>,
    /// Records that failed validation.
    pub dropped: usize,
    /// Names seen again after their first record.
    pub duplicates: Vec<String>,
}

impl Manifest {
    pub fn passenger_count(&self) -> usize {
        self.families.iter().map(FamilyGroup::size).sum::<usize>()
            + self.disabled_solos.len()
            + self.young_solos.len()
            + self.remaining_solos.len()
    }
}

/// Classify an untyped passenger list; non-object entries count as dropped.
pub fn classify_values(values: Vec<Value>) -> Manifest {
    let total = values.len();
    let records: Vec<PassengerRecord> = values.into_iter().filter_map(PassengerRecord::from_value).collect();
    let unreadable = total - records.len();

    let mut manifest = classify(records);
    manifest.dropped += unreadable;
    manifest
}

pub fn classify(records: impl IntoIterator<Item = PassengerRecord>) -> Manifest {
    let mut dropped = 0;
    let mut admitted = Vec::new();
    for record in records {
        match Passenger::admit(record) {
            Some(p) => admitted.push(p),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!("Dropped {} malformed passenger records", dropped);
    }

    // Booking order; the sort is stable so equal timestamps keep input order.
    admitted.sort_by(|a, b| a.record().booking_time().total_cmp(&b.record().booking_time()));

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    admitted.retain(|p| {
        if seen.insert(p.name.clone()) {
            true
        } else {
            warn!("Duplicate passenger name {}, keeping the earliest booking", p.name);
            duplicates.push(p.name.clone());
            false
        }
    });

    let mut families: Vec<FamilyGroup> = Vec::new();
    let mut family_index: HashMap<String, usize> = HashMap::new();
    let mut disabled_solos = Vec::new();
    let mut young_solos = Vec::new();
    let mut remaining_solos = Vec::new();

    for passenger in admitted {
        match passenger.travel_type {
            TravelType::Family => {
                let key = family_key(&passenger);
                let idx = *family_index.entry(key.clone()).or_insert_with(|| {
                    let n = families.len();
                    families.push(FamilyGroup {
                        id: format!("family-{}", n + 1),
                        key,
                        color: FAMILY_COLORS[n % FAMILY_COLORS.len()],
                        members: Vec::new(),
                        disabled_count: 0,
                    });
                    n
                });
                let group = &mut families[idx];
                if passenger.disabled {
                    group.disabled_count += 1;
                }
                group.members.push(passenger);
            }
            TravelType::Solo if passenger.disabled => disabled_solos.push(passenger),
            TravelType::Solo if passenger.is_young() => young_solos.push(passenger),
            TravelType::Solo => remaining_solos.push(passenger),
        }
    }

    // Hardest groups first: any disabled member, then more disabled members,
    // then larger groups. Stable, so ties stay in discovery order.
    families.sort_by(|a, b| {
        b.has_disabled_member()
            .cmp(&a.has_disabled_member())
            .then(b.disabled_count.cmp(&a.disabled_count))
            .then(b.size().cmp(&a.size()))
    });

    debug!(
        "Classified {} families, {} disabled solos, {} young solos, {} other solos",
        families.len(),
        disabled_solos.len(),
        young_solos.len(),
        remaining_solos.len()
    );

    Manifest {
        families,
        disabled_solos,
        young_solos,
        remaining_solos,
        dropped,
        duplicates,
    }
}

fn family_key(passenger: &Passenger) -> String {
    match (&passenger.booking_id, &passenger.timestamp) {
        (Some(id), _) => id.clone(),
        (None, Some(ts)) => format!("ts:{}", ts),
        (None, None) => UNBOOKED_FAMILY_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(ps: &[Passenger]) -> Vec<&str> {
        ps.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_partition_into_classes() {
        let manifest = classify(vec![
            PassengerRecord::solo("Old", 55),
            PassengerRecord::solo("Young", 22),
            PassengerRecord::solo("Wheel", 25).with_disability(),
            PassengerRecord::family("Mum", 40, "bk-1"),
            PassengerRecord::family("Kid", 8, "bk-1"),
        ]);

        assert_eq!(manifest.families.len(), 1);
        assert_eq!(manifest.families[0].size(), 2);
        assert_eq!(names(&manifest.disabled_solos), vec!["Wheel"]);
        assert_eq!(names(&manifest.young_solos), vec!["Young"]);
        assert_eq!(names(&manifest.remaining_solos), vec!["Old"]);
        assert_eq!(manifest.passenger_count(), 5);
    }

    #[test]
    fn test_booking_order_by_timestamp() {
        let manifest = classify(vec![
            PassengerRecord::solo("Late", 50).with_timestamp(300),
            PassengerRecord::solo("Early", 50).with_timestamp(100),
            PassengerRecord::solo("Middle", 50).with_timestamp(200),
            PassengerRecord::solo("Undated", 50),
        ]);

        assert_eq!(names(&manifest.remaining_solos), vec!["Undated", "Early", "Middle", "Late"]);
    }

    #[test]
    fn test_family_colors_follow_discovery_order() {
        let manifest = classify(vec![
            PassengerRecord::family("B1", 30, "b").with_timestamp(2),
            PassengerRecord::family("A1", 30, "a").with_timestamp(1),
            PassengerRecord::family("A2", 30, "a").with_timestamp(1),
        ]);

        // "a" is discovered first after sorting, and is also the larger group.
        let a = &manifest.families[0];
        assert_eq!(a.key, "a");
        assert_eq!(a.id, "family-1");
        assert_eq!(a.color, FAMILY_COLORS[0]);

        let b = &manifest.families[1];
        assert_eq!(b.id, "family-2");
        assert_eq!(b.color, FAMILY_COLORS[1]);
    }

    #[test]
    fn test_family_priority_order() {
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(PassengerRecord::family(&format!("big{}", i), 30, "big"));
        }
        records.push(PassengerRecord::family("one-d", 30, "one").with_disability());
        records.push(PassengerRecord::family("one-x", 30, "one"));
        records.push(PassengerRecord::family("two-d1", 30, "two").with_disability());
        records.push(PassengerRecord::family("two-d2", 30, "two").with_disability());

        let manifest = classify(records);
        let keys: Vec<&str> = manifest.families.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["two", "one", "big"]);
        assert_eq!(manifest.families[0].disabled_count, 2);
        assert!(!manifest.families[2].has_disabled_member());
        assert_eq!(manifest.families[2].rows_needed(), 2);
    }

    #[test]
    fn test_family_key_fallbacks() {
        let mut by_ts = PassengerRecord::family("T1", 30, "x").with_timestamp(77);
        by_ts.booking_id = None;
        let mut by_ts2 = by_ts.clone();
        by_ts2.name = Some("T2".into());
        let mut loose = PassengerRecord::family("L", 30, "x");
        loose.booking_id = Some("  ".into());

        let manifest = classify(vec![by_ts, by_ts2, loose]);
        let keys: Vec<&str> = manifest.families.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["ts:77", UNBOOKED_FAMILY_KEY]);
    }

    #[test]
    fn test_duplicates_and_malformed_records() {
        let manifest = classify_values(vec![
            json!({ "name": "Sam", "age": 40, "travelType": "solo", "timestamp": 5 }),
            json!({ "name": "Sam", "age": 41, "travelType": "solo", "timestamp": 9 }),
            json!({ "age": 40 }),
            json!(42),
            json!({ "name": "Bad", "age": "n/a" }),
        ]);

        assert_eq!(manifest.remaining_solos.len(), 1);
        assert_eq!(manifest.remaining_solos[0].age, Some(40));
        assert_eq!(manifest.duplicates, vec!["Sam".to_string()]);
        assert_eq!(manifest.dropped, 3);
    }

    #[test]
    fn test_fractional_timestamps_sort_with_whole_ones() {
        let manifest = classify_values(vec![
            json!({ "name": "Asha", "age": 40, "timestamp": 1717230000000.5 }),
            json!({ "name": "Ravi", "age": 40, "timestamp": 1717230000000i64 }),
            json!({ "name": "Mo", "age": 40, "timestamp": 1717230000001i64 }),
        ]);

        assert_eq!(manifest.dropped, 0);
        assert_eq!(names(&manifest.remaining_solos), vec!["Ravi", "Asha", "Mo"]);
    }
}

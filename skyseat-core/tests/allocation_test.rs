use serde_json::json;
use skyseat_core::classifier::classify;
use skyseat_core::{allocate, allocate_values, SeatAllocator, SeatGrid, UnseatedReason};
use skyseat_shared::PassengerRecord;

fn seat_of(allocation: &skyseat_core::Allocation, name: &str) -> Option<String> {
    allocation.table.find(name).map(|a| a.seat_label.to_string())
}

#[test]
fn test_disabled_solo_gets_back_aisle_seat() {
    let allocation = allocate(vec![PassengerRecord::solo("Wheel", 60).with_disability()]);

    assert_eq!(allocation.table.len(), 120);
    assert_eq!(seat_of(&allocation, "Wheel").as_deref(), Some("20C"));
    assert!(allocation.report.is_clean());
}

#[test]
fn test_family_of_four_sits_mid_cabin() {
    let records: Vec<PassengerRecord> = ["Dad", "Mum", "Kid", "Baby"]
        .iter()
        .map(|n| PassengerRecord::family(n, 30, "bk-42"))
        .collect();
    let allocation = allocate(records);

    let seats: Vec<String> = ["Dad", "Mum", "Kid", "Baby"]
        .iter()
        .filter_map(|n| seat_of(&allocation, n))
        .collect();
    assert_eq!(seats, vec!["9A", "9B", "9C", "10A"]);

    let colors: Vec<_> = allocation.table.occupied().map(|a| a.family_color.clone()).collect();
    assert!(colors.iter().all(|c| c.as_deref() == Some("#FF9AA2")));
    assert!(allocation.table.occupied().all(|a| a.family_id.as_deref() == Some("family-1")));
    assert!(allocation.report.relaxed.is_empty());
}

#[test]
fn test_disabled_family_takes_back_band() {
    let allocation = allocate(vec![
        PassengerRecord::family("Gran", 80, "bk-1").with_disability(),
        PassengerRecord::family("Son", 50, "bk-1"),
        PassengerRecord::family("Grandkid", 10, "bk-1"),
        PassengerRecord::solo("Wheel", 60).with_disability(),
    ]);

    assert_eq!(seat_of(&allocation, "Gran").as_deref(), Some("20A"));
    assert_eq!(seat_of(&allocation, "Son").as_deref(), Some("20B"));
    assert_eq!(seat_of(&allocation, "Grandkid").as_deref(), Some("20C"));
    // 20C is gone, so the disabled solo takes the next aisle seat at the back
    assert_eq!(seat_of(&allocation, "Wheel").as_deref(), Some("20D"));
}

#[test]
fn test_eviction_through_full_run() {
    let mut allocator = SeatAllocator::new();
    let near: Vec<_> = SeatGrid::standard()
        .seats()
        .iter()
        .filter(|s| s.near_toilet)
        .map(|s| s.label)
        .collect();
    for (i, label) in near.into_iter().enumerate() {
        allocator
            .pin_record(PassengerRecord::solo(&format!("held{}", i), 40), label)
            .unwrap();
    }

    let allocation = allocator.run(classify(vec![
        PassengerRecord::family("Pat", 70, "bk-3").with_disability(),
        PassengerRecord::family("Sam", 40, "bk-3"),
    ]));

    assert_eq!(seat_of(&allocation, "Pat").as_deref(), Some("1A"));
    assert_eq!(seat_of(&allocation, "Sam").as_deref(), Some("1B"));
    assert_eq!(seat_of(&allocation, "held0").as_deref(), Some("5A"));
    assert_eq!(seat_of(&allocation, "held1").as_deref(), Some("5B"));
    assert_eq!(allocation.report.evictions.len(), 2);
    assert_eq!(allocation.summary.seated, 50);
}

#[test]
fn test_young_solos_beyond_exit_row_fall_through() {
    let records: Vec<PassengerRecord> = (0..8)
        .map(|i| PassengerRecord::solo(&format!("y{}", i), 20 + i).with_timestamp(i as i64))
        .collect();
    let allocation = allocate(records);

    for i in 0..6 {
        let seat = seat_of(&allocation, &format!("y{}", i)).unwrap();
        assert!(seat.starts_with("11"), "y{} sat at {}", i, seat);
    }
    assert_eq!(seat_of(&allocation, "y6").as_deref(), Some("5A"));
    assert_eq!(seat_of(&allocation, "y7").as_deref(), Some("5B"));
    assert_eq!(allocation.report.displaced, 2);
    assert_eq!(allocation.summary.exit_row_occupied, 6);
}

#[test]
fn test_more_passengers_than_seats() {
    let records: Vec<PassengerRecord> = (0..130)
        .map(|i| PassengerRecord::solo(&format!("p{}", i), 45).with_timestamp(i))
        .collect();
    let allocation = allocate(records);

    assert_eq!(allocation.table.len(), 120);
    assert_eq!(allocation.table.seated_count(), 120);
    for i in 0..120 {
        assert!(allocation.table.contains(&format!("p{}", i)));
    }

    let unseated: Vec<&str> = allocation.report.unseated.iter().map(|u| u.name.as_str()).collect();
    let expected: Vec<String> = (120..130).map(|i| format!("p{}", i)).collect();
    assert_eq!(unseated, expected);
    assert!(allocation
        .report
        .unseated
        .iter()
        .all(|u| u.reason == UnseatedReason::Exhausted));
    assert_eq!(allocation.summary.empty, 0);
}

#[test]
fn test_json_in_json_out() {
    let allocation = allocate_values(vec![
        json!({ "name": "Asha", "age": "27", "gender": "F", "disability": "No", "travelType": "solo", "meal": "veg" }),
        json!({ "name": "Lee", "age": 61, "gender": "M", "disability": "Yes", "travelType": "solo" }),
        json!({ "name": "", "age": 30 }),
        json!("not a passenger"),
    ]);

    assert_eq!(allocation.report.dropped, 2);
    assert!(!allocation.report.is_clean());

    let table = serde_json::to_value(&allocation.table).unwrap();
    let slots = table.as_array().unwrap();
    assert_eq!(slots.len(), 120);

    let asha = slots.iter().find(|s| s["name"] == "Asha").unwrap();
    assert_eq!(asha["seatLabel"], "11A");
    assert_eq!(asha["seatNumber"], 61);
    assert_eq!(asha["age"], "27");
    assert_eq!(asha["meal"], "veg");
    assert!(asha.get("familyColor").is_none());

    let lee = slots.iter().find(|s| s["name"] == "Lee").unwrap();
    assert_eq!(lee["seatLabel"], "20C");
}

#[test]
fn test_fractional_timestamp_passenger_is_seated() {
    let allocation = allocate_values(vec![
        json!({ "name": "Asha", "age": 40, "travelType": "solo", "timestamp": 1717230000000.5 }),
        json!({ "name": "Ravi", "age": 40, "travelType": "solo", "timestamp": 1717230000000i64 }),
    ]);

    assert_eq!(allocation.report.dropped, 0);
    assert_eq!(seat_of(&allocation, "Ravi").as_deref(), Some("5A"));
    assert_eq!(seat_of(&allocation, "Asha").as_deref(), Some("5B"));
    let asha = serde_json::to_value(allocation.table.find("Asha").unwrap()).unwrap();
    assert_eq!(asha["timestamp"], json!(1717230000000.5));
}

#[test]
fn test_duplicate_names_are_reported() {
    let allocation = allocate(vec![
        PassengerRecord::solo("Twin", 40).with_timestamp(1),
        PassengerRecord::solo("Twin", 41).with_timestamp(2),
    ]);

    assert_eq!(allocation.table.seated_count(), 1);
    assert_eq!(allocation.report.unseated.len(), 1);
    assert_eq!(allocation.report.unseated[0].reason, UnseatedReason::DuplicateName);
}

#[test]
fn test_rerun_is_identical() {
    let mut records = Vec::new();
    for i in 0..30 {
        records.push(PassengerRecord::solo(&format!("s{}", i), 15 + i * 2).with_timestamp(i as i64));
    }
    for i in 0..5 {
        records.push(PassengerRecord::family(&format!("f{}", i), 35, "bk-a"));
    }
    records.push(PassengerRecord::family("fd", 70, "bk-b").with_disability());
    records.push(PassengerRecord::solo("wd", 33).with_disability());

    let first = allocate(records.clone());
    let second = allocate(records);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.table).unwrap(),
        serde_json::to_string(&second.table).unwrap()
    );
}

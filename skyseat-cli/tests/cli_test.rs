use serde_json::{json, Value};
use skyseat_store::app_config::{Config, OutputConfig, SourceConfig};
use std::path::PathBuf;

fn write_bookings(tag: &str, bookings: Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!("skyseat-cli-{}-{}.json", tag, std::process::id()));
    std::fs::write(&path, bookings.to_string()).unwrap();
    path
}

fn config(path: &PathBuf, include_empty: bool) -> Config {
    Config {
        source: SourceConfig {
            bookings_path: path.to_string_lossy().into_owned(),
        },
        output: OutputConfig {
            pretty: false,
            include_empty,
        },
    }
}

fn bookings() -> Value {
    json!({
        "doc-a": {
            "fromCity": "Delhi",
            "toCity": "Pune",
            "selectedFlight": "AI-101",
            "travelType": "family",
            "timestamp": "2024-06-01T08:00:00Z",
            "passengers": [
                { "name": "Meera", "age": "44", "gender": "F", "disability": "No" },
                { "name": "Arjun", "age": "12", "gender": "M", "disability": "No" },
                { "name": "Isha", "age": "9", "gender": "F", "disability": "No" }
            ]
        },
        "doc-b": {
            "travelType": "solo",
            "timestamp": "2024-06-01T09:00:00Z",
            "passengers": [{ "name": "Kabir", "age": "24", "gender": "M", "disability": "No" }]
        }
    })
}

#[tokio::test]
async fn test_full_seat_map() {
    let path = write_bookings("full", bookings());
    let out = skyseat_cli::run(&config(&path, true)).await.unwrap();
    std::fs::remove_file(&path).unwrap();

    let slots: Vec<Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(slots.len(), 120);

    let meera = slots.iter().find(|s| s["name"] == "Meera").unwrap();
    assert_eq!(meera["seatLabel"], "10A");
    assert_eq!(meera["familyId"], "family-1");
    assert_eq!(meera["bookingId"], "doc-a");

    let kabir = slots.iter().find(|s| s["name"] == "Kabir").unwrap();
    assert_eq!(kabir["seatLabel"], "11A");
}

#[tokio::test]
async fn test_occupied_only() {
    let path = write_bookings("occupied", bookings());
    let out = skyseat_cli::run(&config(&path, false)).await.unwrap();
    std::fs::remove_file(&path).unwrap();

    let slots: Vec<Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(slots.len(), 4);
    assert!(slots.iter().all(|s| !s.is_null()));
}

#[tokio::test]
async fn test_missing_bookings_file() {
    let path = PathBuf::from("/nonexistent/skyseat/bookings.json");
    assert!(skyseat_cli::run(&config(&path, true)).await.is_err());
}

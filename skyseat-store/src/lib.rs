pub mod app_config;
pub mod intake;
pub mod service;
pub mod source;

pub use intake::{flatten_bookings, merge_passengers};
pub use service::SeatMapService;
pub use source::{BookingSource, InMemoryBookingSource, JsonFileSource};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid booking source: {0}")]
    InvalidSource(String),
    #[error("Booking not found: {0}")]
    NotFound(String),
}

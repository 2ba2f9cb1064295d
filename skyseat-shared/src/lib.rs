pub mod models;

pub use models::booking::BookingDocument;
pub use models::passenger::{AgeValue, PassengerRecord};

pub mod booking;
pub mod passenger;

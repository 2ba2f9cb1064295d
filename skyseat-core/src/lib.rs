pub mod classifier;
pub mod engine;
pub mod layout;
pub mod passenger;
pub mod pool;
pub mod report;
pub mod strategy;
pub mod table;

pub use classifier::{classify, classify_values, FamilyGroup, Manifest};
pub use engine::{allocate, allocate_values, Allocation, SeatAllocator};
pub use layout::{Seat, SeatGrid, SeatLabel};
pub use passenger::Passenger;
pub use pool::{PoolError, SeatPool, Zone};
pub use report::{AllocationReport, OccupancySummary, UnseatedReason};
pub use table::{AssignedSeat, AssignmentTable};

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("Seat pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("Passenger already seated: {0}")]
    AlreadySeated(String),
    #[error("Invalid passenger record: {0}")]
    InvalidPassenger(String),
    #[error("Seat already holds a passenger: {0}")]
    SeatOccupied(String),
    #[error("No passenger in seat: {0}")]
    EmptySeat(String),
    #[error("Family {family} needs {expected} seats, search returned {found}")]
    SeatCount {
        family: String,
        expected: usize,
        found: usize,
    },
}

pub type AllocationResult<T> = Result<T, AllocationError>;

use crate::intake::{flatten_bookings, merge_passengers};
use crate::source::BookingSource;
use crate::StoreError;
use skyseat_core::{allocate, Allocation};
use skyseat_shared::PassengerRecord;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Keeps the current seat map for a booking source.
///
/// Each refresh reads every booking again and reallocates from scratch; the
/// new result replaces the previous one.
pub struct SeatMapService {
    source: Arc<dyn BookingSource>,
    local: RwLock<Vec<PassengerRecord>>,
    latest: RwLock<Option<Arc<Allocation>>>,
}

impl SeatMapService {
    pub fn new(source: Arc<dyn BookingSource>) -> Self {
        Self {
            source,
            local: RwLock::new(Vec::new()),
            latest: RwLock::new(None),
        }
    }

    /// Passengers supplied by the caller rather than the source, for example
    /// a booking still being entered.
    pub async fn set_local_passengers(&self, records: Vec<PassengerRecord>) {
        *self.local.write().await = records;
    }

    pub async fn refresh(&self) -> Result<Arc<Allocation>, StoreError> {
        let bookings = match self.source.fetch_bookings().await {
            Ok(bookings) => bookings,
            Err(e) => {
                error!("Failed to fetch bookings, keeping previous seat map: {}", e);
                return Err(e);
            }
        };

        let stored = flatten_bookings(&bookings);
        let local = self.local.read().await.clone();
        let records = merge_passengers(stored, local);

        let allocation = Arc::new(allocate(records));
        info!(
            "Seat map refreshed: {}/{} seats taken",
            allocation.summary.seated, allocation.summary.total_seats
        );

        *self.latest.write().await = Some(allocation.clone());
        Ok(allocation)
    }

    pub async fn latest(&self) -> Option<Arc<Allocation>> {
        self.latest.read().await.clone()
    }
}

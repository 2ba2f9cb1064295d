use crate::layout::{Seat, SeatGrid, SeatLabel};
use std::collections::BTreeSet;

/// Sub-views of the pool that searches draw candidates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Anywhere,
    NearToilet,
    AwayFromToilet,
    ExitRow,
}

/// Working set of unassigned seats.
///
/// The master set and every zone view are updated together on each claim and
/// release, so a seat is either available in all the views it belongs to or in
/// none of them. Views iterate in seat-number order.
#[derive(Debug, Clone)]
pub struct SeatPool {
    grid: SeatGrid,
    available: BTreeSet<usize>,
    near_toilet: BTreeSet<usize>,
    away_from_toilet: BTreeSet<usize>,
    exit_row: BTreeSet<usize>,
}

impl SeatPool {
    pub fn new(grid: SeatGrid) -> Self {
        let mut pool = Self {
            grid,
            available: BTreeSet::new(),
            near_toilet: BTreeSet::new(),
            away_from_toilet: BTreeSet::new(),
            exit_row: BTreeSet::new(),
        };
        let seats: Vec<Seat> = pool.grid.seats().to_vec();
        for seat in &seats {
            pool.insert(seat);
        }
        pool
    }

    pub fn grid(&self) -> &SeatGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn is_available(&self, label: SeatLabel) -> bool {
        self.grid
            .by_label(label)
            .is_some_and(|s| self.available.contains(&s.index()))
    }

    /// Take a seat out of the pool.
    pub fn claim(&mut self, label: SeatLabel) -> Result<Seat, PoolError> {
        let seat = *self
            .grid
            .by_label(label)
            .ok_or_else(|| PoolError::UnknownSeat(label.to_string()))?;

        if !self.available.remove(&seat.index()) {
            return Err(PoolError::AlreadyClaimed(label.to_string()));
        }
        self.near_toilet.remove(&seat.index());
        self.away_from_toilet.remove(&seat.index());
        self.exit_row.remove(&seat.index());

        Ok(seat)
    }

    /// Put a previously claimed seat back.
    pub fn release(&mut self, seat: &Seat) -> Result<(), PoolError> {
        if self.grid.get(seat.index()) != Some(seat) {
            return Err(PoolError::UnknownSeat(seat.label.to_string()));
        }
        if self.available.contains(&seat.index()) {
            return Err(PoolError::NotClaimed(seat.label.to_string()));
        }
        self.insert(seat);
        Ok(())
    }

    pub fn view(&self, zone: Zone) -> impl Iterator<Item = &Seat> + '_ {
        let ids = match zone {
            Zone::Anywhere => &self.available,
            Zone::NearToilet => &self.near_toilet,
            Zone::AwayFromToilet => &self.away_from_toilet,
            Zone::ExitRow => &self.exit_row,
        };
        ids.iter().filter_map(move |i| self.grid.get(*i))
    }

    /// Snapshot of a view for the search functions.
    pub fn candidates(&self, zone: Zone) -> Vec<Seat> {
        self.view(zone).copied().collect()
    }

    pub fn count(&self, zone: Zone) -> usize {
        match zone {
            Zone::Anywhere => self.available.len(),
            Zone::NearToilet => self.near_toilet.len(),
            Zone::AwayFromToilet => self.away_from_toilet.len(),
            Zone::ExitRow => self.exit_row.len(),
        }
    }

    fn insert(&mut self, seat: &Seat) {
        let i = seat.index();
        self.available.insert(i);
        if seat.near_toilet {
            self.near_toilet.insert(i);
        } else {
            self.away_from_toilet.insert(i);
        }
        if seat.emergency_exit {
            self.exit_row.insert(i);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("Seat not on this aircraft: {0}")]
    UnknownSeat(String),

    #[error("Seat already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("Seat was never claimed: {0}")]
    NotClaimed(String),
}

use crate::classifier::{classify, classify_values, FamilyGroup, Manifest};
use crate::layout::{Seat, SeatGrid, SeatLabel};
use crate::passenger::Passenger;
use crate::pool::SeatPool;
use crate::report::{AllocationReport, EvictionRecord, OccupancySummary, RelaxedPlacement, UnseatedReason};
use crate::strategy::{self, climb_group, climb_seat, GroupSearch, Rung, SeatSearch};
use crate::table::{AssignedSeat, AssignmentTable};
use crate::{AllocationError, AllocationResult};
use serde::Serialize;
use serde_json::Value;
use skyseat_shared::PassengerRecord;
use tracing::{debug, error, info, warn};

/// Result of one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub table: AssignmentTable,
    pub report: AllocationReport,
    pub summary: OccupancySummary,
}

/// Classify `records` and seat them on an empty cabin.
pub fn allocate(records: impl IntoIterator<Item = PassengerRecord>) -> Allocation {
    SeatAllocator::new().run(classify(records))
}

/// Same as [`allocate`] for an untyped passenger list.
pub fn allocate_values(values: Vec<Value>) -> Allocation {
    SeatAllocator::new().run(classify_values(values))
}

/// Washroom-seat occupants moved out for a family, in the order they were
/// removed. Doubles as the undo log.
struct Eviction {
    moved: Vec<AssignedSeat>,
}

/// Owns the seat pool and assignment table for a single run.
///
/// [`SeatAllocator::run`] applies the tiers in order. The tier steps are public
/// so callers can pin seats or drive placements themselves.
pub struct SeatAllocator {
    pool: SeatPool,
    table: AssignmentTable,
    report: AllocationReport,
}

impl SeatAllocator {
    pub fn new() -> Self {
        Self::with_grid(SeatGrid::standard())
    }

    pub fn with_grid(grid: SeatGrid) -> Self {
        let table = AssignmentTable::new(grid.len());
        Self {
            pool: SeatPool::new(grid),
            table,
            report: AllocationReport::default(),
        }
    }

    pub fn pool(&self) -> &SeatPool {
        &self.pool
    }

    pub fn table(&self) -> &AssignmentTable {
        &self.table
    }

    pub fn report(&self) -> &AllocationReport {
        &self.report
    }

    /// Seat a passenger at a fixed seat ahead of the tiers.
    pub fn pin(&mut self, passenger: Passenger, label: SeatLabel) -> AllocationResult<Seat> {
        let name = passenger.name.clone();
        let seat = self.seat(passenger, label, None)?;
        debug!("Pinned {} to {}", name, seat.label);
        Ok(seat)
    }

    pub fn pin_record(&mut self, record: PassengerRecord, label: SeatLabel) -> AllocationResult<Seat> {
        let name = record.name.clone().unwrap_or_default();
        let passenger = Passenger::admit(record).ok_or(AllocationError::InvalidPassenger(name))?;
        self.pin(passenger, label)
    }

    /// Run every tier over `manifest` and hand back the finished table.
    /// Passengers already pinned are left where they are.
    pub fn run(mut self, manifest: Manifest) -> Allocation {
        let Manifest {
            families,
            disabled_solos,
            young_solos,
            remaining_solos,
            dropped,
            duplicates,
        } = manifest;

        self.report.dropped += dropped;
        for name in &duplicates {
            self.report.unseat(name, None, UnseatedReason::DuplicateName);
        }

        let families: Vec<FamilyGroup> = families
            .into_iter()
            .filter_map(|f| self.unseated_members(f))
            .collect();
        let family_total = families.len();
        let seated = families
            .iter()
            .filter(|f| self.place_family(f).is_some())
            .count();
        info!("Tier 1: seated {}/{} families", seated, family_total);

        let disabled_solos = self.not_yet_seated(disabled_solos);
        let total = disabled_solos.len();
        let seated = disabled_solos
            .into_iter()
            .filter_map(|p| self.place_disabled_solo(p))
            .count();
        info!("Tier 2: seated {}/{} disabled solo passengers", seated, total);

        let young_solos = self.not_yet_seated(young_solos);
        let total = young_solos.len();
        let mut displaced = Vec::new();
        for passenger in young_solos {
            if let Err(passenger) = self.place_exit_row(passenger) {
                displaced.push(passenger);
            }
        }
        info!("Tier 3: seated {}/{} young solo passengers at the exit row", total - displaced.len(), total);
        if !displaced.is_empty() {
            warn!("Exit row full, {} young solo passengers moved to general seating", displaced.len());
        }
        self.report.displaced = displaced.len();

        let remaining = self.not_yet_seated(remaining_solos);
        let total = displaced.len() + remaining.len();
        let seated = displaced
            .into_iter()
            .chain(remaining)
            .filter_map(|p| self.place_filler(p))
            .count();
        info!("Tier 4: seated {}/{} remaining solo passengers", seated, total);

        self.finish()
    }

    pub fn finish(self) -> Allocation {
        let summary = OccupancySummary::new(&self.table, self.pool.grid(), &self.report);
        info!(
            "Allocation complete: {} seated, {} empty, {} unseated",
            summary.seated, summary.empty, summary.unseated
        );
        Allocation {
            table: self.table,
            report: self.report,
            summary,
        }
    }


    /// Seat a whole family or none of it. Seats come back in member order.
    pub fn place_family(&mut self, family: &FamilyGroup) -> Option<Vec<Seat>> {
        let result = if family.has_disabled_member() {
            self.place_disabled_family(family)
        } else {
            self.place_on_ladder(family, &strategy::FAMILY)
        };

        let reason = match result {
            Ok(Some(seats)) => return Some(seats),
            Ok(None) if self.pool.len() < family.size() => {
                warn!(
                    "Not enough seats for family {} ({} members, {} seats left)",
                    family.id,
                    family.size(),
                    self.pool.len()
                );
                UnseatedReason::Exhausted
            }
            Ok(None) => {
                warn!("No placement found for family {} ({} members)", family.id, family.size());
                UnseatedReason::Infeasible
            }
            Err(e) => {
                error!("Family {} could not be committed: {}", family.id, e);
                UnseatedReason::Infeasible
            }
        };
        for member in &family.members {
            self.report.unseat(&member.name, Some(&family.id), reason);
        }
        None
    }

    pub fn place_disabled_solo(&mut self, passenger: Passenger) -> Option<Seat> {
        let name = passenger.name.clone();
        let (rung, seat) = self.place_single(passenger, &strategy::DISABLED_SOLO)?;
        if rung != strategy::DISABLED_SOLO[0].name {
            warn!("Washroom seats full, disabled passenger {} seated at {}", name, seat.label);
        }
        Some(seat)
    }

    /// Seat an exit-eligible solo in the exit row. The passenger is handed back
    /// when the row is full or they are not eligible.
    pub fn place_exit_row(&mut self, passenger: Passenger) -> Result<Seat, Passenger> {
        if !passenger.is_exit_eligible() {
            debug!("{} is not eligible for the exit row", passenger.name);
            return Err(passenger);
        }
        let Some((_, seat)) = climb_seat(&self.pool, &strategy::EXIT_ROW) else {
            return Err(passenger);
        };
        match self.seat(passenger.clone(), seat.label, None) {
            Ok(seat) => {
                debug!("Seated {} at {} (exit row)", passenger.name, seat.label);
                Ok(seat)
            }
            Err(e) => {
                error!("Exit row seat {} for {} failed: {}", seat.label, passenger.name, e);
                Err(passenger)
            }
        }
    }

    pub fn place_filler(&mut self, passenger: Passenger) -> Option<Seat> {
        let name = passenger.name.clone();
        let eligible = passenger.is_exit_eligible();
        let (_, seat) = self.place_single(passenger, &strategy::FILLER)?;
        if seat.emergency_exit && !eligible {
            warn!("Cabin full, {} seated in the exit row at {}", name, seat.label);
        }
        Some(seat)
    }


    fn place_on_ladder(
        &mut self,
        family: &FamilyGroup,
        ladder: &[Rung<GroupSearch>],
    ) -> AllocationResult<Option<Vec<Seat>>> {
        match climb_group(&self.pool, ladder, family.size()) {
            Some((rung, seats)) => {
                let relaxed = ladder.first().is_some_and(|first| first.name != rung);
                self.commit_family(family, rung, seats, relaxed).map(Some)
            }
            None => Ok(None),
        }
    }

    fn place_disabled_family(&mut self, family: &FamilyGroup) -> AllocationResult<Option<Vec<Seat>>> {
        if let Some(seats) = self.place_on_ladder(family, &strategy::DISABLED_FAMILY_WASHROOM)? {
            return Ok(Some(seats));
        }
        if let Some(seats) = self.place_with_eviction(family)? {
            return Ok(Some(seats));
        }

        warn!(
            "No washroom seating for family {} ({} members, {} disabled), relaxing",
            family.id,
            family.size(),
            family.disabled_count
        );
        match climb_group(&self.pool, &strategy::DISABLED_FAMILY_RELAXED, family.size()) {
            Some((rung, seats)) => self.commit_family(family, rung, seats, true).map(Some),
            None => Ok(None),
        }
    }

    /// Free washroom seats held by solos, retry the washroom ladder, and either
    /// commit the family and reseat the solos or put everyone back.
    fn place_with_eviction(&mut self, family: &FamilyGroup) -> AllocationResult<Option<Vec<Seat>>> {
        let eviction = self.evict_washroom_solos(family.size())?;
        if eviction.moved.is_empty() {
            return Ok(None);
        }

        let ladder = &strategy::DISABLED_FAMILY_WASHROOM;
        let Some((rung, seats)) = climb_group(&self.pool, ladder, family.size()) else {
            debug!(
                "Evicting {} solos did not make room for family {}, rolling back",
                eviction.moved.len(),
                family.id
            );
            self.rollback(eviction)?;
            return Ok(None);
        };

        let placed = match self.commit_family(family, rung, seats, rung != ladder[0].name) {
            Ok(placed) => placed,
            Err(e) => {
                self.rollback(eviction)?;
                return Err(e);
            }
        };
        info!(
            "Evicted {} solo passengers from washroom seats for family {}",
            eviction.moved.len(),
            family.id
        );
        self.reseat_evicted(family, eviction);
        Ok(Some(placed))
    }

    /// Release up to `limit` near-washroom seats held by non-disabled solos,
    /// lowest seat numbers first.
    fn evict_washroom_solos(&mut self, limit: usize) -> AllocationResult<Eviction> {
        let grid = self.pool.grid();
        let indices: Vec<usize> = self
            .table
            .occupied()
            .filter(|a| a.passenger.is_solo() && !a.passenger.disabled)
            .filter(|a| grid.get(a.index()).is_some_and(|s| s.near_toilet))
            .map(AssignedSeat::index)
            .take(limit)
            .collect();

        let mut eviction = Eviction {
            moved: Vec::with_capacity(indices.len()),
        };
        for index in indices {
            match self.unseat(index) {
                Ok(assigned) => eviction.moved.push(assigned),
                Err(e) => {
                    self.rollback(eviction)?;
                    return Err(e);
                }
            }
        }
        Ok(eviction)
    }

    /// Put evicted passengers back exactly where they were.
    fn rollback(&mut self, eviction: Eviction) -> AllocationResult<()> {
        for assigned in eviction.moved.into_iter().rev() {
            self.pool.claim(assigned.seat_label)?;
            self.table.put(assigned)?;
        }
        Ok(())
    }

    fn reseat_evicted(&mut self, family: &FamilyGroup, eviction: Eviction) {
        for moved in eviction.moved {
            let from = moved.seat_label;
            let name = moved.passenger.name.clone();
            let to = self.place_filler(moved.passenger).map(|seat| seat.label);
            match to {
                Some(to) => debug!("Moved {} from {} to {}", name, from, to),
                None => warn!("Could not reseat {} after giving up {}", name, from),
            }
            self.report.evictions.push(EvictionRecord {
                family_id: family.id.clone(),
                passenger: name,
                from,
                to,
            });
        }
    }

    /// Seat every member or none of them.
    fn commit_family(
        &mut self,
        family: &FamilyGroup,
        rung: &'static str,
        seats: Vec<Seat>,
        relaxed: bool,
    ) -> AllocationResult<Vec<Seat>> {
        if seats.len() != family.size() {
            return Err(AllocationError::SeatCount {
                family: family.id.clone(),
                expected: family.size(),
                found: seats.len(),
            });
        }

        let mut placed: Vec<Seat> = Vec::with_capacity(seats.len());
        for (member, seat) in family.members.iter().zip(&seats) {
            match self.seat(member.clone(), seat.label, Some(family)) {
                Ok(seat) => placed.push(seat),
                Err(e) => {
                    for seat in &placed {
                        self.unseat(seat.index())?;
                    }
                    return Err(e);
                }
            }
        }

        if relaxed {
            warn!("Family {} seated by relaxed search {}", family.id, rung);
            self.report.relaxed.push(RelaxedPlacement {
                family_id: family.id.clone(),
                rung,
            });
        } else {
            debug!("Family {} seated by {}", family.id, rung);
        }
        Ok(placed)
    }


    fn place_single(
        &mut self,
        passenger: Passenger,
        ladder: &[Rung<SeatSearch>],
    ) -> Option<(&'static str, Seat)> {
        let Some((rung, seat)) = climb_seat(&self.pool, ladder) else {
            warn!("No seat left for {}", passenger.name);
            self.report.unseat(&passenger.name, None, UnseatedReason::Exhausted);
            return None;
        };

        let name = passenger.name.clone();
        match self.seat(passenger, seat.label, None) {
            Ok(seat) => {
                debug!("Seated {} at {} via {}", name, seat.label, rung);
                Some((rung, seat))
            }
            Err(e) => {
                error!("Could not seat {} at {}: {}", name, seat.label, e);
                self.report.unseat(&name, None, UnseatedReason::Infeasible);
                None
            }
        }
    }

    fn seat(&mut self, passenger: Passenger, label: SeatLabel, family: Option<&FamilyGroup>) -> AllocationResult<Seat> {
        if self.table.contains(&passenger.name) {
            return Err(AllocationError::AlreadySeated(passenger.name));
        }
        let seat = self.pool.claim(label)?;

        let mut assigned = AssignedSeat::new(passenger, &seat);
        if let Some(family) = family {
            assigned = assigned.with_family(&family.id, family.color);
        }
        if let Err(e) = self.table.put(assigned) {
            self.pool.release(&seat)?;
            return Err(e);
        }
        Ok(seat)
    }

    fn unseat(&mut self, index: usize) -> AllocationResult<AssignedSeat> {
        let seat = *self
            .pool
            .grid()
            .get(index)
            .ok_or_else(|| AllocationError::EmptySeat(format!("#{}", index + 1)))?;
        if self.table.get(index).is_none() {
            return Err(AllocationError::EmptySeat(seat.label.to_string()));
        }
        self.pool.release(&seat)?;
        self.table
            .take(index)
            .ok_or_else(|| AllocationError::EmptySeat(seat.label.to_string()))
    }

    fn not_yet_seated(&self, passengers: Vec<Passenger>) -> Vec<Passenger> {
        passengers
            .into_iter()
            .filter(|p| {
                let seated = self.table.contains(&p.name);
                if seated {
                    debug!("{} already holds a seat", p.name);
                }
                !seated
            })
            .collect()
    }

    fn unseated_members(&self, mut family: FamilyGroup) -> Option<FamilyGroup> {
        family.members.retain(|m| !self.table.contains(&m.name));
        family.disabled_count = family.members.iter().filter(|m| m.disabled).count();
        (!family.members.is_empty()).then_some(family)
    }
}

impl Default for SeatAllocator {
    fn default() -> Self {
        Self::new()
    }
}

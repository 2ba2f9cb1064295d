use crate::layout::{SeatGrid, SeatLabel};
use crate::table::AssignmentTable;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseatedReason {
    /// The pool ran out of seats.
    Exhausted,
    /// Enough seats were free but the placement could not be committed.
    Infeasible,
    /// Another record with the same name was kept instead.
    DuplicateName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unseated {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    pub reason: UnseatedReason,
}

/// A solo moved out of a washroom seat to make room for a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvictionRecord {
    pub family_id: String,
    pub passenger: String,
    pub from: SeatLabel,
    /// None when no seat was left to reseat them.
    pub to: Option<SeatLabel>,
}

/// A family seated by a ladder rung other than the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaxedPlacement {
    pub family_id: String,
    pub rung: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    pub unseated: Vec<Unseated>,
    pub dropped: usize,
    pub evictions: Vec<EvictionRecord>,
    pub relaxed: Vec<RelaxedPlacement>,
    /// Young solos who found the exit row full.
    pub displaced: usize,
}

impl AllocationReport {
    pub fn is_clean(&self) -> bool {
        self.unseated.is_empty() && self.dropped == 0
    }

    pub(crate) fn unseat(&mut self, name: &str, family_id: Option<&str>, reason: UnseatedReason) {
        self.unseated.push(Unseated {
            name: name.to_string(),
            family_id: family_id.map(str::to_string),
            reason,
        });
    }
}

/// Seat map counters for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySummary {
    pub total_seats: usize,
    pub seated: usize,
    pub empty: usize,
    pub family_members: usize,
    pub disabled: usize,
    pub exit_row_occupied: usize,
    pub near_toilet_occupied: usize,
    pub unseated: usize,
}

impl OccupancySummary {
    pub fn new(table: &AssignmentTable, grid: &SeatGrid, report: &AllocationReport) -> Self {
        let mut summary = Self {
            total_seats: table.len(),
            unseated: report.unseated.len(),
            ..Self::default()
        };

        for assigned in table.occupied() {
            summary.seated += 1;
            if assigned.family_id.is_some() {
                summary.family_members += 1;
            }
            if assigned.passenger.disabled {
                summary.disabled += 1;
            }
            if let Some(seat) = grid.get(assigned.index()) {
                if seat.emergency_exit {
                    summary.exit_row_occupied += 1;
                }
                if seat.near_toilet {
                    summary.near_toilet_occupied += 1;
                }
            }
        }
        summary.empty = summary.total_seats - summary.seated;
        summary
    }
}

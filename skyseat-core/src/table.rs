use crate::layout::{Seat, SeatLabel};
use crate::passenger::Passenger;
use crate::AllocationError;
use serde::Serialize;
use std::collections::HashMap;

/// A passenger in a seat, as handed to the seat map.
///
/// Serializes as the passenger's original fields plus the seat fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedSeat {
    #[serde(flatten)]
    pub passenger: Passenger,
    pub seat_label: SeatLabel,
    pub seat_number: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
}

impl AssignedSeat {
    pub fn new(passenger: Passenger, seat: &Seat) -> Self {
        Self {
            passenger,
            seat_label: seat.label,
            seat_number: seat.seat_number,
            family_color: None,
            family_id: None,
        }
    }

    pub fn with_family(mut self, id: &str, color: &str) -> Self {
        self.family_id = Some(id.to_string());
        self.family_color = Some(color.to_string());
        self
    }

    pub fn index(&self) -> usize {
        self.seat_number as usize - 1
    }
}

/// One slot per seat, in row-major seat order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssignmentTable {
    slots: Vec<Option<AssignedSeat>>,
    #[serde(skip)]
    names: HashMap<String, usize>,
}

impl AssignmentTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            names: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<AssignedSeat>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&AssignedSeat> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn at(&self, label: SeatLabel) -> Option<&AssignedSeat> {
        self.occupied().find(|a| a.seat_label == label)
    }

    pub fn find(&self, name: &str) -> Option<&AssignedSeat> {
        self.names.get(name).and_then(|i| self.get(*i))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn occupied(&self) -> impl Iterator<Item = &AssignedSeat> {
        self.slots.iter().flatten()
    }

    pub fn seated_count(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn put(&mut self, assigned: AssignedSeat) -> Result<(), AllocationError> {
        let index = assigned.index();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| AllocationError::SeatOccupied(assigned.seat_label.to_string()))?;
        if slot.is_some() {
            return Err(AllocationError::SeatOccupied(assigned.seat_label.to_string()));
        }
        if self.names.contains_key(&assigned.passenger.name) {
            return Err(AllocationError::AlreadySeated(assigned.passenger.name.clone()));
        }

        self.names.insert(assigned.passenger.name.clone(), index);
        *slot = Some(assigned);
        Ok(())
    }

    pub(crate) fn take(&mut self, index: usize) -> Option<AssignedSeat> {
        let assigned = self.slots.get_mut(index)?.take()?;
        self.names.remove(&assigned.passenger.name);
        Some(assigned)
    }
}

//! Seat searches and the relaxation ladders built from them.
//!
//! Every search is a pure function over a snapshot of available seats (in
//! seat-number order) and either finds a complete answer or nothing. A ladder
//! lists searches from strictest to loosest; the allocator walks it top-down
//! and stops at the first rung that answers.

use crate::layout::{rows_from_washroom, Seat, Side, EMERGENCY_EXIT_ROW, ROWS};
use crate::pool::{SeatPool, Zone};
use std::cmp::Reverse;

/// Finds exactly `k` seats for a group.
pub type GroupSearch = fn(&[Seat], usize) -> Option<Vec<Seat>>;
/// Finds one seat for a single passenger.
pub type SeatSearch = fn(&[Seat]) -> Option<Seat>;

/// Washroom rows used for group placement, nearest the facility first.
pub const BACK_WASHROOM_ROWS: [u8; 3] = [20, 19, 18];
pub const FRONT_WASHROOM_ROWS: [u8; 3] = [1, 2, 3];

const SEATS_PER_SIDE: usize = 3;

/// One step of a relaxation ladder.
#[derive(Clone, Copy)]
pub struct Rung<S> {
    pub name: &'static str,
    pub zone: Zone,
    pub search: S,
}

/// Families with a disabled member, before any eviction.
pub const DISABLED_FAMILY_WASHROOM: [Rung<GroupSearch>; 2] = [
    Rung { name: "washroom-block", zone: Zone::NearToilet, search: washroom_block },
    Rung { name: "washroom-seats", zone: Zone::NearToilet, search: washroom_seats },
];

/// Families with a disabled member once washroom seating is out of reach.
pub const DISABLED_FAMILY_RELAXED: [Rung<GroupSearch>; 3] = [
    Rung { name: "nearest-block", zone: Zone::Anywhere, search: nearest_block },
    Rung { name: "one-side", zone: Zone::Anywhere, search: one_side },
    Rung { name: "any-seats", zone: Zone::Anywhere, search: first_k },
];

pub const FAMILY: [Rung<GroupSearch>; 3] = [
    Rung { name: "mid-cabin-block", zone: Zone::AwayFromToilet, search: mid_cabin_block },
    Rung { name: "cabin-block", zone: Zone::Anywhere, search: cabin_block },
    Rung { name: "any-seats", zone: Zone::Anywhere, search: first_k },
];

pub const DISABLED_SOLO: [Rung<SeatSearch>; 3] = [
    Rung { name: "nearest-washroom", zone: Zone::NearToilet, search: nearest_washroom },
    Rung { name: "off-exit-row", zone: Zone::Anywhere, search: first_off_exit_row },
    Rung { name: "any-seat", zone: Zone::Anywhere, search: first_open },
];

pub const EXIT_ROW: [Rung<SeatSearch>; 1] = [
    Rung { name: "exit-row", zone: Zone::ExitRow, search: first_open },
];

/// Remaining and displaced solos: keep washroom seats free while possible and
/// leave the exit row for last.
pub const FILLER: [Rung<SeatSearch>; 3] = [
    Rung { name: "mid-cabin", zone: Zone::AwayFromToilet, search: first_off_exit_row },
    Rung { name: "off-exit-row", zone: Zone::Anywhere, search: first_off_exit_row },
    Rung { name: "any-seat", zone: Zone::Anywhere, search: first_open },
];

/// Walk a group ladder; returns the answering rung's name with the seats.
pub fn climb_group(
    pool: &SeatPool,
    ladder: &[Rung<GroupSearch>],
    k: usize,
) -> Option<(&'static str, Vec<Seat>)> {
    if k == 0 {
        return None;
    }
    ladder.iter().find_map(|rung| {
        if pool.count(rung.zone) < k {
            return None;
        }
        let candidates = pool.candidates(rung.zone);
        (rung.search)(&candidates, k)
            .filter(|seats| seats.len() == k)
            .map(|seats| (rung.name, seats))
    })
}

pub fn climb_seat(pool: &SeatPool, ladder: &[Rung<SeatSearch>]) -> Option<(&'static str, Seat)> {
    ladder.iter().find_map(|rung| {
        if pool.count(rung.zone) == 0 {
            return None;
        }
        let candidates = pool.candidates(rung.zone);
        (rung.search)(&candidates).map(|seat| (rung.name, seat))
    })
}


/// Whole family in one washroom band, on one side of the aisle, three per row.
pub fn washroom_block(candidates: &[Seat], k: usize) -> Option<Vec<Seat>> {
    Side::BOTH.iter().find_map(|&side| {
        [BACK_WASHROOM_ROWS, FRONT_WASHROOM_ROWS]
            .iter()
            .find_map(|rows| block_on_side(candidates, rows, side, k))
    })
}

/// Any `k` washroom-row seats, keeping to one side and one band where possible.
pub fn washroom_seats(candidates: &[Seat], k: usize) -> Option<Vec<Seat>> {
    let back: Vec<Seat> = candidates
        .iter()
        .filter(|s| BACK_WASHROOM_ROWS.contains(&s.row))
        .copied()
        .collect();
    let front: Vec<Seat> = candidates
        .iter()
        .filter(|s| FRONT_WASHROOM_ROWS.contains(&s.row))
        .copied()
        .collect();

    for band in [&back, &front] {
        for side in Side::BOTH {
            if let Some(seats) = take_on_side(band, side, k) {
                return Some(seats);
            }
        }
    }

    // Both bands together, back band first.
    let both: Vec<Seat> = back.iter().chain(front.iter()).copied().collect();
    for side in Side::BOTH {
        if let Some(seats) = take_on_side(&both, side, k) {
            return Some(seats);
        }
    }
    first_k(&both, k)
}

/// A one-side row block as close to a washroom band as the cabin allows.
pub fn nearest_block(candidates: &[Seat], k: usize) -> Option<Vec<Seat>> {
    let needed = k.div_ceil(SEATS_PER_SIDE);
    let mut starts = start_rows(needed);
    starts.sort_by_key(|&start| (block_distance(start, needed), Reverse(start)));

    starts.iter().find_map(|&start| {
        let rows = block_rows(start, needed);
        Side::BOTH
            .iter()
            .find_map(|&side| block_on_side(candidates, &rows, side, k))
    })
}

/// A one-side row block wholly between the washroom bands, as far from both
/// bands as possible.
pub fn mid_cabin_block(candidates: &[Seat], k: usize) -> Option<Vec<Seat>> {
    let needed = k.div_ceil(SEATS_PER_SIDE);
    let starts: Vec<u8> = start_rows(needed)
        .into_iter()
        .filter(|&start| block_rows(start, needed).iter().all(|&r| rows_from_washroom(r) > 0))
        .collect();
    far_block(candidates, starts, needed, k)
}

/// Like [`mid_cabin_block`] but any rows may be used.
pub fn cabin_block(candidates: &[Seat], k: usize) -> Option<Vec<Seat>> {
    let needed = k.div_ceil(SEATS_PER_SIDE);
    far_block(candidates, start_rows(needed), needed, k)
}

/// `k` seats on one side of the aisle, front to back.
pub fn one_side(candidates: &[Seat], k: usize) -> Option<Vec<Seat>> {
    Side::BOTH.iter().find_map(|&side| take_on_side(candidates, side, k))
}

pub fn first_k(candidates: &[Seat], k: usize) -> Option<Vec<Seat>> {
    (candidates.len() >= k).then(|| candidates[..k].to_vec())
}


/// Back band before front band, then rows closest to the cabin ends; an aisle
/// seat wins over any non-aisle seat in that order.
pub fn nearest_washroom(candidates: &[Seat]) -> Option<Seat> {
    let mut near: Vec<Seat> = candidates.iter().filter(|s| s.near_toilet).copied().collect();
    near.sort_by_key(|s| (!s.back_washroom, s.row.min(ROWS - s.row)));

    near.iter().find(|s| s.aisle).or_else(|| near.first()).copied()
}

pub fn first_off_exit_row(candidates: &[Seat]) -> Option<Seat> {
    candidates.iter().find(|s| !s.emergency_exit).copied()
}

pub fn first_open(candidates: &[Seat]) -> Option<Seat> {
    candidates.first().copied()
}


/// Fill `rows` in order on one side, three seats per row, the last row taking
/// the remainder. Every row must supply its share.
fn block_on_side(candidates: &[Seat], rows: &[u8], side: Side, k: usize) -> Option<Vec<Seat>> {
    let needed = k.div_ceil(SEATS_PER_SIDE);
    if k == 0 || rows.len() < needed {
        return None;
    }

    let mut picked = Vec::with_capacity(k);
    for (i, &row) in rows.iter().take(needed).enumerate() {
        let want = (k - i * SEATS_PER_SIDE).min(SEATS_PER_SIDE);
        let in_row: Vec<Seat> = candidates
            .iter()
            .filter(|s| s.row == row && s.side() == side)
            .take(want)
            .copied()
            .collect();
        if in_row.len() < want {
            return None;
        }
        picked.extend(in_row);
    }
    Some(picked)
}

fn take_on_side(candidates: &[Seat], side: Side, k: usize) -> Option<Vec<Seat>> {
    let seats: Vec<Seat> = candidates.iter().filter(|s| s.side() == side).copied().collect();
    first_k(&seats, k)
}

/// Start rows for a block of `needed` rows that never spans the exit row.
fn start_rows(needed: usize) -> Vec<u8> {
    if needed == 0 || needed > ROWS as usize {
        return Vec::new();
    }
    let needed = needed as u8;
    (1..=ROWS - needed + 1)
        .filter(|&start| !(start <= EMERGENCY_EXIT_ROW && start + needed > EMERGENCY_EXIT_ROW))
        .collect()
}

fn block_rows(start: u8, needed: usize) -> Vec<u8> {
    (0..needed as u8).map(|offset| start + offset).collect()
}

fn block_distance(start: u8, needed: usize) -> u8 {
    block_rows(start, needed)
        .into_iter()
        .map(rows_from_washroom)
        .min()
        .unwrap_or(0)
}

/// Try start rows far from the washroom band centres first (rows 2.5 and 18.5,
/// compared in half-rows), left side before right.
fn far_block(candidates: &[Seat], mut starts: Vec<u8>, needed: usize, k: usize) -> Option<Vec<Seat>> {
    let half_rows_from_bands = |start: u8| {
        let twice = 2 * start as i32;
        (twice - 5).abs().min((twice - 37).abs())
    };
    starts.sort_by_key(|&start| Reverse(half_rows_from_bands(start)));

    Side::BOTH.iter().find_map(|&side| {
        starts.iter().find_map(|&start| {
            block_on_side(candidates, &block_rows(start, needed), side, k)
        })
    })
}

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const ROWS: u8 = 20;
pub const SEATS_PER_ROW: usize = 6;
pub const SEAT_COUNT: usize = ROWS as usize * SEATS_PER_ROW;
/// Rows at each end of the cabin that count as near a washroom.
pub const WASHROOM_BAND_ROWS: u8 = 4;
pub const EMERGENCY_EXIT_ROW: u8 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Column {
    A,
    B,
    C,
    D,
    E,
    F,
}

pub const COLUMNS: [Column; SEATS_PER_ROW] = [
    Column::A,
    Column::B,
    Column::C,
    Column::D,
    Column::E,
    Column::F,
];

impl Column {
    pub fn letter(self) -> char {
        match self {
            Column::A => 'A',
            Column::B => 'B',
            Column::C => 'C',
            Column::D => 'D',
            Column::E => 'E',
            Column::F => 'F',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        COLUMNS.iter().copied().find(|col| col.letter() == c.to_ascii_uppercase())
    }

    /// 1-based position across the row.
    pub fn position(self) -> usize {
        COLUMNS.iter().position(|c| *c == self).unwrap_or(0) + 1
    }

    pub fn side(self) -> Side {
        match self {
            Column::A | Column::B | Column::C => Side::Left,
            Column::D | Column::E | Column::F => Side::Right,
        }
    }

    pub fn seat_type(self) -> SeatType {
        match self {
            Column::A | Column::F => SeatType::Window,
            Column::C | Column::D => SeatType::Aisle,
            Column::B | Column::E => SeatType::Middle,
        }
    }
}

/// Half of a row on one side of the aisle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    Window,
    Aisle,
    Middle,
}

/// Row number plus column letter, e.g. `11C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatLabel {
    pub row: u8,
    pub column: Column,
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column.letter())
    }
}

impl Serialize for SeatLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid seat label: {0}")]
pub struct InvalidSeatLabel(pub String);

impl FromStr for SeatLabel {
    type Err = InvalidSeatLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || InvalidSeatLabel(s.to_string());

        let letter = s.chars().last().ok_or_else(invalid)?;
        let column = Column::from_letter(letter).ok_or_else(invalid)?;
        let row: u8 = s[..s.len() - letter.len_utf8()].parse().map_err(|_| invalid())?;
        if row == 0 || row > ROWS {
            return Err(invalid());
        }

        Ok(SeatLabel { row, column })
    }
}

/// A physical seat and its zone attributes.
///
/// All flags derive from row and column; a seat never changes after the grid is
/// built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub row: u8,
    pub column: Column,
    pub seat_number: u16,
    pub label: SeatLabel,
    pub near_toilet: bool,
    pub front_washroom: bool,
    pub back_washroom: bool,
    pub emergency_exit: bool,
    pub aisle: bool,
    pub seat_type: SeatType,
}

impl Seat {
    fn new(row: u8, column: Column) -> Self {
        let seat_number = (row as u16 - 1) * SEATS_PER_ROW as u16 + column.position() as u16;
        let front_washroom = row <= WASHROOM_BAND_ROWS;
        let back_washroom = row > ROWS - WASHROOM_BAND_ROWS;
        let seat_type = column.seat_type();

        Self {
            row,
            column,
            seat_number,
            label: SeatLabel { row, column },
            near_toilet: front_washroom || back_washroom,
            front_washroom,
            back_washroom,
            emergency_exit: row == EMERGENCY_EXIT_ROW,
            aisle: seat_type == SeatType::Aisle,
            seat_type,
        }
    }

    /// Position in the row-major grid (and in the assignment table).
    pub fn index(&self) -> usize {
        self.seat_number as usize - 1
    }

    pub fn side(&self) -> Side {
        self.column.side()
    }

    pub fn rows_from_washroom(&self) -> u8 {
        rows_from_washroom(self.row)
    }
}

/// Rows between `row` and the nearest washroom band; zero inside a band.
pub fn rows_from_washroom(row: u8) -> u8 {
    if row <= WASHROOM_BAND_ROWS || row > ROWS - WASHROOM_BAND_ROWS {
        0
    } else {
        (row - WASHROOM_BAND_ROWS).min(ROWS - WASHROOM_BAND_ROWS + 1 - row)
    }
}

/// The fixed cabin: 20 rows of six seats, row-major.
#[derive(Debug, Clone)]
pub struct SeatGrid {
    seats: Vec<Seat>,
}

impl SeatGrid {
    pub fn standard() -> Self {
        let seats = (1..=ROWS)
            .flat_map(|row| COLUMNS.iter().map(move |&column| Seat::new(row, column)))
            .collect();
        Self { seats }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn get(&self, index: usize) -> Option<&Seat> {
        self.seats.get(index)
    }

    pub fn by_number(&self, seat_number: u16) -> Option<&Seat> {
        (seat_number as usize).checked_sub(1).and_then(|i| self.seats.get(i))
    }

    pub fn by_label(&self, label: SeatLabel) -> Option<&Seat> {
        self.seats.iter().find(|s| s.label == label)
    }

    pub fn row(&self, row: u8) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(move |s| s.row == row)
    }
}

impl Default for SeatGrid {
    fn default() -> Self {
        Self::standard()
    }
}

//! Seat registry.
//!
//! Maps connection sessions onto the two seats of the table. Seat 1 always
//! plays `X` and seat 2 always plays `O`; a newcomer takes the lowest free
//! seat, so a player who replaces a departed `X` plays `X`.

use std::collections::BTreeMap;

use noughts_proto::{Mark, SeatId};

/// Number of seats at the table.
pub const SEAT_COUNT: usize = 2;

/// A claimed seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    /// Seat ordinal (1 or 2)
    pub seat_id: SeatId,
    /// Mark played from this seat
    pub mark: Mark,
}

impl Seat {
    /// The seat that plays `mark`.
    pub fn for_mark(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::for_slot(0),
            Mark::O => Self::for_slot(1),
        }
    }

    fn for_slot(slot: usize) -> Self {
        let mark = if slot == 0 { Mark::X } else { Mark::O };
        // slot < SEAT_COUNT, so the ordinal fits in a u8
        Self { seat_id: SeatId::new(slot as u8 + 1), mark }
    }
}

/// Session to seat mapping.
///
/// Iteration order is by session id, which is also connection order.
#[derive(Debug, Default)]
pub struct SeatRegistry {
    seats: BTreeMap<u64, Seat>,
}

impl SeatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat `session_id` in the lowest free slot.
    ///
    /// Returns `None` if the table is full or the session already holds a
    /// seat.
    pub fn claim(&mut self, session_id: u64) -> Option<Seat> {
        if self.seats.contains_key(&session_id) {
            return None;
        }

        let slot = (0..SEAT_COUNT).find(|slot| {
            let candidate = Seat::for_slot(*slot);
            self.seats.values().all(|seat| seat.seat_id != candidate.seat_id)
        })?;

        let seat = Seat::for_slot(slot);
        self.seats.insert(session_id, seat);
        Some(seat)
    }

    /// Free the seat held by `session_id`.
    pub fn release(&mut self, session_id: u64) -> Option<Seat> {
        self.seats.remove(&session_id)
    }

    /// Seat held by `session_id`.
    pub fn seat(&self, session_id: u64) -> Option<Seat> {
        self.seats.get(&session_id).copied()
    }

    /// Seated session ids.
    pub fn sessions(&self) -> impl Iterator<Item = u64> + '_ {
        self.seats.keys().copied()
    }

    /// Number of occupied seats.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether no seat is occupied.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Whether every seat is occupied.
    pub fn is_full(&self) -> bool {
        self.seats.len() >= SEAT_COUNT
    }
}

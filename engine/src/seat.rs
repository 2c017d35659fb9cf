//! Seat ring: ordered circular seat list with next-active rotation and
//! blind-position assignment. Grounded in
//! `texas-engine::state::TexasHoldem::advance_to_next_player` and
//! `poker-ws::game::Table::next_occupied_from`, generalized to an
//! active/all-in/folded/eliminated status set.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::ids::{PlayerId, SeatId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    Active,
    Folded,
    AllIn,
    Eliminated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub table_id: crate::ids::TableId,
    pub player_id: PlayerId,
    pub seat_number: u8,
    pub buy_in: u64,
    pub current_bet: u64,
    pub cards: Vec<Card>,
    pub status: SeatStatus,
    pub last_action: Option<String>,
}

impl Seat {
    /// A seat still holding cards and in the hand (not folded/eliminated),
    /// whether or not it can currently act.
    pub fn in_hand(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }
}

/// Returns seats ordered by `seat_number` ascending.
pub fn ordered(seats: &[Seat]) -> Vec<&Seat> {
    let mut v: Vec<&Seat> = seats.iter().collect();
    v.sort_by_key(|s| s.seat_number);
    v
}

/// Finds the next seat clockwise from `from_seat_id` whose status is
/// `active` or `all-in`. If no such seat exists other than the starting one,
/// the ring has collapsed and `None` is returned.
pub fn next_active(seats: &[Seat], from_seat_id: &SeatId) -> Option<SeatId> {
    let ring = ordered(seats);
    let start = ring.iter().position(|s| &s.id == from_seat_id)?;
    let n = ring.len();
    for step in 1..=n {
        let idx = (start + step) % n;
        if ring[idx].in_hand() {
            return Some(ring[idx].id.clone());
        }
    }
    None
}

/// Next seat clockwise from `from_seat_id` that can act on a bet — an alias
/// for `next_active` kept as a distinct name for call-site clarity at
/// betting-round call sites.
pub fn next_to_act(seats: &[Seat], from_seat_id: &SeatId) -> Option<SeatId> {
    next_active(seats, from_seat_id)
}

/// The seat clockwise from the dealer button, regardless of status — used
/// to advance the button itself, which always lands on a non-eliminated
/// seat.
pub fn next_non_eliminated(seats: &[Seat], from_seat_id: &SeatId) -> Option<SeatId> {
    let ring = ordered(seats);
    let start = ring.iter().position(|s| &s.id == from_seat_id)?;
    let n = ring.len();
    for step in 1..=n {
        let idx = (start + step) % n;
        if !matches!(ring[idx].status, SeatStatus::Eliminated) {
            return Some(ring[idx].id.clone());
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct BlindPositions {
    pub dealer: SeatId,
    pub small_blind: SeatId,
    pub big_blind: SeatId,
    pub first_preflop_actor: SeatId,
}

/// Computes blind seats. `seats` must contain only non-eliminated seats
/// participating in the new hand, ordered by `seat_number`; `dealer` must
/// be one of them.
pub fn blind_positions(seats: &[Seat], dealer: &SeatId) -> Option<BlindPositions> {
    let ring = ordered(seats);
    let n = ring.len();
    if n < 2 {
        return None;
    }
    let d = ring.iter().position(|s| &s.id == dealer)?;

    if n == 2 {
        // heads-up: dealer posts SB and acts first preflop; opponent posts BB.
        let sb = ring[d].id.clone();
        let bb = ring[(d + 1) % n].id.clone();
        return Some(BlindPositions {
            dealer: sb.clone(),
            small_blind: sb.clone(),
            big_blind: bb,
            first_preflop_actor: sb,
        });
    }

    let sb = ring[(d + 1) % n].id.clone();
    let bb = ring[(d + 2) % n].id.clone();
    let first = ring[(d + 3) % n].id.clone();
    Some(BlindPositions {
        dealer: ring[d].id.clone(),
        small_blind: sb,
        big_blind: bb,
        first_preflop_actor: first,
    })
}

/// First actor postflop: the first in-hand seat clockwise from the dealer
/// button (i.e. the small blind, if still in the hand).
pub fn first_postflop_actor(seats: &[Seat], dealer: &SeatId) -> Option<SeatId> {
    let ring = ordered(seats);
    let n = ring.len();
    let d = ring.iter().position(|s| &s.id == dealer)?;
    for step in 1..=n {
        let idx = (d + step) % n;
        if ring[idx].in_hand() {
            return Some(ring[idx].id.clone());
        }
    }
    None
}

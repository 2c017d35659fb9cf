//! Read model (spectator snapshot). A pure function over a loaded
//! table/seats/hand that redacts hole cards not belonging to the viewer.
//! Grounded in `poker-ws::ServerEvent::TableSnapshot`'s per-connection
//! view, generalized to the engine's richer `Hand`/`Seat` types.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, FACE_DOWN};
use crate::hand::{Hand, HandState};
use crate::ids::PlayerId;
use crate::seat::{Seat, SeatStatus};
use crate::table::Table;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub seat_number: u8,
    pub player_id: PlayerId,
    pub buy_in: u64,
    pub current_bet: u64,
    pub status: SeatStatus,
    /// Either the real card codes (own seat, or any seat at `SHOWDOWN`) or
    /// `FACE_DOWN` sentinels of the same length.
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandView {
    pub state: HandState,
    pub community_cards: Vec<Card>,
    pub pot_total: u64,
    pub assigned_seat_number: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub table: Table,
    pub seats: Vec<SeatView>,
    pub hand: Option<HandView>,
}

/// Builds `viewer`'s view of the table: their own hole cards (if seated)
/// are shown in full; everyone else's are redacted to `FD` placeholders
/// unless the hand has reached `SHOWDOWN`, at which point all live hands
/// are revealed.
pub fn snapshot(table: &Table, seats: &[Seat], hand: Option<&Hand>, viewer: Option<&PlayerId>) -> TableSnapshot {
    let reveal_all = matches!(hand.map(|h| h.state), Some(HandState::Showdown));

    let seat_views = seats
        .iter()
        .map(|seat| {
            let is_viewer = viewer.is_some_and(|v| v == &seat.player_id);
            let cards = if is_viewer || reveal_all {
                seat.cards.iter().map(Card::code).collect()
            } else {
                vec![FACE_DOWN.to_string(); seat.cards.len()]
            };
            SeatView {
                seat_number: seat.seat_number,
                player_id: seat.player_id.clone(),
                buy_in: seat.buy_in,
                current_bet: seat.current_bet,
                status: seat.status,
                cards,
            }
        })
        .collect();

    let hand_view = hand.map(|h| HandView {
        state: h.state,
        community_cards: h.community_cards.clone(),
        pot_total: h.pot_total,
        assigned_seat_number: h
            .assigned_seat
            .as_ref()
            .and_then(|id| seats.iter().find(|s| &s.id == id))
            .map(|s| s.seat_number),
    });

    TableSnapshot {
        table: table.clone(),
        seats: seat_views,
        hand: hand_view,
    }
}

//! Event surface emitted after every successfully applied command, and the
//! `EventSink` seam the server's broadcast layer subscribes through.
//! Grounded in `poker-ws::main::ServerEvent`, widened with the pot/hand
//! lifecycle events a replayable spectator feed needs.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::ids::{HandId, PlayerId, SeatId, TableId};
use crate::pot::SidePot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SeatJoined {
        table_id: TableId,
        seat_id: SeatId,
        player_id: PlayerId,
        buy_in: u64,
    },
    SeatLeft {
        table_id: TableId,
        seat_id: SeatId,
    },
    HandStarted {
        table_id: TableId,
        hand_id: HandId,
        dealer_seat: SeatId,
    },
    BlindsPosted {
        hand_id: HandId,
        small_blind_seat: SeatId,
        big_blind_seat: SeatId,
        small_blind: u64,
        big_blind: u64,
    },
    HoleCardsDealt {
        hand_id: HandId,
        seat_id: SeatId,
        /// Only populated in the event delivered to that seat's own
        /// connection; spectator copies carry `FACE_DOWN` sentinels instead.
        cards: Vec<String>,
    },
    ActionTaken {
        hand_id: HandId,
        seat_id: SeatId,
        action: String,
        amount: Option<u64>,
    },
    StreetDealt {
        hand_id: HandId,
        street: String,
        cards: Vec<Card>,
    },
    PotsFinalized {
        hand_id: HandId,
        pots: Vec<SidePot>,
    },
    HandEnded {
        hand_id: HandId,
        payouts: Vec<(SeatId, u64)>,
    },
    ScanRejected {
        table_id: TableId,
        scan_id: String,
        reason: String,
    },
    Error {
        table_id: TableId,
        message: String,
    },
}

/// Sink every applied command's events are published to. The server crate
/// implements this over its per-table WebSocket broadcast channel; engine
/// tests implement it over a `Vec<Event>` to assert on emitted sequences.
pub trait EventSink: Send + Sync {
    fn publish(&self, table_id: &TableId, event: Event);
}

/// An `EventSink` that records everything published, for tests.
#[derive(Default)]
pub struct RecordingSink {
    pub events: std::sync::Mutex<Vec<Event>>,
}

impl EventSink for RecordingSink {
    fn publish(&self, _table_id: &TableId, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

//! Command surface: every mutation a caller can request against a table,
//! plus the actor metadata the authority matrix needs to decide whether
//! it's allowed. Grounded in `texas-engine::shared::PlayerAction` and
//! `poker-ws::main::ClientAction`, widened to cover seating, leaving, and
//! scanner-sourced commands alongside betting actions.

use serde::{Deserialize, Serialize};

use crate::ids::{DeviceSerial, PlayerId, SeatId, TableId};

/// Who is issuing a command, and through what channel — the authority
/// matrix keys off this rather than trusting a role claimed by the command
/// payload itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player(PlayerId),
    Dealer { device: DeviceSerial },
    /// The scanner intake worker, issuing `DEAL_CARD` on behalf of a
    /// decoded barcode scan. Distinct from `Dealer` so the authority matrix
    /// can grant it strictly less than the human dealer's authority.
    Scanner { device: DeviceSerial },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    SitDown {
        table_id: TableId,
        player_id: PlayerId,
        seat_number: u8,
        buy_in: u64,
    },
    LeaveTable {
        table_id: TableId,
        seat_id: SeatId,
    },
    StartHand {
        table_id: TableId,
    },
    /// Terminates any in-flight hand (marking it `completed`) and starts a
    /// fresh one, as distinct from `StartHand`, which refuses to do so while
    /// a hand is already active.
    ResetTable {
        table_id: TableId,
    },
    PlayerAction {
        table_id: TableId,
        seat_id: SeatId,
        action: PlayerActionKind,
    },
    /// `DEAL_CARD(rank, suit)` issued directly by the dealer (manual deal,
    /// no physical scanner in the loop). Valid in any dealing state.
    DealCard {
        table_id: TableId,
        card_code: String,
    },
    /// A card scan from the dealer's handheld scanner, decoded from its
    /// `SRRR` barcode format before reaching this command.
    ScanCard {
        table_id: TableId,
        device: DeviceSerial,
        scan_id: String,
        card_code: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount")]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    Bet(u64),
    Raise(u64),
    AllIn,
}

//! Wire protocol: parses a client's JSON message into `(Actor, Command)`.
//! Grounded in `poker-ws::ClientAction`'s `#[serde(tag = "type")]` envelope,
//! widened to three actor roles (`dealer`, `player`, `scanner`) instead of
//! trusting a bare `client_msg_id` as identity.
//!
//! This module never touches table state; it only builds the
//! `(Actor, Command)` pair the authority matrix and mutator decide on.

use serde::{Deserialize, Serialize};

use texas_engine::command::{Actor, Command, PlayerActionKind};
use texas_engine::ids::{DeviceSerial, PlayerId, SeatId, TableId};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    StartGame {
        table_id: TableId,
        device: DeviceSerial,
    },
    ResetTable {
        table_id: TableId,
        device: DeviceSerial,
    },
    Join {
        table_id: TableId,
        player_id: PlayerId,
        seat_number: u8,
        buy_in: u64,
    },
    Leave {
        table_id: TableId,
        player_id: PlayerId,
        seat_id: SeatId,
    },
    DealCard {
        table_id: TableId,
        device: DeviceSerial,
        card_code: String,
    },
    Raise {
        table_id: TableId,
        player_id: PlayerId,
        seat_id: SeatId,
        amount: u64,
    },
    Call {
        table_id: TableId,
        player_id: PlayerId,
        seat_id: SeatId,
    },
    Check {
        table_id: TableId,
        player_id: PlayerId,
        seat_id: SeatId,
    },
    Fold {
        table_id: TableId,
        player_id: PlayerId,
        seat_id: SeatId,
    },
    AllIn {
        table_id: TableId,
        player_id: PlayerId,
        seat_id: SeatId,
    },
    GetSnapshot {
        table_id: TableId,
        viewer: Option<PlayerId>,
    },
}

impl ClientMessage {
    pub fn table_id(&self) -> &TableId {
        match self {
            ClientMessage::StartGame { table_id, .. }
            | ClientMessage::ResetTable { table_id, .. }
            | ClientMessage::Join { table_id, .. }
            | ClientMessage::Leave { table_id, .. }
            | ClientMessage::DealCard { table_id, .. }
            | ClientMessage::Raise { table_id, .. }
            | ClientMessage::Call { table_id, .. }
            | ClientMessage::Check { table_id, .. }
            | ClientMessage::Fold { table_id, .. }
            | ClientMessage::AllIn { table_id, .. }
            | ClientMessage::GetSnapshot { table_id, .. } => table_id,
        }
    }

    /// Translates the wire message into the `(Actor, Command)` pair the
    /// mutator expects. Every player-originated variant carries its own
    /// `player_id`, so the actor is always resolvable from the message
    /// itself. `GetSnapshot` has no corresponding command — the caller
    /// should branch on it before reaching here.
    pub fn into_actor_command(self) -> Option<(Actor, Command)> {
        match self {
            ClientMessage::StartGame { table_id, device } => {
                Some((Actor::Dealer { device }, Command::StartHand { table_id }))
            }
            ClientMessage::ResetTable { table_id, device } => {
                Some((Actor::Dealer { device }, Command::ResetTable { table_id }))
            }
            ClientMessage::Join {
                table_id,
                player_id,
                seat_number,
                buy_in,
            } => Some((
                Actor::Player(player_id.clone()),
                Command::SitDown {
                    table_id,
                    player_id,
                    seat_number,
                    buy_in,
                },
            )),
            ClientMessage::Leave { table_id, player_id, seat_id } => {
                Some((Actor::Player(player_id), Command::LeaveTable { table_id, seat_id }))
            }
            ClientMessage::DealCard { table_id, device, card_code } => {
                Some((Actor::Dealer { device }, Command::DealCard { table_id, card_code }))
            }
            ClientMessage::Raise { table_id, player_id, seat_id, amount } => Some((
                Actor::Player(player_id),
                Command::PlayerAction {
                    table_id,
                    seat_id,
                    action: PlayerActionKind::Raise(amount),
                },
            )),
            ClientMessage::Call { table_id, player_id, seat_id } => Some((
                Actor::Player(player_id),
                Command::PlayerAction {
                    table_id,
                    seat_id,
                    action: PlayerActionKind::Call,
                },
            )),
            ClientMessage::Check { table_id, player_id, seat_id } => Some((
                Actor::Player(player_id),
                Command::PlayerAction {
                    table_id,
                    seat_id,
                    action: PlayerActionKind::Check,
                },
            )),
            ClientMessage::Fold { table_id, player_id, seat_id } => Some((
                Actor::Player(player_id),
                Command::PlayerAction {
                    table_id,
                    seat_id,
                    action: PlayerActionKind::Fold,
                },
            )),
            ClientMessage::AllIn { table_id, player_id, seat_id } => Some((
                Actor::Player(player_id),
                Command::PlayerAction {
                    table_id,
                    seat_id,
                    action: PlayerActionKind::AllIn,
                },
            )),
            ClientMessage::GetSnapshot { .. } => None,
        }
    }
}

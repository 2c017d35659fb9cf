//! Scan intake: decodes the handheld scanner's barcode format and turns
//! each scan into a `ScanCard` command on the owning table's mailbox. This
//! is the one asynchronous ingress point in the system — everything else
//! arrives as a synchronous RPC — so it is modeled as its own bounded
//! worker loop rather than threading async primitives into `texas_engine`.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use texas_engine::cards::{Card, Rank, Suit};
use texas_engine::command::{Actor, Command};
use texas_engine::error::EngineError;
use texas_engine::ids::{DeviceSerial, TableId};

use crate::tables::{ActorMsg, TableRegistry};

/// One raw scan message as it arrives off the queue.
#[derive(Debug, Clone)]
pub struct ScanMessage {
    pub table_id: TableId,
    pub serial: DeviceSerial,
    pub barcode: String,
    pub ts_seconds: u64,
}

/// Decodes a 4-digit `SRRR` barcode into a card code. Suit digit `1..4`
/// maps to `s,h,c,d`; rank digits step by ten from `010` (Ace) through
/// `130` (King) — note `010` is Ace, not a sentinel for "no rank".
pub fn decode_barcode(barcode: &str) -> Result<Card, EngineError> {
    let digits: Vec<char> = barcode.chars().collect();
    if digits.len() != 4 || !digits.iter().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::InvalidBarcode(barcode.to_string()));
    }
    let suit_digit = digits[0].to_digit(10).unwrap();
    let suit = match suit_digit {
        1 => Suit::Spades,
        2 => Suit::Hearts,
        3 => Suit::Clubs,
        4 => Suit::Diamonds,
        _ => return Err(EngineError::InvalidBarcode(barcode.to_string())),
    };
    let rank_value: u32 = digits[1..4].iter().collect::<String>().parse().map_err(|_| EngineError::InvalidBarcode(barcode.to_string()))?;
    let rank = match rank_value {
        10 => Rank::Ace,
        20 => Rank::Two,
        30 => Rank::Three,
        40 => Rank::Four,
        50 => Rank::Five,
        60 => Rank::Six,
        70 => Rank::Seven,
        80 => Rank::Eight,
        90 => Rank::Nine,
        100 => Rank::Ten,
        110 => Rank::Jack,
        120 => Rank::Queen,
        130 => Rank::King,
        _ => return Err(EngineError::InvalidBarcode(barcode.to_string())),
    };
    Ok(Card::new(rank, suit))
}

/// Bounded ring of the last-seen `(barcode, ts_seconds)` keys per table,
/// giving the dedup a throttle without an unbounded memory footprint.
const DEDUP_WINDOW: usize = 256;

#[derive(Default)]
struct Dedup {
    seen_by_table: Mutex<HashMap<TableId, VecDeque<(String, u64)>>>,
}

impl Dedup {
    fn already_seen(&self, table_id: &TableId, barcode: &str, ts_seconds: u64) -> bool {
        let mut by_table = self.seen_by_table.lock().unwrap();
        let seen = by_table.entry(table_id.clone()).or_default();
        let key = (barcode.to_string(), ts_seconds);
        if seen.contains(&key) {
            return true;
        }
        if seen.len() >= DEDUP_WINDOW {
            seen.pop_front();
        }
        seen.push_back(key);
        false
    }
}

/// Consumes `ScanMessage`s from an mpsc queue, one at a time, dispatching a
/// `ScanCard` command to the owning table's actor for each. At-least-once
/// delivery is safe because a replayed scan resolves to `CardAlreadyDealt`
/// rather than dealing the card twice.
pub struct ScanIntake {
    registry: std::sync::Arc<TableRegistry>,
    dedup: Dedup,
}

impl ScanIntake {
    pub fn new(registry: std::sync::Arc<TableRegistry>) -> Self {
        Self {
            registry,
            dedup: Dedup::default(),
        }
    }

    pub fn spawn(self: std::sync::Arc<Self>, mut rx: mpsc::Receiver<ScanMessage>) {
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                self.handle_one(msg).await;
            }
        });
    }

    async fn handle_one(&self, msg: ScanMessage) {
        if self.dedup.already_seen(&msg.table_id, &msg.barcode, msg.ts_seconds) {
            info!(table_id = %msg.table_id, barcode = %msg.barcode, "duplicate scan suppressed before reaching the table");
            return;
        }

        let card = match decode_barcode(&msg.barcode) {
            Ok(card) => card,
            Err(err) => {
                warn!(table_id = %msg.table_id, barcode = %msg.barcode, %err, "rejecting malformed scan");
                return;
            }
        };

        let handle = self.registry.handle_for(&msg.table_id).await;
        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = handle.send(ActorMsg::Apply {
            actor: Actor::Scanner { device: msg.serial.clone() },
            command: Command::ScanCard {
                table_id: msg.table_id.clone(),
                device: msg.serial,
                scan_id: format!("{}|{}", msg.barcode, msg.ts_seconds),
                card_code: card.code(),
            },
            reply: reply_tx,
        });
        if sent.is_err() {
            warn!(table_id = %msg.table_id, "table actor gone, dropping scan");
            return;
        }
        match reply_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(table_id = %msg.table_id, %err, "scan rejected by engine"),
            Err(_) => warn!(table_id = %msg.table_id, "table actor dropped reply"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ace_of_spades() {
        let card = decode_barcode("1010").unwrap();
        assert_eq!(card.code(), "As");
    }

    #[test]
    fn decodes_king_of_diamonds() {
        let card = decode_barcode("4130").unwrap();
        assert_eq!(card.code(), "Kd");
    }

    #[test]
    fn rejects_malformed_barcodes() {
        assert!(decode_barcode("101").is_err());
        assert!(decode_barcode("5010").is_err());
        assert!(decode_barcode("1000").is_err());
        assert!(decode_barcode("abcd").is_err());
    }
}

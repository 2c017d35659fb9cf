//! Per-table WebSocket fan-out, the concrete `EventSink` the demo binary
//! wires into `TableMutator::apply`. Grounded in
//! `poker-ws::main::TableActor::broadcast`, which walks a `Vec<ClientTx>`
//! and drops senders whose receiver has hung up.
//!
//! `EventSink::publish` takes `&self`, not per-viewer context, so redaction
//! of `HoleCardsDealt` happens here rather than in the engine: this struct
//! keeps its own `seat -> player` cache, updated from `SeatJoined`/
//! `SeatLeft` as they pass through, and uses it to decide which subscriber
//! gets the real cards and which gets `FACE_DOWN` sentinels.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tracing::debug;

use texas_engine::cards::FACE_DOWN;
use texas_engine::event::{Event, EventSink};
use texas_engine::ids::{PlayerId, SeatId, TableId};

pub type ClientTx = mpsc::UnboundedSender<Message>;

struct Subscriber {
    /// `None` for a spectator connection with no seat of its own.
    viewer: Option<PlayerId>,
    tx: ClientTx,
}

#[derive(Default)]
struct TableChannel {
    subscribers: Vec<Subscriber>,
    seat_owners: HashMap<SeatId, PlayerId>,
}

#[derive(Default)]
pub struct TableBroadcast {
    tables: Mutex<HashMap<TableId, TableChannel>>,
}

impl TableBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, table_id: &TableId, viewer: Option<PlayerId>, tx: ClientTx) {
        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(table_id.clone())
            .or_default()
            .subscribers
            .push(Subscriber { viewer, tx });
    }

    fn redact_for(channel: &TableChannel, event: &Event, viewer: Option<&PlayerId>) -> Event {
        match event {
            Event::HoleCardsDealt { hand_id, seat_id, cards } => {
                let owner = channel.seat_owners.get(seat_id);
                let owns_seat = owner.is_some() && owner == viewer;
                if owns_seat {
                    event.clone()
                } else {
                    Event::HoleCardsDealt {
                        hand_id: hand_id.clone(),
                        seat_id: seat_id.clone(),
                        cards: vec![FACE_DOWN.to_string(); cards.len()],
                    }
                }
            }
            other => other.clone(),
        }
    }
}

impl EventSink for TableBroadcast {
    fn publish(&self, table_id: &TableId, event: Event) {
        let mut tables = self.tables.lock().unwrap();
        let channel = tables.entry(table_id.clone()).or_default();

        match &event {
            Event::SeatJoined { seat_id, player_id, .. } => {
                channel.seat_owners.insert(seat_id.clone(), player_id.clone());
            }
            Event::SeatLeft { seat_id, .. } => {
                channel.seat_owners.remove(seat_id);
            }
            _ => {}
        }

        channel.subscribers.retain(|sub| {
            let payload = Self::redact_for(channel, &event, sub.viewer.as_ref());
            match serde_json::to_string(&payload) {
                Ok(text) => sub.tx.send(Message::Text(text)).is_ok(),
                Err(err) => {
                    debug!(%err, "failed to serialize event for broadcast");
                    true
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_hole_cards_from_non_owning_viewer() {
        let broadcast = TableBroadcast::new();
        let table_id = TableId::new("t1");
        let (tx_owner, mut rx_owner) = mpsc::unbounded_channel();
        let (tx_other, mut rx_other) = mpsc::unbounded_channel();
        broadcast.subscribe(&table_id, Some(PlayerId::new("alice")), tx_owner);
        broadcast.subscribe(&table_id, Some(PlayerId::new("bob")), tx_other);

        broadcast.publish(
            &table_id,
            Event::SeatJoined {
                table_id: table_id.clone(),
                seat_id: SeatId::new("s1"),
                player_id: PlayerId::new("alice"),
                buy_in: 100,
            },
        );
        broadcast.publish(
            &table_id,
            Event::HoleCardsDealt {
                hand_id: texas_engine::ids::HandId::new("h1"),
                seat_id: SeatId::new("s1"),
                cards: vec!["As".to_string()],
            },
        );

        rx_owner.try_recv().unwrap(); // seat-joined broadcast
        let owner_msg = rx_owner.try_recv().unwrap();
        let Message::Text(owner_text) = owner_msg else { panic!("expected text") };
        assert!(owner_text.contains("As"));

        // first message to bob was the seat-joined broadcast; skip it.
        rx_other.try_recv().unwrap();
        let other_msg = rx_other.try_recv().unwrap();
        let Message::Text(other_text) = other_msg else { panic!("expected text") };
        assert!(other_text.contains("FD"));
        assert!(!other_text.contains("As"));
    }
}

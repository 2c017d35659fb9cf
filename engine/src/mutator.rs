//! Table mutator: the single-writer guarantee for a table. Loads
//! table+seats+hand, applies exactly one command, commits atomically, and
//! emits events best-effort. Grounded in `poker-ws::main::TableActor`'s
//! per-table serialization, realized here as a `Mutex` keyed by `TableId`
//! rather than an actor mailbox — the engine stays free of async
//! primitives; `server::tables` supplies the mailbox that calls into this
//! synchronously.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::authority::authorize;
use crate::command::{Actor, Command, PlayerActionKind};
use crate::error::EngineError;
use crate::event::{Event, EventSink};
use crate::hand::{Hand, HandState, HandStatus};
use crate::ids::TableId;
use crate::seat::{Seat, SeatStatus};
use crate::table::Table;

/// The full state the mutator loads and commits atomically for one table.
#[derive(Debug, Clone)]
pub struct TableState {
    pub table: Table,
    pub seats: Vec<Seat>,
    pub hand: Option<Hand>,
}

/// Transactional storage contract. A real deployment backs this with a row
/// store offering repeatable-read isolation; `server::store` provides an
/// in-memory implementation for the demo binary and integration tests.
pub trait TableStore: Send + Sync {
    fn load(&self, table_id: &TableId) -> Result<TableState, EngineError>;
    fn commit(&self, state: TableState) -> Result<(), EngineError>;
}

pub const MAX_CONFLICT_RETRIES: u32 = 3;

/// Serializes mutations per table via an in-process mutex keyed by
/// `TableId`, an alternative to a DB advisory lock for single-process
/// deployments.
pub struct TableMutator<S: TableStore> {
    store: S,
    locks: Mutex<HashMap<TableId, std::sync::Arc<Mutex<()>>>>,
}

impl<S: TableStore> TableMutator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Read-only load for snapshot requests, bypassing the per-table lock
    /// since a stale read is acceptable for a spectator view and callers
    /// never mutate the result.
    pub fn load(&self, table_id: &TableId) -> Result<TableState, EngineError> {
        self.store.load(table_id)
    }

    fn lock_for(&self, table_id: &TableId) -> std::sync::Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(table_id.clone())
            .or_insert_with(|| std::sync::Arc::new(Mutex::new(())))
            .clone()
    }

    /// Applies `command` as `actor`, retrying up to `MAX_CONFLICT_RETRIES`
    /// times on a `Busy` conflict before surfacing it to the caller. Emits
    /// events to `sink` after a successful commit; publishing never blocks
    /// or rolls back the transaction.
    pub fn apply(&self, table_id: &TableId, actor: Actor, command: Command, sink: &dyn EventSink) -> Result<(), EngineError> {
        let table_lock = self.lock_for(table_id);
        let _guard = table_lock.lock().unwrap();

        let mut attempts = 0;
        loop {
            match self.try_apply_once(table_id, &actor, &command, sink) {
                Ok(()) => return Ok(()),
                Err(EngineError::Busy) if attempts < MAX_CONFLICT_RETRIES => {
                    attempts += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn try_apply_once(&self, table_id: &TableId, actor: &Actor, command: &Command, sink: &dyn EventSink) -> Result<(), EngineError> {
        let mut state = self.store.load(table_id)?;

        authorize(actor, command, &state.seats, state.hand.as_ref())?;

        let mut events = Vec::new();
        apply_command(&mut state, command, &mut events)?;

        self.store.commit(state)?;

        for event in events {
            sink.publish(table_id, event);
        }
        Ok(())
    }
}

fn apply_command(state: &mut TableState, command: &Command, events: &mut Vec<Event>) -> Result<(), EngineError> {
    match command {
        Command::SitDown {
            table_id,
            player_id,
            seat_number,
            buy_in,
        } => {
            if state.hand.as_ref().is_some_and(|h| h.status == HandStatus::Active) {
                return Err(EngineError::WrongState);
            }
            if state.seats.len() >= state.table.max_seats as usize {
                return Err(EngineError::TableFull);
            }
            if state.seats.iter().any(|s| &s.player_id == player_id) {
                return Err(EngineError::PlayerAlreadySeated);
            }
            if *buy_in == 0 {
                return Err(EngineError::InsufficientBalance);
            }
            let seat = Seat {
                id: crate::ids::SeatId::new(format!("{table_id}-seat-{seat_number}")),
                table_id: table_id.clone(),
                player_id: player_id.clone(),
                seat_number: *seat_number,
                buy_in: *buy_in,
                current_bet: 0,
                cards: vec![],
                status: SeatStatus::Active,
                last_action: None,
            };
            events.push(Event::SeatJoined {
                table_id: table_id.clone(),
                seat_id: seat.id.clone(),
                player_id: player_id.clone(),
                buy_in: *buy_in,
            });
            state.seats.push(seat);
            Ok(())
        }

        Command::LeaveTable { table_id, seat_id } => {
            if let Some(hand) = &state.hand {
                let mid_hand = hand.status == HandStatus::Active && hand.state != HandState::Showdown;
                if mid_hand {
                    return Err(EngineError::CannotLeaveMidHand);
                }
            }
            let idx = state
                .seats
                .iter()
                .position(|s| &s.id == seat_id)
                .ok_or(EngineError::SeatNotFound)?;
            state.seats.remove(idx);
            events.push(Event::SeatLeft {
                table_id: table_id.clone(),
                seat_id: seat_id.clone(),
            });
            Ok(())
        }

        Command::StartHand { table_id } => {
            if state.hand.as_ref().is_some_and(|h| h.status == HandStatus::Active) {
                return Err(EngineError::HandAlreadyActive);
            }
            begin_new_hand(state, table_id, events)
        }

        // RESET_TABLE differs from START_GAME only in that it is allowed
        // (indeed required) to terminate an in-flight hand first; the
        // bootstrap it performs afterward is identical.
        Command::ResetTable { table_id } => begin_new_hand(state, table_id, events),

        Command::PlayerAction { seat_id, action, .. } => {
            let hand = state.hand.as_mut().ok_or(EngineError::NoActiveGame)?;
            hand.apply_player_action(&mut state.seats, seat_id, *action)?;
            events.push(Event::ActionTaken {
                hand_id: hand.id.clone(),
                seat_id: seat_id.clone(),
                action: format!("{action:?}"),
                amount: match action {
                    PlayerActionKind::Bet(a) | PlayerActionKind::Raise(a) => Some(*a),
                    _ => None,
                },
            });
            finalize_if_showdown(state, events);
            Ok(())
        }

        Command::DealCard { card_code, .. } => deal_one_card(state, card_code, events),

        // Decoding the barcode into a card code happens upstream in the
        // scanner intake; by the time it reaches the mutator, a ScanCard
        // command is dealt identically to a dealer's manual deal. Replay of
        // the same scan is idempotent via the duplicate-card check shared
        // with `DealCard`.
        Command::ScanCard { card_code, .. } => deal_one_card(state, card_code, events),
    }
}

/// Bootstraps a fresh hand at `table_id`, completing any prior hand first.
/// Shared by `StartHand` (after its precondition check) and `ResetTable`
/// (unconditionally).
fn begin_new_hand(state: &mut TableState, table_id: &TableId, events: &mut Vec<Event>) -> Result<(), EngineError> {
    let previous_button = state.hand.as_ref().map(|h| h.dealer_button_seat.clone());
    if let Some(prior) = state.hand.as_mut() {
        prior.status = HandStatus::Completed;
    }
    let hand_id = crate::ids::HandId::new(format!("{table_id}-hand-{}", state.seats.len()));
    let new_hand = Hand::start(
        hand_id,
        table_id.clone(),
        &mut state.seats,
        previous_button.as_ref(),
        state.table.small_blind,
        state.table.big_blind,
    )?;
    events.push(Event::HandStarted {
        table_id: table_id.clone(),
        hand_id: new_hand.id.clone(),
        dealer_seat: new_hand.dealer_button_seat.clone(),
    });
    events.push(Event::BlindsPosted {
        hand_id: new_hand.id.clone(),
        small_blind_seat: new_hand.small_blind_seat.clone(),
        big_blind_seat: new_hand.big_blind_seat.clone(),
        small_blind: new_hand.small_blind,
        big_blind: new_hand.big_blind,
    });
    state.hand = Some(new_hand);
    Ok(())
}

/// Validates and applies one `DEAL_CARD`, whether it arrived from the
/// dealer directly or via a decoded scanner barcode. Emits a
/// `HoleCardsDealt` event while the hand is still in `DEAL_HOLE_CARDS` and a
/// `StreetDealt` event once the card lands on the board.
fn deal_one_card(state: &mut TableState, card_code: &str, events: &mut Vec<Event>) -> Result<(), EngineError> {
    let card = crate::cards::Card::parse(card_code)?;
    let hand = state.hand.as_mut().ok_or(EngineError::NoActiveGame)?;
    let dealt = crate::deck::dealt_cards(state.seats.iter().map(|s| s.cards.as_slice()), &hand.community_cards);
    if dealt.contains(&card) {
        return Err(EngineError::CardAlreadyDealt(card.code()));
    }
    let was_hole_deal = hand.state == HandState::DealHoleCards;
    let recipient = hand.assigned_seat.clone();
    hand.deal_card(&mut state.seats, card)?;
    if was_hole_deal {
        events.push(Event::HoleCardsDealt {
            hand_id: hand.id.clone(),
            seat_id: recipient.ok_or_else(|| EngineError::Fatal("no recipient for hole card".to_string()))?,
            cards: vec![card.code()],
        });
    } else {
        events.push(Event::StreetDealt {
            hand_id: hand.id.clone(),
            street: format!("{:?}", hand.state),
            cards: hand.community_cards.clone(),
        });
    }
    finalize_if_showdown(state, events);
    Ok(())
}

fn finalize_if_showdown(state: &mut TableState, events: &mut Vec<Event>) {
    let Some(hand) = state.hand.as_mut() else { return };
    if hand.state != HandState::Showdown || hand.status != HandStatus::Active {
        return;
    }
    let pots = hand.finalize_pots();
    events.push(Event::PotsFinalized {
        hand_id: hand.id.clone(),
        pots: pots.clone(),
    });
    let result = crate::showdown::resolve(&mut state.seats, &pots, &hand.community_cards, &hand.dealer_button_seat);
    let payouts = result
        .payouts
        .iter()
        .map(|p| (p.seat_id.clone(), p.amount))
        .collect();
    hand.status = HandStatus::Completed;
    events.push(Event::HandEnded {
        hand_id: hand.id.clone(),
        payouts,
    });
}

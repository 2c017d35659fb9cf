//! End-to-end hand scenarios driven entirely through `TableMutator::apply`,
//! exercising the full dealer/player/scanner command surface the way a real
//! transport would. Grounded in `poker-ws/tests/poker_tests.rs`'s style of
//! driving the table through its public command surface rather than calling
//! internal hand-state methods directly.

use std::collections::HashMap;
use std::sync::Mutex;

use texas_engine::command::{Actor, Command, PlayerActionKind};
use texas_engine::error::EngineError;
use texas_engine::event::RecordingSink;
use texas_engine::hand::HandState;
use texas_engine::ids::{DeviceSerial, PlayerId, SeatId, TableId};
use texas_engine::mutator::{TableMutator, TableState, TableStore};
use texas_engine::seat::SeatStatus;
use texas_engine::table::Table;

/// A minimal `TableStore` for tests: one table, guarded by a mutex, with no
/// persistence beyond the process. Mirrors `server::store::InMemoryStore`
/// without pulling in the async crate.
#[derive(Default)]
struct TestStore {
    tables: Mutex<HashMap<TableId, TableState>>,
}

impl TestStore {
    fn seed(table_id: TableId, small_blind: u64, big_blind: u64) -> Self {
        let store = TestStore::default();
        store.tables.lock().unwrap().insert(
            table_id.clone(),
            TableState {
                table: Table::new(table_id, "main", PlayerId::new("house"), small_blind, big_blind),
                seats: Vec::new(),
                hand: None,
            },
        );
        store
    }
}

impl TableStore for TestStore {
    fn load(&self, table_id: &TableId) -> Result<TableState, EngineError> {
        self.tables
            .lock()
            .unwrap()
            .get(table_id)
            .cloned()
            .ok_or_else(|| EngineError::Fatal("unknown table".to_string()))
    }

    fn commit(&self, state: TableState) -> Result<(), EngineError> {
        self.tables.lock().unwrap().insert(state.table.id.clone(), state);
        Ok(())
    }
}

fn dealer() -> Actor {
    Actor::Dealer {
        device: DeviceSerial::new("dealer-1"),
    }
}

fn sit_down(mutator: &TableMutator<TestStore>, table_id: &TableId, sink: &RecordingSink, player: &str, seat_number: u8, buy_in: u64) {
    mutator
        .apply(
            table_id,
            Actor::Player(PlayerId::new(player)),
            Command::SitDown {
                table_id: table_id.clone(),
                player_id: PlayerId::new(player),
                seat_number,
                buy_in,
            },
            sink,
        )
        .unwrap();
}

fn deal(mutator: &TableMutator<TestStore>, table_id: &TableId, sink: &RecordingSink, card_code: &str) {
    mutator
        .apply(
            table_id,
            dealer(),
            Command::DealCard {
                table_id: table_id.clone(),
                card_code: card_code.to_string(),
            },
            sink,
        )
        .unwrap();
}

fn seat_id_for(mutator: &TableMutator<TestStore>, table_id: &TableId, player: &str) -> SeatId {
    mutator
        .load(table_id)
        .unwrap()
        .seats
        .iter()
        .find(|s| s.player_id == PlayerId::new(player))
        .unwrap()
        .id
        .clone()
}

#[test]
fn scenario_a_heads_up_min_re_raise() {
    let table_id = TableId::new("table-a");
    let mutator = TableMutator::new(TestStore::seed(table_id.clone(), 5, 10));
    let sink = RecordingSink::default();

    sit_down(&mutator, &table_id, &sink, "p1", 0, 300);
    sit_down(&mutator, &table_id, &sink, "p2", 1, 300);
    mutator.apply(&table_id, dealer(), Command::StartHand { table_id: table_id.clone() }, &sink).unwrap();

    // heads-up: p1 (seat 0) is the button/small blind, p2 is the big blind.
    for code in ["As", "Qs", "Ks", "Js"] {
        deal(&mutator, &table_id, &sink, code);
    }

    let p1 = seat_id_for(&mutator, &table_id, "p1");
    let p2 = seat_id_for(&mutator, &table_id, "p2");

    let action = |seat: &SeatId, kind: PlayerActionKind| Command::PlayerAction {
        table_id: table_id.clone(),
        seat_id: seat.clone(),
        action: kind,
    };

    mutator
        .apply(&table_id, Actor::Player(PlayerId::new("p1")), action(&p1, PlayerActionKind::Raise(50)), &sink)
        .unwrap();

    let err = mutator
        .apply(&table_id, Actor::Player(PlayerId::new("p2")), action(&p2, PlayerActionKind::Raise(70)), &sink)
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidRaise);

    mutator
        .apply(&table_id, Actor::Player(PlayerId::new("p2")), action(&p2, PlayerActionKind::Raise(90)), &sink)
        .unwrap();
    mutator
        .apply(&table_id, Actor::Player(PlayerId::new("p1")), action(&p1, PlayerActionKind::Check), &sink)
        .unwrap();

    let state = mutator.load(&table_id).unwrap();
    let hand = state.hand.unwrap();
    assert_eq!(hand.state, HandState::DealFlop);
    assert_eq!(hand.pot_total, 180);
    for seat in &state.seats {
        assert_eq!(seat.current_bet, 0);
    }
}

#[test]
fn scenario_b_three_way_all_in_with_side_pot() {
    let table_id = TableId::new("table-b");
    let mutator = TableMutator::new(TestStore::seed(table_id.clone(), 5, 10));
    let sink = RecordingSink::default();

    sit_down(&mutator, &table_id, &sink, "p1", 0, 200);
    sit_down(&mutator, &table_id, &sink, "p2", 1, 50);
    sit_down(&mutator, &table_id, &sink, "p3", 2, 50);
    mutator.apply(&table_id, dealer(), Command::StartHand { table_id: table_id.clone() }, &sink).unwrap();

    // 3-way: p1 is button, p2 posts SB, p3 posts BB, p1 acts first preflop.
    // Hole cards deal one at a time starting from the small blind (p2), so
    // the recipient order is p2, p3, p1, p2, p3, p1.
    for code in ["2c", "Kd", "2h", "3c", "Qd", "3h"] {
        deal(&mutator, &table_id, &sink, code);
    }

    let p1 = seat_id_for(&mutator, &table_id, "p1");
    let p2 = seat_id_for(&mutator, &table_id, "p2");
    let p3 = seat_id_for(&mutator, &table_id, "p3");

    mutator
        .apply(
            &table_id,
            Actor::Player(PlayerId::new("p1")),
            Command::PlayerAction { table_id: table_id.clone(), seat_id: p1.clone(), action: PlayerActionKind::Fold },
            &sink,
        )
        .unwrap();
    mutator
        .apply(
            &table_id,
            Actor::Player(PlayerId::new("p2")),
            Command::PlayerAction { table_id: table_id.clone(), seat_id: p2.clone(), action: PlayerActionKind::Raise(50) },
            &sink,
        )
        .unwrap();
    mutator
        .apply(
            &table_id,
            Actor::Player(PlayerId::new("p3")),
            Command::PlayerAction { table_id: table_id.clone(), seat_id: p3.clone(), action: PlayerActionKind::Check },
            &sink,
        )
        .unwrap();

    // both remaining seats are all-in; the flop/turn/river run out with no
    // further betting action possible.
    for code in ["Ks", "Qs", "Js", "5h", "6h"] {
        deal(&mutator, &table_id, &sink, code);
    }

    let state = mutator.load(&table_id).unwrap();
    let hand = state.hand.unwrap();
    assert_eq!(hand.state, HandState::Showdown);

    let seat_by_player = |player: &str| state.seats.iter().find(|s| s.player_id == PlayerId::new(player)).unwrap();
    assert_eq!(seat_by_player("p1").buy_in, 200);
    assert_eq!(seat_by_player("p2").buy_in, 0);
    assert_eq!(seat_by_player("p2").status, SeatStatus::Eliminated);
    assert_eq!(seat_by_player("p3").buy_in, 100);
}

#[test]
fn scenario_c_dealer_button_advances_to_next_non_eliminated_seat() {
    let table_id = TableId::new("table-c");
    let mutator = TableMutator::new(TestStore::seed(table_id.clone(), 5, 10));
    let sink = RecordingSink::default();

    for n in 0..8u8 {
        sit_down(&mutator, &table_id, &sink, &format!("p{n}"), n, 500);
    }
    mutator.apply(&table_id, dealer(), Command::StartHand { table_id: table_id.clone() }, &sink).unwrap();

    let first_button = mutator.load(&table_id).unwrap().hand.unwrap().dealer_button_seat;
    let first_seat_number = mutator
        .load(&table_id)
        .unwrap()
        .seats
        .iter()
        .find(|s| s.id == first_button)
        .unwrap()
        .seat_number;

    // RESET_TABLE terminates the in-flight hand and starts a fresh one in
    // one step; only the button-advance behavior of a fresh hand is under
    // test here, not a played-out showdown.
    mutator.apply(&table_id, dealer(), Command::ResetTable { table_id: table_id.clone() }, &sink).unwrap();
    let second_button = mutator.load(&table_id).unwrap().hand.unwrap().dealer_button_seat;
    let second_seat_number = mutator
        .load(&table_id)
        .unwrap()
        .seats
        .iter()
        .find(|s| s.id == second_button)
        .unwrap()
        .seat_number;

    assert_eq!(second_seat_number, (first_seat_number + 1) % 8);
}

#[test]
fn scenario_e_scan_replay_is_idempotent() {
    let table_id = TableId::new("table-e");
    let mutator = TableMutator::new(TestStore::seed(table_id.clone(), 5, 10));
    let sink = RecordingSink::default();

    sit_down(&mutator, &table_id, &sink, "p1", 0, 300);
    sit_down(&mutator, &table_id, &sink, "p2", 1, 300);
    mutator.apply(&table_id, dealer(), Command::StartHand { table_id: table_id.clone() }, &sink).unwrap();

    let scan = Command::ScanCard {
        table_id: table_id.clone(),
        device: DeviceSerial::new("scanner-1"),
        scan_id: "1010|1000".to_string(),
        card_code: "As".to_string(),
    };
    let scanner = Actor::Scanner { device: DeviceSerial::new("scanner-1") };

    mutator.apply(&table_id, scanner.clone(), scan.clone(), &sink).unwrap();
    let before = mutator.load(&table_id).unwrap();

    let err = mutator.apply(&table_id, scanner, scan, &sink).unwrap_err();
    assert_eq!(err, EngineError::CardAlreadyDealt("As".to_string()));

    let after = mutator.load(&table_id).unwrap();
    let cards_before: usize = before.seats.iter().map(|s| s.cards.len()).sum();
    let cards_after: usize = after.seats.iter().map(|s| s.cards.len()).sum();
    assert_eq!(cards_before, cards_after);
}

#[test]
fn scenario_f_leave_during_active_hand_is_forbidden() {
    let table_id = TableId::new("table-f");
    let mutator = TableMutator::new(TestStore::seed(table_id.clone(), 5, 10));
    let sink = RecordingSink::default();

    sit_down(&mutator, &table_id, &sink, "p1", 0, 300);
    sit_down(&mutator, &table_id, &sink, "p2", 1, 300);
    mutator.apply(&table_id, dealer(), Command::StartHand { table_id: table_id.clone() }, &sink).unwrap();

    let p2 = seat_id_for(&mutator, &table_id, "p2");
    let err = mutator
        .apply(
            &table_id,
            Actor::Player(PlayerId::new("p2")),
            Command::LeaveTable { table_id: table_id.clone(), seat_id: p2.clone() },
            &sink,
        )
        .unwrap_err();
    assert_eq!(err, EngineError::CannotLeaveMidHand);

    let state = mutator.load(&table_id).unwrap();
    assert!(state.seats.iter().any(|s| s.id == p2));
}

#[test]
fn scenario_d_odd_chip_split_matches_spec_literal_values() {
    use texas_engine::cards::{Card, Rank, Suit};
    use texas_engine::pot::SidePot;
    use texas_engine::showdown::resolve;

    fn seat(num: u8, cards: Vec<Card>) -> texas_engine::seat::Seat {
        texas_engine::seat::Seat {
            id: SeatId::new(format!("s{num}")),
            table_id: TableId::new("t"),
            player_id: PlayerId::new(format!("p{num}")),
            seat_number: num,
            buy_in: 0,
            current_bet: 0,
            cards,
            status: SeatStatus::Active,
            last_action: None,
        }
    }

    let board = vec![
        Card::new(Rank::Two, Suit::Clubs),
        Card::new(Rank::Seven, Suit::Diamonds),
        Card::new(Rank::Nine, Suit::Hearts),
        Card::new(Rank::Jack, Suit::Spades),
        Card::new(Rank::Three, Suit::Clubs),
    ];
    let mut seats = vec![
        seat(0, vec![Card::new(Rank::Four, Suit::Hearts), Card::new(Rank::Four, Suit::Spades)]),
        seat(2, vec![Card::new(Rank::King, Suit::Hearts), Card::new(Rank::King, Suit::Spades)]),
        seat(5, vec![Card::new(Rank::King, Suit::Diamonds), Card::new(Rank::King, Suit::Clubs)]),
    ];
    seats[0].status = SeatStatus::Folded;

    let pots = vec![SidePot {
        amount: 301,
        eligible_seats: vec![SeatId::new("s2"), SeatId::new("s5")],
    }];
    let result = resolve(&mut seats, &pots, &board, &SeatId::new("s0"));

    let s2 = result.payouts.iter().find(|p| p.seat_id == SeatId::new("s2")).unwrap();
    let s5 = result.payouts.iter().find(|p| p.seat_id == SeatId::new("s5")).unwrap();
    assert_eq!(s2.amount, 151);
    assert_eq!(s5.amount, 150);
}

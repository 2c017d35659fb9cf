//! Hand state machine. Owns `Hand`'s enum-valued `state` and drives it
//! through dealing and betting. Grounded in
//! `texas-engine::state::TexasHoldem`'s stage-advance methods and
//! `poker-ws::game::Table`'s mutation methods; unified here into one
//! aggregate that the mutator loads, mutates in place, and commits
//! alongside its seats.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::betting::{round_is_closed, ActionKind, BettingRound};
use crate::cards::Card;
use crate::command::PlayerActionKind;
use crate::error::EngineError;
use crate::ids::{HandId, SeatId, TableId};
use crate::pot::{compute_pots, Contribution, SidePot};
use crate::seat::{blind_positions, first_postflop_actor, next_active, next_non_eliminated, ordered, Seat, SeatStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandState {
    DealHoleCards,
    Betting,
    DealFlop,
    DealTurn,
    DealRiver,
    Showdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Hand {
    pub id: HandId,
    pub table_id: TableId,
    pub status: HandStatus,
    pub state: HandState,
    pub dealer_button_seat: SeatId,
    pub small_blind_seat: SeatId,
    pub big_blind_seat: SeatId,
    pub assigned_seat: Option<SeatId>,
    pub community_cards: Vec<Card>,
    pub pot_total: u64,
    pub bet_count: u32,
    pub required_bet_count: u32,
    pub last_raise_increment: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    pub betting_round: Option<BettingRound>,
    /// Cumulative per-seat contribution across all streets so far this
    /// hand, carried forward each time a betting round closes.
    pub carried: Vec<Contribution>,
    pub finalized_pots: Vec<SidePot>,
    pub turn_started_at: Option<Instant>,
}

impl Hand {
    /// Bootstraps a new hand at a table: resets non-eliminated seats, moves
    /// the button, posts blinds, and sets `assignedSeatId` to the small
    /// blind so it receives the first hole card.
    pub fn start(
        id: HandId,
        table_id: TableId,
        seats: &mut [Seat],
        previous_button: Option<&SeatId>,
        small_blind: u64,
        big_blind: u64,
    ) -> Result<Hand, EngineError> {
        for seat in seats.iter_mut() {
            if seat.status != SeatStatus::Eliminated {
                seat.cards.clear();
                seat.status = SeatStatus::Active;
                seat.current_bet = 0;
            }
        }

        let active_count = seats
            .iter()
            .filter(|s| s.status != SeatStatus::Eliminated)
            .count();
        if active_count < 2 {
            return Err(EngineError::NotEnoughPlayers);
        }

        let button = match previous_button {
            Some(prev) => next_non_eliminated(seats, prev).ok_or(EngineError::NotEnoughPlayers)?,
            None => ordered(seats)
                .into_iter()
                .find(|s| s.status != SeatStatus::Eliminated)
                .map(|s| s.id.clone())
                .ok_or(EngineError::NotEnoughPlayers)?,
        };

        let live: Vec<Seat> = seats
            .iter()
            .filter(|s| s.status != SeatStatus::Eliminated)
            .cloned()
            .collect();
        let blinds = blind_positions(&live, &button).ok_or(EngineError::NotEnoughPlayers)?;

        post_blind(seats, &blinds.small_blind, small_blind);
        post_blind(seats, &blinds.big_blind, big_blind);

        Ok(Hand {
            id,
            table_id,
            status: HandStatus::Active,
            state: HandState::DealHoleCards,
            dealer_button_seat: button,
            assigned_seat: Some(blinds.small_blind.clone()),
            small_blind_seat: blinds.small_blind,
            big_blind_seat: blinds.big_blind,
            community_cards: Vec::new(),
            pot_total: 0,
            bet_count: 0,
            required_bet_count: 0,
            last_raise_increment: big_blind,
            small_blind,
            big_blind,
            betting_round: None,
            carried: Vec::new(),
            finalized_pots: Vec::new(),
            turn_started_at: Some(Instant::now()),
        })
    }

    /// Handles a `DEAL_CARD` command: hole cards in `DEAL_HOLE_CARDS`, one
    /// board card at a time in `DEAL_FLOP`/`DEAL_TURN`/`DEAL_RIVER`. The
    /// card is validated for uniqueness by the caller (mutator) before this
    /// is invoked.
    pub fn deal_card(&mut self, seats: &mut [Seat], card: Card) -> Result<(), EngineError> {
        match self.state {
            HandState::DealHoleCards => {
                let seat_id = self.assigned_seat.clone().ok_or_else(|| {
                    EngineError::Fatal("no assigned seat during hole card deal".to_string())
                })?;
                let seat = find_seat_mut(seats, &seat_id)?;
                seat.cards.push(card);

                let next_recipient = seats
                    .iter()
                    .filter(|s| s.in_hand())
                    .find(|s| s.cards.len() < 2)
                    .map(|s| s.id.clone());

                match next_recipient {
                    Some(_) => {
                        self.assigned_seat = next_active(seats, &seat_id);
                    }
                    None => self.init_betting_round(seats, true),
                }
                Ok(())
            }
            HandState::DealFlop => {
                self.community_cards.push(card);
                if self.community_cards.len() == 3 {
                    self.init_betting_round(seats, false);
                }
                Ok(())
            }
            HandState::DealTurn | HandState::DealRiver => {
                self.community_cards.push(card);
                self.init_betting_round(seats, false);
                Ok(())
            }
            HandState::Betting | HandState::Showdown => Err(EngineError::WrongState),
        }
    }

    /// Handles a player action during `BETTING`.
    pub fn apply_player_action(
        &mut self,
        seats: &mut [Seat],
        seat_id: &SeatId,
        action: PlayerActionKind,
    ) -> Result<(), EngineError> {
        if self.state != HandState::Betting {
            return Err(EngineError::WrongState);
        }
        if self.assigned_seat.as_ref() != Some(seat_id) {
            return Err(EngineError::NotYourTurn);
        }

        let (stack, committed) = {
            let seat = find_seat(seats, seat_id)?;
            if seat.status != SeatStatus::Active {
                return Err(EngineError::NotYourTurn);
            }
            (seat.buy_in, seat.current_bet)
        };

        let (kind, requested_total) = match action {
            PlayerActionKind::Fold => (ActionKind::Fold, None),
            PlayerActionKind::Check => (ActionKind::Check, None),
            PlayerActionKind::Call => (ActionKind::Call, None),
            PlayerActionKind::Bet(amount) => (ActionKind::Bet, Some(amount)),
            PlayerActionKind::Raise(amount) => (ActionKind::Raise, Some(amount)),
            PlayerActionKind::AllIn => (ActionKind::AllIn, None),
        };

        let round = self
            .betting_round
            .as_mut()
            .ok_or_else(|| EngineError::Fatal("betting round missing".to_string()))?;
        let new_total = round.apply(seat_id, kind, committed, stack, requested_total)?;

        if matches!(action, PlayerActionKind::Raise(_)) {
            self.required_bet_count = self.bet_count
                + seats
                    .iter()
                    .filter(|s| s.id != *seat_id && s.status == SeatStatus::Active)
                    .count() as u32;
            self.last_raise_increment = round.min_raise_increment;
        }

        let seat = find_seat_mut(seats, seat_id)?;
        if matches!(action, PlayerActionKind::Fold) {
            seat.status = SeatStatus::Folded;
        } else {
            let paid = new_total - committed;
            seat.current_bet = new_total;
            seat.buy_in -= paid;
            if seat.buy_in == 0 {
                seat.status = SeatStatus::AllIn;
            }
        }
        self.bet_count += 1;

        self.advance_after_action(seats);
        Ok(())
    }

    fn advance_after_action(&mut self, seats: &mut [Seat]) {
        if only_one_seat_remains(seats) {
            self.close_betting_round(seats);
            return;
        }
        let commitments: Vec<(SeatId, u64)> = seats.iter().map(|s| (s.id.clone(), s.current_bet)).collect();
        let closed = match &self.betting_round {
            Some(round) => round_is_closed(round, seats, &commitments),
            None => true,
        };
        if closed {
            self.close_betting_round(seats);
        } else {
            self.assigned_seat = next_active(seats, self.assigned_seat.as_ref().unwrap());
        }
    }

    fn init_betting_round(&mut self, seats: &mut [Seat], is_preflop: bool) {
        self.bet_count = 0;
        let active_count = seats.iter().filter(|s| s.status == SeatStatus::Active).count();
        self.required_bet_count = active_count as u32;
        self.last_raise_increment = self.big_blind;

        if is_preflop {
            self.betting_round = Some(BettingRound::with_opening_bet(self.big_blind, self.big_blind));
            let live: Vec<Seat> = seats.iter().filter(|s| s.in_hand()).cloned().collect();
            self.assigned_seat = blind_positions(&live, &self.dealer_button_seat)
                .map(|b| b.first_preflop_actor)
                .or_else(|| first_postflop_actor(seats, &self.dealer_button_seat));
        } else {
            self.betting_round = Some(BettingRound::new(self.big_blind));
            self.assigned_seat = first_postflop_actor(seats, &self.dealer_button_seat);
        }
        self.state = HandState::Betting;

        // A street where at most one seat is able to act (every other
        // contender is already all-in or folded) has no real betting left
        // to do; auto-close it as a zero-length round — the runout case
        // from spec §4.6 — rather than handing the turn to the first actor
        // just computed above. Whenever a seat genuinely can act, it keeps
        // the `assigned_seat` it was just set to instead of being advanced
        // past it.
        if only_one_seat_remains(seats) || active_count <= 1 {
            self.close_betting_round(seats);
        }
    }

    fn close_betting_round(&mut self, seats: &mut [Seat]) {
        for seat in seats.iter_mut() {
            if seat.current_bet == 0 {
                continue;
            }
            match self.carried.iter_mut().find(|c| c.seat_id == seat.id) {
                Some(existing) => existing.total += seat.current_bet,
                None => self.carried.push(Contribution {
                    seat_id: seat.id.clone(),
                    total: seat.current_bet,
                    folded: seat.status == SeatStatus::Folded,
                }),
            }
            seat.current_bet = 0;
        }
        for c in self.carried.iter_mut() {
            if let Ok(seat) = find_seat(seats, &c.seat_id) {
                c.folded = seat.status == SeatStatus::Folded;
            }
        }
        self.pot_total = self.carried.iter().map(|c| c.total).sum();
        self.bet_count = 0;
        self.required_bet_count = 0;
        self.betting_round = None;

        if only_one_seat_remains(seats) {
            self.state = HandState::Showdown;
            self.assigned_seat = None;
            return;
        }

        self.state = match self.community_cards.len() {
            0 => HandState::DealFlop,
            3 => HandState::DealTurn,
            4 => HandState::DealRiver,
            5 => HandState::Showdown,
            _ => unreachable!("community cards outside {{0,3,4,5}} at round close"),
        };
        self.assigned_seat = None;
    }

    pub fn finalize_pots(&mut self) -> Vec<SidePot> {
        let pots = compute_pots(&self.carried);
        self.finalized_pots = pots.clone();
        pots
    }
}

fn post_blind(seats: &mut [Seat], seat_id: &SeatId, amount: u64) {
    if let Ok(seat) = find_seat_mut(seats, seat_id) {
        let posted = amount.min(seat.buy_in);
        seat.buy_in -= posted;
        seat.current_bet += posted;
        if posted < amount || seat.buy_in == 0 {
            seat.status = SeatStatus::AllIn;
        }
    }
}

fn find_seat<'a>(seats: &'a [Seat], seat_id: &SeatId) -> Result<&'a Seat, EngineError> {
    seats.iter().find(|s| &s.id == seat_id).ok_or(EngineError::SeatNotFound)
}

fn find_seat_mut<'a>(seats: &'a mut [Seat], seat_id: &SeatId) -> Result<&'a mut Seat, EngineError> {
    seats
        .iter_mut()
        .find(|s| &s.id == seat_id)
        .ok_or(EngineError::SeatNotFound)
}

/// True once at most one non-folded seat remains — the hand is decided
/// without further betting.
pub fn only_one_seat_remains(seats: &[Seat]) -> bool {
    seats.iter().filter(|s| s.in_hand()).count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{PlayerId, TableId};

    fn seat(num: u8, buy_in: u64) -> Seat {
        Seat {
            id: SeatId::new(format!("s{num}")),
            table_id: TableId::new("t"),
            player_id: PlayerId::new(format!("p{num}")),
            seat_number: num,
            buy_in,
            current_bet: 0,
            cards: vec![],
            status: SeatStatus::Active,
            last_action: None,
        }
    }

    #[test]
    fn start_posts_blinds_heads_up_and_assigns_dealer_first() {
        let mut seats = vec![seat(0, 300), seat(1, 300)];
        let hand = Hand::start(HandId::new("h1"), TableId::new("t"), &mut seats, None, 5, 10).unwrap();
        assert_eq!(hand.state, HandState::DealHoleCards);
        assert_eq!(hand.assigned_seat, Some(SeatId::new("s0")));
        assert_eq!(seats[0].current_bet, 5);
        assert_eq!(seats[1].current_bet, 10);
        assert_eq!(seats[0].buy_in, 295);
    }

    #[test]
    fn short_stack_blind_goes_all_in() {
        let mut seats = vec![seat(0, 3), seat(1, 300)];
        let hand = Hand::start(HandId::new("h1"), TableId::new("t"), &mut seats, None, 5, 10).unwrap();
        assert_eq!(seats[0].status, SeatStatus::AllIn);
        assert_eq!(seats[0].current_bet, 3);
        assert_eq!(hand.state, HandState::DealHoleCards);
    }

    #[test]
    fn dealing_hole_cards_round_robins_then_opens_betting() {
        let mut seats = vec![seat(0, 300), seat(1, 300)];
        let mut hand = Hand::start(HandId::new("h1"), TableId::new("t"), &mut seats, None, 5, 10).unwrap();
        let cards = [
            Card::new(crate::cards::Rank::Ace, crate::cards::Suit::Spades),
            Card::new(crate::cards::Rank::King, crate::cards::Suit::Spades),
            Card::new(crate::cards::Rank::Queen, crate::cards::Suit::Spades),
            Card::new(crate::cards::Rank::Jack, crate::cards::Suit::Spades),
        ];
        for c in cards {
            hand.deal_card(&mut seats, c).unwrap();
        }
        assert_eq!(hand.state, HandState::Betting);
        assert_eq!(seats[0].cards.len(), 2);
        assert_eq!(seats[1].cards.len(), 2);
        // heads-up: dealer (SB) acts first preflop.
        assert_eq!(hand.assigned_seat, Some(SeatId::new("s0")));
    }
}

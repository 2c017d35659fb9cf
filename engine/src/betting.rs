//! Betting round controller: legal-action computation, the minimum-raise
//! rule, and round-termination detection. Grounded in
//! `texas-engine::state::TexasHoldem::handle_action` and
//! `poker-ws::game::apply_action_by_user`, generalized to track the last
//! full raise increment across the whole street so reopen/no-reopen on a
//! short all-in raise is computed once instead of inline at every call
//! site.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ids::SeatId;
use crate::seat::{Seat, SeatStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

/// Per-street betting ledger: the table's current bet to match, and the
/// size of the last full (non-short-all-in) raise increment, which sets the
/// minimum for the next raise.
#[derive(Debug, Clone)]
pub struct BettingRound {
    pub current_bet: u64,
    pub min_raise_increment: u64,
    pub big_blind: u64,
    /// Seats that have acted (in any way) since the last bet/raise; used by
    /// `is_closed` to detect when action has come back around uncontested.
    pub acted_since_last_raise: Vec<SeatId>,
    /// Seat that last posted a bet/raise for this street, if any; action
    /// is closed when it comes back to this seat with all others matched.
    pub last_aggressor: Option<SeatId>,
}

impl BettingRound {
    pub fn new(big_blind: u64) -> Self {
        Self {
            current_bet: 0,
            min_raise_increment: big_blind,
            big_blind,
            acted_since_last_raise: Vec::new(),
            last_aggressor: None,
        }
    }

    /// Starts a street with a pre-set current bet (used preflop, where the
    /// big blind counts as the opening bet) and no aggressor yet recorded —
    /// the big blind gets an option to raise rather than being treated as
    /// already-acted.
    pub fn with_opening_bet(big_blind: u64, current_bet: u64) -> Self {
        Self {
            current_bet,
            min_raise_increment: big_blind,
            big_blind,
            acted_since_last_raise: Vec::new(),
            last_aggressor: None,
        }
    }

    /// Validates and records a bet/raise/call/check/fold. `seat` is the
    /// acting seat's running total already committed this street;
    /// `stack` is its remaining uncommitted chips. Returns the new amount
    /// the seat has committed this street on success.
    #[allow(clippy::too_many_arguments)]
    pub fn apply(
        &mut self,
        seat_id: &SeatId,
        kind: ActionKind,
        committed_this_street: u64,
        stack: u64,
        requested_total: Option<u64>,
    ) -> Result<u64, EngineError> {
        match kind {
            ActionKind::Fold => Ok(committed_this_street),
            // Check and call share one code path: transfer whatever is
            // owed (zero if none), going all-in if the stack falls short.
            // `Call` is kept as a distinct variant for callers that want to
            // name the action explicitly; the effect is identical.
            ActionKind::Check | ActionKind::Call => {
                let owed = self.current_bet.saturating_sub(committed_this_street);
                let paid = owed.min(stack);
                self.mark_acted(seat_id);
                Ok(committed_this_street + paid)
            }
            ActionKind::Bet | ActionKind::Raise => {
                let total = requested_total.ok_or(EngineError::InvalidRaiseAmount)?;
                if total <= self.current_bet {
                    return Err(EngineError::InvalidRaise);
                }
                let increment = total - self.current_bet;
                let is_all_in = total - committed_this_street >= stack;
                if !is_all_in && increment < self.min_raise_increment {
                    return Err(EngineError::InvalidRaise);
                }
                if total - committed_this_street > stack {
                    return Err(EngineError::InsufficientChips);
                }
                // Only a full raise (meets or exceeds the minimum increment)
                // reopens the betting for players who already called the
                // previous bet; a short all-in raise does not.
                if increment >= self.min_raise_increment {
                    self.min_raise_increment = increment;
                    self.acted_since_last_raise.clear();
                }
                self.current_bet = total;
                self.last_aggressor = Some(seat_id.clone());
                self.mark_acted(seat_id);
                Ok(total)
            }
            ActionKind::AllIn => {
                let total = committed_this_street + stack;
                if total > self.current_bet {
                    let increment = total - self.current_bet;
                    if increment >= self.min_raise_increment {
                        self.min_raise_increment = increment;
                        self.acted_since_last_raise.clear();
                    }
                    self.current_bet = total;
                    self.last_aggressor = Some(seat_id.clone());
                }
                self.mark_acted(seat_id);
                Ok(total)
            }
        }
    }

    fn mark_acted(&mut self, seat_id: &SeatId) {
        if !self.acted_since_last_raise.contains(seat_id) {
            self.acted_since_last_raise.push(seat_id.clone());
        }
    }

    /// The minimum legal total a seat may raise to, given its current
    /// street commitment.
    pub fn min_raise_to(&self) -> u64 {
        self.current_bet + self.min_raise_increment
    }
}

/// Returns true once every seat still able to act has matched
/// `current_bet` (or is all-in for less) and has acted since the last
/// raise — i.e. the street is over and it's time to deal the next card or
/// go to showdown.
pub fn round_is_closed(round: &BettingRound, seats: &[Seat], street_commitments: &[(SeatId, u64)]) -> bool {
    let acting_seats: Vec<&Seat> = seats
        .iter()
        .filter(|s| matches!(s.status, SeatStatus::Active))
        .collect();

    if acting_seats.len() <= 1 {
        return true;
    }

    for seat in &acting_seats {
        let committed = street_commitments
            .iter()
            .find(|(id, _)| id == &seat.id)
            .map(|(_, amt)| *amt)
            .unwrap_or(0);
        if committed < round.current_bet {
            return false;
        }
        if !round.acted_since_last_raise.contains(&seat.id) {
            return false;
        }
    }
    true
}

/// True when at most one seat remains that has not folded — the hand is
/// decided without a showdown and every other pot is awarded uncontested.
pub fn only_one_seat_remains(seats: &[Seat]) -> bool {
    seats.iter().filter(|s| s.in_hand()).count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TableId;
    use crate::ids::PlayerId;

    fn seat(id: &str, status: SeatStatus) -> Seat {
        Seat {
            id: SeatId::new(id),
            table_id: TableId::new("t"),
            player_id: PlayerId::new(format!("p-{id}")),
            seat_number: 0,
            buy_in: 1000,
            current_bet: 0,
            cards: vec![],
            status,
            last_action: None,
        }
    }

    #[test]
    fn raise_below_minimum_is_rejected() {
        let mut round = BettingRound::with_opening_bet(10, 10);
        let err = round
            .apply(&SeatId::new("a"), ActionKind::Raise, 0, 1000, Some(15))
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidRaise);
    }

    #[test]
    fn full_raise_sets_new_minimum_and_reopens_action() {
        let mut round = BettingRound::with_opening_bet(10, 10);
        round
            .apply(&SeatId::new("a"), ActionKind::Raise, 0, 1000, Some(30))
            .unwrap();
        assert_eq!(round.min_raise_increment, 20);
        assert_eq!(round.min_raise_to(), 50);
    }

    #[test]
    fn short_all_in_raise_does_not_reopen_for_prior_caller() {
        let mut round = BettingRound::with_opening_bet(10, 10);
        round
            .apply(&SeatId::new("b"), ActionKind::Call, 0, 1000, None)
            .unwrap();
        // a goes all-in for a short raise (only 5 over the current bet of 10).
        round
            .apply(&SeatId::new("a"), ActionKind::AllIn, 0, 15, None)
            .unwrap();
        assert_eq!(round.min_raise_increment, 10); // unchanged, short raise doesn't reopen
        assert!(round.acted_since_last_raise.contains(&SeatId::new("b")));
    }

    #[test]
    fn round_closes_when_all_acted_seats_match() {
        let seats = vec![seat("a", SeatStatus::Active), seat("b", SeatStatus::Active)];
        let mut round = BettingRound::new(10);
        round.current_bet = 20;
        round.acted_since_last_raise = vec![SeatId::new("a"), SeatId::new("b")];
        let commitments = vec![(SeatId::new("a"), 20), (SeatId::new("b"), 20)];
        assert!(round_is_closed(&round, &seats, &commitments));
    }

    #[test]
    fn round_stays_open_if_a_seat_has_not_matched() {
        let seats = vec![seat("a", SeatStatus::Active), seat("b", SeatStatus::Active)];
        let mut round = BettingRound::new(10);
        round.current_bet = 20;
        round.acted_since_last_raise = vec![SeatId::new("a")];
        let commitments = vec![(SeatId::new("a"), 20), (SeatId::new("b"), 10)];
        assert!(!round_is_closed(&round, &seats, &commitments));
    }
}

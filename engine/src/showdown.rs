//! Showdown resolver: awards each side pot to its eligible winners and
//! applies the odd-chip remainder rule. Grounded in
//! `texas-engine::state::TexasHoldem`'s showdown resolution and
//! `poker-ws::game::showdown_and_payout`'s odd-chip-to-first-eligible rule,
//! generalized to walk pots in index order over the evaluator's and pot
//! engine's outputs instead of being folded into the table's mutation
//! method.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::evaluator::{self, Evaluation};
use crate::ids::SeatId;
use crate::pot::SidePot;
use crate::seat::{ordered, Seat, SeatStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatEvaluation {
    pub seat_id: SeatId,
    pub hand_name: String,
    pub winning_five: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotPayout {
    pub pot_index: usize,
    pub seat_id: SeatId,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowdownResult {
    pub evaluations: Vec<SeatEvaluation>,
    pub payouts: Vec<PotPayout>,
}

/// Resolves every pot in `pots` against each eligible seat's best 5-of-7
/// hand, crediting winners' `buy_in` in place and recording deltas. When
/// only one seat is still in the hand (everyone else folded), that seat
/// takes every pot without evaluation.
pub fn resolve(
    seats: &mut [Seat],
    pots: &[SidePot],
    community: &[Card],
    dealer_button_seat: &SeatId,
) -> ShowdownResult {
    let mut evaluations = Vec::new();
    let mut payouts = Vec::new();

    let in_hand_count = seats.iter().filter(|s| s.in_hand()).count();
    let sole_survivor = if in_hand_count == 1 {
        seats.iter().find(|s| s.in_hand()).map(|s| s.id.clone())
    } else {
        None
    };

    let mut eval_cache: HashMap<SeatId, Evaluation> = HashMap::new();
    if sole_survivor.is_none() {
        for seat in seats.iter() {
            if !seat.in_hand() {
                continue;
            }
            let mut cards: Vec<Card> = seat.cards.clone();
            cards.extend(community.iter().copied());
            if let Ok(eval) = evaluator::solve(&cards) {
                evaluations.push(SeatEvaluation {
                    seat_id: seat.id.clone(),
                    hand_name: eval.hand_name().to_string(),
                    winning_five: eval.winning_five.to_vec(),
                });
                eval_cache.insert(seat.id.clone(), eval);
            }
        }
    }

    for (index, pot) in pots.iter().enumerate() {
        if let Some(seat_id) = &sole_survivor {
            if pot.eligible_seats.contains(seat_id) {
                credit(seats, seat_id, pot.amount);
                payouts.push(PotPayout {
                    pot_index: index,
                    seat_id: seat_id.clone(),
                    amount: pot.amount,
                });
            }
            continue;
        }

        let candidates: Vec<(&SeatId, &Evaluation)> = pot
            .eligible_seats
            .iter()
            .filter_map(|id| eval_cache.get(id).map(|e| (id, e)))
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let best = candidates.iter().map(|(_, e)| *e).max().unwrap().clone();
        let winners: Vec<&SeatId> = candidates
            .iter()
            .filter(|(_, e)| **e == best)
            .map(|(id, _)| *id)
            .collect();

        let share = pot.amount / winners.len() as u64;
        let remainder = pot.amount - share * winners.len() as u64;

        for seat_id in &winners {
            credit(seats, seat_id, share);
            payouts.push(PotPayout {
                pot_index: index,
                seat_id: (*seat_id).clone(),
                amount: share,
            });
        }

        if remainder > 0 {
            if let Some(odd_chip_seat) = first_clockwise_from_button(seats, dealer_button_seat, &winners) {
                credit(seats, &odd_chip_seat, remainder);
                if let Some(p) = payouts
                    .iter_mut()
                    .rev()
                    .find(|p| p.pot_index == index && p.seat_id == odd_chip_seat)
                {
                    p.amount += remainder;
                }
            }
        }
    }

    for seat in seats.iter_mut() {
        if seat.buy_in == 0 && seat.status != SeatStatus::Folded {
            seat.status = SeatStatus::Eliminated;
        }
    }

    ShowdownResult {
        evaluations,
        payouts,
    }
}

fn credit(seats: &mut [Seat], seat_id: &SeatId, amount: u64) {
    if let Some(seat) = seats.iter_mut().find(|s| &s.id == seat_id) {
        seat.buy_in += amount;
    }
}

/// The odd-chip remainder goes to the eligible winner seated closest
/// clockwise from the dealer button, independent of iteration order.
fn first_clockwise_from_button(
    seats: &[Seat],
    dealer_button_seat: &SeatId,
    winners: &[&SeatId],
) -> Option<SeatId> {
    let ring = ordered(seats);
    let n = ring.len();
    let start = ring.iter().position(|s| &s.id == dealer_button_seat)?;
    for step in 0..n {
        let idx = (start + step) % n;
        if winners.iter().any(|w| **w == ring[idx].id) {
            return Some(ring[idx].id.clone());
        }
    }
    None
}

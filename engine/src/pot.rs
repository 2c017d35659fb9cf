//! Pot engine: splits total contributions into main/side pots by
//! contribution layer. Grounded in `texas-engine::state::TexasHoldem`'s
//! side-pot computation and `poker-ws::game::showdown_and_payout`, and
//! cross-checked against the dedicated `side_pots` module pattern in the
//! `linera-poker` reference (`SidePot { amount, eligible_seats }`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::SeatId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub amount: u64,
    /// Seats entitled to win this layer, i.e. still in the hand (not
    /// folded) and contributed at least up to this layer's threshold.
    pub eligible_seats: Vec<SeatId>,
}

/// A seat's total chip contribution to the pot this hand, and whether it is
/// still live for showdown (folded seats fund pots but cannot win them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub seat_id: SeatId,
    pub total: u64,
    pub folded: bool,
}

/// Layers all contributions into side pots: sort the distinct non-zero
/// contribution levels ascending, and for each layer take the per-seat
/// slice between it and the previous level from every seat that
/// contributed at least that much, crediting it to the non-folded
/// contributors at that level.
pub fn compute_pots(contributions: &[Contribution]) -> Vec<SidePot> {
    let mut levels: Vec<u64> = contributions
        .iter()
        .map(|c| c.total)
        .filter(|&t| t > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::new();
    let mut floor = 0u64;
    for &level in &levels {
        let slice = level - floor;
        let contributors: Vec<&Contribution> = contributions
            .iter()
            .filter(|c| c.total >= level)
            .collect();
        if contributors.is_empty() {
            floor = level;
            continue;
        }
        let amount = slice * contributors.len() as u64;
        let eligible_seats: Vec<SeatId> = contributors
            .iter()
            .filter(|c| !c.folded)
            .map(|c| c.seat_id.clone())
            .collect();
        if amount > 0 {
            pots.push(SidePot {
                amount,
                eligible_seats,
            });
        }
        floor = level;
    }
    let pots = merge_uncontested_layers(pots);
    debug_assert_eq!(
        pots.iter().map(|p| p.amount).sum::<u64>(),
        contributions.iter().map(|c| c.total).sum::<u64>(),
        "pot layering must conserve total chips contributed"
    );
    pots
}

/// Adjacent layers with identical eligible-seat sets (a common case once
/// folded seats' contributions are filtered out) are merged into one pot so
/// downstream showdown code doesn't pay out the same seat set twice.
fn merge_uncontested_layers(pots: Vec<SidePot>) -> Vec<SidePot> {
    let mut merged: Vec<SidePot> = Vec::with_capacity(pots.len());
    for pot in pots {
        if let Some(last) = merged.last_mut() {
            if same_seats(&last.eligible_seats, &pot.eligible_seats) {
                last.amount += pot.amount;
                continue;
            }
        }
        merged.push(pot);
    }
    merged
}

fn same_seats(a: &[SeatId], b: &[SeatId]) -> bool {
    let a: BTreeMap<&SeatId, ()> = a.iter().map(|s| (s, ())).collect();
    let b: BTreeMap<&SeatId, ()> = b.iter().map(|s| (s, ())).collect();
    a.keys().eq(b.keys())
}

pub fn total_pot(contributions: &[Contribution]) -> u64 {
    contributions.iter().map(|c| c.total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(seat: &str, total: u64, folded: bool) -> Contribution {
        Contribution {
            seat_id: SeatId::new(seat),
            total,
            folded,
        }
    }

    #[test]
    fn single_level_all_in_call_makes_one_pot() {
        let contributions = vec![c("a", 100, false), c("b", 100, false), c("c", 100, false)];
        let pots = compute_pots(&contributions);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible_seats.len(), 3);
    }

    #[test]
    fn short_all_in_creates_main_and_side_pot() {
        // a all-in for 50, b and c call to 150 each.
        let contributions = vec![c("a", 50, false), c("b", 150, false), c("c", 150, false)];
        let pots = compute_pots(&contributions);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 150); // 50 * 3
        assert_eq!(pots[0].eligible_seats.len(), 3);
        assert_eq!(pots[1].amount, 200); // 100 * 2
        assert_eq!(pots[1].eligible_seats.len(), 2);
    }

    #[test]
    fn folded_seat_funds_pot_but_is_not_eligible() {
        let contributions = vec![c("a", 100, true), c("b", 100, false), c("c", 100, false)];
        let pots = compute_pots(&contributions);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible_seats.len(), 2);
    }

    #[test]
    fn three_tiered_all_ins_produce_three_pots() {
        let contributions = vec![
            c("a", 25, false),
            c("b", 75, false),
            c("c", 150, false),
            c("d", 150, false),
        ];
        let pots = compute_pots(&contributions);
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount, 100); // 25 * 4
        assert_eq!(pots[1].amount, 150); // 50 * 3
        assert_eq!(pots[2].amount, 150); // 75 * 2
        assert_eq!(total_pot(&contributions), 400);
        assert_eq!(pots.iter().map(|p| p.amount).sum::<u64>(), 400);
    }
}

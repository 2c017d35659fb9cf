//! Hand evaluator. Given 5-7 distinct cards, finds the best 5-card
//! combination and a comparable rank for it. Grounded in
//! `texas-engine::rules::{evaluate_hand, find_best_five_card_hand}` (the
//! combination walk) and `poker-ws::game::eval5` (the count-table
//! categorization), rewritten to operate on exactly five cards at a time and
//! to carry the winning five forward for display.

use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::cards::Card;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

/// The result of evaluating one 5-card hand. Ordering considers only
/// `category` and `tiebreak`; `winning_five` is display data and must not
/// perturb tie comparisons between two different players' equal-strength
/// hands.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub category: Category,
    pub tiebreak: Vec<u8>,
    pub winning_five: [Card; 5],
}

impl Evaluation {
    pub fn hand_name(&self) -> &'static str {
        self.category.name()
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.tiebreak == other.tiebreak
    }
}
impl Eq for Evaluation {}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

/// Evaluates a 5-to-7 card set, returning the best 5-card combination.
pub fn solve(cards: &[Card]) -> Result<Evaluation, EngineError> {
    if cards.len() < 5 || cards.len() > 7 {
        return Err(EngineError::InvalidHandInput(format!(
            "hand evaluator requires 5-7 cards, got {}",
            cards.len()
        )));
    }
    let unique: HashSet<Card> = cards.iter().copied().collect();
    if unique.len() != cards.len() {
        return Err(EngineError::InvalidHandInput("duplicate card in evaluator input".into()));
    }

    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|combo| {
            let five: [Card; 5] = [combo[0], combo[1], combo[2], combo[3], combo[4]];
            eval_five(five)
        })
        .max()
        .ok_or_else(|| EngineError::Fatal("no five-card combination found".into()))
}

/// Returns the indices of every evaluation tied for the maximum score.
/// Non-empty iff `evaluations` is non-empty.
pub fn winners(evaluations: &[Evaluation]) -> Vec<usize> {
    let Some(best) = evaluations.iter().max() else {
        return Vec::new();
    };
    evaluations
        .iter()
        .enumerate()
        .filter(|(_, e)| *e == best)
        .map(|(i, _)| i)
        .collect()
}

fn eval_five(cards: [Card; 5]) -> Evaluation {
    let mut counts = [0u8; 15]; // index by rank value 2..=14
    for c in &cards {
        counts[c.rank.value() as usize] += 1;
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = check_straight(&cards);

    let category;
    let tiebreak: Vec<u8>;

    if is_flush && straight_high == Some(14) {
        category = Category::RoyalFlush;
        tiebreak = vec![14];
    } else if is_flush && straight_high.is_some() {
        category = Category::StraightFlush;
        tiebreak = vec![straight_high.unwrap()];
    } else if let Some(quad) = value_with_count(&counts, 4) {
        let kicker = max_value_excluding(&counts, &[quad]);
        category = Category::FourOfAKind;
        tiebreak = vec![quad, kicker];
    } else if let Some(trip) = value_with_count(&counts, 3) {
        if let Some(pair_rank) = value_with_count(&counts, 2) {
            category = Category::FullHouse;
            tiebreak = vec![trip, pair_rank];
        } else {
            category = Category::ThreeOfAKind;
            let kickers = top_values_excluding(&counts, &[trip], 2);
            tiebreak = std::iter::once(trip).chain(kickers).collect();
        }
    } else if is_flush {
        category = Category::Flush;
        tiebreak = sorted_desc(&cards);
    } else if let Some(high) = straight_high {
        category = Category::Straight;
        tiebreak = vec![high];
    } else if let Some(trip) = value_with_count(&counts, 3) {
        category = Category::ThreeOfAKind;
        let kickers = top_values_excluding(&counts, &[trip], 2);
        tiebreak = std::iter::once(trip).chain(kickers).collect();
    } else {
        let pairs = values_with_count(&counts, 2);
        if pairs.len() >= 2 {
            category = Category::TwoPair;
            let high_pair = pairs[0];
            let low_pair = pairs[1];
            let kicker = max_value_excluding(&counts, &[high_pair, low_pair]);
            tiebreak = vec![high_pair, low_pair, kicker];
        } else if pairs.len() == 1 {
            category = Category::Pair;
            let pair = pairs[0];
            let kickers = top_values_excluding(&counts, &[pair], 3);
            tiebreak = std::iter::once(pair).chain(kickers).collect();
        } else {
            category = Category::HighCard;
            tiebreak = sorted_desc(&cards);
        }
    }

    Evaluation {
        category,
        tiebreak,
        winning_five: cards,
    }
}

/// Straight high card, treating the ace as both high (14) and low (1 for
/// A-2-3-4-5, the "wheel"). Requires all 5 ranks distinct and consecutive.
fn check_straight(cards: &[Card; 5]) -> Option<u8> {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    values.dedup();
    if values.len() != 5 {
        return None;
    }
    if values[4] - values[0] == 4 {
        return Some(values[4]);
    }
    if values == [2, 3, 4, 5, 14] {
        return Some(5);
    }
    None
}

fn value_with_count(counts: &[u8; 15], n: u8) -> Option<u8> {
    (2..=14).rev().find(|&v| counts[v as usize] == n)
}

fn values_with_count(counts: &[u8; 15], n: u8) -> Vec<u8> {
    (2..=14).rev().filter(|&v| counts[v as usize] == n).collect()
}

fn max_value_excluding(counts: &[u8; 15], exclude: &[u8]) -> u8 {
    (2..=14)
        .rev()
        .find(|v| counts[*v as usize] > 0 && !exclude.contains(v))
        .unwrap_or(2)
}

fn top_values_excluding(counts: &[u8; 15], exclude: &[u8], n: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for v in (2..=14).rev() {
        if counts[v as usize] > 0 && !exclude.contains(&v) {
            for _ in 0..counts[v as usize] {
                if out.len() >= n {
                    break;
                }
                out.push(v);
            }
        }
        if out.len() >= n {
            break;
        }
    }
    out
}

fn sorted_desc(cards: &[Card; 5]) -> Vec<u8> {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    values
}

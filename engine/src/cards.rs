//! Card codes: a 2-character ASCII `{rank}{suit}` wire format.
//!
//! Mirrors `texas-engine::shared::{Rank, Suit, Card}` but uses the compact
//! single-letter representation from `poker-ws` (`parse_card`/`Display`)
//! since that is the format the scanner barcode decoder and the wire
//! protocol both need.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    fn from_char(c: char) -> Option<Rank> {
        Some(match c.to_ascii_uppercase() {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        })
    }

    fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    fn from_char(c: char) -> Option<Suit> {
        Some(match c.to_ascii_lowercase() {
            's' => Suit::Spades,
            'h' => Suit::Hearts,
            'd' => Suit::Diamonds,
            'c' => Suit::Clubs,
            _ => return None,
        })
    }

    fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }
}

/// A single card, or the `FD` ("face-down") presentation sentinel used only
/// by the snapshot redaction layer — it never appears in engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Parses the 2-character wire format, e.g. `"As"`, `"Td"`.
    pub fn parse(code: &str) -> Result<Card, EngineError> {
        let bytes: Vec<char> = code.chars().collect();
        if bytes.len() != 2 {
            return Err(EngineError::InvalidCard(code.to_string()));
        }
        let rank = Rank::from_char(bytes[0]).ok_or_else(|| EngineError::InvalidCard(code.to_string()))?;
        let suit = Suit::from_char(bytes[1]).ok_or_else(|| EngineError::InvalidCard(code.to_string()))?;
        Ok(Card { rank, suit })
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Sentinel used when redacting another player's hole cards in a snapshot.
pub const FACE_DOWN: &str = "FD";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_round_trip() {
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                let card = Card::new(rank, suit);
                let code = card.code();
                assert_eq!(Card::parse(&code).unwrap(), card);
            }
        }
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(Card::parse("").is_err());
        assert!(Card::parse("A").is_err());
        assert!(Card::parse("1s").is_err());
        assert!(Card::parse("Ax").is_err());
        assert!(Card::parse("Ass").is_err());
    }
}

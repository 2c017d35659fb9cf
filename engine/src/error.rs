//! Error taxonomy, implemented as one `thiserror` enum with a `kind()`
//! classifier so transport code can decide retry/surface policy without
//! matching every variant — mirrors `texas-engine::shared::GameError` but
//! with the fuller kind list the multi-actor engine needs.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Forbidden,
    Precondition,
    Conflict,
    Fatal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid card code: {0}")]
    InvalidCard(String),
    #[error("invalid barcode: {0}")]
    InvalidBarcode(String),
    #[error("invalid raise amount")]
    InvalidRaiseAmount,
    #[error("invalid hand evaluator input: {0}")]
    InvalidHandInput(String),
    #[error("actor is not authorized for this command")]
    Forbidden,
    #[error("card {0} already dealt this hand")]
    CardAlreadyDealt(String),
    #[error("it is not this seat's turn to act")]
    NotYourTurn,
    #[error("command not valid in the current hand state")]
    WrongState,
    #[error("raise is below the minimum legal increment")]
    InvalidRaise,
    #[error("seat does not have enough chips for this action")]
    InsufficientChips,
    #[error("no active hand on this table")]
    NoActiveGame,
    #[error("a hand is already in progress; use RESET_TABLE to restart it")]
    HandAlreadyActive,
    #[error("table already has the maximum number of seats")]
    TableFull,
    #[error("wallet balance is insufficient for this buy-in")]
    InsufficientBalance,
    #[error("cannot leave while a hand is in progress")]
    CannotLeaveMidHand,
    #[error("seat not found")]
    SeatNotFound,
    #[error("player is already seated at this table")]
    PlayerAlreadySeated,
    #[error("at least two non-eliminated seats are required to start a game")]
    NotEnoughPlayers,
    #[error("table is busy, retry the command")]
    Busy,
    #[error("fatal storage or invariant error: {0}")]
    Fatal(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidCard(_)
            | EngineError::InvalidBarcode(_)
            | EngineError::InvalidRaiseAmount
            | EngineError::InvalidHandInput(_) => ErrorKind::Validation,
            EngineError::Forbidden => ErrorKind::Forbidden,
            EngineError::CardAlreadyDealt(_)
            | EngineError::NotYourTurn
            | EngineError::WrongState
            | EngineError::InvalidRaise
            | EngineError::InsufficientChips
            | EngineError::NoActiveGame
            | EngineError::HandAlreadyActive
            | EngineError::TableFull
            | EngineError::InsufficientBalance
            | EngineError::CannotLeaveMidHand
            | EngineError::SeatNotFound
            | EngineError::PlayerAlreadySeated
            | EngineError::NotEnoughPlayers
            | EngineError::Busy => ErrorKind::Precondition,
            EngineError::Fatal(_) => ErrorKind::Fatal,
        }
    }

    /// True if the command caused no observable state change.
    pub fn is_noop(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Fatal)
    }
}

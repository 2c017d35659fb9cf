//! Table entity: identity, stakes, and the dealer who owns it. A table
//! exclusively owns its seats and hands; both are stored alongside it by
//! the mutator rather than embedded, so cross-references stay id-based.

use serde::{Deserialize, Serialize};

use crate::ids::{PlayerId, TableId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub dealer_user_id: PlayerId,
    pub small_blind: u64,
    pub big_blind: u64,
    /// Optional blind-escalation period; unused by the core state machine.
    pub step_seconds: Option<u64>,
    pub max_seats: u8,
}

impl Table {
    pub fn new(id: TableId, name: impl Into<String>, dealer_user_id: PlayerId, small_blind: u64, big_blind: u64) -> Self {
        Self {
            id,
            name: name.into(),
            dealer_user_id,
            small_blind,
            big_blind,
            step_seconds: None,
            max_seats: 8,
        }
    }
}

//! Command authorization: a table-driven check of which actor role may
//! issue which command, kept as a closed match rather than subclassing so
//! adding a new actor or command forces every pairing to be decided here.
//! `server::router` calls this before handing a command to the mutator; it
//! never itself touches table state.

use crate::command::{Actor, Command};
use crate::error::EngineError;
use crate::hand::{Hand, HandState};
use crate::seat::Seat;

/// Checks that `actor` is permitted to issue `command` against the loaded
/// table/seat/hand snapshot. Does not check game-state preconditions beyond
/// what authority alone determines (a seated player may only act while
/// assigned and in `BETTING`).
pub fn authorize(actor: &Actor, command: &Command, seats: &[Seat], hand: Option<&Hand>) -> Result<(), EngineError> {
    match (actor, command) {
        (Actor::Dealer { .. }, Command::StartHand { .. }) => Ok(()),
        (Actor::Dealer { .. }, Command::ResetTable { .. }) => Ok(()),
        (Actor::Dealer { .. }, Command::DealCard { .. }) => Ok(()),
        (Actor::Dealer { .. }, Command::SitDown { .. } | Command::LeaveTable { .. } | Command::PlayerAction { .. } | Command::ScanCard { .. }) => {
            Err(EngineError::Forbidden)
        }

        // A scanner device may only deal via the scan-decoded `ScanCard`
        // command; none of the dealer's other powers.
        (Actor::Scanner { .. }, Command::ScanCard { .. }) => Ok(()),
        (Actor::Scanner { .. }, _) => Err(EngineError::Forbidden),

        (Actor::Player(_), Command::SitDown { .. } | Command::LeaveTable { .. }) => Ok(()),
        (Actor::Player(player_id), Command::PlayerAction { seat_id, .. }) => {
            let seat = seats
                .iter()
                .find(|s| &s.id == seat_id)
                .ok_or(EngineError::SeatNotFound)?;
            if &seat.player_id != player_id {
                return Err(EngineError::Forbidden);
            }
            let hand = hand.ok_or(EngineError::NoActiveGame)?;
            if hand.state != HandState::Betting {
                return Err(EngineError::WrongState);
            }
            if hand.assigned_seat.as_ref() != Some(seat_id) {
                return Err(EngineError::NotYourTurn);
            }
            Ok(())
        }
        (Actor::Player(_), _) => Err(EngineError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PlayerActionKind;
    use crate::ids::{DeviceSerial, HandId, PlayerId, SeatId, TableId};
    use crate::seat::SeatStatus;

    fn player_seat(player: &str) -> Seat {
        Seat {
            id: SeatId::new("seat-1"),
            table_id: TableId::new("t"),
            player_id: PlayerId::new(player),
            seat_number: 0,
            buy_in: 100,
            current_bet: 0,
            cards: vec![],
            status: SeatStatus::Active,
            last_action: None,
        }
    }

    #[test]
    fn player_cannot_start_hand() {
        let err = authorize(
            &Actor::Player(PlayerId::new("p1")),
            &Command::StartHand {
                table_id: TableId::new("t"),
            },
            &[],
            None,
        )
        .unwrap_err();
        assert_eq!(err, EngineError::Forbidden);
    }

    #[test]
    fn dealer_can_start_hand() {
        authorize(
            &Actor::Dealer {
                device: DeviceSerial::new("dealer-device"),
            },
            &Command::StartHand {
                table_id: TableId::new("t"),
            },
            &[],
            None,
        )
        .unwrap();
    }

    #[test]
    fn player_action_rejected_when_not_assigned_seat() {
        let seats = vec![player_seat("p1")];
        let mut hand = Hand {
            id: HandId::new("h1"),
            table_id: TableId::new("t"),
            status: crate::hand::HandStatus::Active,
            state: HandState::Betting,
            dealer_button_seat: SeatId::new("seat-1"),
            small_blind_seat: SeatId::new("seat-1"),
            big_blind_seat: SeatId::new("seat-2"),
            assigned_seat: Some(SeatId::new("seat-2")),
            community_cards: vec![],
            pot_total: 0,
            bet_count: 0,
            required_bet_count: 0,
            last_raise_increment: 10,
            small_blind: 5,
            big_blind: 10,
            betting_round: None,
            carried: vec![],
            finalized_pots: vec![],
            turn_started_at: None,
        };
        let err = authorize(
            &Actor::Player(PlayerId::new("p1")),
            &Command::PlayerAction {
                table_id: TableId::new("t"),
                seat_id: SeatId::new("seat-1"),
                action: PlayerActionKind::Check,
            },
            &seats,
            Some(&hand),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::NotYourTurn);

        hand.assigned_seat = Some(SeatId::new("seat-1"));
        authorize(
            &Actor::Player(PlayerId::new("p1")),
            &Command::PlayerAction {
                table_id: TableId::new("t"),
                seat_id: SeatId::new("seat-1"),
                action: PlayerActionKind::Check,
            },
            &seats,
            Some(&hand),
        )
        .unwrap();
    }
}

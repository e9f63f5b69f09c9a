use crate::battle::combatant::{Combatant, CombatantId, SideId};
use crate::battle::conditions::TagKind;
use crate::battle::field::Field;
use crate::errors::ActionError;
use schema::{MoveCategory, MoveId, MoveTarget};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decision submitted for one active combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnCommand {
    UseMove {
        move_id: MoveId,
        /// Only meaningful for moves aimed at one combatant.
        target: Option<CombatantId>,
    },
    SwitchPokemon {
        party_index: usize,
    },
    Forfeit,
}

impl fmt::Display for TurnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnCommand::UseMove { move_id, target: Some(target) } => write!(f, "Use {} on {}", move_id, target),
            TurnCommand::UseMove { move_id, target: None } => write!(f, "Use {}", move_id),
            TurnCommand::SwitchPokemon { party_index } => write!(f, "Switch to party slot {}", party_index),
            TurnCommand::Forfeit => write!(f, "Forfeit"),
        }
    }
}

/// What the battle is waiting on when it suspends for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub combatant: CombatantId,
    pub side: SideId,
    pub slot: usize,
    /// The slot's occupant fainted or was forced out; only a switch is legal.
    pub forced_switch: bool,
}

/// Moves the combatant may pick right now, ignoring targets. Empty means the
/// only fight option is the fallback move.
pub fn usable_moves(combatant: &Combatant) -> Vec<MoveId> {
    let disabled = combatant.disabled_move();
    let encored = combatant.encored_move();
    let taunted = combatant.has_tag(TagKind::Taunted);

    combatant
        .moves
        .iter()
        .filter(|slot| slot.pp > 0)
        .filter(|slot| Some(slot.move_id) != disabled)
        .filter(|slot| encored.map_or(true, |locked| locked == slot.move_id))
        .filter(|slot| !(taunted && slot.move_id.data().category == MoveCategory::Status))
        .map(|slot| slot.move_id)
        .collect()
}

/// Commands a controller can be forced into without being asked.
pub fn forced_command(combatant: &Combatant) -> Option<TurnCommand> {
    if combatant.has_tag(TagKind::Recharging) {
        return Some(TurnCommand::UseMove {
            move_id: combatant.last_move.unwrap_or(MoveId::FALLBACK),
            target: None,
        });
    }
    if combatant.has_tag(TagKind::Biding) {
        return Some(TurnCommand::UseMove {
            move_id: MoveId::Bide,
            target: None,
        });
    }
    None
}

fn is_trapped(combatant: &Combatant) -> bool {
    combatant.has_tag(TagKind::Bound)
}

fn can_forfeit(field: &Field, side: SideId) -> bool {
    side == SideId::Player
        && !field
            .side(SideId::Enemy)
            .party
            .iter()
            .any(|id| field.get(*id).boss.is_some())
}

fn valid_targets(field: &Field, user: CombatantId, target: MoveTarget) -> Vec<CombatantId> {
    match target {
        MoveTarget::SelectedOpponent => field.opponents_of(user),
        MoveTarget::AnyOther => field.active_ids().into_iter().filter(|id| *id != user).collect(),
        _ => Vec::new(),
    }
}

/// Checks a command against the current state. Never mutates anything.
pub fn validate_command(field: &Field, request: &CommandRequest, command: &TurnCommand) -> Result<(), ActionError> {
    let combatant = field.get(request.combatant);

    if request.forced_switch {
        return match command {
            TurnCommand::SwitchPokemon { party_index } => validate_switch(field, request.side, *party_index),
            _ => Err(ActionError::SwitchRequired),
        };
    }

    match command {
        TurnCommand::UseMove { move_id, target } => {
            if move_id.is_fallback() {
                if !usable_moves(combatant).is_empty() {
                    return Err(ActionError::StruggleNotAllowed);
                }
            } else {
                let slot = combatant.move_slot(*move_id).ok_or(ActionError::UnknownMove(*move_id))?;
                if let Some(locked) = combatant.encored_move() {
                    if locked != *move_id {
                        return Err(ActionError::EncoreLocked { locked });
                    }
                }
                if combatant.disabled_move() == Some(*move_id) {
                    return Err(ActionError::MoveDisabled(*move_id));
                }
                if slot.pp == 0 {
                    return Err(ActionError::NoPp(*move_id));
                }
                if combatant.has_tag(TagKind::Taunted) && move_id.data().category == MoveCategory::Status {
                    return Err(ActionError::Taunted(*move_id));
                }
            }

            if let Some(target) = target {
                let pattern = move_id.data().target;
                if pattern.is_single_target() && !valid_targets(field, request.combatant, pattern).contains(target) {
                    return Err(ActionError::InvalidTarget(*target));
                }
            }
            Ok(())
        }
        TurnCommand::SwitchPokemon { party_index } => {
            if is_trapped(combatant) {
                return Err(ActionError::Trapped);
            }
            validate_switch(field, request.side, *party_index)
        }
        TurnCommand::Forfeit => {
            if can_forfeit(field, request.side) {
                Ok(())
            } else {
                Err(ActionError::CannotRun)
            }
        }
    }
}

fn validate_switch(field: &Field, side: SideId, party_index: usize) -> Result<(), ActionError> {
    if field.bench(side).iter().any(|(index, _)| *index == party_index) {
        Ok(())
    } else {
        Err(ActionError::InvalidPartyIndex(party_index))
    }
}

/// Every command that `validate_command` would accept for this request.
pub fn legal_commands(field: &Field, request: &CommandRequest) -> Vec<TurnCommand> {
    let switches = field
        .bench(request.side)
        .into_iter()
        .map(|(party_index, _)| TurnCommand::SwitchPokemon { party_index });

    if request.forced_switch {
        return switches.collect();
    }

    let combatant = field.get(request.combatant);
    let mut commands = Vec::new();

    let moves = usable_moves(combatant);
    if moves.is_empty() {
        commands.push(TurnCommand::UseMove {
            move_id: MoveId::FALLBACK,
            target: None,
        });
    }
    for move_id in moves {
        let pattern = move_id.data().target;
        let targets = valid_targets(field, request.combatant, pattern);
        if pattern.is_single_target() && !targets.is_empty() {
            commands.extend(targets.into_iter().map(|target| TurnCommand::UseMove {
                move_id,
                target: Some(target),
            }));
        } else {
            commands.push(TurnCommand::UseMove { move_id, target: None });
        }
    }

    if !is_trapped(combatant) {
        commands.extend(switches);
    }
    if can_forfeit(field, request.side) {
        commands.push(TurnCommand::Forfeit);
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::conditions::{VolatileCondition, VolatileTag};
    use crate::battle::field::BattleFormat;
    use pretty_assertions::assert_eq;
    use schema::SpeciesId;

    fn field() -> Field {
        let player = vec![
            Combatant::new(SpeciesId::Pikachu, 50, &[MoveId::Thunderbolt, MoveId::ThunderWave]),
            Combatant::new(SpeciesId::Snorlax, 50, &[MoveId::Tackle]),
        ];
        let enemy = vec![Combatant::new(SpeciesId::Gyarados, 50, &[MoveId::Tackle])];
        Field::new(BattleFormat::Single, player, enemy).unwrap()
    }

    fn request() -> CommandRequest {
        CommandRequest {
            combatant: CombatantId(0),
            side: SideId::Player,
            slot: 0,
            forced_switch: false,
        }
    }

    #[test]
    fn test_disabled_and_empty_moves_are_rejected() {
        let mut field = field();
        let pikachu = field.get_mut(CombatantId(0));
        pikachu.add_tag(VolatileTag::new(
            VolatileCondition::Disabled { pokemon_move: MoveId::Thunderbolt },
            Some(CombatantId(2)),
            Some(4),
        ));
        pikachu.move_slot_mut(MoveId::ThunderWave).unwrap().pp = 0;

        let use_move = |move_id| TurnCommand::UseMove { move_id, target: None };
        assert_eq!(
            validate_command(&field, &request(), &use_move(MoveId::Thunderbolt)),
            Err(ActionError::MoveDisabled(MoveId::Thunderbolt))
        );
        assert_eq!(
            validate_command(&field, &request(), &use_move(MoveId::ThunderWave)),
            Err(ActionError::NoPp(MoveId::ThunderWave))
        );
        assert_eq!(validate_command(&field, &request(), &use_move(MoveId::Struggle)), Ok(()));
    }

    #[test]
    fn test_struggle_only_when_nothing_else_is_usable() {
        let field = field();
        let struggle = TurnCommand::UseMove {
            move_id: MoveId::Struggle,
            target: None,
        };
        assert_eq!(
            validate_command(&field, &request(), &struggle),
            Err(ActionError::StruggleNotAllowed)
        );
    }

    #[test]
    fn test_forced_switch_only_offers_bench() {
        let field = field();
        let forced = CommandRequest {
            forced_switch: true,
            ..request()
        };
        assert_eq!(
            legal_commands(&field, &forced),
            vec![TurnCommand::SwitchPokemon { party_index: 1 }]
        );
        assert_eq!(
            validate_command(&field, &forced, &TurnCommand::Forfeit),
            Err(ActionError::SwitchRequired)
        );
    }

    #[test]
    fn test_every_legal_command_validates() {
        let field = field();
        for command in legal_commands(&field, &request()) {
            assert_eq!(validate_command(&field, &request(), &command), Ok(()), "{}", command);
        }
    }

    #[test]
    fn test_recharging_forces_a_command() {
        let mut pikachu = Combatant::new(SpeciesId::Pikachu, 50, &[MoveId::HyperBeam]);
        assert_eq!(forced_command(&pikachu), None);
        pikachu.last_move = Some(MoveId::HyperBeam);
        pikachu.add_tag(VolatileTag::new(VolatileCondition::Recharging, None, None));
        assert_eq!(
            forced_command(&pikachu),
            Some(TurnCommand::UseMove {
                move_id: MoveId::HyperBeam,
                target: None
            })
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::combatant::{CombatantId, SideId};
    use crate::battle::commands::{CommandRequest, TurnCommand};
    use crate::battle::engine::{Awaiting, Suspension};
    use crate::battle::state::{BattleEvent, BattleOutcome};
    use crate::battle::tests::common::{advance, play_turn, scripted_battle, use_move, TestCombatantBuilder};
    use crate::errors::{ActionError, BattleEngineError};
    use pretty_assertions::assert_eq;
    use schema::{MoveId, SpeciesId};

    const PIKACHU: CombatantId = CombatantId(0);
    const SNORLAX: CombatantId = CombatantId(1);

    fn pikachu_vs_snorlax() -> crate::battle::engine::Battle {
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50).build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        scripted_battle(vec![pikachu], vec![snorlax], vec![])
    }

    #[test]
    fn test_leads_are_announced_in_speed_order() {
        // Arrange
        let mut battle = pikachu_vs_snorlax();

        // Act
        let suspension = battle.run().unwrap();

        // Assert: the faster lead comes out first and nothing moves until acknowledged
        assert_eq!(
            suspension,
            Suspension::AwaitingAck {
                events: vec![
                    BattleEvent::SentOut {
                        side: SideId::Player,
                        combatant: PIKACHU,
                        species: SpeciesId::Pikachu,
                    },
                    BattleEvent::SentOut {
                        side: SideId::Enemy,
                        combatant: SNORLAX,
                        species: SpeciesId::Snorlax,
                    },
                ]
            }
        );
        assert_eq!(battle.run().unwrap(), suspension, "run stays suspended until acknowledged");

        let acknowledged = battle.acknowledge();
        assert_eq!(acknowledged.len(), 2);
        assert_eq!(battle.history().len(), 2);
        assert!(battle.pending_events().is_empty());
    }

    #[test]
    fn test_commands_are_requested_player_first() {
        // Arrange
        let mut battle = pikachu_vs_snorlax();

        // Act
        let seen = advance(&mut battle);

        // Assert
        assert!(seen.contains(&BattleEvent::TurnStarted { turn: 1 }));
        assert_eq!(
            battle.pending_request(),
            Some(CommandRequest {
                combatant: PIKACHU,
                side: SideId::Player,
                slot: 0,
                forced_switch: false,
            })
        );

        battle.submit_command(PIKACHU, use_move(MoveId::Tackle)).unwrap();
        advance(&mut battle);
        assert_eq!(battle.pending_request().map(|r| r.combatant), Some(SNORLAX));
    }

    #[test]
    fn test_rejected_commands_leave_the_battle_untouched() {
        // Arrange
        let mut battle = pikachu_vs_snorlax();
        battle.run().unwrap();

        // Act / Assert: nobody is being asked for a command while events are pending
        let early = battle.submit_command(PIKACHU, use_move(MoveId::Tackle));
        assert!(matches!(
            early,
            Err(BattleEngineError::Action(ActionError::NotAwaitingCommand))
        ));
        assert_eq!(battle.awaiting(), Awaiting::Ack);

        advance(&mut battle);
        let before = battle.snapshot();

        let wrong = battle.submit_command(SNORLAX, use_move(MoveId::Tackle));
        assert!(matches!(
            wrong,
            Err(BattleEngineError::Action(ActionError::WrongCombatant { .. }))
        ));
        let unknown = battle.submit_command(PIKACHU, use_move(MoveId::Surf));
        assert!(matches!(
            unknown,
            Err(BattleEngineError::Action(ActionError::UnknownMove(MoveId::Surf)))
        ));
        assert_eq!(battle.snapshot(), before);
    }

    #[test]
    fn test_acknowledge_without_pending_events_is_a_no_op() {
        let mut battle = pikachu_vs_snorlax();
        advance(&mut battle);

        assert_eq!(battle.acknowledge(), Vec::new());
        assert!(matches!(battle.awaiting(), Awaiting::Command(_)));
    }

    #[test]
    fn test_full_turn_runs_both_moves_and_advances() {
        // Arrange
        let mut battle = pikachu_vs_snorlax();

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::Tackle)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        let used: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, BattleEvent::MoveUsed { .. }))
            .collect();
        assert_eq!(used.len(), 2);
        assert_eq!(events.last(), Some(&BattleEvent::TurnEnded { turn: 1 }));
        assert_eq!(battle.turn(), 2);
        assert!(!battle.is_over());
        assert!(battle.field().get(SNORLAX).hp() < battle.field().get(SNORLAX).max_hp());
        assert_eq!(battle.field().get(PIKACHU).move_slot(MoveId::Tackle).unwrap().pp, 34);
    }

    #[test]
    fn test_forfeit_ends_the_battle_before_any_move() {
        // Arrange
        let mut battle = pikachu_vs_snorlax();

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, TurnCommand::Forfeit), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        assert!(events.iter().all(|e| !matches!(e, BattleEvent::MoveUsed { .. })));
        assert!(events.contains(&BattleEvent::BattleEnded {
            outcome: BattleOutcome::Fled(SideId::Player)
        }));
        assert_eq!(battle.outcome(), Some(BattleOutcome::Fled(SideId::Player)));
        assert_eq!(
            battle.run().unwrap(),
            Suspension::Finished {
                outcome: BattleOutcome::Fled(SideId::Player)
            }
        );
    }

    #[test]
    fn test_turn_limit_ends_in_a_draw() {
        // Arrange
        let mut battle = pikachu_vs_snorlax();
        battle.ctx.config.max_turns = 1;

        // Act
        play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::Tackle)), (SNORLAX, use_move(MoveId::Tackle))],
        );
        let events = advance(&mut battle);

        // Assert
        assert_eq!(battle.outcome(), Some(BattleOutcome::Draw));
        assert!(events.contains(&BattleEvent::BattleEnded {
            outcome: BattleOutcome::Draw
        }));
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::combatant::{CombatantId, DamageSource};
    use crate::battle::commands::TurnCommand;
    use crate::battle::engine::Battle;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{advance, play_turn, scripted_battle, use_move, TestCombatantBuilder};
    use crate::errors::{ActionError, BattleEngineError};
    use pretty_assertions::assert_eq;
    use schema::{MoveId, SpeciesId};

    const PIKACHU: CombatantId = CombatantId(0);
    const SNORLAX: CombatantId = CombatantId(1);

    fn out_of_pp() -> Battle {
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_pp(MoveId::Tackle, 0)
            .build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        scripted_battle(vec![pikachu], vec![snorlax], vec![])
    }

    #[test]
    fn test_struggle_is_the_only_move_left() {
        // Arrange
        let mut battle = out_of_pp();

        // Act
        advance(&mut battle);

        // Assert
        let legal = battle.legal_commands(PIKACHU);
        assert!(legal.contains(&TurnCommand::UseMove {
            move_id: MoveId::Struggle,
            target: None,
        }));
        assert!(!legal.iter().any(|c| matches!(c, TurnCommand::UseMove { move_id: MoveId::Tackle, .. })));
        assert_eq!(
            battle.submit_command(PIKACHU, use_move(MoveId::Tackle)),
            Err(BattleEngineError::Action(ActionError::NoPp(MoveId::Tackle)))
        );
    }

    #[test]
    fn test_struggle_is_refused_while_moves_remain() {
        // Arrange
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50).build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        let mut battle = scripted_battle(vec![pikachu], vec![snorlax], vec![]);
        advance(&mut battle);

        // Act
        let result = battle.submit_command(PIKACHU, use_move(MoveId::Struggle));

        // Assert
        assert_eq!(result, Err(BattleEngineError::Action(ActionError::StruggleNotAllowed)));
    }

    #[test]
    fn test_struggle_hurts_the_user_by_a_quarter() {
        // Arrange
        let mut battle = out_of_pp();
        let max_hp = battle.field().get(PIKACHU).max_hp();

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::Struggle)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        assert!(events
            .iter()
            .any(|e| matches!(e, BattleEvent::DamageDealt { target: SNORLAX, .. })));
        assert!(events.contains(&BattleEvent::DamageDealt {
            target: PIKACHU,
            amount: max_hp / 4,
            remaining_hp: max_hp - max_hp / 4,
            source: DamageSource::Recoil,
        }));
    }

    #[test]
    fn test_struggle_spends_no_pp() {
        // Arrange
        let mut battle = out_of_pp();

        // Act
        play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::Struggle)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        let pikachu = battle.field().get(PIKACHU);
        assert_eq!(pikachu.move_slot(MoveId::Tackle).map(|slot| slot.pp), Some(0));
        assert!(pikachu.move_slot(MoveId::Struggle).is_none());
    }
}

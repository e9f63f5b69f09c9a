#[cfg(test)]
mod tests {
    use crate::battle::ai::{CommandSource, ScoringAI, ScriptedCommands};
    use crate::battle::combatant::CombatantId;
    use crate::battle::commands::TurnCommand;
    use crate::battle::engine::Battle;
    use crate::battle::runner::{BattleRunner, RecordingPresenter};
    use crate::battle::tests::common::{advance, seeded_battle, use_move, TestCombatantBuilder};
    use crate::config::BattleConfig;
    use crate::teams::Encounter;
    use pretty_assertions::assert_eq;
    use schema::{MoveId, SpeciesId};

    fn duel(seed: u64) -> Battle {
        let player = vec![
            TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
                .with_moves(vec![MoveId::Thunderbolt, MoveId::QuickAttack])
                .build(),
            TestCombatantBuilder::new(SpeciesId::Snorlax, 50)
                .with_moves(vec![MoveId::Tackle, MoveId::Recover])
                .build(),
        ];
        let enemy = vec![
            TestCombatantBuilder::new(SpeciesId::Gyarados, 50)
                .with_moves(vec![MoveId::WaterGun, MoveId::Tackle])
                .build(),
        ];
        seeded_battle(player, enemy, seed)
    }

    #[test]
    fn test_ai_battle_runs_to_completion() {
        // Arrange
        let mut runner = BattleRunner::new(duel(42), ScoringAI::new(), ScoringAI::new(), RecordingPresenter::default());

        // Act
        let outcome = runner.run_to_completion().unwrap();

        // Assert: the presenter saw exactly what the battle acknowledged
        let (battle, _, _, presenter) = runner.into_parts();
        assert_eq!(battle.outcome(), Some(outcome));
        assert_eq!(presenter.events.as_slice(), battle.history());
    }

    #[test]
    fn test_same_seed_same_battle() {
        // Arrange
        let mut first = BattleRunner::new(duel(9), ScoringAI::new(), ScoringAI::new(), RecordingPresenter::default());
        let mut second = BattleRunner::new(duel(9), ScoringAI::new(), ScoringAI::new(), RecordingPresenter::default());

        // Act
        let first_outcome = first.run_to_completion().unwrap();
        let second_outcome = second.run_to_completion().unwrap();

        // Assert
        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first.presenter().events, second.presenter().events);
        assert_eq!(first.battle().rng_draws(), second.battle().rng_draws());
    }

    #[test]
    fn test_repeated_illegal_answers_fall_back_to_a_legal_command() {
        // Arrange: Pikachu does not know Surf
        let player = ScriptedCommands::new(vec![use_move(MoveId::Surf); 5]);
        let mut runner = BattleRunner::new(duel(1), player, ScoringAI::new(), RecordingPresenter::default());

        // Act
        let result = runner.run_to_completion();

        // Assert
        assert!(result.is_ok());
        assert!(runner.battle().is_over());
    }

    #[test]
    fn test_scoring_ai_prefers_the_super_effective_move() {
        // Arrange
        let mut battle = duel(0);
        advance(&mut battle);
        let request = battle.pending_request().unwrap();

        // Act
        let command = ScoringAI::new().request_command(&battle, &request);

        // Assert
        assert!(matches!(
            command,
            TurnCommand::UseMove {
                move_id: MoveId::Thunderbolt,
                ..
            }
        ));
        assert_eq!(request.combatant, CombatantId(0));
    }

    #[test]
    fn test_bundled_encounters_play_out() {
        for text in [
            include_str!("../../../data/encounters/gauntlet.ron"),
            include_str!("../../../data/encounters/eternatus.ron"),
        ] {
            // Arrange
            let encounter = Encounter::from_ron_str(text).unwrap();
            let battle = Battle::new(BattleConfig::with_seed(2024), &encounter).unwrap();
            let mut runner = BattleRunner::new(battle, ScoringAI::new(), ScoringAI::new(), RecordingPresenter::default());

            // Act
            let result = runner.run_to_completion();

            // Assert
            assert!(result.is_ok(), "{} failed: {:?}", encounter.name, result);
        }
    }
}

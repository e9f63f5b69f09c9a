#[cfg(test)]
mod tests {
    use crate::battle::combatant::{CombatantId, DamageSource};
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{play_turn, scripted_battle, use_move, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{AbilityId, HeldItem, MoveId, SpeciesId};

    const PIKACHU: CombatantId = CombatantId(0);
    const SNORLAX: CombatantId = CombatantId(1);

    fn hits_on_snorlax(events: &[BattleEvent], move_id: MoveId) -> usize {
        events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    BattleEvent::DamageDealt {
                        target: SNORLAX,
                        source: DamageSource::DirectHit { attacker: PIKACHU, move_id: m },
                        ..
                    } if *m == move_id
                )
            })
            .count()
    }

    /// Pikachu outspeeds Snorlax, so the hit-count roll is the first draw.
    #[rstest]
    #[case::neutral_roll(vec![], 2)]
    #[case::lowest_roll(vec![0], 5)]
    #[case::four_hits(vec![3], 4)]
    #[case::three_hits(vec![5], 3)]
    fn test_two_to_five_hit_distribution(#[case] script: Vec<u32>, #[case] expected: usize) {
        // Arrange
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::DoubleSlap])
            .build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        let mut battle = scripted_battle(vec![pikachu], vec![snorlax], script);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::DoubleSlap)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        assert_eq!(hits_on_snorlax(&events, MoveId::DoubleSlap), expected);
        assert!(events.contains(&BattleEvent::HitCount { hits: expected as u8 }));
    }

    #[test]
    fn test_skill_link_always_hits_five_times() {
        // Arrange
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::DoubleSlap])
            .with_ability(AbilityId::SkillLink)
            .build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        let mut battle = scripted_battle(vec![pikachu], vec![snorlax], vec![]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::DoubleSlap)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        assert_eq!(hits_on_snorlax(&events, MoveId::DoubleSlap), 5);
    }

    #[test]
    fn test_fixed_hits_report_effectiveness_once() {
        // Arrange: Fighting is super effective on Normal
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::DoubleKick])
            .build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        let mut battle = scripted_battle(vec![pikachu], vec![snorlax], vec![]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::DoubleKick)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        assert_eq!(hits_on_snorlax(&events, MoveId::DoubleKick), 2);
        let effectiveness = events
            .iter()
            .filter(|e| matches!(e, BattleEvent::Effectiveness { target: SNORLAX, .. }))
            .count();
        assert_eq!(effectiveness, 1);
    }

    #[test]
    fn test_multi_lens_adds_a_hit() {
        // Arrange
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_item(HeldItem::MultiLens)
            .build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        let mut battle = scripted_battle(vec![pikachu], vec![snorlax], vec![]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::Tackle)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        assert_eq!(hits_on_snorlax(&events, MoveId::Tackle), 2);
        assert!(events.contains(&BattleEvent::HitCount { hits: 2 }));
    }

    #[test]
    fn test_multi_hit_stops_when_the_target_faints() {
        // Arrange
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::DoubleSlap])
            .build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).with_hp(1).build();
        let mut battle = scripted_battle(vec![pikachu], vec![snorlax], vec![0]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PIKACHU, use_move(MoveId::DoubleSlap)), (SNORLAX, use_move(MoveId::Tackle))],
        );

        // Assert
        assert_eq!(hits_on_snorlax(&events, MoveId::DoubleSlap), 1);
        assert!(events.contains(&BattleEvent::Fainted { combatant: SNORLAX }));
    }
}

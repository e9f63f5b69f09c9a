#[cfg(test)]
mod tests {
    use crate::battle::combatant::CombatantId;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{play_turn, scripted_battle, use_move, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use schema::{AbilityId, BattleStat, MoveId, SpeciesId};

    const PLAYER: CombatantId = CombatantId(0);
    const ENEMY: CombatantId = CombatantId(1);

    #[test]
    fn test_stages_stop_at_plus_six() {
        // Arrange
        let mut snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .build();
        snorlax.stages.apply(BattleStat::Attack, 6);
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .build();
        let mut battle = scripted_battle(vec![snorlax], vec![pikachu], vec![]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::SwordsDance)), (ENEMY, use_move(MoveId::SwordsDance))],
        );

        // Assert
        assert!(events.contains(&BattleEvent::StatChangeNoEffect {
            target: PLAYER,
            stat: BattleStat::Attack,
            rising: true,
        }));
        assert!(events.contains(&BattleEvent::StatStageChanged {
            target: ENEMY,
            stat: BattleStat::Attack,
            old_stage: 0,
            new_stage: 2,
        }));
        assert_eq!(battle.field().get(PLAYER).stage(BattleStat::Attack), 6);
    }

    #[test]
    fn test_clear_body_blocks_drops_from_foes() {
        // Arrange
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .with_ability(AbilityId::ClearBody)
            .build();
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::Growl])
            .build();
        let mut battle = scripted_battle(vec![snorlax], vec![pikachu], vec![]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::SwordsDance)), (ENEMY, use_move(MoveId::Growl))],
        );

        // Assert: Growl lands first, so only Swords Dance counts
        assert!(events.contains(&BattleEvent::StatChangeBlocked {
            target: PLAYER,
            ability: AbilityId::ClearBody,
        }));
        assert_eq!(battle.field().get(PLAYER).stage(BattleStat::Attack), 2);
    }

    #[test]
    fn test_mold_breaker_growl_goes_through_clear_body() {
        // Arrange
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .with_ability(AbilityId::ClearBody)
            .build();
        let haxorus = TestCombatantBuilder::new(SpeciesId::Haxorus, 50)
            .with_moves(vec![MoveId::Growl])
            .build();
        let mut battle = scripted_battle(vec![snorlax], vec![haxorus], vec![]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::SwordsDance)), (ENEMY, use_move(MoveId::Growl))],
        );

        // Assert
        assert!(!events.iter().any(|e| matches!(e, BattleEvent::StatChangeBlocked { .. })));
        assert!(events.contains(&BattleEvent::StatStageChanged {
            target: PLAYER,
            stat: BattleStat::Attack,
            old_stage: 0,
            new_stage: -1,
        }));
        assert_eq!(battle.field().get(PLAYER).stage(BattleStat::Attack), 1);
        // Mold Breaker only looks through the ability; it stays set.
        assert_eq!(battle.field().get(PLAYER).ability, AbilityId::ClearBody);
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::combatant::{CombatantId, SideId};
    use crate::battle::commands::TurnCommand;
    use crate::battle::conditions::{VolatileCondition, VolatileTag};
    use crate::battle::engine::{Battle, Suspension};
    use crate::battle::field::DelayedAttack;
    use crate::battle::snapshot::{BattleSnapshot, SNAPSHOT_VERSION};
    use crate::battle::tests::common::{advance, play_turn, seeded_battle, use_move, TestCombatantBuilder};
    use crate::errors::SnapshotError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{MoveId, SpeciesId};

    const PLAYER: CombatantId = CombatantId(0);
    const ENEMY: CombatantId = CombatantId(1);

    fn tackle_battle(seed: u64) -> Battle {
        let player = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        let enemy = TestCombatantBuilder::new(SpeciesId::Snorlax, 50).build();
        seeded_battle(vec![player], vec![enemy], seed)
    }

    fn tackles() -> [(CombatantId, TurnCommand); 2] {
        [(PLAYER, use_move(MoveId::Tackle)), (ENEMY, use_move(MoveId::Tackle))]
    }

    /// One full turn, then suspended waiting for the enemy's second command.
    fn mid_turn_battle(seed: u64) -> Battle {
        let mut battle = tackle_battle(seed);
        play_turn(&mut battle, &tackles());
        advance(&mut battle);
        battle.submit_command(PLAYER, use_move(MoveId::Tackle)).unwrap();
        match battle.run().unwrap() {
            Suspension::AwaitingCommand(request) => assert_eq!(request.combatant, ENEMY),
            other => panic!("expected the enemy's command request, got {:?}", other),
        }
        battle
    }

    fn finish_turn_and_one_more(battle: &mut Battle) {
        battle.submit_command(ENEMY, use_move(MoveId::Tackle)).unwrap();
        play_turn(battle, &[]);
        play_turn(battle, &tackles());
    }

    #[test]
    fn test_restored_battle_replays_identically() {
        // Arrange
        let mut original = mid_turn_battle(7);
        let text = original.snapshot().to_json().unwrap();
        let mut restored = Battle::restore(BattleSnapshot::from_json(&text).unwrap()).unwrap();

        // Act
        finish_turn_and_one_more(&mut original);
        finish_turn_and_one_more(&mut restored);

        // Assert
        assert_eq!(restored.history(), original.history());
        assert_eq!(restored.field(), original.field());
        assert_eq!(restored.rng_draws(), original.rng_draws());
        assert_eq!(restored.turn(), 4);
    }

    #[test]
    fn test_taking_a_snapshot_changes_nothing() {
        // Arrange
        let battle = mid_turn_battle(11);
        let draws = battle.rng_draws();

        // Act
        let first = battle.snapshot();
        let second = battle.snapshot();

        // Assert
        assert_eq!(first, second);
        assert_eq!(battle.rng_draws(), draws);
        assert_eq!(first.turn(), 2);
    }

    #[test]
    fn test_binary_and_json_forms_agree() {
        // Arrange
        let snapshot = mid_turn_battle(3).snapshot();

        // Act
        let from_bytes = BattleSnapshot::from_bytes(&snapshot.to_bytes().unwrap()).unwrap();
        let from_json = BattleSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();

        // Assert
        assert_eq!(from_bytes, snapshot);
        assert_eq!(from_json, snapshot);
    }

    #[test]
    fn test_rejected_snapshot_leaves_the_battle_alone() {
        // Arrange
        let mut battle = mid_turn_battle(5);
        let before = battle.snapshot();
        let mut future = before.clone();
        future.version = SNAPSHOT_VERSION + 1;

        // Act
        let result = battle.load_snapshot(future);

        // Assert
        assert_eq!(
            result,
            Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: SNAPSHOT_VERSION + 1,
            })
        );
        assert_eq!(battle.snapshot(), before);
    }

    #[test]
    fn test_unknown_combatant_is_inconsistent() {
        // Arrange
        let mut snapshot = mid_turn_battle(5).snapshot();
        snapshot.turn_order.push(CombatantId(42));

        // Act
        let result = Battle::restore(snapshot);

        // Assert
        assert!(matches!(result, Err(SnapshotError::Inconsistent(_))));
    }

    const STRAY: CombatantId = CombatantId(42);

    fn stray_seeder(snapshot: &mut BattleSnapshot) {
        snapshot.field.combatants[ENEMY.0]
            .tags
            .push(VolatileTag::new(VolatileCondition::Seeded, Some(STRAY), None));
    }

    fn stray_lock_on(snapshot: &mut BattleSnapshot) {
        snapshot.field.combatants[PLAYER.0]
            .tags
            .push(VolatileTag::new(VolatileCondition::LockedOn { target: STRAY }, None, Some(2)));
    }

    fn stray_command_target(snapshot: &mut BattleSnapshot) {
        snapshot.commands[PLAYER.0] = Some(TurnCommand::UseMove {
            move_id: MoveId::Tackle,
            target: Some(STRAY),
        });
    }

    fn stray_delayed_attack(snapshot: &mut BattleSnapshot) {
        snapshot.field.delayed_attacks.push(DelayedAttack {
            source: STRAY,
            move_id: MoveId::FutureSight,
            target_side: SideId::Enemy,
            slot: 0,
            turns_remaining: 2,
            damage: 10,
        });
    }

    #[rstest]
    #[case::tag_source(stray_seeder as fn(&mut BattleSnapshot))]
    #[case::tag_payload(stray_lock_on as fn(&mut BattleSnapshot))]
    #[case::command_target(stray_command_target as fn(&mut BattleSnapshot))]
    #[case::delayed_attack(stray_delayed_attack as fn(&mut BattleSnapshot))]
    fn test_embedded_unknown_combatant_is_rejected(#[case] corrupt: fn(&mut BattleSnapshot)) {
        // Arrange
        let mut battle = mid_turn_battle(5);
        let before = battle.snapshot();
        let mut broken = before.clone();
        corrupt(&mut broken);

        // Act
        let result = battle.load_snapshot(broken);

        // Assert
        assert!(matches!(result, Err(SnapshotError::Inconsistent(_))), "{:?}", result);
        assert_eq!(battle.snapshot(), before);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let result = BattleSnapshot::from_json("{\"version\": 1}");
        assert!(matches!(result, Err(SnapshotError::Decode(_))));
    }
}

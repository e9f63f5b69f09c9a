#[cfg(test)]
mod tests {
    use crate::battle::combatant::{CombatantId, DamageSource};
    use crate::battle::state::{ActionFailureReason, BattleEvent};
    use crate::battle::tests::common::{play_turn, position_of, scripted_battle, use_move, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use schema::{HeldItem, MoveId, SpeciesId, StatusEffect, WeatherType};

    const PLAYER: CombatantId = CombatantId(0);
    const ENEMY: CombatantId = CombatantId(1);

    #[test]
    fn test_future_sight_lands_two_turns_later() {
        // Arrange
        let gengar = TestCombatantBuilder::new(SpeciesId::Gengar, 50)
            .with_moves(vec![MoveId::FutureSight, MoveId::SwordsDance])
            .build();
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .build();
        let mut battle = scripted_battle(vec![gengar], vec![snorlax], vec![]);

        // Act
        let first = play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::FutureSight)), (ENEMY, use_move(MoveId::SwordsDance))],
        );

        // Assert: nothing hits yet
        assert!(first.contains(&BattleEvent::DelayedAttackQueued {
            user: PLAYER,
            move_used: MoveId::FutureSight,
        }));
        let snorlax = battle.field().get(ENEMY);
        assert_eq!(snorlax.hp(), snorlax.max_hp());

        // Act: a second cast while one is pending has nowhere to go
        let second = play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::FutureSight)), (ENEMY, use_move(MoveId::SwordsDance))],
        );

        // Assert
        assert!(second.contains(&BattleEvent::MoveFailed {
            user: PLAYER,
            move_used: MoveId::FutureSight,
            reason: ActionFailureReason::ButItFailed,
        }));
        let landed = position_of(&second, |e| {
            *e == BattleEvent::DelayedAttackLanded {
                target: ENEMY,
                move_used: MoveId::FutureSight,
            }
        });
        let ended = position_of(&second, |e| matches!(e, BattleEvent::TurnEnded { .. }));
        assert!(landed < ended);
        assert!(second.iter().any(|e| matches!(
            e,
            BattleEvent::DamageDealt {
                target: ENEMY,
                source: DamageSource::Delayed,
                ..
            }
        )));
        let snorlax = battle.field().get(ENEMY);
        assert!(snorlax.hp() < snorlax.max_hp());
    }

    #[test]
    fn test_poison_ticks_before_leftovers_heal() {
        // Arrange
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .with_status(StatusEffect::Poison)
            .with_item(HeldItem::Leftovers)
            .build();
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .build();
        let mut battle = scripted_battle(vec![snorlax], vec![pikachu], vec![]);
        let max = battle.field().get(PLAYER).max_hp();

        // Act
        let events = play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::SwordsDance)), (ENEMY, use_move(MoveId::SwordsDance))],
        );

        // Assert
        let tick = position_of(&events, |e| {
            *e == BattleEvent::DamageDealt {
                target: PLAYER,
                amount: max / 8,
                remaining_hp: max - max / 8,
                source: DamageSource::StatusTick,
            }
        });
        let healed = position_of(&events, |e| {
            *e == BattleEvent::ItemActivated {
                combatant: PLAYER,
                item: HeldItem::Leftovers,
            }
        });
        assert!(tick < healed);
        assert_eq!(battle.field().get(PLAYER).hp(), max - max / 8 + max / 16);
    }

    #[test]
    fn test_burn_ticks_a_sixteenth() {
        // Arrange
        let snorlax = TestCombatantBuilder::new(SpeciesId::Snorlax, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .with_status(StatusEffect::Burn)
            .build();
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .build();
        let mut battle = scripted_battle(vec![snorlax], vec![pikachu], vec![]);
        let max = battle.field().get(PLAYER).max_hp();

        // Act
        play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::SwordsDance)), (ENEMY, use_move(MoveId::SwordsDance))],
        );

        // Assert
        assert_eq!(battle.field().get(PLAYER).hp(), max - max / 16);
    }

    #[test]
    fn test_sandstorm_chips_everyone_but_rock_types() {
        // Arrange
        let tyranitar = TestCombatantBuilder::new(SpeciesId::Tyranitar, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .build();
        let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
            .with_moves(vec![MoveId::SwordsDance])
            .build();
        let mut battle = scripted_battle(vec![tyranitar], vec![pikachu], vec![]);

        // Act
        let events = play_turn(
            &mut battle,
            &[(PLAYER, use_move(MoveId::SwordsDance)), (ENEMY, use_move(MoveId::SwordsDance))],
        );

        // Assert
        assert_eq!(battle.field().weather(), Some(WeatherType::Sandstorm));
        assert!(events.contains(&BattleEvent::WeatherContinues {
            weather: WeatherType::Sandstorm
        }));
        let pikachu = battle.field().get(ENEMY);
        assert_eq!(pikachu.hp(), pikachu.max_hp() - pikachu.max_hp().div_ceil(16));
        let tyranitar = battle.field().get(PLAYER);
        assert_eq!(tyranitar.hp(), tyranitar.max_hp());
    }
}

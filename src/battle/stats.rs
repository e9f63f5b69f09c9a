use crate::battle::abilities::{hooks_of, speed_multiplier};
use crate::battle::combatant::CombatantId;
use crate::battle::conditions::TagKind;
use crate::battle::field::Field;
use schema::{BattleStat, MoveData, MoveFlags, PokemonType, SideCondition, StatusEffect};

/// Denominators of the critical-hit chance for stages 0..=3.
pub const CRIT_CHANCE_DENOMINATORS: [u32; 4] = [24, 8, 2, 1];

/// Apply stat stage multipliers according to Pokemon formula
/// Negative stages: (2 / (2 + |stage|))
/// Positive stages: ((2 + stage) / 2)
pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-6, 6) as f64;
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

/// Accuracy and evasion use thirds instead of halves.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-6, 6) as f64;
    if stage >= 0.0 {
        (3.0 + stage) / 3.0
    } else {
        3.0 / (3.0 - stage)
    }
}

pub fn apply_stage(base: u32, stage: i8) -> u32 {
    ((base as f64) * stage_multiplier(stage)).floor() as u32
}

/// Stat value after stages. Accuracy and evasion have no raw value, so asking
/// for them returns 1 like `Stats::get`.
pub fn effective_stat(field: &Field, id: CombatantId, stat: BattleStat) -> u32 {
    let combatant = field.get(id);
    apply_stage(combatant.stats.get(stat), combatant.stage(stat))
}

/// Calculate effective speed including stat stages, paralysis, Tailwind and abilities
pub fn effective_speed(field: &Field, id: CombatantId) -> u32 {
    let combatant = field.get(id);
    let mut speed = apply_stage(combatant.stats.speed, combatant.stage(BattleStat::Speed)) as f64;

    if combatant.status == Some(StatusEffect::Paralysis) {
        speed *= 0.5;
    }
    if field.side(combatant.side).has_condition(SideCondition::Tailwind) {
        speed *= 2.0;
    }
    speed *= speed_multiplier(field, combatant);

    speed.floor() as u32
}

/// Accuracy threshold in percent for `user` hitting `target`, before the roll.
pub fn hit_threshold(field: &Field, user: CombatantId, target: CombatantId, base_accuracy: u8) -> u8 {
    let accuracy_stage = field.get(user).stage(BattleStat::Accuracy);
    let evasion_stage = field.get(target).stage(BattleStat::Evasion);
    let adjusted = (accuracy_stage - evasion_stage).clamp(-6, 6);

    let threshold = (base_accuracy as f64 * accuracy_stage_multiplier(adjusted)).round();
    threshold.clamp(1.0, 100.0) as u8
}

pub fn crit_stage(field: &Field, user: CombatantId, move_data: &MoveData) -> usize {
    let combatant = field.get(user);
    let mut stage = 0u8;
    if move_data.flags.contains(MoveFlags::HIGH_CRIT) {
        stage += 1;
    }
    if combatant.has_tag(TagKind::FocusEnergy) {
        stage += 2;
    }
    if let Some(item) = combatant.item {
        stage += item.crit_stage_bonus();
    }
    (stage as usize).min(CRIT_CHANCE_DENOMINATORS.len() - 1)
}

/// Whether the combatant touches the ground for terrain and hazard purposes.
pub fn is_grounded(field: &Field, id: CombatantId) -> bool {
    let combatant = field.get(id);
    !combatant.has_type(PokemonType::Flying) && hooks_of(combatant).immune_to != Some(PokemonType::Ground)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::combatant::Combatant;
    use crate::battle::field::BattleFormat;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{MoveId, SpeciesId};

    fn field_with(speed_stage: i8) -> Field {
        let mut player = Combatant::new(SpeciesId::Snorlax, 50, &[MoveId::Tackle]);
        player.stages.apply(BattleStat::Speed, speed_stage);
        let enemy = Combatant::new(SpeciesId::Pikachu, 50, &[MoveId::Tackle]);
        Field::new(BattleFormat::Single, vec![player], vec![enemy]).unwrap()
    }

    #[rstest]
    #[case(0, 100)]
    #[case(1, 150)]
    #[case(2, 200)]
    #[case(-1, 66)]
    #[case(-2, 50)]
    #[case(6, 400)]
    #[case(-6, 25)]
    fn test_stat_stage_multipliers(#[case] stage: i8, #[case] expected: u32) {
        assert_eq!(apply_stage(100, stage), expected);
    }

    #[test]
    fn test_accuracy_stage_multipliers() {
        assert!((accuracy_stage_multiplier(0) - 1.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(1) - 4.0 / 3.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(-1) - 3.0 / 4.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(6) - 3.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(-6) - 1.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn test_effective_speed_paralysis_and_tailwind() {
        let mut field = field_with(0);
        let id = CombatantId(0);
        assert_eq!(effective_speed(&field, id), 50);

        field.get_mut(id).status = Some(StatusEffect::Paralysis);
        assert_eq!(effective_speed(&field, id), 25);

        field.side_mut(crate::battle::combatant::SideId::Player).conditions.push(crate::battle::field::SideTag {
            condition: SideCondition::Tailwind,
            turns_remaining: Some(4),
            layers: 1,
        });
        assert_eq!(effective_speed(&field, id), 50);
    }

    #[test]
    fn test_speed_stages_apply() {
        let field = field_with(2);
        assert_eq!(effective_speed(&field, CombatantId(0)), 100);
    }

    #[test]
    fn test_crit_stage_caps_at_guaranteed() {
        let mut field = field_with(0);
        let id = CombatantId(0);
        let slash = MoveId::Slash.data();
        assert_eq!(crit_stage(&field, id, &MoveId::Tackle.data()), 0);
        assert_eq!(crit_stage(&field, id, &slash), 1);

        field.get_mut(id).add_tag(crate::battle::conditions::VolatileTag::new(
            crate::battle::conditions::VolatileCondition::FocusEnergy,
            Some(id),
            None,
        ));
        field.get_mut(id).item = Some(schema::HeldItem::ScopeLens);
        assert_eq!(crit_stage(&field, id, &slash), 3);
    }
}

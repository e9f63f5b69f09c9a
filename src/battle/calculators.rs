use crate::battle::abilities::damage_multiplier as ability_multiplier;
use crate::battle::combatant::CombatantId;
use crate::battle::context::BattleContext;
use crate::battle::effects::screen_multiplier;
use crate::battle::items;
use crate::battle::stats::{apply_stage, crit_stage, is_grounded, CRIT_CHANCE_DENOMINATORS};
use schema::{
    BattleStat, MoveCategory, MoveData, MoveFlags, PokemonType, StatusEffect, TerrainType, WeatherType,
};

/// Outcome of one damage roll against one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub damage: u32,
    pub critical: bool,
    pub effectiveness: f32,
}

pub fn type_effectiveness(ctx: &BattleContext, move_type: PokemonType, target: CombatantId) -> f32 {
    PokemonType::effectiveness_against(
        move_type,
        &ctx.combatant(target).types,
        ctx.config.inverse_type_chart,
    )
}

/// Critical-hit decision. Forced crits and the never-crit override make no
/// draw; otherwise one draw against the stage's denominator.
fn roll_critical(ctx: &mut BattleContext, user: CombatantId, move_data: &MoveData) -> bool {
    if ctx.config.never_crit {
        return false;
    }
    if move_data.flags.contains(MoveFlags::ALWAYS_CRIT) {
        return true;
    }
    let denominator = CRIT_CHANCE_DENOMINATORS[crit_stage(&ctx.field, user, move_data)];
    if denominator <= 1 {
        return true;
    }
    ctx.rng.next_int(denominator, "critical hit") == 0
}

fn weather_multiplier(weather: Option<WeatherType>, move_type: PokemonType) -> f64 {
    match (weather, move_type) {
        (Some(WeatherType::Rain), PokemonType::Water) | (Some(WeatherType::Sun), PokemonType::Fire) => 1.5,
        (Some(WeatherType::Rain), PokemonType::Fire) | (Some(WeatherType::Sun), PokemonType::Water) => 0.5,
        _ => 1.0,
    }
}

fn terrain_multiplier(ctx: &BattleContext, user: CombatantId, target: CombatantId, move_type: PokemonType) -> f64 {
    let Some(terrain) = ctx.field.terrain() else {
        return 1.0;
    };
    let boosted = match terrain {
        TerrainType::Electric => PokemonType::Electric,
        TerrainType::Grassy => PokemonType::Grass,
        TerrainType::Psychic => PokemonType::Psychic,
        TerrainType::Misty => {
            return if move_type == PokemonType::Dragon && is_grounded(&ctx.field, target) {
                0.5
            } else {
                1.0
            };
        }
    };
    if move_type == boosted && is_grounded(&ctx.field, user) {
        1.3
    } else {
        1.0
    }
}

/// Full damage formula for one hit.
///
/// `floor(((2L/5 + 2) × P × A/D / 50 + 2) × modifiers)` with the modifiers
/// applied in order: STAB, type effectiveness, critical, burn, weather,
/// terrain, screens, ability, item, spread, random roll. Draws: the critical
/// roll (when one is needed) and then the random roll.
pub fn calculate_damage(
    ctx: &mut BattleContext,
    user: CombatantId,
    target: CombatantId,
    move_data: &MoveData,
    spread: bool,
) -> DamageRoll {
    let effectiveness = type_effectiveness(ctx, move_data.move_type, target);
    if effectiveness == 0.0 || move_data.power == 0 {
        return DamageRoll {
            damage: 0,
            critical: false,
            effectiveness,
        };
    }

    let critical = roll_critical(ctx, user, move_data);

    let attacker = ctx.combatant(user);
    let defender = ctx.combatant(target);
    let (attack_stat, defense_stat) = match move_data.category {
        MoveCategory::Special => (BattleStat::SpecialAttack, BattleStat::SpecialDefense),
        _ => (BattleStat::Attack, BattleStat::Defense),
    };
    let mut attack_stage = attacker.stage(attack_stat);
    let mut defense_stage = defender.stage(defense_stat);
    if critical {
        // Crits ignore the attacker's drops and the defender's boosts.
        attack_stage = attack_stage.max(0);
        defense_stage = defense_stage.min(0);
    }
    let attack = apply_stage(attacker.stats.get(attack_stat), attack_stage).max(1) as f64;
    let defense = apply_stage(defender.stats.get(defense_stat), defense_stage).max(1) as f64;

    let base = base_damage(attacker.level, move_data.power, attack, defense);

    let mut modifier = 1.0;
    if move_data.move_type != PokemonType::Typeless && attacker.has_type(move_data.move_type) {
        modifier *= 1.5;
    }
    modifier *= effectiveness as f64;
    if critical {
        modifier *= ctx.config.crit_multiplier as f64;
    }
    if move_data.category == MoveCategory::Physical && attacker.status == Some(StatusEffect::Burn) {
        modifier *= 0.5;
    }
    modifier *= weather_multiplier(ctx.field.weather(), move_data.move_type);
    modifier *= terrain_multiplier(ctx, user, target, move_data.move_type);
    if !critical {
        modifier *= screen_multiplier(ctx, target, move_data.category);
    }
    modifier *= ability_multiplier(attacker, move_data);
    modifier *= items::damage_multiplier(attacker);
    if spread {
        modifier *= 0.75;
    }

    let roll = 85 + ctx.rng.next_int(16, "damage roll");
    let damage = ((base * modifier * roll as f64 / 100.0).floor() as u32).max(1);

    DamageRoll {
        damage,
        critical,
        effectiveness,
    }
}

/// Self-inflicted confusion hit: 40 power, typeless, own Attack against own
/// Defense, no modifiers and no random roll.
pub fn confusion_damage(ctx: &BattleContext, id: CombatantId) -> u32 {
    let combatant = ctx.combatant(id);
    let attack = apply_stage(combatant.stats.attack, combatant.stage(BattleStat::Attack)).max(1) as f64;
    let defense = apply_stage(combatant.stats.defense, combatant.stage(BattleStat::Defense)).max(1) as f64;
    (base_damage(combatant.level, 40, attack, defense).floor() as u32).max(1)
}

/// `((2·level/5 + 2)·power·atk/def)/50 + 2`, unrounded. Modifiers and the
/// roll multiply this value and only the final product is floored.
pub fn base_damage(level: u8, power: u16, attack: f64, defense: f64) -> f64 {
    ((2.0 * level as f64 / 5.0 + 2.0) * power as f64 * attack / defense) / 50.0 + 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::combatant::Combatant;
    use crate::battle::field::{BattleFormat, Field};
    use crate::battle::rng::BattleRng;
    use crate::config::BattleConfig;
    use rstest::rstest;
    use schema::{MoveId, SpeciesId};

    fn context(config: BattleConfig, rng: BattleRng) -> BattleContext {
        let player = Combatant::new(SpeciesId::Charizard, 50, &[MoveId::Flamethrower, MoveId::Tackle]);
        let enemy = Combatant::new(SpeciesId::Venusaur, 50, &[MoveId::Tackle]);
        let field = Field::new(BattleFormat::Single, vec![player], vec![enemy]).unwrap();
        BattleContext::new(config, field, rng)
    }

    fn no_crit() -> BattleConfig {
        BattleConfig {
            never_crit: true,
            ..BattleConfig::default()
        }
    }

    #[test]
    fn test_never_crit_draws_only_the_roll() {
        let mut ctx = context(no_crit(), BattleRng::scripted(vec![15]));
        let roll = calculate_damage(&mut ctx, CombatantId(0), CombatantId(1), &MoveId::Flamethrower.data(), false);
        assert!(!roll.critical);
        assert_eq!(roll.effectiveness, 2.0);
        assert_eq!(ctx.rng.draws(), 1);
    }

    #[test]
    fn test_roll_spans_85_to_100_percent() {
        let flamethrower = MoveId::Flamethrower.data();
        let mut low = context(no_crit(), BattleRng::scripted(vec![0]));
        let mut high = context(no_crit(), BattleRng::scripted(vec![15]));
        let min = calculate_damage(&mut low, CombatantId(0), CombatantId(1), &flamethrower, false).damage;
        let max = calculate_damage(&mut high, CombatantId(0), CombatantId(1), &flamethrower, false).damage;
        assert!(min < max);
        assert!(min as f64 >= max as f64 * 0.84);
    }

    #[test]
    fn test_inverse_chart_flips_weakness() {
        let config = BattleConfig {
            inverse_type_chart: true,
            ..no_crit()
        };
        let ctx = context(config, BattleRng::scripted(vec![]));
        assert_eq!(type_effectiveness(&ctx, PokemonType::Fire, CombatantId(1)), 0.5);
    }

    #[test]
    fn test_crit_roll_hits_on_zero() {
        let mut ctx = context(BattleConfig::default(), BattleRng::scripted(vec![0, 15]));
        let roll = calculate_damage(&mut ctx, CombatantId(0), CombatantId(1), &MoveId::Tackle.data(), false);
        assert!(roll.critical);
        assert_eq!(ctx.rng.draws(), 2);
    }

    #[test]
    fn test_rain_halves_fire() {
        let flamethrower = MoveId::Flamethrower.data();
        let mut clear = context(no_crit(), BattleRng::scripted(vec![15]));
        let mut rain = context(no_crit(), BattleRng::scripted(vec![15]));
        rain.field.weather = Some(crate::battle::field::WeatherState {
            weather: WeatherType::Rain,
            turns_remaining: 5,
        });
        let dry = calculate_damage(&mut clear, CombatantId(0), CombatantId(1), &flamethrower, false).damage;
        let wet = calculate_damage(&mut rain, CombatantId(0), CombatantId(1), &flamethrower, false).damage;
        assert!(wet <= dry / 2 + 1);
    }

    #[rstest]
    #[case(50, 40, 1.0, 1.0, 19.6)]
    #[case(51, 40, 1.0, 1.0, 19.92)]
    #[case(51, 90, 3.0, 2.0, 62.48)]
    fn test_base_damage_is_not_rounded(
        #[case] level: u8,
        #[case] power: u16,
        #[case] attack: f64,
        #[case] defense: f64,
        #[case] expected: f64,
    ) {
        let base = base_damage(level, power, attack, defense);
        assert!((base - expected).abs() < 1e-9, "{} != {}", base, expected);
    }

    #[test]
    fn test_only_the_final_product_is_floored() {
        // Level 51 STAB: 19.92 * 1.5 = 29.88. Flooring the level term first would give 31.
        let damage = (base_damage(51, 40, 1.0, 1.0) * 1.5).floor() as u32;
        assert_eq!(damage, 29);
    }
}

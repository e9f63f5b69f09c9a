//! Ability registry.
//!
//! Every `AbilityId` maps to an `AbilityHooks` table through an exhaustive
//! match, so a new ability without an entry fails to compile. Hooks are plain
//! function pointers invoked by the phase handlers at fixed trigger points.

use crate::battle::combatant::{Combatant, CombatantId, DamageSource};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::field::Field;
use crate::battle::phases::Phase;
use crate::battle::state::BattleEvent;
use schema::{
    AbilityId, BattleStat, MoveCategory, MoveData, PokemonType, StatusEffect, WeatherType,
};

// ============================================================================
// Hook Type Definitions
// ============================================================================

/// Fired when the owner enters the field, and for Forecast-style abilities
/// whenever the weather changes.
pub type OnFieldEvent = fn(ctx: &mut BattleContext, owner: CombatantId);

/// Adjusts a move's priority bracket.
pub type OnModifyPriority = fn(move_data: &MoveData, priority: i8) -> i8;

/// Called before the user's move resolves, after PP is spent.
pub type OnBeforeMove = fn(ctx: &mut BattleContext, owner: CombatantId, move_data: &MoveData);

/// Called after the owner takes a direct hit. `contact` is true when the move
/// touched the owner.
pub type OnBeingHit = fn(ctx: &mut BattleContext, owner: CombatantId, attacker: CombatantId, contact: bool);

/// Called when a direct hit from the owner knocks something out.
pub type OnKnockOut = fn(ctx: &mut BattleContext, owner: CombatantId);

/// Called when the owner faints, with what knocked it out.
pub type OnFaint = fn(ctx: &mut BattleContext, owner: CombatantId, source: Option<DamageSource>);

/// Multiplier on the owner's outgoing damage.
pub type OnModifyDamage = fn(owner: &Combatant, move_data: &MoveData) -> f64;

/// Multiplier on the owner's speed.
pub type OnModifySpeed = fn(field: &Field) -> f64;

// ============================================================================
// AbilityHooks Struct
// ============================================================================

#[derive(Clone, Copy)]
pub struct AbilityHooks {
    pub on_switch_in: Option<OnFieldEvent>,
    pub on_weather_change: Option<OnFieldEvent>,
    pub on_modify_priority: Option<OnModifyPriority>,
    pub on_before_move: Option<OnBeforeMove>,
    pub on_being_hit: Option<OnBeingHit>,
    pub on_knock_out: Option<OnKnockOut>,
    pub on_faint: Option<OnFaint>,
    pub on_turn_end: Option<OnFieldEvent>,
    pub on_modify_damage: Option<OnModifyDamage>,
    pub on_modify_speed: Option<OnModifySpeed>,

    /// Pulls single-target moves of this type onto the owner and absorbs them.
    pub draws_type: Option<PokemonType>,
    pub ignores_redirection: bool,
    pub breaks_abilities: bool,
    /// Survives a lethal direct hit from full HP.
    pub survives_from_full: bool,
    pub blocks_indirect_damage: bool,
    pub blocks_stat_drops: bool,
    pub immune_to: Option<PokemonType>,
    pub max_multi_hit: bool,
    pub always_hits: bool,
    /// Extra PP an opponent spends targeting the owner.
    pub extra_pp_drain: u8,
}

impl AbilityHooks {
    pub const NONE: Self = Self {
        on_switch_in: None,
        on_weather_change: None,
        on_modify_priority: None,
        on_before_move: None,
        on_being_hit: None,
        on_knock_out: None,
        on_faint: None,
        on_turn_end: None,
        on_modify_damage: None,
        on_modify_speed: None,
        draws_type: None,
        ignores_redirection: false,
        breaks_abilities: false,
        survives_from_full: false,
        blocks_indirect_damage: false,
        blocks_stat_drops: false,
        immune_to: None,
        max_multi_hit: false,
        always_hits: false,
        extra_pp_drain: 0,
    };
}

pub fn hooks(ability: AbilityId) -> AbilityHooks {
    match ability {
        AbilityId::None => AbilityHooks::NONE,

        // =====================================================================
        // Switch-in & weather
        // =====================================================================
        AbilityId::Intimidate => AbilityHooks {
            on_switch_in: Some(intimidate),
            ..AbilityHooks::NONE
        },
        AbilityId::Drizzle => AbilityHooks {
            on_switch_in: Some(drizzle),
            ..AbilityHooks::NONE
        },
        AbilityId::Drought => AbilityHooks {
            on_switch_in: Some(drought),
            ..AbilityHooks::NONE
        },
        AbilityId::SandStream => AbilityHooks {
            on_switch_in: Some(sand_stream),
            ..AbilityHooks::NONE
        },
        AbilityId::Forecast => AbilityHooks {
            on_switch_in: Some(forecast),
            on_weather_change: Some(forecast),
            ..AbilityHooks::NONE
        },
        AbilityId::SwiftSwim => AbilityHooks {
            on_modify_speed: Some(swift_swim),
            ..AbilityHooks::NONE
        },

        // =====================================================================
        // Turn flow
        // =====================================================================
        AbilityId::SpeedBoost => AbilityHooks {
            on_turn_end: Some(speed_boost),
            ..AbilityHooks::NONE
        },
        AbilityId::PowerConstruct => AbilityHooks {
            on_turn_end: Some(power_construct),
            ..AbilityHooks::NONE
        },
        AbilityId::Prankster => AbilityHooks {
            on_modify_priority: Some(prankster),
            ..AbilityHooks::NONE
        },
        AbilityId::Protean => AbilityHooks {
            on_before_move: Some(protean),
            ..AbilityHooks::NONE
        },

        // =====================================================================
        // Hits & knockouts
        // =====================================================================
        AbilityId::Moxie => AbilityHooks {
            on_knock_out: Some(moxie),
            ..AbilityHooks::NONE
        },
        AbilityId::RoughSkin => AbilityHooks {
            on_being_hit: Some(rough_skin),
            ..AbilityHooks::NONE
        },
        AbilityId::Static => AbilityHooks {
            on_being_hit: Some(static_paralysis),
            ..AbilityHooks::NONE
        },
        AbilityId::Stamina => AbilityHooks {
            on_being_hit: Some(stamina),
            ..AbilityHooks::NONE
        },
        AbilityId::Aftermath => AbilityHooks {
            on_faint: Some(aftermath),
            ..AbilityHooks::NONE
        },
        AbilityId::Blaze => AbilityHooks {
            on_modify_damage: Some(blaze),
            ..AbilityHooks::NONE
        },
        AbilityId::Torrent => AbilityHooks {
            on_modify_damage: Some(torrent),
            ..AbilityHooks::NONE
        },

        // =====================================================================
        // Targeting
        // =====================================================================
        AbilityId::StormDrain => AbilityHooks {
            draws_type: Some(PokemonType::Water),
            ..AbilityHooks::NONE
        },
        AbilityId::LightningRod => AbilityHooks {
            draws_type: Some(PokemonType::Electric),
            ..AbilityHooks::NONE
        },
        AbilityId::Stalwart => AbilityHooks {
            ignores_redirection: true,
            ..AbilityHooks::NONE
        },

        // =====================================================================
        // Passive flags
        // =====================================================================
        AbilityId::MoldBreaker => AbilityHooks {
            breaks_abilities: true,
            ..AbilityHooks::NONE
        },
        AbilityId::Sturdy => AbilityHooks {
            survives_from_full: true,
            ..AbilityHooks::NONE
        },
        AbilityId::MagicGuard => AbilityHooks {
            blocks_indirect_damage: true,
            ..AbilityHooks::NONE
        },
        AbilityId::ClearBody => AbilityHooks {
            blocks_stat_drops: true,
            ..AbilityHooks::NONE
        },
        AbilityId::Levitate => AbilityHooks {
            immune_to: Some(PokemonType::Ground),
            ..AbilityHooks::NONE
        },
        AbilityId::SkillLink => AbilityHooks {
            max_multi_hit: true,
            ..AbilityHooks::NONE
        },
        AbilityId::NoGuard => AbilityHooks {
            always_hits: true,
            ..AbilityHooks::NONE
        },
        AbilityId::Pressure => AbilityHooks {
            extra_pp_drain: 1,
            ..AbilityHooks::NONE
        },
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// The ability that is actually working. Suppression silences everything
/// except the unsuppressable whitelist.
pub fn active_ability(combatant: &Combatant) -> AbilityId {
    if combatant.ability_suppressed && !combatant.ability.is_unsuppressable() {
        AbilityId::None
    } else {
        combatant.ability
    }
}

pub fn hooks_of(combatant: &Combatant) -> AbilityHooks {
    hooks(active_ability(combatant))
}

/// The target's ability as seen by `attacker`'s move. A mold-breaking
/// attacker looks straight through breakable abilities; the target itself is
/// left untouched.
pub fn ability_against(field: &Field, attacker: Option<CombatantId>, target: CombatantId) -> AbilityId {
    let ability = active_ability(field.get(target));
    match attacker {
        Some(attacker)
            if attacker != target && hooks_of(field.get(attacker)).breaks_abilities && ability.is_breakable() =>
        {
            AbilityId::None
        }
        _ => ability,
    }
}

pub fn hooks_against(field: &Field, attacker: Option<CombatantId>, target: CombatantId) -> AbilityHooks {
    hooks(ability_against(field, attacker, target))
}

fn announce(ctx: &mut BattleContext, owner: CombatantId) {
    let ability = ctx.combatant(owner).ability;
    ctx.emit(BattleEvent::AbilityActivated { combatant: owner, ability });
}

// ============================================================================
// Trigger entry points
// ============================================================================

pub fn trigger_switch_in(ctx: &mut BattleContext, owner: CombatantId) {
    if let Some(hook) = hooks_of(ctx.combatant(owner)).on_switch_in {
        hook(ctx, owner);
    }
}

/// Fires weather-change hooks for everyone on the field, player side first.
pub fn trigger_weather_change(ctx: &mut BattleContext) {
    for id in ctx.field.active_ids() {
        if let Some(hook) = hooks_of(ctx.combatant(id)).on_weather_change {
            hook(ctx, id);
        }
    }
}

pub fn modify_priority(combatant: &Combatant, move_data: &MoveData) -> i8 {
    match hooks_of(combatant).on_modify_priority {
        Some(hook) => hook(move_data, move_data.priority),
        None => move_data.priority,
    }
}

pub fn trigger_before_move(ctx: &mut BattleContext, owner: CombatantId, move_data: &MoveData) {
    if let Some(hook) = hooks_of(ctx.combatant(owner)).on_before_move {
        hook(ctx, owner, move_data);
    }
}

pub fn trigger_being_hit(ctx: &mut BattleContext, owner: CombatantId, attacker: CombatantId, contact: bool) {
    if let Some(hook) = hooks_against(&ctx.field, Some(attacker), owner).on_being_hit {
        hook(ctx, owner, attacker, contact);
    }
}

pub fn trigger_knock_out(ctx: &mut BattleContext, owner: CombatantId) {
    if ctx.combatant(owner).is_fainted() {
        return;
    }
    if let Some(hook) = hooks_of(ctx.combatant(owner)).on_knock_out {
        hook(ctx, owner);
    }
}

pub fn trigger_faint(ctx: &mut BattleContext, owner: CombatantId, source: Option<DamageSource>) {
    if let Some(hook) = hooks_of(ctx.combatant(owner)).on_faint {
        hook(ctx, owner, source);
    }
}

pub fn trigger_turn_end(ctx: &mut BattleContext, owner: CombatantId) {
    if let Some(hook) = hooks_of(ctx.combatant(owner)).on_turn_end {
        hook(ctx, owner);
    }
}

pub fn damage_multiplier(owner: &Combatant, move_data: &MoveData) -> f64 {
    match hooks_of(owner).on_modify_damage {
        Some(hook) => hook(owner, move_data),
        None => 1.0,
    }
}

pub fn speed_multiplier(field: &Field, owner: &Combatant) -> f64 {
    match hooks_of(owner).on_modify_speed {
        Some(hook) => hook(field),
        None => 1.0,
    }
}

// ============================================================================
// Implementations
// ============================================================================

fn intimidate(ctx: &mut BattleContext, owner: CombatantId) {
    announce(ctx, owner);
    for target in ctx.field.opponents_of(owner) {
        ctx.unshift(Phase::StatStageChange {
            target,
            source: Some(owner),
            stats: vec![BattleStat::Attack],
            stages: -1,
        });
    }
}

fn set_weather_from(ctx: &mut BattleContext, owner: CombatantId, weather: WeatherType) {
    if ctx.field.weather() == Some(weather) {
        return;
    }
    announce(ctx, owner);
    let turns = ctx.config.weather_turns;
    effects::set_weather(ctx, weather, turns);
}

fn drizzle(ctx: &mut BattleContext, owner: CombatantId) {
    set_weather_from(ctx, owner, WeatherType::Rain);
}

fn drought(ctx: &mut BattleContext, owner: CombatantId) {
    set_weather_from(ctx, owner, WeatherType::Sun);
}

fn sand_stream(ctx: &mut BattleContext, owner: CombatantId) {
    set_weather_from(ctx, owner, WeatherType::Sandstorm);
}

fn forecast(ctx: &mut BattleContext, owner: CombatantId) {
    let form = match ctx.field.weather() {
        Some(WeatherType::Sun) => PokemonType::Fire,
        Some(WeatherType::Rain) => PokemonType::Water,
        Some(WeatherType::Hail) => PokemonType::Ice,
        _ => PokemonType::Normal,
    };
    if ctx.combatant(owner).types != [form] {
        ctx.combatant_mut(owner).types = vec![form];
        announce(ctx, owner);
    }
}

fn swift_swim(field: &Field) -> f64 {
    if field.weather() == Some(WeatherType::Rain) {
        2.0
    } else {
        1.0
    }
}

fn speed_boost(ctx: &mut BattleContext, owner: CombatantId) {
    announce(ctx, owner);
    effects::change_stat_stage(ctx, owner, Some(owner), BattleStat::Speed, 1);
}

/// Below half HP at the end of a turn: change into the complete form, heal to
/// full and, for bosses, restore every shield.
fn power_construct(ctx: &mut BattleContext, owner: CombatantId) {
    let combatant = ctx.combatant(owner);
    if combatant.form_changed || combatant.is_fainted() || combatant.hp() * 2 >= combatant.max_hp() {
        return;
    }
    let Some(complete) = combatant.species.data().complete_form else {
        return;
    };

    announce(ctx, owner);
    let combatant = ctx.combatant_mut(owner);
    let hp_before = combatant.hp();
    combatant.change_form(complete);
    if let Some(segments) = combatant.boss.as_mut() {
        segments.current_index = segments.segment_count - 1;
    }
    let restored = combatant.boss.is_some();
    let hp = combatant.hp();
    let max_hp = combatant.max_hp();

    ctx.emit(BattleEvent::FormChanged {
        combatant: owner,
        species: complete,
    });
    ctx.emit(BattleEvent::Healed {
        target: owner,
        amount: max_hp.saturating_sub(hp_before),
        new_hp: hp,
    });
    if restored {
        ctx.emit(BattleEvent::BossShieldsRestored { boss: owner });
    }
}

fn prankster(move_data: &MoveData, priority: i8) -> i8 {
    if move_data.category == MoveCategory::Status {
        priority + 1
    } else {
        priority
    }
}

fn protean(ctx: &mut BattleContext, owner: CombatantId, move_data: &MoveData) {
    let move_type = move_data.move_type;
    if move_type == PokemonType::Typeless || ctx.combatant(owner).types == [move_type] {
        return;
    }
    ctx.combatant_mut(owner).types = vec![move_type];
    announce(ctx, owner);
}

fn moxie(ctx: &mut BattleContext, owner: CombatantId) {
    announce(ctx, owner);
    effects::change_stat_stage(ctx, owner, Some(owner), BattleStat::Attack, 1);
}

fn rough_skin(ctx: &mut BattleContext, owner: CombatantId, attacker: CombatantId, contact: bool) {
    if !contact || ctx.combatant(attacker).is_fainted() {
        return;
    }
    announce(ctx, owner);
    let amount = (ctx.combatant(attacker).max_hp() / 8).max(1);
    effects::apply_damage(ctx, attacker, amount, DamageSource::Contact);
}

fn static_paralysis(ctx: &mut BattleContext, owner: CombatantId, attacker: CombatantId, contact: bool) {
    if !contact || ctx.combatant(attacker).is_fainted() {
        return;
    }
    if ctx.rng.chance(30, "static") {
        announce(ctx, owner);
        effects::try_inflict_status(ctx, attacker, StatusEffect::Paralysis, Some(owner));
    }
}

fn stamina(ctx: &mut BattleContext, owner: CombatantId, _attacker: CombatantId, _contact: bool) {
    if ctx.combatant(owner).is_fainted() {
        return;
    }
    announce(ctx, owner);
    effects::change_stat_stage(ctx, owner, Some(owner), BattleStat::Defense, 1);
}

fn aftermath(ctx: &mut BattleContext, owner: CombatantId, source: Option<DamageSource>) {
    let Some(DamageSource::DirectHit { attacker, move_id }) = source else {
        return;
    };
    if !move_id.data().makes_contact() || ctx.combatant(attacker).is_fainted() {
        return;
    }
    announce(ctx, owner);
    let amount = (ctx.combatant(attacker).max_hp() / 4).max(1);
    effects::apply_damage(ctx, attacker, amount, DamageSource::Contact);
}

fn pinch_boost(owner: &Combatant, move_data: &MoveData, boosted: PokemonType) -> f64 {
    if move_data.move_type == boosted && owner.hp() * 3 <= owner.max_hp() {
        1.5
    } else {
        1.0
    }
}

fn blaze(owner: &Combatant, move_data: &MoveData) -> f64 {
    pinch_boost(owner, move_data, PokemonType::Fire)
}

fn torrent(owner: &Combatant, move_data: &MoveData) -> f64 {
    pinch_boost(owner, move_data, PokemonType::Water)
}

/// Whether `owner` would absorb a move of `move_type` through a drawing
/// ability, honoring Mold Breaker on the attacker's side.
pub fn absorbs(field: &Field, attacker: CombatantId, owner: CombatantId, move_type: PokemonType) -> bool {
    hooks_against(field, Some(attacker), owner).draws_type == Some(move_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::field::BattleFormat;
    use pretty_assertions::assert_eq;
    use schema::{MoveId, SpeciesId};
    use strum::IntoEnumIterator;

    fn field(attacker: AbilityId, target: AbilityId) -> Field {
        let player = Combatant::new(SpeciesId::Haxorus, 50, &[MoveId::Tackle]).with_ability(attacker);
        let enemy = Combatant::new(SpeciesId::Snorlax, 50, &[MoveId::Tackle]).with_ability(target);
        Field::new(BattleFormat::Single, vec![player], vec![enemy]).unwrap()
    }

    #[test]
    fn test_every_ability_has_a_registry_entry() {
        for ability in AbilityId::iter() {
            let _ = hooks(ability);
        }
    }

    #[test]
    fn test_suppression_spares_whitelist() {
        let mut pokemon = Combatant::new(SpeciesId::Zygarde, 50, &[MoveId::Tackle]);
        pokemon.ability_suppressed = true;
        assert_eq!(active_ability(&pokemon), AbilityId::PowerConstruct);

        pokemon.ability = AbilityId::Intimidate;
        assert_eq!(active_ability(&pokemon), AbilityId::None);
    }

    #[test]
    fn test_mold_breaker_is_local_to_the_attacker() {
        let field = field(AbilityId::MoldBreaker, AbilityId::Sturdy);
        let (attacker, target) = (CombatantId(0), CombatantId(1));

        assert_eq!(ability_against(&field, Some(attacker), target), AbilityId::None);
        // The target's own view and its suppression flag are untouched.
        assert_eq!(ability_against(&field, None, target), AbilityId::Sturdy);
        assert!(!field.get(target).ability_suppressed);
    }

    #[test]
    fn test_mold_breaker_ignores_unbreakable_abilities() {
        let field = field(AbilityId::MoldBreaker, AbilityId::RoughSkin);
        assert_eq!(ability_against(&field, Some(CombatantId(0)), CombatantId(1)), AbilityId::RoughSkin);
    }

    #[test]
    fn test_prankster_only_boosts_status_moves() {
        let whimsicott = Combatant::new(SpeciesId::Whimsicott, 50, &[]);
        assert_eq!(modify_priority(&whimsicott, &MoveId::ThunderWave.data()), 1);
        assert_eq!(modify_priority(&whimsicott, &MoveId::Tackle.data()), 0);
        assert_eq!(modify_priority(&whimsicott, &MoveId::Protect.data()), 5);
    }

    #[test]
    fn test_blaze_needs_a_third_of_hp() {
        let mut charizard = Combatant::new(SpeciesId::Charizard, 50, &[]);
        let flamethrower = MoveId::Flamethrower.data();
        assert_eq!(damage_multiplier(&charizard, &flamethrower), 1.0);

        let third = charizard.max_hp() / 3;
        charizard.set_hp(third);
        assert_eq!(damage_multiplier(&charizard, &flamethrower), 1.5);
        assert_eq!(damage_multiplier(&charizard, &MoveId::Tackle.data()), 1.0);
    }
}

//! The fixed end-of-turn sequence: status ticks, weather chip, then the
//! TurnEnd bookkeeping pass that counts every timer down. `TurnEnded` is
//! emitted by TurnClose, after any knockouts from that pass.

use crate::battle::abilities;
use crate::battle::combatant::{CombatantId, DamageSource};
use crate::battle::conditions::{LapseTrigger, TagKind};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::items;
use crate::battle::phases::{Phase, PhaseStatus};
use crate::battle::state::BattleEvent;
use crate::battle::stats::is_grounded;
use crate::battle::turn_order::speed_order;
use crate::errors::BattleResult;
use schema::{PokemonType, StatusEffect, TerrainType, WeatherType};
use tracing::{debug, trace};

/// Fans out into one PostTurnStatus per active combatant, the weather step
/// and TurnEnd, in that order.
pub fn end_of_turn_phase(ctx: &mut BattleContext) -> BattleResult<PhaseStatus> {
    for id in speed_order(ctx) {
        ctx.unshift(Phase::PostTurnStatus { combatant: id });
    }
    ctx.unshift(Phase::Weather);
    ctx.unshift(Phase::TurnEnd);
    Ok(PhaseStatus::Done)
}

fn is_standing(ctx: &BattleContext, id: CombatantId) -> bool {
    ctx.field.is_active(id) && !ctx.combatant(id).is_fainted()
}

pub fn post_turn_status_phase(ctx: &mut BattleContext, id: CombatantId) -> BattleResult<PhaseStatus> {
    if !is_standing(ctx, id) {
        return Ok(PhaseStatus::Done);
    }
    let combatant = ctx.combatant(id);
    let (max, status, turns) = (combatant.max_hp(), combatant.status, combatant.status_turns);
    let amount = match status {
        Some(StatusEffect::Poison) => (max / 8).max(1),
        Some(StatusEffect::Burn) => (max / 16).max(1),
        Some(StatusEffect::Toxic) => {
            let counter = (turns + 1).min(15);
            ctx.combatant_mut(id).status_turns = counter;
            (max / 16 * counter as u32).max(1)
        }
        _ => return Ok(PhaseStatus::Done),
    };
    effects::apply_damage(ctx, id, amount, DamageSource::StatusTick);
    Ok(PhaseStatus::Done)
}

fn weather_immune(weather: WeatherType, types: &[PokemonType]) -> bool {
    match weather {
        WeatherType::Sandstorm => types
            .iter()
            .any(|t| matches!(t, PokemonType::Rock | PokemonType::Ground | PokemonType::Steel)),
        WeatherType::Hail => types.contains(&PokemonType::Ice),
        _ => true,
    }
}

pub fn weather_phase(ctx: &mut BattleContext) -> BattleResult<PhaseStatus> {
    let Some(weather) = ctx.field.weather() else {
        return Ok(PhaseStatus::Done);
    };
    ctx.emit(BattleEvent::WeatherContinues { weather });
    if !weather.is_damaging() {
        return Ok(PhaseStatus::Done);
    }
    for id in speed_order(ctx) {
        if !is_standing(ctx, id) || weather_immune(weather, &ctx.combatant(id).types) {
            continue;
        }
        let amount = ctx.combatant(id).max_hp().div_ceil(16);
        effects::apply_damage(ctx, id, amount, DamageSource::Weather);
    }
    Ok(PhaseStatus::Done)
}

/// Leech Seed, binding and Salt Cure damage for one combatant.
fn tick_damaging_tags(ctx: &mut BattleContext, id: CombatantId) {
    let max = ctx.combatant(id).max_hp();

    if let Some(seeder) = ctx.combatant(id).tag(TagKind::Seeded).and_then(|t| t.source) {
        let drained = effects::apply_damage(ctx, id, (max / 8).max(1), DamageSource::LeechSeed);
        if drained > 0 && is_standing(ctx, seeder) {
            effects::heal(ctx, seeder, drained);
        }
    }

    if is_standing(ctx, id) && ctx.combatant(id).has_tag(TagKind::Bound) {
        effects::apply_damage(ctx, id, (max / 8).max(1), DamageSource::Binding);
        let expired = ctx
            .combatant_mut(id)
            .tag_mut(TagKind::Bound)
            .map_or(false, |tag| tag.tick());
        if expired {
            effects::remove_tag(ctx, id, TagKind::Bound);
        }
    }

    if is_standing(ctx, id) && ctx.combatant(id).has_tag(TagKind::SaltCure) {
        let combatant = ctx.combatant(id);
        let divisor = if combatant.has_type(PokemonType::Water) || combatant.has_type(PokemonType::Steel) {
            4
        } else {
            8
        };
        effects::apply_damage(ctx, id, (max / divisor).max(1), DamageSource::SaltCure);
    }
}

fn land_delayed_attacks(ctx: &mut BattleContext) {
    let mut landing = Vec::new();
    ctx.field.delayed_attacks.retain_mut(|attack| {
        attack.turns_remaining = attack.turns_remaining.saturating_sub(1);
        if attack.turns_remaining == 0 {
            landing.push(*attack);
            false
        } else {
            true
        }
    });

    for attack in landing {
        let occupant = ctx
            .field
            .side(attack.target_side)
            .active
            .get(attack.slot)
            .copied()
            .flatten();
        let Some(target) = occupant.filter(|id| !ctx.combatant(*id).is_fainted()) else {
            debug!(?attack, "delayed attack found an empty slot");
            continue;
        };
        ctx.emit(BattleEvent::DelayedAttackLanded {
            target,
            move_used: attack.move_id,
        });
        effects::apply_damage(ctx, target, attack.damage, DamageSource::Delayed);
    }
}

/// Counts down TurnEnd-lapse tags other than binding, which ticks with its
/// damage.
fn lapse_countdown_tags(ctx: &mut BattleContext, id: CombatantId) {
    let expired: Vec<TagKind> = ctx
        .combatant_mut(id)
        .tags
        .iter_mut()
        .filter(|tag| tag.lapse_trigger() == LapseTrigger::TurnEnd && tag.kind() != TagKind::Bound)
        .filter_map(|tag| tag.tick().then(|| tag.kind()))
        .collect();
    for kind in expired {
        effects::remove_tag(ctx, id, kind);
    }
}

fn count_down_side_conditions(ctx: &mut BattleContext) {
    for side in ctx.field.sides.iter_mut() {
        let mut ended = Vec::new();
        side.conditions.retain_mut(|tag| match tag.turns_remaining.as_mut() {
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                if *turns == 0 {
                    ended.push(tag.condition);
                    false
                } else {
                    true
                }
            }
            None => true,
        });
        let id = side.id;
        for condition in ended {
            ctx.events.push(BattleEvent::SideConditionEnded { side: id, condition });
        }
    }
}

/// Weather and terrain with zero turns left were set without a duration and
/// stay until replaced.
fn count_down_field(ctx: &mut BattleContext) {
    let weather_over = match ctx.field.weather.as_mut() {
        Some(state) if state.turns_remaining > 0 => {
            state.turns_remaining -= 1;
            state.turns_remaining == 0
        }
        _ => false,
    };
    if weather_over {
        effects::clear_weather(ctx);
    }

    let terrain_over = match ctx.field.terrain.as_mut() {
        Some(state) if state.turns_remaining > 0 => {
            state.turns_remaining -= 1;
            (state.turns_remaining == 0).then_some(state.terrain)
        }
        _ => None,
    };
    if let Some(terrain) = terrain_over {
        ctx.field.terrain = None;
        ctx.emit(BattleEvent::TerrainEnded { terrain });
    }

    if let Some(turns) = ctx.field.trick_room.as_mut() {
        *turns = turns.saturating_sub(1);
        if *turns == 0 {
            ctx.field.trick_room = None;
            ctx.emit(BattleEvent::TrickRoomEnded);
        }
    }
}

pub fn turn_end_phase(ctx: &mut BattleContext) -> BattleResult<PhaseStatus> {
    let order = speed_order(ctx);

    for &id in &order {
        if is_standing(ctx, id) {
            tick_damaging_tags(ctx, id);
        }
    }

    land_delayed_attacks(ctx);

    for &id in &order {
        if is_standing(ctx, id) {
            items::end_of_turn(ctx, id);
        }
    }
    if ctx.field.terrain() == Some(TerrainType::Grassy) {
        for &id in &order {
            if is_standing(ctx, id) && is_grounded(&ctx.field, id) {
                let amount = (ctx.combatant(id).max_hp() / 16).max(1);
                effects::heal(ctx, id, amount);
            }
        }
    }

    for &id in &order {
        if is_standing(ctx, id) {
            abilities::trigger_turn_end(ctx, id);
        }
    }

    for &id in &order {
        if is_standing(ctx, id) {
            lapse_countdown_tags(ctx, id);
        }
    }

    count_down_side_conditions(ctx);
    count_down_field(ctx);

    // Faint phases raised above run first.
    ctx.unshift(Phase::TurnClose);
    Ok(PhaseStatus::Done)
}

pub fn turn_close_phase(ctx: &mut BattleContext) -> BattleResult<PhaseStatus> {
    let turn = ctx.field.turn;
    ctx.emit(BattleEvent::TurnEnded { turn });
    ctx.field.turn += 1;
    for combatant in ctx.field.combatants.iter_mut() {
        combatant.turn_data = Default::default();
    }
    for command in ctx.commands.iter_mut() {
        *command = None;
    }
    ctx.quick_claw.clear();
    trace!(turn, "turn closed");
    ctx.push(Phase::TurnInit);
    Ok(PhaseStatus::Done)
}

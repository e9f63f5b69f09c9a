//! State mutation primitives shared by every phase. Each one applies a single
//! change, emits its event and queues follow-up phases (faints, boss boosts);
//! none of them decide turn flow.

use crate::battle::abilities::{self, hooks_against, hooks_of};
use crate::battle::boss::{self, BossHit};
use crate::battle::combatant::{AttackRecord, CombatantId, DamageSource, StageChange};
use crate::battle::conditions::{TagKind, VolatileCondition, VolatileTag};
use crate::battle::context::BattleContext;
use crate::battle::field::{TerrainState, WeatherState};
use crate::battle::phases::Phase;
use crate::battle::state::BattleEvent;
use crate::battle::stats::is_grounded;
use crate::battle::turn_order;
use schema::{BattleStat, HeldItem, MoveCategory, PokemonType, SideCondition, StatusEffect, TerrainType, WeatherType};
use tracing::debug;

/// Removes HP from `target`, honoring boss shields and lethal-hit saves, and
/// records the source. Returns the HP actually lost.
pub fn apply_damage(ctx: &mut BattleContext, target: CombatantId, amount: u32, source: DamageSource) -> u32 {
    let combatant = ctx.combatant(target);
    if combatant.is_fainted() || amount == 0 {
        return 0;
    }

    let blocked_indirect = !source.is_direct()
        && !matches!(source, DamageSource::SelfKo | DamageSource::Confusion)
        && hooks_of(combatant).blocks_indirect_damage;
    if blocked_indirect {
        debug!(%target, ?source, "indirect damage blocked");
        return 0;
    }

    let mut amount = amount;
    if let Some(segments) = combatant.boss {
        if segments.current_index > 0 {
            if source.is_direct() {
                if let BossHit::Break {
                    broken,
                    new_index,
                    hp_after,
                } = boss::resolve_hit(&segments, combatant.hp(), combatant.max_hp(), amount)
                {
                    return break_shields(ctx, target, source, segments.current_index, broken, new_index, hp_after);
                }
            } else {
                let floor = boss::band_floor(&segments, combatant.max_hp());
                amount = amount.min(combatant.hp().saturating_sub(floor));
                if amount == 0 {
                    return 0;
                }
            }
        }
    }

    let lethal = amount >= ctx.combatant(target).hp();
    if lethal && source.is_direct() {
        amount = survive_lethal_hit(ctx, target, amount, source);
    }

    let dealt = ctx.combatant_mut(target).take_damage(amount);
    finish_damage(ctx, target, dealt, source);

    if ctx.combatant(target).is_fainted() && ctx.combatant(target).item == Some(HeldItem::ReviverSeed) && source.is_direct()
    {
        revive_with_seed(ctx, target);
    }
    check_faint(ctx, target);
    dealt
}

fn break_shields(
    ctx: &mut BattleContext,
    target: CombatantId,
    source: DamageSource,
    from_index: u8,
    broken: u8,
    new_index: u8,
    hp_after: u32,
) -> u32 {
    let combatant = ctx.combatant_mut(target);
    let dealt = combatant.hp().saturating_sub(hp_after);
    combatant.set_hp(hp_after);
    if let Some(segments) = combatant.boss.as_mut() {
        segments.current_index = new_index;
    }
    finish_damage(ctx, target, dealt, source);

    ctx.emit(BattleEvent::BossSegmentsBroken {
        boss: target,
        broken,
        segments_left: new_index + 1,
    });
    let boosts = boss::pick_boosts(ctx.field.get(target), from_index, broken, &mut ctx.rng);
    for (stat, stages) in boosts {
        ctx.unshift(Phase::StatStageChange {
            target,
            source: Some(target),
            stats: vec![stat],
            stages,
        });
    }
    dealt
}

/// Endure, then Sturdy. Returns the (possibly reduced) damage.
fn survive_lethal_hit(ctx: &mut BattleContext, target: CombatantId, amount: u32, source: DamageSource) -> u32 {
    let combatant = ctx.combatant(target);
    let hp = combatant.hp();

    if combatant.has_tag(TagKind::Enduring) {
        ctx.emit(BattleEvent::Endured { target });
        return hp - 1;
    }

    let sturdy = hooks_against(&ctx.field, source.direct_attacker(), target).survives_from_full;
    if sturdy && hp > 1 && hp == combatant.max_hp() {
        let ability = combatant.ability;
        ctx.emit(BattleEvent::AbilityActivated {
            combatant: target,
            ability,
        });
        ctx.emit(BattleEvent::Endured { target });
        return hp - 1;
    }
    amount
}

fn revive_with_seed(ctx: &mut BattleContext, target: CombatantId) {
    let combatant = ctx.combatant_mut(target);
    combatant.item = None;
    let half = (combatant.max_hp() / 2).max(1);
    combatant.set_hp(half);
    // The knockout was undone; it is not a direct-hit KO.
    combatant.last_damage_source = None;

    ctx.emit(BattleEvent::ItemConsumed {
        combatant: target,
        item: HeldItem::ReviverSeed,
    });
    ctx.emit(BattleEvent::Healed {
        target,
        amount: half,
        new_hp: half,
    });
}

fn finish_damage(ctx: &mut BattleContext, target: CombatantId, dealt: u32, source: DamageSource) {
    let combatant = ctx.combatant_mut(target);
    combatant.last_damage_source = Some(source);

    if let DamageSource::DirectHit { attacker, move_id } = source {
        let category = move_id.data().category;
        combatant.turn_data.attacks_received.push(AttackRecord {
            attacker,
            move_id,
            category,
            damage: dealt,
        });
        if let Some(tag) = combatant.tag_mut(TagKind::Biding) {
            if let VolatileCondition::Biding { damage, last_attacker } = &mut tag.condition {
                *damage += dealt;
                *last_attacker = Some(attacker);
            }
        }
    }

    let remaining_hp = combatant.hp();
    ctx.emit(BattleEvent::DamageDealt {
        target,
        amount: dealt,
        remaining_hp,
        source,
    });
}

/// Queues exactly one faint phase for a combatant that reached 0 HP.
pub fn check_faint(ctx: &mut BattleContext, target: CombatantId) {
    let combatant = ctx.combatant_mut(target);
    if combatant.is_fainted() && !combatant.faint_pending {
        combatant.faint_pending = true;
        ctx.unshift(Phase::Faint { combatant: target });
    }
}

/// Restores HP, capped at the top of a boss's current band.
pub fn heal(ctx: &mut BattleContext, target: CombatantId, amount: u32) -> u32 {
    let combatant = ctx.combatant(target);
    if combatant.is_fainted() {
        return 0;
    }
    let ceiling = boss::heal_ceiling(combatant);
    let amount = amount.min(ceiling.saturating_sub(combatant.hp()));
    if amount == 0 {
        return 0;
    }

    let healed = ctx.combatant_mut(target).heal(amount);
    let new_hp = ctx.combatant(target).hp();
    ctx.emit(BattleEvent::Healed {
        target,
        amount: healed,
        new_hp,
    });
    healed
}

fn status_immunity(status: StatusEffect) -> &'static [PokemonType] {
    match status {
        StatusEffect::Paralysis => &[PokemonType::Electric],
        StatusEffect::Burn => &[PokemonType::Fire],
        StatusEffect::Freeze => &[PokemonType::Ice],
        StatusEffect::Poison | StatusEffect::Toxic => &[PokemonType::Poison, PokemonType::Steel],
        StatusEffect::Sleep => &[],
    }
}

/// Gives `target` a primary status if nothing prevents it.
pub fn try_inflict_status(
    ctx: &mut BattleContext,
    target: CombatantId,
    status: StatusEffect,
    source: Option<CombatantId>,
) -> bool {
    let combatant = ctx.combatant(target);
    if combatant.is_fainted() {
        return false;
    }
    if combatant.status.is_some() {
        ctx.emit(BattleEvent::StatusAlreadyPresent { target });
        return false;
    }
    let type_immune = status_immunity(status).iter().any(|t| combatant.has_type(*t));
    let misty = ctx.field.terrain() == Some(TerrainType::Misty) && is_grounded(&ctx.field, target);
    if type_immune || misty {
        ctx.emit(BattleEvent::StatusImmune { target, status });
        return false;
    }

    let turns = match status {
        StatusEffect::Sleep => 1 + ctx.rng.next_int(3, "sleep duration") as u8,
        _ => 0,
    };
    let combatant = ctx.combatant_mut(target);
    combatant.status = Some(status);
    combatant.status_turns = turns;
    debug!(%target, ?status, ?source, "status inflicted");
    ctx.emit(BattleEvent::StatusApplied { target, status });
    true
}

pub fn cure_status(ctx: &mut BattleContext, target: CombatantId) {
    let combatant = ctx.combatant_mut(target);
    if let Some(status) = combatant.status.take() {
        combatant.status_turns = 0;
        ctx.emit(BattleEvent::StatusCured { target, status });
    }
}

/// Moves one stat stage. Drops caused by someone else are stopped by stat-drop
/// blocking abilities unless the source breaks abilities. Returns `None` when
/// the change was blocked before reaching the stage table.
pub fn change_stat_stage(
    ctx: &mut BattleContext,
    target: CombatantId,
    source: Option<CombatantId>,
    stat: BattleStat,
    delta: i8,
) -> Option<StageChange> {
    if ctx.combatant(target).is_fainted() || delta == 0 {
        return None;
    }
    let from_other = source.is_some_and(|s| s != target);
    if delta < 0 && from_other && hooks_against(&ctx.field, source, target).blocks_stat_drops {
        let ability = ctx.combatant(target).ability;
        ctx.emit(BattleEvent::StatChangeBlocked { target, ability });
        return None;
    }

    let change = ctx.combatant_mut(target).stages.apply(stat, delta);
    match change {
        StageChange::Changed { old, new } => {
            ctx.emit(BattleEvent::StatStageChanged {
                target,
                stat,
                old_stage: old,
                new_stage: new,
            });
            if stat == BattleStat::Speed {
                turn_order::resort_pending_moves(ctx);
            }
        }
        StageChange::NoEffect { .. } => ctx.emit(BattleEvent::StatChangeNoEffect {
            target,
            stat,
            rising: delta > 0,
        }),
    }
    Some(change)
}

pub fn stat_stage_change_phase(
    ctx: &mut BattleContext,
    target: CombatantId,
    source: Option<CombatantId>,
    stats: &[BattleStat],
    stages: i8,
) {
    for stat in stats {
        change_stat_stage(ctx, target, source, *stat, stages);
    }
}

pub fn obtain_status_phase(ctx: &mut BattleContext, target: CombatantId, source: Option<CombatantId>, status: StatusEffect) {
    try_inflict_status(ctx, target, status, source);
}

/// Adds a volatile tag. Returns false when the target already has one of the
/// same kind.
pub fn add_tag(ctx: &mut BattleContext, target: CombatantId, tag: VolatileTag) -> bool {
    let kind = tag.kind();
    let combatant = ctx.combatant_mut(target);
    if combatant.is_fainted() || combatant.has_tag(kind) {
        return false;
    }
    combatant.add_tag(tag);
    ctx.emit(BattleEvent::TagAdded { target, tag: kind });
    true
}

pub fn remove_tag(ctx: &mut BattleContext, target: CombatantId, kind: TagKind) -> Option<VolatileTag> {
    let removed = ctx.combatant_mut(target).remove_tag(kind)?;
    ctx.emit(BattleEvent::TagRemoved { target, tag: kind });
    Some(removed)
}

pub fn set_weather(ctx: &mut BattleContext, weather: WeatherType, turns: u8) -> bool {
    if ctx.field.weather() == Some(weather) {
        return false;
    }
    ctx.field.weather = Some(WeatherState {
        weather,
        turns_remaining: turns,
    });
    ctx.emit(BattleEvent::WeatherStarted { weather });
    abilities::trigger_weather_change(ctx);
    true
}

pub fn clear_weather(ctx: &mut BattleContext) {
    if let Some(state) = ctx.field.weather.take() {
        ctx.emit(BattleEvent::WeatherEnded { weather: state.weather });
        abilities::trigger_weather_change(ctx);
    }
}

pub fn set_terrain(ctx: &mut BattleContext, terrain: TerrainType, turns: u8) -> bool {
    if ctx.field.terrain() == Some(terrain) {
        return false;
    }
    ctx.field.terrain = Some(TerrainState {
        terrain,
        turns_remaining: turns,
    });
    ctx.emit(BattleEvent::TerrainStarted { terrain });
    true
}

/// Damage multiplier from screens on the defender's side.
pub fn screen_multiplier(ctx: &BattleContext, target: CombatantId, category: MoveCategory) -> f64 {
    let side = ctx.field.side(ctx.field.side_of(target));
    let screened = match category {
        MoveCategory::Physical => side.has_condition(SideCondition::Reflect),
        MoveCategory::Special => side.has_condition(SideCondition::LightScreen),
        MoveCategory::Status => false,
    };
    if screened {
        0.5
    } else {
        1.0
    }
}

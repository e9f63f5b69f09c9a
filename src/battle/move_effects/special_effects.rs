use super::{EffectContext, EffectResult};
use crate::battle::conditions::{VolatileCondition, VolatileTag};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::field::SideTag;
use crate::battle::phases::Phase;
use crate::battle::state::BattleEvent;
use crate::battle::turn_order;
use schema::{MoveId, PokemonType, SideCondition, TerrainType, VolatileEffect, WeatherType};
use tracing::debug;

fn outcome(applied: bool) -> EffectResult {
    if applied {
        EffectResult::Applied
    } else {
        EffectResult::Failed
    }
}

/// Consecutive protection succeeds with probability 1/3^streak.
fn protection_holds(ctx: &mut BattleContext, context: &EffectContext) -> bool {
    let streak = ctx.combatant(context.user).protect_streak;
    if streak == 0 {
        return true;
    }
    let odds = 3u32.pow(streak.min(6) as u32);
    ctx.rng.next_int(odds, "protect streak") == 0
}

fn protect_with(ctx: &mut BattleContext, context: &EffectContext, condition: VolatileCondition) -> EffectResult {
    if !protection_holds(ctx, context) {
        ctx.combatant_mut(context.user).protect_streak = 0;
        return EffectResult::Failed;
    }
    let tag = VolatileTag::new(condition, Some(context.user), Some(1));
    let applied = effects::add_tag(ctx, context.user, tag);
    if applied {
        let user = ctx.combatant_mut(context.user);
        user.protect_streak += 1;
        user.turn_data.protected = true;
    }
    outcome(applied)
}

fn create_substitute(ctx: &mut BattleContext, context: &EffectContext) -> EffectResult {
    let user = ctx.combatant(context.user);
    let cost = user.max_hp() / 4;
    if user.boss.is_some() || user.substitute_hp().is_some() || user.hp() <= cost || cost == 0 {
        return EffectResult::Failed;
    }
    ctx.combatant_mut(context.user).take_damage(cost);
    ctx.combatant_mut(context.user).add_tag(VolatileTag::new(
        VolatileCondition::Substitute { hp: cost },
        Some(context.user),
        None,
    ));
    ctx.emit(BattleEvent::SubstituteCreated {
        target: context.user,
        hp: cost,
    });
    EffectResult::Applied
}

/// The target's last move, if it is one a lock can point at.
fn lockable_last_move(ctx: &BattleContext, context: &EffectContext) -> Option<MoveId> {
    let target = ctx.combatant(context.target);
    target
        .last_move
        .filter(|m| !m.is_fallback() && *m != context.move_id)
        .filter(|m| target.move_slot(*m).is_some_and(|slot| slot.pp > 0))
}

pub(super) fn apply_volatile_special(
    ctx: &mut BattleContext,
    context: &EffectContext,
    effect: VolatileEffect,
) -> EffectResult {
    let holder = if effect.on_user() { context.user } else { context.target };
    if ctx.combatant(holder).is_fainted() {
        return EffectResult::Skipped;
    }

    let tag = match effect {
        VolatileEffect::Substitute => return create_substitute(ctx, context),
        VolatileEffect::Protect(variant) => return protect_with(ctx, context, VolatileCondition::Protected(variant)),
        VolatileEffect::Endure => return protect_with(ctx, context, VolatileCondition::Enduring),
        VolatileEffect::LeechSeed => {
            if ctx.combatant(holder).has_type(PokemonType::Grass) {
                ctx.emit(BattleEvent::NoEffect { target: holder });
                return EffectResult::Failed;
            }
            VolatileTag::new(VolatileCondition::Seeded, Some(context.user), None)
        }
        VolatileEffect::Bind => {
            let turns = 4 + ctx.rng.next_int(2, "bind duration") as u8;
            VolatileTag::new(VolatileCondition::Bound, Some(context.user), Some(turns))
        }
        VolatileEffect::SaltCure => VolatileTag::new(VolatileCondition::SaltCure, Some(context.user), None),
        VolatileEffect::Disable => {
            let Some(pokemon_move) = lockable_last_move(ctx, context) else {
                return EffectResult::Failed;
            };
            VolatileTag::new(VolatileCondition::Disabled { pokemon_move }, Some(context.user), Some(4))
        }
        VolatileEffect::Encore => {
            let Some(pokemon_move) = lockable_last_move(ctx, context) else {
                return EffectResult::Failed;
            };
            VolatileTag::new(VolatileCondition::Encore { pokemon_move }, Some(context.user), Some(3))
        }
        VolatileEffect::Taunt => VolatileTag::new(VolatileCondition::Taunted, Some(context.user), Some(3)),
        VolatileEffect::LockOn => VolatileTag::new(
            VolatileCondition::LockedOn { target: context.target },
            Some(context.user),
            Some(2),
        ),
        VolatileEffect::FocusEnergy => VolatileTag::new(VolatileCondition::FocusEnergy, Some(context.user), None),
        VolatileEffect::Bide => {
            let tag = VolatileTag::new(
                VolatileCondition::Biding {
                    damage: 0,
                    last_attacker: None,
                },
                Some(context.user),
                Some(2),
            );
            let applied = effects::add_tag(ctx, holder, tag);
            if applied {
                ctx.emit(BattleEvent::BideStoring { user: holder });
            }
            return outcome(applied);
        }
        VolatileEffect::CenterOfAttention => {
            VolatileTag::new(VolatileCondition::CenterOfAttention, Some(context.user), Some(1))
        }
    };

    let applied = effects::add_tag(ctx, holder, tag);
    match effect {
        // A trap that is already set is not a failure of the attack itself.
        VolatileEffect::Bind | VolatileEffect::SaltCure if !applied => EffectResult::Skipped,
        _ => outcome(applied),
    }
}

pub(super) fn apply_side_condition_special(
    ctx: &mut BattleContext,
    context: &EffectContext,
    condition: SideCondition,
    on_opponent: bool,
) -> EffectResult {
    let own_side = ctx.field.side_of(context.user);
    let side = if on_opponent { own_side.opponent() } else { own_side };

    if condition.is_hazard() {
        let conditions = &mut ctx.field.side_mut(side).conditions;
        let layers = match conditions.iter().position(|t| t.condition == condition) {
            Some(index) if conditions[index].layers >= SideCondition::MAX_SPIKES_LAYERS => return EffectResult::Failed,
            Some(index) => {
                conditions[index].layers += 1;
                conditions[index].layers
            }
            None => {
                conditions.push(SideTag {
                    condition,
                    turns_remaining: None,
                    layers: 1,
                });
                1
            }
        };
        debug!(%side, layers, "hazard layer added");
        ctx.emit(BattleEvent::SideConditionAdded { side, condition });
        return EffectResult::Applied;
    }

    if ctx.field.side(side).has_condition(condition) {
        return EffectResult::Failed;
    }
    let turns = match condition {
        SideCondition::Tailwind => ctx.config.tailwind_turns,
        _ => ctx.config.screen_turns,
    };
    ctx.field.side_mut(side).conditions.push(SideTag {
        condition,
        turns_remaining: Some(turns),
        layers: 1,
    });
    ctx.emit(BattleEvent::SideConditionAdded { side, condition });
    if condition == SideCondition::Tailwind {
        turn_order::resort_pending_moves(ctx);
    }
    EffectResult::Applied
}

pub(super) fn apply_weather_special(ctx: &mut BattleContext, weather: WeatherType) -> EffectResult {
    let turns = ctx.config.weather_turns;
    outcome(effects::set_weather(ctx, weather, turns))
}

pub(super) fn apply_terrain_special(ctx: &mut BattleContext, terrain: TerrainType) -> EffectResult {
    let turns = ctx.config.terrain_turns;
    outcome(effects::set_terrain(ctx, terrain, turns))
}

/// Toggles the reversed-order flag and re-sorts moves still waiting this turn.
pub(super) fn apply_trick_room_special(ctx: &mut BattleContext) -> EffectResult {
    if ctx.field.trick_room.take().is_some() {
        ctx.emit(BattleEvent::TrickRoomEnded);
    } else {
        ctx.field.trick_room = Some(ctx.config.trick_room_turns);
        ctx.emit(BattleEvent::TrickRoomStarted);
    }
    turn_order::resort_pending_moves(ctx);
    EffectResult::Applied
}

/// Drags a random bench member in. Bosses cannot be forced out.
pub(super) fn apply_force_switch_special(ctx: &mut BattleContext, context: &EffectContext) -> EffectResult {
    let target = ctx.combatant(context.target);
    if target.boss.is_some() || target.is_fainted() {
        return EffectResult::Failed;
    }
    let side = target.side;
    let Some(slot) = ctx.field.slot_of(context.target) else {
        return EffectResult::Failed;
    };
    let bench = ctx.field.bench(side);
    if bench.is_empty() {
        return EffectResult::Failed;
    }
    let pick = ctx.rng.next_int(bench.len() as u32, "forced switch") as usize;
    let (_, incoming) = bench[pick];

    ctx.emit(BattleEvent::ForcedOut {
        combatant: context.target,
    });
    ctx.unshift(Phase::SwitchSummon {
        side,
        slot,
        incoming,
        baton_pass: false,
    });
    EffectResult::Applied
}

pub(super) fn apply_baton_pass_special(ctx: &mut BattleContext, context: &EffectContext) -> EffectResult {
    let side = ctx.field.side_of(context.user);
    let Some(slot) = ctx.field.slot_of(context.user) else {
        return EffectResult::Failed;
    };
    if ctx.field.bench(side).is_empty() {
        return EffectResult::Failed;
    }
    ctx.unshift(Phase::PartySwitch {
        side,
        slot,
        outgoing: context.user,
        baton_pass: true,
    });
    EffectResult::Applied
}

/// Moves the target's pending move to run next.
pub(super) fn apply_after_you_special(ctx: &mut BattleContext, context: &EffectContext) -> EffectResult {
    if context.target == context.user {
        return EffectResult::Failed;
    }
    outcome(ctx.queue.promote_move(context.target))
}

pub(super) fn apply_suppress_ability_special(ctx: &mut BattleContext, context: &EffectContext) -> EffectResult {
    let target = ctx.combatant(context.target);
    if target.ability.is_unsuppressable() || target.ability_suppressed {
        return EffectResult::Failed;
    }
    ctx.combatant_mut(context.target).ability_suppressed = true;
    ctx.emit(BattleEvent::AbilitySuppressed {
        target: context.target,
    });
    EffectResult::Applied
}

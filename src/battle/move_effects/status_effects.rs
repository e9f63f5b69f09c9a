use super::{EffectContext, EffectResult};
use crate::battle::conditions::{VolatileCondition, VolatileTag};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::phases::Phase;
use schema::StatusEffect;

pub(super) fn apply_status_effect(
    ctx: &mut BattleContext,
    context: &EffectContext,
    status: StatusEffect,
    chance: u8,
) -> EffectResult {
    if ctx.combatant(context.target).is_fainted() {
        return EffectResult::Skipped;
    }
    if !ctx.rng.chance(chance, "status effect") {
        return EffectResult::Skipped;
    }
    ctx.unshift(Phase::ObtainStatus {
        target: context.target,
        source: Some(context.user),
        status,
    });
    EffectResult::Applied
}

/// Only lands on a target that has not acted yet this turn.
pub(super) fn apply_flinch_effect(ctx: &mut BattleContext, context: &EffectContext, chance: u8) -> EffectResult {
    let target = ctx.combatant(context.target);
    if target.is_fainted() || target.turn_data.acted {
        return EffectResult::Skipped;
    }
    if !ctx.rng.chance(chance, "flinch") {
        return EffectResult::Skipped;
    }
    let tag = VolatileTag::new(VolatileCondition::Flinched, Some(context.user), Some(1));
    if effects::add_tag(ctx, context.target, tag) {
        EffectResult::Applied
    } else {
        EffectResult::Failed
    }
}

pub(super) fn apply_confuse_effect(ctx: &mut BattleContext, context: &EffectContext, chance: u8) -> EffectResult {
    if ctx.combatant(context.target).is_fainted() {
        return EffectResult::Skipped;
    }
    if !ctx.rng.chance(chance, "confusion") {
        return EffectResult::Skipped;
    }
    let turns = 2 + ctx.rng.next_int(4, "confusion duration") as u8;
    let tag = VolatileTag::new(VolatileCondition::Confused, Some(context.user), Some(turns));
    if effects::add_tag(ctx, context.target, tag) {
        EffectResult::Applied
    } else {
        EffectResult::Failed
    }
}

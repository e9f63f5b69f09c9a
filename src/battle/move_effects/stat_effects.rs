use super::{EffectContext, EffectResult};
use crate::battle::context::BattleContext;
use crate::battle::phases::Phase;
use schema::{BattleStat, EffectTarget};

pub(super) fn apply_stat_change_effect(
    ctx: &mut BattleContext,
    context: &EffectContext,
    target: EffectTarget,
    stat: BattleStat,
    stages: i8,
    chance: u8,
) -> EffectResult {
    let id = context.target_of(target);
    if ctx.combatant(id).is_fainted() {
        return EffectResult::Skipped;
    }
    if !ctx.rng.chance(chance, "stat change") {
        return EffectResult::Skipped;
    }
    ctx.unshift(Phase::StatStageChange {
        target: id,
        source: Some(context.user),
        stats: vec![stat],
        stages,
    });
    EffectResult::Applied
}

// Interpreters for the composable `MoveEffect` descriptors. Each descriptor is
// applied on its own, with its own chance roll.

mod damage_effects;
mod special_effects;
mod stat_effects;
mod status_effects;

use crate::battle::combatant::CombatantId;
use crate::battle::context::BattleContext;
use schema::{EffectTarget, MoveData, MoveEffect, MoveId};

use self::{damage_effects::*, special_effects::*, stat_effects::*, status_effects::*};

pub use self::damage_effects::{counter_damage, queue_delayed_attack};

/// One user/target pairing a move's effects are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectContext {
    pub user: CombatantId,
    pub target: CombatantId,
    pub move_id: MoveId,
}

impl EffectContext {
    pub fn new(user: CombatantId, target: CombatantId, move_id: MoveId) -> Self {
        Self { user, target, move_id }
    }

    pub fn target_of(&self, target: EffectTarget) -> CombatantId {
        match target {
            EffectTarget::User => self.user,
            EffectTarget::Target => self.target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectResult {
    /// The effect did something (or queued a phase that will).
    Applied,
    /// The effect was attempted and could not take hold.
    Failed,
    /// Not this effect's moment: a lost chance roll, or an effect resolved
    /// elsewhere in the pipeline.
    Skipped,
}

pub trait BattleMoveEffectExt {
    /// Applies the effect against one landed target. Called once per hit for
    /// damaging moves and once per target for status moves.
    fn apply(&self, ctx: &mut BattleContext, context: &EffectContext) -> EffectResult;
}

pub trait BattleMoveDataExt {
    /// Effects that read the move's total damage, applied once after the last
    /// hit: recoil, drain, self-destruction.
    fn apply_damage_based_effects(&self, ctx: &mut BattleContext, user: CombatantId, damage_dealt: u32);

    /// Applies every effect against one target and reports whether anything
    /// took hold.
    fn apply_effects(&self, ctx: &mut BattleContext, context: &EffectContext) -> bool;
}

impl BattleMoveEffectExt for MoveEffect {
    fn apply(&self, ctx: &mut BattleContext, context: &EffectContext) -> EffectResult {
        match *self {
            MoveEffect::InflictStatus { status, chance } => apply_status_effect(ctx, context, status, chance),
            MoveEffect::Flinch { chance } => apply_flinch_effect(ctx, context, chance),
            MoveEffect::Confuse { chance } => apply_confuse_effect(ctx, context, chance),
            MoveEffect::StatChange {
                target,
                stat,
                stages,
                chance,
            } => apply_stat_change_effect(ctx, context, target, stat, stages, chance),
            MoveEffect::Heal { percent } => apply_heal_effect(ctx, context, percent),
            MoveEffect::Volatile(effect) => apply_volatile_special(ctx, context, effect),
            MoveEffect::SetSideCondition { condition, on_opponent } => {
                apply_side_condition_special(ctx, context, condition, on_opponent)
            }
            MoveEffect::SetWeather(weather) => apply_weather_special(ctx, weather),
            MoveEffect::SetTerrain(terrain) => apply_terrain_special(ctx, terrain),
            MoveEffect::TrickRoom => apply_trick_room_special(ctx),
            MoveEffect::ForceSwitch => apply_force_switch_special(ctx, context),
            MoveEffect::BatonPass => apply_baton_pass_special(ctx, context),
            MoveEffect::AfterYou => apply_after_you_special(ctx, context),
            MoveEffect::SuppressAbility => apply_suppress_ability_special(ctx, context),
            // Resolved by the damage step or after the last hit.
            MoveEffect::Recoil { .. }
            | MoveEffect::RecoilMaxHp { .. }
            | MoveEffect::Drain { .. }
            | MoveEffect::SelfKo
            | MoveEffect::DelayedAttack { .. }
            | MoveEffect::CounterDamage { .. } => EffectResult::Skipped,
        }
    }
}

impl BattleMoveDataExt for MoveData {
    fn apply_damage_based_effects(&self, ctx: &mut BattleContext, user: CombatantId, damage_dealt: u32) {
        for effect in self.effects {
            match *effect {
                MoveEffect::Recoil { percent } => apply_recoil_effect(ctx, user, damage_dealt, percent),
                MoveEffect::RecoilMaxHp { percent } => apply_max_hp_recoil_effect(ctx, user, damage_dealt, percent),
                MoveEffect::Drain { percent } => apply_drain_effect(ctx, user, damage_dealt, percent),
                _ => {}
            }
        }
    }

    fn apply_effects(&self, ctx: &mut BattleContext, context: &EffectContext) -> bool {
        let mut applied = false;
        for effect in self.effects {
            if effect.apply(ctx, context) == EffectResult::Applied {
                applied = true;
            }
        }
        applied
    }
}

/// Self-destructing moves take the user down whether or not they connected.
pub fn self_destructs(move_data: &MoveData) -> bool {
    move_data.effects.iter().any(|e| matches!(e, MoveEffect::SelfKo))
}

pub fn apply_self_ko(ctx: &mut BattleContext, user: CombatantId) {
    apply_self_ko_effect(ctx, user);
}

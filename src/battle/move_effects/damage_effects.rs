use super::{EffectContext, EffectResult};
use crate::battle::combatant::{CombatantId, DamageSource};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::field::DelayedAttack;
use crate::battle::state::BattleEvent;
use schema::{MoveCategory, MoveId};

fn percent_of(value: u32, percent: u8) -> u32 {
    (value * percent as u32 / 100).max(1)
}

pub(super) fn apply_heal_effect(ctx: &mut BattleContext, context: &EffectContext, percent: u8) -> EffectResult {
    let amount = percent_of(ctx.combatant(context.user).max_hp(), percent);
    if effects::heal(ctx, context.user, amount) > 0 {
        EffectResult::Applied
    } else {
        EffectResult::Failed
    }
}

pub(super) fn apply_recoil_effect(ctx: &mut BattleContext, user: CombatantId, damage_dealt: u32, percent: u8) {
    if damage_dealt == 0 {
        return;
    }
    effects::apply_damage(ctx, user, percent_of(damage_dealt, percent), DamageSource::Recoil);
}

/// Recoil sized by the user's own max HP (the fallback move).
pub(super) fn apply_max_hp_recoil_effect(ctx: &mut BattleContext, user: CombatantId, damage_dealt: u32, percent: u8) {
    if damage_dealt == 0 {
        return;
    }
    let amount = percent_of(ctx.combatant(user).max_hp(), percent);
    effects::apply_damage(ctx, user, amount, DamageSource::Recoil);
}

pub(super) fn apply_drain_effect(ctx: &mut BattleContext, user: CombatantId, damage_dealt: u32, percent: u8) {
    if damage_dealt == 0 {
        return;
    }
    effects::heal(ctx, user, percent_of(damage_dealt, percent));
}

pub(super) fn apply_self_ko_effect(ctx: &mut BattleContext, user: CombatantId) {
    let hp = ctx.combatant(user).hp();
    if hp > 0 {
        effects::apply_damage(ctx, user, hp, DamageSource::SelfKo);
    }
}

/// Damage a Counter-style move returns: the last physical hit `attacker`
/// landed on `user` this turn, multiplied.
pub fn counter_damage(ctx: &BattleContext, user: CombatantId, attacker: CombatantId, multiplier: u8) -> Option<u32> {
    ctx.combatant(user)
        .turn_data
        .attacks_received
        .iter()
        .rev()
        .find(|record| record.attacker == attacker && record.category == MoveCategory::Physical)
        .map(|record| (record.damage * multiplier as u32).max(1))
}

/// Stores an attack against `target`'s slot. Fails while that slot already
/// has one pending.
pub fn queue_delayed_attack(
    ctx: &mut BattleContext,
    user: CombatantId,
    target: CombatantId,
    move_id: MoveId,
    turns: u8,
    damage: u32,
) -> bool {
    let target_side = ctx.field.side_of(target);
    let Some(slot) = ctx.field.slot_of(target) else {
        return false;
    };
    let occupied = ctx
        .field
        .delayed_attacks
        .iter()
        .any(|attack| attack.target_side == target_side && attack.slot == slot);
    if occupied {
        return false;
    }
    ctx.field.delayed_attacks.push(DelayedAttack {
        source: user,
        move_id,
        target_side,
        slot,
        turns_remaining: turns,
        damage,
    });
    ctx.emit(BattleEvent::DelayedAttackQueued { user, move_used: move_id });
    true
}

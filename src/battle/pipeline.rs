//! Move execution.
//!
//! A declared move runs as three phases: `Move` (can it be used at all, PP,
//! targeting), one `MoveEffect` per hit, and a closing `MoveEnd` for effects
//! that read the total damage. Anything raised along the way (faints, stat
//! changes, statuses) is unshifted and runs between them.

use crate::battle::abilities::{self, absorbs, hooks_against, hooks_of};
use crate::battle::calculators::{calculate_damage, confusion_damage, type_effectiveness};
use crate::battle::combatant::{Combatant, CombatantId, DamageSource};
use crate::battle::conditions::{TagKind, VolatileCondition, VolatileTag};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::items;
use crate::battle::move_effects::{
    apply_self_ko, counter_damage, queue_delayed_attack, self_destructs, BattleMoveDataExt, EffectContext,
};
use crate::battle::phases::{Phase, PhaseStatus};
use crate::battle::state::{ActionFailureReason, BattleEvent};
use crate::battle::stats::hit_threshold;
use crate::errors::BattleResult;
use schema::{
    BattleStat, HitCount, MoveCategory, MoveData, MoveEffect, MoveFlags, MoveId, MoveTarget, ProtectVariant,
    StatusEffect, VolatileEffect,
};
use tracing::{debug, info};

fn fail(ctx: &mut BattleContext, user: CombatantId, move_id: MoveId, reason: ActionFailureReason) {
    debug!(%user, %move_id, ?reason, "move failed");
    ctx.emit(BattleEvent::MoveFailed {
        user,
        move_used: move_id,
        reason,
    });
}

fn counter_multiplier(move_data: &MoveData) -> Option<u8> {
    move_data.effects.iter().find_map(|e| match e {
        MoveEffect::CounterDamage { multiplier } => Some(*multiplier),
        _ => None,
    })
}

fn delayed_turns(move_data: &MoveData) -> Option<u8> {
    move_data.effects.iter().find_map(|e| match e {
        MoveEffect::DelayedAttack { turns } => Some(*turns),
        _ => None,
    })
}

/// Whether the move goes through the damage step. Power-0 "physical" moves
/// like Bide resolve through their effects instead.
fn deals_damage(move_data: &MoveData) -> bool {
    move_data.is_damaging() && (move_data.power > 0 || counter_multiplier(move_data).is_some())
}

fn is_protection(move_data: &MoveData) -> bool {
    move_data.effects.iter().any(|e| {
        matches!(
            e,
            MoveEffect::Volatile(VolatileEffect::Protect(_)) | MoveEffect::Volatile(VolatileEffect::Endure)
        )
    })
}

fn bypasses_substitute(move_data: &MoveData) -> bool {
    move_data.is_sound() || move_data.flags.contains(MoveFlags::IGNORE_SUBSTITUTE)
}

fn can_be_hit(ctx: &BattleContext, id: CombatantId) -> bool {
    ctx.field.is_active(id) && !ctx.combatant(id).is_fainted()
}

// ============================================================================
// Move phase
// ============================================================================

pub fn move_phase(
    ctx: &mut BattleContext,
    user: CombatantId,
    move_id: MoveId,
    declared_target: Option<CombatantId>,
) -> BattleResult<PhaseStatus> {
    let combatant = ctx.field.try_get(user)?;
    if combatant.is_fainted() || !ctx.field.is_active(user) {
        return Ok(PhaseStatus::Done);
    }
    ctx.combatant_mut(user).turn_data.acted = true;

    if ctx.combatant_mut(user).remove_tag(TagKind::Recharging).is_some() {
        ctx.emit(BattleEvent::MustRecharge { user });
        return Ok(PhaseStatus::Done);
    }

    let biding = ctx.combatant(user).has_tag(TagKind::Biding);
    if !biding {
        if let Some(reason) = restriction(ctx.combatant(user), move_id) {
            fail(ctx, user, move_id, reason);
            return Ok(PhaseStatus::Done);
        }
    }

    if !passes_status_checks(ctx, user) {
        return Ok(PhaseStatus::Done);
    }
    if biding {
        continue_bide(ctx, user);
        return Ok(PhaseStatus::Done);
    }

    let move_data = move_id.data();
    spend_pp(ctx, user, move_id, &move_data);
    let combatant = ctx.combatant_mut(user);
    combatant.last_move = Some(move_id);
    combatant.turn_data.damage_dealt = 0;
    combatant.turn_data.hit_count = 0;
    combatant.turn_data.hits_left = 0;
    if !is_protection(&move_data) {
        combatant.protect_streak = 0;
    }

    info!(turn = ctx.field.turn, %user, %move_id, "move used");
    ctx.emit(BattleEvent::MoveUsed { user, move_used: move_id });
    abilities::trigger_before_move(ctx, user, &move_data);

    let targets = resolve_targets(ctx, user, &move_data, declared_target);
    if targets.is_empty() {
        let reason = match move_data.target {
            MoveTarget::Attacker => ActionFailureReason::ButItFailed,
            _ => ActionFailureReason::NoTarget,
        };
        fail(ctx, user, move_id, reason);
        if self_destructs(&move_data) {
            ctx.unshift(Phase::MoveEnd { user, move_id });
        }
        return Ok(PhaseStatus::Done);
    }

    ctx.unshift(Phase::MoveEffect {
        user,
        move_id,
        targets,
        first_hit: true,
    });
    Ok(PhaseStatus::Done)
}

/// Restrictions re-checked at execution time; a faster foe may have changed
/// things since the command was accepted. Failing here costs no PP.
fn restriction(combatant: &Combatant, move_id: MoveId) -> Option<ActionFailureReason> {
    if move_id.is_fallback() {
        return None;
    }
    if combatant.disabled_move() == Some(move_id) {
        return Some(ActionFailureReason::Disabled);
    }
    if combatant.encored_move().is_some_and(|locked| locked != move_id) {
        return Some(ActionFailureReason::EncoreLocked);
    }
    if combatant.has_tag(TagKind::Taunted) && move_id.data().category == MoveCategory::Status {
        return Some(ActionFailureReason::Taunted);
    }
    match combatant.move_slot(move_id) {
        Some(slot) if slot.pp == 0 => Some(ActionFailureReason::NoPp),
        _ => None,
    }
}

/// Sleep, freeze, flinch, confusion, paralysis, in that order. Returns false
/// when the combatant loses its action.
fn passes_status_checks(ctx: &mut BattleContext, user: CombatantId) -> bool {
    match ctx.combatant(user).status {
        Some(StatusEffect::Sleep) => {
            let combatant = ctx.combatant_mut(user);
            if combatant.status_turns == 0 {
                combatant.status = None;
                ctx.emit(BattleEvent::WokeUp { combatant: user });
            } else {
                combatant.status_turns -= 1;
                ctx.emit(BattleEvent::FastAsleep { combatant: user });
                return false;
            }
        }
        Some(StatusEffect::Freeze) => {
            if ctx.rng.next_int(5, "thaw") == 0 {
                ctx.combatant_mut(user).status = None;
                ctx.emit(BattleEvent::Thawed { combatant: user });
            } else {
                ctx.emit(BattleEvent::Frozen { combatant: user });
                return false;
            }
        }
        _ => {}
    }

    if ctx.combatant_mut(user).remove_tag(TagKind::Flinched).is_some() {
        ctx.emit(BattleEvent::Flinched { combatant: user });
        return false;
    }

    let confusion_over = ctx.combatant_mut(user).tag_mut(TagKind::Confused).map(|tag| tag.tick());
    match confusion_over {
        Some(true) => {
            effects::remove_tag(ctx, user, TagKind::Confused);
        }
        Some(false) => {
            ctx.emit(BattleEvent::IsConfused { combatant: user });
            if ctx.rng.next_int(3, "confusion self-hit") == 0 {
                let damage = confusion_damage(ctx, user);
                ctx.emit(BattleEvent::HurtByConfusion { combatant: user });
                effects::apply_damage(ctx, user, damage, DamageSource::Confusion);
                return false;
            }
        }
        None => {}
    }

    if ctx.combatant(user).status == Some(StatusEffect::Paralysis) && ctx.rng.next_int(4, "full paralysis") == 0 {
        ctx.emit(BattleEvent::FullyParalyzed { combatant: user });
        return false;
    }
    true
}

/// Later turns of Bide: store, then release twice the stored damage on the
/// last attacker.
fn continue_bide(ctx: &mut BattleContext, user: CombatantId) {
    let expired = ctx
        .combatant_mut(user)
        .tag_mut(TagKind::Biding)
        .map_or(true, |tag| tag.tick());
    if !expired {
        ctx.emit(BattleEvent::BideStoring { user });
        return;
    }

    let (stored, attacker) = match effects::remove_tag(ctx, user, TagKind::Biding).map(|t| t.condition) {
        Some(VolatileCondition::Biding { damage, last_attacker }) => (damage, last_attacker),
        _ => (0, None),
    };
    ctx.combatant_mut(user).last_move = Some(MoveId::Bide);
    ctx.emit(BattleEvent::MoveUsed {
        user,
        move_used: MoveId::Bide,
    });

    match attacker.filter(|a| can_be_hit(ctx, *a)) {
        Some(target) if stored > 0 => {
            let source = DamageSource::DirectHit {
                attacker: user,
                move_id: MoveId::Bide,
            };
            effects::apply_damage(ctx, target, stored * 2, source);
        }
        _ => fail(ctx, user, MoveId::Bide, ActionFailureReason::ButItFailed),
    }
}

/// One PP, plus one per opponent with a PP-draining ability when the move is
/// aimed at the other side.
fn spend_pp(ctx: &mut BattleContext, user: CombatantId, move_id: MoveId, move_data: &MoveData) {
    if move_id.is_fallback() {
        return;
    }
    let aimed_at_foes = !matches!(
        move_data.target,
        MoveTarget::User | MoveTarget::UserSide | MoveTarget::Field
    );
    let drain: u8 = if aimed_at_foes {
        ctx.field
            .opponents_of(user)
            .into_iter()
            .map(|id| hooks_of(ctx.combatant(id)).extra_pp_drain)
            .sum()
    } else {
        0
    };
    if let Some(slot) = ctx.combatant_mut(user).move_slot_mut(move_id) {
        slot.pp = slot.pp.saturating_sub(1 + drain);
    }
}

// ============================================================================
// Targeting
// ============================================================================

fn resolve_targets(
    ctx: &mut BattleContext,
    user: CombatantId,
    move_data: &MoveData,
    declared: Option<CombatantId>,
) -> Vec<CombatantId> {
    match move_data.target {
        MoveTarget::User | MoveTarget::UserSide | MoveTarget::OpponentSide | MoveTarget::Field => vec![user],
        MoveTarget::AllOpponents => ctx.field.opponents_of(user),
        MoveTarget::AllOthers => ctx.field.active_ids().into_iter().filter(|id| *id != user).collect(),
        MoveTarget::Attacker => ctx
            .combatant(user)
            .turn_data
            .attacks_received
            .iter()
            .rev()
            .find(|r| r.category == MoveCategory::Physical && ctx.field.side_of(r.attacker) != ctx.field.side_of(user))
            .map(|r| r.attacker)
            .filter(|a| can_be_hit(ctx, *a))
            .into_iter()
            .collect(),
        MoveTarget::SelectedOpponent | MoveTarget::AnyOther => {
            let allies_allowed = move_data.target == MoveTarget::AnyOther;
            let user_side = ctx.field.side_of(user);
            let valid = |id: &CombatantId| {
                *id != user && can_be_hit(ctx, *id) && (allies_allowed || ctx.field.side_of(*id) != user_side)
            };
            let initial = declared
                .filter(valid)
                .or_else(|| ctx.field.opponents_of(user).into_iter().next());
            match initial {
                Some(target) => vec![redirect(ctx, user, move_data, target)],
                None => Vec::new(),
            }
        }
    }
}

/// Center-of-attention tags first, then type-drawing abilities.
fn redirect(ctx: &mut BattleContext, user: CombatantId, move_data: &MoveData, target: CombatantId) -> CombatantId {
    if move_data.flags.contains(MoveFlags::BYPASS_REDIRECT) || hooks_of(ctx.combatant(user)).ignores_redirection {
        return target;
    }

    let spotlight = ctx
        .field
        .opponents_of(user)
        .into_iter()
        .find(|id| ctx.combatant(*id).has_tag(TagKind::CenterOfAttention));
    let drawn = || {
        if absorbs(&ctx.field, user, target, move_data.move_type) {
            return None;
        }
        ctx.field
            .active_ids()
            .into_iter()
            .find(|id| *id != user && absorbs(&ctx.field, user, *id, move_data.move_type))
    };

    let Some(new_target) = spotlight.or_else(drawn).filter(|id| *id != target) else {
        return target;
    };
    ctx.emit(BattleEvent::MoveRedirected {
        user,
        from: target,
        to: new_target,
    });
    new_target
}

// ============================================================================
// Hits
// ============================================================================

fn roll_hit_count(ctx: &mut BattleContext, user: CombatantId, move_data: &MoveData) -> u8 {
    if delayed_turns(move_data).is_some() {
        return 1;
    }
    let base = match move_data.hits {
        HitCount::Single => 1,
        HitCount::Fixed(n) => n,
        HitCount::TwoToFive if hooks_of(ctx.combatant(user)).max_multi_hit => 5,
        HitCount::TwoToFive => match ctx.rng.next_int(16, "hit count") {
            r if r >= 10 => 2,
            r if r >= 4 => 3,
            r if r >= 2 => 4,
            _ => 5,
        },
    };
    base + items::extra_hits(ctx.combatant(user), move_data)
}

fn accuracy_check(ctx: &mut BattleContext, user: CombatantId, target: CombatantId, move_data: &MoveData) -> bool {
    let Some(accuracy) = move_data.accuracy else {
        return true;
    };
    if hooks_of(ctx.combatant(user)).always_hits || hooks_of(ctx.combatant(target)).always_hits {
        return true;
    }
    let locked_on = matches!(
        ctx.combatant(user).tag(TagKind::LockedOn).map(|t| &t.condition),
        Some(VolatileCondition::LockedOn { target: locked }) if *locked == target
    );
    if locked_on {
        effects::remove_tag(ctx, user, TagKind::LockedOn);
        return true;
    }
    let threshold = hit_threshold(&ctx.field, user, target, accuracy);
    ctx.rng.next_outcome("accuracy") <= threshold
}

fn protection_of(ctx: &BattleContext, target: CombatantId) -> Option<ProtectVariant> {
    match ctx.combatant(target).tag(TagKind::Protected).map(|t| &t.condition) {
        Some(VolatileCondition::Protected(variant)) => Some(*variant),
        _ => None,
    }
}

fn punish_contact(ctx: &mut BattleContext, user: CombatantId, protector: CombatantId, variant: ProtectVariant) {
    match variant {
        ProtectVariant::Protect => {}
        ProtectVariant::SpikyShield => {
            let amount = (ctx.combatant(user).max_hp() / 8).max(1);
            effects::apply_damage(ctx, user, amount, DamageSource::Contact);
        }
        ProtectVariant::BanefulBunker => {
            effects::try_inflict_status(ctx, user, StatusEffect::Poison, Some(protector));
        }
    }
}

/// First-hit checks per target: protection, accuracy, immunities, absorbing
/// abilities and substitutes blocking status moves. Returns who is hit.
fn land_targets(
    ctx: &mut BattleContext,
    user: CombatantId,
    move_id: MoveId,
    move_data: &MoveData,
    targets: &[CombatantId],
) -> Vec<CombatantId> {
    let damaging = deals_damage(move_data);
    let mut landed = Vec::with_capacity(targets.len());

    for &target in targets {
        if !can_be_hit(ctx, target) {
            continue;
        }
        if target == user {
            landed.push(target);
            continue;
        }

        if let Some(variant) = protection_of(ctx, target) {
            if !move_data.flags.contains(MoveFlags::IGNORE_PROTECT) {
                ctx.emit(BattleEvent::Protected { target });
                if move_data.makes_contact() {
                    punish_contact(ctx, user, target, variant);
                }
                continue;
            }
        }

        if !accuracy_check(ctx, user, target, move_data) {
            ctx.emit(BattleEvent::MoveMissed { user, target });
            continue;
        }

        if damaging && type_effectiveness(ctx, move_data.move_type, target) == 0.0 {
            ctx.emit(BattleEvent::NoEffect { target });
            continue;
        }
        if damaging && hooks_against(&ctx.field, Some(user), target).immune_to == Some(move_data.move_type) {
            let ability = ctx.combatant(target).ability;
            ctx.emit(BattleEvent::AbilityActivated {
                combatant: target,
                ability,
            });
            ctx.emit(BattleEvent::NoEffect { target });
            continue;
        }
        if absorbs(&ctx.field, user, target, move_data.move_type) {
            let ability = ctx.combatant(target).ability;
            ctx.emit(BattleEvent::AbilityActivated {
                combatant: target,
                ability,
            });
            effects::change_stat_stage(ctx, target, Some(target), BattleStat::SpecialAttack, 1);
            continue;
        }

        if !damaging && ctx.combatant(target).substitute_hp().is_some() && !bypasses_substitute(move_data) {
            fail(ctx, user, move_id, ActionFailureReason::ButItFailed);
            continue;
        }
        landed.push(target);
    }
    landed
}

/// Soaks a hit into the target's substitute. The doll breaks, and its tag is
/// removed, in the same step that takes it to zero.
fn hit_substitute(ctx: &mut BattleContext, target: CombatantId, damage: u32) -> u32 {
    let Some(sub_hp) = ctx.combatant(target).substitute_hp() else {
        return 0;
    };
    if damage >= sub_hp {
        ctx.combatant_mut(target).remove_tag(TagKind::Substitute);
        ctx.emit(BattleEvent::SubstituteDamaged { target, amount: sub_hp });
        ctx.emit(BattleEvent::SubstituteFaded { target });
        return sub_hp;
    }
    if let Some(tag) = ctx.combatant_mut(target).tag_mut(TagKind::Substitute) {
        if let VolatileCondition::Substitute { hp } = &mut tag.condition {
            *hp -= damage;
        }
    }
    ctx.emit(BattleEvent::SubstituteDamaged { target, amount: damage });
    damage
}

fn hit_target(
    ctx: &mut BattleContext,
    user: CombatantId,
    target: CombatantId,
    move_id: MoveId,
    move_data: &MoveData,
    spread: bool,
    first_hit: bool,
) {
    let (damage, critical, effectiveness) = match counter_multiplier(move_data) {
        Some(multiplier) => match counter_damage(ctx, user, target, multiplier) {
            Some(damage) => (damage, false, 1.0),
            None => {
                fail(ctx, user, move_id, ActionFailureReason::ButItFailed);
                return;
            }
        },
        None => {
            let roll = calculate_damage(ctx, user, target, move_data, spread);
            (roll.damage, roll.critical, roll.effectiveness)
        }
    };

    if let Some(turns) = delayed_turns(move_data) {
        if !queue_delayed_attack(ctx, user, target, move_id, turns, damage) {
            fail(ctx, user, move_id, ActionFailureReason::ButItFailed);
        }
        return;
    }

    if target != user && ctx.combatant(target).substitute_hp().is_some() && !bypasses_substitute(move_data) {
        let soaked = hit_substitute(ctx, target, damage);
        ctx.combatant_mut(user).turn_data.damage_dealt += soaked;
        return;
    }

    let source = DamageSource::DirectHit {
        attacker: user,
        move_id,
    };
    let dealt = effects::apply_damage(ctx, target, damage, source);
    ctx.combatant_mut(user).turn_data.damage_dealt += dealt;
    if critical {
        ctx.emit(BattleEvent::CriticalHit { target });
    }
    if first_hit && effectiveness != 1.0 {
        ctx.emit(BattleEvent::Effectiveness {
            target,
            multiplier: effectiveness,
        });
    }

    let context = EffectContext::new(user, target, move_id);
    move_data.apply_effects(ctx, &context);

    let contact = move_data.makes_contact();
    abilities::trigger_being_hit(ctx, target, user, contact);
    if contact {
        items::on_contact(ctx, target, user);
    }
}

pub fn move_effect_phase(
    ctx: &mut BattleContext,
    user: CombatantId,
    move_id: MoveId,
    targets: &[CombatantId],
    first_hit: bool,
) -> BattleResult<PhaseStatus> {
    let move_data = move_id.data();
    if ctx.combatant(user).is_fainted() {
        ctx.unshift(Phase::MoveEnd { user, move_id });
        return Ok(PhaseStatus::Done);
    }

    let landed = if first_hit {
        let hits = roll_hit_count(ctx, user, &move_data);
        ctx.combatant_mut(user).turn_data.hits_left = hits;
        land_targets(ctx, user, move_id, &move_data, targets)
    } else if move_data.flags.contains(MoveFlags::CHECK_ALL_HITS) {
        let mut landed = Vec::new();
        for &target in targets {
            if can_be_hit(ctx, target) && accuracy_check(ctx, user, target, &move_data) {
                landed.push(target);
            } else if can_be_hit(ctx, target) {
                ctx.emit(BattleEvent::MoveMissed { user, target });
            }
        }
        landed
    } else {
        targets.iter().copied().filter(|t| can_be_hit(ctx, *t)).collect()
    };

    if landed.is_empty() {
        close_move(ctx, user, move_id);
        return Ok(PhaseStatus::Done);
    }

    if !deals_damage(&move_data) {
        for &target in &landed {
            let context = EffectContext::new(user, target, move_id);
            if !move_data.apply_effects(ctx, &context) {
                fail(ctx, user, move_id, ActionFailureReason::ButItFailed);
            }
        }
        ctx.combatant_mut(user).turn_data.hit_count = 1;
        ctx.unshift(Phase::MoveEnd { user, move_id });
        return Ok(PhaseStatus::Done);
    }

    let spread = first_hit && move_data.target.is_spread() && targets.len() > 1;
    for &target in &landed {
        hit_target(ctx, user, target, move_id, &move_data, spread, first_hit);
    }

    let turn_data = &mut ctx.combatant_mut(user).turn_data;
    turn_data.hit_count += 1;
    turn_data.hits_left = turn_data.hits_left.saturating_sub(1);
    let hits_left = turn_data.hits_left;

    let remaining: Vec<CombatantId> = landed.into_iter().filter(|t| can_be_hit(ctx, *t)).collect();
    if hits_left > 0 && !ctx.combatant(user).is_fainted() && !remaining.is_empty() {
        ctx.unshift(Phase::MoveEffect {
            user,
            move_id,
            targets: remaining,
            first_hit: false,
        });
    } else {
        close_move(ctx, user, move_id);
    }
    Ok(PhaseStatus::Done)
}

fn close_move(ctx: &mut BattleContext, user: CombatantId, move_id: MoveId) {
    let hits = ctx.combatant(user).turn_data.hit_count;
    if hits > 1 {
        ctx.emit(BattleEvent::HitCount { hits });
    }
    ctx.unshift(Phase::MoveEnd { user, move_id });
}

/// After the last hit: recoil, drain, item recoil, recharge, self-KO.
pub fn move_end_phase(ctx: &mut BattleContext, user: CombatantId, move_id: MoveId) -> BattleResult<PhaseStatus> {
    let move_data = move_id.data();
    let turn_data = &ctx.combatant(user).turn_data;
    let (damage_dealt, connected) = (turn_data.damage_dealt, turn_data.hit_count > 0);

    if !ctx.combatant(user).is_fainted() {
        move_data.apply_damage_based_effects(ctx, user, damage_dealt);
        if deals_damage(&move_data) {
            items::after_move(ctx, user, damage_dealt);
        }
        if move_data.flags.contains(MoveFlags::RECHARGE) && connected && !ctx.combatant(user).is_fainted() {
            let tag = VolatileTag::new(VolatileCondition::Recharging, Some(user), None);
            ctx.combatant_mut(user).add_tag(tag);
        }
    }
    if self_destructs(&move_data) {
        apply_self_ko(ctx, user);
    }

    ctx.combatant_mut(user).turn_data.hits_left = 0;
    Ok(PhaseStatus::Done)
}

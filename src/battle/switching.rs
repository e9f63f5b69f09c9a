//! Faints, replacements and entry effects.

use crate::battle::abilities;
use crate::battle::combatant::{CombatantId, DamageSource, SideId};
use crate::battle::commands::{CommandRequest, TurnCommand};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::items;
use crate::battle::phases::{Phase, PhaseStatus};
use crate::battle::state::{BattleEvent, BattleOutcome};
use crate::battle::stats::is_grounded;
use crate::battle::turn_order;
use crate::errors::{BattleResult, BattleStateError};
use schema::SideCondition;
use tracing::{debug, info};

/// Victory, defeat or a draw once a side has nobody left.
pub fn check_battle_end(ctx: &BattleContext) -> Option<BattleOutcome> {
    match (
        ctx.field.has_remaining(SideId::Player),
        ctx.field.has_remaining(SideId::Enemy),
    ) {
        (false, false) => Some(BattleOutcome::Draw),
        (true, false) => Some(BattleOutcome::Victory(SideId::Player)),
        (false, true) => Some(BattleOutcome::Victory(SideId::Enemy)),
        (true, true) => None,
    }
}

/// Drops tags other combatants hold that only last while `source` is around.
fn release_tags_from(ctx: &mut BattleContext, source: CombatantId) {
    for id in ctx.field.active_ids() {
        let kinds: Vec<_> = ctx
            .combatant(id)
            .tags
            .iter()
            .filter(|t| t.source == Some(source) && t.kind().ends_with_source())
            .map(|t| t.kind())
            .collect();
        for kind in kinds {
            effects::remove_tag(ctx, id, kind);
        }
    }
}

pub fn faint_phase(ctx: &mut BattleContext, id: CombatantId) -> BattleResult<PhaseStatus> {
    let combatant = ctx.field.try_get(id)?;
    if !combatant.is_fainted() {
        // Revived between the knockout and this phase.
        ctx.combatant_mut(id).faint_pending = false;
        return Ok(PhaseStatus::Done);
    }
    let side = combatant.side;
    let source = combatant.last_damage_source;

    info!(turn = ctx.field.turn, %id, ?source, "fainted");
    ctx.emit(BattleEvent::Fainted { combatant: id });

    abilities::trigger_faint(ctx, id, source);
    if let Some(DamageSource::DirectHit { attacker, .. }) = source {
        if attacker != id {
            abilities::trigger_knock_out(ctx, attacker);
        }
    }
    release_tags_from(ctx, id);

    let slot = ctx.field.slot_of(id);
    if let Some(slot) = slot {
        ctx.field.side_mut(side).active[slot] = None;
    }
    let combatant = ctx.combatant_mut(id);
    combatant.reset_on_switch_out();
    combatant.status = None;
    combatant.status_turns = 0;
    combatant.faint_pending = false;
    ctx.set_command(id, None);

    if let Some(outcome) = check_battle_end(ctx) {
        // Anyone else already at zero faints in this same step.
        let others: Vec<CombatantId> = ctx
            .field
            .combatants
            .iter()
            .filter(|c| c.faint_pending && c.is_fainted())
            .map(|c| c.id)
            .collect();
        for other in others {
            ctx.combatant_mut(other).faint_pending = false;
            ctx.emit(BattleEvent::Fainted { combatant: other });
        }
        ctx.queue.clear();
        ctx.push(Phase::BattleEnd { outcome });
        return Ok(PhaseStatus::Done);
    }

    if let Some(slot) = slot {
        if !ctx.field.bench(side).is_empty() {
            ctx.unshift(Phase::PartySwitch {
                side,
                slot,
                outgoing: id,
                baton_pass: false,
            });
        }
    }
    Ok(PhaseStatus::Done)
}

/// Waits for the controller to pick a replacement, then summons it. The
/// answer arrives as a `SwitchPokemon` command stored against `outgoing`.
pub fn party_switch_phase(
    ctx: &mut BattleContext,
    side: SideId,
    slot: usize,
    outgoing: CombatantId,
    baton_pass: bool,
) -> BattleResult<PhaseStatus> {
    if ctx.field.bench(side).is_empty() {
        return Ok(PhaseStatus::Done);
    }
    let party_index = match ctx.command_of(outgoing) {
        Some(TurnCommand::SwitchPokemon { party_index }) => party_index,
        _ => {
            ctx.set_command(outgoing, None);
            return Ok(PhaseStatus::AwaitCommand(CommandRequest {
                combatant: outgoing,
                side,
                slot,
                forced_switch: true,
            }));
        }
    };
    ctx.set_command(outgoing, None);

    let incoming = ctx
        .field
        .side(side)
        .party
        .get(party_index)
        .copied()
        .ok_or_else(|| BattleStateError::InconsistentState(format!("party index {} out of range", party_index)))?;
    ctx.unshift(Phase::SwitchSummon {
        side,
        slot,
        incoming,
        baton_pass,
    });
    Ok(PhaseStatus::Done)
}

pub fn switch_summon_phase(
    ctx: &mut BattleContext,
    side: SideId,
    slot: usize,
    incoming: CombatantId,
    baton_pass: bool,
) -> BattleResult<PhaseStatus> {
    let entrant = ctx.field.try_get(incoming)?;
    if entrant.is_fainted() || ctx.field.is_active(incoming) {
        debug!(%incoming, "switch target no longer available");
        return Ok(PhaseStatus::Done);
    }
    let Some(current) = ctx.field.side(side).active.get(slot).copied() else {
        return Err(BattleStateError::NoActiveCombatant {
            side: side.index(),
            slot,
        }
        .into());
    };

    let mut carried = None;
    if let Some(outgoing) = current {
        if !ctx.combatant(outgoing).is_fainted() {
            let leaving = ctx.combatant(outgoing);
            if baton_pass {
                let tags: Vec<_> = leaving
                    .tags
                    .iter()
                    .filter(|t| t.kind().is_baton_passable())
                    .cloned()
                    .collect();
                carried = Some((leaving.stages, tags));
            }
            ctx.emit(BattleEvent::SwitchedOut {
                side,
                combatant: outgoing,
            });
            release_tags_from(ctx, outgoing);
            ctx.combatant_mut(outgoing).reset_on_switch_out();
            ctx.set_command(outgoing, None);
        }
    }

    ctx.field.side_mut(side).active[slot] = Some(incoming);
    let entrant = ctx.combatant_mut(incoming);
    entrant.turn_data = Default::default();
    entrant.faint_pending = false;
    if let Some((stages, tags)) = carried {
        entrant.stages = stages;
        entrant.tags = tags;
    }
    let species = entrant.species;
    info!(turn = ctx.field.turn, %side, %incoming, %species, "sent out");
    ctx.emit(BattleEvent::SentOut {
        side,
        combatant: incoming,
        species,
    });

    apply_entry_hazards(ctx, side, incoming);
    if !ctx.combatant(incoming).is_fainted() {
        ctx.unshift(Phase::PostSummon { combatant: incoming });
    }
    turn_order::resort_pending_moves(ctx);
    Ok(PhaseStatus::Done)
}

/// Spikes: 1/8, 1/6 or 1/4 of max HP by layer count, grounded entrants only.
fn apply_entry_hazards(ctx: &mut BattleContext, side: SideId, incoming: CombatantId) {
    let Some(layers) = ctx
        .field
        .side(side)
        .condition(SideCondition::Spikes)
        .map(|tag| tag.layers)
    else {
        return;
    };
    if !is_grounded(&ctx.field, incoming) {
        return;
    }
    let divisor = match layers {
        1 => 8,
        2 => 6,
        _ => 4,
    };
    let amount = (ctx.combatant(incoming).max_hp() / divisor).max(1);
    effects::apply_damage(ctx, incoming, amount, DamageSource::Hazard);
}

/// Entry effects: battle-count boosters, then switch-in abilities.
pub fn post_summon_phase(ctx: &mut BattleContext, id: CombatantId) -> BattleResult<PhaseStatus> {
    let combatant = ctx.field.try_get(id)?;
    if combatant.is_fainted() || !ctx.field.is_active(id) {
        return Ok(PhaseStatus::Done);
    }
    items::apply_temp_boosters(ctx, id);
    abilities::trigger_switch_in(ctx, id);
    Ok(PhaseStatus::Done)
}

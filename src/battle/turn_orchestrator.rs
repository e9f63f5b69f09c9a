//! Turn-level phases: opening a turn, collecting commands, turning commands
//! into queued actions, and closing the battle.

use crate::battle::combatant::{CombatantId, SideId};
use crate::battle::commands::{forced_command, CommandRequest, TurnCommand};
use crate::battle::context::BattleContext;
use crate::battle::phases::{Phase, PhaseStatus};
use crate::battle::state::{BattleEvent, BattleOutcome};
use crate::battle::turn_order::resolve_turn_order;
use crate::errors::{BattleResult, BattleStateError};
use schema::HeldItem;
use tracing::{debug, info};

/// Opens a turn: one command phase per active combatant, then TurnStart.
pub fn turn_init(ctx: &mut BattleContext) -> BattleResult<PhaseStatus> {
    let turn = ctx.field.turn;
    if turn > ctx.config.max_turns {
        info!(turn, max_turns = ctx.config.max_turns, "turn limit reached");
        ctx.push(Phase::BattleEnd {
            outcome: BattleOutcome::Draw,
        });
        return Ok(PhaseStatus::Done);
    }

    ctx.emit(BattleEvent::TurnStarted { turn });
    for id in ctx.field.active_ids() {
        let phase = match ctx.field.side_of(id) {
            SideId::Player => Phase::Command { combatant: id },
            SideId::Enemy => Phase::EnemyCommand { combatant: id },
        };
        ctx.push(phase);
    }
    ctx.push(Phase::TurnStart);
    Ok(PhaseStatus::Done)
}

/// Suspends until `id` has a command, unless one is already stored or the
/// combatant is locked into one.
pub fn command(ctx: &mut BattleContext, id: CombatantId) -> BattleResult<PhaseStatus> {
    let combatant = ctx.field.try_get(id)?;
    if combatant.is_fainted() || ctx.command_of(id).is_some() {
        return Ok(PhaseStatus::Done);
    }
    if let Some(forced) = forced_command(combatant) {
        debug!(%id, %forced, "command forced");
        ctx.set_command(id, Some(forced));
        return Ok(PhaseStatus::Done);
    }

    let side = combatant.side;
    let Some(slot) = ctx.field.slot_of(id) else {
        return Ok(PhaseStatus::Done);
    };
    Ok(PhaseStatus::AwaitCommand(CommandRequest {
        combatant: id,
        side,
        slot,
        forced_switch: false,
    }))
}

/// Orders the stored commands and queues one action phase each, followed by
/// the end-of-turn sequence.
pub fn turn_start(ctx: &mut BattleContext) -> BattleResult<PhaseStatus> {
    let order = resolve_turn_order(ctx);

    for holder in ctx.quick_claw.clone() {
        ctx.emit(BattleEvent::ItemActivated {
            combatant: holder,
            item: HeldItem::QuickClaw,
        });
    }

    for id in order {
        let Some(command) = ctx.command_of(id) else {
            continue;
        };
        let side = ctx.field.side_of(id);
        let phase = match command {
            TurnCommand::Forfeit => Phase::BattleEnd {
                outcome: BattleOutcome::Fled(side),
            },
            TurnCommand::SwitchPokemon { party_index } => {
                let slot = ctx
                    .field
                    .slot_of(id)
                    .ok_or(BattleStateError::UnknownCombatant(id))?;
                let incoming = ctx
                    .field
                    .side(side)
                    .party
                    .get(party_index)
                    .copied()
                    .ok_or_else(|| {
                        BattleStateError::InconsistentState(format!("party index {} out of range", party_index))
                    })?;
                Phase::SwitchSummon {
                    side,
                    slot,
                    incoming,
                    baton_pass: false,
                }
            }
            TurnCommand::UseMove { move_id, target } => Phase::Move {
                user: id,
                move_id,
                target,
            },
        };
        ctx.push(phase);
    }

    for command in ctx.commands.iter_mut() {
        *command = None;
    }
    ctx.push(Phase::EndOfTurn);
    Ok(PhaseStatus::Done)
}

/// Records the outcome and drops everything still queued. Temporary boosters
/// on the player's party count down one battle.
pub fn battle_end(ctx: &mut BattleContext, outcome: BattleOutcome) -> BattleResult<PhaseStatus> {
    ctx.outcome = Some(outcome);
    ctx.emit(BattleEvent::BattleEnded { outcome });
    ctx.queue.clear();

    for id in ctx.field.side(SideId::Player).party.clone() {
        ctx.combatant_mut(id).tick_temp_boosters();
    }
    info!(turn = ctx.field.turn, ?outcome, draws = ctx.rng.draws(), "battle ended");
    Ok(PhaseStatus::Done)
}

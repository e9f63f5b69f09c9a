use crate::battle::combatant::{CombatantId, SideId};
use crate::battle::commands::CommandRequest;
use crate::battle::context::BattleContext;
use crate::battle::state::BattleOutcome;
use crate::battle::{effects, end_of_turn, pipeline, switching, turn_orchestrator};
use crate::errors::BattleResult;
use schema::{BattleStat, MoveId, StatusEffect};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// One resumable step of turn execution. Each variant owns exactly what it
/// needs to run; nothing else is carried between phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    TurnInit,
    Command {
        combatant: CombatantId,
    },
    EnemyCommand {
        combatant: CombatantId,
    },
    TurnStart,
    Move {
        user: CombatantId,
        move_id: MoveId,
        target: Option<CombatantId>,
    },
    /// One hit of a move against its resolved targets. Multi-hit moves
    /// re-queue this phase once per remaining hit.
    MoveEffect {
        user: CombatantId,
        move_id: MoveId,
        targets: Vec<CombatantId>,
        first_hit: bool,
    },
    MoveEnd {
        user: CombatantId,
        move_id: MoveId,
    },
    StatStageChange {
        target: CombatantId,
        source: Option<CombatantId>,
        stats: Vec<BattleStat>,
        stages: i8,
    },
    ObtainStatus {
        target: CombatantId,
        source: Option<CombatantId>,
        status: StatusEffect,
    },
    Faint {
        combatant: CombatantId,
    },
    /// Asks the side's controller which bench member replaces `outgoing`.
    PartySwitch {
        side: SideId,
        slot: usize,
        outgoing: CombatantId,
        baton_pass: bool,
    },
    SwitchSummon {
        side: SideId,
        slot: usize,
        incoming: CombatantId,
        baton_pass: bool,
    },
    PostSummon {
        combatant: CombatantId,
    },
    /// Fans out into the fixed end-of-turn sequence.
    EndOfTurn,
    PostTurnStatus {
        combatant: CombatantId,
    },
    Weather,
    TurnEnd,
    /// Emits `TurnEnded` once every faint raised during TurnEnd has resolved.
    TurnClose,
    BattleEnd {
        outcome: BattleOutcome,
    },
}

/// How a phase finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Done,
    /// The phase cannot finish until a command arrives. It is put back at the
    /// head of the queue and re-run after `submit_command`.
    AwaitCommand(CommandRequest),
}

/// The scheduler's queue. `push` appends to the tail; `unshift` collects into
/// a prepend buffer that is flushed ahead of the queue, in the order the
/// phases were raised, once the running phase completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseQueue {
    phases: VecDeque<Phase>,
    prepend: Vec<Phase>,
}

impl PhaseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phase: Phase) {
        self.phases.push_back(phase);
    }

    /// Runs `phase` right after the current one (and after anything else
    /// unshifted before it during the same phase).
    pub fn unshift(&mut self, phase: Phase) {
        self.prepend.push(phase);
    }

    pub fn pop_front(&mut self) -> Option<Phase> {
        self.phases.pop_front()
    }

    /// Puts a suspended phase back at the head without flushing the buffer.
    pub fn requeue(&mut self, phase: Phase) {
        self.phases.push_front(phase);
    }

    /// Called when the running phase completes.
    pub fn flush_prepend(&mut self) {
        for phase in self.prepend.drain(..).rev() {
            self.phases.push_front(phase);
        }
    }

    pub fn clear(&mut self) {
        self.phases.clear();
        self.prepend.clear();
    }

    pub fn len(&self) -> usize {
        self.phases.len() + self.prepend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty() && self.prepend.is_empty()
    }

    /// Buffered phases first, then the queue, i.e. the order they will run in.
    pub fn iter(&self) -> impl Iterator<Item = &Phase> {
        self.prepend.iter().chain(self.phases.iter())
    }

    pub fn has_pending_move(&self, user: CombatantId) -> bool {
        self.phases
            .iter()
            .any(|p| matches!(p, Phase::Move { user: u, .. } if *u == user))
    }

    /// Pulls `user`'s queued move out of turn order and unshifts it.
    pub fn promote_move(&mut self, user: CombatantId) -> bool {
        let Some(index) = self
            .phases
            .iter()
            .position(|p| matches!(p, Phase::Move { user: u, .. } if *u == user))
        else {
            return false;
        };
        match self.phases.remove(index) {
            Some(phase) => {
                self.unshift(phase);
                true
            }
            None => false,
        }
    }

    /// Queued (not yet started) moves as `(user, move)`, in queue order.
    pub fn pending_moves(&self) -> Vec<(CombatantId, MoveId)> {
        self.phases
            .iter()
            .filter_map(|p| match p {
                Phase::Move { user, move_id, .. } => Some((*user, *move_id)),
                _ => None,
            })
            .collect()
    }

    /// Rewrites the queued moves so they run in `order`, keeping every other
    /// phase where it is. Users missing from `order` keep their relative order
    /// after the listed ones.
    pub fn reorder_moves(&mut self, order: &[CombatantId]) {
        let slots: Vec<usize> = self
            .phases
            .iter()
            .enumerate()
            .filter(|(_, p)| matches!(p, Phase::Move { .. }))
            .map(|(i, _)| i)
            .collect();
        let mut moves: Vec<Phase> = slots.iter().map(|i| self.phases[*i].clone()).collect();

        let rank = |phase: &Phase| match phase {
            Phase::Move { user, .. } => order.iter().position(|u| u == user).unwrap_or(order.len()),
            _ => order.len(),
        };
        moves.sort_by_key(rank);

        for (slot, phase) in slots.into_iter().zip(moves) {
            self.phases[slot] = phase;
        }
    }
}

/// Exhaustive dispatch from a phase to its handler.
pub fn run_phase(ctx: &mut BattleContext, phase: &Phase) -> BattleResult<PhaseStatus> {
    debug!(turn = ctx.field.turn, ?phase, "phase start");
    match phase {
        Phase::TurnInit => turn_orchestrator::turn_init(ctx),
        Phase::Command { combatant } | Phase::EnemyCommand { combatant } => {
            turn_orchestrator::command(ctx, *combatant)
        }
        Phase::TurnStart => turn_orchestrator::turn_start(ctx),
        Phase::Move { user, move_id, target } => pipeline::move_phase(ctx, *user, *move_id, *target),
        Phase::MoveEffect {
            user,
            move_id,
            targets,
            first_hit,
        } => pipeline::move_effect_phase(ctx, *user, *move_id, targets, *first_hit),
        Phase::MoveEnd { user, move_id } => pipeline::move_end_phase(ctx, *user, *move_id),
        Phase::StatStageChange {
            target,
            source,
            stats,
            stages,
        } => {
            effects::stat_stage_change_phase(ctx, *target, *source, stats, *stages);
            Ok(PhaseStatus::Done)
        }
        Phase::ObtainStatus { target, source, status } => {
            effects::obtain_status_phase(ctx, *target, *source, *status);
            Ok(PhaseStatus::Done)
        }
        Phase::Faint { combatant } => switching::faint_phase(ctx, *combatant),
        Phase::PartySwitch {
            side,
            slot,
            outgoing,
            baton_pass,
        } => switching::party_switch_phase(ctx, *side, *slot, *outgoing, *baton_pass),
        Phase::SwitchSummon {
            side,
            slot,
            incoming,
            baton_pass,
        } => switching::switch_summon_phase(ctx, *side, *slot, *incoming, *baton_pass),
        Phase::PostSummon { combatant } => switching::post_summon_phase(ctx, *combatant),
        Phase::EndOfTurn => end_of_turn::end_of_turn_phase(ctx),
        Phase::PostTurnStatus { combatant } => end_of_turn::post_turn_status_phase(ctx, *combatant),
        Phase::Weather => end_of_turn::weather_phase(ctx),
        Phase::TurnEnd => end_of_turn::turn_end_phase(ctx),
        Phase::TurnClose => end_of_turn::turn_close_phase(ctx),
        Phase::BattleEnd { outcome } => turn_orchestrator::battle_end(ctx, *outcome),
    }
}

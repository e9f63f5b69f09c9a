//! Whole-battle snapshots for save/resume and replay checks.
//!
//! A snapshot is taken only while the battle is suspended, so the queue
//! holds complete phases and nothing is half-applied.

use crate::battle::combatant::CombatantId;
use crate::battle::commands::TurnCommand;
use crate::battle::engine::Awaiting;
use crate::battle::field::Field;
use crate::battle::phases::{Phase, PhaseQueue};
use crate::battle::rng::RngState;
use crate::battle::state::{BattleEvent, BattleOutcome};
use crate::config::BattleConfig;
use crate::errors::{SnapshotError, SnapshotResult};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub version: u32,
    pub config: BattleConfig,
    pub field: Field,
    pub queue: PhaseQueue,
    pub commands: Vec<Option<TurnCommand>>,
    pub turn_order: Vec<CombatantId>,
    pub quick_claw: Vec<CombatantId>,
    /// Raised but not yet acknowledged.
    pub events: Vec<BattleEvent>,
    pub rng: RngState,
    pub outcome: Option<BattleOutcome>,
    pub awaiting: Awaiting,
    pub history: Vec<BattleEvent>,
}

impl BattleSnapshot {
    pub fn turn(&self) -> u32 {
        self.field.turn
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_json(text: &str) -> SnapshotResult<Self> {
        serde_json::from_str(text).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Compact binary form.
    pub fn to_bytes(&self) -> SnapshotResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Structural checks run before a snapshot replaces live state.
    pub fn validate(&self) -> SnapshotResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }
        self.field.validate().map_err(SnapshotError::Inconsistent)?;

        let count = self.field.combatants.len();
        if self.commands.len() != count {
            return Err(SnapshotError::Inconsistent(format!(
                "{} command slots for {} combatants",
                self.commands.len(),
                count
            )));
        }
        let known = |id: &CombatantId| id.0 < count;
        let command_targets = self.commands.iter().flatten().filter_map(|command| match command {
            TurnCommand::UseMove { target, .. } => *target,
            _ => None,
        });
        let mut listed = self.turn_order.iter().chain(&self.quick_claw).copied().chain(command_targets);
        if let Some(bad) = listed.find(|id| !known(id)) {
            return Err(SnapshotError::Inconsistent(format!("unknown combatant {}", bad)));
        }
        if let Some(phase) = self.queue.iter().find(|phase| !phase_ids(phase).iter().all(known)) {
            return Err(SnapshotError::Inconsistent(format!("queued phase names an unknown combatant: {:?}", phase)));
        }
        if let Awaiting::Command(request) = &self.awaiting {
            if !known(&request.combatant) {
                return Err(SnapshotError::Inconsistent(format!(
                    "awaiting a command from unknown combatant {}",
                    request.combatant
                )));
            }
        }
        if self.outcome.is_some() && !self.queue.is_empty() {
            return Err(SnapshotError::Inconsistent("finished battle with queued phases".to_string()));
        }
        Ok(())
    }
}

fn phase_ids(phase: &Phase) -> Vec<CombatantId> {
    match phase {
        Phase::TurnInit | Phase::TurnStart | Phase::EndOfTurn | Phase::Weather | Phase::TurnEnd | Phase::TurnClose => Vec::new(),
        Phase::BattleEnd { .. } => Vec::new(),
        Phase::Command { combatant }
        | Phase::EnemyCommand { combatant }
        | Phase::Faint { combatant }
        | Phase::PostSummon { combatant }
        | Phase::PostTurnStatus { combatant } => vec![*combatant],
        Phase::Move { user, target, .. } => std::iter::once(*user).chain(*target).collect(),
        Phase::MoveEffect { user, targets, .. } => std::iter::once(*user).chain(targets.iter().copied()).collect(),
        Phase::MoveEnd { user, .. } => vec![*user],
        Phase::StatStageChange { target, source, .. } | Phase::ObtainStatus { target, source, .. } => {
            std::iter::once(*target).chain(*source).collect()
        }
        Phase::PartySwitch { outgoing, .. } => vec![*outgoing],
        Phase::SwitchSummon { incoming, .. } => vec![*incoming],
    }
}

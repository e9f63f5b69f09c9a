use crate::battle::combatant::{Combatant, CombatantId};
use crate::battle::commands::TurnCommand;
use crate::battle::field::Field;
use crate::battle::phases::{Phase, PhaseQueue};
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleOutcome, EventBus};
use crate::config::BattleConfig;
use serde::{Deserialize, Serialize};

/// Everything a phase may read or mutate, scoped to one battle. Passed
/// explicitly into every handler; there is no global battle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleContext {
    pub config: BattleConfig,
    pub field: Field,
    pub rng: BattleRng,
    pub queue: PhaseQueue,
    /// This turn's command per combatant, indexed by `CombatantId`.
    pub commands: Vec<Option<TurnCommand>>,
    /// Action order computed at the start of the turn.
    pub turn_order: Vec<CombatantId>,
    /// Quick Claw holders that won their draw this turn.
    pub quick_claw: Vec<CombatantId>,
    /// Events raised since the last acknowledgement.
    pub events: EventBus,
    pub outcome: Option<BattleOutcome>,
}

impl BattleContext {
    pub fn new(config: BattleConfig, field: Field, rng: BattleRng) -> Self {
        let commands = vec![None; field.combatants.len()];
        Self {
            config,
            field,
            rng,
            queue: PhaseQueue::new(),
            commands,
            turn_order: Vec::new(),
            quick_claw: Vec::new(),
            events: EventBus::new(),
            outcome: None,
        }
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn combatant(&self, id: CombatantId) -> &Combatant {
        self.field.get(id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> &mut Combatant {
        self.field.get_mut(id)
    }

    pub fn command_of(&self, id: CombatantId) -> Option<TurnCommand> {
        self.commands.get(id.0).copied().flatten()
    }

    pub fn set_command(&mut self, id: CombatantId, command: Option<TurnCommand>) {
        if let Some(slot) = self.commands.get_mut(id.0) {
            *slot = command;
        }
    }

    pub fn push(&mut self, phase: Phase) {
        self.queue.push(phase);
    }

    pub fn unshift(&mut self, phase: Phase) {
        self.queue.unshift(phase);
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

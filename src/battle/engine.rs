//! The resumable battle driver.
//!
//! `Battle::run` pops phases until it has to stop: either events are waiting
//! to be acknowledged, a controller has to choose a command, or the battle is
//! over. Callers loop on `run`, answering each `Suspension` with
//! `acknowledge` or `submit_command`.

use crate::battle::combatant::CombatantId;
use crate::battle::commands::{self, CommandRequest, TurnCommand};
use crate::battle::context::BattleContext;
use crate::battle::field::Field;
use crate::battle::phases::{run_phase, Phase, PhaseStatus};
use crate::battle::rng::BattleRng;
use crate::battle::snapshot::{BattleSnapshot, SNAPSHOT_VERSION};
use crate::battle::state::{BattleEvent, BattleOutcome, EventBus};
use crate::battle::turn_order::speed_order;
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleResult, BattleStateError, SnapshotResult};
use crate::teams::Encounter;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// What the battle is blocked on between `run` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Awaiting {
    Nothing,
    Ack,
    Command(CommandRequest),
}

/// Why `run` returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Suspension {
    /// Events raised since the last acknowledgement. Call `acknowledge` to go on.
    AwaitingAck { events: Vec<BattleEvent> },
    /// Call `submit_command` for `request.combatant`.
    AwaitingCommand(CommandRequest),
    Finished { outcome: BattleOutcome },
}

#[derive(Debug, Clone)]
pub struct Battle {
    pub(crate) ctx: BattleContext,
    pub(crate) awaiting: Awaiting,
    pub(crate) history: Vec<BattleEvent>,
}

impl Battle {
    /// Builds the field from an encounter and seeds the RNG from the config.
    pub fn new(config: BattleConfig, encounter: &Encounter) -> BattleResult<Self> {
        let field = encounter.build_field()?;
        let rng = BattleRng::seeded(config.seed);
        Ok(Self::with_field(config, field, rng))
    }

    /// Starts a battle on an already populated field. Lead combatants are
    /// announced and their entry effects queued in speed order.
    pub fn with_field(config: BattleConfig, field: Field, rng: BattleRng) -> Self {
        let mut ctx = BattleContext::new(config, field, rng);
        for id in speed_order(&ctx) {
            let combatant = ctx.combatant(id);
            let (side, species) = (combatant.side, combatant.species);
            ctx.emit(BattleEvent::SentOut {
                side,
                combatant: id,
                species,
            });
            ctx.push(Phase::PostSummon { combatant: id });
        }
        ctx.push(Phase::TurnInit);
        Self {
            ctx,
            awaiting: Awaiting::Nothing,
            history: Vec::new(),
        }
    }

    /// Runs phases until the battle needs something from the caller.
    pub fn run(&mut self) -> BattleResult<Suspension> {
        loop {
            match self.awaiting {
                Awaiting::Ack => {
                    return Ok(Suspension::AwaitingAck {
                        events: self.ctx.events.events().to_vec(),
                    })
                }
                Awaiting::Command(request) => return Ok(Suspension::AwaitingCommand(request)),
                Awaiting::Nothing => {}
            }
            if !self.ctx.events.is_empty() {
                self.awaiting = Awaiting::Ack;
                continue;
            }
            if let Some(outcome) = self.ctx.outcome {
                return Ok(Suspension::Finished { outcome });
            }

            let Some(phase) = self.ctx.queue.pop_front() else {
                let err = BattleStateError::InconsistentState("phase queue ran dry before the battle ended".to_string());
                error!(turn = self.ctx.field.turn, %err, "scheduler stalled");
                return Err(err.into());
            };

            match run_phase(&mut self.ctx, &phase) {
                Ok(PhaseStatus::Done) => {
                    self.ctx.queue.flush_prepend();
                    if !self.ctx.events.is_empty() {
                        self.awaiting = Awaiting::Ack;
                    }
                }
                Ok(PhaseStatus::AwaitCommand(request)) => {
                    self.ctx.queue.requeue(phase);
                    self.awaiting = if self.ctx.events.is_empty() {
                        Awaiting::Command(request)
                    } else {
                        Awaiting::Ack
                    };
                }
                Err(err) => {
                    error!(turn = self.ctx.field.turn, ?phase, %err, "phase failed");
                    return Err(err);
                }
            }
        }
    }

    /// Consumes the pending events and lets `run` continue. Returns the
    /// events that were acknowledged; empty if nothing was pending.
    pub fn acknowledge(&mut self) -> Vec<BattleEvent> {
        if self.awaiting != Awaiting::Ack {
            return Vec::new();
        }
        let events = self.ctx.events.drain();
        self.history.extend(events.iter().cloned());
        self.awaiting = Awaiting::Nothing;
        events
    }

    /// Stores a command for the combatant the battle is waiting on. An illegal
    /// command is rejected and leaves the battle exactly as it was.
    pub fn submit_command(&mut self, combatant: CombatantId, command: TurnCommand) -> BattleResult<()> {
        let Awaiting::Command(request) = self.awaiting else {
            warn!(%combatant, %command, "command submitted while not awaiting one");
            return Err(ActionError::NotAwaitingCommand.into());
        };
        if request.combatant != combatant {
            warn!(expected = %request.combatant, got = %combatant, "command for the wrong combatant");
            return Err(ActionError::WrongCombatant {
                expected: request.combatant,
                got: combatant,
            }
            .into());
        }
        if let Err(err) = commands::validate_command(&self.ctx.field, &request, &command) {
            warn!(%combatant, %command, %err, "command rejected");
            return Err(err.into());
        }

        debug!(%combatant, %command, "command accepted");
        self.ctx.set_command(combatant, Some(command));
        self.awaiting = Awaiting::Nothing;
        Ok(())
    }

    pub fn pending_request(&self) -> Option<CommandRequest> {
        match self.awaiting {
            Awaiting::Command(request) => Some(request),
            _ => None,
        }
    }

    /// Every command `submit_command` would accept for `id` right now. Uses the
    /// pending request when it is for `id` (so forced switches only list
    /// switches), otherwise a regular turn request.
    pub fn legal_commands(&self, id: CombatantId) -> Vec<TurnCommand> {
        if let Some(request) = self.pending_request().filter(|r| r.combatant == id) {
            return commands::legal_commands(&self.ctx.field, &request);
        }
        let Some(slot) = self.ctx.field.slot_of(id) else {
            return Vec::new();
        };
        let request = CommandRequest {
            combatant: id,
            side: self.ctx.field.side_of(id),
            slot,
            forced_switch: false,
        };
        commands::legal_commands(&self.ctx.field, &request)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            version: SNAPSHOT_VERSION,
            config: self.ctx.config.clone(),
            field: self.ctx.field.clone(),
            queue: self.ctx.queue.clone(),
            commands: self.ctx.commands.clone(),
            turn_order: self.ctx.turn_order.clone(),
            quick_claw: self.ctx.quick_claw.clone(),
            events: self.ctx.events.events().to_vec(),
            rng: self.ctx.rng.state(),
            outcome: self.ctx.outcome,
            awaiting: self.awaiting,
            history: self.history.clone(),
        }
    }

    /// Replaces the whole battle with `snapshot`. A snapshot that fails
    /// validation is rejected and the current battle is left untouched.
    pub fn load_snapshot(&mut self, snapshot: BattleSnapshot) -> SnapshotResult<()> {
        if let Err(err) = snapshot.validate() {
            warn!(%err, "snapshot rejected");
            return Err(err);
        }
        *self = Self::from_snapshot(snapshot);
        Ok(())
    }

    fn from_snapshot(snapshot: BattleSnapshot) -> Self {
        let ctx = BattleContext {
            config: snapshot.config,
            field: snapshot.field,
            rng: BattleRng::from(snapshot.rng),
            queue: snapshot.queue,
            commands: snapshot.commands,
            turn_order: snapshot.turn_order,
            quick_claw: snapshot.quick_claw,
            events: EventBus::from(snapshot.events),
            outcome: snapshot.outcome,
        };
        Self {
            ctx,
            awaiting: snapshot.awaiting,
            history: snapshot.history,
        }
    }

    /// Builds a battle straight from a validated snapshot.
    pub fn restore(snapshot: BattleSnapshot) -> SnapshotResult<Self> {
        snapshot.validate()?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn field(&self) -> &Field {
        &self.ctx.field
    }

    pub fn config(&self) -> &BattleConfig {
        &self.ctx.config
    }

    pub fn turn(&self) -> u32 {
        self.ctx.field.turn
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.ctx.outcome
    }

    pub fn is_over(&self) -> bool {
        self.ctx.is_over()
    }

    /// Events raised but not yet acknowledged.
    pub fn pending_events(&self) -> &[BattleEvent] {
        self.ctx.events.events()
    }

    /// Every acknowledged event, oldest first.
    pub fn history(&self) -> &[BattleEvent] {
        &self.history
    }

    pub fn rng_draws(&self) -> u64 {
        self.ctx.rng.draws()
    }

    pub fn awaiting(&self) -> Awaiting {
        self.awaiting
    }
}

use crate::battle::ai::CommandSource;
use crate::battle::combatant::SideId;
use crate::battle::engine::{Battle, Suspension};
use crate::battle::state::{BattleEvent, BattleOutcome};
use crate::errors::{BattleResult, BattleStateError};
use tracing::{info, warn};

/// Receives every acknowledged event, in order. The engine never formats
/// text; a presenter decides what `message_key()` and `params()` turn into.
pub trait Presenter {
    fn notify(&mut self, event: &BattleEvent);
}

/// Logs each event's key and parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn notify(&mut self, event: &BattleEvent) {
        info!(key = event.message_key(), params = ?event.params(), "event");
    }
}

/// Keeps every event it is shown. Handy for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub events: Vec<BattleEvent>,
}

impl Presenter for RecordingPresenter {
    fn notify(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}

/// Rejected answers tolerated from a source before the runner picks the first
/// legal command on its behalf.
const MAX_REJECTIONS: usize = 3;

/// Drives a battle with one command source per side and a presenter.
#[derive(Debug)]
pub struct BattleRunner<P, E, V> {
    battle: Battle,
    player: P,
    enemy: E,
    presenter: V,
}

impl<P, E, V> BattleRunner<P, E, V>
where
    P: CommandSource,
    E: CommandSource,
    V: Presenter,
{
    pub fn new(battle: Battle, player: P, enemy: E, presenter: V) -> Self {
        Self {
            battle,
            player,
            enemy,
            presenter,
        }
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn presenter(&self) -> &V {
        &self.presenter
    }

    pub fn into_parts(self) -> (Battle, P, E, V) {
        (self.battle, self.player, self.enemy, self.presenter)
    }

    /// Handles one suspension. Returns the outcome once the battle is over.
    pub fn step(&mut self) -> BattleResult<Option<BattleOutcome>> {
        match self.battle.run()? {
            Suspension::AwaitingAck { .. } => {
                for event in self.battle.acknowledge() {
                    self.presenter.notify(&event);
                }
                Ok(None)
            }
            Suspension::AwaitingCommand(request) => {
                let mut rejections = 0;
                loop {
                    let command = if rejections < MAX_REJECTIONS {
                        match request.side {
                            SideId::Player => self.player.request_command(&self.battle, &request),
                            SideId::Enemy => self.enemy.request_command(&self.battle, &request),
                        }
                    } else {
                        let fallback = self.battle.legal_commands(request.combatant).into_iter().next();
                        fallback.ok_or_else(|| {
                            BattleStateError::InconsistentState(format!("{} has no legal command", request.combatant))
                        })?
                    };
                    match self.battle.submit_command(request.combatant, command) {
                        Ok(()) => return Ok(None),
                        Err(err) if rejections < MAX_REJECTIONS => {
                            warn!(combatant = %request.combatant, %command, %err, "source answered with an illegal command");
                            rejections += 1;
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
            Suspension::Finished { outcome } => Ok(Some(outcome)),
        }
    }

    pub fn run_to_completion(&mut self) -> BattleResult<BattleOutcome> {
        loop {
            if let Some(outcome) = self.step()? {
                info!(turn = self.battle.turn(), ?outcome, "runner finished");
                return Ok(outcome);
            }
        }
    }
}

use crate::battle::combatant::CombatantId;
use schema::MoveId;
use thiserror::Error;

/// Main error type for the rogue-battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// A submitted command is illegal in the current state
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Battle state is inconsistent; this is a content or engine bug
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// A snapshot could not be produced or restored
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    /// Configuration or encounter data could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to commands submitted by a player or AI
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("The battle is not waiting for a command")]
    NotAwaitingCommand,
    #[error("Expected a command for {expected:?}, got one for {got:?}")]
    WrongCombatant { expected: CombatantId, got: CombatantId },
    #[error("{0} is not in the moveset")]
    UnknownMove(MoveId),
    #[error("{0} is disabled")]
    MoveDisabled(MoveId),
    #[error("{0} has no PP left")]
    NoPp(MoveId),
    #[error("Locked into {locked} by Encore")]
    EncoreLocked { locked: MoveId },
    #[error("{0} cannot be used while taunted")]
    Taunted(MoveId),
    #[error("Struggle is only allowed when no other move can be used")]
    StruggleNotAllowed,
    #[error("Invalid target: {0:?}")]
    InvalidTarget(CombatantId),
    #[error("Invalid party index: {0}")]
    InvalidPartyIndex(usize),
    #[error("A replacement must be sent out")]
    SwitchRequired,
    #[error("Cannot switch out while trapped")]
    Trapped,
    #[error("Cannot run from this battle")]
    CannotRun,
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("Unknown combatant: {0:?}")]
    UnknownCombatant(CombatantId),
    #[error("No active combatant in slot {slot} of side {side}")]
    NoActiveCombatant { side: usize, slot: usize },
    #[error("Empty party for side {0}")]
    EmptyParty(usize),
    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
}

/// Errors related to exporting or importing snapshots
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),
    #[error("Failed to decode snapshot: {0}")]
    Decode(String),
    #[error("Snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Snapshot is internally inconsistent: {0}")]
    Inconsistent(String),
}

/// Errors related to loading configuration files
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("Failed to parse RON: {0}")]
    Parse(String),
    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using SnapshotError
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

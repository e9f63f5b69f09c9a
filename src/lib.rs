//! Rogue Battle Engine
//!
//! A deterministic, resumable turn-based monster battle engine: a phase
//! scheduler driving move resolution, abilities, items and segmented boss
//! shields, with every random draw taken from one seeded stream so a battle
//! can be snapshotted and replayed exactly.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod teams;

// --- PUBLIC API RE-EXPORTS ---

// Static content from the `schema` crate.
pub use schema::{
    AbilityId, BattleStat, HeldItem, MoveCategory, MoveData, MoveId, PokemonType, SideCondition, SpeciesId,
    StatusEffect, TempBoosterKind, TerrainType, WeatherType,
};

// Driving a battle.
pub use battle::ai::{CommandSource, ScoringAI, ScriptedCommands};
pub use battle::combatant::{Combatant, CombatantId, SideId};
pub use battle::commands::{CommandRequest, TurnCommand};
pub use battle::engine::{Awaiting, Battle, Suspension};
pub use battle::field::{BattleFormat, Field};
pub use battle::rng::BattleRng;
pub use battle::runner::{BattleRunner, Presenter, RecordingPresenter, TracingPresenter};
pub use battle::snapshot::{BattleSnapshot, SNAPSHOT_VERSION};
pub use battle::state::{BattleEvent, BattleOutcome};

// Configuration and encounters.
pub use config::BattleConfig;
pub use teams::{CombatantSpec, Encounter};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigError, ConfigResult, SnapshotError,
    SnapshotResult,
};

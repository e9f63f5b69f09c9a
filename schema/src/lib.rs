// Static content for the rogue-battle engine.
// Everything in here is immutable data keyed by enum ids; the engine crate
// interprets it. Unknown ids are compile errors, never runtime misses.

pub use abilities::*;
pub use battle_data::*;
pub use items::*;
pub use move_types::*;
pub use moves::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod abilities;
pub mod battle_data;
pub mod items;
pub mod move_types;
pub mod moves;
pub mod pokemon_types;
pub mod species_data;

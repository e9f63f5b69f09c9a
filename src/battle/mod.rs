pub mod abilities;
pub mod ai;
pub mod boss;
pub mod calculators;
pub mod combatant;
pub mod commands;
pub mod conditions;
pub mod context;
pub mod effects;
pub mod end_of_turn;
pub mod engine;
pub mod field;
pub mod items;
pub mod move_effects;
pub mod phases;
pub mod pipeline;
pub mod rng;
pub mod runner;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod switching;
pub mod turn_orchestrator;
pub mod turn_order;

#[cfg(test)]
mod tests;

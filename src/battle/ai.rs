//! A module for defining command sources for battle participants.

use crate::battle::combatant::{Combatant, CombatantId};
use crate::battle::commands::{CommandRequest, TurnCommand};
use crate::battle::engine::Battle;
use crate::battle::stats::effective_stat;
use ordered_float::OrderedFloat;
use schema::{BattleStat, EffectTarget, MoveCategory, MoveEffect, MoveId, PokemonType};
use std::collections::VecDeque;

/// Anything that can answer a command request: a human front end, an AI, or
/// a script in tests.
pub trait CommandSource {
    /// Picks a command for `request.combatant`. The battle validates it; an
    /// illegal answer is rejected and asked for again.
    fn request_command(&mut self, battle: &Battle, request: &CommandRequest) -> TurnCommand;
}

/// Greedy one-ply scorer. Deterministic: ties go to the later legal command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringAI;

impl ScoringAI {
    pub fn new() -> Self {
        Self
    }

    /// The core scoring logic. Assigns a floating-point value to a given command.
    fn score_command(&self, battle: &Battle, user: CombatantId, command: &TurnCommand) -> f32 {
        match command {
            TurnCommand::UseMove { move_id, target } => self.score_move(battle, user, *move_id, *target),
            TurnCommand::SwitchPokemon { party_index } => self.score_switch(battle, user, *party_index),
            TurnCommand::Forfeit => -1000.0, // Never choose to forfeit unless it's the only option.
        }
    }

    fn score_move(&self, battle: &Battle, user: CombatantId, move_id: MoveId, target: Option<CombatantId>) -> f32 {
        let field = battle.field();
        let attacker = field.get(user);
        let move_data = move_id.data();
        let defender = target
            .or_else(|| field.opponents_of(user).first().copied())
            .map(|id| field.get(id));
        let Some(defender) = defender else {
            return 0.0;
        };

        // Direct damage potential.
        let mut damage_score = 0.0;
        if move_data.is_damaging() {
            let base_power = if move_data.power > 0 { move_data.power as f32 } else { 60.0 };
            let effectiveness = PokemonType::effectiveness_against(
                move_data.move_type,
                &defender.types,
                battle.config().inverse_type_chart,
            );
            if effectiveness < 0.1 {
                return -1.0;
            }
            let stab = if attacker.has_type(move_data.move_type) { 1.5 } else { 1.0 };
            let stat = match move_data.category {
                MoveCategory::Special => BattleStat::SpecialAttack,
                _ => BattleStat::Attack,
            };
            let level_scalar = (attacker.level as f32 * 2.0).max(1.0);
            let normalized_power = effective_stat(field, user, stat) as f32 / level_scalar;
            damage_score = base_power * effectiveness * stab * normalized_power;
        }

        let utility_score: f32 = move_data
            .effects
            .iter()
            .map(|effect| utility_of(effect, attacker, defender))
            .sum();

        if move_data.category == MoveCategory::Status && utility_score < 1.0 {
            return -1.0;
        }
        let mut final_score = damage_score + utility_score;
        if move_data.category != MoveCategory::Status {
            let accuracy = move_data.accuracy.map_or(101.0, f32::from); // Slight edge to sure-hit moves
            final_score *= accuracy / 100.0;
        }
        final_score
    }

    fn score_switch(&self, battle: &Battle, user: CombatantId, party_index: usize) -> f32 {
        let field = battle.field();
        let side = field.side_of(user);
        let Some(candidate) = field.side(side).party.get(party_index).map(|id| field.get(*id)) else {
            return f32::MIN;
        };
        // Healthier candidates with a resisting typing come in first.
        let health = candidate.hp() as f32 / candidate.max_hp().max(1) as f32;
        let threat: f32 = field
            .active_on(side.opponent())
            .iter()
            .map(|id| {
                field
                    .get(*id)
                    .types
                    .iter()
                    .map(|t| PokemonType::effectiveness_against(*t, &candidate.types, battle.config().inverse_type_chart))
                    .fold(0.0, f32::max)
            })
            .fold(0.0, f32::max);
        1.0 + health * 10.0 - threat * 2.0
    }
}

fn utility_of(effect: &MoveEffect, attacker: &Combatant, defender: &Combatant) -> f32 {
    match *effect {
        // Self-buffs are worth less as the stat climbs.
        MoveEffect::StatChange {
            target: EffectTarget::User,
            stat,
            stages,
            chance,
        } if stages > 0 => {
            let current = attacker.stage(stat);
            if current < 6 {
                let gain = 1.0 - current as f32 / 6.0;
                20.0 * stages as f32 * gain * (chance as f32 / 100.0)
            } else {
                0.0
            }
        }
        MoveEffect::StatChange {
            target: EffectTarget::Target,
            stat,
            stages,
            chance,
        } if stages < 0 => {
            if defender.stage(stat) > -6 {
                15.0 * stages.unsigned_abs() as f32 * (chance as f32 / 100.0)
            } else {
                0.0
            }
        }
        MoveEffect::InflictStatus { chance, .. } if defender.status.is_none() => 45.0 * (chance as f32 / 100.0),
        MoveEffect::Flinch { chance } => 30.0 * (chance as f32 / 100.0),
        MoveEffect::Confuse { chance } => 20.0 * (chance as f32 / 100.0),
        MoveEffect::Heal { .. } if attacker.hp() * 2 < attacker.max_hp() => 50.0,
        MoveEffect::Drain { .. } if attacker.hp() < attacker.max_hp() => 10.0,
        MoveEffect::Volatile(_) | MoveEffect::SetSideCondition { .. } => 5.0,
        MoveEffect::SetWeather(_) | MoveEffect::SetTerrain(_) | MoveEffect::TrickRoom => 5.0,
        _ => 0.0,
    }
}

impl CommandSource for ScoringAI {
    fn request_command(&mut self, battle: &Battle, request: &CommandRequest) -> TurnCommand {
        let legal = battle.legal_commands(request.combatant);
        legal
            .into_iter()
            .map(|command| {
                let score = self.score_command(battle, request.combatant, &command);
                (command, score)
            })
            .max_by_key(|(_, score)| OrderedFloat(*score))
            .map(|(command, _)| command)
            .unwrap_or(TurnCommand::UseMove {
                move_id: MoveId::FALLBACK,
                target: None,
            })
    }
}

/// Plays back a fixed list of commands, falling back to the first legal
/// command once the list runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCommands {
    script: VecDeque<TurnCommand>,
}

impl ScriptedCommands {
    pub fn new(script: impl IntoIterator<Item = TurnCommand>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl CommandSource for ScriptedCommands {
    fn request_command(&mut self, battle: &Battle, request: &CommandRequest) -> TurnCommand {
        if let Some(command) = self.script.pop_front() {
            return command;
        }
        battle
            .legal_commands(request.combatant)
            .into_iter()
            .next()
            .unwrap_or(TurnCommand::UseMove {
                move_id: MoveId::FALLBACK,
                target: None,
            })
    }
}

//! Encounter definitions: who fights on each side, loaded from RON.

use crate::battle::combatant::Combatant;
use crate::battle::field::{BattleFormat, Field, TerrainState, WeatherState};
use crate::errors::{BattleResult, ConfigError, ConfigResult};
use schema::{AbilityId, HeldItem, MoveId, SpeciesId, TempBoosterKind, TerrainType, WeatherType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One party member as written in an encounter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSpec {
    pub species: SpeciesId,
    pub level: u8,
    pub moves: Vec<MoveId>,
    /// Falls back to the species' ability.
    #[serde(default)]
    pub ability: Option<AbilityId>,
    #[serde(default)]
    pub item: Option<HeldItem>,
    /// Shield segments; only meaningful on the enemy side.
    #[serde(default)]
    pub boss_segments: Option<u8>,
    #[serde(default)]
    pub boosters: Vec<TempBoosterKind>,
}

impl CombatantSpec {
    pub fn new(species: SpeciesId, level: u8, moves: &[MoveId]) -> Self {
        Self {
            species,
            level,
            moves: moves.to_vec(),
            ability: None,
            item: None,
            boss_segments: None,
            boosters: Vec::new(),
        }
    }

    pub fn build(&self) -> Combatant {
        let mut combatant = Combatant::new(self.species, self.level, &self.moves);
        if let Some(ability) = self.ability {
            combatant = combatant.with_ability(ability);
        }
        if let Some(item) = self.item {
            combatant = combatant.with_item(item);
        }
        if let Some(segments) = self.boss_segments {
            combatant = combatant.as_boss(segments);
        }
        for booster in &self.boosters {
            combatant.grant_temp_booster(*booster);
        }
        combatant
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(1..=100).contains(&self.level) {
            return Err(ConfigError::Invalid(format!(
                "{} has level {}, expected 1 to 100",
                self.species, self.level
            )));
        }
        if self.moves.is_empty() || self.moves.len() > 4 {
            return Err(ConfigError::Invalid(format!(
                "{} must know between 1 and 4 moves",
                self.species
            )));
        }
        if self.boss_segments == Some(0) {
            return Err(ConfigError::Invalid(format!("{} has zero boss segments", self.species)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_format")]
    pub format: BattleFormat,
    /// Weather in effect from the first turn; it lasts until replaced.
    #[serde(default)]
    pub weather: Option<WeatherType>,
    #[serde(default)]
    pub terrain: Option<TerrainType>,
    pub player: Vec<CombatantSpec>,
    pub enemy: Vec<CombatantSpec>,
}

fn default_format() -> BattleFormat {
    BattleFormat::Single
}

impl Encounter {
    pub fn new(player: Vec<CombatantSpec>, enemy: Vec<CombatantSpec>) -> Self {
        Self {
            name: String::new(),
            format: BattleFormat::Single,
            weather: None,
            terrain: None,
            player,
            enemy,
        }
    }

    pub fn from_ron_str(text: &str) -> ConfigResult<Self> {
        let encounter: Encounter = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        encounter.validate()?;
        Ok(encounter)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.player.is_empty() || self.enemy.is_empty() {
            return Err(ConfigError::Invalid("both sides need at least one combatant".to_string()));
        }
        if self.player.iter().any(|spec| spec.boss_segments.is_some()) {
            return Err(ConfigError::Invalid("boss segments are for enemies only".to_string()));
        }
        self.player.iter().chain(&self.enemy).try_for_each(CombatantSpec::validate)
    }

    /// Builds the starting field with the encounter's leads sent out.
    pub fn build_field(&self) -> BattleResult<Field> {
        self.validate()?;
        let player = self.player.iter().map(CombatantSpec::build).collect();
        let enemy = self.enemy.iter().map(CombatantSpec::build).collect();
        let mut field = Field::new(self.format, player, enemy)?;
        field.weather = self.weather.map(|weather| WeatherState {
            weather,
            turns_remaining: 0,
        });
        field.terrain = self.terrain.map(|terrain| TerrainState {
            terrain,
            turns_remaining: 0,
        });
        Ok(field)
    }
}

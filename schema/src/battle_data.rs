use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Stats that carry a -6..=+6 stage during battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum BattleStat {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl BattleStat {
    /// The five stats a boss can be awarded on a shield break.
    pub const BOOSTABLE: [BattleStat; 5] = [
        BattleStat::Attack,
        BattleStat::Defense,
        BattleStat::SpecialAttack,
        BattleStat::SpecialDefense,
        BattleStat::Speed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BattleStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BattleStat::Attack => "ATK",
            BattleStat::Defense => "DEF",
            BattleStat::SpecialAttack => "SPATK",
            BattleStat::SpecialDefense => "SPDEF",
            BattleStat::Speed => "SPD",
            BattleStat::Accuracy => "ACC",
            BattleStat::Evasion => "EVA",
        };
        write!(f, "{}", name)
    }
}

/// Primary (non-volatile) status. At most one at a time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEffect {
    Paralysis,
    Poison,
    Toxic,
    Burn,
    Sleep,
    Freeze,
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherType {
    Sun,
    Rain,
    Sandstorm,
    Hail,
}

impl WeatherType {
    /// Weathers that chip non-immune combatants at the end of every turn.
    pub fn is_damaging(self) -> bool {
        matches!(self, WeatherType::Sandstorm | WeatherType::Hail)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainType {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

/// Effects placed on one side of the field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    Spikes,
    Tailwind,
}

impl SideCondition {
    pub const MAX_SPIKES_LAYERS: u8 = 3;

    /// Hazards stay until removed; everything else counts down.
    pub fn is_hazard(self) -> bool {
        matches!(self, SideCondition::Spikes)
    }
}

impl fmt::Display for SideCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            SideCondition::Reflect => "Reflect",
            SideCondition::LightScreen => "Light Screen",
            SideCondition::Spikes => "Spikes",
            SideCondition::Tailwind => "Tailwind",
        };
        write!(f, "{}", display_name)
    }
}

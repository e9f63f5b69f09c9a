use crate::BattleStat;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum HeldItem {
    Leftovers,
    QuickClaw,
    MultiLens,
    ScopeLens,
    RockyHelmet,
    LifeOrb,
    ReviverSeed,
}

impl HeldItem {
    /// Percent chance per turn to move first in its priority bracket.
    pub fn bypass_speed_chance(self) -> Option<u8> {
        match self {
            HeldItem::QuickClaw => Some(20),
            _ => None,
        }
    }

    /// Extra independent hits appended to a damaging move.
    pub fn extra_hits(self) -> u8 {
        match self {
            HeldItem::MultiLens => 1,
            _ => 0,
        }
    }

    pub fn crit_stage_bonus(self) -> u8 {
        match self {
            HeldItem::ScopeLens => 1,
            _ => 0,
        }
    }

    pub fn is_consumable(self) -> bool {
        matches!(self, HeldItem::ReviverSeed)
    }
}

impl fmt::Display for HeldItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A stat booster that lasts a number of battles rather than turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TempBoosterKind {
    pub stat: BattleStat,
    pub max_battles: u8,
}

impl TempBoosterKind {
    pub const X_ATTACK: TempBoosterKind = TempBoosterKind { stat: BattleStat::Attack, max_battles: 5 };
    pub const X_DEFENSE: TempBoosterKind = TempBoosterKind { stat: BattleStat::Defense, max_battles: 5 };
    pub const X_SPEED: TempBoosterKind = TempBoosterKind { stat: BattleStat::Speed, max_battles: 5 };
    pub const X_ACCURACY: TempBoosterKind = TempBoosterKind { stat: BattleStat::Accuracy, max_battles: 5 };
}

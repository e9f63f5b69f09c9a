use crate::{BattleStat, PokemonType, SideCondition, StatusEffect, TerrainType, WeatherType};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Who a move is aimed at when it is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MoveTarget {
    User,
    SelectedOpponent,
    /// Any other combatant on the field, ally or opponent.
    AnyOther,
    AllOpponents,
    AllOthers,
    /// Whoever last damaged the user this turn (Counter).
    Attacker,
    UserSide,
    OpponentSide,
    Field,
}

impl MoveTarget {
    /// Only single-target moves can be redirected.
    pub fn is_single_target(self) -> bool {
        matches!(self, MoveTarget::SelectedOpponent | MoveTarget::AnyOther)
    }

    pub fn is_spread(self) -> bool {
        matches!(self, MoveTarget::AllOpponents | MoveTarget::AllOthers)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u32 {
        const CONTACT = 1 << 0;
        const SOUND = 1 << 1;
        const IGNORE_PROTECT = 1 << 2;
        const IGNORE_SUBSTITUTE = 1 << 3;
        const BYPASS_REDIRECT = 1 << 4;
        const HIGH_CRIT = 1 << 5;
        const ALWAYS_CRIT = 1 << 6;
        const RECHARGE = 1 << 7;
        const CHECK_ALL_HITS = 1 << 8;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCount {
    Single,
    Fixed(u8),
    /// Weighted 2-5: 2 and 3 at 37.5% each, 4 and 5 at 12.5% each.
    TwoToFive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    User,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ProtectVariant {
    Protect,
    /// Contact attackers lose 1/8 of their max HP.
    SpikyShield,
    /// Contact attackers are poisoned.
    BanefulBunker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatileEffect {
    Substitute,
    Protect(ProtectVariant),
    Endure,
    LeechSeed,
    Bind,
    SaltCure,
    Disable,
    Encore,
    Taunt,
    LockOn,
    FocusEnergy,
    Bide,
    CenterOfAttention,
}

impl VolatileEffect {
    /// Whether the effect lands on the move's user rather than its target.
    pub fn on_user(self) -> bool {
        matches!(
            self,
            VolatileEffect::Substitute
                | VolatileEffect::Protect(_)
                | VolatileEffect::Endure
                | VolatileEffect::LockOn
                | VolatileEffect::FocusEnergy
                | VolatileEffect::Bide
                | VolatileEffect::CenterOfAttention
        )
    }
}

/// Composable secondary-effect descriptors. Each one is interpreted
/// independently by the engine, and every `chance` is rolled on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveEffect {
    InflictStatus { status: StatusEffect, chance: u8 },
    Flinch { chance: u8 },
    Confuse { chance: u8 },
    StatChange { target: EffectTarget, stat: BattleStat, stages: i8, chance: u8 },
    /// Percentage of the damage dealt this move.
    Recoil { percent: u8 },
    /// Percentage of the user's max HP, independent of damage dealt.
    RecoilMaxHp { percent: u8 },
    Drain { percent: u8 },
    Heal { percent: u8 },
    SelfKo,
    Volatile(VolatileEffect),
    SetSideCondition { condition: SideCondition, on_opponent: bool },
    SetWeather(WeatherType),
    SetTerrain(TerrainType),
    TrickRoom,
    ForceSwitch,
    BatonPass,
    AfterYou,
    SuppressAbility,
    DelayedAttack { turns: u8 },
    CounterDamage { multiplier: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveData {
    pub name: &'static str,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// `None` never misses.
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    pub priority: i8,
    pub target: MoveTarget,
    pub flags: MoveFlags,
    pub hits: HitCount,
    pub effects: &'static [MoveEffect],
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status
    }

    pub fn makes_contact(&self) -> bool {
        self.flags.contains(MoveFlags::CONTACT)
    }

    pub fn is_sound(&self) -> bool {
        self.flags.contains(MoveFlags::SOUND)
    }
}

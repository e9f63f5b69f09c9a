use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum AbilityId {
    None,
    Intimidate,
    Drizzle,
    Drought,
    SandStream,
    Forecast,
    SpeedBoost,
    Moxie,
    RoughSkin,
    Static,
    Prankster,
    StormDrain,
    LightningRod,
    Stalwart,
    MoldBreaker,
    Sturdy,
    MagicGuard,
    ClearBody,
    Levitate,
    SkillLink,
    NoGuard,
    Aftermath,
    Pressure,
    Stamina,
    Protean,
    Blaze,
    Torrent,
    SwiftSwim,
    PowerConstruct,
}

impl AbilityId {
    /// Abilities that keep working while suppressed.
    pub const UNSUPPRESSABLE: [AbilityId; 1] = [AbilityId::PowerConstruct];

    pub fn is_unsuppressable(self) -> bool {
        Self::UNSUPPRESSABLE.contains(&self)
    }

    /// Abilities a mold-breaking attacker looks straight through.
    pub fn is_breakable(self) -> bool {
        matches!(
            self,
            AbilityId::Sturdy
                | AbilityId::Levitate
                | AbilityId::ClearBody
                | AbilityId::StormDrain
                | AbilityId::LightningRod
        )
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

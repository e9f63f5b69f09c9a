use crate::move_types::*;
use crate::{BattleStat, PokemonType, SideCondition, StatusEffect, TerrainType, WeatherType};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum MoveId {
    Tackle,
    QuickAttack,
    Slash,
    DoubleSlap,
    DoubleEdge,
    Explosion,
    HyperBeam,
    HyperVoice,
    Swift,
    Wrap,
    Ember,
    Flamethrower,
    FlareBlitz,
    WaterGun,
    Surf,
    Thunderbolt,
    GigaDrain,
    Earthquake,
    DoubleKick,
    StormThrow,
    Counter,
    SaltCure,
    FutureSight,
    Bide,
    ThunderWave,
    Toxic,
    WillOWisp,
    Hypnosis,
    Protect,
    SpikyShield,
    BanefulBunker,
    Endure,
    Substitute,
    SwordsDance,
    Growl,
    FocusEnergy,
    LeechSeed,
    LockOn,
    Disable,
    Encore,
    Taunt,
    GastroAcid,
    Roar,
    BatonPass,
    AfterYou,
    FollowMe,
    Recover,
    TrickRoom,
    Reflect,
    LightScreen,
    Spikes,
    Tailwind,
    RainDance,
    SunnyDay,
    Sandstorm,
    GrassyTerrain,
    MistyTerrain,
    Struggle,
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data().name)
    }
}

const fn attack(
    name: &'static str,
    move_type: PokemonType,
    category: MoveCategory,
    power: u16,
    accuracy: Option<u8>,
    max_pp: u8,
) -> MoveData {
    MoveData {
        name,
        move_type,
        category,
        power,
        accuracy,
        max_pp,
        priority: 0,
        target: MoveTarget::SelectedOpponent,
        flags: MoveFlags::empty(),
        hits: HitCount::Single,
        effects: &[],
    }
}

const fn status(name: &'static str, move_type: PokemonType, accuracy: Option<u8>, max_pp: u8, target: MoveTarget) -> MoveData {
    MoveData {
        name,
        move_type,
        category: MoveCategory::Status,
        power: 0,
        accuracy,
        max_pp,
        priority: 0,
        target,
        flags: MoveFlags::empty(),
        hits: HitCount::Single,
        effects: &[],
    }
}

const CONTACT: MoveFlags = MoveFlags::CONTACT;

impl MoveId {
    /// The fallback used when nothing else in the moveset can be chosen.
    pub const FALLBACK: MoveId = MoveId::Struggle;

    pub fn data(self) -> MoveData {
        use MoveCategory::*;
        use PokemonType::*;

        match self {
            MoveId::Tackle => MoveData {
                flags: CONTACT,
                ..attack("Tackle", Normal, Physical, 40, Some(100), 35)
            },
            MoveId::QuickAttack => MoveData {
                priority: 1,
                flags: CONTACT,
                ..attack("Quick Attack", Normal, Physical, 40, Some(100), 30)
            },
            MoveId::Slash => MoveData {
                flags: CONTACT.union(MoveFlags::HIGH_CRIT),
                ..attack("Slash", Normal, Physical, 70, Some(100), 20)
            },
            MoveId::DoubleSlap => MoveData {
                flags: CONTACT,
                hits: HitCount::TwoToFive,
                ..attack("Double Slap", Normal, Physical, 15, Some(85), 10)
            },
            MoveId::DoubleEdge => MoveData {
                flags: CONTACT,
                effects: &[MoveEffect::Recoil { percent: 33 }],
                ..attack("Double-Edge", Normal, Physical, 120, Some(100), 15)
            },
            MoveId::Explosion => MoveData {
                target: MoveTarget::AllOthers,
                effects: &[MoveEffect::SelfKo],
                ..attack("Explosion", Normal, Physical, 250, Some(100), 5)
            },
            MoveId::HyperBeam => MoveData {
                flags: MoveFlags::RECHARGE,
                ..attack("Hyper Beam", Normal, Special, 150, Some(90), 5)
            },
            MoveId::HyperVoice => MoveData {
                target: MoveTarget::AllOpponents,
                flags: MoveFlags::SOUND,
                ..attack("Hyper Voice", Normal, Special, 90, Some(100), 10)
            },
            MoveId::Swift => MoveData {
                target: MoveTarget::AllOpponents,
                ..attack("Swift", Normal, Special, 60, None, 20)
            },
            MoveId::Wrap => MoveData {
                flags: CONTACT,
                effects: &[MoveEffect::Volatile(VolatileEffect::Bind)],
                ..attack("Wrap", Normal, Physical, 15, Some(90), 20)
            },
            MoveId::Ember => MoveData {
                effects: &[MoveEffect::InflictStatus { status: StatusEffect::Burn, chance: 10 }],
                ..attack("Ember", Fire, Special, 40, Some(100), 25)
            },
            MoveId::Flamethrower => MoveData {
                effects: &[MoveEffect::InflictStatus { status: StatusEffect::Burn, chance: 10 }],
                ..attack("Flamethrower", Fire, Special, 90, Some(100), 15)
            },
            MoveId::FlareBlitz => MoveData {
                flags: CONTACT,
                effects: &[
                    MoveEffect::Recoil { percent: 33 },
                    MoveEffect::InflictStatus { status: StatusEffect::Burn, chance: 10 },
                ],
                ..attack("Flare Blitz", Fire, Physical, 120, Some(100), 15)
            },
            MoveId::WaterGun => attack("Water Gun", Water, Special, 40, Some(100), 25),
            MoveId::Surf => MoveData {
                target: MoveTarget::AllOthers,
                ..attack("Surf", Water, Special, 90, Some(100), 15)
            },
            MoveId::Thunderbolt => MoveData {
                effects: &[MoveEffect::InflictStatus { status: StatusEffect::Paralysis, chance: 10 }],
                ..attack("Thunderbolt", Electric, Special, 90, Some(100), 15)
            },
            MoveId::GigaDrain => MoveData {
                effects: &[MoveEffect::Drain { percent: 50 }],
                ..attack("Giga Drain", Grass, Special, 75, Some(100), 10)
            },
            MoveId::Earthquake => MoveData {
                target: MoveTarget::AllOthers,
                ..attack("Earthquake", Ground, Physical, 100, Some(100), 10)
            },
            MoveId::DoubleKick => MoveData {
                flags: CONTACT,
                hits: HitCount::Fixed(2),
                ..attack("Double Kick", Fighting, Physical, 30, Some(100), 30)
            },
            MoveId::StormThrow => MoveData {
                flags: CONTACT.union(MoveFlags::ALWAYS_CRIT),
                ..attack("Storm Throw", Fighting, Physical, 60, Some(100), 10)
            },
            MoveId::Counter => MoveData {
                priority: -5,
                target: MoveTarget::Attacker,
                flags: CONTACT.union(MoveFlags::BYPASS_REDIRECT),
                effects: &[MoveEffect::CounterDamage { multiplier: 2 }],
                ..attack("Counter", Fighting, Physical, 0, Some(100), 20)
            },
            MoveId::SaltCure => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::SaltCure)],
                ..attack("Salt Cure", Rock, Physical, 40, Some(100), 15)
            },
            MoveId::FutureSight => MoveData {
                effects: &[MoveEffect::DelayedAttack { turns: 2 }],
                ..attack("Future Sight", Psychic, Special, 120, None, 10)
            },
            MoveId::Bide => MoveData {
                priority: 1,
                target: MoveTarget::User,
                flags: CONTACT.union(MoveFlags::BYPASS_REDIRECT),
                effects: &[MoveEffect::Volatile(VolatileEffect::Bide)],
                ..attack("Bide", Normal, Physical, 0, None, 10)
            },
            MoveId::ThunderWave => MoveData {
                effects: &[MoveEffect::InflictStatus { status: StatusEffect::Paralysis, chance: 100 }],
                ..status("Thunder Wave", Electric, Some(90), 20, MoveTarget::SelectedOpponent)
            },
            MoveId::Toxic => MoveData {
                effects: &[MoveEffect::InflictStatus { status: StatusEffect::Toxic, chance: 100 }],
                ..status("Toxic", Poison, Some(90), 10, MoveTarget::SelectedOpponent)
            },
            MoveId::WillOWisp => MoveData {
                effects: &[MoveEffect::InflictStatus { status: StatusEffect::Burn, chance: 100 }],
                ..status("Will-O-Wisp", Fire, Some(85), 15, MoveTarget::SelectedOpponent)
            },
            MoveId::Hypnosis => MoveData {
                effects: &[MoveEffect::InflictStatus { status: StatusEffect::Sleep, chance: 100 }],
                ..status("Hypnosis", Psychic, Some(60), 20, MoveTarget::SelectedOpponent)
            },
            MoveId::Protect => MoveData {
                priority: 4,
                effects: &[MoveEffect::Volatile(VolatileEffect::Protect(ProtectVariant::Protect))],
                ..status("Protect", Normal, None, 10, MoveTarget::User)
            },
            MoveId::SpikyShield => MoveData {
                priority: 4,
                effects: &[MoveEffect::Volatile(VolatileEffect::Protect(ProtectVariant::SpikyShield))],
                ..status("Spiky Shield", Grass, None, 10, MoveTarget::User)
            },
            MoveId::BanefulBunker => MoveData {
                priority: 4,
                effects: &[MoveEffect::Volatile(VolatileEffect::Protect(ProtectVariant::BanefulBunker))],
                ..status("Baneful Bunker", Poison, None, 10, MoveTarget::User)
            },
            MoveId::Endure => MoveData {
                priority: 4,
                effects: &[MoveEffect::Volatile(VolatileEffect::Endure)],
                ..status("Endure", Normal, None, 10, MoveTarget::User)
            },
            MoveId::Substitute => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::Substitute)],
                ..status("Substitute", Normal, None, 10, MoveTarget::User)
            },
            MoveId::SwordsDance => MoveData {
                effects: &[MoveEffect::StatChange {
                    target: EffectTarget::User,
                    stat: BattleStat::Attack,
                    stages: 2,
                    chance: 100,
                }],
                ..status("Swords Dance", Normal, None, 20, MoveTarget::User)
            },
            MoveId::Growl => MoveData {
                flags: MoveFlags::SOUND,
                effects: &[MoveEffect::StatChange {
                    target: EffectTarget::Target,
                    stat: BattleStat::Attack,
                    stages: -1,
                    chance: 100,
                }],
                ..status("Growl", Normal, Some(100), 40, MoveTarget::AllOpponents)
            },
            MoveId::FocusEnergy => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::FocusEnergy)],
                ..status("Focus Energy", Normal, None, 30, MoveTarget::User)
            },
            MoveId::LeechSeed => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::LeechSeed)],
                ..status("Leech Seed", Grass, Some(90), 10, MoveTarget::SelectedOpponent)
            },
            MoveId::LockOn => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::LockOn)],
                ..status("Lock-On", Normal, None, 5, MoveTarget::SelectedOpponent)
            },
            MoveId::Disable => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::Disable)],
                ..status("Disable", Normal, Some(100), 20, MoveTarget::SelectedOpponent)
            },
            MoveId::Encore => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::Encore)],
                ..status("Encore", Normal, Some(100), 5, MoveTarget::SelectedOpponent)
            },
            MoveId::Taunt => MoveData {
                effects: &[MoveEffect::Volatile(VolatileEffect::Taunt)],
                ..status("Taunt", Dark, Some(100), 20, MoveTarget::SelectedOpponent)
            },
            MoveId::GastroAcid => MoveData {
                effects: &[MoveEffect::SuppressAbility],
                ..status("Gastro Acid", Poison, Some(100), 10, MoveTarget::SelectedOpponent)
            },
            MoveId::Roar => MoveData {
                priority: -6,
                flags: MoveFlags::SOUND.union(MoveFlags::IGNORE_SUBSTITUTE),
                effects: &[MoveEffect::ForceSwitch],
                ..status("Roar", Normal, None, 20, MoveTarget::SelectedOpponent)
            },
            MoveId::BatonPass => MoveData {
                effects: &[MoveEffect::BatonPass],
                ..status("Baton Pass", Normal, None, 40, MoveTarget::User)
            },
            MoveId::AfterYou => MoveData {
                flags: MoveFlags::IGNORE_PROTECT
                    .union(MoveFlags::IGNORE_SUBSTITUTE)
                    .union(MoveFlags::BYPASS_REDIRECT),
                effects: &[MoveEffect::AfterYou],
                ..status("After You", Normal, None, 15, MoveTarget::AnyOther)
            },
            MoveId::FollowMe => MoveData {
                priority: 2,
                effects: &[MoveEffect::Volatile(VolatileEffect::CenterOfAttention)],
                ..status("Follow Me", Normal, None, 20, MoveTarget::User)
            },
            MoveId::Recover => MoveData {
                effects: &[MoveEffect::Heal { percent: 50 }],
                ..status("Recover", Normal, None, 5, MoveTarget::User)
            },
            MoveId::TrickRoom => MoveData {
                priority: -7,
                effects: &[MoveEffect::TrickRoom],
                ..status("Trick Room", Psychic, None, 5, MoveTarget::Field)
            },
            MoveId::Reflect => MoveData {
                effects: &[MoveEffect::SetSideCondition { condition: SideCondition::Reflect, on_opponent: false }],
                ..status("Reflect", Psychic, None, 20, MoveTarget::UserSide)
            },
            MoveId::LightScreen => MoveData {
                effects: &[MoveEffect::SetSideCondition { condition: SideCondition::LightScreen, on_opponent: false }],
                ..status("Light Screen", Psychic, None, 30, MoveTarget::UserSide)
            },
            MoveId::Spikes => MoveData {
                effects: &[MoveEffect::SetSideCondition { condition: SideCondition::Spikes, on_opponent: true }],
                ..status("Spikes", Ground, None, 20, MoveTarget::OpponentSide)
            },
            MoveId::Tailwind => MoveData {
                effects: &[MoveEffect::SetSideCondition { condition: SideCondition::Tailwind, on_opponent: false }],
                ..status("Tailwind", Flying, None, 15, MoveTarget::UserSide)
            },
            MoveId::RainDance => MoveData {
                effects: &[MoveEffect::SetWeather(WeatherType::Rain)],
                ..status("Rain Dance", Water, None, 5, MoveTarget::Field)
            },
            MoveId::SunnyDay => MoveData {
                effects: &[MoveEffect::SetWeather(WeatherType::Sun)],
                ..status("Sunny Day", Fire, None, 5, MoveTarget::Field)
            },
            MoveId::Sandstorm => MoveData {
                effects: &[MoveEffect::SetWeather(WeatherType::Sandstorm)],
                ..status("Sandstorm", Rock, None, 10, MoveTarget::Field)
            },
            MoveId::GrassyTerrain => MoveData {
                effects: &[MoveEffect::SetTerrain(TerrainType::Grassy)],
                ..status("Grassy Terrain", Grass, None, 10, MoveTarget::Field)
            },
            MoveId::MistyTerrain => MoveData {
                effects: &[MoveEffect::SetTerrain(TerrainType::Misty)],
                ..status("Misty Terrain", Fairy, None, 10, MoveTarget::Field)
            },
            MoveId::Struggle => MoveData {
                flags: CONTACT,
                effects: &[MoveEffect::RecoilMaxHp { percent: 25 }],
                ..attack("Struggle", Typeless, Physical, 50, None, 1)
            },
        }
    }

    /// Moves that can never be disabled, encored away from or run out of PP.
    pub fn is_fallback(self) -> bool {
        self == Self::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_move_has_consistent_data() {
        for id in MoveId::iter() {
            let data = id.data();
            assert!(data.max_pp > 0, "{:?} has no PP", id);
            if data.category == MoveCategory::Status {
                assert_eq!(data.power, 0, "{:?} is a status move with power", id);
            }
            for effect in data.effects {
                if let MoveEffect::InflictStatus { chance, .. } | MoveEffect::Flinch { chance } = effect {
                    assert!(*chance <= 100);
                }
            }
        }
    }

    #[test]
    fn test_protect_family_shares_priority() {
        for id in [MoveId::Protect, MoveId::SpikyShield, MoveId::BanefulBunker, MoveId::Endure] {
            assert_eq!(id.data().priority, 4);
        }
    }
}

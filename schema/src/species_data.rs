use crate::{AbilityId, PokemonType};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    const fn new(hp: u8, attack: u8, defense: u8, sp_attack: u8, sp_defense: u8, speed: u8) -> Self {
        Self { hp, attack, defense, sp_attack, sp_defense, speed }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesData {
    pub name: &'static str,
    pub types: &'static [PokemonType],
    pub base_stats: BaseStats,
    pub ability: AbilityId,
    /// The form a form-change ability turns this species into.
    pub complete_form: Option<SpeciesId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum SpeciesId {
    Pikachu,
    Charizard,
    Blastoise,
    Venusaur,
    Gengar,
    Garchomp,
    Gyarados,
    Snorlax,
    Krookodile,
    Blaziken,
    Pelipper,
    Torkoal,
    Tyranitar,
    Haxorus,
    Clefable,
    Castform,
    Whimsicott,
    Magikarp,
    Eternatus,
    Zygarde,
    ZygardeComplete,
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data().name)
    }
}

impl SpeciesId {
    pub fn data(self) -> SpeciesData {
        use PokemonType::*;

        let (name, types, base_stats, ability): (&'static str, &'static [PokemonType], BaseStats, AbilityId) =
            match self {
                SpeciesId::Pikachu => ("Pikachu", &[Electric], BaseStats::new(35, 55, 40, 50, 50, 90), AbilityId::Static),
                SpeciesId::Charizard => (
                    "Charizard",
                    &[Fire, Flying],
                    BaseStats::new(78, 84, 78, 109, 85, 100),
                    AbilityId::Blaze,
                ),
                SpeciesId::Blastoise => (
                    "Blastoise",
                    &[Water],
                    BaseStats::new(79, 83, 100, 85, 105, 78),
                    AbilityId::Torrent,
                ),
                SpeciesId::Venusaur => (
                    "Venusaur",
                    &[Grass, Poison],
                    BaseStats::new(80, 82, 83, 100, 100, 80),
                    AbilityId::None,
                ),
                SpeciesId::Gengar => (
                    "Gengar",
                    &[Ghost, Poison],
                    BaseStats::new(60, 65, 60, 130, 75, 110),
                    AbilityId::Levitate,
                ),
                SpeciesId::Garchomp => (
                    "Garchomp",
                    &[Dragon, Ground],
                    BaseStats::new(108, 130, 95, 80, 85, 102),
                    AbilityId::RoughSkin,
                ),
                SpeciesId::Gyarados => (
                    "Gyarados",
                    &[Water, Flying],
                    BaseStats::new(95, 125, 79, 60, 100, 81),
                    AbilityId::Intimidate,
                ),
                SpeciesId::Snorlax => ("Snorlax", &[Normal], BaseStats::new(160, 110, 65, 65, 110, 30), AbilityId::None),
                SpeciesId::Krookodile => (
                    "Krookodile",
                    &[Ground, Dark],
                    BaseStats::new(95, 117, 80, 65, 70, 92),
                    AbilityId::Moxie,
                ),
                SpeciesId::Blaziken => (
                    "Blaziken",
                    &[Fire, Fighting],
                    BaseStats::new(80, 120, 70, 110, 70, 80),
                    AbilityId::SpeedBoost,
                ),
                SpeciesId::Pelipper => (
                    "Pelipper",
                    &[Water, Flying],
                    BaseStats::new(60, 50, 100, 95, 70, 65),
                    AbilityId::Drizzle,
                ),
                SpeciesId::Torkoal => ("Torkoal", &[Fire], BaseStats::new(70, 85, 140, 85, 70, 20), AbilityId::Drought),
                SpeciesId::Tyranitar => (
                    "Tyranitar",
                    &[Rock, Dark],
                    BaseStats::new(100, 134, 110, 95, 100, 61),
                    AbilityId::SandStream,
                ),
                SpeciesId::Haxorus => ("Haxorus", &[Dragon], BaseStats::new(76, 147, 90, 60, 70, 97), AbilityId::MoldBreaker),
                SpeciesId::Clefable => ("Clefable", &[Fairy], BaseStats::new(95, 70, 73, 95, 90, 60), AbilityId::MagicGuard),
                SpeciesId::Castform => ("Castform", &[Normal], BaseStats::new(70, 70, 70, 70, 70, 70), AbilityId::Forecast),
                SpeciesId::Whimsicott => (
                    "Whimsicott",
                    &[Grass, Fairy],
                    BaseStats::new(60, 67, 85, 77, 75, 116),
                    AbilityId::Prankster,
                ),
                SpeciesId::Magikarp => ("Magikarp", &[Water], BaseStats::new(20, 10, 55, 15, 20, 80), AbilityId::SwiftSwim),
                SpeciesId::Eternatus => (
                    "Eternatus",
                    &[Poison, Dragon],
                    BaseStats::new(140, 85, 95, 145, 95, 130),
                    AbilityId::Pressure,
                ),
                SpeciesId::Zygarde => (
                    "Zygarde",
                    &[Dragon, Ground],
                    BaseStats::new(108, 100, 121, 81, 95, 95),
                    AbilityId::PowerConstruct,
                ),
                SpeciesId::ZygardeComplete => (
                    "Zygarde Complete",
                    &[Dragon, Ground],
                    BaseStats::new(216, 100, 121, 91, 95, 85),
                    AbilityId::PowerConstruct,
                ),
            };

        SpeciesData {
            name,
            types,
            base_stats,
            ability,
            complete_form: match self {
                SpeciesId::Zygarde => Some(SpeciesId::ZygardeComplete),
                _ => None,
            },
        }
    }
}

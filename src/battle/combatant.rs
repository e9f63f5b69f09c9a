use crate::battle::conditions::{TagKind, VolatileCondition, VolatileTag};
use schema::{
    AbilityId, BaseStats, BattleStat, HeldItem, MoveCategory, MoveId, PokemonType, SpeciesId, StatusEffect,
    TempBoosterKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a combatant in the field's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub usize);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SideId {
    Player,
    Enemy,
}

impl SideId {
    pub const BOTH: [SideId; 2] = [SideId::Player, SideId::Enemy];

    pub fn index(self) -> usize {
        match self {
            SideId::Player => 0,
            SideId::Enemy => 1,
        }
    }

    pub fn opponent(self) -> SideId {
        match self {
            SideId::Player => SideId::Enemy,
            SideId::Enemy => SideId::Player,
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl Stats {
    const IV: u32 = 31;

    pub fn from_base(base: &BaseStats, level: u8) -> Self {
        let level = level as u32;
        let other = |b: u8| (2 * b as u32 + Self::IV) * level / 100 + 5;
        Self {
            hp: (2 * base.hp as u32 + Self::IV) * level / 100 + level + 10,
            attack: other(base.attack),
            defense: other(base.defense),
            sp_attack: other(base.sp_attack),
            sp_defense: other(base.sp_defense),
            speed: other(base.speed),
        }
    }

    /// Raw stat value. Accuracy and evasion have no raw value and return 1.
    pub fn get(&self, stat: BattleStat) -> u32 {
        match stat {
            BattleStat::Attack => self.attack,
            BattleStat::Defense => self.defense,
            BattleStat::SpecialAttack => self.sp_attack,
            BattleStat::SpecialDefense => self.sp_defense,
            BattleStat::Speed => self.speed,
            BattleStat::Accuracy | BattleStat::Evasion => 1,
        }
    }
}

/// Result of trying to move a stat stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageChange {
    Changed { old: i8, new: i8 },
    /// Already at the bound in the requested direction.
    NoEffect { stage: i8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatStages([i8; 7]);

impl StatStages {
    pub const MIN: i8 = -6;
    pub const MAX: i8 = 6;

    pub fn get(&self, stat: BattleStat) -> i8 {
        self.0[stat.index()]
    }

    pub fn apply(&mut self, stat: BattleStat, delta: i8) -> StageChange {
        let old = self.get(stat);
        let new = (old as i16 + delta as i16).clamp(Self::MIN as i16, Self::MAX as i16) as i8;
        if new == old {
            return StageChange::NoEffect { stage: old };
        }
        self.0[stat.index()] = new;
        StageChange::Changed { old, new }
    }

    pub fn reset(&mut self) {
        self.0 = [0; 7];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: MoveId,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    pub fn new(move_id: MoveId) -> Self {
        let max_pp = move_id.data().max_pp;
        Self { move_id, pp: max_pp, max_pp }
    }
}

/// What last took HP away from a combatant. Decides whether a knockout counts
/// as a direct hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    DirectHit { attacker: CombatantId, move_id: MoveId },
    Recoil,
    StatusTick,
    Weather,
    Binding,
    LeechSeed,
    SaltCure,
    Delayed,
    Confusion,
    /// Retaliation from an ability or item on contact.
    Contact,
    ItemRecoil,
    Hazard,
    SelfKo,
}

impl DamageSource {
    pub fn is_direct(&self) -> bool {
        matches!(self, DamageSource::DirectHit { .. })
    }

    pub fn direct_attacker(&self) -> Option<CombatantId> {
        match self {
            DamageSource::DirectHit { attacker, .. } => Some(*attacker),
            _ => None,
        }
    }
}

/// A direct hit received this turn (Counter and Bide read these).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub attacker: CombatantId,
    pub move_id: MoveId,
    pub category: MoveCategory,
    pub damage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnData {
    pub acted: bool,
    pub hits_left: u8,
    pub hit_count: u8,
    pub damage_dealt: u32,
    pub attacks_received: Vec<AttackRecord>,
    pub protected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossSegments {
    pub segment_count: u8,
    pub current_index: u8,
}

impl BossSegments {
    pub fn new(segment_count: u8) -> Self {
        let segment_count = segment_count.max(1);
        Self {
            segment_count,
            current_index: segment_count - 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempBooster {
    pub kind: TempBoosterKind,
    pub battles_remaining: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoosterGrant {
    Added,
    Renewed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub side: SideId,
    pub species: SpeciesId,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub stats: Stats,
    pub stages: StatStages,
    hp: u32,
    pub status: Option<StatusEffect>,
    /// Sleep turns left, or the toxic counter.
    pub status_turns: u8,
    pub tags: Vec<VolatileTag>,
    pub moves: Vec<MoveSlot>,
    pub item: Option<HeldItem>,
    pub ability: AbilityId,
    pub ability_suppressed: bool,
    pub boss: Option<BossSegments>,
    pub temp_boosters: Vec<TempBooster>,
    pub last_move: Option<MoveId>,
    pub last_damage_source: Option<DamageSource>,
    pub turn_data: TurnData,
    pub protect_streak: u8,
    pub form_changed: bool,
    /// A faint phase is already queued for this combatant.
    pub faint_pending: bool,
}

impl Combatant {
    pub fn new(species: SpeciesId, level: u8, moves: &[MoveId]) -> Self {
        let data = species.data();
        let stats = Stats::from_base(&data.base_stats, level);
        Self {
            id: CombatantId(0),
            side: SideId::Player,
            species,
            level,
            types: data.types.to_vec(),
            stats,
            stages: StatStages::default(),
            hp: stats.hp,
            status: None,
            status_turns: 0,
            tags: Vec::new(),
            moves: moves.iter().take(4).map(|&m| MoveSlot::new(m)).collect(),
            item: None,
            ability: data.ability,
            ability_suppressed: false,
            boss: None,
            temp_boosters: Vec::new(),
            last_move: None,
            last_damage_source: None,
            turn_data: TurnData::default(),
            protect_streak: 0,
            form_changed: false,
            faint_pending: false,
        }
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = ability;
        self
    }

    pub fn with_item(mut self, item: HeldItem) -> Self {
        self.item = Some(item);
        self
    }

    pub fn as_boss(mut self, segment_count: u8) -> Self {
        self.boss = Some(BossSegments::new(segment_count));
        self
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    /// Sets HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp());
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Removes up to `amount` HP and returns how much was actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restores up to `amount` HP and returns how much was actually restored.
    /// Fainted combatants cannot be healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_fainted() {
            return 0;
        }
        let healed = amount.min(self.max_hp() - self.hp);
        self.hp += healed;
        healed
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    pub fn stage(&self, stat: BattleStat) -> i8 {
        self.stages.get(stat)
    }

    pub fn has_tag(&self, kind: TagKind) -> bool {
        self.tags.iter().any(|t| t.kind() == kind)
    }

    pub fn tag(&self, kind: TagKind) -> Option<&VolatileTag> {
        self.tags.iter().find(|t| t.kind() == kind)
    }

    pub fn tag_mut(&mut self, kind: TagKind) -> Option<&mut VolatileTag> {
        self.tags.iter_mut().find(|t| t.kind() == kind)
    }

    /// Adds a tag, replacing any existing tag of the same kind.
    pub fn add_tag(&mut self, tag: VolatileTag) {
        let kind = tag.kind();
        self.tags.retain(|t| t.kind() != kind);
        self.tags.push(tag);
    }

    pub fn remove_tag(&mut self, kind: TagKind) -> Option<VolatileTag> {
        let index = self.tags.iter().position(|t| t.kind() == kind)?;
        Some(self.tags.remove(index))
    }

    pub fn substitute_hp(&self) -> Option<u32> {
        match self.tag(TagKind::Substitute).map(|t| &t.condition) {
            Some(VolatileCondition::Substitute { hp }) => Some(*hp),
            _ => None,
        }
    }

    pub fn disabled_move(&self) -> Option<MoveId> {
        match self.tag(TagKind::Disabled).map(|t| &t.condition) {
            Some(VolatileCondition::Disabled { pokemon_move }) => Some(*pokemon_move),
            _ => None,
        }
    }

    pub fn encored_move(&self) -> Option<MoveId> {
        match self.tag(TagKind::Encore).map(|t| &t.condition) {
            Some(VolatileCondition::Encore { pokemon_move }) => Some(*pokemon_move),
            _ => None,
        }
    }

    pub fn move_slot(&self, move_id: MoveId) -> Option<&MoveSlot> {
        self.moves.iter().find(|slot| slot.move_id == move_id)
    }

    pub fn move_slot_mut(&mut self, move_id: MoveId) -> Option<&mut MoveSlot> {
        self.moves.iter_mut().find(|slot| slot.move_id == move_id)
    }

    /// Grants a battle-count booster. Re-acquiring an active booster resets its
    /// counter instead of stacking a second copy.
    pub fn grant_temp_booster(&mut self, kind: TempBoosterKind) -> BoosterGrant {
        if let Some(existing) = self.temp_boosters.iter_mut().find(|b| b.kind == kind) {
            existing.battles_remaining = kind.max_battles;
            return BoosterGrant::Renewed;
        }
        self.temp_boosters.push(TempBooster {
            kind,
            battles_remaining: kind.max_battles,
        });
        BoosterGrant::Added
    }

    /// Called once per finished battle.
    pub fn tick_temp_boosters(&mut self) {
        for booster in &mut self.temp_boosters {
            booster.battles_remaining = booster.battles_remaining.saturating_sub(1);
        }
        self.temp_boosters.retain(|b| b.battles_remaining > 0);
    }

    /// Switches species in place, refilling HP to the new maximum.
    pub fn change_form(&mut self, species: SpeciesId) {
        let data = species.data();
        self.species = species;
        self.stats = Stats::from_base(&data.base_stats, self.level);
        self.types = data.types.to_vec();
        self.hp = self.stats.hp;
        self.form_changed = true;
    }

    /// Clears everything that does not survive leaving the field.
    pub fn reset_on_switch_out(&mut self) {
        self.tags.clear();
        self.stages.reset();
        self.turn_data = TurnData::default();
        self.protect_streak = 0;
        self.ability_suppressed = false;
        self.types = self.species.data().types.to_vec();
        if self.status == Some(StatusEffect::Toxic) {
            self.status_turns = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_damage_and_heal_stay_in_bounds() {
        let mut pokemon = Combatant::new(SpeciesId::Pikachu, 50, &[MoveId::Tackle]);
        let max = pokemon.max_hp();

        assert_eq!(pokemon.take_damage(max + 50), max);
        assert!(pokemon.is_fainted());
        assert_eq!(pokemon.heal(10), 0);

        pokemon.set_hp(1);
        assert_eq!(pokemon.heal(max * 2), max - 1);
        assert_eq!(pokemon.hp(), max);
    }

    #[test]
    fn test_stage_clamps_and_reports_no_effect() {
        let mut stages = StatStages::default();
        assert_eq!(stages.apply(BattleStat::Attack, 4), StageChange::Changed { old: 0, new: 4 });
        assert_eq!(stages.apply(BattleStat::Attack, 4), StageChange::Changed { old: 4, new: 6 });
        assert_eq!(stages.apply(BattleStat::Attack, 1), StageChange::NoEffect { stage: 6 });
        assert_eq!(stages.apply(BattleStat::Speed, -12), StageChange::Changed { old: 0, new: -6 });
        assert_eq!(stages.apply(BattleStat::Speed, -1), StageChange::NoEffect { stage: -6 });
    }

    #[test]
    fn test_temp_boosters_renew_instead_of_stacking() {
        let mut pokemon = Combatant::new(SpeciesId::Snorlax, 50, &[MoveId::Tackle]);
        assert_eq!(pokemon.grant_temp_booster(TempBoosterKind::X_ATTACK), BoosterGrant::Added);
        pokemon.tick_temp_boosters();
        pokemon.tick_temp_boosters();
        assert_eq!(pokemon.temp_boosters[0].battles_remaining, 3);

        assert_eq!(pokemon.grant_temp_booster(TempBoosterKind::X_ATTACK), BoosterGrant::Renewed);
        assert_eq!(pokemon.temp_boosters.len(), 1);
        assert_eq!(pokemon.temp_boosters[0].battles_remaining, 5);

        for _ in 0..5 {
            pokemon.tick_temp_boosters();
        }
        assert!(pokemon.temp_boosters.is_empty());
    }

    #[test]
    fn test_stats_follow_level_formula() {
        let pokemon = Combatant::new(SpeciesId::Snorlax, 50, &[]);
        // (2 * 160 + 31) * 50 / 100 + 50 + 10
        assert_eq!(pokemon.max_hp(), 235);
        // (2 * 30 + 31) * 50 / 100 + 5
        assert_eq!(pokemon.stats.speed, 50);
    }
}

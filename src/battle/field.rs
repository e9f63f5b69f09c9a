use crate::battle::combatant::{Combatant, CombatantId, SideId};
use crate::errors::{BattleResult, BattleStateError};
use schema::{MoveId, SideCondition, TerrainType, WeatherType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleFormat {
    Single,
    Double,
}

impl BattleFormat {
    pub fn active_slots(self) -> usize {
        match self {
            BattleFormat::Single => 1,
            BattleFormat::Double => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideTag {
    pub condition: SideCondition,
    /// `None` for hazards, which stay until removed.
    pub turns_remaining: Option<u8>,
    pub layers: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub id: SideId,
    /// Party order; index into this is what a switch command names.
    pub party: Vec<CombatantId>,
    pub active: Vec<Option<CombatantId>>,
    pub conditions: Vec<SideTag>,
}

impl Side {
    pub fn condition(&self, condition: SideCondition) -> Option<&SideTag> {
        self.conditions.iter().find(|t| t.condition == condition)
    }

    pub fn has_condition(&self, condition: SideCondition) -> bool {
        self.condition(condition).is_some()
    }

    pub fn slot_of(&self, id: CombatantId) -> Option<usize> {
        self.active.iter().position(|a| *a == Some(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    pub weather: WeatherType,
    pub turns_remaining: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainState {
    pub terrain: TerrainType,
    pub turns_remaining: u8,
}

/// A Future Sight style attack waiting to land on whoever holds a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedAttack {
    pub source: CombatantId,
    pub move_id: MoveId,
    pub target_side: SideId,
    pub slot: usize,
    pub turns_remaining: u8,
    pub damage: u32,
}

/// Arena of every combatant in the battle plus everything that is not owned by
/// a single combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub format: BattleFormat,
    pub combatants: Vec<Combatant>,
    pub sides: [Side; 2],
    pub weather: Option<WeatherState>,
    pub terrain: Option<TerrainState>,
    /// Trick Room: turns left while speed order is reversed.
    pub trick_room: Option<u8>,
    pub delayed_attacks: Vec<DelayedAttack>,
    pub turn: u32,
}

impl Field {
    /// Builds the arena, assigning ids in order (player party first) and sending
    /// out the first members of each party.
    pub fn new(format: BattleFormat, player: Vec<Combatant>, enemy: Vec<Combatant>) -> BattleResult<Self> {
        if player.is_empty() {
            return Err(BattleStateError::EmptyParty(SideId::Player.index()).into());
        }
        if enemy.is_empty() {
            return Err(BattleStateError::EmptyParty(SideId::Enemy.index()).into());
        }

        let mut combatants = Vec::with_capacity(player.len() + enemy.len());
        let mut sides = SideId::BOTH.map(|id| Side {
            id,
            party: Vec::new(),
            active: vec![None; format.active_slots()],
            conditions: Vec::new(),
        });

        for (side, members) in [(SideId::Player, player), (SideId::Enemy, enemy)] {
            for mut combatant in members {
                let id = CombatantId(combatants.len());
                combatant.id = id;
                combatant.side = side;
                sides[side.index()].party.push(id);
                combatants.push(combatant);
            }
        }

        for side in &mut sides {
            let party = side.party.clone();
            for (slot, id) in party.into_iter().take(format.active_slots()).enumerate() {
                side.active[slot] = Some(id);
            }
        }

        Ok(Self {
            format,
            combatants,
            sides,
            weather: None,
            terrain: None,
            trick_room: None,
            delayed_attacks: Vec::new(),
            turn: 1,
        })
    }

    pub fn get(&self, id: CombatantId) -> &Combatant {
        &self.combatants[id.0]
    }

    pub fn get_mut(&mut self, id: CombatantId) -> &mut Combatant {
        &mut self.combatants[id.0]
    }

    pub fn try_get(&self, id: CombatantId) -> BattleResult<&Combatant> {
        self.combatants
            .get(id.0)
            .ok_or_else(|| BattleStateError::UnknownCombatant(id).into())
    }

    pub fn side(&self, side: SideId) -> &Side {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: SideId) -> &mut Side {
        &mut self.sides[side.index()]
    }

    pub fn side_of(&self, id: CombatantId) -> SideId {
        self.get(id).side
    }

    pub fn is_active(&self, id: CombatantId) -> bool {
        self.side(self.side_of(id)).slot_of(id).is_some()
    }

    pub fn slot_of(&self, id: CombatantId) -> Option<usize> {
        self.side(self.side_of(id)).slot_of(id)
    }

    /// Active, non-fainted combatants on one side in slot order.
    pub fn active_on(&self, side: SideId) -> Vec<CombatantId> {
        self.side(side)
            .active
            .iter()
            .flatten()
            .copied()
            .filter(|id| !self.get(*id).is_fainted())
            .collect()
    }

    /// Active, non-fainted combatants, player side first.
    pub fn active_ids(&self) -> Vec<CombatantId> {
        SideId::BOTH.iter().flat_map(|s| self.active_on(*s)).collect()
    }

    pub fn opponents_of(&self, id: CombatantId) -> Vec<CombatantId> {
        self.active_on(self.side_of(id).opponent())
    }

    pub fn allies_of(&self, id: CombatantId) -> Vec<CombatantId> {
        self.active_on(self.side_of(id))
            .into_iter()
            .filter(|other| *other != id)
            .collect()
    }

    /// Party members that could be sent in: alive and not already on the field.
    pub fn bench(&self, side: SideId) -> Vec<(usize, CombatantId)> {
        let s = self.side(side);
        s.party
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, id)| !self.get(*id).is_fainted() && s.slot_of(*id).is_none())
            .collect()
    }

    /// Whether the side still has anyone who can fight.
    pub fn has_remaining(&self, side: SideId) -> bool {
        self.side(side).party.iter().any(|id| !self.get(*id).is_fainted())
    }

    pub fn weather(&self) -> Option<WeatherType> {
        self.weather.map(|w| w.weather)
    }

    pub fn terrain(&self) -> Option<TerrainType> {
        self.terrain.map(|t| t.terrain)
    }

    /// The reversed-order flag: speed comparisons are inverted while set.
    pub fn order_reversed(&self) -> bool {
        self.trick_room.is_some()
    }

    /// Checks the id links a restored snapshot relies on.
    pub fn validate(&self) -> Result<(), String> {
        for (index, combatant) in self.combatants.iter().enumerate() {
            if combatant.id.0 != index {
                return Err(format!("combatant at index {} carries id {}", index, combatant.id));
            }
            if combatant.hp() > combatant.max_hp() {
                return Err(format!("{} has more HP than its maximum", combatant.id));
            }
            if let Some(boss) = combatant.boss {
                if boss.current_index >= boss.segment_count {
                    return Err(format!("{} has segment index out of range", combatant.id));
                }
            }
            let linked = combatant
                .tags
                .iter()
                .flat_map(|tag| tag.linked_ids())
                .chain(combatant.last_damage_source.and_then(|source| source.direct_attacker()))
                .chain(combatant.turn_data.attacks_received.iter().map(|record| record.attacker));
            for id in linked {
                if id.0 >= self.combatants.len() {
                    return Err(format!("{} is linked to unknown combatant {}", combatant.id, id));
                }
            }
        }
        for attack in &self.delayed_attacks {
            if attack.source.0 >= self.combatants.len() {
                return Err(format!("delayed {} from unknown combatant {}", attack.move_id, attack.source));
            }
            if attack.slot >= self.format.active_slots() {
                return Err(format!("delayed {} aimed at missing slot {}", attack.move_id, attack.slot));
            }
        }
        for side in &self.sides {
            for id in side.party.iter().chain(side.active.iter().flatten()) {
                match self.combatants.get(id.0) {
                    Some(c) if c.side == side.id => {}
                    _ => return Err(format!("side {} references invalid combatant {}", side.id, id)),
                }
            }
            if side.active.len() != self.format.active_slots() {
                return Err(format!("side {} has the wrong number of slots", side.id));
            }
        }
        Ok(())
    }
}

use crate::battle::combatant::CombatantId;
use schema::{MoveId, ProtectVariant};
use serde::{Deserialize, Serialize};

/// Temporary, removable effects attached to one combatant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum VolatileCondition {
    Substitute { hp: u32 },
    Protected(ProtectVariant),
    Enduring,
    Flinched,
    Confused,
    Seeded,
    Bound,
    SaltCure,
    Disabled { pokemon_move: MoveId },
    Encore { pokemon_move: MoveId },
    Taunted,
    LockedOn { target: CombatantId },
    Recharging,
    Biding { damage: u32, last_attacker: Option<CombatantId> },
    FocusEnergy,
    CenterOfAttention,
}

/// Condition type without data payload, for lookups and removal
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Substitute,
    Protected,
    Enduring,
    Flinched,
    Confused,
    Seeded,
    Bound,
    SaltCure,
    Disabled,
    Encore,
    Taunted,
    LockedOn,
    Recharging,
    Biding,
    FocusEnergy,
    CenterOfAttention,
}

/// When a tag's duration counter is decremented.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapseTrigger {
    /// Each time the holder tries to move.
    PreMove,
    TurnEnd,
    /// Only removed explicitly (substitute broken, Bide released, holder switched out).
    Manual,
}

impl VolatileCondition {
    pub fn kind(&self) -> TagKind {
        match self {
            VolatileCondition::Substitute { .. } => TagKind::Substitute,
            VolatileCondition::Protected(_) => TagKind::Protected,
            VolatileCondition::Enduring => TagKind::Enduring,
            VolatileCondition::Flinched => TagKind::Flinched,
            VolatileCondition::Confused => TagKind::Confused,
            VolatileCondition::Seeded => TagKind::Seeded,
            VolatileCondition::Bound => TagKind::Bound,
            VolatileCondition::SaltCure => TagKind::SaltCure,
            VolatileCondition::Disabled { .. } => TagKind::Disabled,
            VolatileCondition::Encore { .. } => TagKind::Encore,
            VolatileCondition::Taunted => TagKind::Taunted,
            VolatileCondition::LockedOn { .. } => TagKind::LockedOn,
            VolatileCondition::Recharging => TagKind::Recharging,
            VolatileCondition::Biding { .. } => TagKind::Biding,
            VolatileCondition::FocusEnergy => TagKind::FocusEnergy,
            VolatileCondition::CenterOfAttention => TagKind::CenterOfAttention,
        }
    }
}

impl TagKind {
    pub fn lapse_trigger(self) -> LapseTrigger {
        match self {
            TagKind::Confused => LapseTrigger::PreMove,
            TagKind::Protected
            | TagKind::Enduring
            | TagKind::Flinched
            | TagKind::Bound
            | TagKind::Disabled
            | TagKind::Encore
            | TagKind::Taunted
            | TagKind::LockedOn
            | TagKind::CenterOfAttention => LapseTrigger::TurnEnd,
            TagKind::Substitute
            | TagKind::Seeded
            | TagKind::SaltCure
            | TagKind::Recharging
            | TagKind::Biding
            | TagKind::FocusEnergy => LapseTrigger::Manual,
        }
    }

    /// Tags that end as soon as the combatant that applied them leaves the field.
    pub fn ends_with_source(self) -> bool {
        matches!(self, TagKind::Bound | TagKind::LockedOn)
    }

    /// Tags carried over to the replacement by Baton Pass.
    pub fn is_baton_passable(self) -> bool {
        matches!(
            self,
            TagKind::Substitute | TagKind::Confused | TagKind::Seeded | TagKind::FocusEnergy
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VolatileTag {
    pub condition: VolatileCondition,
    /// The combatant that applied the tag.
    pub source: Option<CombatantId>,
    /// `None` lasts until removed.
    pub turns_remaining: Option<u8>,
}

impl VolatileTag {
    pub fn new(condition: VolatileCondition, source: Option<CombatantId>, turns: Option<u8>) -> Self {
        Self {
            condition,
            source,
            turns_remaining: turns,
        }
    }

    pub fn kind(&self) -> TagKind {
        self.condition.kind()
    }

    pub fn lapse_trigger(&self) -> LapseTrigger {
        self.kind().lapse_trigger()
    }

    /// Every combatant the tag points at, payload included.
    pub fn linked_ids(&self) -> impl Iterator<Item = CombatantId> {
        let payload = match self.condition {
            VolatileCondition::LockedOn { target } => Some(target),
            VolatileCondition::Biding { last_attacker, .. } => last_attacker,
            _ => None,
        };
        self.source.into_iter().chain(payload)
    }

    /// Counts the tag down by one. Returns true once it has expired.
    pub fn tick(&mut self) -> bool {
        match self.turns_remaining.as_mut() {
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                *turns == 0
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_expires_counted_tags_only() {
        let mut taunt = VolatileTag::new(VolatileCondition::Taunted, None, Some(2));
        assert!(!taunt.tick());
        assert!(taunt.tick());

        let mut seed = VolatileTag::new(VolatileCondition::Seeded, Some(CombatantId(1)), None);
        for _ in 0..10 {
            assert!(!seed.tick());
        }
    }

    #[test]
    fn test_kind_strips_payload() {
        let sub = VolatileCondition::Substitute { hp: 10 };
        assert_eq!(sub.kind(), VolatileCondition::Substitute { hp: 99 }.kind());
        assert_eq!(sub.kind().lapse_trigger(), LapseTrigger::Manual);
        assert_eq!(
            VolatileCondition::LockedOn { target: CombatantId(3) }.kind(),
            TagKind::LockedOn
        );
    }
}

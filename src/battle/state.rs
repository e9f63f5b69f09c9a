use crate::battle::combatant::{CombatantId, DamageSource, SideId};
use crate::battle::conditions::TagKind;
use schema::{
    AbilityId, BattleStat, HeldItem, MoveId, SideCondition, SpeciesId, StatusEffect, TerrainType, WeatherType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory(SideId),
    Draw,
    /// A side ran from the battle.
    Fled(SideId),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    Disabled,
    NoPp,
    EncoreLocked,
    Taunted,
    NoTarget,
    ButItFailed,
}

/// Every user-visible occurrence. The engine never formats text: a presenter
/// turns `message_key()` plus `params()` into whatever it shows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted { turn: u32 },
    TurnEnded { turn: u32 },

    // Switching
    SentOut { side: SideId, combatant: CombatantId, species: SpeciesId },
    SwitchedOut { side: SideId, combatant: CombatantId },
    ForcedOut { combatant: CombatantId },

    // Move resolution
    MoveUsed { user: CombatantId, move_used: MoveId },
    MoveFailed { user: CombatantId, move_used: MoveId, reason: ActionFailureReason },
    MoveMissed { user: CombatantId, target: CombatantId },
    MoveRedirected { user: CombatantId, from: CombatantId, to: CombatantId },
    NoEffect { target: CombatantId },
    Protected { target: CombatantId },
    CriticalHit { target: CombatantId },
    Effectiveness { target: CombatantId, multiplier: f32 },
    HitCount { hits: u8 },
    DamageDealt { target: CombatantId, amount: u32, remaining_hp: u32, source: DamageSource },
    Healed { target: CombatantId, amount: u32, new_hp: u32 },
    Endured { target: CombatantId },
    Fainted { combatant: CombatantId },
    MustRecharge { user: CombatantId },
    BideStoring { user: CombatantId },
    DelayedAttackQueued { user: CombatantId, move_used: MoveId },
    DelayedAttackLanded { target: CombatantId, move_used: MoveId },

    // Prevention
    FullyParalyzed { combatant: CombatantId },
    FastAsleep { combatant: CombatantId },
    WokeUp { combatant: CombatantId },
    Frozen { combatant: CombatantId },
    Thawed { combatant: CombatantId },
    Flinched { combatant: CombatantId },
    IsConfused { combatant: CombatantId },
    HurtByConfusion { combatant: CombatantId },

    // Status
    StatusApplied { target: CombatantId, status: StatusEffect },
    StatusCured { target: CombatantId, status: StatusEffect },
    StatusAlreadyPresent { target: CombatantId },
    StatusImmune { target: CombatantId, status: StatusEffect },

    // Stat stages
    StatStageChanged { target: CombatantId, stat: BattleStat, old_stage: i8, new_stage: i8 },
    StatChangeNoEffect { target: CombatantId, stat: BattleStat, rising: bool },
    StatChangeBlocked { target: CombatantId, ability: AbilityId },

    // Volatile tags
    TagAdded { target: CombatantId, tag: TagKind },
    TagRemoved { target: CombatantId, tag: TagKind },
    SubstituteCreated { target: CombatantId, hp: u32 },
    SubstituteDamaged { target: CombatantId, amount: u32 },
    SubstituteFaded { target: CombatantId },

    // Abilities & items
    AbilityActivated { combatant: CombatantId, ability: AbilityId },
    AbilitySuppressed { target: CombatantId },
    ItemActivated { combatant: CombatantId, item: HeldItem },
    ItemConsumed { combatant: CombatantId, item: HeldItem },
    FormChanged { combatant: CombatantId, species: SpeciesId },

    // Boss
    BossSegmentsBroken { boss: CombatantId, broken: u8, segments_left: u8 },
    BossShieldsRestored { boss: CombatantId },

    // Field
    WeatherStarted { weather: WeatherType },
    WeatherContinues { weather: WeatherType },
    WeatherEnded { weather: WeatherType },
    TerrainStarted { terrain: TerrainType },
    TerrainEnded { terrain: TerrainType },
    TrickRoomStarted,
    TrickRoomEnded,
    SideConditionAdded { side: SideId, condition: SideCondition },
    SideConditionEnded { side: SideId, condition: SideCondition },

    BattleEnded { outcome: BattleOutcome },
}

impl BattleEvent {
    /// Localization key for this event.
    pub fn message_key(&self) -> &'static str {
        match self {
            BattleEvent::TurnStarted { .. } => "battle:turnStart",
            BattleEvent::TurnEnded { .. } => "battle:turnEnd",
            BattleEvent::SentOut { .. } => "battle:sendOut",
            BattleEvent::SwitchedOut { .. } => "battle:switchOut",
            BattleEvent::ForcedOut { .. } => "battle:forcedOut",
            BattleEvent::MoveUsed { .. } => "battle:useMove",
            BattleEvent::MoveFailed { .. } => "battle:moveFailed",
            BattleEvent::MoveMissed { .. } => "battle:attackMissed",
            BattleEvent::MoveRedirected { .. } => "battle:moveRedirected",
            BattleEvent::NoEffect { .. } => "battle:hitResultNoEffect",
            BattleEvent::Protected { .. } => "battle:protected",
            BattleEvent::CriticalHit { .. } => "battle:hitResultCriticalHit",
            BattleEvent::Effectiveness { multiplier, .. } => {
                if *multiplier > 1.0 {
                    "battle:hitResultSuperEffective"
                } else {
                    "battle:hitResultNotVeryEffective"
                }
            }
            BattleEvent::HitCount { .. } => "battle:attackHitsCount",
            BattleEvent::DamageDealt { .. } => "battle:damageDealt",
            BattleEvent::Healed { .. } => "battle:healed",
            BattleEvent::Endured { .. } => "battle:endured",
            BattleEvent::Fainted { .. } => "battle:fainted",
            BattleEvent::MustRecharge { .. } => "battle:mustRecharge",
            BattleEvent::BideStoring { .. } => "battle:bideStoring",
            BattleEvent::DelayedAttackQueued { .. } => "battle:delayedAttackQueued",
            BattleEvent::DelayedAttackLanded { .. } => "battle:delayedAttackLanded",
            BattleEvent::FullyParalyzed { .. } => "statusEffect:paralysis.activation",
            BattleEvent::FastAsleep { .. } => "statusEffect:sleep.activation",
            BattleEvent::WokeUp { .. } => "statusEffect:sleep.heal",
            BattleEvent::Frozen { .. } => "statusEffect:freeze.activation",
            BattleEvent::Thawed { .. } => "statusEffect:freeze.heal",
            BattleEvent::Flinched { .. } => "battlerTags:flinchedLapse",
            BattleEvent::IsConfused { .. } => "battlerTags:confusedLapse",
            BattleEvent::HurtByConfusion { .. } => "battlerTags:confusedLapseHurtItself",
            BattleEvent::StatusApplied { .. } => "statusEffect:obtain",
            BattleEvent::StatusCured { .. } => "statusEffect:heal",
            BattleEvent::StatusAlreadyPresent { .. } => "statusEffect:overlap",
            BattleEvent::StatusImmune { .. } => "statusEffect:immune",
            BattleEvent::StatStageChanged { old_stage, new_stage, .. } => {
                if new_stage > old_stage {
                    "battle:statRose"
                } else {
                    "battle:statFell"
                }
            }
            BattleEvent::StatChangeNoEffect { rising, .. } => {
                if *rising {
                    "battle:statWontGoHigher"
                } else {
                    "battle:statWontGoLower"
                }
            }
            BattleEvent::StatChangeBlocked { .. } => "abilityTriggers:statChangeBlocked",
            BattleEvent::TagAdded { .. } => "battlerTags:onAdd",
            BattleEvent::TagRemoved { .. } => "battlerTags:onRemove",
            BattleEvent::SubstituteCreated { .. } => "battlerTags:substituteOnAdd",
            BattleEvent::SubstituteDamaged { .. } => "battlerTags:substituteOnHit",
            BattleEvent::SubstituteFaded { .. } => "battlerTags:substituteOnRemove",
            BattleEvent::AbilityActivated { .. } => "abilityTriggers:activated",
            BattleEvent::AbilitySuppressed { .. } => "abilityTriggers:suppressed",
            BattleEvent::ItemActivated { .. } => "modifier:activated",
            BattleEvent::ItemConsumed { .. } => "modifier:consumed",
            BattleEvent::FormChanged { .. } => "battle:formChange",
            BattleEvent::BossSegmentsBroken { .. } => "battle:bossShieldBroken",
            BattleEvent::BossShieldsRestored { .. } => "battle:bossShieldsRestored",
            BattleEvent::WeatherStarted { .. } => "weather:start",
            BattleEvent::WeatherContinues { .. } => "weather:lapse",
            BattleEvent::WeatherEnded { .. } => "weather:clear",
            BattleEvent::TerrainStarted { .. } => "terrain:start",
            BattleEvent::TerrainEnded { .. } => "terrain:clear",
            BattleEvent::TrickRoomStarted => "arenaTag:trickRoomOnAdd",
            BattleEvent::TrickRoomEnded => "arenaTag:trickRoomOnRemove",
            BattleEvent::SideConditionAdded { .. } => "arenaTag:onAdd",
            BattleEvent::SideConditionEnded { .. } => "arenaTag:onRemove",
            BattleEvent::BattleEnded { .. } => "battle:battleEnd",
        }
    }

    /// Parameters for the localized message, keyed by placeholder name.
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        let mut put = |key: &'static str, value: String| {
            params.insert(key, value);
        };
        match self {
            BattleEvent::TurnStarted { turn } | BattleEvent::TurnEnded { turn } => put("turn", turn.to_string()),
            BattleEvent::SentOut { side, combatant, species } => {
                put("side", side.to_string());
                put("pokemon", combatant.to_string());
                put("species", species.to_string());
            }
            BattleEvent::SwitchedOut { side, combatant } => {
                put("side", side.to_string());
                put("pokemon", combatant.to_string());
            }
            BattleEvent::MoveUsed { user, move_used } | BattleEvent::DelayedAttackQueued { user, move_used } => {
                put("pokemon", user.to_string());
                put("move", move_used.to_string());
            }
            BattleEvent::MoveFailed { user, move_used, reason } => {
                put("pokemon", user.to_string());
                put("move", move_used.to_string());
                put("reason", format!("{:?}", reason));
            }
            BattleEvent::MoveMissed { user, target } => {
                put("pokemon", user.to_string());
                put("target", target.to_string());
            }
            BattleEvent::MoveRedirected { user, from, to } => {
                put("pokemon", user.to_string());
                put("from", from.to_string());
                put("to", to.to_string());
            }
            BattleEvent::Effectiveness { target, multiplier } => {
                put("target", target.to_string());
                put("multiplier", multiplier.to_string());
            }
            BattleEvent::HitCount { hits } => put("count", hits.to_string()),
            BattleEvent::DamageDealt { target, amount, remaining_hp, source } => {
                put("pokemon", target.to_string());
                put("damage", amount.to_string());
                put("hp", remaining_hp.to_string());
                put("source", format!("{:?}", source));
            }
            BattleEvent::Healed { target, amount, new_hp } => {
                put("pokemon", target.to_string());
                put("amount", amount.to_string());
                put("hp", new_hp.to_string());
            }
            BattleEvent::DelayedAttackLanded { target, move_used } => {
                put("pokemon", target.to_string());
                put("move", move_used.to_string());
            }
            BattleEvent::StatusApplied { target, status }
            | BattleEvent::StatusCured { target, status }
            | BattleEvent::StatusImmune { target, status } => {
                put("pokemon", target.to_string());
                put("status", status.to_string());
            }
            BattleEvent::StatStageChanged { target, stat, old_stage, new_stage } => {
                put("pokemon", target.to_string());
                put("stat", stat.to_string());
                put("stages", (new_stage - old_stage).abs().to_string());
            }
            BattleEvent::StatChangeNoEffect { target, stat, .. } => {
                put("pokemon", target.to_string());
                put("stat", stat.to_string());
            }
            BattleEvent::StatChangeBlocked { target, ability } => {
                put("pokemon", target.to_string());
                put("ability", ability.to_string());
            }
            BattleEvent::TagAdded { target, tag } | BattleEvent::TagRemoved { target, tag } => {
                put("pokemon", target.to_string());
                put("tag", format!("{:?}", tag));
            }
            BattleEvent::SubstituteCreated { target, hp } => {
                put("pokemon", target.to_string());
                put("hp", hp.to_string());
            }
            BattleEvent::SubstituteDamaged { target, amount } => {
                put("pokemon", target.to_string());
                put("damage", amount.to_string());
            }
            BattleEvent::AbilityActivated { combatant, ability } => {
                put("pokemon", combatant.to_string());
                put("ability", ability.to_string());
            }
            BattleEvent::ItemActivated { combatant, item } | BattleEvent::ItemConsumed { combatant, item } => {
                put("pokemon", combatant.to_string());
                put("item", item.to_string());
            }
            BattleEvent::FormChanged { combatant, species } => {
                put("pokemon", combatant.to_string());
                put("species", species.to_string());
            }
            BattleEvent::BossSegmentsBroken { boss, broken, segments_left } => {
                put("pokemon", boss.to_string());
                put("broken", broken.to_string());
                put("remaining", segments_left.to_string());
            }
            BattleEvent::WeatherStarted { weather }
            | BattleEvent::WeatherContinues { weather }
            | BattleEvent::WeatherEnded { weather } => put("weather", format!("{:?}", weather)),
            BattleEvent::TerrainStarted { terrain } | BattleEvent::TerrainEnded { terrain } => {
                put("terrain", format!("{:?}", terrain))
            }
            BattleEvent::SideConditionAdded { side, condition } | BattleEvent::SideConditionEnded { side, condition } => {
                put("side", side.to_string());
                put("condition", condition.to_string());
            }
            BattleEvent::BattleEnded { outcome } => put("outcome", format!("{:?}", outcome)),
            BattleEvent::ForcedOut { combatant }
            | BattleEvent::Fainted { combatant }
            | BattleEvent::FullyParalyzed { combatant }
            | BattleEvent::FastAsleep { combatant }
            | BattleEvent::WokeUp { combatant }
            | BattleEvent::Frozen { combatant }
            | BattleEvent::Thawed { combatant }
            | BattleEvent::Flinched { combatant }
            | BattleEvent::IsConfused { combatant }
            | BattleEvent::HurtByConfusion { combatant } => put("pokemon", combatant.to_string()),
            BattleEvent::NoEffect { target }
            | BattleEvent::Protected { target }
            | BattleEvent::CriticalHit { target }
            | BattleEvent::Endured { target }
            | BattleEvent::StatusAlreadyPresent { target }
            | BattleEvent::SubstituteFaded { target }
            | BattleEvent::AbilitySuppressed { target } => put("pokemon", target.to_string()),
            BattleEvent::MustRecharge { user } | BattleEvent::BideStoring { user } => put("pokemon", user.to_string()),
            BattleEvent::BossShieldsRestored { boss } => put("pokemon", boss.to_string()),
            BattleEvent::TrickRoomStarted | BattleEvent::TrickRoomEnded => {}
        }
        params
    }
}

/// Collects events raised while phases run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Moves every collected event out, leaving the bus empty.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl From<Vec<BattleEvent>> for EventBus {
    fn from(events: Vec<BattleEvent>) -> Self {
        Self { events }
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {} {:?}", event.message_key(), event.params())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stat_events_pick_direction_keys() {
        let rose = BattleEvent::StatStageChanged {
            target: CombatantId(0),
            stat: BattleStat::Attack,
            old_stage: 0,
            new_stage: 2,
        };
        assert_eq!(rose.message_key(), "battle:statRose");
        assert_eq!(rose.params().get("stages").map(String::as_str), Some("2"));

        let capped = BattleEvent::StatChangeNoEffect {
            target: CombatantId(0),
            stat: BattleStat::Attack,
            rising: true,
        };
        assert_eq!(capped.message_key(), "battle:statWontGoHigher");
    }

    #[test]
    fn test_params_never_contain_display_text() {
        let event = BattleEvent::MoveUsed {
            user: CombatantId(2),
            move_used: MoveId::Tackle,
        };
        let params = event.params();
        assert_eq!(params.get("pokemon").map(String::as_str), Some("#2"));
        assert_eq!(params.get("move").map(String::as_str), Some("Tackle"));
    }

    #[test]
    fn test_event_bus_drain_empties() {
        let mut bus = EventBus::new();
        bus.push(BattleEvent::TrickRoomStarted);
        bus.push(BattleEvent::TurnEnded { turn: 1 });
        assert_eq!(bus.len(), 2);

        let drained = bus.drain();
        assert_eq!(drained.len(), 2);
        assert!(bus.is_empty());
    }
}

use crate::battle::combatant::{Combatant, CombatantId};
use crate::battle::commands::TurnCommand;
use crate::battle::engine::{Battle, Suspension};
use crate::battle::field::{BattleFormat, Field};
use crate::battle::rng::BattleRng;
use crate::battle::state::BattleEvent;
use crate::config::BattleConfig;
use schema::{AbilityId, HeldItem, MoveId, SpeciesId, StatusEffect};

/// A builder for test combatants with common defaults.
///
/// # Example
/// ```
/// let pikachu = TestCombatantBuilder::new(SpeciesId::Pikachu, 50)
///     .with_moves(vec![MoveId::Tackle])
///     .with_status(StatusEffect::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    species: SpeciesId,
    level: u8,
    moves: Vec<MoveId>,
    status: Option<StatusEffect>,
    hp: Option<u32>,
    ability: Option<AbilityId>,
    item: Option<HeldItem>,
    boss_segments: Option<u8>,
    pp: Vec<(MoveId, u8)>,
}

impl TestCombatantBuilder {
    pub fn new(species: SpeciesId, level: u8) -> Self {
        Self {
            species,
            level,
            moves: vec![MoveId::Tackle],
            status: None,
            hp: None,
            ability: None,
            item: None,
            boss_segments: None,
            pp: Vec::new(),
        }
    }

    pub fn with_moves(mut self, moves: Vec<MoveId>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_item(mut self, item: HeldItem) -> Self {
        self.item = Some(item);
        self
    }

    pub fn as_boss(mut self, segments: u8) -> Self {
        self.boss_segments = Some(segments);
        self
    }

    pub fn with_pp(mut self, move_id: MoveId, pp: u8) -> Self {
        self.pp.push((move_id, pp));
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = Combatant::new(self.species, self.level, &self.moves);
        if let Some(ability) = self.ability {
            combatant = combatant.with_ability(ability);
        }
        if let Some(item) = self.item {
            combatant = combatant.with_item(item);
        }
        if let Some(segments) = self.boss_segments {
            combatant = combatant.as_boss(segments);
        }
        combatant.status = self.status;
        if self.status == Some(StatusEffect::Sleep) {
            combatant.status_turns = 2;
        }
        if let Some(hp) = self.hp {
            combatant.set_hp(hp);
        }
        for (move_id, pp) in self.pp {
            if let Some(slot) = combatant.move_slot_mut(move_id) {
                slot.pp = pp;
            }
        }
        combatant
    }
}

pub fn test_field(player: Vec<Combatant>, enemy: Vec<Combatant>) -> Field {
    Field::new(BattleFormat::Single, player, enemy).expect("test parties are never empty")
}

/// A single battle on a scripted RNG. Draws past the end of `script` return
/// the neutral value: hits land, no crits, maximum damage roll, no secondaries.
pub fn scripted_battle(player: Vec<Combatant>, enemy: Vec<Combatant>, script: Vec<u32>) -> Battle {
    Battle::with_field(BattleConfig::default(), test_field(player, enemy), BattleRng::scripted(script))
}

pub fn seeded_battle(player: Vec<Combatant>, enemy: Vec<Combatant>, seed: u64) -> Battle {
    let config = BattleConfig::with_seed(seed);
    Battle::with_field(config, test_field(player, enemy), BattleRng::seeded(seed))
}

pub fn use_move(move_id: MoveId) -> TurnCommand {
    TurnCommand::UseMove { move_id, target: None }
}

pub fn switch_to(party_index: usize) -> TurnCommand {
    TurnCommand::SwitchPokemon { party_index }
}

/// Acknowledges events until the battle wants a command or is over. Returns
/// everything acknowledged on the way.
pub fn advance(battle: &mut Battle) -> Vec<BattleEvent> {
    let mut seen = Vec::new();
    loop {
        match battle.run().expect("battle should keep running") {
            Suspension::AwaitingAck { .. } => seen.extend(battle.acknowledge()),
            Suspension::AwaitingCommand(_) | Suspension::Finished { .. } => return seen,
        }
    }
}

/// Plays until the current turn ends or the battle finishes. Each command
/// request is answered with the first unused entry for that combatant, so a
/// combatant that needs a replacement after fainting takes two entries.
pub fn play_turn(battle: &mut Battle, commands: &[(CombatantId, TurnCommand)]) -> Vec<BattleEvent> {
    let mut pending = commands.to_vec();
    let mut seen = Vec::new();
    loop {
        match battle.run().expect("battle should keep running") {
            Suspension::AwaitingAck { .. } => {
                let events = battle.acknowledge();
                let turn_over = events.iter().any(|e| matches!(e, BattleEvent::TurnEnded { .. }));
                seen.extend(events);
                if turn_over {
                    return seen;
                }
            }
            Suspension::AwaitingCommand(request) => {
                let index = pending
                    .iter()
                    .position(|(id, _)| *id == request.combatant)
                    .unwrap_or_else(|| panic!("no scripted command left for {}", request.combatant));
                let (_, command) = pending.remove(index);
                battle
                    .submit_command(request.combatant, command)
                    .unwrap_or_else(|err| panic!("scripted command {} was rejected: {}", command, err));
            }
            Suspension::Finished { .. } => return seen,
        }
    }
}

/// Index of the first event matching `predicate`. Panics when there is none.
pub fn position_of(events: &[BattleEvent], predicate: impl Fn(&BattleEvent) -> bool) -> usize {
    events
        .iter()
        .position(predicate)
        .unwrap_or_else(|| panic!("expected event not found in {:#?}", events))
}

pub fn moves_used(events: &[BattleEvent]) -> Vec<(CombatantId, MoveId)> {
    events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::MoveUsed { user, move_used } => Some((*user, *move_used)),
            _ => None,
        })
        .collect()
}

//! Held-item effects. Passive modifiers are plain functions the calculators
//! call; active items run at fixed points and emit their own events.

use crate::battle::combatant::{Combatant, CombatantId, DamageSource};
use crate::battle::context::BattleContext;
use crate::battle::effects;
use crate::battle::state::BattleEvent;
use schema::{HeldItem, MoveData};

pub fn damage_multiplier(holder: &Combatant) -> f64 {
    match holder.item {
        Some(HeldItem::LifeOrb) => 1.3,
        _ => 1.0,
    }
}

pub fn extra_hits(holder: &Combatant, move_data: &MoveData) -> u8 {
    match holder.item {
        Some(item) if move_data.is_damaging() => item.extra_hits(),
        _ => 0,
    }
}

/// Contact retaliation from the defender's item.
pub fn on_contact(ctx: &mut BattleContext, holder: CombatantId, attacker: CombatantId) {
    if ctx.combatant(holder).item != Some(HeldItem::RockyHelmet) || ctx.combatant(attacker).is_fainted() {
        return;
    }
    ctx.emit(BattleEvent::ItemActivated {
        combatant: holder,
        item: HeldItem::RockyHelmet,
    });
    let amount = (ctx.combatant(attacker).max_hp() / 6).max(1);
    effects::apply_damage(ctx, attacker, amount, DamageSource::Contact);
}

/// Life Orb recoil after a move that dealt damage.
pub fn after_move(ctx: &mut BattleContext, user: CombatantId, damage_dealt: u32) {
    let holder = ctx.combatant(user);
    if holder.item != Some(HeldItem::LifeOrb) || damage_dealt == 0 || holder.is_fainted() {
        return;
    }
    let amount = (holder.max_hp() / 10).max(1);
    ctx.emit(BattleEvent::ItemActivated {
        combatant: user,
        item: HeldItem::LifeOrb,
    });
    effects::apply_damage(ctx, user, amount, DamageSource::ItemRecoil);
}

pub fn end_of_turn(ctx: &mut BattleContext, holder: CombatantId) {
    let combatant = ctx.combatant(holder);
    if combatant.item != Some(HeldItem::Leftovers) || combatant.is_fainted() || combatant.hp() == combatant.max_hp() {
        return;
    }
    let amount = (combatant.max_hp() / 16).max(1);
    if effects::heal(ctx, holder, amount) > 0 {
        ctx.emit(BattleEvent::ItemActivated {
            combatant: holder,
            item: HeldItem::Leftovers,
        });
    }
}

/// Applies each battle-count booster as a +1 stage on entry.
pub fn apply_temp_boosters(ctx: &mut BattleContext, holder: CombatantId) {
    let stats: Vec<_> = ctx.combatant(holder).temp_boosters.iter().map(|b| b.kind.stat).collect();
    for stat in stats {
        effects::change_stat_stage(ctx, holder, Some(holder), stat, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{MoveId, SpeciesId};

    #[test]
    fn test_multi_lens_only_extends_damaging_moves() {
        let holder = Combatant::new(SpeciesId::Pikachu, 50, &[]).with_item(HeldItem::MultiLens);
        assert_eq!(extra_hits(&holder, &MoveId::Tackle.data()), 1);
        assert_eq!(extra_hits(&holder, &MoveId::ThunderWave.data()), 0);
    }

    #[test]
    fn test_life_orb_boosts_damage() {
        let holder = Combatant::new(SpeciesId::Pikachu, 50, &[]).with_item(HeldItem::LifeOrb);
        assert_eq!(damage_multiplier(&holder), 1.3);
        assert_eq!(damage_multiplier(&Combatant::new(SpeciesId::Pikachu, 50, &[])), 1.0);
    }
}

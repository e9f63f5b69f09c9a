use crate::battle::abilities::modify_priority;
use crate::battle::combatant::CombatantId;
use crate::battle::commands::TurnCommand;
use crate::battle::context::BattleContext;
use crate::battle::stats::effective_speed;
use schema::MoveId;
use std::cmp::Ordering;
use tracing::debug;

/// Sort key for one queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPriority {
    pub action_priority: i8, // Forfeit: 10, Switch: 6, Move: 0
    pub move_priority: i8,   // Move priority after ability modifiers (e.g. Prankster)
    pub quick_claw: bool,    // Won a bypass-speed draw this turn
    pub speed: u32,          // Effective speed
}

impl ActionPriority {
    /// Priority desc, then Quick Claw, then speed desc. The reversed-order
    /// flag only flips the speed comparison.
    pub fn compare(&self, other: &Self, reversed: bool) -> Ordering {
        other
            .action_priority
            .cmp(&self.action_priority)
            .then_with(|| other.move_priority.cmp(&self.move_priority))
            .then_with(|| other.quick_claw.cmp(&self.quick_claw))
            .then_with(|| {
                if reversed {
                    self.speed.cmp(&other.speed)
                } else {
                    other.speed.cmp(&self.speed)
                }
            })
    }
}

pub fn move_priority_key(ctx: &BattleContext, user: CombatantId, move_id: MoveId) -> ActionPriority {
    ActionPriority {
        action_priority: 0,
        move_priority: modify_priority(ctx.combatant(user), &move_id.data()),
        quick_claw: ctx.quick_claw.contains(&user),
        speed: effective_speed(&ctx.field, user),
    }
}

pub fn command_priority_key(ctx: &BattleContext, id: CombatantId, command: &TurnCommand) -> ActionPriority {
    match command {
        TurnCommand::Forfeit => ActionPriority {
            action_priority: 10,
            move_priority: 0,
            quick_claw: false,
            speed: 0,
        },
        TurnCommand::SwitchPokemon { .. } => ActionPriority {
            action_priority: 6,
            move_priority: 0,
            quick_claw: false,
            speed: effective_speed(&ctx.field, id),
        },
        TurnCommand::UseMove { move_id, .. } => move_priority_key(ctx, id, *move_id),
    }
}

fn factorial(n: usize) -> u32 {
    (1..=n as u32).product()
}

/// Decodes `index` in `[0, n!)` into a permutation of `items` (Lehmer code).
fn permutation<T: Copy>(items: &[T], mut index: u32) -> Vec<T> {
    let mut remaining: Vec<T> = items.to_vec();
    let mut result = Vec::with_capacity(items.len());
    for position in 0..items.len() {
        let block = factorial(items.len() - 1 - position);
        let pick = (index / block) as usize;
        index %= block;
        result.push(remaining.remove(pick.min(remaining.len() - 1)));
    }
    result
}

/// Computes this turn's action order from the stored commands.
///
/// Draw order: one Quick Claw draw per holder using a move (in field order),
/// then one draw per group of exactly tied actions.
pub fn resolve_turn_order(ctx: &mut BattleContext) -> Vec<CombatantId> {
    let actors: Vec<(CombatantId, TurnCommand)> = ctx
        .field
        .active_ids()
        .into_iter()
        .filter_map(|id| ctx.command_of(id).map(|command| (id, command)))
        .collect();

    ctx.quick_claw.clear();
    for (id, command) in &actors {
        if !matches!(command, TurnCommand::UseMove { .. }) {
            continue;
        }
        let Some(chance) = ctx.combatant(*id).item.and_then(|item| item.bypass_speed_chance()) else {
            continue;
        };
        if ctx.rng.chance(chance, "quick claw") {
            ctx.quick_claw.push(*id);
        }
    }

    let reversed = ctx.field.order_reversed();
    let mut keyed: Vec<(CombatantId, ActionPriority)> = actors
        .iter()
        .map(|(id, command)| (*id, command_priority_key(ctx, *id, command)))
        .collect();
    keyed.sort_by(|a, b| a.1.compare(&b.1, reversed));

    let mut order = Vec::with_capacity(keyed.len());
    let mut start = 0;
    while start < keyed.len() {
        let mut end = start + 1;
        while end < keyed.len() && keyed[start].1.compare(&keyed[end].1, reversed) == Ordering::Equal {
            end += 1;
        }
        let group: Vec<CombatantId> = keyed[start..end].iter().map(|(id, _)| *id).collect();
        if group.len() > 1 {
            let index = ctx.rng.next_int(factorial(group.len()), "speed tie");
            order.extend(permutation(&group, index));
        } else {
            order.extend(group);
        }
        start = end;
    }

    debug!(turn = ctx.field.turn, ?order, "turn order");
    ctx.turn_order = order.clone();
    order
}

/// Re-sorts moves that have not started yet after something changed the
/// ordering inputs (Trick Room, Tailwind, speed stages, a switch-in). Moves
/// already executed are out of the queue and cannot move; remaining ties keep
/// their current relative order, so no draw is made.
pub fn resort_pending_moves(ctx: &mut BattleContext) {
    let pending = ctx.queue.pending_moves();
    if pending.len() < 2 {
        return;
    }
    let reversed = ctx.field.order_reversed();
    let mut keyed: Vec<(CombatantId, ActionPriority)> = pending
        .iter()
        .map(|(user, move_id)| (*user, move_priority_key(ctx, *user, *move_id)))
        .collect();
    keyed.sort_by(|a, b| a.1.compare(&b.1, reversed));

    let order: Vec<CombatantId> = keyed.into_iter().map(|(id, _)| id).collect();
    ctx.queue.reorder_moves(&order);
}

/// Active combatants fastest first, ties in field order. Used where the game
/// goes "in speed order" without a declared action (switch-in and
/// end-of-turn effects); it never draws.
pub fn speed_order(ctx: &BattleContext) -> Vec<CombatantId> {
    let reversed = ctx.field.order_reversed();
    let mut ids = ctx.field.active_ids();
    ids.sort_by(|a, b| {
        let (sa, sb) = (effective_speed(&ctx.field, *a), effective_speed(&ctx.field, *b));
        if reversed {
            sa.cmp(&sb)
        } else {
            sb.cmp(&sa)
        }
    });
    ids
}

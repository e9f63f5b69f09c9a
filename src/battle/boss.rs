//! Segmented boss HP bars.
//!
//! A boss with `segment_count` bands sits at `current_index` (top band first).
//! Direct hits that cross a band boundary break shields and are clamped to the
//! top of the band they land in; every break awards a stat boost. Only the
//! last band can be emptied.

use crate::battle::combatant::{BossSegments, Combatant, StatStages, StageChange};
use crate::battle::rng::BattleRng;
use schema::BattleStat;

/// What a direct hit does to a segmented HP bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossHit {
    /// Damage applies as-is (no boundary crossed, or already on the last band).
    Unchanged,
    Break {
        broken: u8,
        new_index: u8,
        /// HP after the clamp: exactly the top of the band it lands in.
        hp_after: u32,
    },
}

pub fn segment_hp(segments: &BossSegments, max_hp: u32) -> u32 {
    (max_hp / segments.segment_count as u32).max(1)
}

/// Lowest HP the boss may reach on its current band without breaking it.
pub fn band_floor(segments: &BossSegments, max_hp: u32) -> u32 {
    segment_hp(segments, max_hp) * segments.current_index as u32
}

/// Highest HP the boss may hold on its current band.
pub fn band_ceiling(segments: &BossSegments, max_hp: u32) -> u32 {
    if segments.current_index + 1 >= segments.segment_count {
        max_hp
    } else {
        segment_hp(segments, max_hp) * (segments.current_index as u32 + 1)
    }
}

/// HP cap for heals: a boss cannot heal past the top of its current band.
pub fn heal_ceiling(combatant: &Combatant) -> u32 {
    match combatant.boss.as_ref() {
        Some(segments) => band_ceiling(segments, combatant.max_hp()),
        None => combatant.max_hp(),
    }
}

/// Resolves a direct hit of `damage` against a boss currently at `hp`.
///
/// With `r` HP left above the band floor, `k` shields break where `k` is the
/// largest value with `damage > r + segment_hp × (2^k − 2)`, capped at the
/// current index. From full HP that reduces to `damage > segment_hp × (2^k − 1)`.
/// Landing exactly on a boundary does not break it.
pub fn resolve_hit(segments: &BossSegments, hp: u32, max_hp: u32, damage: u32) -> BossHit {
    let n = segments.current_index;
    if n == 0 {
        return BossHit::Unchanged;
    }

    let seg = segment_hp(segments, max_hp) as u64;
    let remainder = (hp as u64).saturating_sub(seg * n as u64);
    let damage = damage as u64;
    if damage <= remainder {
        return BossHit::Unchanged;
    }

    let mut broken = 1u8;
    while broken < n {
        let next = broken as u32 + 1;
        let threshold = remainder + seg * ((1u64 << next) - 2);
        if damage > threshold {
            broken += 1;
        } else {
            break;
        }
    }

    let new_index = n - broken;
    BossHit::Break {
        broken,
        new_index,
        hp_after: (seg * (new_index as u64 + 1)) as u32,
    }
}

/// Stages awarded for breaking the shield at `index`. The final two breaks
/// are worth two stages each.
pub fn stages_for_break(index: u8) -> i8 {
    if index <= 2 {
        2
    } else {
        1
    }
}

/// Picks the boosted stat for each broken shield, in break order.
///
/// One weighted draw per break over the boostable stats still below +6,
/// weighted by the raw stat. Stages accumulate locally so later picks see the
/// earlier boosts; a break with nothing left to raise costs no draw.
pub fn pick_boosts(boss: &Combatant, from_index: u8, broken: u8, rng: &mut BattleRng) -> Vec<(BattleStat, i8)> {
    let mut stages: StatStages = boss.stages;
    let mut boosts = Vec::with_capacity(broken as usize);

    for step in 0..broken {
        let index = from_index - step;
        let amount = stages_for_break(index);

        let candidates: Vec<(BattleStat, u32)> = BattleStat::BOOSTABLE
            .iter()
            .filter(|stat| stages.get(**stat) < StatStages::MAX)
            .map(|stat| (*stat, boss.stats.get(*stat).max(1)))
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let total: u32 = candidates.iter().map(|(_, w)| w).sum();
        let mut roll = rng.next_int(total, "boss boost stat");
        let mut chosen = candidates[candidates.len() - 1].0;
        for (stat, weight) in &candidates {
            if roll < *weight {
                chosen = *stat;
                break;
            }
            roll -= weight;
        }

        if let StageChange::Changed { .. } = stages.apply(chosen, amount) {
            boosts.push((chosen, amount));
        }
    }

    boosts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{MoveId, SpeciesId};

    fn four_segments() -> BossSegments {
        BossSegments::new(4)
    }

    #[rstest]
    #[case(750, 3, 0, 100)]
    #[case(701, 3, 0, 100)]
    #[case(700, 2, 1, 200)]
    #[case(695, 2, 1, 200)]
    #[case(301, 2, 1, 200)]
    #[case(300, 1, 2, 300)]
    #[case(101, 1, 2, 300)]
    fn test_breaks_from_full_hp(
        #[case] damage: u32,
        #[case] broken: u8,
        #[case] new_index: u8,
        #[case] hp_after: u32,
    ) {
        assert_eq!(
            resolve_hit(&four_segments(), 400, 400, damage),
            BossHit::Break { broken, new_index, hp_after }
        );
    }

    #[test]
    fn test_exact_boundary_does_not_break() {
        assert_eq!(resolve_hit(&four_segments(), 400, 400, 100), BossHit::Unchanged);
        assert_eq!(resolve_hit(&four_segments(), 400, 400, 40), BossHit::Unchanged);
    }

    #[test]
    fn test_partial_band_shifts_thresholds() {
        // 50 HP left above the floor of index 3.
        let segments = four_segments();
        assert_eq!(
            resolve_hit(&segments, 350, 400, 51),
            BossHit::Break { broken: 1, new_index: 2, hp_after: 300 }
        );
        assert_eq!(
            resolve_hit(&segments, 350, 400, 251),
            BossHit::Break { broken: 2, new_index: 1, hp_after: 200 }
        );
    }

    #[test]
    fn test_last_band_takes_damage_normally() {
        let segments = BossSegments { segment_count: 4, current_index: 0 };
        assert_eq!(resolve_hit(&segments, 100, 400, 5000), BossHit::Unchanged);
    }

    #[test]
    fn test_band_bounds() {
        let segments = BossSegments { segment_count: 4, current_index: 2 };
        assert_eq!(band_floor(&segments, 400), 200);
        assert_eq!(band_ceiling(&segments, 400), 300);
        assert_eq!(band_ceiling(&four_segments(), 403), 403);
    }

    #[test]
    fn test_final_two_breaks_award_two_stages() {
        assert_eq!(stages_for_break(3), 1);
        assert_eq!(stages_for_break(2), 2);
        assert_eq!(stages_for_break(1), 2);
    }

    #[test]
    fn test_boost_picks_skip_maxed_stats() {
        let mut boss = Combatant::new(SpeciesId::Eternatus, 50, &[MoveId::Tackle]).as_boss(4);
        for stat in [
            BattleStat::Attack,
            BattleStat::Defense,
            BattleStat::SpecialAttack,
            BattleStat::SpecialDefense,
        ] {
            boss.stages.apply(stat, 6);
        }
        let mut rng = BattleRng::scripted(vec![0, 0, 0]);
        let boosts = pick_boosts(&boss, 3, 3, &mut rng);

        assert_eq!(boosts, vec![(BattleStat::Speed, 1), (BattleStat::Speed, 2), (BattleStat::Speed, 2)]);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_boost_draws_stop_when_everything_is_maxed() {
        let mut boss = Combatant::new(SpeciesId::Eternatus, 50, &[MoveId::Tackle]).as_boss(3);
        for stat in BattleStat::BOOSTABLE {
            boss.stages.apply(stat, 6);
        }
        let mut rng = BattleRng::seeded(1);
        assert!(pick_boosts(&boss, 2, 2, &mut rng).is_empty());
        assert_eq!(rng.draws(), 0);
    }
}

use crate::types::{round2, Group, GroupSpec, Unit};
use std::cmp::Ordering;

/// Flat score penalty when an addition pushes a group past its target, so
/// undershoot wins over overshoot of equal distance.
const OVERSHOOT_PENALTY: f64 = 0.1;

/// Upper bound on swap-refinement passes; stops oscillating swap chains.
const MAX_SWAP_PASSES: usize = 50;

/// Packs units into groups expanded from heterogeneous target specs.
///
/// Three phases: a greedy per-group fill in descending target order, a
/// global redistribution of whatever the fill left over, and a pairwise
/// swap refinement. Groups come back in spec order regardless of the order
/// they were filled in.
pub(super) fn pack(units: &[Unit], group_specs: &[GroupSpec]) -> Vec<Group> {
    let mut groups = expand_specs(group_specs);
    let mut pool: Vec<Unit> = units.to_vec();

    greedy_fill(&mut groups, &mut pool);
    redistribute(&mut groups, &mut pool);
    refine_swaps(&mut groups);

    groups
}

/// Expands each spec to `count` groups, numbered in spec order.
fn expand_specs(group_specs: &[GroupSpec]) -> Vec<Group> {
    let mut groups = Vec::new();
    for spec in group_specs {
        for _ in 0..spec.count {
            let number = groups.len() as u32 + 1;
            groups.push(Group::new(number, spec.target_amount));
        }
    }
    groups
}

/// Fills one group at a time, largest target first. Each step takes the
/// pool unit whose addition lands the group total closest to its target;
/// the group stops once it reaches its target or the pool runs dry. The
/// fill never looks ahead to later groups' needs.
fn greedy_fill(groups: &mut [Group], pool: &mut Vec<Unit>) {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| {
        groups[b]
            .target_amount
            .partial_cmp(&groups[a].target_amount)
            .unwrap_or(Ordering::Equal)
    });

    for idx in order {
        while groups[idx].total < groups[idx].target_amount && !pool.is_empty() {
            let mut best: Option<(usize, f64)> = None;
            for (unit_idx, unit) in pool.iter().enumerate() {
                let score = addition_score(&groups[idx], unit.value);
                match best {
                    None => best = Some((unit_idx, score)),
                    Some((_, best_score)) if score < best_score => {
                        best = Some((unit_idx, score));
                    }
                    _ => {}
                }
            }

            match best {
                Some((unit_idx, _)) => {
                    let unit = pool.remove(unit_idx);
                    groups[idx].push_unit(unit);
                }
                None => break,
            }
        }
    }
}

/// Distance of the prospective total to the target, penalized on overshoot.
fn addition_score(group: &Group, value: f64) -> f64 {
    let new_total = round2(group.total + value);
    let distance = (new_total - group.target_amount).abs();
    if new_total > group.target_amount {
        distance + OVERSHOOT_PENALTY
    } else {
        distance
    }
}

/// Places every leftover unit, always taking the (group, unit) pair that
/// shrinks that group's distance to target the most. The gain may be
/// negative once every group sits at or past its target; the least damaging
/// assignment still wins, so no unit is ever dropped.
fn redistribute(groups: &mut [Group], pool: &mut Vec<Unit>) {
    while !pool.is_empty() {
        let mut best: Option<(usize, usize, f64)> = None;
        for (group_idx, group) in groups.iter().enumerate() {
            let before = group.deviation();
            for (unit_idx, unit) in pool.iter().enumerate() {
                let after = (round2(group.total + unit.value) - group.target_amount).abs();
                let gain = before - after;
                match best {
                    None => best = Some((group_idx, unit_idx, gain)),
                    Some((_, _, best_gain)) if gain > best_gain => {
                        best = Some((group_idx, unit_idx, gain));
                    }
                    _ => {}
                }
            }
        }

        match best {
            Some((group_idx, unit_idx, _)) => {
                let unit = pool.remove(unit_idx);
                groups[group_idx].push_unit(unit);
            }
            None => break,
        }
    }
}

/// Pairwise local search over all group pairs. Per pair and pass the first
/// swap that strictly lowers the two groups' summed deviation is taken;
/// passes repeat while any swap fired, capped at `MAX_SWAP_PASSES`.
fn refine_swaps(groups: &mut [Group]) {
    for _ in 0..MAX_SWAP_PASSES {
        let mut improved = false;

        for a in 0..groups.len() {
            for b in (a + 1)..groups.len() {
                if try_swap(groups, a, b) {
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }
}

/// Scans the item pairs of groups `a` and `b`, performing the first swap
/// that strictly reduces their combined deviation. Returns whether one
/// fired.
fn try_swap(groups: &mut [Group], a: usize, b: usize) -> bool {
    let current = groups[a].deviation() + groups[b].deviation();

    for i in 0..groups[a].units.len() {
        for j in 0..groups[b].units.len() {
            let value_a = groups[a].units[i].value;
            let value_b = groups[b].units[j].value;

            let total_a = round2(groups[a].total - value_a + value_b);
            let total_b = round2(groups[b].total - value_b + value_a);
            let candidate = (total_a - groups[a].target_amount).abs()
                + (total_b - groups[b].target_amount).abs();

            if candidate < current {
                let unit_a = groups[a].take_unit(i);
                let unit_b = groups[b].take_unit(j);
                groups[a].push_unit(unit_b);
                groups[b].push_unit(unit_a);
                return true;
            }
        }
    }

    false
}

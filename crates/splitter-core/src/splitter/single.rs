use crate::types::{Group, Unit};
use std::cmp::Ordering;

/// Factor of overflow a group may take before first-fit considers it full.
const OVERFLOW_ALLOWANCE: f64 = 1.2;

/// Runs both heuristics and keeps the result with the lower total excess.
/// Ties keep the first-fit-decreasing result. An empty unit list yields an
/// empty group list.
pub(super) fn optimize(units: &[Unit], target_amount: f64, number_of_groups: u32) -> Vec<Group> {
    if units.is_empty() {
        return Vec::new();
    }

    let ffd = first_fit_decreasing(units, target_amount, number_of_groups);
    let bf = best_fit(units, target_amount, number_of_groups);

    let ffd_excess: f64 = ffd.iter().map(Group::excess).sum();
    let bf_excess: f64 = bf.iter().map(Group::excess).sum();

    if ffd_excess <= bf_excess {
        ffd
    } else {
        bf
    }
}

/// First-fit-decreasing: largest units first, each into the first group
/// whose total after insertion stays within the overflow allowance. When no
/// group qualifies the unit goes to the group with the lowest total.
pub(super) fn first_fit_decreasing(
    units: &[Unit],
    target_amount: f64,
    number_of_groups: u32,
) -> Vec<Group> {
    let mut groups = new_groups(target_amount, number_of_groups);

    for unit in sort_decreasing(units) {
        let slot = groups
            .iter()
            .position(|g| g.total + unit.value <= target_amount * OVERFLOW_ALLOWANCE)
            .unwrap_or_else(|| min_total_index(&groups));
        groups[slot].push_unit(unit);
    }

    groups
}

/// Best-fit: largest units first, each into the group with the smallest
/// remaining capacity that still holds it, falling back to the group with
/// the lowest total.
pub(super) fn best_fit(units: &[Unit], target_amount: f64, number_of_groups: u32) -> Vec<Group> {
    let mut groups = new_groups(target_amount, number_of_groups);

    for unit in sort_decreasing(units) {
        let mut tightest: Option<(usize, f64)> = None;
        for (idx, group) in groups.iter().enumerate() {
            let remaining = target_amount - group.total;
            if remaining < unit.value {
                continue;
            }
            match tightest {
                None => tightest = Some((idx, remaining)),
                Some((_, best)) if remaining < best => tightest = Some((idx, remaining)),
                _ => {}
            }
        }

        let slot = match tightest {
            Some((idx, _)) => idx,
            None => min_total_index(&groups),
        };
        groups[slot].push_unit(unit);
    }

    groups
}

fn new_groups(target_amount: f64, number_of_groups: u32) -> Vec<Group> {
    (1..=number_of_groups)
        .map(|number| Group::new(number, target_amount))
        .collect()
}

/// Stable descending sort, so equal values keep their encounter order.
fn sort_decreasing(units: &[Unit]) -> Vec<Unit> {
    let mut sorted = units.to_vec();
    sorted.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    sorted
}

/// Index of the group with the lowest total; ties go to the lowest ordinal.
fn min_total_index(groups: &[Group]) -> usize {
    let mut min_idx = 0;
    for (idx, group) in groups.iter().enumerate().skip(1) {
        if group.total < groups[min_idx].total {
            min_idx = idx;
        }
    }
    min_idx
}

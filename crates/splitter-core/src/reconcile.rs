//! Derived view-logic: which original-item quantity is still unassigned
//! given a list's items and its current groups. Units are matched through
//! their explicit `source_item_id`, never by parsing display ids.

use crate::types::{Group, LineItem, Unit};
use std::collections::HashMap;

/// Counts, per original item id, how many of its units the groups hold.
fn assigned_counts<'a>(groups: &'a [Group]) -> HashMap<&'a str, u32> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for group in groups {
        for unit in &group.units {
            *counts.entry(unit.source_item_id.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

/// Remaining unassigned quantity per item id. Fully assigned items are
/// omitted; an item with more units placed than its quantity (after an
/// edit) reports zero remaining and is omitted too.
pub fn unassigned_quantities(items: &[LineItem], groups: &[Group]) -> HashMap<String, u32> {
    let assigned = assigned_counts(groups);
    let mut remaining = HashMap::new();
    for item in items {
        let used = assigned.get(item.id.as_str()).copied().unwrap_or(0);
        let left = item.quantity.saturating_sub(used);
        if left > 0 {
            remaining.insert(item.id.clone(), left);
        }
    }
    remaining
}

/// Materializes the unassigned units for presentation. Unit indices continue
/// after the assigned count, so an item with 1 of 3 units placed yields the
/// units 2/3 and 3/3. Item order is preserved.
pub fn unassigned_units(items: &[LineItem], groups: &[Group]) -> Vec<Unit> {
    let assigned = assigned_counts(groups);
    let mut units = Vec::new();
    for item in items {
        let used = assigned.get(item.id.as_str()).copied().unwrap_or(0);
        for index in (used + 1)..=item.quantity {
            units.push(Unit::slice_of(item, index));
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, quantity: u32) -> LineItem {
        LineItem::new(id, id.to_uppercase(), price, quantity)
    }

    fn group_with(number: u32, target: f64, units: Vec<Unit>) -> Group {
        let mut group = Group::new(number, target);
        for unit in units {
            group.push_unit(unit);
        }
        group
    }

    #[test]
    fn counts_remaining_quantity_per_item() {
        let items = vec![item("milk", 1.5, 3), item("bread", 2.0, 1)];
        let groups = vec![group_with(1, 5.0, vec![Unit::slice_of(&items[0], 1)])];

        let remaining = unassigned_quantities(&items, &groups);
        assert_eq!(remaining.get("milk"), Some(&2));
        assert_eq!(remaining.get("bread"), Some(&1));
    }

    #[test]
    fn fully_assigned_items_are_omitted() {
        let items = vec![item("milk", 1.5, 2)];
        let groups = vec![
            group_with(1, 5.0, vec![Unit::slice_of(&items[0], 1)]),
            group_with(2, 5.0, vec![Unit::slice_of(&items[0], 2)]),
        ];

        assert!(unassigned_quantities(&items, &groups).is_empty());
    }

    #[test]
    fn leftover_units_continue_numbering_after_assigned_count() {
        let items = vec![item("milk", 1.5, 3)];
        let groups = vec![group_with(1, 5.0, vec![Unit::slice_of(&items[0], 1)])];

        let leftovers = unassigned_units(&items, &groups);
        let indices: Vec<u32> = leftovers.iter().map(|u| u.unit_index).collect();
        assert_eq!(indices, vec![2, 3]);
        assert!(leftovers.iter().all(|u| u.source_item_id == "milk"));
        assert!(leftovers.iter().all(|u| u.original_quantity == 3));
    }

    #[test]
    fn over_assignment_saturates_to_zero() {
        // Quantity was edited down after packing; three units still sit in
        // groups.
        let mut shrunk = item("milk", 1.5, 3);
        let groups = vec![group_with(
            1,
            5.0,
            vec![
                Unit::slice_of(&shrunk, 1),
                Unit::slice_of(&shrunk, 2),
                Unit::slice_of(&shrunk, 3),
            ],
        )];
        shrunk.quantity = 1;
        shrunk.retotal();

        let items = vec![shrunk];
        assert!(unassigned_quantities(&items, &groups).is_empty());
        assert!(unassigned_units(&items, &groups).is_empty());
    }
}

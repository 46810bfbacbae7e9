//! Value-level shopping list operations. Callers own persistence and
//! rendering; everything here is pure data manipulation over one list.

use crate::reconcile;
use crate::splitter::Splitter;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A shopping list with its items and, once split, the assigned groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
    pub date: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Sum of the item totals, rounded to 2 decimals
    pub total: f64,
    #[serde(default)]
    pub split_mode: bool,
}

impl ShoppingList {
    pub fn new(id: impl Into<String>, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date: date.into(),
            items: Vec::new(),
            groups: Vec::new(),
            total: 0.0,
            split_mode: false,
        }
    }

    fn retotal(&mut self) {
        self.total = round2(self.items.iter().map(|i| i.total).sum());
    }

    /// Appends an item and refreshes the list total.
    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
        self.retotal();
    }

    /// Removes an item everywhere: from the list and, unit by unit, from
    /// any group that holds part of it. Group totals stay consistent.
    pub fn remove_item(&mut self, item_id: &str) {
        self.items.retain(|i| i.id != item_id);
        for group in &mut self.groups {
            group.units.retain(|u| u.source_item_id != item_id);
            group.retotal();
        }
        self.retotal();
    }

    /// Applies a price/quantity edit. Units already placed keep their slots
    /// but pick up the new price; units past a reduced quantity are dropped
    /// from their groups.
    pub fn update_item(&mut self, item_id: &str, price: f64, quantity: u32) -> Result<()> {
        if price < 0.0 {
            return Err(SplitError::InvalidArgument(format!(
                "Item '{item_id}' price must not be negative"
            )));
        }
        let item = match self.items.iter_mut().find(|i| i.id == item_id) {
            Some(item) => item,
            None => {
                return Err(SplitError::InvalidArgument(format!(
                    "No item '{item_id}' in the list"
                )))
            }
        };
        item.price = price;
        item.quantity = quantity;
        item.retotal();

        for group in &mut self.groups {
            for unit in &mut group.units {
                if unit.source_item_id == item_id {
                    unit.value = price;
                    unit.original_quantity = quantity;
                }
            }
            group
                .units
                .retain(|u| u.source_item_id != item_id || u.unit_index <= quantity);
            group.retotal();
        }
        self.retotal();
        Ok(())
    }

    /// Enters or leaves split mode. Entering drops the groups of an earlier
    /// run; leaving keeps them so the split can be resumed.
    pub fn set_split_mode(&mut self, split: bool) {
        if split && !self.split_mode {
            self.groups.clear();
        }
        self.split_mode = split;
    }

    /// Runs the split engine over the list's items and stores the groups.
    pub fn apply_split(&mut self, plan: SplitPlan) -> Result<()> {
        let splitter = Splitter::new(SplitRequest {
            items: self.items.clone(),
            plan,
        })?;
        self.groups = splitter.split().groups;
        self.split_mode = true;
        Ok(())
    }

    /// Drag-drop semantic: pull the unit out of whichever group holds it
    /// (or out of the unassigned pool) and push it into the target group.
    /// Both totals stay consistent with their membership.
    pub fn move_unit(&mut self, unit_id: &str, target_group_id: &str) -> Result<()> {
        if !self.groups.iter().any(|g| g.id == target_group_id) {
            return Err(SplitError::InvalidArgument(format!(
                "No group '{target_group_id}' in the list"
            )));
        }

        let mut moved: Option<Unit> = None;
        for group in &mut self.groups {
            if let Some(pos) = group.units.iter().position(|u| u.id == unit_id) {
                moved = Some(group.take_unit(pos));
                break;
            }
        }

        let unit = match moved.or_else(|| self.find_unassigned_unit(unit_id)) {
            Some(unit) => unit,
            None => {
                return Err(SplitError::InvalidArgument(format!(
                    "No unit '{unit_id}' to move"
                )))
            }
        };

        for group in &mut self.groups {
            if group.id == target_group_id {
                group.push_unit(unit);
                break;
            }
        }
        Ok(())
    }

    fn find_unassigned_unit(&self, unit_id: &str) -> Option<Unit> {
        reconcile::unassigned_units(&self.items, &self.groups)
            .into_iter()
            .find(|u| u.id == unit_id)
    }

    /// Re-targets one group.
    pub fn update_group_target(&mut self, group_id: &str, target_amount: f64) -> Result<()> {
        if target_amount <= 0.0 {
            return Err(SplitError::InvalidArgument(
                "Target amount must be positive".to_string(),
            ));
        }
        match self.groups.iter_mut().find(|g| g.id == group_id) {
            Some(group) => {
                group.target_amount = target_amount;
                Ok(())
            }
            None => Err(SplitError::InvalidArgument(format!(
                "No group '{group_id}' in the list"
            ))),
        }
    }

    /// Remaining unassigned quantity per item id.
    pub fn unassigned(&self) -> HashMap<String, u32> {
        reconcile::unassigned_quantities(&self.items, &self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_items() -> ShoppingList {
        let mut list = ShoppingList::new("list-1", "Saturday run", "2024-06-01");
        list.add_item(LineItem::new("milk", "Milk", 1.5, 4));
        list.add_item(LineItem::new("bread", "Bread", 2.5, 1));
        list
    }

    #[test]
    fn add_and_remove_keep_the_list_total_fresh() {
        let mut list = list_with_items();
        assert_eq!(list.total, 8.5);

        list.remove_item("milk");
        assert_eq!(list.total, 2.5);
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn removing_an_item_purges_its_units_from_groups() {
        let mut list = list_with_items();
        list.apply_split(SplitPlan::Uniform {
            target_amount: 4.25,
            number_of_groups: 2,
        })
        .unwrap();

        list.remove_item("milk");
        for group in &list.groups {
            assert!(group.units.iter().all(|u| u.source_item_id != "milk"));
            let expected: f64 = group.units.iter().map(|u| u.value).sum();
            assert!((group.total - round2(expected)).abs() < 1e-9);
        }
    }

    #[test]
    fn editing_an_item_rewrites_its_placed_units() {
        let mut list = list_with_items();
        list.apply_split(SplitPlan::Uniform {
            target_amount: 4.25,
            number_of_groups: 2,
        })
        .unwrap();

        list.update_item("milk", 2.0, 2).unwrap();

        let placed: Vec<&Unit> = list
            .groups
            .iter()
            .flat_map(|g| &g.units)
            .filter(|u| u.source_item_id == "milk")
            .collect();
        assert!(placed.iter().all(|u| u.value == 2.0));
        assert!(placed.iter().all(|u| u.unit_index <= 2));
        assert_eq!(list.total, 6.5);
    }

    #[test]
    fn entering_split_mode_clears_stale_groups() {
        let mut list = list_with_items();
        list.apply_split(SplitPlan::Uniform {
            target_amount: 4.25,
            number_of_groups: 2,
        })
        .unwrap();
        assert!(!list.groups.is_empty());

        list.set_split_mode(false);
        assert!(!list.groups.is_empty());

        list.set_split_mode(true);
        assert!(list.groups.is_empty());
    }

    #[test]
    fn move_unit_between_groups_updates_both_totals() {
        let mut list = list_with_items();
        list.apply_split(SplitPlan::Uniform {
            target_amount: 4.25,
            number_of_groups: 2,
        })
        .unwrap();

        let unit_id = list.groups[0].units[0].id.clone();
        let unit_value = list.groups[0].units[0].value;
        let before_source = list.groups[0].total;
        let before_target = list.groups[1].total;

        list.move_unit(&unit_id, "group-2").unwrap();

        assert!((list.groups[0].total - round2(before_source - unit_value)).abs() < 1e-9);
        assert!((list.groups[1].total - round2(before_target + unit_value)).abs() < 1e-9);
        assert!(list.groups[1].units.iter().any(|u| u.id == unit_id));
    }

    #[test]
    fn move_unit_can_pull_from_the_unassigned_pool() {
        let mut list = list_with_items();
        list.apply_split(SplitPlan::Tiered {
            group_specs: vec![GroupSpec {
                target_amount: 2.5,
                count: 1,
            }],
        })
        .unwrap();

        // Packing always places every unit, so empty the group to get an
        // unassigned pool to drag from.
        list.groups[0].units.clear();
        list.groups[0].retotal();

        let leftover = reconcile::unassigned_units(&list.items, &list.groups);
        let unit_id = leftover[0].id.clone();
        list.move_unit(&unit_id, "group-1").unwrap();
        assert!(list.groups[0].units.iter().any(|u| u.id == unit_id));
    }

    #[test]
    fn move_unit_rejects_unknown_targets_and_units() {
        let mut list = list_with_items();
        list.apply_split(SplitPlan::Uniform {
            target_amount: 4.25,
            number_of_groups: 2,
        })
        .unwrap();

        assert!(list.move_unit("milk-1", "group-9").is_err());
        assert!(list.move_unit("nope-1", "group-1").is_err());
    }

    #[test]
    fn update_group_target_validates_input() {
        let mut list = list_with_items();
        list.apply_split(SplitPlan::Uniform {
            target_amount: 4.25,
            number_of_groups: 2,
        })
        .unwrap();

        list.update_group_target("group-1", 6.0).unwrap();
        assert_eq!(list.groups[0].target_amount, 6.0);

        assert!(list.update_group_target("group-1", 0.0).is_err());
        assert!(list.update_group_target("group-9", 5.0).is_err());
    }
}

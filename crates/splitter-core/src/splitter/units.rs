use crate::types::{LineItem, Unit};

/// Expands each line item of quantity N into N quantity-1 units.
///
/// Item order is preserved and unit indices count up from 1 within an item,
/// so a multi-quantity item can land in several groups and still be traced
/// back to its source. Unit value is the item's unit price, not a share of
/// the rounded item total. A quantity of zero yields no units.
pub fn expand_units(items: &[LineItem]) -> Vec<Unit> {
    let mut units = Vec::with_capacity(items.iter().map(|i| i.quantity as usize).sum());
    for item in items {
        for index in 1..=item.quantity {
            units.push(Unit::slice_of(item, index));
        }
    }
    units
}

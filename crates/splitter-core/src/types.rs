use serde::{Deserialize, Serialize};

/// Rounds a monetary amount to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Line item of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    /// Always price × quantity, rounded to 2 decimals
    pub total: f64,
}

impl LineItem {
    /// Builds an item with `total` derived from price and quantity.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            total: round2(price * quantity as f64),
        }
    }

    /// Recomputes `total` after a price or quantity edit.
    pub fn retotal(&mut self) {
        self.total = round2(self.price * self.quantity as f64);
    }
}

/// Quantity-1 slice of a line item. Units are ephemeral: they are rebuilt on
/// every packing run and only live inside the group they land in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Display id of the form `<source_item_id>-<unit_index>`
    pub id: String,
    pub name: String,
    pub value: f64,
    pub source_item_id: String,
    /// 1-based position among the source item's units
    pub unit_index: u32,
    pub original_quantity: u32,
}

impl Unit {
    /// Materializes the `index`-th unit (1-based) of an item.
    pub fn slice_of(item: &LineItem, index: u32) -> Self {
        Self {
            id: format!("{}-{}", item.id, index),
            name: item.name.clone(),
            value: item.price,
            source_item_id: item.id.clone(),
            unit_index: index,
            original_quantity: item.quantity,
        }
    }
}

/// One group of the split, holding the units assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub number: u32,
    pub target_amount: f64,
    /// Sum of the member units' values, rounded to 2 decimals after every
    /// membership change
    pub total: f64,
    pub units: Vec<Unit>,
}

impl Group {
    pub fn new(number: u32, target_amount: f64) -> Self {
        Self {
            id: format!("group-{number}"),
            number,
            target_amount,
            total: 0.0,
            units: Vec::new(),
        }
    }

    /// Adds a unit, keeping `total` in sync.
    pub fn push_unit(&mut self, unit: Unit) {
        self.total = round2(self.total + unit.value);
        self.units.push(unit);
    }

    /// Removes the unit at `index`, keeping `total` in sync.
    pub fn take_unit(&mut self, index: usize) -> Unit {
        let unit = self.units.remove(index);
        self.total = round2(self.total - unit.value);
        unit
    }

    /// Re-derives `total` from scratch after bulk edits to the unit list.
    pub fn retotal(&mut self) {
        self.total = round2(self.units.iter().map(|u| u.value).sum());
    }

    /// Absolute distance of the current total to the target.
    pub fn deviation(&self) -> f64 {
        (self.total - self.target_amount).abs()
    }

    /// Amount the group exceeds its target, zero when at or under it.
    pub fn excess(&self) -> f64 {
        (self.total - self.target_amount).max(0.0)
    }
}

/// Expands to `count` groups sharing one target amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub target_amount: f64,
    pub count: u32,
}

/// Group layout the engine fills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SplitPlan {
    /// Every group shares one common target amount
    Uniform {
        target_amount: f64,
        number_of_groups: u32,
    },
    /// Heterogeneous targets, expanded in spec order
    Tiered { group_specs: Vec<GroupSpec> },
}

/// Input: what the caller provides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRequest {
    pub items: Vec<LineItem>,
    pub plan: SplitPlan,
}

/// Summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub group_count: u32,
    pub grand_total: f64,
    /// Sum across groups of the amount exceeding their targets
    pub total_excess: f64,
    /// Largest distance-to-target across groups
    pub worst_deviation: f64,
}

/// Output: what the engine returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitResult {
    pub groups: Vec<Group>,
    pub summary: Summary,
}

/// Error type for splitting
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SplitError>;

use crate::types::*;

mod multi;
mod single;
mod units;


pub use units::expand_units;

/// Splits a shopping list's units across groups so that every group's total
/// approaches its target amount. Uniform plans run two interchangeable
/// heuristics and keep the better result; tiered plans run a greedy fill
/// with redistribution and swap refinement.
pub struct Splitter {
    request: SplitRequest,
}

impl Splitter {
    /// Validates the request and builds a new splitter instance.
    pub fn new(request: SplitRequest) -> Result<Self> {
        for item in &request.items {
            if item.price < 0.0 {
                return Err(SplitError::InvalidArgument(format!(
                    "Item '{}' has a negative price",
                    item.id
                )));
            }
        }

        match &request.plan {
            SplitPlan::Uniform {
                target_amount,
                number_of_groups,
            } => {
                if *target_amount <= 0.0 {
                    return Err(SplitError::InvalidArgument(
                        "Target amount must be positive".to_string(),
                    ));
                }
                if *number_of_groups < 1 {
                    return Err(SplitError::InvalidArgument(
                        "At least one group is required".to_string(),
                    ));
                }
            }
            SplitPlan::Tiered { group_specs } => {
                if group_specs.is_empty() {
                    return Err(SplitError::InvalidArgument(
                        "At least one group spec must be provided".to_string(),
                    ));
                }
                for spec in group_specs {
                    if spec.target_amount <= 0.0 {
                        return Err(SplitError::InvalidArgument(
                            "Every group spec needs a positive target amount".to_string(),
                        ));
                    }
                    if spec.count < 1 {
                        return Err(SplitError::InvalidArgument(
                            "Every group spec needs a count of at least one".to_string(),
                        ));
                    }
                }
            }
        }

        Ok(Self { request })
    }

    /// Runs the packing flow and returns the filled groups with statistics.
    /// Every unit is always placed; approaching the targets never drops one.
    pub fn split(&self) -> SplitResult {
        let units = units::expand_units(&self.request.items);

        let groups = match &self.request.plan {
            SplitPlan::Uniform {
                target_amount,
                number_of_groups,
            } => single::optimize(&units, *target_amount, *number_of_groups),
            SplitPlan::Tiered { group_specs } => multi::pack(&units, group_specs),
        };

        let summary = calculate_summary(&groups);
        SplitResult { groups, summary }
    }
}

/// Packs `items` into `number_of_groups` groups sharing `target_amount`.
pub fn pack_single_target(
    items: &[LineItem],
    target_amount: f64,
    number_of_groups: u32,
) -> Result<Vec<Group>> {
    let splitter = Splitter::new(SplitRequest {
        items: items.to_vec(),
        plan: SplitPlan::Uniform {
            target_amount,
            number_of_groups,
        },
    })?;
    Ok(splitter.split().groups)
}

/// Packs `items` into groups expanded from heterogeneous target specs.
pub fn pack_multi_target(items: &[LineItem], group_specs: &[GroupSpec]) -> Result<Vec<Group>> {
    let splitter = Splitter::new(SplitRequest {
        items: items.to_vec(),
        plan: SplitPlan::Tiered {
            group_specs: group_specs.to_vec(),
        },
    })?;
    Ok(splitter.split().groups)
}

/// Computes aggregate statistics over the final groups.
fn calculate_summary(groups: &[Group]) -> Summary {
    Summary {
        group_count: groups.len() as u32,
        grand_total: round2(groups.iter().map(|g| g.total).sum()),
        total_excess: round2(groups.iter().map(Group::excess).sum()),
        worst_deviation: groups.iter().map(Group::deviation).fold(0.0, f64::max),
    }
}

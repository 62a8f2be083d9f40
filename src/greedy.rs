use crate::error::Result;
use crate::types::{
    Demand, EPS, ParentRoll, RollPlan, Solution, SolutionSource, aggregate_demands,
    validate_demands,
};

/// First-fit-decreasing packer. Always feasible, no optimality guarantee.
///
/// Each roll is filled by scanning the demands widest first and placing as
/// many copies of each as still fit.
pub fn pack_greedy(demands: &[Demand], parent: ParentRoll) -> Result<Solution> {
    validate_demands(demands, &parent)?;

    let order = aggregate_demands(demands.iter().copied());
    let mut remaining: Vec<u32> = order.iter().map(|d| d.qty).collect();
    let mut rolls = Vec::new();

    while remaining.iter().any(|&q| q > 0) {
        let mut pieces = Vec::new();
        let mut free = parent.width;

        for (d, left) in order.iter().zip(remaining.iter_mut()) {
            while *left > 0 && d.width <= free + EPS {
                pieces.push(d.width);
                free -= d.width;
                *left -= 1;
            }
        }

        // Validated widths guarantee at least one piece per roll.
        debug_assert!(!pieces.is_empty());
        rolls.push(RollPlan::from_pieces(pieces, parent.width));
    }

    Ok(Solution {
        rolls,
        parent,
        source: SolutionSource::Greedy,
    })
}

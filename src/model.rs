//! Integer program for one chunk of demands on one parent width.
//!
//! Variables:
//! - `x[i][j]`: copies of demand `i` cut from slot `j`, in `0..=cap_i`
//! - `y[j]`: slot `j` is used
//! - `waste[j]`: width left over on slot `j`
//! - `rolls_used`: number of used slots, within the estimated bounds
//!
//! The objective weighs slot `j` by `j + 1`, which together with the
//! symmetry-breaking rows pushes used slots to the front.

use std::time::Duration;

use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution as _, SolverModel,
    Variable, constraint, variable,
};
use tracing::debug;

use crate::bounds::Bounds;
use crate::error::SolveError;
use crate::types::{Demand, EPS};

pub struct CuttingModel {
    vars: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    x: Vec<Vec<Variable>>,
    rolls_used: Variable,
    widths: Vec<f64>,
    quantities: Vec<u32>,
    parent_width: f64,
}

/// Values read back from a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSolution {
    pub rolls_used: usize,
    /// `x[i][j]`: copies of demand `i` on slot `j`.
    pub x: Vec<Vec<u32>>,
    pub waste: Vec<f64>,
}

impl CuttingModel {
    pub fn build(
        demands: &[Demand],
        parent_width: f64,
        bounds: &Bounds,
        symmetry_breaking: bool,
    ) -> Self {
        let n = demands.len();
        let slots = bounds.slots();
        let mut vars = ProblemVariables::new();

        let y: Vec<Variable> = (0..slots).map(|_| vars.add(variable().binary())).collect();
        let x: Vec<Vec<Variable>> = (0..n)
            .map(|i| {
                let cap = bounds.per_demand_cap[i] as f64;
                (0..slots)
                    .map(|_| vars.add(variable().integer().min(0).max(cap)))
                    .collect()
            })
            .collect();
        let waste: Vec<Variable> = (0..slots)
            .map(|_| vars.add(variable().min(0.0).max(parent_width)))
            .collect();
        let rolls_used = vars.add(
            variable()
                .integer()
                .min(bounds.lower as f64)
                .max(bounds.upper as f64),
        );

        let mut constraints = Vec::with_capacity(n + 3 * slots + 1);

        for (i, d) in demands.iter().enumerate() {
            let assigned: Expression = x[i].iter().copied().sum();
            constraints.push(constraint!(assigned >= d.qty as f64));
        }

        let slot_count = |j: usize| -> Expression { x.iter().map(|row| row[j]).sum() };

        for j in 0..slots {
            let load: Expression = demands
                .iter()
                .enumerate()
                .map(|(i, d)| d.width * x[i][j])
                .sum();
            constraints.push(constraint!(load.clone() <= parent_width * y[j]));
            constraints.push(constraint!(parent_width * y[j] - load == waste[j]));

            if symmetry_breaking && j + 1 < slots {
                constraints.push(constraint!(slot_count(j) >= slot_count(j + 1)));
            }
        }

        let used: Expression = y.iter().copied().sum();
        constraints.push(constraint!(rolls_used == used));

        let objective: Expression = y
            .iter()
            .enumerate()
            .map(|(j, &yj)| (j as f64 + 1.0) * yj)
            .sum();

        debug!(
            demands = n,
            slots,
            constraints = constraints.len(),
            "built cutting model"
        );

        Self {
            vars,
            objective,
            constraints,
            x,
            rolls_used,
            widths: demands.iter().map(|d| d.width).collect(),
            quantities: demands.iter().map(|d| d.qty).collect(),
            parent_width,
        }
    }

    /// Runs the MILP solver. With a `time_limit` the HiGHS backend stops
    /// at the limit and its best incumbent is used; the microlp backend has
    /// no limit and always runs to completion.
    pub fn solve(self, time_limit: Option<Duration>) -> Result<ModelSolution, SolveError> {
        let Self {
            vars,
            objective,
            constraints,
            x,
            rolls_used,
            widths,
            quantities,
            parent_width,
        } = self;

        let problem = vars.minimise(objective);

        #[cfg(feature = "highs")]
        let solved = {
            let mut model = problem.using(good_lp::solvers::highs::highs);
            if let Some(limit) = time_limit {
                model = model.set_time_limit(limit.as_secs_f64());
            }
            model.with_all(constraints).solve()
        };

        #[cfg(not(feature = "highs"))]
        let solved = {
            if time_limit.is_some() {
                debug!("microlp has no time limit, solving to completion");
            }
            problem
                .using(good_lp::solvers::microlp::microlp)
                .with_all(constraints)
                .solve()
        };

        let solution = solved.map_err(|e| match e {
            ResolutionError::Infeasible => SolveError::Infeasible,
            ResolutionError::Unbounded => SolveError::Unbounded,
            other => SolveError::Failed(other.to_string()),
        })?;

        let counts: Vec<Vec<u32>> = x
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| read_value(solution.value(v)).round().max(0.0) as u32)
                    .collect()
            })
            .collect();

        // Waste is derived from the rounded counts rather than read back, so
        // pieces plus waste always add up to the parent width.
        let slots = counts.first().map_or(0, Vec::len);
        let loads: Vec<f64> = (0..slots)
            .map(|j| {
                counts
                    .iter()
                    .zip(&widths)
                    .map(|(row, w)| row[j] as f64 * w)
                    .sum()
            })
            .collect();

        // A solve stopped by its time limit can report values without having
        // found an incumbent.
        let short = counts
            .iter()
            .zip(&quantities)
            .any(|(row, &qty)| row.iter().sum::<u32>() < qty);
        let overfull = loads.iter().any(|&load| load > parent_width + 1e-6);
        if short || overfull {
            return Err(SolveError::NoIncumbent);
        }

        let waste = loads
            .iter()
            .map(|&load| {
                if load > EPS {
                    (parent_width - load).max(0.0)
                } else {
                    parent_width
                }
            })
            .collect();

        Ok(ModelSolution {
            rolls_used: read_value(solution.value(rolls_used)).round().max(0.0) as usize,
            x: counts,
            waste,
        })
    }
}

/// Unset or non-numeric values read as zero.
fn read_value(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

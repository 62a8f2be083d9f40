use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::assemble::assemble_rolls;
use crate::bounds::Bounds;
use crate::chunk::pair_chunks;
use crate::config::RunConfig;
use crate::error::{Result, SolveError};
use crate::greedy::pack_greedy;
use crate::model::CuttingModel;
use crate::types::{
    Demand, EPS, ParentRoll, RollPlan, Solution, SolutionSource, aggregate_demands,
    validate_demands,
};

pub struct Solver {
    parent: ParentRoll,
    demands: Vec<Demand>,
    config: RunConfig,
}

impl Solver {
    pub fn new(parent: ParentRoll, demands: Vec<Demand>, config: RunConfig) -> Self {
        Self {
            parent,
            demands: aggregate_demands(demands),
            config,
        }
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Runs the chunked ILP trials under the time budget and returns the
    /// better of their best result and the greedy packing.
    pub async fn solve(&self) -> Result<Solution> {
        validate_demands(&self.demands, &self.parent)?;
        self.config.validate()?;

        if self.demands.iter().all(|d| d.qty == 0) {
            return Ok(Solution::empty(self.parent, SolutionSource::Greedy));
        }

        let greedy = pack_greedy(&self.demands, self.parent)?;
        debug!(rolls = greedy.rolls_used(), "greedy packing");

        if self.config.time_budget.is_zero() {
            warn!("zero time budget, skipping ILP");
            return Ok(greedy);
        }

        let best = match self.best_ilp().await {
            Some(ilp) if !is_better(&greedy, &ilp) => ilp,
            _ => greedy,
        };

        info!(
            rolls = best.rolls_used(),
            waste = best.total_waste(),
            source = %best.source,
            "solved"
        );
        Ok(best)
    }

    async fn best_ilp(&self) -> Option<Solution> {
        // A budget past the end of the clock means no deadline at all.
        let deadline = std::time::Instant::now().checked_add(self.config.time_budget);
        if deadline.is_none() {
            debug!("time budget out of clock range, running without a deadline");
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        let demands = Arc::new(self.demands.clone());

        let trials: Vec<_> = self
            .config
            .trial_sizes()
            .into_iter()
            .map(|size| {
                let demands = Arc::clone(&demands);
                let cancelled = Arc::clone(&cancelled);
                let parent = self.parent;
                let symmetry_breaking = self.config.symmetry_breaking;
                let handle = tokio::task::spawn_blocking(move || {
                    solve_chunked(&demands, parent, size, symmetry_breaking, deadline, &cancelled)
                });
                (size, handle)
            })
            .collect();

        let mut best: Option<Solution> = None;
        for (size, handle) in trials {
            let joined = match deadline {
                Some(at) => timeout_at(Instant::from_std(at), handle).await,
                None => Ok(handle.await),
            };
            match joined {
                Ok(Ok(Ok(sol))) => {
                    info!(chunk_size = size, rolls = sol.rolls_used(), "ILP trial finished");
                    if best.as_ref().is_none_or(|b| is_better(&sol, b)) {
                        best = Some(sol);
                    }
                }
                Ok(Ok(Err(e))) => warn!(chunk_size = size, error = %e, "ILP trial failed"),
                Ok(Err(e)) => warn!(chunk_size = size, error = %e, "ILP trial panicked"),
                Err(_) => {
                    warn!(chunk_size = size, "ILP trial exceeded time budget, abandoning");
                    cancelled.store(true, Ordering::Relaxed);
                }
            }
        }
        best
    }
}

/// `a` uses fewer rolls than `b`, or as many with less waste.
fn is_better(a: &Solution, b: &Solution) -> bool {
    let (a_rolls, a_waste) = a.cost();
    let (b_rolls, b_waste) = b.cost();
    a_rolls < b_rolls || (a_rolls == b_rolls && a_waste < b_waste - EPS)
}

/// Solves every chunk in turn and concatenates the rolls. A chunk whose
/// model fails is packed greedily instead.
///
/// Each chunk's solve is limited to the time left before `deadline`. Once
/// the deadline passes or `cancelled` is set, partial work is thrown away.
pub fn solve_chunked(
    demands: &[Demand],
    parent: ParentRoll,
    chunk_size: usize,
    symmetry_breaking: bool,
    deadline: Option<std::time::Instant>,
    cancelled: &AtomicBool,
) -> std::result::Result<Solution, SolveError> {
    let expired = || {
        cancelled.load(Ordering::Relaxed)
            || deadline.is_some_and(|at| std::time::Instant::now() >= at)
    };

    let chunks = pair_chunks(demands, chunk_size);
    let mut rolls = Vec::new();

    for (idx, chunk) in chunks.iter().enumerate() {
        if expired() {
            return Err(SolveError::Cancelled);
        }
        if chunk.iter().all(|d| d.qty == 0) {
            continue;
        }

        let time_limit = deadline.map(|at| at.saturating_duration_since(std::time::Instant::now()));
        info!(chunk = idx, of = chunks.len(), demands = chunk.len(), "solving chunk");
        match solve_chunk(chunk, parent.width, symmetry_breaking, time_limit) {
            Ok(plans) => rolls.extend(plans),
            Err(e) => {
                warn!(chunk = idx, error = %e, "chunk solve failed, packing greedily");
                let fallback = pack_greedy(chunk, parent)
                    .map_err(|e| SolveError::Failed(e.to_string()))?;
                rolls.extend(fallback.rolls);
            }
        }
    }

    if expired() {
        return Err(SolveError::Cancelled);
    }

    Ok(Solution {
        rolls,
        parent,
        source: SolutionSource::Ilp,
    })
}

/// Bounds, model, solve and assembly for a single chunk.
pub fn solve_chunk(
    chunk: &[Demand],
    parent_width: f64,
    symmetry_breaking: bool,
    time_limit: Option<Duration>,
) -> std::result::Result<Vec<RollPlan>, SolveError> {
    let chunk = aggregate_demands(chunk.iter().copied());
    let bounds = Bounds::estimate(&chunk, parent_width);
    debug!(lower = bounds.lower, upper = bounds.upper, "chunk bounds");

    let solution =
        CuttingModel::build(&chunk, parent_width, &bounds, symmetry_breaking).solve(time_limit)?;
    let plans = assemble_rolls(&solution, &chunk);

    if solution.rolls_used != plans.len() {
        debug!(
            reported = solution.rolls_used,
            assembled = plans.len(),
            "solver roll count differs from used slots"
        );
    }
    Ok(plans)
}

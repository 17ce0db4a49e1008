//! Run-and-verify driver.
//!
//! The optimizer is a randomized heuristic: a run can, rarely, end in a
//! state that breaks a fatal invariant. The remedy is to throw the state
//! away and rerun on a freshly loaded problem with new randomness.
//! [`optimize`] performs one checked run; [`optimize_until_sane`] keeps
//! retrying.

use tracing::{error, info, warn};

use crate::error::ProblemError;
use crate::models::Problem;
use crate::optimizer::{EagerOptimizer, OptimizationSummary, Optimizer, OptimizerConfig};
use crate::sanity::{check_sanity, SanityChecker, SanityReport};

/// Result of a checked optimization loop.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The final allocation.
    pub problem: Problem,
    /// What the last run did.
    pub summary: OptimizationSummary,
    /// Sanity report of the final allocation.
    pub report: SanityReport,
    /// Runs performed, including the final one.
    pub attempts: usize,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}

/// Optimizes `problem` once and checks the result.
///
/// Returns the optimized problem and whether every fatal invariant holds.
pub fn optimize(mut problem: Problem, config: &OptimizerConfig) -> (Problem, bool) {
    EagerOptimizer::with_config(config.clone()).optimize(&mut problem);
    let passed = check_sanity(&problem);
    (problem, passed)
}

/// Loads and optimizes until the result passes the sanity check.
///
/// `load` is called once per attempt, since a failed attempt leaves its
/// problem in an unusable state. With a seed set, attempt `n` (from 0)
/// uses `seed + n`, so the whole loop is reproducible. After
/// `max_attempts` runs the last outcome is returned even if it failed.
///
/// With `max_attempts` set to `None` the loop only ends on a passing
/// run. Input that fails on every attempt keeps it running forever: for
/// example a program with `availableSlots: 0` and a single possible
/// slot gets that slot fixed and always breaks its occurrence limit.
pub fn optimize_until_sane<F>(
    mut load: F,
    config: &OptimizerConfig,
    max_attempts: Option<usize>,
) -> Result<Outcome, ProblemError>
where
    F: FnMut() -> Result<Problem, ProblemError>,
{
    let mut attempts = 0usize;
    loop {
        let mut attempt_config = config.clone();
        attempt_config.seed = config.seed.map(|s| s.wrapping_add(attempts as u64));
        attempts += 1;

        let mut problem = load()?;
        let summary = EagerOptimizer::with_config(attempt_config).optimize(&mut problem);
        let report = SanityChecker::check(&problem);

        if report.passed() {
            info!(attempts, fitness = problem.fitness(), "allocation accepted");
            return Ok(Outcome {
                problem,
                summary,
                report,
                attempts,
            });
        }
        if max_attempts.is_some_and(|max| attempts >= max) {
            error!(attempts, "giving up: allocation still fails sanity checks");
            return Ok(Outcome {
                problem,
                summary,
                report,
                attempts,
            });
        }
        warn!(attempts, "sanity check failed, rerunning with fresh randomness");
    }
}

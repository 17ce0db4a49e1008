//! Allocation engine.
//!
//! Provides the phased greedy optimizer and the helpers it shares with
//! the repair steps.
//!
//! # Algorithm
//!
//! [`EagerOptimizer`] fixes program slots and places participants in six
//! ordered phases: trivial single-slot programs, the remaining
//! single-slot programs, popularity-driven slot allocation, worst-first
//! residual assignment, and two swap-based repair passes. It is a
//! heuristic; the result is checked afterwards by
//! [`SanityChecker`](crate::sanity::SanityChecker) and the whole run is
//! repeated with fresh randomness when a fatal invariant is broken.
//!
//! # Randomness
//!
//! All random choices (fairness tie-breaks, worst-first ordering, slot
//! bootstrapping, mixed-case slot choice) go through the optimizer's own
//! generator, so a fixed seed reproduces a run exactly.

mod eager;
mod swap;

pub use eager::EagerOptimizer;
pub use swap::{
    execute_local_swap, execute_swap, find_local_swaps, find_swaps, PossibleSwap,
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ParticipantKey, Problem, ProgramKey, Slot};

/// An allocation strategy over a [`Problem`].
pub trait Optimizer {
    /// Strategy name for logs.
    fn name(&self) -> &str;

    /// Runs the strategy, mutating `problem` in place.
    fn optimize(&mut self, problem: &mut Problem) -> OptimizationSummary;
}

/// Tuning knobs of the [`EagerOptimizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Slot allocation handles the least wanted program first.
    pub least_popular_first: bool,
    /// Upper bound on residual-assignment rounds.
    pub max_residual_iterations: usize,
    /// Swap repair only serves participants with more wishes than this.
    pub repair_min_preferences: usize,
    /// Programs missing more participants than this are not repaired.
    pub force_move_threshold: usize,
    /// Seed for the random generator; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            least_popular_first: true,
            max_residual_iterations: 10_000,
            repair_min_preferences: 9,
            force_move_threshold: 5,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_least_popular_first(mut self, least_popular_first: bool) -> Self {
        self.least_popular_first = least_popular_first;
        self
    }

    pub fn with_max_residual_iterations(mut self, iterations: usize) -> Self {
        self.max_residual_iterations = iterations;
        self
    }

    pub fn with_repair_min_preferences(mut self, count: usize) -> Self {
        self.repair_min_preferences = count;
        self
    }

    pub fn with_force_move_threshold(mut self, threshold: usize) -> Self {
        self.force_move_threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// What one optimization run did, phase by phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationSummary {
    /// Programs resolved as trivial cases.
    pub trivial_programs: usize,
    /// Single-slot programs resolved with fairness allocation.
    pub fixed_programs: usize,
    /// Programs whose slots were picked by popularity.
    pub popularity_programs: usize,
    /// Residual-assignment rounds run.
    pub residual_iterations: usize,
    /// Residual assignment stopped at the iteration cap.
    pub residual_capped: bool,
    /// Chained swaps executed for under-allocated participants.
    pub participant_swaps: usize,
    /// Local swaps executed for under-minimum programs.
    pub program_repairs: usize,
}

/// Places `candidates` into `program` at `slot` in randomized-fair order.
///
/// Each candidate draws a tie-breaker in `[0, 1)`; candidates are served
/// in ascending order of tie-breaker plus top pending rank while the
/// program has space. Every candidate's top wish is expected to be
/// `program`. Returns the number placed.
pub fn allocate_fairly<R: Rng + ?Sized>(
    problem: &mut Problem,
    program: ProgramKey,
    slot: Slot,
    candidates: &[ParticipantKey],
    rng: &mut R,
) -> usize {
    let mut ordered: Vec<(f64, ParticipantKey)> = candidates
        .iter()
        .map(|&p| {
            let rank = f64::from(problem.participant(p).top_preference_rank());
            (rng.random::<f64>() + rank, p)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut placed = 0;
    for (_, participant) in ordered {
        if !problem.program(program).has_space(slot) {
            break;
        }
        if problem.assign_first_preference_to_slot(participant, slot) {
            placed += 1;
        }
    }
    debug!(
        program = problem.program(program).id(),
        slot = slot + 1,
        candidates = candidates.len(),
        placed,
        "fair allocation"
    );
    placed
}

/// Drives `participant`'s wish stack until one wish is placed or the
/// participant resolves. Returns whether a wish was placed.
pub fn allocate_one_slot<R: Rng + ?Sized>(
    problem: &mut Problem,
    participant: ParticipantKey,
    rng: &mut R,
) -> bool {
    while !problem.participant(participant).is_resolved() {
        if problem.assign_first_preference(participant, rng) {
            return true;
        }
    }
    false
}

//! Phased greedy optimizer.
//!
//! # Algorithm
//!
//! 1. **Trivial cases**: single-slot programs whose top-wish demand fits
//!    `[min, max]` are fixed and their fans placed directly.
//! 2. **Fixed cases**: remaining single-slot programs are fixed and
//!    filled by fairness allocation.
//! 3. **Popularity**: the least (or most) wanted program gets its most
//!    popular open slots one at a time, each filled to a fixpoint.
//! 4. **Residual**: the participant with the worst fitness (plus a random
//!    tie-breaker) is served next, until everyone resolves or the
//!    iteration cap is hit.
//! 5. **Participant repair**: chained swaps for substantive participants
//!    with free available slots.
//! 6. **Program repair**: local swaps for programs below their minimum.
//!
//! Phases 1 and 2 loop until a pass resolves no program. Resolved
//! entities are pruned from the working sets between phases.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use super::swap::{execute_local_swap, execute_swap, find_local_swaps, find_swaps};
use super::{allocate_fairly, allocate_one_slot, OptimizationSummary, Optimizer, OptimizerConfig};
use crate::models::{slots, ParticipantKey, Problem, ProgramKey};

/// Six-phase greedy optimizer with swap repair.
///
/// # Example
///
/// ```
/// use u_workshop::models::{Problem, Program};
/// use u_workshop::optimizer::{EagerOptimizer, Optimizer, OptimizerConfig};
///
/// let mut problem = Problem::new();
/// problem
///     .add_program(Program::new(1, "Archery").with_capacity(1, 2).with_possible_slot(0))
///     .unwrap();
/// problem.add_participant("anna", [true, false, false], &[1]).unwrap();
///
/// let mut optimizer = EagerOptimizer::with_config(OptimizerConfig::new().with_seed(7));
/// optimizer.optimize(&mut problem);
/// assert!(problem.participant_by_id("anna").unwrap().allocation(0).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct EagerOptimizer<R: Rng = SmallRng> {
    config: OptimizerConfig,
    rng: R,
}

impl EagerOptimizer<SmallRng> {
    /// Creates an optimizer with default settings and OS entropy.
    pub fn new() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    /// Creates an optimizer; seeded when `config.seed` is set.
    pub fn with_config(config: OptimizerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self { config, rng }
    }
}

impl Default for EagerOptimizer<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> EagerOptimizer<R> {
    /// Creates an optimizer drawing from a caller-supplied generator.
    /// `config.seed` is ignored.
    pub fn with_rng(config: OptimizerConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    fn prune(&self, problem: &mut Problem) {
        let participants = problem.prune_resolved_participants();
        let programs = problem.prune_resolved_programs();
        info!(participants, programs, "pruned resolved entities");
    }

    /// Phase 1. Returns the number of programs resolved in this pass.
    fn resolve_trivial_cases(&mut self, problem: &mut Problem) -> usize {
        problem.calculate_primary_preference_counts();
        let trivial: Vec<ProgramKey> = problem
            .unprocessed_programs()
            .iter()
            .copied()
            .filter(|&k| {
                let p = problem.program(k);
                let demand = p.primary_preference_count();
                !p.is_resolved()
                    && p.combinations() == 1
                    && p.possible_slot_count() == 1
                    && demand >= p.min_places()
                    && demand <= p.max_places()
            })
            .collect();

        for &program in &trivial {
            let Some(slot) = problem.program(program).first_possible_slot() else {
                continue;
            };
            problem.assign_program_to_slot(program, slot);
            problem.set_program_resolved(program);
            let mut placed = 0;
            for participant in problem.primary_candidates(program) {
                if problem.assign_first_preference_to_slot(participant, slot) {
                    placed += 1;
                }
            }
            debug!(
                program = problem.program(program).id(),
                slot = slot + 1,
                placed,
                "trivial case resolved"
            );
        }
        trivial.len()
    }

    /// Phase 2. Returns the number of programs resolved in this pass.
    fn resolve_fixed_cases(&mut self, problem: &mut Problem) -> usize {
        problem.sort_programs_by_primary_preference_count();
        let fixed: Vec<ProgramKey> = problem
            .unprocessed_programs()
            .iter()
            .copied()
            .filter(|&k| {
                let p = problem.program(k);
                !p.is_resolved() && p.combinations() == 1 && p.possible_slot_count() == 1
            })
            .collect();

        for &program in &fixed {
            let Some(slot) = problem.program(program).first_possible_slot() else {
                continue;
            };
            problem.assign_program_to_slot(program, slot);
            problem.set_program_resolved(program);
            let candidates = problem.primary_candidates(program);
            allocate_fairly(problem, program, slot, &candidates, &mut self.rng);
        }
        fixed.len()
    }

    /// Phase 3 step: allocates slots for one program picked by popularity.
    fn allocate_by_popularity(&mut self, problem: &mut Problem) {
        problem.sort_programs_by_primary_preference_count();
        let picked = if self.config.least_popular_first {
            problem.unprocessed_programs().last()
        } else {
            problem.unprocessed_programs().first()
        };
        let Some(&program) = picked else {
            return;
        };

        loop {
            problem.calculate_timeslot_preference(program);
            let Some(slot) = problem
                .program(program)
                .find_most_popular_free_and_unallocated_slot(&mut self.rng)
            else {
                break;
            };
            if !problem.assign_program_to_slot(program, slot) {
                break;
            }
            loop {
                let candidates = problem.primary_candidates(program);
                let placed = allocate_fairly(problem, program, slot, &candidates, &mut self.rng);
                if placed == 0 {
                    break;
                }
            }
        }

        problem.set_program_resolved(program);
        debug!(
            program = problem.program(program).id(),
            slots = problem.program(program).allocated_slot_count(),
            "program slots allocated"
        );
    }

    /// Phase 4 step: serves the worst-off unprocessed participant.
    fn assign_worst_participant(&mut self, problem: &mut Problem) {
        let mut worst: Option<(f64, ParticipantKey)> = None;
        for &participant in problem.unprocessed_participants() {
            let score =
                f64::from(problem.participant(participant).fitness()) + self.rng.random::<f64>();
            if worst.map_or(true, |(best, _)| score > best) {
                worst = Some((score, participant));
            }
        }
        if let Some((_, participant)) = worst {
            allocate_one_slot(problem, participant, &mut self.rng);
        }
    }

    /// Phase 5: chained swaps for under-allocated substantive participants.
    fn repair_unallocated_participants(&mut self, problem: &mut Problem) -> usize {
        let targets: Vec<ParticipantKey> = problem
            .participants()
            .filter(|(_, p)| {
                p.allocated_count() < p.available_count()
                    && p.original_preferences().len() > self.config.repair_min_preferences
            })
            .map(|(k, _)| k)
            .collect();

        let mut executed = 0;
        for participant in targets {
            for slot in slots() {
                if !problem.participant(participant).is_free_at(slot) {
                    continue;
                }
                let swaps = find_swaps(problem, participant, slot);
                match swaps.first() {
                    Some(best) => {
                        if execute_swap(problem, best, &mut self.rng) {
                            executed += 1;
                        }
                    }
                    None => info!(
                        participant = problem.participant(participant).id(),
                        slot = slot + 1,
                        "no possible swaps"
                    ),
                }
            }
        }
        executed
    }

    /// Phase 6: local swaps for programs below their minimum.
    ///
    /// A program is only touched when enough candidates exist to reach
    /// the minimum in that slot; otherwise it is left as is.
    fn repair_under_minimum_programs(&mut self, problem: &mut Problem) -> usize {
        let programs: Vec<ProgramKey> = problem.programs().map(|(k, _)| k).collect();
        let mut executed = 0;

        for program in programs {
            for slot in slots() {
                let (id, is_allocated, len, min) = {
                    let p = problem.program(program);
                    (p.id(), p.is_allocated(slot), p.roster_len(slot), p.min_places())
                };
                if !is_allocated || len >= min {
                    continue;
                }
                let shortfall = min - len;
                if shortfall > self.config.force_move_threshold {
                    warn!(
                        program = id,
                        slot = slot + 1,
                        shortfall,
                        "too few participants to repair"
                    );
                    continue;
                }

                // Donor programs may each give away only their spare members
                let mut spare: HashMap<ProgramKey, usize> = HashMap::new();
                let mut selected = Vec::with_capacity(shortfall);
                for swap in find_local_swaps(problem, program, slot) {
                    if selected.len() == shortfall {
                        break;
                    }
                    let donor = swap.from_preference.program();
                    let left = spare.entry(donor).or_insert_with(|| {
                        let d = problem.program(donor);
                        d.roster_len(slot).saturating_sub(d.min_places())
                    });
                    if *left == 0 {
                        continue;
                    }
                    *left -= 1;
                    selected.push(swap);
                }

                if selected.len() < shortfall {
                    warn!(
                        program = id,
                        slot = slot + 1,
                        shortfall,
                        candidates = selected.len(),
                        "not enough swap candidates to reach minimum"
                    );
                    continue;
                }
                for swap in &selected {
                    if execute_local_swap(problem, swap) {
                        executed += 1;
                    }
                }
                info!(program = id, slot = slot + 1, moved = selected.len(), "program repaired");
            }
        }
        executed
    }
}

impl<R: Rng> Optimizer for EagerOptimizer<R> {
    fn name(&self) -> &str {
        "eager"
    }

    fn optimize(&mut self, problem: &mut Problem) -> OptimizationSummary {
        let mut summary = OptimizationSummary::default();

        loop {
            let resolved = self.resolve_trivial_cases(problem);
            if resolved == 0 {
                break;
            }
            info!(resolved, "trivial cases resolved");
            summary.trivial_programs += resolved;
        }
        self.prune(problem);

        loop {
            let resolved = self.resolve_fixed_cases(problem);
            if resolved == 0 {
                break;
            }
            info!(resolved, "fixed-slot cases resolved");
            summary.fixed_programs += resolved;
        }
        self.prune(problem);

        while !problem.unprocessed_programs().is_empty() {
            self.allocate_by_popularity(problem);
            summary.popularity_programs += 1;
            self.prune(problem);
        }

        while !problem.unprocessed_participants().is_empty() {
            if summary.residual_iterations >= self.config.max_residual_iterations {
                error!(
                    iterations = summary.residual_iterations,
                    remaining = problem.unprocessed_participants().len(),
                    "residual assignment hit the iteration cap"
                );
                summary.residual_capped = true;
                break;
            }
            summary.residual_iterations += 1;
            self.assign_worst_participant(problem);
            self.prune(problem);
        }

        summary.participant_swaps = self.repair_unallocated_participants(problem);
        summary.program_repairs = self.repair_under_minimum_programs(problem);

        info!(
            fitness = problem.fitness(),
            under_allocated = problem.under_allocated_participants().len(),
            under_minimum = problem.under_minimum_programs().len(),
            "optimization finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Program;
    use crate::sanity::check_sanity;

    fn seeded(seed: u64) -> EagerOptimizer {
        EagerOptimizer::with_config(OptimizerConfig::new().with_seed(seed))
    }

    /// 40 participants, 12 programs with mixed slot sets.
    fn camp(seed: u64) -> Problem {
        use rand::seq::SliceRandom;

        let mut problem = Problem::new();
        for id in 0..12 {
            let program = match id % 4 {
                0 => Program::new(id, format!("P{id}")).with_possible_slot((id as usize / 4) % 3),
                1 => Program::new(id, format!("P{id}")).with_possible_slots([true, true, false]),
                2 => Program::new(id, format!("P{id}"))
                    .with_possible_slots([true; 3])
                    .with_max_occurrences(2),
                _ => Program::new(id, format!("P{id}")).with_possible_slots([false, true, true]),
            }
            .with_capacity(2, 8);
            problem.add_program(program).unwrap();
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        for i in 0..40 {
            let mut wishes: Vec<i64> = (0..12).collect();
            wishes.shuffle(&mut rng);
            let available = [i % 7 != 0, i % 5 != 0, true];
            problem
                .add_participant(format!("c{i:02}"), available, &wishes)
                .unwrap();
        }
        problem.add_facilitator(4, "c03").unwrap();
        problem
    }

    #[test]
    fn test_trivial_case() {
        // Scenario: one single-slot program that exactly two fans fit into
        let mut problem = Problem::new();
        let program = problem
            .add_program(Program::new(1, "").with_capacity(1, 2).with_possible_slot(0))
            .unwrap();
        let a = problem.add_participant("a", [true; 3], &[1]).unwrap();
        let b = problem.add_participant("b", [true; 3], &[1]).unwrap();

        let mut optimizer = seeded(1);
        assert_eq!(optimizer.resolve_trivial_cases(&mut problem), 1);
        assert!(problem.program(program).is_resolved());
        assert!(problem.program(program).roster(0).contains(&a));
        assert!(problem.program(program).roster(0).contains(&b));
        // A second pass finds nothing left
        assert_eq!(optimizer.resolve_trivial_cases(&mut problem), 0);

        optimizer.prune(&mut problem);
        assert!(problem.unprocessed_programs().is_empty());

        let summary = optimizer.optimize(&mut problem);
        assert_eq!(summary.popularity_programs, 0);
    }

    #[test]
    fn test_trivial_case_requires_demand_within_capacity() {
        let mut problem = Problem::new();
        problem
            .add_program(Program::new(1, "").with_capacity(3, 5).with_possible_slot(1))
            .unwrap();
        problem.add_participant("a", [true; 3], &[1]).unwrap();

        let mut optimizer = seeded(1);
        assert_eq!(optimizer.resolve_trivial_cases(&mut problem), 0);
        // Not trivial, but still fixed by the next phase
        assert_eq!(optimizer.resolve_fixed_cases(&mut problem), 1);
        let a = problem.participant_key("a").unwrap();
        assert!(problem.participant(a).allocation(1).is_some());
    }

    #[test]
    fn test_unwanted_program_gets_one_random_slot() {
        let mut problem = Problem::new();
        let lonely = problem
            .add_program(Program::new(1, "").with_possible_slots([true; 3]))
            .unwrap();
        let popular = problem
            .add_program(Program::new(2, "").with_capacity(1, 5).with_possible_slots([true; 3]))
            .unwrap();
        problem.add_participant("a", [true; 3], &[2]).unwrap();

        let mut optimizer = seeded(3);
        optimizer.optimize(&mut problem);

        assert_eq!(problem.program(lonely).allocated_slot_count(), 1);
        assert!(problem.program(lonely).is_resolved());
        assert_eq!(problem.program(lonely).total_assigned(), 0);
        assert_eq!(problem.program(popular).allocated_slot_count(), 1);
    }

    #[test]
    fn test_falls_through_to_second_wish() {
        let mut problem = Problem::new();
        problem
            .add_program(Program::new(1, "").with_capacity(1, 1).with_possible_slot(0))
            .unwrap();
        let second = problem
            .add_program(Program::new(2, "").with_capacity(1, 5).with_possible_slot(0))
            .unwrap();
        problem.add_participant("a", [true, false, false], &[1]).unwrap();
        let b = problem.add_participant("b", [true, false, false], &[1, 2]).unwrap();

        let mut optimizer = seeded(5);
        optimizer.optimize(&mut problem);

        // Exactly one of a/b gets program 1; if it is not b, b gets program 2
        let b_alloc = problem.participant(b).allocation(0).copied().unwrap();
        if b_alloc.program() == second {
            assert_eq!(b_alloc.rank(), 2);
        } else {
            assert_eq!(b_alloc.rank(), 1);
        }
        assert!(check_sanity(&problem));
    }

    #[test]
    fn test_facilitator_loses_conflicting_slot() {
        let mut problem = Problem::new();
        problem
            .add_program(Program::new(1, "").with_capacity(1, 5).with_possible_slot(1))
            .unwrap();
        problem
            .add_program(Program::new(2, "").with_capacity(0, 5).with_possible_slot(1))
            .unwrap();
        let f = problem.add_participant("f", [true; 3], &[1]).unwrap();
        problem.add_participant("x", [true; 3], &[1]).unwrap();
        problem.add_facilitator(2, "f").unwrap();

        let mut optimizer = seeded(2);
        optimizer.optimize(&mut problem);

        let facilitator = problem.participant(f);
        assert!(!facilitator.is_available(1));
        assert!(facilitator.allocation(1).is_none());
        assert!(check_sanity(&problem));
    }

    fn under_minimum_setup(donors: usize) -> (Problem, ProgramKey) {
        let mut problem = Problem::new();
        let short = problem
            .add_program(Program::new(1, "").with_capacity(2, 5).with_possible_slot(0))
            .unwrap();
        let donor = problem
            .add_program(Program::new(2, "").with_capacity(1, 10).with_possible_slot(0))
            .unwrap();
        problem.assign_program_to_slot(short, 0);
        problem.assign_program_to_slot(donor, 0);
        // One member that must stay with the donor
        let anchor = problem.add_participant("anchor", [true, false, false], &[2]).unwrap();
        assert!(problem.assign_first_preference_to_slot(anchor, 0));
        for i in 0..donors {
            let p = problem
                .add_participant(format!("d{i}"), [true, false, false], &[2, 1])
                .unwrap();
            assert!(problem.assign_first_preference_to_slot(p, 0));
        }
        (problem, short)
    }

    #[test]
    fn test_under_minimum_repair_reaches_minimum() {
        let (mut problem, short) = under_minimum_setup(2);
        let mut optimizer = seeded(4);
        assert_eq!(optimizer.repair_under_minimum_programs(&mut problem), 2);
        assert_eq!(problem.program(short).roster_len(0), 2);
        assert!(problem.under_minimum_programs().is_empty());
    }

    #[test]
    fn test_under_minimum_repair_needs_enough_candidates() {
        let (mut problem, short) = under_minimum_setup(1);
        let mut optimizer = seeded(4);
        assert_eq!(optimizer.repair_under_minimum_programs(&mut problem), 0);
        assert_eq!(problem.program(short).roster_len(0), 0);
        assert_eq!(problem.under_minimum_programs(), vec![short]);
    }

    #[test]
    fn test_under_minimum_repair_respects_threshold() {
        let (mut problem, short) = under_minimum_setup(3);
        let mut optimizer =
            EagerOptimizer::with_config(OptimizerConfig::new().with_seed(4).with_force_move_threshold(1));
        assert_eq!(optimizer.repair_under_minimum_programs(&mut problem), 0);
        assert_eq!(problem.program(short).roster_len(0), 0);
    }

    #[test]
    fn test_participant_repair_swaps_into_full_program() {
        let mut problem = Problem::new();
        let tight = problem
            .add_program(Program::new(1, "").with_capacity(0, 1).with_possible_slot(0))
            .unwrap();
        let open = problem
            .add_program(Program::new(2, "").with_capacity(0, 5).with_possible_slot(0))
            .unwrap();
        for id in 3..13 {
            problem
                .add_program(Program::new(id, "").with_possible_slot(1))
                .unwrap();
        }
        problem.assign_program_to_slot(tight, 0);
        problem.assign_program_to_slot(open, 0);

        let occupant = problem.add_participant("occupant", [true, false, false], &[1, 2]).unwrap();
        assert!(problem.assign_first_preference_to_slot(occupant, 0));
        // Ten wishes, but only program 1 runs where the target is present
        let wishes: Vec<i64> = std::iter::once(1).chain(3..12).collect();
        let target = problem.add_participant("target", [true, false, false], &wishes).unwrap();

        let mut optimizer = seeded(8);
        assert_eq!(optimizer.repair_unallocated_participants(&mut problem), 1);
        assert!(problem.program(tight).roster(0).contains(&target));
        assert!(problem.program(open).roster(0).contains(&occupant));
        assert!(check_sanity(&problem));
    }

    #[test]
    fn test_residual_cap_is_reported() {
        let mut problem = camp(1);
        let mut optimizer = EagerOptimizer::with_config(
            OptimizerConfig::new().with_seed(1).with_max_residual_iterations(0),
        );
        let summary = optimizer.optimize(&mut problem);
        assert!(summary.residual_capped);
        assert_eq!(summary.residual_iterations, 0);
    }

    #[test]
    fn test_full_run_keeps_invariants() {
        for seed in 0..5 {
            let mut problem = camp(seed);
            let summary = seeded(seed).optimize(&mut problem);

            assert!(!summary.residual_capped);
            assert!(problem.unprocessed_programs().is_empty());
            assert!(problem.unprocessed_participants().is_empty());

            for (_, program) in problem.programs() {
                assert!(program.allocated_slot_count() <= program.max_occurrences());
                assert!(program.allocated_slot_count() <= program.possible_slot_count());
                for slot in slots() {
                    assert!(program.roster_len(slot) <= program.max_places());
                    if program.is_allocated(slot) {
                        assert!(program.is_possible(slot));
                    }
                }
            }
            for (key, participant) in problem.participants() {
                for slot in slots() {
                    let Some(allocation) = participant.allocation(slot) else {
                        continue;
                    };
                    assert!(participant.is_available(slot));
                    assert!(participant.rank_of(allocation.program()).is_some());
                    assert!(problem.program(allocation.program()).roster(slot).contains(&key));
                }
            }
            assert!(check_sanity(&problem));
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let mut first = camp(9);
        let mut second = camp(9);
        seeded(42).optimize(&mut first);
        seeded(42).optimize(&mut second);

        assert_eq!(first.fitness(), second.fitness());
        for ((_, a), (_, b)) in first.participants().zip(second.participants()) {
            assert_eq!(a.allocations(), b.allocations());
        }
    }

    #[test]
    fn test_residual_serves_worst_participant_first() {
        let mut problem = Problem::new();
        let single = problem
            .add_program(Program::new(1, "").with_capacity(0, 1).with_possible_slot(0))
            .unwrap();
        problem.assign_program_to_slot(single, 0);
        // Fitness 4: one open slot at penalty min(13, 1 + 3)
        let mild = problem.add_participant("mild", [true, false, false], &[1]).unwrap();
        // Fitness 12: three open slots
        let worst = problem.add_participant("worst", [true; 3], &[1]).unwrap();

        let mut optimizer = seeded(5);
        optimizer.assign_worst_participant(&mut problem);

        let roster = problem.program(single).roster(0);
        assert!(roster.contains(&worst));
        assert!(!roster.contains(&mild));
        assert!(problem.participant(mild).allocation(0).is_none());
    }

    /// Program 1 is the first choice of two participants, program 2 of one.
    fn popularity_setup() -> (Problem, ProgramKey, ProgramKey) {
        let mut problem = Problem::new();
        let popular = problem
            .add_program(Program::new(1, "").with_capacity(0, 10).with_possible_slots([true; 3]))
            .unwrap();
        let quiet = problem
            .add_program(Program::new(2, "").with_capacity(0, 10).with_possible_slots([true; 3]))
            .unwrap();
        problem.add_participant("a", [true; 3], &[1]).unwrap();
        problem.add_participant("b", [true; 3], &[1]).unwrap();
        problem.add_participant("c", [true; 3], &[2]).unwrap();
        (problem, popular, quiet)
    }

    #[test]
    fn test_most_popular_first() {
        let (mut problem, popular, quiet) = popularity_setup();
        let config = OptimizerConfig::new().with_seed(2).with_least_popular_first(false);
        let mut optimizer = EagerOptimizer::with_config(config);

        optimizer.allocate_by_popularity(&mut problem);

        assert!(problem.program(popular).is_resolved());
        assert_eq!(problem.program(popular).allocated_slot_count(), 1);
        assert_eq!(problem.program(popular).total_assigned(), 2);
        assert!(!problem.program(quiet).is_resolved());
        assert_eq!(problem.program(quiet).allocated_slot_count(), 0);
    }

    #[test]
    fn test_least_popular_first() {
        let (mut problem, popular, quiet) = popularity_setup();
        let mut optimizer = seeded(2);

        optimizer.allocate_by_popularity(&mut problem);

        assert!(problem.program(quiet).is_resolved());
        assert_eq!(problem.program(quiet).total_assigned(), 1);
        assert!(!problem.program(popular).is_resolved());
        assert_eq!(problem.program(popular).allocated_slot_count(), 0);
    }

    #[test]
    fn test_name() {
        assert_eq!(EagerOptimizer::new().name(), "eager");
    }
}

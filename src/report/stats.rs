//! Aggregate allocation statistics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total fitness | Sum of participant fitness (present or substantive participants) |
//! | Average fitness | Total fitness / all participants |
//! | Allocated slots | Sum of allocated slots over all participants |
//! | Unallocated slots | Sum of `3 - allocated` over all participants |
//! | Under-allocated | Substantive participants attending fewer slots than present |
//! | Under minimum | Programs with a running slot below `min_places` |

use serde::{Deserialize, Serialize};

use crate::models::{Problem, ProgramId};

/// Allocation quality indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStats {
    pub participants: usize,
    pub unprocessed_participants: usize,
    pub programs: usize,
    pub unprocessed_programs: usize,
    /// Lower is better.
    pub total_fitness: u64,
    pub average_fitness: f64,
    pub allocated_slots: usize,
    pub unallocated_slots: usize,
    /// Ids of under-allocated participants.
    pub under_allocated: Vec<String>,
    /// Ids of programs running below their minimum somewhere.
    pub under_minimum: Vec<ProgramId>,
}

impl ProblemStats {
    /// Computes statistics from the current allocation state.
    pub fn calculate(problem: &Problem) -> Self {
        let total_fitness = problem.fitness();
        let participants = problem.participant_count();
        let average_fitness = if participants > 0 {
            total_fitness as f64 / participants as f64
        } else {
            0.0
        };

        let (allocated_slots, unallocated_slots) = problem
            .participants()
            .map(|(_, p)| (p.allocated_count(), p.unallocated_count()))
            .fold((0, 0), |(a, u), (pa, pu)| (a + pa, u + pu));

        Self {
            participants,
            unprocessed_participants: problem.unprocessed_participants().len(),
            programs: problem.program_count(),
            unprocessed_programs: problem.unprocessed_programs().len(),
            total_fitness,
            average_fitness,
            allocated_slots,
            unallocated_slots,
            under_allocated: problem
                .under_allocated_participants()
                .into_iter()
                .map(|k| problem.participant(k).id().to_string())
                .collect(),
            under_minimum: problem
                .under_minimum_programs()
                .into_iter()
                .map(|k| problem.program(k).id())
                .collect(),
        }
    }
}

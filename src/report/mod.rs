//! Allocation output and statistics.
//!
//! The optimizer mutates a [`Problem`] in place; this module turns the
//! final state into plain serializable records for an exporter.
//!
//! - [`ProblemStats`]: aggregate indicators (fitness, slot counts,
//!   under-allocated participants, under-filled programs)
//! - [`ParticipantSummary`] / [`ProgramSummary`]: per-entity outcomes

mod stats;
mod summary;

pub use stats::ProblemStats;
pub use summary::{ParticipantSummary, ProgramSummary};

use serde::{Deserialize, Serialize};

use crate::models::Problem;

/// Everything an exporter needs from a finished problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    pub stats: ProblemStats,
    pub participants: Vec<ParticipantSummary>,
    pub programs: Vec<ProgramSummary>,
}

impl AllocationReport {
    pub fn new(problem: &Problem) -> Self {
        Self {
            stats: ProblemStats::calculate(problem),
            participants: problem
                .participants()
                .map(|(_, p)| ParticipantSummary::new(problem, p))
                .collect(),
            programs: problem
                .programs()
                .map(|(_, p)| ProgramSummary::new(problem, p))
                .collect(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

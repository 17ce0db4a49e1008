//! Per-entity output records.

use serde::{Deserialize, Serialize};

use crate::models::{slots, Participant, ParticipantKey, Problem, Program, ProgramId, SLOT_COUNT};

/// Allocation outcome of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub id: String,
    pub fitness: u32,
    pub present: [bool; SLOT_COUNT],
    /// Program attended per slot.
    pub programs: [Option<ProgramId>; SLOT_COUNT],
    /// Rank of the attended program per slot.
    pub ranks: [Option<u32>; SLOT_COUNT],
    /// Slots filled by a continuation of an earlier slot.
    pub continued: [bool; SLOT_COUNT],
    /// Best (lowest) achieved rank.
    pub best_rank: Option<u32>,
    /// Wished program ids, best first.
    pub preferences: Vec<ProgramId>,
}

impl ParticipantSummary {
    pub fn new(problem: &Problem, participant: &Participant) -> Self {
        let allocation = |slot: usize| participant.allocation(slot);
        Self {
            id: participant.id().to_string(),
            fitness: participant.fitness(),
            present: participant.availability(),
            programs: std::array::from_fn(|s| {
                allocation(s).map(|a| problem.program(a.program()).id())
            }),
            ranks: std::array::from_fn(|s| allocation(s).map(|a| a.rank())),
            continued: std::array::from_fn(|s| allocation(s).is_some_and(|a| !a.is_regular())),
            best_rank: participant.best_rank(),
            preferences: participant
                .original_preferences()
                .iter()
                .map(|p| problem.program(p.program()).id())
                .collect(),
        }
    }
}

/// Slot and roster outcome of one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: ProgramId,
    pub name: String,
    pub min_places: usize,
    pub max_places: usize,
    pub max_occurrences: usize,
    pub possible_slots: [bool; SLOT_COUNT],
    pub allocated_slots: [bool; SLOT_COUNT],
    /// Participant ids per slot.
    pub rosters: [Vec<String>; SLOT_COUNT],
    pub facilitators: Vec<String>,
    /// Nobody attends in any slot.
    pub empty: bool,
}

impl ProgramSummary {
    pub fn new(problem: &Problem, program: &Program) -> Self {
        Self {
            id: program.id(),
            name: program.name().to_string(),
            min_places: program.min_places(),
            max_places: program.max_places(),
            max_occurrences: program.max_occurrences(),
            possible_slots: program.possible_slots(),
            allocated_slots: program.allocated_slots(),
            rosters: std::array::from_fn(|s| participant_ids(problem, program.roster(s))),
            facilitators: participant_ids(problem, program.facilitators()),
            empty: slots().all(|s| program.roster(s).is_empty()),
        }
    }
}

fn participant_ids<'a>(
    problem: &Problem,
    keys: impl IntoIterator<Item = &'a ParticipantKey>,
) -> Vec<String> {
    keys.into_iter()
        .map(|&k| problem.participant(k).id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries() {
        let mut problem = Problem::new();
        let knots = problem
            .add_program(
                Program::new(3, "Knots")
                    .with_capacity(1, 4)
                    .with_possible_slot(1)
                    .with_continuation_slot(2),
            )
            .unwrap();
        problem.add_program(Program::new(4, "Fire").with_possible_slot(0)).unwrap();
        problem.assign_program_to_slot(knots, 1);
        let a = problem.add_participant("a", [true; 3], &[3, 4]).unwrap();
        problem.add_participant("f", [true; 3], &[4]).unwrap();
        problem.add_facilitator(4, "f").unwrap();
        assert!(problem.assign_first_preference_to_slot(a, 1));

        let summary = ParticipantSummary::new(&problem, problem.participant(a));
        assert_eq!(summary.programs, [None, Some(3), Some(3)]);
        assert_eq!(summary.ranks, [None, Some(1), Some(1)]);
        assert_eq!(summary.continued, [false, false, true]);
        assert_eq!(summary.best_rank, Some(1));
        assert_eq!(summary.preferences, vec![3, 4]);
        // Slot 0 penalty: min(13, 2 + 3)
        assert_eq!(summary.fitness, 1 + 1 + 5);

        let knots_summary = ProgramSummary::new(&problem, problem.program(knots));
        assert_eq!(knots_summary.rosters[1], vec!["a".to_string()]);
        // Placeholders are not roster entries
        assert!(knots_summary.rosters[2].is_empty());
        assert!(!knots_summary.empty);

        let fire = problem.program_by_id(4).unwrap();
        let fire_summary = ProgramSummary::new(&problem, fire);
        assert!(fire_summary.empty);
        assert_eq!(fire_summary.facilitators, vec!["f".to_string()]);
    }
}

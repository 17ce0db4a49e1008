//! Post-optimization invariant checks.
//!
//! [`SanityChecker`] inspects a finished [`Problem`] and reports every
//! broken invariant as a [`Violation`]. Most violations are fatal: the
//! allocation must be discarded and the optimizer rerun with fresh
//! randomness. Under-filled rosters and a participant attending the
//! same program twice are only reported.
//!
//! Continuation placeholders are not roster entries, so they are exempt
//! from the active-slot, duplicate-program and roster cross checks.
//!
//! # Checks
//!
//! | Check | Fatal |
//! |-------|-------|
//! | Program runs in more slots than `max_occurrences` | yes |
//! | Program runs in a slot it may not use | yes |
//! | Roster above `max_places` | yes |
//! | Roster below `min_places` | no |
//! | Participant in two rosters of the same slot | yes |
//! | Allocated program not in the wish list | yes |
//! | Allocation while absent | yes |
//! | Allocation to a program not running in the slot | yes |
//! | Same program in two slots | no |
//! | Roster entry without matching allocation | yes |
//! | Allocation without matching roster entry | yes |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::models::{slots, ParticipantKey, Problem, Slot};

/// Classification of invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    TooManyOccurrences,
    SlotNotPossible,
    CapacityExceeded,
    BelowMinimum,
    DuplicateRosterEntry,
    PreferenceNotListed,
    UnavailableAllocation,
    InactiveProgram,
    DuplicateProgram,
    RosterMismatch,
    AllocationMismatch,
}

impl ViolationType {
    /// Whether this violation invalidates the allocation.
    pub fn is_fatal(self) -> bool {
        !matches!(self, Self::BelowMinimum | Self::DuplicateProgram)
    }
}

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Program id or participant id.
    pub entity_id: String,
    /// Affected slot, if the violation is slot-specific.
    pub slot: Option<Slot>,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        slot: Option<Slot>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            slot,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.violation_type.is_fatal()
    }
}

/// Outcome of a sanity check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanityReport {
    pub violations: Vec<Violation>,
}

impl SanityReport {
    /// True when no fatal violation was found.
    pub fn passed(&self) -> bool {
        !self.violations.iter().any(Violation::is_fatal)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_fatal())
    }

    pub fn count(&self, violation_type: ViolationType) -> usize {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .count()
    }
}

/// Stateless verifier of allocation invariants.
#[derive(Debug, Clone, Copy, Default)]
pub struct SanityChecker;

impl SanityChecker {
    /// Runs every check and collects all violations.
    pub fn check(problem: &Problem) -> SanityReport {
        let mut violations = Vec::new();
        check_programs(problem, &mut violations);
        check_participants(problem, &mut violations);
        cross_check(problem, &mut violations);

        for v in &violations {
            if v.is_fatal() {
                error!(kind = ?v.violation_type, entity = %v.entity_id, "{}", v.message);
            } else {
                warn!(kind = ?v.violation_type, entity = %v.entity_id, "{}", v.message);
            }
        }
        let report = SanityReport { violations };
        if report.passed() {
            info!(
                warnings = report.violations.len(),
                "sanity checks passed"
            );
        }
        report
    }
}

/// Whether `problem` satisfies every fatal invariant.
pub fn check_sanity(problem: &Problem) -> bool {
    SanityChecker::check(problem).passed()
}

fn check_programs(problem: &Problem, violations: &mut Vec<Violation>) {
    let mut seats: HashMap<(ParticipantKey, Slot), usize> = HashMap::new();

    for (_, program) in problem.programs() {
        let id = program.id().to_string();
        let active = program.allocated_slot_count();
        if active > program.max_occurrences() {
            violations.push(Violation::new(
                ViolationType::TooManyOccurrences,
                &id,
                None,
                format!(
                    "Program {id} runs in {active} slots, at most {} allowed",
                    program.max_occurrences()
                ),
            ));
        }

        for slot in slots() {
            if program.is_allocated(slot) && !program.is_possible(slot) {
                violations.push(Violation::new(
                    ViolationType::SlotNotPossible,
                    &id,
                    Some(slot),
                    format!("Program {id} runs in slot {} it may not use", slot + 1),
                ));
            }
            let len = program.roster_len(slot);
            if len > program.max_places() {
                violations.push(Violation::new(
                    ViolationType::CapacityExceeded,
                    &id,
                    Some(slot),
                    format!(
                        "Program {id} has {len} participants in slot {}, max {}",
                        slot + 1,
                        program.max_places()
                    ),
                ));
            }
            if program.is_allocated(slot) && len < program.min_places() {
                violations.push(Violation::new(
                    ViolationType::BelowMinimum,
                    &id,
                    Some(slot),
                    format!(
                        "Program {id} has {len} participants in slot {}, min {}",
                        slot + 1,
                        program.min_places()
                    ),
                ));
            }
            for &participant in program.roster(slot) {
                *seats.entry((participant, slot)).or_default() += 1;
            }
        }
    }

    let mut duplicates: Vec<_> = seats.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for ((participant, slot), count) in duplicates {
        let pid = problem.participant(participant).id();
        violations.push(Violation::new(
            ViolationType::DuplicateRosterEntry,
            pid,
            Some(slot),
            format!("Participant '{pid}' is on {count} rosters in slot {}", slot + 1),
        ));
    }
}

fn check_participants(problem: &Problem, violations: &mut Vec<Violation>) {
    for (_, participant) in problem.participants() {
        let pid = participant.id();
        for slot in slots() {
            let Some(allocation) = participant.allocation(slot) else {
                continue;
            };
            let program = problem.program(allocation.program());

            if participant.rank_of(allocation.program()).is_none() {
                violations.push(Violation::new(
                    ViolationType::PreferenceNotListed,
                    pid,
                    Some(slot),
                    format!("Program {} allocated to '{pid}' was never wished for", program.id()),
                ));
            }
            if !participant.is_available(slot) {
                violations.push(Violation::new(
                    ViolationType::UnavailableAllocation,
                    pid,
                    Some(slot),
                    format!(
                        "Program {} allocated to '{pid}' in slot {} while absent",
                        program.id(),
                        slot + 1
                    ),
                ));
            }
            if allocation.is_regular() && !program.is_allocated(slot) {
                violations.push(Violation::new(
                    ViolationType::InactiveProgram,
                    pid,
                    Some(slot),
                    format!(
                        "Program {} allocated to '{pid}' but not running in slot {}",
                        program.id(),
                        slot + 1
                    ),
                ));
            }
        }

        let regular: Vec<_> = participant
            .allocations()
            .iter()
            .flatten()
            .filter(|a| a.is_regular())
            .map(|a| a.program())
            .collect();
        for (i, program) in regular.iter().enumerate() {
            if regular[i + 1..].contains(program) {
                violations.push(Violation::new(
                    ViolationType::DuplicateProgram,
                    pid,
                    None,
                    format!(
                        "Program {} allocated to '{pid}' more than once",
                        problem.program(*program).id()
                    ),
                ));
            }
        }
    }
}

fn cross_check(problem: &Problem, violations: &mut Vec<Violation>) {
    for (key, participant) in problem.participants() {
        for slot in slots() {
            let Some(allocation) = participant.allocation(slot).filter(|a| a.is_regular()) else {
                continue;
            };
            let program = problem.program(allocation.program());
            if !program.roster(slot).contains(&key) {
                violations.push(Violation::new(
                    ViolationType::AllocationMismatch,
                    participant.id(),
                    Some(slot),
                    format!(
                        "'{}' allocated to program {} in slot {} but missing from its roster",
                        participant.id(),
                        program.id(),
                        slot + 1
                    ),
                ));
            }
        }
    }

    for (program_key, program) in problem.programs() {
        for slot in slots() {
            for &member in program.roster(slot) {
                let participant = problem.participant(member);
                let matches = participant
                    .allocation(slot)
                    .is_some_and(|a| a.is_regular() && a.program() == program_key);
                if !matches || !program.is_allocated(slot) {
                    violations.push(Violation::new(
                        ViolationType::RosterMismatch,
                        program.id().to_string(),
                        Some(slot),
                        format!(
                            "'{}' on roster of program {} in slot {} without matching allocation",
                            participant.id(),
                            program.id(),
                            slot + 1
                        ),
                    ));
                }
            }
        }
    }
}

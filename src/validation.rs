//! Input validation for allocation problems.
//!
//! Checks structural integrity of the raw program, participant and
//! facilitator records before a [`Problem`](crate::models::Problem) is
//! built. Detects:
//! - Program records without a usable integer id
//! - Duplicate program IDs
//! - Wish lists naming unknown programs
//! - Facilitator links to unknown programs or participants
//! - Continuation slots outside `1..=3`
//!
//! Every issue is collected; validation never stops at the first one.

use std::collections::{BTreeMap, HashSet};

use crate::input::{FacilitatorLink, ParticipantRecord, ProgramRecord};
use crate::models::SLOT_COUNT;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two programs share the same ID.
    DuplicateId,
    /// A program record has no integer ID.
    InvalidProgramId,
    /// A wish list references a program that doesn't exist.
    UnknownProgram,
    /// A facilitator link references a program that doesn't exist.
    UnknownFacilitatorProgram,
    /// A facilitator link references a participant that doesn't exist.
    UnknownFacilitatorParticipant,
    /// A continuation slot is not a slot number.
    InvalidContinuationSlot,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether a problem can still be built despite this error.
    ///
    /// Unknown facilitator participants are skipped and invalid
    /// continuation slots are ignored at load time.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self.kind,
            ValidationErrorKind::UnknownFacilitatorParticipant
                | ValidationErrorKind::InvalidContinuationSlot
        )
    }
}

/// Validates the input records of an allocation problem.
///
/// Checks:
/// 1. Every program has an integer ID
/// 2. No duplicate program IDs
/// 3. Continuation slots are in `1..=3`
/// 4. Every wished program exists
/// 5. Every facilitator link names an existing program and participant
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_records(
    programs: &[ProgramRecord],
    participants: &BTreeMap<String, ParticipantRecord>,
    facilitators: &[FacilitatorLink],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut program_ids = HashSet::new();
    for (row, record) in programs.iter().enumerate() {
        let Ok(id) = record.program_id() else {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidProgramId,
                format!("Program record #{row} has invalid ID: {}", record.id),
            ));
            continue;
        };
        if !program_ids.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate program ID: {id}"),
            ));
        }
        if let Err(raw) = record.continuation_slot() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidContinuationSlot,
                format!("Program {id} continues in slot {raw}, expected 1..={SLOT_COUNT}"),
            ));
        }
    }

    for (participant, record) in participants {
        for program in record.wishes() {
            if !program_ids.contains(&program) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownProgram,
                    format!("Participant '{participant}' wishes for unknown program {program}"),
                ));
            }
        }
    }

    for link in facilitators {
        if !program_ids.contains(&link.program()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownFacilitatorProgram,
                format!(
                    "Facilitator '{}' linked to unknown program {}",
                    link.participant(),
                    link.program()
                ),
            ));
        }
        if !participants.contains_key(link.participant()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownFacilitatorParticipant,
                format!(
                    "Program {} names unknown facilitator '{}'",
                    link.program(),
                    link.participant()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

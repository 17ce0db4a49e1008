//! Input records and problem loading.
//!
//! Three documents make up a problem:
//!
//! | Document | Shape |
//! |----------|-------|
//! | programs | array of [`ProgramRecord`] objects |
//! | participants | object mapping participant id → [`ParticipantRecord`] |
//! | facilitators | array of `[program id, participant id]` pairs |
//!
//! Loading validates the records first. Fatal findings abort with
//! [`ProblemError::Validation`]; the rest are logged and tolerated.

mod records;

pub use records::{FacilitatorLink, ParticipantRecord, ProgramRecord, SLOT_ENABLED};

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::ProblemError;
use crate::models::Problem;
use crate::validation::{validate_records, ValidationError};

impl Problem {
    /// Builds a problem from already-decoded input records.
    ///
    /// Participants are added in id order, so two loads of the same
    /// input produce identical problems.
    pub fn from_records(
        programs: &[ProgramRecord],
        participants: &BTreeMap<String, ParticipantRecord>,
        facilitators: &[FacilitatorLink],
    ) -> Result<Self, ProblemError> {
        if let Err(errors) = validate_records(programs, participants, facilitators) {
            let (fatal, tolerated): (Vec<ValidationError>, Vec<ValidationError>) =
                errors.into_iter().partition(ValidationError::is_fatal);
            for error in &tolerated {
                warn!(kind = ?error.kind, "{}", error.message);
            }
            if !fatal.is_empty() {
                return Err(ProblemError::Validation(fatal));
            }
        }

        let mut problem = Problem::new();
        for record in programs {
            problem.add_program(record.to_program()?)?;
        }
        for (id, record) in participants {
            problem.add_participant(id.as_str(), record.availability(), &record.wishes())?;
        }
        for link in facilitators {
            problem.add_facilitator(link.program(), link.participant())?;
        }

        info!(
            programs = problem.program_count(),
            participants = problem.participant_count(),
            facilitators = facilitators.len(),
            "problem loaded"
        );
        Ok(problem)
    }

    /// Parses the three JSON documents and builds a problem.
    pub fn from_json(
        programs: &str,
        participants: &str,
        facilitators: &str,
    ) -> Result<Self, ProblemError> {
        let programs: Vec<ProgramRecord> = serde_json::from_str(programs)?;
        let participants: BTreeMap<String, ParticipantRecord> =
            serde_json::from_str(participants)?;
        let facilitators: Vec<FacilitatorLink> = serde_json::from_str(facilitators)?;
        Self::from_records(&programs, &participants, &facilitators)
    }
}

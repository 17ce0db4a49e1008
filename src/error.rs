//! Error types for building a [`Problem`](crate::models::Problem).
//!
//! Only problem construction can fail. The optimizer itself reports local
//! failures as `bool`/`Option` results and logs them.

use thiserror::Error;

use crate::models::ProgramId;
use crate::validation::ValidationError;

/// Errors raised while loading input records into a problem.
#[derive(Debug, Error)]
pub enum ProblemError {
    /// Input document could not be decoded.
    #[error("failed to decode input: {0}")]
    Json(#[from] serde_json::Error),

    /// A program record carries no usable integer id.
    #[error("program record has an invalid id: {0}")]
    InvalidProgramId(String),

    /// Two programs share an id.
    #[error("duplicate program id {0}")]
    DuplicateProgram(ProgramId),

    /// Two participants share an id.
    #[error("duplicate participant id '{0}'")]
    DuplicateParticipant(String),

    /// A wish list names a program that does not exist.
    #[error("participant '{participant}' references unknown program {program}")]
    UnknownProgram {
        participant: String,
        program: ProgramId,
    },

    /// A facilitator link names a program that does not exist.
    #[error("facilitator '{participant}' is linked to unknown program {program}")]
    UnknownFacilitatorProgram {
        participant: String,
        program: ProgramId,
    },

    /// Input records failed structural validation.
    #[error("input validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

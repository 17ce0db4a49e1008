//! Ranked preference model.

use serde::{Deserialize, Serialize};

use super::ProgramKey;

/// One entry of a participant's ranked wish list.
///
/// Rank 1 is the most desired program. Preferences are immutable once
/// created; consuming one means popping it from the participant's
/// pending stack, never mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preference {
    rank: u32,
    program: ProgramKey,
}

impl Preference {
    /// Creates a preference for `program` at the given rank (1 = best).
    pub fn new(program: ProgramKey, rank: u32) -> Self {
        Self { rank, program }
    }

    /// Rank in the participant's original list (1 = best).
    #[inline]
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// The preferred program.
    #[inline]
    pub fn program(&self) -> ProgramKey {
        self.program
    }
}

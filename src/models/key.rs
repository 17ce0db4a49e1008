//! Typed handles into the [`Problem`](super::Problem) arena.
//!
//! Programs and participants reference each other in both directions
//! (a roster lists participants, an allocation names a program). Both
//! sides store these dense indices instead of owning pointers; the
//! `Problem` owns the entities and resolves handles in O(1).

use serde::{Deserialize, Serialize};
use std::fmt;

/// External program identifier, as given in the input records.
pub type ProgramId = i64;

/// Number of time slots in an event.
pub const SLOT_COUNT: usize = 3;

/// Zero-based slot index (`0..SLOT_COUNT`).
pub type Slot = usize;

/// Handle of a program inside a [`Problem`](super::Problem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgramKey(pub(crate) usize);

/// Handle of a participant inside a [`Problem`](super::Problem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantKey(pub(crate) usize);

impl ProgramKey {
    /// Position of the program in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl ParticipantKey {
    /// Position of the participant in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program#{}", self.0)
    }
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant#{}", self.0)
    }
}

/// Iterator over all slot indices.
#[inline]
pub fn slots() -> std::ops::Range<Slot> {
    0..SLOT_COUNT
}

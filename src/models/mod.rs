//! Workshop allocation domain models.
//!
//! Provides the data types for an allocation problem and its solution:
//! programs that run in some of the event's three slots, participants
//! with ranked wish lists and slot availability, and the [`Problem`]
//! that owns both and mediates every change between them.
//!
//! # Domain Mappings
//!
//! | u-workshop | Summer camp | Conference | Training day |
//! |------------|-------------|------------|--------------|
//! | Program | Activity | Workshop | Course |
//! | Participant | Camper | Attendee | Trainee |
//! | Slot | Session block | Track period | Half-day |
//! | Facilitator | Counsellor | Speaker | Trainer |

mod key;
mod participant;
mod preference;
mod problem;
mod program;

pub use key::{slots, ParticipantKey, ProgramId, ProgramKey, Slot, SLOT_COUNT};
pub use participant::{
    Allocation, Participant, MAX_SLOT_PENALTY, SLOT_PENALTY_OFFSET, UNALLOCATED_FITNESS,
};
pub use preference::Preference;
pub use problem::{Problem, SUBSTANTIVE_PREFERENCE_COUNT};
pub use program::{Program, DEFAULT_MAX_OCCURRENCES, DEFAULT_MAX_PLACES, DEFAULT_MIN_PLACES};

//! Program (workshop) model.
//!
//! A program is a session that can run in a subset of the event's slots.
//! It has a capacity window `[min_places, max_places]` per running slot,
//! a limit on how many slots it may occupy, and a roster of participants
//! for each slot it actually runs in.
//!
//! Cross-entity effects (facilitator pinning, roster/participant
//! bookkeeping) live on [`Problem`](super::Problem); this type only owns
//! the program-local state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use super::{slots, ParticipantKey, ProgramId, Slot, SLOT_COUNT};

/// Default minimum roster size when the input omits or garbles it.
pub const DEFAULT_MIN_PLACES: usize = 5;
/// Default maximum roster size when the input omits or garbles it.
pub const DEFAULT_MAX_PLACES: usize = 30;
/// Default number of slots a program may occupy.
pub const DEFAULT_MAX_OCCURRENCES: usize = 1;

/// A schedulable program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    id: ProgramId,
    name: String,
    min_places: usize,
    max_places: usize,
    max_occurrences: usize,
    possible_slots: [bool; SLOT_COUNT],
    allocated_slots: [bool; SLOT_COUNT],
    roster: [BTreeSet<ParticipantKey>; SLOT_COUNT],
    facilitators: Vec<ParticipantKey>,
    continuation_slot: Option<Slot>,
    resolved: bool,
    primary_preference_count: usize,
    slot_popularity: [usize; SLOT_COUNT],
}

impl Program {
    /// Creates a program with default capacity and no possible slots.
    pub fn new(id: ProgramId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            min_places: DEFAULT_MIN_PLACES,
            max_places: DEFAULT_MAX_PLACES,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            possible_slots: [false; SLOT_COUNT],
            allocated_slots: [false; SLOT_COUNT],
            roster: Default::default(),
            facilitators: Vec::new(),
            continuation_slot: None,
            resolved: false,
            primary_preference_count: 0,
            slot_popularity: [0; SLOT_COUNT],
        }
    }

    /// Sets the roster bounds.
    pub fn with_capacity(mut self, min_places: usize, max_places: usize) -> Self {
        self.min_places = min_places;
        self.max_places = max_places;
        self
    }

    /// Sets how many slots the program may occupy.
    pub fn with_max_occurrences(mut self, max_occurrences: usize) -> Self {
        self.max_occurrences = max_occurrences;
        self
    }

    /// Sets the slots the program may run in.
    pub fn with_possible_slots(mut self, possible: [bool; SLOT_COUNT]) -> Self {
        self.possible_slots = possible;
        self
    }

    /// Marks a single slot as possible.
    pub fn with_possible_slot(mut self, slot: Slot) -> Self {
        if slot < SLOT_COUNT {
            self.possible_slots[slot] = true;
        }
        self
    }

    /// Sets the slot into which attendance automatically continues.
    pub fn with_continuation_slot(mut self, slot: Slot) -> Self {
        self.continuation_slot = (slot < SLOT_COUNT).then_some(slot);
        self
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_places(&self) -> usize {
        self.min_places
    }

    pub fn max_places(&self) -> usize {
        self.max_places
    }

    pub fn max_occurrences(&self) -> usize {
        self.max_occurrences
    }

    pub fn continuation_slot(&self) -> Option<Slot> {
        self.continuation_slot
    }

    pub fn possible_slots(&self) -> [bool; SLOT_COUNT] {
        self.possible_slots
    }

    pub fn allocated_slots(&self) -> [bool; SLOT_COUNT] {
        self.allocated_slots
    }

    /// Whether the program may run in `slot`.
    #[inline]
    pub fn is_possible(&self, slot: Slot) -> bool {
        self.possible_slots[slot]
    }

    /// Whether the program has been fixed to run in `slot`.
    #[inline]
    pub fn is_allocated(&self, slot: Slot) -> bool {
        self.allocated_slots[slot]
    }

    pub fn possible_slot_count(&self) -> usize {
        self.possible_slots.iter().filter(|&&b| b).count()
    }

    pub fn allocated_slot_count(&self) -> usize {
        self.allocated_slots.iter().filter(|&&b| b).count()
    }

    /// First possible slot in index order.
    pub fn first_possible_slot(&self) -> Option<Slot> {
        slots().find(|&s| self.possible_slots[s])
    }

    /// Number of distinct slot patterns the program could take.
    ///
    /// | possible slots | occurrences | combinations |
    /// |----------------|-------------|--------------|
    /// | 1              | any         | 1            |
    /// | n              | n           | 1            |
    /// | 2              | 1           | 2            |
    /// | otherwise      |             | 3            |
    pub fn combinations(&self) -> usize {
        let possible = self.possible_slot_count();
        if possible == 1 || possible == self.max_occurrences {
            1
        } else if possible == 2 && self.max_occurrences == 1 {
            2
        } else {
            3
        }
    }

    /// Whether the roster in `slot` is below `max_places`.
    #[inline]
    pub fn has_space(&self, slot: Slot) -> bool {
        self.roster[slot].len() < self.max_places
    }

    /// Participants attending in `slot`.
    pub fn roster(&self, slot: Slot) -> &BTreeSet<ParticipantKey> {
        &self.roster[slot]
    }

    pub fn roster_len(&self, slot: Slot) -> usize {
        self.roster[slot].len()
    }

    /// Whether `participant` attends this program in any slot.
    pub fn contains(&self, participant: ParticipantKey) -> bool {
        self.roster.iter().any(|r| r.contains(&participant))
    }

    /// Roster size summed over all slots.
    pub fn total_assigned(&self) -> usize {
        self.roster.iter().map(BTreeSet::len).sum()
    }

    /// Whether some running slot has fewer than `min_places` participants.
    pub fn is_under_minimum(&self) -> bool {
        slots().any(|s| self.allocated_slots[s] && self.roster[s].len() < self.min_places)
    }

    /// Participants pinned to run this program.
    pub fn facilitators(&self) -> &[ParticipantKey] {
        &self.facilitators
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Participants (from the last count) whose top pending wish is this program.
    pub fn primary_preference_count(&self) -> usize {
        self.primary_preference_count
    }

    /// Popularity of `slot` from the last popularity calculation.
    pub fn slot_popularity(&self, slot: Slot) -> usize {
        self.slot_popularity[slot]
    }

    /// Picks the most popular slot that is still open for this program.
    ///
    /// Candidates are possible, unallocated slots with roster space, and
    /// only while the occurrence budget is not yet spent. Ties keep the
    /// lowest index. When every candidate has zero popularity, a program
    /// with no running slot yet gets a uniformly random candidate; a
    /// program that already runs somewhere gets `None`.
    pub fn find_most_popular_free_and_unallocated_slot<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<Slot> {
        if self.allocated_slot_count() >= self.max_occurrences {
            return None;
        }

        let open: Vec<Slot> = slots()
            .filter(|&s| self.has_space(s) && self.possible_slots[s] && !self.allocated_slots[s])
            .collect();

        let mut best: Option<Slot> = None;
        let mut best_count = 0;
        for &slot in &open {
            if self.slot_popularity[slot] > best_count {
                best = Some(slot);
                best_count = self.slot_popularity[slot];
            }
        }
        if best.is_some() {
            return best;
        }

        if self.allocated_slot_count() > 0 {
            return None;
        }
        if open.is_empty() {
            info!(program = self.id, "no open slots left");
            return None;
        }
        Some(open[rng.random_range(0..open.len())])
    }

    /// Marks `slot` as running. Returns `false` (and logs) when the slot is
    /// not possible or the program already fills all its possible slots.
    pub(crate) fn commit_slot(&mut self, slot: Slot) -> bool {
        if self.allocated_slot_count() >= self.possible_slot_count() {
            info!(
                program = self.id,
                slot = slot + 1,
                "skipping slot: program already runs in every slot it can"
            );
            return false;
        }
        if !self.possible_slots[slot] {
            info!(
                program = self.id,
                slot = slot + 1,
                "skipping slot: not possible for this program"
            );
            return false;
        }
        self.allocated_slots[slot] = true;
        true
    }

    pub(crate) fn insert_participant(&mut self, slot: Slot, participant: ParticipantKey) {
        self.roster[slot].insert(participant);
    }

    pub(crate) fn remove_participant(&mut self, slot: Slot, participant: ParticipantKey) -> bool {
        self.roster[slot].remove(&participant)
    }

    pub(crate) fn add_facilitator(&mut self, participant: ParticipantKey) {
        if !self.facilitators.contains(&participant) {
            self.facilitators.push(participant);
        }
    }

    pub(crate) fn set_resolved(&mut self) {
        self.resolved = true;
    }

    pub(crate) fn set_primary_preference_count(&mut self, count: usize) {
        self.primary_preference_count = count;
    }

    pub(crate) fn set_slot_popularity(&mut self, popularity: [usize; SLOT_COUNT]) {
        self.slot_popularity = popularity;
    }
}

//! Problem aggregate.
//!
//! The problem is the sole owner of all programs and participants. Both
//! live in insertion-ordered vectors and refer to each other through
//! [`ProgramKey`] / [`ParticipantKey`] handles, so every operation that
//! touches both sides (placing a participant, pinning a facilitator)
//! goes through this type.
//!
//! Two working sets, the unprocessed programs and unprocessed
//! participants, start out full and only shrink as entities resolve.

use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::{
    slots, Allocation, Participant, ParticipantKey, Preference, Program, ProgramId, ProgramKey,
    Slot, SLOT_COUNT,
};
use crate::error::ProblemError;

/// Participants with more wishes than this count as substantive for
/// fitness totals and under-allocation reports.
pub const SUBSTANTIVE_PREFERENCE_COUNT: usize = 9;

/// A complete allocation problem and its current (partial) solution.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    programs: Vec<Program>,
    participants: Vec<Participant>,
    program_index: HashMap<ProgramId, ProgramKey>,
    participant_index: HashMap<String, ParticipantKey>,
    unprocessed_programs: Vec<ProgramKey>,
    unprocessed_participants: Vec<ParticipantKey>,
}

impl Problem {
    /// Creates an empty problem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a program and returns its handle.
    pub fn add_program(&mut self, program: Program) -> Result<ProgramKey, ProblemError> {
        if self.program_index.contains_key(&program.id()) {
            return Err(ProblemError::DuplicateProgram(program.id()));
        }
        let key = ProgramKey(self.programs.len());
        self.program_index.insert(program.id(), key);
        self.programs.push(program);
        self.unprocessed_programs.push(key);
        Ok(key)
    }

    /// Adds a participant with a wish list of program ids (best first).
    ///
    /// An empty wish list is accepted with a warning; such a participant
    /// is resolved from the start.
    pub fn add_participant(
        &mut self,
        id: impl Into<String>,
        available: [bool; SLOT_COUNT],
        wishes: &[ProgramId],
    ) -> Result<ParticipantKey, ProblemError> {
        let id = id.into();
        if self.participant_index.contains_key(&id) {
            return Err(ProblemError::DuplicateParticipant(id));
        }
        let mut preferences = Vec::with_capacity(wishes.len());
        for (rank, program_id) in (1u32..).zip(wishes) {
            let program = self.program_key(*program_id).ok_or_else(|| {
                ProblemError::UnknownProgram {
                    participant: id.clone(),
                    program: *program_id,
                }
            })?;
            preferences.push(Preference::new(program, rank));
        }
        if preferences.is_empty() {
            warn!(participant = %id, "program list empty for participant");
        }

        let key = ParticipantKey(self.participants.len());
        self.participant_index.insert(id.clone(), key);
        self.participants
            .push(Participant::new(id, available, preferences));
        self.unprocessed_participants.push(key);
        Ok(key)
    }

    /// Pins `participant` as a facilitator of `program`.
    ///
    /// Returns `Ok(false)` (and warns) when the participant is unknown.
    pub fn add_facilitator(
        &mut self,
        program: ProgramId,
        participant: &str,
    ) -> Result<bool, ProblemError> {
        let program_key =
            self.program_key(program)
                .ok_or_else(|| ProblemError::UnknownFacilitatorProgram {
                    participant: participant.to_string(),
                    program,
                })?;
        let Some(participant_key) = self.participant_key(participant) else {
            warn!(program, participant, "facilitator is not a known participant");
            return Ok(false);
        };
        self.programs[program_key.0].add_facilitator(participant_key);
        Ok(true)
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    pub fn program(&self, key: ProgramKey) -> &Program {
        &self.programs[key.0]
    }

    pub fn participant(&self, key: ParticipantKey) -> &Participant {
        &self.participants[key.0]
    }

    pub fn program_key(&self, id: ProgramId) -> Option<ProgramKey> {
        self.program_index.get(&id).copied()
    }

    pub fn participant_key(&self, id: &str) -> Option<ParticipantKey> {
        self.participant_index.get(id).copied()
    }

    /// Looks up a program by its external id.
    pub fn program_by_id(&self, id: ProgramId) -> Option<&Program> {
        self.program_key(id).map(|k| self.program(k))
    }

    /// Looks up a participant by its external id.
    pub fn participant_by_id(&self, id: &str) -> Option<&Participant> {
        self.participant_key(id).map(|k| self.participant(k))
    }

    /// All programs in insertion order.
    pub fn programs(&self) -> impl Iterator<Item = (ProgramKey, &Program)> {
        self.programs
            .iter()
            .enumerate()
            .map(|(i, p)| (ProgramKey(i), p))
    }

    /// All participants in insertion order.
    pub fn participants(&self) -> impl Iterator<Item = (ParticipantKey, &Participant)> {
        self.participants
            .iter()
            .enumerate()
            .map(|(i, p)| (ParticipantKey(i), p))
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn unprocessed_programs(&self) -> &[ProgramKey] {
        &self.unprocessed_programs
    }

    pub fn unprocessed_participants(&self) -> &[ParticipantKey] {
        &self.unprocessed_participants
    }

    /// Unprocessed participants whose top wish is `program`.
    pub fn primary_candidates(&self, program: ProgramKey) -> Vec<ParticipantKey> {
        self.unprocessed_participants
            .iter()
            .copied()
            .filter(|&p| self.participants[p.0].has_top_preference(program))
            .collect()
    }

    // ---------------------------------------------------------------
    // Program-side operations
    // ---------------------------------------------------------------

    /// Fixes `program` to run in `slot`.
    ///
    /// Facilitators of the program lose whatever they had in that slot
    /// and become unavailable there. Returns `false` when the program
    /// refuses the slot (see [`Program`] rules); nothing changes then.
    pub fn assign_program_to_slot(&mut self, program: ProgramKey, slot: Slot) -> bool {
        if !self.programs[program.0].commit_slot(slot) {
            return false;
        }
        let facilitators = self.programs[program.0].facilitators().to_vec();
        for facilitator in facilitators {
            self.unassign_slot(facilitator, slot);
            self.participants[facilitator.0].mark_unavailable(slot);
            debug!(
                program = self.programs[program.0].id(),
                participant = self.participants[facilitator.0].id(),
                slot = slot + 1,
                "facilitator pinned"
            );
        }
        true
    }

    pub(crate) fn set_program_resolved(&mut self, program: ProgramKey) {
        self.programs[program.0].set_resolved();
    }

    /// Recounts, for every program, how many unprocessed participants
    /// have it as their top wish.
    pub fn calculate_primary_preference_counts(&mut self) {
        let mut counts = vec![0usize; self.programs.len()];
        for &p in &self.unprocessed_participants {
            if let Some(top) = self.participants[p.0].top_preference() {
                counts[top.program().0] += 1;
            }
        }
        for (program, count) in self.programs.iter_mut().zip(counts) {
            program.set_primary_preference_count(count);
        }
    }

    /// Recounts per-slot demand for `program`: for every unprocessed
    /// participant whose top wish it is, each possible slot where that
    /// participant is still free scores one.
    pub fn calculate_timeslot_preference(&mut self, program: ProgramKey) {
        let possible = self.programs[program.0].possible_slots();
        let mut popularity = [0usize; SLOT_COUNT];
        for &p in &self.unprocessed_participants {
            let participant = &self.participants[p.0];
            if !participant.has_top_preference(program) {
                continue;
            }
            for slot in slots() {
                if possible[slot] && participant.is_free_at(slot) {
                    popularity[slot] += 1;
                }
            }
        }
        debug!(
            program = self.programs[program.0].id(),
            ?popularity,
            "slot popularity"
        );
        self.programs[program.0].set_slot_popularity(popularity);
    }

    /// Orders the unprocessed programs by primary-preference count,
    /// most popular first (stable for ties).
    pub fn sort_programs_by_primary_preference_count(&mut self) {
        self.calculate_primary_preference_counts();
        let programs = &self.programs;
        self.unprocessed_programs
            .sort_by_key(|k| std::cmp::Reverse(programs[k.0].primary_preference_count()));
    }

    // ---------------------------------------------------------------
    // Participant-side operations
    // ---------------------------------------------------------------

    /// Places `participant` into `program`'s roster at `slot` using
    /// `preference`, without touching the pending stack.
    ///
    /// Fails without side effects when the participant is unavailable
    /// or already allocated in `slot`, or the program does not run there
    /// or is full. On success, a program with a continuation slot also
    /// books a placeholder there, displacing what was booked before.
    pub fn assign_preference(
        &mut self,
        participant: ParticipantKey,
        preference: Preference,
        slot: Slot,
    ) -> bool {
        let program = &self.programs[preference.program().0];
        let person = &self.participants[participant.0];

        if !person.is_available(slot) {
            info!(
                participant = person.id(),
                program = program.id(),
                slot = slot + 1,
                "not placed: participant absent in slot"
            );
            return false;
        }
        if !program.is_allocated(slot) {
            info!(
                participant = person.id(),
                program = program.id(),
                slot = slot + 1,
                "not placed: program not active in slot"
            );
            return false;
        }
        if let Some(existing) = person.allocation(slot) {
            info!(
                participant = person.id(),
                program = program.id(),
                slot = slot + 1,
                holder = self.programs[existing.program().0].id(),
                "not placed: participant already allocated in slot"
            );
            return false;
        }
        if !program.has_space(slot) {
            warn!(
                participant = person.id(),
                program = program.id(),
                slot = slot + 1,
                "not placed: program full"
            );
            return false;
        }

        let continuation = program.continuation_slot().filter(|&c| c != slot);
        debug!(
            participant = person.id(),
            program = program.id(),
            slot = slot + 1,
            rank = preference.rank(),
            "assigned"
        );

        self.programs[preference.program().0].insert_participant(slot, participant);
        self.participants[participant.0].set_allocation(slot, Some(Allocation::regular(preference)));

        if let Some(target) = continuation {
            self.book_continuation(participant, preference, slot, target);
        }
        true
    }

    fn book_continuation(
        &mut self,
        participant: ParticipantKey,
        preference: Preference,
        from: Slot,
        target: Slot,
    ) {
        if !self.participants[participant.0].is_available(target) {
            debug!(
                participant = self.participants[participant.0].id(),
                slot = target + 1,
                "continuation skipped: participant absent"
            );
            return;
        }
        self.unassign_slot(participant, target);
        self.participants[participant.0]
            .set_allocation(target, Some(Allocation::continuation(preference, from)));
        debug!(
            participant = self.participants[participant.0].id(),
            program = self.programs[preference.program().0].id(),
            slot = target + 1,
            from = from + 1,
            "continues in slot"
        );
    }

    /// Places the top pending wish into `slot` and pops it on success.
    pub fn assign_first_preference_to_slot(
        &mut self,
        participant: ParticipantKey,
        slot: Slot,
    ) -> bool {
        let Some(top) = self.participants[participant.0].top_preference() else {
            return false;
        };
        if self.assign_preference(participant, top, slot) {
            self.participants[participant.0].pop_top();
            true
        } else {
            false
        }
    }

    /// Places the top pending wish into the best slot available.
    ///
    /// Tries the slot picked by [`Problem::choose_slot`] first, then
    /// every available slot in index order. When nothing works the wish
    /// is dropped from the stack and `false` is returned.
    pub fn assign_first_preference<R: Rng + ?Sized>(
        &mut self,
        participant: ParticipantKey,
        rng: &mut R,
    ) -> bool {
        if self.participants[participant.0].top_preference().is_none() {
            return false;
        }

        if let Some(slot) = self.choose_slot(participant, rng) {
            if self.assign_first_preference_to_slot(participant, slot) {
                return true;
            }
        }

        for slot in slots() {
            if self.participants[participant.0].is_available(slot)
                && self.assign_first_preference_to_slot(participant, slot)
            {
                return true;
            }
        }

        if let Some(dropped) = self.participants[participant.0].pop_top() {
            debug!(
                participant = self.participants[participant.0].id(),
                program = self.programs[dropped.program().0].id(),
                rank = dropped.rank(),
                "wish cannot be placed, discarded"
            );
        }
        false
    }

    /// Slots where `participant` could attend `program` right now.
    pub fn admissible_slots(&self, participant: ParticipantKey, program: ProgramKey) -> Vec<Slot> {
        let person = &self.participants[participant.0];
        let program = &self.programs[program.0];
        slots()
            .filter(|&s| person.is_free_at(s) && program.is_allocated(s) && program.has_space(s))
            .collect()
    }

    /// Chooses a slot for the participant's top wish.
    ///
    /// 1. No admissible slot: `None`.
    /// 2. One admissible slot: that slot.
    /// 3. All admissible rosters at or above minimum: the emptiest one.
    /// 4. All below minimum: the fullest one.
    /// 5. Mixed: drop slots the next wish could also use now (unless that
    ///    drops all of them), then pick uniformly at random.
    pub fn choose_slot<R: Rng + ?Sized>(
        &self,
        participant: ParticipantKey,
        rng: &mut R,
    ) -> Option<Slot> {
        let person = &self.participants[participant.0];
        let top = person.top_preference()?;
        let mut candidates = self.admissible_slots(participant, top.program());

        match candidates.len() {
            0 => None,
            1 => Some(candidates[0]),
            _ => {
                let program = &self.programs[top.program().0];
                let min = program.min_places();
                if candidates.iter().all(|&s| program.roster_len(s) >= min) {
                    candidates.iter().copied().min_by_key(|&s| program.roster_len(s))
                } else if candidates.iter().all(|&s| program.roster_len(s) < min) {
                    candidates
                        .iter()
                        .copied()
                        .rev()
                        .max_by_key(|&s| program.roster_len(s))
                } else {
                    if let Some(next) = person.next_preference() {
                        let needed = self.admissible_slots(participant, next.program());
                        let spared: Vec<Slot> = candidates
                            .iter()
                            .copied()
                            .filter(|s| !needed.contains(s))
                            .collect();
                        if !spared.is_empty() {
                            candidates = spared;
                        }
                    }
                    Some(candidates[rng.random_range(0..candidates.len())])
                }
            }
        }
    }

    /// Clears the participant's allocation in `slot`.
    ///
    /// A regular seat also leaves the roster, and any continuation
    /// placeholders booked from it are cleared too. No-op when the slot
    /// is empty.
    pub fn unassign_slot(&mut self, participant: ParticipantKey, slot: Slot) {
        let Some(previous) = self.participants[participant.0].set_allocation(slot, None) else {
            return;
        };
        if !previous.is_regular() {
            return;
        }
        self.programs[previous.program().0].remove_participant(slot, participant);
        for other in slots().filter(|&s| s != slot) {
            let continued = self.participants[participant.0]
                .allocation(other)
                .is_some_and(|a| a.continued_from() == Some(slot));
            if continued {
                self.participants[participant.0].set_allocation(other, None);
            }
        }
    }

    pub(crate) fn discard_pending(&mut self, participant: ParticipantKey, program: ProgramKey) {
        self.participants[participant.0].discard_pending(program);
    }

    #[cfg(test)]
    pub(crate) fn participant_mut(&mut self, key: ParticipantKey) -> &mut Participant {
        &mut self.participants[key.0]
    }

    #[cfg(test)]
    pub(crate) fn program_mut(&mut self, key: ProgramKey) -> &mut Program {
        &mut self.programs[key.0]
    }

    // ---------------------------------------------------------------
    // Working sets
    // ---------------------------------------------------------------

    /// Drops resolved programs from the unprocessed set.
    pub fn prune_resolved_programs(&mut self) -> usize {
        let before = self.unprocessed_programs.len();
        let programs = &self.programs;
        self.unprocessed_programs
            .retain(|k| !programs[k.0].is_resolved());
        before - self.unprocessed_programs.len()
    }

    /// Drops resolved participants from the unprocessed set.
    pub fn prune_resolved_participants(&mut self) -> usize {
        let before = self.unprocessed_participants.len();
        let participants = &self.participants;
        self.unprocessed_participants
            .retain(|k| !participants[k.0].is_resolved());
        before - self.unprocessed_participants.len()
    }

    // ---------------------------------------------------------------
    // Aggregates
    // ---------------------------------------------------------------

    /// Total fitness over participants who attend at least one slot or
    /// have a substantive wish list.
    pub fn fitness(&self) -> u64 {
        self.participants
            .iter()
            .filter(|p| {
                p.available_count() > 0
                    || p.original_preferences().len() > SUBSTANTIVE_PREFERENCE_COUNT
            })
            .map(|p| u64::from(p.fitness()))
            .sum()
    }

    /// Substantive participants attending fewer slots than they are present for.
    pub fn under_allocated_participants(&self) -> Vec<ParticipantKey> {
        self.participants()
            .filter(|(_, p)| {
                p.allocated_count() < p.available_count()
                    && p.original_preferences().len() > SUBSTANTIVE_PREFERENCE_COUNT
            })
            .map(|(k, _)| k)
            .collect()
    }

    /// Programs with some running slot below the minimum roster size.
    pub fn under_minimum_programs(&self) -> Vec<ProgramKey> {
        self.programs()
            .filter(|(_, p)| p.is_under_minimum())
            .map(|(k, _)| k)
            .collect()
    }
}

//! Participant model.
//!
//! A participant has a ranked wish list of programs, a per-slot
//! availability mask and, after optimization, up to one allocation per
//! slot. Pending wishes form a stack: the top is the next program to
//! try, and a wish leaves the stack once it has been placed or found
//! unplaceable. The full original list is kept separately.

use serde::{Deserialize, Serialize};

use super::{slots, Preference, ProgramKey, Slot, SLOT_COUNT};

/// Fitness of a participant before any fitness has been computed.
pub const UNALLOCATED_FITNESS: u32 = 30;
/// Upper bound for the penalty of a free, available slot.
pub const MAX_SLOT_PENALTY: u32 = 13;
/// Added to the wish-list length to get the penalty of a free slot.
pub const SLOT_PENALTY_OFFSET: u32 = 3;

/// What a participant attends in one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    preference: Preference,
    continued_from: Option<Slot>,
}

impl Allocation {
    /// A regular roster seat.
    pub fn regular(preference: Preference) -> Self {
        Self {
            preference,
            continued_from: None,
        }
    }

    /// Placeholder for a program that continues from `from` into another slot.
    pub fn continuation(preference: Preference, from: Slot) -> Self {
        Self {
            preference,
            continued_from: Some(from),
        }
    }

    pub fn preference(&self) -> Preference {
        self.preference
    }

    pub fn program(&self) -> ProgramKey {
        self.preference.program()
    }

    pub fn rank(&self) -> u32 {
        self.preference.rank()
    }

    /// Source slot when this is a continuation placeholder.
    pub fn continued_from(&self) -> Option<Slot> {
        self.continued_from
    }

    /// Whether this allocation holds a roster seat.
    pub fn is_regular(&self) -> bool {
        self.continued_from.is_none()
    }
}

/// An event participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    id: String,
    available: [bool; SLOT_COUNT],
    /// Pending wishes; the last element is the top of the stack.
    pending: Vec<Preference>,
    original: Vec<Preference>,
    allocated: [Option<Allocation>; SLOT_COUNT],
}

impl Participant {
    /// Creates a participant from an ordered wish list (best first).
    pub fn new(
        id: impl Into<String>,
        available: [bool; SLOT_COUNT],
        preferences: Vec<Preference>,
    ) -> Self {
        let pending = preferences.iter().rev().copied().collect();
        Self {
            id: id.into(),
            available,
            pending,
            original: preferences,
            allocated: [None; SLOT_COUNT],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn is_available(&self, slot: Slot) -> bool {
        self.available[slot]
    }

    pub fn availability(&self) -> [bool; SLOT_COUNT] {
        self.available
    }

    /// Number of slots the participant attends the event in.
    pub fn available_count(&self) -> usize {
        self.available.iter().filter(|&&b| b).count()
    }

    /// Available and not yet allocated.
    #[inline]
    pub fn is_free_at(&self, slot: Slot) -> bool {
        self.available[slot] && self.allocated[slot].is_none()
    }

    /// Pending wishes, bottom of the stack first.
    pub fn pending(&self) -> &[Preference] {
        &self.pending
    }

    /// The next wish to try.
    pub fn top_preference(&self) -> Option<Preference> {
        self.pending.last().copied()
    }

    /// The wish right below the top of the stack.
    pub fn next_preference(&self) -> Option<Preference> {
        self.pending.iter().rev().nth(1).copied()
    }

    /// Rank of the top wish, `u32::MAX` when nothing is pending.
    pub fn top_preference_rank(&self) -> u32 {
        self.top_preference().map_or(u32::MAX, |p| p.rank())
    }

    /// Whether the top wish names `program`.
    pub fn has_top_preference(&self, program: ProgramKey) -> bool {
        self.top_preference().is_some_and(|p| p.program() == program)
    }

    /// The full wish list, best first.
    pub fn original_preferences(&self) -> &[Preference] {
        &self.original
    }

    /// Rank of `program` in the original wish list.
    pub fn rank_of(&self, program: ProgramKey) -> Option<u32> {
        self.original
            .iter()
            .find(|p| p.program() == program)
            .map(Preference::rank)
    }

    pub fn allocation(&self, slot: Slot) -> Option<&Allocation> {
        self.allocated[slot].as_ref()
    }

    pub fn allocations(&self) -> &[Option<Allocation>; SLOT_COUNT] {
        &self.allocated
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.iter().filter(|a| a.is_some()).count()
    }

    pub fn unallocated_count(&self) -> usize {
        SLOT_COUNT - self.allocated_count()
    }

    /// Whether any slot is allocated to `program`.
    pub fn holds_program(&self, program: ProgramKey) -> bool {
        self.allocated
            .iter()
            .flatten()
            .any(|a| a.program() == program)
    }

    /// Whether a slot other than `except` is allocated to `program`.
    pub fn holds_program_elsewhere(&self, program: ProgramKey, except: Slot) -> bool {
        slots()
            .filter(|&s| s != except)
            .any(|s| self.allocated[s].is_some_and(|a| a.program() == program))
    }

    /// Best (lowest) rank among current allocations.
    pub fn best_rank(&self) -> Option<u32> {
        self.allocated.iter().flatten().map(Allocation::rank).min()
    }

    /// Penalty for an available slot left without an allocation.
    pub fn unallocated_slot_penalty(&self) -> u32 {
        let len = u32::try_from(self.original.len()).unwrap_or(u32::MAX);
        len.saturating_add(SLOT_PENALTY_OFFSET).min(MAX_SLOT_PENALTY)
    }

    /// Sum of allocated ranks plus penalties for free available slots.
    ///
    /// Lower is better. Pure function of the current allocation and
    /// availability.
    pub fn fitness(&self) -> u32 {
        let penalty = self.unallocated_slot_penalty();
        slots()
            .map(|s| match &self.allocated[s] {
                Some(a) => a.rank(),
                None if self.available[s] => penalty,
                None => 0,
            })
            .sum()
    }

    /// Hopeless (nothing left to try) or allocated in every slot.
    pub fn is_resolved(&self) -> bool {
        self.pending.is_empty() || self.allocated.iter().all(Option::is_some)
    }

    pub(crate) fn pop_top(&mut self) -> Option<Preference> {
        self.pending.pop()
    }

    /// Drops `program` from the pending stack (used when it was placed
    /// outside the normal stack order).
    pub(crate) fn discard_pending(&mut self, program: ProgramKey) {
        self.pending.retain(|p| p.program() != program);
    }

    pub(crate) fn set_allocation(
        &mut self,
        slot: Slot,
        allocation: Option<Allocation>,
    ) -> Option<Allocation> {
        std::mem::replace(&mut self.allocated[slot], allocation)
    }

    pub(crate) fn mark_unavailable(&mut self, slot: Slot) {
        self.available[slot] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(programs: &[usize]) -> Vec<Preference> {
        programs
            .iter()
            .enumerate()
            .map(|(i, &p)| Preference::new(ProgramKey(p), i as u32 + 1))
            .collect()
    }

    #[test]
    fn test_pending_stack_order() {
        let mut p = Participant::new("a", [true; 3], prefs(&[10, 11, 12]));
        assert_eq!(p.top_preference().map(|x| x.program()), Some(ProgramKey(10)));
        assert_eq!(p.next_preference().map(|x| x.program()), Some(ProgramKey(11)));
        assert_eq!(p.top_preference_rank(), 1);

        p.pop_top();
        assert_eq!(p.top_preference_rank(), 2);
        p.pop_top();
        assert_eq!(p.next_preference(), None);
        p.pop_top();
        assert_eq!(p.top_preference(), None);
        assert_eq!(p.top_preference_rank(), u32::MAX);
        // Original list untouched
        assert_eq!(p.original_preferences().len(), 3);
    }

    #[test]
    fn test_fitness_penalties() {
        // 2 wishes → penalty 5 per free available slot
        let mut p = Participant::new("a", [true, true, false], prefs(&[0, 1]));
        assert_eq!(p.unallocated_slot_penalty(), 5);
        assert_eq!(p.fitness(), 10);

        p.set_allocation(0, Some(Allocation::regular(Preference::new(ProgramKey(1), 2))));
        assert_eq!(p.fitness(), 2 + 5);
        assert_eq!(p.fitness(), p.fitness());
    }

    #[test]
    fn test_fitness_penalty_is_capped() {
        let many: Vec<usize> = (0..20).collect();
        let p = Participant::new("a", [true; 3], prefs(&many));
        assert_eq!(p.unallocated_slot_penalty(), MAX_SLOT_PENALTY);
        assert_eq!(p.fitness(), 3 * MAX_SLOT_PENALTY);
    }

    #[test]
    fn test_resolved() {
        let mut p = Participant::new("a", [true; 3], prefs(&[0]));
        assert!(!p.is_resolved());
        p.pop_top();
        assert!(p.is_resolved()); // hopeless

        let mut q = Participant::new("b", [true; 3], prefs(&[0, 1, 2, 3]));
        for s in 0..3 {
            q.set_allocation(s, Some(Allocation::regular(Preference::new(ProgramKey(s), 1))));
        }
        assert!(q.is_resolved());

        let empty = Participant::new("c", [true; 3], Vec::new());
        assert!(empty.is_resolved());
    }

    #[test]
    fn test_holdings() {
        let mut p = Participant::new("a", [true; 3], prefs(&[4, 5]));
        p.set_allocation(1, Some(Allocation::regular(Preference::new(ProgramKey(5), 2))));
        assert!(p.holds_program(ProgramKey(5)));
        assert!(!p.holds_program_elsewhere(ProgramKey(5), 1));
        assert!(p.holds_program_elsewhere(ProgramKey(5), 0));
        assert_eq!(p.best_rank(), Some(2));
        assert_eq!(p.rank_of(ProgramKey(4)), Some(1));
        assert_eq!(p.rank_of(ProgramKey(9)), None);
        assert!(!p.is_free_at(1));
        assert!(p.is_free_at(0));
    }

    #[test]
    fn test_discard_pending() {
        let mut p = Participant::new("a", [true; 3], prefs(&[1, 2, 3]));
        p.discard_pending(ProgramKey(2));
        assert_eq!(p.pending().len(), 2);
        assert_eq!(p.next_preference().map(|x| x.program()), Some(ProgramKey(3)));
    }

    #[test]
    fn test_continuation_allocation() {
        let a = Allocation::continuation(Preference::new(ProgramKey(0), 3), 0);
        assert!(!a.is_regular());
        assert_eq!(a.continued_from(), Some(0));
        assert_eq!(a.rank(), 3);
        assert!(Allocation::regular(Preference::new(ProgramKey(0), 3)).is_regular());
    }
}

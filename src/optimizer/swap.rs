//! Swap-based repair.
//!
//! Two kinds of move are used after the greedy phases:
//!
//! - **Chained swap**: an under-allocated participant takes the seat of
//!   an occupant, who is then re-homed elsewhere.
//! - **Local swap**: a participant moves from a program with spare
//!   members into an under-filled program they also wished for. Nobody
//!   needs re-homing.
//!
//! Candidate generation is read-only; execution goes through the
//! [`Problem`] placement operations and rolls back when the target seat
//! cannot be taken.

use rand::Rng;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::{debug, error};

use super::allocate_one_slot;
use crate::models::{ParticipantKey, Preference, Problem, ProgramKey, Slot, MAX_SLOT_PENALTY};

/// A candidate reallocation and its estimated fitness gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PossibleSwap {
    /// Participant who gives up their seat in `slot`.
    pub from_participant: ParticipantKey,
    /// Participant who takes the freed seat; `None` for a local swap,
    /// where `from_participant` moves itself.
    pub to_participant: Option<ParticipantKey>,
    /// Chained: the displaced participant's fallback wish in `slot`.
    /// Local: the allocation being given up.
    pub from_preference: Preference,
    /// Wish that gets placed into `slot`.
    pub to_preference: Preference,
    pub slot: Slot,
    /// Estimated improvement; larger is better.
    pub fitness_delta: i64,
}

impl PossibleSwap {
    /// Whether this is a local (self) move.
    pub fn is_local(&self) -> bool {
        self.to_participant.is_none()
    }
}

/// Candidate chained swaps that would give `target` a seat in `slot`.
///
/// For each of the target's wishes whose program runs in `slot`, every
/// current occupant is considered together with each of the occupant's
/// pending wishes that also runs in `slot` with room left. The gain is
/// `(13 - target rank) + (occupant rank now - occupant fallback rank)`.
/// Moves that would give either side a program they already hold are
/// skipped. Best first; ties keep generation order.
pub fn find_swaps(problem: &Problem, target: ParticipantKey, slot: Slot) -> Vec<PossibleSwap> {
    let person = problem.participant(target);
    if !person.is_free_at(slot) {
        return Vec::new();
    }

    let mut swaps = Vec::new();
    for &wanted in person.original_preferences() {
        let program = problem.program(wanted.program());
        if !program.is_allocated(slot) || person.holds_program(wanted.program()) {
            continue;
        }
        for &occupant in program.roster(slot) {
            if occupant == target {
                continue;
            }
            let other = problem.participant(occupant);
            let Some(current) = other.allocation(slot) else {
                continue;
            };
            for &fallback in other.pending().iter().rev() {
                if fallback.program() == wanted.program() {
                    continue;
                }
                let alternative = problem.program(fallback.program());
                if !alternative.is_allocated(slot)
                    || !alternative.has_space(slot)
                    || other.holds_program(fallback.program())
                {
                    continue;
                }
                let gain_target = i64::from(MAX_SLOT_PENALTY) - i64::from(wanted.rank());
                let gain_other = i64::from(current.rank()) - i64::from(fallback.rank());
                swaps.push(PossibleSwap {
                    from_participant: occupant,
                    to_participant: Some(target),
                    from_preference: fallback,
                    to_preference: wanted,
                    slot,
                    fitness_delta: gain_target + gain_other,
                });
            }
        }
    }

    swaps.sort_by_key(|s| Reverse(s.fitness_delta));
    swaps
}

/// Executes a chained swap.
///
/// The occupant is unseated and the target takes the seat. The occupant
/// then tries its fallback wish in the same slot and, failing that, its
/// regular wish stack; a failed re-homing is logged and left as is.
/// Returns `false` (with the occupant restored) if the target could not
/// be seated.
pub fn execute_swap<R: Rng + ?Sized>(
    problem: &mut Problem,
    swap: &PossibleSwap,
    rng: &mut R,
) -> bool {
    let Some(target) = swap.to_participant else {
        return false;
    };
    let displaced = swap.from_participant;
    let slot = swap.slot;
    let Some(previous) = problem.participant(displaced).allocation(slot).copied() else {
        return false;
    };

    problem.unassign_slot(displaced, slot);
    if !problem.assign_preference(target, swap.to_preference, slot) {
        problem.assign_preference(displaced, previous.preference(), slot);
        return false;
    }
    problem.discard_pending(target, swap.to_preference.program());
    debug!(
        participant = problem.participant(target).id(),
        displaced = problem.participant(displaced).id(),
        slot = slot + 1,
        delta = swap.fitness_delta,
        "swap executed"
    );

    if problem.assign_preference(displaced, swap.from_preference, slot) {
        problem.discard_pending(displaced, swap.from_preference.program());
    } else if !allocate_one_slot(problem, displaced, rng) {
        error!(
            participant = problem.participant(displaced).id(),
            slot = slot + 1,
            "could not re-home participant after swap"
        );
    }
    true
}

/// Candidate local swaps that would add one member to `program` in `slot`.
///
/// Candidates do not attend `program` yet, listed it among their wishes
/// and currently sit in another program at `slot` that stays above its
/// minimum after losing one member. The gain is current rank minus the
/// rank of `program`. Best first; ties keep participant order.
pub fn find_local_swaps(problem: &Problem, program: ProgramKey, slot: Slot) -> Vec<PossibleSwap> {
    if !problem.program(program).is_allocated(slot) {
        return Vec::new();
    }

    let mut swaps: Vec<PossibleSwap> = problem
        .participants()
        .filter_map(|(key, person)| {
            if person.holds_program(program) {
                return None;
            }
            let wanted = person
                .original_preferences()
                .iter()
                .find(|p| p.program() == program)?;
            let current = person.allocation(slot).filter(|a| a.is_regular())?;
            let donor = problem.program(current.program());
            if donor.roster_len(slot) <= donor.min_places() {
                return None;
            }
            Some(PossibleSwap {
                from_participant: key,
                to_participant: None,
                from_preference: current.preference(),
                to_preference: *wanted,
                slot,
                fitness_delta: i64::from(current.rank()) - i64::from(wanted.rank()),
            })
        })
        .collect();

    swaps.sort_by_key(|s| Reverse(s.fitness_delta));
    swaps
}

/// Executes a local swap: the participant leaves its current program in
/// the slot and joins the wished one. Restores the old seat and returns
/// `false` if the new seat cannot be taken.
pub fn execute_local_swap(problem: &mut Problem, swap: &PossibleSwap) -> bool {
    let mover = swap.from_participant;
    let slot = swap.slot;
    let current = problem.participant(mover).allocation(slot).copied();
    if current.map(|a| a.preference()) != Some(swap.from_preference) {
        debug!(
            participant = problem.participant(mover).id(),
            slot = slot + 1,
            "local swap is stale"
        );
        return false;
    }

    problem.unassign_slot(mover, slot);
    if problem.assign_preference(mover, swap.to_preference, slot) {
        problem.discard_pending(mover, swap.to_preference.program());
        debug!(
            participant = problem.participant(mover).id(),
            slot = slot + 1,
            from = problem.program(swap.from_preference.program()).id(),
            to = problem.program(swap.to_preference.program()).id(),
            "local swap executed"
        );
        true
    } else {
        problem.assign_preference(mover, swap.from_preference, slot);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Program;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// A full one-seat program 1 held by `occupant`, and an open
    /// program 2 in the same slot that the occupant also wished for.
    fn chained_setup() -> (Problem, ParticipantKey, ParticipantKey) {
        let mut problem = Problem::new();
        let tight = problem
            .add_program(Program::new(1, "").with_capacity(0, 1).with_possible_slot(0))
            .unwrap();
        let open = problem
            .add_program(Program::new(2, "").with_capacity(0, 5).with_possible_slot(0))
            .unwrap();
        problem.assign_program_to_slot(tight, 0);
        problem.assign_program_to_slot(open, 0);

        let occupant = problem.add_participant("occupant", [true; 3], &[1, 2]).unwrap();
        assert!(problem.assign_first_preference_to_slot(occupant, 0));
        let target = problem.add_participant("target", [true; 3], &[1]).unwrap();
        (problem, occupant, target)
    }

    #[test]
    fn test_find_swaps_scores_both_sides() {
        let (problem, occupant, target) = chained_setup();
        let swaps = find_swaps(&problem, target, 0);

        assert_eq!(swaps.len(), 1);
        let swap = swaps[0];
        assert_eq!(swap.from_participant, occupant);
        assert_eq!(swap.to_participant, Some(target));
        assert_eq!(swap.to_preference.rank(), 1);
        assert_eq!(swap.from_preference.rank(), 2);
        // (13 - 1) + (1 - 2)
        assert_eq!(swap.fitness_delta, 11);
        assert!(!swap.is_local());
    }

    #[test]
    fn test_find_swaps_requires_free_slot() {
        let (problem, occupant, _) = chained_setup();
        assert!(find_swaps(&problem, occupant, 0).is_empty());
    }

    #[test]
    fn test_execute_swap_rehomes_occupant() {
        let (mut problem, occupant, target) = chained_setup();
        let swap = find_swaps(&problem, target, 0)[0];
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(execute_swap(&mut problem, &swap, &mut rng));

        let tight = problem.program_key(1).unwrap();
        let open = problem.program_key(2).unwrap();
        assert!(problem.program(tight).roster(0).contains(&target));
        assert!(problem.program(open).roster(0).contains(&occupant));
        assert_eq!(problem.participant(occupant).allocation(0).unwrap().rank(), 2);
        assert!(problem.participant(occupant).pending().is_empty());
    }

    #[test]
    fn test_execute_swap_restores_on_failure() {
        let (mut problem, occupant, target) = chained_setup();
        let swap = find_swaps(&problem, target, 0)[0];
        // Target becomes busy in the slot before the swap runs
        let open = problem.program_key(2).unwrap();
        assert!(problem.assign_preference(target, Preference::new(open, 5), 0));

        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!execute_swap(&mut problem, &swap, &mut rng));
        let tight = problem.program_key(1).unwrap();
        assert!(problem.program(tight).roster(0).contains(&occupant));
        assert_eq!(problem.participant(occupant).allocation(0).unwrap().program(), tight);
    }

    #[test]
    fn test_find_swaps_skips_fallback_already_held() {
        let mut problem = Problem::new();
        let tight = problem
            .add_program(Program::new(1, "").with_capacity(0, 1).with_possible_slot(0))
            .unwrap();
        let open = problem
            .add_program(
                Program::new(2, "")
                    .with_capacity(0, 5)
                    .with_possible_slots([true, true, false])
                    .with_max_occurrences(2),
            )
            .unwrap();
        problem.assign_program_to_slot(tight, 0);
        problem.assign_program_to_slot(open, 0);
        problem.assign_program_to_slot(open, 1);

        let occupant = problem.add_participant("occupant", [true; 3], &[1, 2]).unwrap();
        assert!(problem.assign_first_preference_to_slot(occupant, 0));
        // Occupant already attends its fallback in slot 1
        assert!(problem.assign_preference(occupant, Preference::new(open, 2), 1));
        let target = problem.add_participant("target", [true; 3], &[1]).unwrap();

        assert!(find_swaps(&problem, target, 0).is_empty());
    }

    #[test]
    fn test_find_swaps_skips_wish_already_held() {
        let mut problem = Problem::new();
        let tight = problem
            .add_program(
                Program::new(1, "")
                    .with_capacity(0, 1)
                    .with_possible_slots([true, true, false])
                    .with_max_occurrences(2),
            )
            .unwrap();
        let open = problem
            .add_program(Program::new(2, "").with_capacity(0, 5).with_possible_slot(0))
            .unwrap();
        problem.assign_program_to_slot(tight, 0);
        problem.assign_program_to_slot(tight, 1);
        problem.assign_program_to_slot(open, 0);

        let occupant = problem.add_participant("occupant", [true; 3], &[1, 2]).unwrap();
        assert!(problem.assign_first_preference_to_slot(occupant, 0));
        let target = problem.add_participant("target", [true; 3], &[1]).unwrap();
        // Target already attends program 1 in slot 1
        assert!(problem.assign_preference(target, Preference::new(tight, 1), 1));

        assert!(find_swaps(&problem, target, 0).is_empty());
    }

    /// Program 1 runs empty in slot 0 with minimum 2; program 2 has
    /// `donors` members there, minimum 1, all of whom also wished for 1.
    fn local_setup(donors: usize) -> (Problem, ProgramKey, ProgramKey) {
        let mut problem = Problem::new();
        let short = problem
            .add_program(Program::new(1, "").with_capacity(2, 5).with_possible_slot(0))
            .unwrap();
        let donor = problem
            .add_program(Program::new(2, "").with_capacity(1, 10).with_possible_slot(0))
            .unwrap();
        problem.assign_program_to_slot(short, 0);
        problem.assign_program_to_slot(donor, 0);
        for i in 0..donors {
            let p = problem
                .add_participant(format!("d{i}"), [true; 3], &[2, 1])
                .unwrap();
            assert!(problem.assign_first_preference_to_slot(p, 0));
        }
        (problem, short, donor)
    }

    #[test]
    fn test_find_local_swaps_keeps_donor_minimum() {
        let (problem, short, _) = local_setup(1);
        // The only donor member cannot leave
        assert!(find_local_swaps(&problem, short, 0).is_empty());

        let (problem, short, _) = local_setup(3);
        let swaps = find_local_swaps(&problem, short, 0);
        assert_eq!(swaps.len(), 3);
        assert!(swaps.iter().all(|s| s.is_local() && s.fitness_delta == -1));
    }

    #[test]
    fn test_execute_local_swap_moves_member() {
        let (mut problem, short, donor) = local_setup(3);
        let swap = find_local_swaps(&problem, short, 0)[0];

        assert!(execute_local_swap(&mut problem, &swap));
        assert_eq!(problem.program(short).roster_len(0), 1);
        assert_eq!(problem.program(donor).roster_len(0), 2);
        let mover = problem.participant(swap.from_participant);
        assert_eq!(mover.allocation(0).unwrap().program(), short);
        assert_eq!(mover.allocation(0).unwrap().rank(), 2);
        assert!(mover.pending().is_empty());

        // Replaying the same swap is stale now
        assert!(!execute_local_swap(&mut problem, &swap));
    }
}

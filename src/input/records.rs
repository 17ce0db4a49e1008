//! Raw input records.
//!
//! Program records arrive from spreadsheets exported to JSON, so numeric
//! fields may be numbers, numeric strings, empty strings or missing. They
//! are kept as [`serde_json::Value`] and parsed leniently: anything
//! unusable falls back to the documented default and is logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ProblemError;
use crate::models::{
    Program, ProgramId, Slot, DEFAULT_MAX_OCCURRENCES, DEFAULT_MAX_PLACES, DEFAULT_MIN_PLACES,
    SLOT_COUNT,
};

/// Literal marking a slot column as possible.
pub const SLOT_ENABLED: &str = "TRUE";

/// One program row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default, rename = "minSize")]
    pub min_size: Value,
    #[serde(default, rename = "maxSize")]
    pub max_size: Value,
    #[serde(default, rename = "availableSlots")]
    pub available_slots: Value,
    #[serde(default)]
    pub slot1: Value,
    #[serde(default)]
    pub slot2: Value,
    #[serde(default)]
    pub slot3: Value,
    /// 1-based continuation slot. The misspelling is part of the input format.
    #[serde(default, rename = "countinueInSlot")]
    pub continue_in_slot: Value,
}

impl ProgramRecord {
    /// Creates a record with the given id and every other field missing.
    pub fn new(id: ProgramId) -> Self {
        Self {
            id: Value::from(id),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Value::from(name.into());
        self
    }

    pub fn with_sizes(mut self, min: usize, max: usize) -> Self {
        self.min_size = Value::from(min);
        self.max_size = Value::from(max);
        self
    }

    pub fn with_available_slots(mut self, occurrences: usize) -> Self {
        self.available_slots = Value::from(occurrences);
        self
    }

    /// Enables the given 0-based slots.
    pub fn with_slots(mut self, enabled: &[Slot]) -> Self {
        for &slot in enabled {
            let flag = Value::from(SLOT_ENABLED);
            match slot {
                0 => self.slot1 = flag,
                1 => self.slot2 = flag,
                2 => self.slot3 = flag,
                _ => {}
            }
        }
        self
    }

    /// Sets the 1-based continuation slot, as it appears in the input.
    pub fn with_continue_in_slot(mut self, slot: i64) -> Self {
        self.continue_in_slot = Value::from(slot);
        self
    }

    /// The program id, which must be an integer or a numeric string.
    pub fn program_id(&self) -> Result<ProgramId, ProblemError> {
        parse_integer(&self.id).ok_or_else(|| ProblemError::InvalidProgramId(self.id.to_string()))
    }

    /// Display name; numbers are taken in their printed form.
    pub fn display_name(&self) -> String {
        match &self.name {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Possible slots from the `slot1..slot3` columns.
    pub fn possible_slots(&self) -> [bool; SLOT_COUNT] {
        [&self.slot1, &self.slot2, &self.slot3].map(|v| v.as_str() == Some(SLOT_ENABLED))
    }

    /// The 0-based continuation slot, if one is declared.
    ///
    /// Returns `Ok(None)` for a missing or empty field and `Err(raw)` for
    /// a value that is not a slot number in `1..=3`.
    pub fn continuation_slot(&self) -> Result<Option<Slot>, String> {
        if is_blank(&self.continue_in_slot) {
            return Ok(None);
        }
        match parse_integer(&self.continue_in_slot) {
            Some(n) if (1..=SLOT_COUNT as i64).contains(&n) => Ok(Some((n - 1) as Slot)),
            _ => Err(self.continue_in_slot.to_string()),
        }
    }

    /// Builds the program, replacing unusable numeric fields by defaults.
    pub fn to_program(&self) -> Result<Program, ProblemError> {
        let id = self.program_id()?;
        let max_places = parse_count(&self.max_size, DEFAULT_MAX_PLACES, id, "maxSize");
        let min_places = parse_count(&self.min_size, DEFAULT_MIN_PLACES, id, "minSize");
        let occurrences = parse_count(
            &self.available_slots,
            DEFAULT_MAX_OCCURRENCES,
            id,
            "availableSlots",
        );

        let mut program = Program::new(id, self.display_name())
            .with_capacity(min_places, max_places)
            .with_max_occurrences(occurrences)
            .with_possible_slots(self.possible_slots());

        match self.continuation_slot() {
            Ok(Some(slot)) => program = program.with_continuation_slot(slot),
            Ok(None) => {}
            Err(raw) => warn!(program = id, value = %raw, "ignoring invalid continuation slot"),
        }
        Ok(program)
    }
}

/// One participant entry, keyed by participant id in the input map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Wished program ids, best first. Anything but a list counts as no
    /// wishes.
    #[serde(default)]
    pub prog: Value,
    /// Presence per slot.
    #[serde(default)]
    pub present: Vec<bool>,
}

impl ParticipantRecord {
    pub fn new(prog: Vec<ProgramId>, present: [bool; SLOT_COUNT]) -> Self {
        Self {
            prog: Value::from(prog),
            present: present.to_vec(),
        }
    }

    /// Presence mask; missing entries count as absent.
    pub fn availability(&self) -> [bool; SLOT_COUNT] {
        let mut available = [false; SLOT_COUNT];
        for (slot, &present) in self.present.iter().take(SLOT_COUNT).enumerate() {
            available[slot] = present;
        }
        available
    }

    /// Wished program ids; empty unless `prog` is a list. Entries that
    /// are not integers are skipped.
    pub fn wishes(&self) -> Vec<ProgramId> {
        match &self.prog {
            Value::Array(items) => items.iter().filter_map(parse_integer).collect(),
            _ => Vec::new(),
        }
    }
}

/// A `(program id, participant id)` pair pinning a facilitator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitatorLink(pub ProgramId, pub String);

impl FacilitatorLink {
    pub fn new(program: ProgramId, participant: impl Into<String>) -> Self {
        Self(program, participant.into())
    }

    pub fn program(&self) -> ProgramId {
        self.0
    }

    pub fn participant(&self) -> &str {
        &self.1
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Integer from a JSON number or numeric string.
pub(crate) fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_count(value: &Value, default: usize, program: ProgramId, field: &str) -> usize {
    match parse_integer(value).and_then(|n| usize::try_from(n).ok()) {
        Some(n) => n,
        None => {
            warn!(
                program,
                field,
                value = %value,
                default,
                "could not parse field, using default"
            );
            default
        }
    }
}

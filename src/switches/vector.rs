//! Switch vectors
//!
//! An 11-bit assignment over the planner's `enable_*` switches. Bit
//! semantics: 1 = OFF. Bit 10 (the MSB of the 11-bit value) maps to the
//! first switch in [`SWITCH_NAMES`], bit 0 to the last, so vector 0 is the
//! planner's default all-ON configuration and vector 2047 disables every
//! strategy at once.

use std::fmt;

use serde::Serialize;

/// Number of planner switches under sweep control
pub const SWITCH_COUNT: usize = 11;

/// Total number of switch assignments (2^11)
pub const VECTOR_COUNT: u16 = 1 << SWITCH_COUNT;

/// The fixed, ordered planner switch set (Postgres runtime GUCs)
pub const SWITCH_NAMES: [&str; SWITCH_COUNT] = [
    "enable_bitmapscan",
    "enable_hashagg",
    "enable_hashjoin",
    "enable_indexscan",
    "enable_indexonlyscan",
    "enable_material",
    "enable_mergejoin",
    "enable_nestloop",
    "enable_seqscan",
    "enable_sort",
    "enable_tidscan",
];

/// One ON/OFF assignment over the full switch set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SwitchVector(u16);

impl SwitchVector {
    /// Every switch enabled: the planner's default configuration
    pub const ALL_ON: SwitchVector = SwitchVector(0);

    /// Every switch disabled
    pub const ALL_OFF: SwitchVector = SwitchVector(VECTOR_COUNT - 1);

    /// Builds a vector from its 11-bit value; bits above bit 10 are cleared
    pub fn from_bits(bits: u16) -> Self {
        Self(bits & (VECTOR_COUNT - 1))
    }

    /// Returns the raw 11-bit value
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Produces all 2048 assignments in natural binary counting order.
    /// Deterministic and exhaustive; no randomness.
    pub fn enumerate() -> impl Iterator<Item = SwitchVector> {
        (0..VECTOR_COUNT).map(SwitchVector)
    }

    /// True when the switch at `position` (0 = first of [`SWITCH_NAMES`])
    /// is disabled by this vector
    pub fn is_off(self, position: usize) -> bool {
        let bit = SWITCH_COUNT - 1 - position;
        (self.0 >> bit) & 1 == 1
    }

    /// True when the switch at `position` is enabled
    pub fn is_on(self, position: usize) -> bool {
        !self.is_off(position)
    }

    /// The executable `SET` batch that applies this assignment
    pub fn statements(self) -> Vec<String> {
        SWITCH_NAMES
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let state = if self.is_off(position) { "OFF" } else { "ON" };
                format!("SET {} = {}", name, state)
            })
            .collect()
    }

    /// The restore-defaults batch: every switch back ON
    pub fn reset_statements() -> Vec<String> {
        Self::ALL_ON.statements()
    }

    /// Names of the switches this vector disables
    pub fn disabled(self) -> Vec<&'static str> {
        SWITCH_NAMES
            .iter()
            .enumerate()
            .filter(|(position, _)| self.is_off(*position))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Count of disabled switches
    pub fn disabled_count(self) -> u32 {
        self.0.count_ones()
    }
}

impl fmt::Display for SwitchVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:011b}", self.0)
    }
}

//! Scenario classifier and the compiled-in safe-sequence tables.
//!
//! Two resource types, each configured with one or two units, give four
//! scenarios.  Every scenario has exactly one safe order for the three
//! processes plus the LED patterns shown while the order is previewed.
//!
//! LED layout (one line per resource unit):
//! ```text
//! Bit 0: R1A   Bit 1: R1B   Bit 2: R2A   Bit 3: R2B
//! ```

use core::fmt;

/// Number of processes in every scenario.
pub const PROCESS_COUNT: usize = 3;

/// Number of LED lines (two units per resource type).
pub const LED_COUNT: usize = 4;

/// Configured unit count of one resource type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Units {
    #[default]
    One,
    Two,
}

impl Units {
    /// Flip between one and two units.
    pub const fn toggled(self) -> Self {
        match self {
            Units::One => Units::Two,
            Units::Two => Units::One,
        }
    }

    pub const fn count(self) -> u8 {
        match self {
            Units::One => 1,
            Units::Two => 2,
        }
    }
}

/// Configured totals for both resource types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resources {
    pub r1: Units,
    pub r2: Units,
}

impl Resources {
    pub const fn new(r1: Units, r2: Units) -> Self {
        Self { r1, r2 }
    }

    /// Scenario for the current totals. Never cached.
    pub const fn scenario(&self) -> Scenario {
        classify(self.r1, self.r2)
    }
}

/// One of the four table rows, named after the configured totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scenario {
    /// R1 = 2, R2 = 2.
    BothDouble,
    /// R1 = 2, R2 = 1.
    FirstDouble,
    /// R1 = 1, R2 = 2.
    SecondDouble,
    /// R1 = 1, R2 = 1.
    BothSingle,
}

/// Map the two resource totals to a scenario.
///
/// First match wins: both doubled, then R1 only, then R2 only.
pub const fn classify(r1: Units, r2: Units) -> Scenario {
    match (r1, r2) {
        (Units::Two, Units::Two) => Scenario::BothDouble,
        (Units::Two, Units::One) => Scenario::FirstDouble,
        (Units::One, Units::Two) => Scenario::SecondDouble,
        (Units::One, Units::One) => Scenario::BothSingle,
    }
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::BothDouble,
        Scenario::FirstDouble,
        Scenario::SecondDouble,
        Scenario::BothSingle,
    ];

    /// Row index into the tables (0..4).
    pub const fn index(self) -> usize {
        match self {
            Scenario::BothDouble => 0,
            Scenario::FirstDouble => 1,
            Scenario::SecondDouble => 2,
            Scenario::BothSingle => 3,
        }
    }

    /// The only order in which the processes finish without deadlock.
    pub const fn safe_order(self) -> [ProcessId; PROCESS_COUNT] {
        SAFE_ORDER[self.index()]
    }

    /// Pattern with every configured unit free.
    pub const fn full_availability(self) -> LedPattern {
        FULL_AVAILABILITY[self.index()]
    }

    /// Availability just before the process at `step` of the safe order
    /// claims its resources.  `step` must be below [`PROCESS_COUNT`].
    pub const fn before_claim(self, step: usize) -> LedPattern {
        BEFORE_CLAIM[self.index()][step]
    }

    /// Availability while the process at `step` holds its claim.
    pub const fn after_claim(self, step: usize) -> LedPattern {
        AFTER_CLAIM[self.index()][step]
    }
}

/// A logical process, P0 to P2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProcessId(u8);

impl ProcessId {
    pub const P0: ProcessId = ProcessId(0);
    pub const P1: ProcessId = ProcessId(1);
    pub const P2: ProcessId = ProcessId(2);

    /// Returns `None` for anything outside 0..3.
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < PROCESS_COUNT {
            Some(ProcessId(id))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Next process in the selection cycle, wrapping P2 back to P0.
    pub const fn next(self) -> Self {
        ProcessId((self.0 + 1) % PROCESS_COUNT as u8)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Availability of the four resource units, one bit per LED line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedPattern(u8);

impl LedPattern {
    /// Every line dark.
    pub const OFF: LedPattern = LedPattern(0);

    /// Build from per-line levels in R1A, R1B, R2A, R2B order.
    pub const fn from_levels(levels: [u8; LED_COUNT]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < LED_COUNT {
            if levels[i] != 0 {
                bits |= 1 << i;
            }
            i += 1;
        }
        LedPattern(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` when LED `line` (0..4) is lit.
    pub const fn is_lit(self, line: usize) -> bool {
        line < LED_COUNT && self.0 & (1 << line) != 0
    }

    /// Number of lit lines.
    pub const fn free_units(self) -> u32 {
        self.0.count_ones()
    }
}

const fn led(levels: [u8; LED_COUNT]) -> LedPattern {
    LedPattern::from_levels(levels)
}

const fn order(ids: [u8; PROCESS_COUNT]) -> [ProcessId; PROCESS_COUNT] {
    [ProcessId(ids[0]), ProcessId(ids[1]), ProcessId(ids[2])]
}

/// Safe order per scenario.
const SAFE_ORDER: [[ProcessId; PROCESS_COUNT]; 4] = [
    order([1, 0, 2]),
    order([2, 0, 1]),
    order([1, 2, 0]),
    order([0, 1, 2]),
];

/// "All resources free" pattern per scenario.
const FULL_AVAILABILITY: [LedPattern; 4] = [
    led([1, 1, 1, 1]),
    led([1, 1, 1, 0]),
    led([1, 0, 1, 1]),
    led([0, 1, 0, 1]),
];

const BEFORE_CLAIM: [[LedPattern; PROCESS_COUNT]; 4] = [
    [led([1, 1, 1, 1]), led([1, 1, 1, 1]), led([0, 1, 0, 1])],
    [led([1, 1, 1, 0]), led([1, 1, 1, 0]), led([1, 1, 1, 0])],
    [led([1, 0, 1, 1]), led([1, 0, 1, 1]), led([1, 0, 0, 1])],
    [led([0, 1, 0, 1]), led([0, 1, 0, 1]), led([0, 1, 0, 1])],
];

const AFTER_CLAIM: [[LedPattern; PROCESS_COUNT]; 4] = [
    [led([1, 1, 1, 1]), led([0, 1, 0, 1]), led([0, 1, 0, 1])],
    [led([1, 1, 1, 0]), led([1, 1, 1, 0]), led([0, 1, 1, 0])],
    [led([1, 0, 1, 1]), led([1, 0, 0, 1]), led([1, 0, 0, 1])],
    [led([0, 1, 0, 1]), led([0, 1, 0, 1]), led([0, 1, 0, 1])],
];

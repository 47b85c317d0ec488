//! The three fixed phases of a simulation step.

use std::fmt;

/// One of the three phases executed, in order, by every simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Runs before all updates.
    Systole,
    /// The main update.
    Update,
    /// Runs after all updates (recording, bookkeeping).
    Diastole,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 3] = [Phase::Systole, Phase::Update, Phase::Diastole];

    /// Lower-case phase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Systole => "systole",
            Self::Update => "update",
            Self::Diastole => "diastole",
        }
    }

    /// Position of this phase in [`Phase::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Systole => 0,
            Self::Update => 1,
            Self::Diastole => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

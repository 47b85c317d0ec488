//! Per-step metrics for the phase scheduler.
//!
//! [`UpdateMetrics`] captures timing and hook counts for one completed
//! `Simulation::update()` call.

use simobject_core::Phase;

/// Counters for one phase of one step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseMetrics {
    /// Entries in the phase's order list.
    pub entries: usize,
    /// Entries whose quantity had a hook for this phase.
    pub hooks_invoked: usize,
    /// Wall-clock time for the phase, in microseconds.
    pub elapsed_us: u64,
}

/// Timing and hook counts collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateMetrics {
    /// Step number (1 for the first completed step).
    pub step: u64,
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Systole phase counters.
    pub systole: PhaseMetrics,
    /// Update phase counters.
    pub update: PhaseMetrics,
    /// Diastole phase counters.
    pub diastole: PhaseMetrics,
}

impl UpdateMetrics {
    /// Counters for `phase`.
    pub fn phase(&self, phase: Phase) -> &PhaseMetrics {
        match phase {
            Phase::Systole => &self.systole,
            Phase::Update => &self.update,
            Phase::Diastole => &self.diastole,
        }
    }

    pub(crate) fn phase_mut(&mut self, phase: Phase) -> &mut PhaseMetrics {
        match phase {
            Phase::Systole => &mut self.systole,
            Phase::Update => &mut self.update,
            Phase::Diastole => &mut self.diastole,
        }
    }

    /// Hooks invoked across all phases.
    pub fn hooks_invoked(&self) -> usize {
        Phase::ALL
            .iter()
            .map(|&p| self.phase(p).hooks_invoked)
            .sum()
    }
}

//! Simulation container and phase scheduler for simobject.
//!
//! [`Simulation`] stores named quantities and three per-phase order lists,
//! and runs steps of systole, update and diastole hooks in that order.
//! [`UpdateMetrics`] reports timing and hook counts for the last step.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod metrics;
pub mod order;
pub mod simulation;

pub use metrics::{PhaseMetrics, UpdateMetrics};
pub use order::PhaseOrders;
pub use simulation::Simulation;

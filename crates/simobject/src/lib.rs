//! simobject: named array quantities advanced by a three-phase scheduler.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the simobject sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use simobject::prelude::*;
//!
//! fn advance_time(t: &mut Quantity) -> HookResult {
//!     let dt = t.try_owner()?.value("dt")?;
//!     *t += &dt;
//!     Ok(())
//! }
//!
//! let mut sim = Simulation::new();
//! sim.add_quantity_with("dt", 0.5, QuantityOptions::new().constant(true));
//! sim.add_quantity_with(
//!     "time",
//!     0.0,
//!     QuantityOptions::new().info("simulation time [s]").updater(advance_time),
//! );
//! sim.set_update_order(["time"]);
//!
//! sim.update().unwrap();
//! sim.update().unwrap();
//! assert_eq!(sim.value("time").unwrap().scalar(), Some(1.0));
//! assert_eq!(sim.steps(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `simobject-core` | `Quantity`, `Updater`, `Registry`, errors |
//! | [`engine`] | `simobject-engine` | `Simulation`, phase orders, step metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Quantities, hooks, the registry and error types (`simobject-core`).
///
/// Also re-exports [`ndarray`](types::ndarray) for building payloads.
pub use simobject_core as types;

/// The simulation container and step scheduler (`simobject-engine`).
pub use simobject_engine as engine;

/// Common imports for typical simobject usage.
///
/// ```rust
/// use simobject::prelude::*;
/// ```
pub mod prelude {
    // Quantities and hooks
    pub use simobject_core::{
        HookResult, IntoUpdater, Owner, Phase, Quantity, QuantityOptions, Updater, Value,
    };

    // Errors
    pub use simobject_core::SimError;

    // Engine
    pub use simobject_engine::{PhaseOrders, Simulation, UpdateMetrics};
}

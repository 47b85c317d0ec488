//! Core types for the simobject simulation runtime.
//!
//! This is the leaf crate of the workspace. It defines the [`Quantity`]
//! (an n-dimensional array with identity metadata and three phase hooks),
//! the [`Updater`] hook wrapper, the [`Registry`] of named quantities with
//! its weak [`Owner`] back-reference, and the shared [`SimError`] type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ops;
pub mod phase;
pub mod quantity;
pub mod registry;
pub mod updater;
pub mod value;

pub use error::{HookResult, SimError};
pub use phase::Phase;
pub use quantity::{Payload, Quantity, QuantityOptions};
pub use registry::{Owner, Registry, SharedQuantity};
pub use updater::{IntoUpdater, Updater};
pub use value::Value;

/// Re-export of the array library used for payloads.
pub use ndarray;

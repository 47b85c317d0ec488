//! Error types for the simobject simulation runtime.
//!
//! A single enum covers quantity construction, in-place mutation, registry
//! lookup and container attribute assignment. Hooks return the same type,
//! so a failure raised inside a hook reaches the caller of
//! `Simulation::update()` unchanged.

use std::error::Error;
use std::fmt;

/// Result type returned by hook functions.
pub type HookResult = Result<(), SimError>;

/// Errors raised by quantities, updaters and the container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// A hook slot was given a value that is neither empty nor an updater.
    Construction {
        /// Kind of the rejected value (e.g. `"number"`).
        found: &'static str,
    },
    /// `setvalue` was called on a constant quantity.
    Constant {
        /// Info label of the constant quantity, if any.
        info: Option<String>,
    },
    /// A name is not registered in the container.
    NotFound {
        /// The name that failed to resolve.
        name: String,
    },
    /// An order list was assigned something other than a list of strings.
    OrderType {
        /// Description of the offending value.
        reason: String,
    },
    /// A non-quantity value was assigned to a name the container does not
    /// define as one of its own attributes.
    AttributeShadow {
        /// The attribute name that was rejected.
        name: String,
    },
    /// A replacement payload cannot be broadcast to the quantity's shape.
    ShapeMismatch {
        /// Shape of the quantity being written.
        expected: Vec<usize>,
        /// Shape of the rejected payload.
        found: Vec<usize>,
    },
    /// The quantity has no owning container.
    Unowned,
    /// The owning container has already been dropped.
    OwnerDropped,
    /// The quantity is already mutably borrowed, typically because its own
    /// hook is running and tried to read it back through the owner.
    Borrowed {
        /// Name of the busy quantity.
        name: String,
    },
    /// A hook reported a failure of its own.
    HookFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl SimError {
    /// Convenience constructor for hook authors.
    pub fn hook(reason: impl Into<String>) -> Self {
        Self::HookFailed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construction { found } => write!(
                f,
                "hook must be empty, a function, or an Updater (got {found})"
            ),
            Self::Constant { info: Some(info) } => write!(f, "quantity '{info}' is constant"),
            Self::Constant { info: None } => write!(f, "quantity is constant"),
            Self::NotFound { name } => write!(f, "no quantity named '{name}'"),
            Self::OrderType { reason } => write!(f, "invalid order list: {reason}"),
            Self::AttributeShadow { name } => write!(
                f,
                "attribute '{name}' assigned to simulation must be a Quantity"
            ),
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "cannot broadcast payload of shape {found:?} to {expected:?}"
            ),
            Self::Unowned => write!(f, "quantity has no owner"),
            Self::OwnerDropped => write!(f, "owning simulation has been dropped"),
            Self::Borrowed { name } => write!(f, "quantity '{name}' is already borrowed"),
            Self::HookFailed { reason } => write!(f, "hook failed: {reason}"),
        }
    }
}

impl Error for SimError {}

//! Dynamically typed values for hook slots and container attributes.

use crate::quantity::Quantity;
use crate::updater::Updater;

/// A value whose type is only known at runtime.
///
/// Used where the container or a hook slot has to reject ill-typed input
/// (`Simulation::assign`, [`Quantity::assign_hook`]). Statically typed code
/// normally uses the typed setters instead.
#[derive(Clone, Debug)]
pub enum Value {
    /// Absent.
    None,
    /// A boolean.
    Bool(bool),
    /// A plain number.
    Number(f64),
    /// A string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A hook.
    Updater(Updater),
    /// A quantity.
    Quantity(Quantity),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Updater(_) => "updater",
            Self::Quantity(_) => "quantity",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Updater> for Value {
    fn from(v: Updater) -> Self {
        Self::Updater(v)
    }
}

impl From<Quantity> for Value {
    fn from(v: Quantity) -> Self {
        Self::Quantity(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

//! The [`Updater`] hook wrapper and the [`IntoUpdater`] normalization trait.
//!
//! An updater wraps a single-argument mutation callback. The callback always
//! receives the quantity whose hook slot triggered the call, and may mutate
//! it in place. Updaters are cheap to clone: clones share the same callback,
//! so copying a quantity preserves the *identity* of its hooks
//! (see [`Updater::ptr_eq`]).

use std::fmt;
use std::rc::Rc;

use crate::error::{HookResult, SimError};
use crate::quantity::Quantity;
use crate::value::Value;

type HookFn = dyn Fn(&mut Quantity) -> HookResult;

/// A shared, immutable hook around a `Fn(&mut Quantity) -> HookResult`.
///
/// # Examples
///
/// ```
/// use simobject_core::{Quantity, Updater};
///
/// let double = Updater::named("double", |q: &mut Quantity| {
///     *q *= 2.0;
///     Ok(())
/// });
/// let mut q = Quantity::new(vec![1.0, 2.0]);
/// double.invoke(&mut q).unwrap();
/// assert_eq!(q.data().as_slice().unwrap(), &[2.0, 4.0]);
/// ```
#[derive(Clone)]
pub struct Updater {
    func: Rc<HookFn>,
    label: Option<Rc<str>>,
}

impl Updater {
    /// Wrap `func` in an unlabelled updater.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut Quantity) -> HookResult + 'static,
    {
        Self {
            func: Rc::new(func),
            label: None,
        }
    }

    /// Wrap `func` with a label used in logs and `Debug` output.
    pub fn named<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Quantity) -> HookResult + 'static,
    {
        Self {
            func: Rc::new(func),
            label: Some(Rc::from(label.into())),
        }
    }

    /// The label given at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Call the wrapped function on `target`. Errors pass through untouched.
    pub fn invoke(&self, target: &mut Quantity) -> HookResult {
        (self.func)(target)
    }

    /// Whether `a` and `b` share the same underlying callback.
    pub fn ptr_eq(a: &Updater, b: &Updater) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&a.func), Rc::as_ptr(&b.func))
    }

    /// Apply the hook-slot rule to a dynamically typed value.
    ///
    /// `Value::None` yields an empty slot and `Value::Updater` passes through;
    /// anything else is a [`SimError::Construction`].
    pub fn from_value(value: Value) -> Result<Option<Updater>, SimError> {
        match value {
            Value::None => Ok(None),
            Value::Updater(updater) => Ok(Some(updater)),
            other => Err(SimError::Construction {
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater")
            .field("label", &self.label())
            .field("func", &Rc::as_ptr(&self.func).cast::<()>())
            .finish()
    }
}

/// Anything that can fill a hook slot: an existing [`Updater`] (passed
/// through, identity preserved) or a plain function (wrapped in a fresh one).
pub trait IntoUpdater {
    /// Normalize into an updater.
    fn into_updater(self) -> Updater;
}

impl IntoUpdater for Updater {
    fn into_updater(self) -> Updater {
        self
    }
}

impl IntoUpdater for &Updater {
    fn into_updater(self) -> Updater {
        self.clone()
    }
}

impl<F> IntoUpdater for F
where
    F: Fn(&mut Quantity) -> HookResult + 'static,
{
    fn into_updater(self) -> Updater {
        Updater::new(self)
    }
}

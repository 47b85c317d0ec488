//! Named quantity storage and the non-owning [`Owner`] back-reference.
//!
//! The container owns a [`Registry`] behind an `Rc`; every quantity it holds
//! carries an [`Owner`], which is only a `Weak` pointer to that registry.
//! Ownership therefore runs strictly container → quantity and never forms a
//! reference cycle. Hooks reach sibling quantities through their owner
//! (e.g. `time.try_owner()?.value("dt")?`).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::error::SimError;
use crate::quantity::Quantity;

/// A registered quantity, shared between the registry and its users.
pub type SharedQuantity = Rc<RefCell<Quantity>>;

/// Name → quantity map owned by one container.
///
/// Uses interior mutability so that hooks holding an [`Owner`] can resolve
/// names while the container is executing a phase.
#[derive(Default)]
pub struct Registry {
    quantities: RefCell<IndexMap<String, SharedQuantity>>,
}

impl Registry {
    /// A new, empty registry behind an `Rc`.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A back-reference to this registry.
    pub fn owner(self: &Rc<Self>) -> Owner {
        Owner {
            registry: Rc::downgrade(self),
        }
    }

    /// Store `quantity` under `name`, replacing any previous entry.
    pub fn insert(&self, name: impl Into<String>, quantity: Quantity) -> SharedQuantity {
        let shared = Rc::new(RefCell::new(quantity));
        self.quantities
            .borrow_mut()
            .insert(name.into(), Rc::clone(&shared));
        shared
    }

    /// Resolve `name`.
    pub fn get(&self, name: &str) -> Result<SharedQuantity, SimError> {
        self.quantities
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Remove `name`, returning the quantity it held.
    pub fn remove(&self, name: &str) -> Option<SharedQuantity> {
        self.quantities.borrow_mut().shift_remove(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.quantities.borrow().contains_key(name)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.quantities.borrow().keys().cloned().collect()
    }

    /// Number of registered quantities.
    pub fn len(&self) -> usize {
        self.quantities.borrow().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.quantities.borrow().is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .finish()
    }
}

/// Weak back-reference from a quantity to its container's registry.
///
/// Two owners compare equal when they point at the same registry.
#[derive(Clone)]
pub struct Owner {
    registry: Weak<Registry>,
}

impl Owner {
    fn upgrade(&self) -> Result<Rc<Registry>, SimError> {
        self.registry.upgrade().ok_or(SimError::OwnerDropped)
    }

    /// Whether the owning container is still alive.
    pub fn is_alive(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Resolve a sibling quantity by name.
    ///
    /// The handle is not borrow-checked: calling `borrow_mut()` on the
    /// quantity whose hook is running panics. Use [`with_mut`](Self::with_mut)
    /// to mutate a sibling from inside a hook.
    pub fn get(&self, name: &str) -> Result<SharedQuantity, SimError> {
        self.upgrade()?.get(name)
    }

    /// Run `f` on a mutable borrow of a sibling quantity.
    ///
    /// Fails with [`SimError::Borrowed`] if that quantity is currently being
    /// updated, including the hook's own quantity.
    pub fn with_mut<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Quantity) -> R,
    ) -> Result<R, SimError> {
        let shared = self.get(name)?;
        let mut quantity = shared.try_borrow_mut().map_err(|_| SimError::Borrowed {
            name: name.to_owned(),
        })?;
        Ok(f(&mut quantity))
    }

    /// A copy of a sibling quantity.
    ///
    /// Fails with [`SimError::Borrowed`] if that quantity is currently being
    /// updated, which includes a hook asking for its own quantity.
    pub fn value(&self, name: &str) -> Result<Quantity, SimError> {
        let shared = self.get(name)?;
        let quantity = shared.try_borrow().map_err(|_| SimError::Borrowed {
            name: name.to_owned(),
        })?;
        Ok(quantity.clone())
    }

    /// Whether both owners refer to the same container.
    pub fn ptr_eq(&self, other: &Owner) -> bool {
        Weak::ptr_eq(&self.registry, &other.registry)
    }
}

impl PartialEq for Owner {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Owner {}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner")
            .field("registry", &self.registry.as_ptr())
            .field("alive", &self.is_alive())
            .finish()
    }
}

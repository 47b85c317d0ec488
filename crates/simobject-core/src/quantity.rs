//! The [`Quantity`] type: an n-dimensional array with identity metadata.
//!
//! A quantity pairs an `ndarray::ArrayD<f64>` payload with an optional info
//! label, a non-owning back-reference to its container ([`Owner`]), a
//! constancy flag and three independent hook slots, one per [`Phase`].
//!
//! # Metadata inheritance
//!
//! Any quantity built from another quantity (by [`Quantity::with_options`],
//! arithmetic, or slicing) starts with a copy of the source's info, owner,
//! constancy and hooks. Explicit [`QuantityOptions`] then override per field;
//! an absent option never clears an inherited value.

use std::fmt;

use ndarray::{arr0, Array, ArrayD, Dimension, IxDyn, SliceArg};

use crate::error::{HookResult, SimError};
use crate::phase::Phase;
use crate::registry::Owner;
use crate::updater::{IntoUpdater, Updater};
use crate::value::Value;

// ── Payload ────────────────────────────────────────────────────────

/// Input accepted wherever a quantity is constructed.
///
/// A bare array carries no metadata; a quantity carries its own, which the
/// constructed value inherits.
#[derive(Clone, Debug)]
pub enum Payload {
    /// A plain array.
    Array(ArrayD<f64>),
    /// An existing quantity whose metadata is inherited.
    Quantity(Quantity),
}

impl Payload {
    /// The array part of the payload, discarding any metadata.
    pub fn into_array(self) -> ArrayD<f64> {
        match self {
            Self::Array(data) => data,
            Self::Quantity(q) => q.data,
        }
    }
}

impl From<f64> for Payload {
    fn from(v: f64) -> Self {
        Self::Array(arr0(v).into_dyn())
    }
}

impl From<Vec<f64>> for Payload {
    fn from(v: Vec<f64>) -> Self {
        Self::Array(Array::from_vec(v).into_dyn())
    }
}

impl From<&[f64]> for Payload {
    fn from(v: &[f64]) -> Self {
        Self::from(v.to_vec())
    }
}

impl<D: Dimension> From<Array<f64, D>> for Payload {
    fn from(v: Array<f64, D>) -> Self {
        Self::Array(v.into_dyn())
    }
}

impl From<Quantity> for Payload {
    fn from(v: Quantity) -> Self {
        Self::Quantity(v)
    }
}

impl From<&Quantity> for Payload {
    fn from(v: &Quantity) -> Self {
        Self::Quantity(v.clone())
    }
}

// ── QuantityOptions ────────────────────────────────────────────────

/// Per-field overrides applied on top of inherited metadata.
///
/// Every field defaults to `None`, meaning "keep what the payload carries"
/// (or the bare default: no info, no owner, not constant, no hooks).
#[derive(Clone, Debug, Default)]
pub struct QuantityOptions {
    /// Human-readable label. An empty string counts as absent.
    pub info: Option<String>,
    /// Owning container.
    pub owner: Option<Owner>,
    /// Hook for [`Phase::Update`].
    pub updater: Option<Updater>,
    /// Hook for [`Phase::Systole`].
    pub systoler: Option<Updater>,
    /// Hook for [`Phase::Diastole`].
    pub diastoler: Option<Updater>,
    /// Constancy. `Some(false)` clears an inherited constant flag.
    pub constant: Option<bool>,
}

impl QuantityOptions {
    /// Options with every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the info label.
    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Set the owner.
    pub fn owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the constancy flag explicitly.
    pub fn constant(mut self, constant: bool) -> Self {
        self.constant = Some(constant);
        self
    }

    /// Set the update hook.
    pub fn updater(self, hook: impl IntoUpdater) -> Self {
        self.hook(Phase::Update, hook)
    }

    /// Set the systole hook.
    pub fn systoler(self, hook: impl IntoUpdater) -> Self {
        self.hook(Phase::Systole, hook)
    }

    /// Set the diastole hook.
    pub fn diastoler(self, hook: impl IntoUpdater) -> Self {
        self.hook(Phase::Diastole, hook)
    }

    /// Set the hook for `phase`.
    pub fn hook(mut self, phase: Phase, hook: impl IntoUpdater) -> Self {
        let hook = Some(hook.into_updater());
        match phase {
            Phase::Systole => self.systoler = hook,
            Phase::Update => self.updater = hook,
            Phase::Diastole => self.diastoler = hook,
        }
        self
    }
}

// ── Quantity ───────────────────────────────────────────────────────

/// A numeric array with info, owner, constancy and three phase hooks.
#[derive(Clone)]
pub struct Quantity {
    pub(crate) data: ArrayD<f64>,
    info: Option<String>,
    owner: Option<Owner>,
    constant: bool,
    hooks: [Option<Updater>; 3],
}

impl Quantity {
    /// Build a quantity from `payload` with no overrides.
    ///
    /// A bare payload yields no info, no owner, `constant == false` and no
    /// hooks; a quantity payload yields a copy with identical metadata.
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self::with_options(payload, QuantityOptions::default())
    }

    /// Build a quantity from `payload`, then apply `options` field by field.
    pub fn with_options(payload: impl Into<Payload>, options: QuantityOptions) -> Self {
        let mut q = match payload.into() {
            Payload::Array(data) => Self::bare(data),
            Payload::Quantity(q) => q,
        };
        if let Some(info) = options.info.filter(|s| !s.is_empty()) {
            q.info = Some(info);
        }
        if let Some(owner) = options.owner {
            q.owner = Some(owner);
        }
        if let Some(constant) = options.constant {
            q.constant = constant;
        }
        for (phase, hook) in [
            (Phase::Systole, options.systoler),
            (Phase::Update, options.updater),
            (Phase::Diastole, options.diastoler),
        ] {
            if hook.is_some() {
                q.hooks[phase.index()] = hook;
            }
        }
        q
    }

    fn bare(data: ArrayD<f64>) -> Self {
        Self {
            data,
            info: None,
            owner: None,
            constant: false,
            hooks: [None, None, None],
        }
    }

    /// A new quantity holding `data` and a copy of this quantity's metadata.
    pub fn derive(&self, data: ArrayD<f64>) -> Self {
        Self {
            data,
            info: self.info.clone(),
            owner: self.owner.clone(),
            constant: self.constant,
            hooks: self.hooks.clone(),
        }
    }

    /// Elementwise map into a derived quantity.
    pub fn map(&self, f: impl FnMut(f64) -> f64) -> Self {
        self.derive(self.data.mapv(f))
    }

    /// Slice into a derived quantity, e.g. `q.slice(s![1..3])`.
    pub fn slice<I: SliceArg<IxDyn>>(&self, info: I) -> Self {
        self.derive(self.data.slice(info).to_owned().into_dyn())
    }

    // ── payload ────────────────────────────────────────────────────

    /// The array payload.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Shape of the payload.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload has zero elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `index`, or `None` if out of bounds.
    pub fn at(&self, index: &[usize]) -> Option<f64> {
        self.data.get(index).copied()
    }

    /// The single value of a one-element payload.
    pub fn scalar(&self) -> Option<f64> {
        if self.data.len() == 1 {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// Replace the payload in place, keeping identity and metadata.
    ///
    /// The new payload is broadcast to the current shape. Fails with
    /// [`SimError::Constant`] on a constant quantity (leaving the payload
    /// untouched) and [`SimError::ShapeMismatch`] if broadcasting fails.
    pub fn setvalue(&mut self, payload: impl Into<Payload>) -> Result<(), SimError> {
        if self.constant {
            return Err(SimError::Constant {
                info: self.info.clone(),
            });
        }
        let new = payload.into().into_array();
        let view = new
            .broadcast(self.data.raw_dim())
            .ok_or_else(|| SimError::ShapeMismatch {
                expected: self.data.shape().to_vec(),
                found: new.shape().to_vec(),
            })?;
        self.data.assign(&view);
        Ok(())
    }

    // ── metadata ───────────────────────────────────────────────────

    /// The info label.
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// The owning container, if registered.
    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    /// The owning container, or [`SimError::Unowned`].
    pub fn try_owner(&self) -> Result<&Owner, SimError> {
        self.owner.as_ref().ok_or(SimError::Unowned)
    }

    /// Whether in-place replacement via [`setvalue`](Self::setvalue) is disabled.
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    // ── hooks ──────────────────────────────────────────────────────

    /// Hook for `phase`.
    pub fn hook(&self, phase: Phase) -> Option<&Updater> {
        self.hooks[phase.index()].as_ref()
    }

    /// Update hook.
    pub fn updater(&self) -> Option<&Updater> {
        self.hook(Phase::Update)
    }

    /// Systole hook.
    pub fn systoler(&self) -> Option<&Updater> {
        self.hook(Phase::Systole)
    }

    /// Diastole hook.
    pub fn diastoler(&self) -> Option<&Updater> {
        self.hook(Phase::Diastole)
    }

    /// Replace the hook for `phase`. Plain functions are wrapped in a fresh
    /// [`Updater`]; an existing updater is stored as is.
    pub fn set_hook(&mut self, phase: Phase, hook: impl IntoUpdater) {
        self.hooks[phase.index()] = Some(hook.into_updater());
    }

    /// Replace the update hook.
    pub fn set_updater(&mut self, hook: impl IntoUpdater) {
        self.set_hook(Phase::Update, hook);
    }

    /// Replace the systole hook.
    pub fn set_systoler(&mut self, hook: impl IntoUpdater) {
        self.set_hook(Phase::Systole, hook);
    }

    /// Replace the diastole hook.
    pub fn set_diastoler(&mut self, hook: impl IntoUpdater) {
        self.set_hook(Phase::Diastole, hook);
    }

    /// Empty the hook slot for `phase`, returning what it held.
    pub fn clear_hook(&mut self, phase: Phase) -> Option<Updater> {
        self.hooks[phase.index()].take()
    }

    /// Empty the update slot.
    pub fn clear_updater(&mut self) -> Option<Updater> {
        self.clear_hook(Phase::Update)
    }

    /// Empty the systole slot.
    pub fn clear_systoler(&mut self) -> Option<Updater> {
        self.clear_hook(Phase::Systole)
    }

    /// Empty the diastole slot.
    pub fn clear_diastoler(&mut self) -> Option<Updater> {
        self.clear_hook(Phase::Diastole)
    }

    /// Assign a hook slot from a dynamically typed value.
    ///
    /// See [`Updater::from_value`] for the accepted values. On error the slot
    /// keeps its previous hook.
    pub fn assign_hook(&mut self, phase: Phase, value: Value) -> Result<(), SimError> {
        self.hooks[phase.index()] = Updater::from_value(value)?;
        Ok(())
    }

    /// Invoke the hook for `phase` on `self`, if one is set.
    pub fn run(&mut self, phase: Phase) -> HookResult {
        // Cloned so the hook can borrow `self` mutably.
        match self.hooks[phase.index()].clone() {
            Some(hook) => hook.invoke(self),
            None => Ok(()),
        }
    }

    /// Run the systole hook.
    pub fn systole(&mut self) -> HookResult {
        self.run(Phase::Systole)
    }

    /// Run the update hook.
    pub fn update(&mut self) -> HookResult {
        self.run(Phase::Update)
    }

    /// Run the diastole hook.
    pub fn diastole(&mut self) -> HookResult {
        self.run(Phase::Diastole)
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("data", &self.data)
            .field("info", &self.info)
            .field("owner", &self.owner)
            .field("constant", &self.constant)
            .field("systoler", &self.systoler())
            .field("updater", &self.updater())
            .field("diastoler", &self.diastoler())
            .finish()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constant {
            write!(f, "Constant ")?;
        }
        if let Some(info) = &self.info {
            write!(f, "{info}: ")?;
        }
        write!(f, "{}", self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn noop() -> Updater {
        Updater::named("noop", |_: &mut Quantity| Ok(()))
    }

    #[test]
    fn bare_payload_has_no_metadata() {
        let q = Quantity::new(5.0);
        assert_eq!(q.info(), None);
        assert!(q.owner().is_none());
        assert!(!q.is_constant());
        for phase in Phase::ALL {
            assert!(q.hook(phase).is_none());
        }
        assert_eq!(q.shape(), &[] as &[usize]);
        assert_eq!(q.scalar(), Some(5.0));
    }

    #[test]
    fn copy_inherits_everything() {
        let u = noop();
        let a = Quantity::with_options(
            5.0,
            QuantityOptions::new()
                .info("a")
                .updater(&u)
                .diastoler(&u)
                .constant(true),
        );
        let b = Quantity::new(&a);
        assert_eq!(b.info(), Some("a"));
        assert!(b.is_constant());
        assert!(Updater::ptr_eq(b.updater().unwrap(), &u));
        assert!(Updater::ptr_eq(b.diastoler().unwrap(), &u));
        assert!(b.systoler().is_none());
    }

    #[test]
    fn copy_keeps_owner_unless_overridden() {
        let first = Registry::shared();
        let second = Registry::shared();
        let p = Quantity::with_options(1.0, QuantityOptions::new().owner(first.owner()));
        assert_eq!(Quantity::new(&p).owner(), Some(&first.owner()));
        assert_eq!(p.map(|x| x + 1.0).owner(), Some(&first.owner()));

        let moved = Quantity::with_options(&p, QuantityOptions::new().owner(second.owner()));
        assert_eq!(moved.owner(), Some(&second.owner()));
        assert_eq!(p.owner(), Some(&first.owner()));
    }

    #[test]
    fn overrides_win_but_absent_never_clobbers() {
        let a = Quantity::with_options(vec![1.0, 2.0], QuantityOptions::new().info("a"));
        let b = Quantity::with_options(&a, QuantityOptions::new().info(""));
        assert_eq!(b.info(), Some("a"));
        let c = Quantity::with_options(&a, QuantityOptions::new().info("c"));
        assert_eq!(c.info(), Some("c"));
    }

    #[test]
    fn explicit_false_clears_constant() {
        let a = Quantity::with_options(vec![5.0, 6.0, 7.0], QuantityOptions::new().constant(true));
        let b = Quantity::with_options(&a / 2.0, QuantityOptions::new().constant(false));
        assert!(!b.is_constant());
        assert!(a.is_constant());
    }

    #[test]
    fn hook_override_replaces_inherited_slot() {
        let first = noop();
        let second = noop();
        let a = Quantity::with_options(0.0, QuantityOptions::new().updater(&first));
        let b = Quantity::with_options(&a, QuantityOptions::new().updater(&second));
        assert!(Updater::ptr_eq(b.updater().unwrap(), &second));
        assert!(Updater::ptr_eq(a.updater().unwrap(), &first));
    }

    #[test]
    fn setvalue_replaces_in_place() {
        let mut q = Quantity::with_options(vec![1.0, 2.0, 3.0], QuantityOptions::new().info("x"));
        q.setvalue(vec![4.0, 5.0, 6.0]).unwrap();
        assert_eq!(q.data().as_slice().unwrap(), &[4.0, 5.0, 6.0]);
        assert_eq!(q.info(), Some("x"));

        q.setvalue(0.5).unwrap();
        assert_eq!(q.data().as_slice().unwrap(), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn setvalue_on_constant_fails_without_mutating() {
        let mut q = Quantity::with_options(vec![1.0, 2.0], QuantityOptions::new().constant(true));
        assert_eq!(
            q.setvalue(vec![9.0, 9.0]),
            Err(SimError::Constant { info: None })
        );
        assert_eq!(q.data().as_slice().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn setvalue_rejects_unbroadcastable_shape() {
        let mut q = Quantity::new(vec![1.0, 2.0]);
        assert_eq!(
            q.setvalue(vec![1.0, 2.0, 3.0]),
            Err(SimError::ShapeMismatch {
                expected: vec![2],
                found: vec![3],
            })
        );
    }

    #[test]
    fn phase_methods_are_independent() {
        let mut q = Quantity::with_options(
            1.0,
            QuantityOptions::new().updater(|q: &mut Quantity| -> HookResult {
                *q *= 10.0;
                Ok(())
            }),
        );
        q.systole().unwrap();
        q.diastole().unwrap();
        assert_eq!(q.scalar(), Some(1.0));
        q.update().unwrap();
        assert_eq!(q.scalar(), Some(10.0));
    }

    #[test]
    fn hook_can_call_setvalue_on_itself() {
        let mut q = Quantity::with_options(
            vec![1.0, 2.0],
            QuantityOptions::new().updater(|q: &mut Quantity| -> HookResult {
                let doubled = &*q * 2.0;
                q.setvalue(doubled)
            }),
        );
        q.update().unwrap();
        assert_eq!(q.data().as_slice().unwrap(), &[2.0, 4.0]);
    }

    #[test]
    fn assign_hook_rejects_non_hooks_and_keeps_slot() {
        let u = noop();
        let mut q = Quantity::with_options(0.0, QuantityOptions::new().systoler(&u));
        assert_eq!(
            q.assign_hook(Phase::Systole, Value::Bool(true)),
            Err(SimError::Construction { found: "bool" })
        );
        assert!(Updater::ptr_eq(q.systoler().unwrap(), &u));

        q.assign_hook(Phase::Systole, Value::None).unwrap();
        assert!(q.systoler().is_none());
    }

    #[test]
    fn clear_hook_returns_previous() {
        let mut q = Quantity::new(0.0);
        q.set_diastoler(noop());
        assert!(q.clear_hook(Phase::Diastole).is_some());
        assert!(q.diastoler().is_none());
        assert!(q.clear_hook(Phase::Diastole).is_none());

        q.set_updater(noop());
        q.set_systoler(noop());
        assert!(q.clear_updater().is_some());
        assert!(q.clear_systoler().is_some());
        assert!(q.clear_diastoler().is_none());
        assert!(Phase::ALL.iter().all(|&p| q.hook(p).is_none()));
    }

    #[test]
    fn at_and_scalar() {
        let q = Quantity::new(vec![3.0, 4.0]);
        assert_eq!(q.at(&[1]), Some(4.0));
        assert_eq!(q.at(&[2]), None);
        assert_eq!(q.scalar(), None);
        assert_eq!(Quantity::new(vec![7.0]).scalar(), Some(7.0));
    }

    #[test]
    fn display_marks_constant_and_info() {
        let q = Quantity::with_options(1.0, QuantityOptions::new().info("dt").constant(true));
        assert!(q.to_string().starts_with("Constant dt: "));
        assert_eq!(Quantity::new(1.0).to_string(), "1");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_values() -> impl Strategy<Value = Vec<f64>> {
            prop::collection::vec(-1.0e6f64..1.0e6, 1..16)
        }

        proptest! {
            #[test]
            fn copy_preserves_metadata(
                values in arb_values(),
                constant in any::<bool>(),
                info in "[a-z]{1,8}",
            ) {
                let u = Updater::new(|_: &mut Quantity| Ok(()));
                let reg = Registry::shared();
                let p = Quantity::with_options(
                    values.clone(),
                    QuantityOptions::new()
                        .info(info.clone())
                        .owner(reg.owner())
                        .constant(constant)
                        .systoler(&u),
                );
                let q = Quantity::new(&p);
                let owner = reg.owner();
                prop_assert_eq!(q.owner(), Some(&owner));
                prop_assert_eq!(q.info(), Some(info.as_str()));
                prop_assert_eq!(q.is_constant(), constant);
                prop_assert!(Updater::ptr_eq(q.systoler().unwrap(), &u));
                prop_assert_eq!(q.data().as_slice().unwrap(), values.as_slice());
            }

            #[test]
            fn arithmetic_keeps_constant(values in arb_values(), k in -100.0f64..100.0) {
                let p = Quantity::with_options(values, QuantityOptions::new().constant(true));
                prop_assert!((&p + k).is_constant());
                prop_assert!((&p * k).is_constant());
                prop_assert!((k - &p).is_constant());
                prop_assert!((-&p).is_constant());
            }

            #[test]
            fn explicit_non_constant_always_wins(values in arb_values(), constant in any::<bool>()) {
                let p = Quantity::with_options(values, QuantityOptions::new().constant(constant));
                let q = Quantity::with_options(&p / 3.0, QuantityOptions::new().constant(false));
                prop_assert!(!q.is_constant());
            }

            #[test]
            fn constant_setvalue_never_mutates(values in arb_values(), replacement in -5.0f64..5.0) {
                let mut q = Quantity::with_options(values.clone(), QuantityOptions::new().constant(true));
                prop_assert!(q.setvalue(replacement).is_err());
                prop_assert_eq!(q.data().as_slice().unwrap(), values.as_slice());
            }
        }
    }
}

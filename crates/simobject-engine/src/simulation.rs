//! The [`Simulation`] container and its three-phase scheduler.
//!
//! A simulation owns a registry of named quantities and three order lists.
//! [`Simulation::update`] runs one step: every systole hook in
//! systole-order, then every update hook in update-order, then every
//! diastole hook in diastole-order. Phases never interleave.
//!
//! # Failure
//!
//! A missing name or a failing hook aborts the step immediately with that
//! error. Quantities already mutated earlier in the step stay mutated; the
//! step counter and [`last_metrics`](Simulation::last_metrics) only advance
//! on success.
//!
//! # Mutation during a step
//!
//! `update()` takes `&mut self`, so order lists and registrations cannot
//! change while a step is running. Hooks only see the registry through
//! their [`Owner`], which is read-only.

use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use simobject_core::{
    Owner, Payload, Phase, Quantity, QuantityOptions, Registry, SharedQuantity, SimError, Value,
};
use tracing::{debug, instrument, trace};

use crate::metrics::UpdateMetrics;
use crate::order::{names_from_value, order_attribute, PhaseOrders};

/// A registry of named quantities plus the per-phase order lists.
///
/// # Examples
///
/// ```
/// use simobject_core::{HookResult, Quantity, QuantityOptions};
/// use simobject_engine::Simulation;
///
/// let mut sim = Simulation::new();
/// sim.add_quantity("time", 0.0);
/// sim.add_quantity_with("dt", 1.0, QuantityOptions::new().constant(true));
/// sim.get("time")?.borrow_mut().set_updater(|time: &mut Quantity| -> HookResult {
///     let dt = time.try_owner()?.value("dt")?;
///     *time += &dt;
///     Ok(())
/// });
/// sim.set_update_order(["time"]);
///
/// sim.update()?;
/// sim.update()?;
/// assert_eq!(sim.value("time")?.scalar(), Some(2.0));
/// # Ok::<(), simobject_core::SimError>(())
/// ```
pub struct Simulation {
    registry: Rc<Registry>,
    orders: PhaseOrders,
    steps: u64,
    last_metrics: UpdateMetrics,
}

impl Simulation {
    /// An empty simulation with empty order lists.
    pub fn new() -> Self {
        Self::with_orders(PhaseOrders::default())
    }

    /// An empty simulation with preset order lists.
    pub fn with_orders(orders: PhaseOrders) -> Self {
        Self {
            registry: Registry::shared(),
            orders,
            steps: 0,
            last_metrics: UpdateMetrics::default(),
        }
    }

    /// A back-reference to this simulation, as carried by its quantities.
    pub fn owner(&self) -> Owner {
        self.registry.owner()
    }

    // ── registration ───────────────────────────────────────────────

    /// Register `payload` under `name` with default options.
    ///
    /// See [`add_quantity_with`](Self::add_quantity_with).
    pub fn add_quantity(
        &mut self,
        name: impl Into<String>,
        payload: impl Into<Payload>,
    ) -> SharedQuantity {
        self.add_quantity_with(name, payload, QuantityOptions::default())
    }

    /// Register a new quantity built from `payload` under `name`.
    ///
    /// The stored quantity is always a fresh copy owned by this simulation,
    /// replacing any previous entry of the same name. Metadata follows the
    /// inheritance rule with these container-specific twists:
    ///
    /// - info: `options.info`, else the payload's info, else `name`;
    /// - owner: always this simulation (`options.owner` is ignored);
    /// - constant: `options.constant` OR the payload's constancy, so
    ///   registration can make a quantity constant but never un-constant it;
    /// - hooks: each given option replaces the inherited slot.
    pub fn add_quantity_with(
        &mut self,
        name: impl Into<String>,
        payload: impl Into<Payload>,
        options: QuantityOptions,
    ) -> SharedQuantity {
        let name = name.into();
        let source = Quantity::new(payload);
        let info = options
            .info
            .filter(|s| !s.is_empty())
            .or_else(|| source.info().map(str::to_owned))
            .unwrap_or_else(|| name.clone());
        let constant = options.constant.unwrap_or(false) || source.is_constant();
        let quantity = Quantity::with_options(
            source,
            QuantityOptions {
                info: Some(info),
                owner: Some(self.owner()),
                updater: options.updater,
                systoler: options.systoler,
                diastoler: options.diastoler,
                constant: Some(constant),
            },
        );
        debug!(name = %name, shape = ?quantity.shape(), constant, "quantity registered");
        self.registry.insert(name, quantity)
    }

    /// Register `quantity` under `name`, defaulting its info to `name`.
    pub fn set(&mut self, name: impl Into<String>, quantity: Quantity) -> SharedQuantity {
        let name = name.into();
        let info = quantity.info().unwrap_or(name.as_str()).to_owned();
        self.add_quantity_with(name, quantity, QuantityOptions::new().info(info))
    }

    /// Attribute-style assignment of a dynamically typed value.
    ///
    /// A quantity is registered as by [`set`](Self::set). The names
    /// `systole_order`, `update_order` and `diastole_order` accept a list of
    /// strings ([`SimError::OrderType`] otherwise). Any other non-quantity
    /// assignment is a [`SimError::AttributeShadow`].
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), SimError> {
        if let Value::Quantity(quantity) = value {
            self.set(name, quantity);
            return Ok(());
        }
        match order_attribute(name) {
            Some(phase) => {
                let names = names_from_value(value)?;
                self.orders.set(phase, names);
                Ok(())
            }
            None => Err(SimError::AttributeShadow {
                name: name.to_owned(),
            }),
        }
    }

    /// Remove `name`, returning the quantity it held. Order lists are left
    /// as they are.
    pub fn remove(&mut self, name: &str) -> Option<SharedQuantity> {
        self.registry.remove(name)
    }

    // ── lookup ─────────────────────────────────────────────────────

    /// The quantity registered under `name`.
    pub fn get(&self, name: &str) -> Result<SharedQuantity, SimError> {
        self.registry.get(name)
    }

    /// A copy of the quantity registered under `name`.
    pub fn value(&self, name: &str) -> Result<Quantity, SimError> {
        self.owner().value(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Registered names, sorted case-insensitively.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.registry.names();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Number of registered quantities.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ── order lists ────────────────────────────────────────────────

    /// All three order lists.
    pub fn orders(&self) -> &PhaseOrders {
        &self.orders
    }

    /// Order list for `phase`.
    pub fn order(&self, phase: Phase) -> &[String] {
        self.orders.get(phase)
    }

    /// Replace the order list for `phase`.
    ///
    /// Names are not checked against the registry here; a missing name
    /// surfaces as [`SimError::NotFound`] when [`update`](Self::update) runs.
    pub fn set_order<I, S>(&mut self, phase: Phase, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.orders.set(phase, names);
    }

    /// Systole order list.
    pub fn systole_order(&self) -> &[String] {
        self.order(Phase::Systole)
    }

    /// Update order list.
    pub fn update_order(&self) -> &[String] {
        self.order(Phase::Update)
    }

    /// Diastole order list.
    pub fn diastole_order(&self) -> &[String] {
        self.order(Phase::Diastole)
    }

    /// Replace the systole order list.
    pub fn set_systole_order<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_order(Phase::Systole, names);
    }

    /// Replace the update order list.
    pub fn set_update_order<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_order(Phase::Update, names);
    }

    /// Replace the diastole order list.
    pub fn set_diastole_order<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_order(Phase::Diastole, names);
    }

    // ── scheduling ─────────────────────────────────────────────────

    /// Run one step: systole, then update, then diastole.
    ///
    /// Within a phase, names are visited in list order, once per
    /// occurrence. The first lookup or hook error aborts the step and is
    /// returned unchanged.
    #[instrument(skip(self), fields(step = self.steps + 1))]
    pub fn update(&mut self) -> Result<(), SimError> {
        let step_start = Instant::now();
        let mut metrics = UpdateMetrics {
            step: self.steps + 1,
            ..UpdateMetrics::default()
        };

        for phase in Phase::ALL {
            let phase_start = Instant::now();
            let names = self.orders.get(phase);
            trace!(%phase, entries = names.len(), "phase start");

            let mut hooks_invoked = 0;
            for name in names {
                run_entry(&self.registry, phase, name, &mut hooks_invoked).inspect_err(
                    |err| debug!(%phase, quantity = %name, error = %err, "step aborted"),
                )?;
            }

            let phase_metrics = metrics.phase_mut(phase);
            phase_metrics.entries = names.len();
            phase_metrics.hooks_invoked = hooks_invoked;
            phase_metrics.elapsed_us = phase_start.elapsed().as_micros() as u64;
        }

        metrics.total_us = step_start.elapsed().as_micros() as u64;
        self.steps = metrics.step;
        self.last_metrics = metrics;
        trace!("step complete");
        Ok(())
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Metrics from the most recent completed step.
    pub fn last_metrics(&self) -> &UpdateMetrics {
        &self.last_metrics
    }
}

fn run_entry(
    registry: &Registry,
    phase: Phase,
    name: &str,
    hooks_invoked: &mut usize,
) -> Result<(), SimError> {
    let shared = registry.get(name)?;
    let mut quantity = shared.try_borrow_mut().map_err(|_| SimError::Borrowed {
        name: name.to_owned(),
    })?;
    if let Some(hook) = quantity.hook(phase) {
        trace!(%phase, quantity = name, hook = hook.label().unwrap_or("anonymous"), "invoke");
        *hooks_invoked += 1;
    }
    quantity.run(phase)
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("quantities", &self.names())
            .field("orders", &self.orders)
            .field("steps", &self.steps)
            .finish()
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation")?;
        writeln!(f)?;
        for name in self.names() {
            if name.starts_with('_') {
                continue;
            }
            let Ok(shared) = self.registry.get(&name) else {
                continue;
            };
            let shown = if name.chars().count() > 12 {
                format!("{}...", name.chars().take(9).collect::<String>())
            } else {
                name.clone()
            };
            let (constant, info) = match shared.try_borrow() {
                Ok(q) => (q.is_constant(), q.info().map(str::to_owned)),
                Err(_) => (false, None),
            };
            let marker = if constant { "    Const. " } else { "" };
            let info = info.map(|i| format!("({i})")).unwrap_or_default();
            writeln!(f, "{marker:11}{:7}: {shown:12} {info}", "Quantity")?;
        }
        Ok(())
    }
}

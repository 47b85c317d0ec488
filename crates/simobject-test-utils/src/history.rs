//! A recording collaborator for diastole slots.
//!
//! [`HistoryRecorder`] hands out updaters that append a copy of their
//! quantity's payload to a per-name buffer. It relies only on the public
//! [`Updater`] contract.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use ndarray::{ArrayD, ArrayViewD, Axis};
use simobject_core::{Quantity, Updater};

/// Append-only per-name history of quantity payloads.
#[derive(Clone, Debug, Default)]
pub struct HistoryRecorder {
    buffers: Rc<RefCell<IndexMap<String, Vec<ArrayD<f64>>>>>,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// An updater recording snapshots under `name`.
    pub fn updater(&self, name: &str) -> Updater {
        let buffers = Rc::clone(&self.buffers);
        let key = name.to_owned();
        Updater::named(format!("history:{name}"), move |q: &mut Quantity| {
            buffers
                .borrow_mut()
                .entry(key.clone())
                .or_default()
                .push(q.data().clone());
            Ok(())
        })
    }

    /// Snapshots recorded under `name`, oldest first.
    pub fn history(&self, name: &str) -> Vec<ArrayD<f64>> {
        self.buffers.borrow().get(name).cloned().unwrap_or_default()
    }

    /// Number of snapshots recorded under `name`.
    pub fn len(&self, name: &str) -> usize {
        self.buffers.borrow().get(name).map_or(0, Vec::len)
    }

    /// Snapshots under `name` stacked along a new leading step axis.
    ///
    /// `None` if nothing was recorded or the snapshots differ in shape.
    pub fn stacked(&self, name: &str) -> Option<ArrayD<f64>> {
        let buffers = self.buffers.borrow();
        let snapshots = buffers.get(name)?;
        let views: Vec<ArrayViewD<'_, f64>> = snapshots.iter().map(|a| a.view()).collect();
        ndarray::stack(Axis(0), &views).ok()
    }

    /// Names with at least one snapshot, in first-recorded order.
    pub fn names(&self) -> Vec<String> {
        self.buffers.borrow().keys().cloned().collect()
    }
}

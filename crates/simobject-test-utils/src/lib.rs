//! Test utilities and hook fixtures for simobject development.
//!
//! Provides a shared [`CallLog`] for asserting hook execution order, the
//! hook fixtures in [`fixtures`], and a [`HistoryRecorder`] that plays the
//! part of a data-recording diastole collaborator.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod history;

use std::cell::RefCell;
use std::rc::Rc;

use simobject_core::Phase;

pub use fixtures::{counting_hook, failing_after, failing_hook, recording_hook, scale_hook};
pub use history::HistoryRecorder;

/// Shared, append-only log of `(phase, label)` hook invocations.
///
/// Clones share the same log, so a clone can be moved into each hook and
/// the original inspected afterwards.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<(Phase, String)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one invocation.
    pub fn push(&self, phase: Phase, label: impl Into<String>) {
        self.entries.borrow_mut().push((phase, label.into()));
    }

    /// All invocations so far, oldest first.
    pub fn entries(&self) -> Vec<(Phase, String)> {
        self.entries.borrow().clone()
    }

    /// Labels only, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|(_, l)| l.clone()).collect()
    }

    /// Invocations recorded for `phase`.
    pub fn count(&self, phase: Phase) -> usize {
        self.entries.borrow().iter().filter(|(p, _)| *p == phase).count()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

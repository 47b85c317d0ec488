//! Reusable hook fixtures.
//!
//! - [`recording_hook`]: appends `(phase, label)` to a [`CallLog`].
//! - [`counting_hook`]: adds 1 to its quantity every call.
//! - [`scale_hook`]: multiplies its quantity by a constant.
//! - [`failing_hook`]: always fails.
//! - [`failing_after`]: succeeds N times, then fails.

use std::cell::Cell;

use simobject_core::{Phase, Quantity, SimError, Updater};

use crate::CallLog;

/// Logs `(phase, label)` and leaves the quantity untouched.
pub fn recording_hook(log: &CallLog, phase: Phase, label: &str) -> Updater {
    let log = log.clone();
    let owned = label.to_owned();
    Updater::named(format!("record:{phase}:{label}"), move |_: &mut Quantity| {
        log.push(phase, owned.clone());
        Ok(())
    })
}

/// Adds 1 to every element.
pub fn counting_hook() -> Updater {
    Updater::named("count", |q: &mut Quantity| {
        *q += 1.0;
        Ok(())
    })
}

/// Multiplies every element by `factor`.
pub fn scale_hook(factor: f64) -> Updater {
    Updater::named(format!("scale:{factor}"), move |q: &mut Quantity| {
        *q *= factor;
        Ok(())
    })
}

/// Fails every call with [`SimError::HookFailed`].
pub fn failing_hook(reason: &str) -> Updater {
    let reason = reason.to_owned();
    Updater::named("failing", move |_: &mut Quantity| Err(SimError::hook(reason.clone())))
}

/// Succeeds `succeed_count` times, then fails every call after.
pub fn failing_after(succeed_count: usize, reason: &str) -> Updater {
    let calls = Cell::new(0usize);
    let reason = reason.to_owned();
    Updater::named("failing_after", move |_: &mut Quantity| {
        let n = calls.get();
        calls.set(n + 1);
        if n < succeed_count {
            Ok(())
        } else {
            Err(SimError::hook(reason.clone()))
        }
    })
}

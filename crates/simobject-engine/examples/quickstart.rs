//! simobject quickstart: a damped oscillator stepped with explicit Euler.
//!
//! Demonstrates:
//!   1. Registering constant parameters and state quantities
//!   2. Attaching update hooks that read siblings through their owner
//!   3. Splitting work across systole, update and diastole
//!   4. Reading metrics after each step
//!
//! Run with:
//!   cargo run --example quickstart

use simobject_core::{HookResult, Quantity, QuantityOptions};
use simobject_engine::Simulation;

const STEPS: usize = 20;

// ─── Hooks ──────────────────────────────────────────────────────

/// Acceleration from the spring and damping terms (systole).
fn compute_acceleration(acc: &mut Quantity) -> HookResult {
    let owner = acc.try_owner()?;
    let k = owner.value("k")?;
    let c = owner.value("c")?;
    let x = owner.value("x")?;
    let v = owner.value("v")?;
    acc.setvalue(-(&k * &x) - &c * &v)
}

fn advance_velocity(v: &mut Quantity) -> HookResult {
    let owner = v.try_owner()?;
    let acc = owner.value("acc")?;
    let dt = owner.value("dt")?;
    *v += &acc * &dt;
    Ok(())
}

fn advance_position(x: &mut Quantity) -> HookResult {
    let owner = x.try_owner()?;
    let v = owner.value("v")?;
    let dt = owner.value("dt")?;
    *x += &v * &dt;
    Ok(())
}

fn advance_time(t: &mut Quantity) -> HookResult {
    let dt = t.try_owner()?.value("dt")?;
    *t += &dt;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let constant = || QuantityOptions::new().constant(true);

    let mut sim = Simulation::new();
    sim.add_quantity_with("k", 4.0, constant().info("spring constant"));
    sim.add_quantity_with("c", 0.3, constant().info("damping"));
    sim.add_quantity_with("dt", 0.05, constant().info("time step [s]"));
    sim.add_quantity_with("time", 0.0, QuantityOptions::new().updater(advance_time));
    sim.add_quantity_with("x", vec![1.0, 0.5], QuantityOptions::new().updater(advance_position));
    sim.add_quantity_with("v", vec![0.0, 0.0], QuantityOptions::new().updater(advance_velocity));
    sim.add_quantity_with(
        "acc",
        vec![0.0, 0.0],
        QuantityOptions::new().systoler(compute_acceleration),
    );

    sim.set_systole_order(["acc"]);
    sim.set_update_order(["v", "x", "time"]);

    println!("{sim}");

    for _ in 0..STEPS {
        sim.update()?;
        let m = sim.last_metrics();
        println!(
            "step {:>3}  t={:.2}  x={}  ({} hooks, {} us)",
            m.step,
            sim.value("time")?.scalar().unwrap_or(f64::NAN),
            sim.value("x")?.data(),
            m.hooks_invoked(),
            m.total_us,
        );
    }

    Ok(())
}

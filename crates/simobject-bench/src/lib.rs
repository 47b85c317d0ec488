//! Benchmark profiles for the simobject simulation runtime.
//!
//! - [`reference_profile`]: `n` array quantities advanced by a shared clock
//! - [`diffusion_profile`]: one 1-D field relaxed by a discrete Laplacian

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use simobject_core::{HookResult, Quantity, QuantityOptions};
use simobject_engine::Simulation;

/// Build a simulation with `n` quantities of `cells` elements each.
///
/// Every quantity decays towards zero by `rate * dt` per step in the update
/// phase; `time` advances in diastole so all decays see the same clock.
pub fn reference_profile(n: usize, cells: usize) -> Simulation {
    let mut sim = Simulation::new();
    sim.add_quantity_with("dt", 0.01, QuantityOptions::new().constant(true));
    sim.add_quantity_with("rate", 0.5, QuantityOptions::new().constant(true));
    sim.add_quantity_with("time", 0.0, QuantityOptions::new().diastoler(advance_time));

    let mut names = Vec::with_capacity(n);
    for i in 0..n {
        let name = format!("q{i}");
        sim.add_quantity_with(
            name.as_str(),
            vec![1.0; cells],
            QuantityOptions::new().updater(decay),
        );
        names.push(name);
    }
    sim.set_update_order(names);
    sim.set_diastole_order(["time"]);
    sim
}

/// Build a single-field explicit diffusion run on `cells` points.
pub fn diffusion_profile(cells: usize) -> Simulation {
    let mut sim = Simulation::new();
    sim.add_quantity_with("alpha", 0.2, QuantityOptions::new().constant(true));
    let mut initial = vec![0.0; cells];
    if let Some(mid) = initial.get_mut(cells / 2) {
        *mid = 1.0;
    }
    sim.add_quantity_with("u", initial, QuantityOptions::new().updater(diffuse));
    sim.set_update_order(["u"]);
    sim
}

fn advance_time(t: &mut Quantity) -> HookResult {
    let dt = t.try_owner()?.value("dt")?;
    *t += &dt;
    Ok(())
}

fn decay(q: &mut Quantity) -> HookResult {
    let owner = q.try_owner()?;
    let factor = 1.0 - owner.value("rate")?.scalar().unwrap_or(0.0)
        * owner.value("dt")?.scalar().unwrap_or(0.0);
    *q *= factor;
    Ok(())
}

fn diffuse(u: &mut Quantity) -> HookResult {
    let alpha = u.try_owner()?.value("alpha")?.scalar().unwrap_or(0.0);
    let old: Vec<f64> = u.data().iter().copied().collect();
    let next: Vec<f64> = (0..old.len())
        .map(|i| {
            let left = if i > 0 { old[i - 1] } else { 0.0 };
            let right = old.get(i + 1).copied().unwrap_or(0.0);
            old[i] * (1.0 - 2.0 * alpha) + alpha * (left + right)
        })
        .collect();
    u.setvalue(next)
}

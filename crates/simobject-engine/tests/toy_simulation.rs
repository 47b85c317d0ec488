//! End-to-end runs of small simulations through the public API.

use ndarray::Array;
use simobject_core::{HookResult, Phase, Quantity, QuantityOptions, SimError, Updater, Value};
use simobject_engine::Simulation;
use simobject_test_utils::{scale_hook, HistoryRecorder};

fn time_update(time: &mut Quantity) -> HookResult {
    let dt = time.try_owner()?.value("dt")?;
    *time += &dt;
    Ok(())
}

#[test]
fn time_advances_by_dt() {
    let mut sim = Simulation::new();
    sim.add_quantity("time", Quantity::with_options(0.0, QuantityOptions::new().info("simulation time [s]")));
    sim.add_quantity("dt", Quantity::with_options(1.0, QuantityOptions::new().constant(true)));
    sim.get("time").unwrap().borrow_mut().set_updater(time_update);
    sim.set_diastole_order(Vec::<String>::new());
    sim.set_update_order(["time"]);

    sim.update().unwrap();
    assert_eq!(sim.value("time").unwrap().scalar(), Some(1.0));
    sim.update().unwrap();
    assert_eq!(sim.value("time").unwrap().scalar(), Some(2.0));
    assert!(sim.value("dt").unwrap().is_constant());
}

#[test]
fn array_doubles_each_step() {
    let mut sim = Simulation::new();
    sim.add_quantity_with(
        "y",
        vec![2.0, 2.0],
        QuantityOptions::new().updater(|y: &mut Quantity| -> HookResult {
            *y *= 2.0;
            Ok(())
        }),
    );
    sim.set_update_order(["y"]);
    sim.update().unwrap();
    sim.update().unwrap();
    assert_eq!(sim.value("y").unwrap().data().as_slice().unwrap(), &[8.0, 8.0]);
}

#[test]
fn grid_simulation_with_history() {
    const YINIT: f64 = 2.0;
    const ZINIT: f64 = 3.0;

    let mut sim = Simulation::new();
    sim.add_quantity(
        "nx",
        Quantity::with_options(100.0, QuantityOptions::new().info("size of x").constant(true)),
    );
    let nx = sim.value("nx").unwrap().scalar().unwrap() as usize;
    sim.add_quantity(
        "x",
        Quantity::with_options(Array::linspace(0.0, 1.0, nx), QuantityOptions::new().info("x grid")),
    );
    let ones = sim.value("x").unwrap().map(|_| 1.0);
    sim.add_quantity("y", Quantity::with_options(&ones * YINIT, QuantityOptions::new().info("y value").constant(false)));
    sim.add_quantity("z", Quantity::with_options(&ones * ZINIT, QuantityOptions::new().info("z value").constant(false)));
    sim.add_quantity("time", Quantity::with_options(0.0, QuantityOptions::new().info("simulation time [s]")));
    sim.add_quantity("dt", Quantity::with_options(1.0, QuantityOptions::new().info("time step [s]")));

    let doubling = scale_hook(2.0);
    sim.get("time").unwrap().borrow_mut().set_updater(time_update);
    sim.get("y").unwrap().borrow_mut().set_updater(&doubling);
    sim.get("z").unwrap().borrow_mut().set_updater(&doubling);

    let recorder = HistoryRecorder::new();
    for name in ["time", "y", "z"] {
        sim.get(name).unwrap().borrow_mut().set_diastoler(recorder.updater(name));
    }
    sim.set_update_order(["time", "y", "z"]);
    sim.set_diastole_order(["time", "y", "z"]);

    sim.update().unwrap();
    let dt = sim.value("dt").unwrap().scalar().unwrap();
    assert_eq!(sim.value("time").unwrap().scalar(), Some(dt));
    assert_eq!(sim.value("y").unwrap().at(&[0]), Some(YINIT * 2.0));
    assert_eq!(sim.value("z").unwrap().at(&[1]), Some(ZINIT * 2.0));
    assert_eq!(recorder.stacked("y").unwrap().shape(), &[1, nx]);

    sim.update().unwrap();
    assert_eq!(sim.value("time").unwrap().scalar(), Some(2.0 * dt));
    assert_eq!(sim.value("y").unwrap().at(&[nx - 2]), Some(YINIT * 4.0));
    assert_eq!(sim.value("z").unwrap().at(&[nx - 1]), Some(ZINIT * 4.0));
    assert_eq!(recorder.stacked("z").unwrap().shape(), &[2, nx]);

    // x and nx never participated.
    assert_eq!(sim.value("x").unwrap().at(&[nx - 1]), Some(1.0));
    assert_eq!(sim.steps(), 2);
}

#[test]
fn hooks_see_values_written_earlier_in_the_step() {
    let mut sim = Simulation::new();
    sim.add_quantity("source", 1.0);
    sim.add_quantity("sink", 0.0);
    sim.get("source").unwrap().borrow_mut().set_systoler(|s: &mut Quantity| -> HookResult {
        *s *= 10.0;
        Ok(())
    });
    sim.get("sink").unwrap().borrow_mut().set_updater(|k: &mut Quantity| -> HookResult {
        let source = k.try_owner()?.value("source")?;
        k.setvalue(&source)
    });
    sim.set_systole_order(["source"]);
    sim.set_update_order(["sink"]);
    sim.update().unwrap();
    assert_eq!(sim.value("sink").unwrap().scalar(), Some(10.0));
}

#[test]
fn constant_quantity_rejects_setvalue_from_a_hook() {
    let mut sim = Simulation::new();
    sim.add_quantity_with(
        "g",
        9.81,
        QuantityOptions::new()
            .info("gravity")
            .constant(true)
            .updater(|g: &mut Quantity| -> HookResult { g.setvalue(0.0) }),
    );
    sim.set_update_order(["g"]);
    assert_eq!(
        sim.update(),
        Err(SimError::Constant {
            info: Some("gravity".into())
        })
    );
    assert_eq!(sim.value("g").unwrap().scalar(), Some(9.81));
}

#[test]
fn dynamic_assignment_builds_a_runnable_simulation() {
    let mut sim = Simulation::new();
    let mut counter = Quantity::new(0.0);
    counter
        .assign_hook(
            Phase::Update,
            Value::Updater(Updater::new(|q: &mut Quantity| {
                *q += 1.0;
                Ok(())
            })),
        )
        .unwrap();
    sim.assign("counter", Value::Quantity(counter)).unwrap();
    sim.assign("update_order", Value::from(vec!["counter", "counter"])).unwrap();
    sim.update().unwrap();
    assert_eq!(sim.value("counter").unwrap().scalar(), Some(2.0));
    assert_eq!(sim.value("counter").unwrap().info(), Some("counter"));

    assert!(matches!(
        sim.assign("diastole_order", Value::from(vec![Value::from("a"), Value::Bool(true)])),
        Err(SimError::OrderType { .. })
    ));
    assert!(matches!(
        sim.assign("steps", Value::Number(3.0)),
        Err(SimError::AttributeShadow { .. })
    ));
}

#[test]
fn quantities_outlive_their_simulation_without_owner() {
    let mut sim = Simulation::new();
    let handle = sim.add_quantity("t", 0.0);
    handle.borrow_mut().set_updater(time_update);
    drop(sim);
    let mut t = handle.borrow_mut();
    assert!(!t.owner().unwrap().is_alive());
    assert_eq!(t.update(), Err(SimError::OwnerDropped));
}

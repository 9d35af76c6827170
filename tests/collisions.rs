use sqa::prelude::*;

mod common;
use common::{absorbing_medium, initial_state, solar_vacuum, trace, two_bin_problem};

fn run(accuracy: f64) -> Evolution {
    let problem = two_bin_problem(solar_vacuum());
    let f0 = initial_state(&problem.grid, 0.2);
    let settings = Settings::builder()
        .rmax(100.0)
        .accuracy(accuracy)
        .interact(true)
        .build();
    evolve(&absorbing_medium(), &problem, f0, &mut NoOutput, settings).unwrap()
}

#[test]
fn tighter_accuracy_never_lengthens_steps() {
    let loose = run(1e-6);
    let tight = run(5e-7);
    assert_eq!(loose.status, Status::Success);
    assert_eq!(tight.status, Status::Success);

    let mean = |e: &Evolution| e.r / e.steps.accepted as f64;
    assert!(mean(&tight) <= mean(&loose));
    assert!(tight.steps.accepted > loose.steps.accepted);
    assert!(tight.evals.interaction >= 2 * tight.steps.accepted);
}

#[test]
fn absorption_drains_occupations() {
    let problem = two_bin_problem(solar_vacuum());
    let f0 = initial_state(&problem.grid, 0.2);
    let evolution = run(1e-6);
    for species in Species::ALL {
        for i in 0..problem.grid.len() {
            let before = trace(&f0, species, i);
            let after = trace(&evolution.f, species, i);
            assert!(after < before);
            assert!(after > 0.0);
            assert!(evolution.f.get(species, i)[(0, 1)].norm() < f0.get(species, i)[(0, 1)].norm());
        }
    }
    // the higher energy bin is more opaque
    let drained = |i| trace(&evolution.f, Species::Matter, i) / trace(&f0, Species::Matter, i);
    assert!(drained(1) < drained(0));
}

#[test]
fn collisions_without_oscillation_keep_flavour_axes() {
    let problem = two_bin_problem(solar_vacuum());
    let f0 = initial_state(&problem.grid, 0.0);
    let settings = Settings::builder()
        .rmax(50.0)
        .accuracy(1e-6)
        .oscillate(false)
        .interact(true)
        .build();
    let evolution = evolve(&absorbing_medium(), &problem, f0, &mut NoOutput, settings).unwrap();
    assert_eq!(evolution.evals.derivative, 0);
    for species in Species::ALL {
        for i in 0..problem.grid.len() {
            assert_eq!(evolution.f.get(species, i)[(0, 1)].norm(), 0.0);
        }
    }
}

#[test]
fn selective_resets_follow_collision_error() {
    let problem = two_bin_problem(solar_vacuum());
    let f0 = initial_state(&problem.grid, 0.2);
    let medium = absorbing_medium();
    let settings = Settings::builder()
        .rmax(20.0)
        .accuracy(1e-6)
        .interact(true)
        .reset(ResetMode::Selective)
        .build();
    let mut integrator = Integrator::new(&medium, &problem, f0, settings).unwrap();
    while !integrator.finished() {
        let before = integrator.steps.resets;
        integrator.step().unwrap();
        let reset = integrator.steps.resets > before;
        assert!(integrator.interact_error() <= 1e-6);
        if integrator.interact_error() >= 0.1 * 1e-6 {
            assert!(reset);
        }
        if reset {
            assert_eq!(integrator.f0(), integrator.f());
        }
    }
    assert!(integrator.steps.resets > 0);
}

#[test]
fn exhausted_retries_report_step_underflow() {
    let problem = two_bin_problem(solar_vacuum());
    let f0 = initial_state(&problem.grid, 0.0);
    let settings = Settings::builder()
        .rmax(100.0)
        .dr0(50.0)
        .accuracy(1e-6)
        .interact(true)
        .max_rejections(1)
        .build();
    let result = evolve(&absorbing_medium(), &problem, f0, &mut NoOutput, settings);
    assert!(matches!(result, Err(Error::StepSizeTooSmall { r, .. }) if r == 0.0));
}

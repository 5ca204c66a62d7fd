use hmc_mcmc::dual_averaging::{DEFAULT_GAMMA, DEFAULT_KAPPA, DEFAULT_T0};
use hmc_mcmc::{DualAveraging, DualAveragingState, StepSizeAdaptation};

fn assert_states_close(a: &DualAveragingState, b: &DualAveragingState) {
    assert_eq!(a.iteration, b.iteration);
    for (x, y) in [
        (a.step_size, b.step_size),
        (a.mu, b.mu),
        (a.x_bar, b.x_bar),
        (a.h_bar, b.h_bar),
    ] {
        assert!((x - y).abs() <= 1e-12 * y.abs().max(1.0), "{a:?} != {b:?}");
    }
}

#[test]
fn acceptance_on_target_jumps_to_shrinkage_point() {
    let mut adaptor = DualAveraging::new(0.8, 1.0);
    assert_eq!(adaptor.gamma(), DEFAULT_GAMMA);
    assert_eq!(adaptor.t0(), DEFAULT_T0);
    assert_eq!(adaptor.kappa(), DEFAULT_KAPPA);

    adaptor.update(0.8);

    let state = adaptor.state();
    assert_eq!(state.iteration, 1);
    assert!(state.h_bar.abs() < 1e-15);
    assert!((state.mu - 10.0_f64.ln()).abs() < 1e-12);
    assert!((state.x_bar - 2.302585).abs() < 1e-6);
    assert!((adaptor.step_size() - 10.0).abs() < 1e-9);
}

#[test]
fn non_finite_update_is_discarded_but_counted() {
    let mut adaptor = DualAveraging::new(0.8, 0.5);
    adaptor.update(0.3);
    adaptor.update(0.9);
    let before = adaptor.state().clone();

    adaptor.update(f64::NAN);

    let after = adaptor.state();
    assert_eq!(after.iteration, before.iteration + 1);
    assert_eq!(after.step_size, before.step_size);
    assert_eq!(after.x_bar, before.x_bar);
    assert_eq!(after.h_bar, before.h_bar);
    assert_eq!(after.mu, before.mu);
}

#[test]
fn overflowing_and_underflowing_step_sizes_are_rejected() {
    // A tiny γ makes the log step size explode in either direction.
    let mut growing = DualAveraging::with_hyperparameters(1e-300, 10.0, 0.75, 0.8, 1.0);
    growing.update(1.0);
    assert_eq!(growing.state().iteration, 1);
    assert_eq!(growing.step_size(), 1.0);
    assert_eq!(growing.state().h_bar, 0.0);
    assert_eq!(growing.state().x_bar, 0.0);

    let mut shrinking = DualAveraging::with_hyperparameters(1e-300, 10.0, 0.75, 0.8, 1.0);
    shrinking.update(0.0);
    assert_eq!(shrinking.state().iteration, 1);
    assert_eq!(shrinking.step_size(), 1.0);
    assert_eq!(shrinking.state().h_bar, 0.0);

    let mut unbounded = DualAveraging::new(0.8, 1.0);
    unbounded.update(f64::NEG_INFINITY);
    assert_eq!(unbounded.state().iteration, 1);
    assert_eq!(unbounded.step_size(), 1.0);
}

#[test]
fn zero_acceptance_shrinks_the_step_size() {
    let mut adaptor = DualAveraging::new(0.8, 1.0);
    let mut previous = f64::INFINITY;
    for _ in 0..50 {
        adaptor.update(0.0);
        let current = adaptor.step_size();
        assert!(current < previous, "{current} !< {previous}");
        assert!(current.is_finite() && current > 0.0);
        previous = current;
    }
    assert!(previous < 1.0);
}

#[test]
fn full_acceptance_grows_the_step_size() {
    let mut adaptor = DualAveraging::new(0.8, 1.0);
    let mut previous = 0.0;
    for _ in 0..50 {
        adaptor.update(1.0);
        let current = adaptor.step_size();
        assert!(current > previous, "{current} !> {previous}");
        previous = current;
    }
    assert!(previous > 10.0);
}

#[test]
fn acceptance_above_one_is_clipped() {
    let mut clipped = DualAveraging::new(0.65, 0.2);
    let mut reference = DualAveraging::new(0.65, 0.2);
    for _ in 0..5 {
        clipped.update(3.5);
        reference.update(1.0);
    }
    assert_eq!(clipped.state(), reference.state());
}

#[test]
fn reset_recentres_on_the_current_step_size() {
    let mut adaptor = DualAveraging::new(0.8, 1.0);
    for alpha in [0.1, 0.4, 0.95, 0.6] {
        adaptor.update(alpha);
    }
    let eps = adaptor.step_size();

    adaptor.reset();

    let state = adaptor.state();
    assert_eq!(state.iteration, 0);
    assert_eq!(state.x_bar, 0.0);
    assert_eq!(state.h_bar, 0.0);
    assert_eq!(state.step_size, eps);
    assert!((state.mu - (10.0 * eps).ln()).abs() < 1e-12);
}

#[test]
fn finalize_switches_to_the_smoothed_step_size() {
    let mut adaptor = DualAveraging::new(0.8, 1.0);
    assert_eq!(adaptor.adapted_step_size(), None);
    adaptor.finalize();
    assert_eq!(adaptor.step_size(), 1.0);

    for alpha in [0.2, 0.9, 0.7, 0.85, 0.75] {
        adaptor.update(alpha);
    }
    let smoothed = adaptor.adapted_step_size().unwrap();
    assert!((smoothed - adaptor.state().x_bar.exp()).abs() < 1e-12);

    adaptor.finalize();
    assert_eq!(adaptor.step_size(), smoothed);
}

#[test]
fn trait_surface_ignores_position() {
    let mut via_trait = DualAveraging::new(0.8, 1.0);
    let mut direct = DualAveraging::new(0.8, 1.0);

    via_trait.consume_acceptance(&[1.0, 2.0, 3.0], 0.4);
    direct.update(0.4);

    assert_eq!(via_trait.current_step_size(), direct.step_size());
    assert_eq!(via_trait, direct);
}

#[test]
fn state_survives_json_checkpoint() {
    let mut adaptor = DualAveraging::new(0.8, 0.3);
    for alpha in [0.5, 0.9, 0.1] {
        adaptor.update(alpha);
    }
    let json = serde_json::to_string(&adaptor).expect("serialize");
    let mut restored: DualAveraging = serde_json::from_str(&json).expect("deserialize");
    assert_states_close(restored.state(), adaptor.state());
    assert_eq!(restored.target_accept(), adaptor.target_accept());

    adaptor.update(0.7);
    restored.update(0.7);
    assert_states_close(restored.state(), adaptor.state());

    let fresh = DualAveragingState::new(0.3);
    assert_eq!(fresh.iteration, 0);
    assert!((fresh.mu - 3.0_f64.ln()).abs() < 1e-12);
}

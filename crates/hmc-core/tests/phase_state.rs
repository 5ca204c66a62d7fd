use hmc_core::{HmcError, PhaseState, RngHandle};

#[test]
fn mismatched_lengths_are_rejected() {
    let err = PhaseState::new(vec![0.0, 1.0], vec![0.0]).unwrap_err();
    assert!(matches!(err, HmcError::Dimension(_)));

    let state = PhaseState::new(vec![0.0, 1.0], vec![0.5, -0.5]).unwrap();
    assert_eq!(state.dimension(), 2);
}

#[test]
fn momentum_refresh_keeps_position_and_is_seeded() {
    let position = vec![1.0, 2.0, 3.0, 4.0];

    let mut rng_a = RngHandle::from_seed(42);
    let mut rng_b = RngHandle::from_seed(42);
    let a = PhaseState::with_standard_momentum(position.clone(), &mut rng_a);
    let b = PhaseState::with_standard_momentum(position.clone(), &mut rng_b);

    assert_eq!(a.position, position);
    assert_eq!(a.momentum.len(), position.len());
    assert!(a.momentum.iter().all(|r| r.is_finite()));
    assert_eq!(a, b);
}

#[test]
fn refreshed_momentum_is_roughly_standard_normal() {
    let mut rng = RngHandle::from_seed(2024);
    let state = PhaseState::with_standard_momentum(vec![0.0; 20_000], &mut rng);
    let n = state.momentum.len() as f64;
    let mean = state.momentum.iter().sum::<f64>() / n;
    let var = state.momentum.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    assert!(mean.abs() < 0.05, "mean {mean}");
    assert!((var - 1.0).abs() < 0.05, "variance {var}");
}

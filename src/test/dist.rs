use crate::app::{Dist, DistSpec};
use crate::sim::{SimError, SimTime};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn const_dist_always_returns_value() {
    let d = Dist::new(&DistSpec::Const { value: 2.5 }).expect("valid");
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..10 {
        assert_eq!(d.sample(&mut rng), 2.5);
    }
    assert_eq!(d.sample_time(&mut rng), SimTime::from_millis(2_500));
}

#[test]
fn uniform_dist_stays_within_bounds() {
    let d = Dist::new(&DistSpec::Uniform {
        min: 64.0,
        max: 1500.0,
    })
    .expect("valid");
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1_000 {
        let b = d.sample_bytes(&mut rng);
        assert!((64..=1500).contains(&b), "out of range: {b}");
    }
}

#[test]
fn normal_dist_is_clamped_at_zero() {
    let d = Dist::new(&DistSpec::Normal {
        mean: -10.0,
        stddev: 1.0,
    })
    .expect("valid");
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        assert_eq!(d.sample(&mut rng), 0.0);
    }
}

#[test]
fn exponential_dist_is_reproducible_for_a_seed() {
    let d = Dist::new(&DistSpec::Exponential { mean: 0.5 }).expect("valid");
    let mut a = StdRng::seed_from_u64(42);
    let mut b = StdRng::seed_from_u64(42);
    let xs: Vec<f64> = (0..20).map(|_| d.sample(&mut a)).collect();
    let ys: Vec<f64> = (0..20).map(|_| d.sample(&mut b)).collect();
    assert_eq!(xs, ys);
    assert!(xs.iter().all(|x| *x >= 0.0));
}

#[test]
fn invalid_parameters_are_config_errors() {
    let bad = [
        DistSpec::Const { value: -1.0 },
        DistSpec::Uniform { min: 5.0, max: 1.0 },
        DistSpec::Exponential { mean: 0.0 },
        DistSpec::Normal {
            mean: 1.0,
            stddev: -1.0,
        },
        DistSpec::Const { value: f64::NAN },
    ];
    for spec in bad {
        assert!(
            matches!(Dist::new(&spec), Err(SimError::Config(_))),
            "{spec:?} should be rejected"
        );
    }
}

#[test]
fn dist_spec_parses_tagged_json() {
    let d: DistSpec =
        serde_json::from_str(r#"{ "kind": "exponential", "mean": 0.25 }"#).expect("parse");
    assert_eq!(d, DistSpec::Exponential { mean: 0.25 });
}

//! Tests for parameter domains.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

#[test]
fn test_interval_rejects_inverted_bounds() {
    assert!(matches!(
        IntervalDomain::new(1.0, 0.0),
        Err(ModelError::InvalidBounds { .. })
    ));
    assert!(IntervalDomain::new(f64::NAN, 0.0).is_err());
    assert!(IntervalDomain::new(f64::NEG_INFINITY, f64::INFINITY).is_ok());
}

#[test]
fn test_interval_intersection() {
    let a = IntervalDomain::new(0.0, 1.0).unwrap();
    let b = IntervalDomain::new(0.5, 2.0).unwrap();
    let c = IntervalDomain::new(2.0, 3.0).unwrap();

    assert_eq!(a.intersect(&b), Some(IntervalDomain::new(0.5, 1.0).unwrap()));
    assert_eq!(a.intersect(&c), None);
}

#[test]
fn test_uniform_grid_includes_endpoints() {
    let grid = IntervalDomain::new(0.0, 1.0).unwrap().uniform_grid(5).unwrap();
    assert_eq!(grid, vec![0.0, 0.25, 0.5, 0.75, 1.0]);

    let unbounded = IntervalDomain::unbounded().uniform_grid(3);
    assert!(matches!(unbounded, Err(ModelError::InvalidArgument(_))));
}

#[test]
fn test_distribution_bounds() {
    let uniform = UnivariateDistribution::uniform(-1.0, 2.0).unwrap();
    let normal = UnivariateDistribution::normal(0.0, 1.0).unwrap();

    assert_eq!(uniform.support_bounds(), IntervalDomain::new(-1.0, 2.0).unwrap());
    assert_eq!(normal.support_bounds(), IntervalDomain::unbounded());
    assert!(UnivariateDistribution::normal(0.0, 0.0).is_err());
}

#[test]
fn test_uniform_samples_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let uniform = UnivariateDistribution::uniform(2.0, 3.0).unwrap();
    for _ in 0..100 {
        let value = uniform.sample(&mut rng);
        assert!((2.0..=3.0).contains(&value));
    }
}

#[test]
fn test_multivariate_normal_validation() {
    let ok = MultivariateNormal::new(vec![0.0, 0.0], vec![vec![1.0, 0.5], vec![0.5, 2.0]]);
    assert!(ok.is_ok());

    let wrong_rows = MultivariateNormal::new(vec![0.0, 0.0], vec![vec![1.0, 0.0]]);
    assert!(matches!(
        wrong_rows,
        Err(ModelError::DimensionMismatch {
            expected: 2,
            found: 1
        })
    ));

    let not_pd = MultivariateNormal::new(vec![0.0, 0.0], vec![vec![1.0, 2.0], vec![2.0, 1.0]]);
    assert!(matches!(not_pd, Err(ModelError::InvalidArgument(_))));
}

#[test]
fn test_array_domain_violation() {
    let domain = InfiniteArrayDomain::collection(vec![
        IntervalDomain::new(0.0, 1.0).unwrap().into(),
        IntervalDomain::new(-1.0, 0.0).unwrap().into(),
    ])
    .unwrap();

    assert_eq!(domain.dimension(), 2);
    assert_eq!(domain.first_violation(&[0.5, -0.5]), None);
    assert_eq!(domain.first_violation(&[0.5, 0.5]), Some((1, 0.5)));
}

#[test]
fn test_collection_generation_zips_dimensions() {
    let mut rng = StdRng::seed_from_u64(1);
    let domain = InfiniteArrayDomain::collection(vec![
        IntervalDomain::new(0.0, 1.0).unwrap().into(),
        IntervalDomain::new(10.0, 20.0).unwrap().into(),
    ])
    .unwrap();

    let (columns, kind) = domain.generate(3, &mut rng).unwrap();
    assert_eq!(kind, GeneratedKind::Grid);
    assert_eq!(
        columns,
        vec![vec![0.0, 10.0], vec![0.5, 15.0], vec![1.0, 20.0]]
    );
}

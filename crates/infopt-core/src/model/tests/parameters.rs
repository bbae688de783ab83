use super::*;
use crate::parameter::{LabelSet, ParameterSet};

#[test]
fn test_supports_are_sorted_and_deduplicated() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 10.0);

    model
        .add_supports(&t, &[5.0, 1.0, 3.0], SupportLabel::UserDefined)
        .unwrap();
    model.add_support(&t, 3.0, SupportLabel::UniformGrid).unwrap();

    assert_eq!(all_supports(&model, &t), vec![1.0, 3.0, 5.0]);
    assert_eq!(model.num_supports(&t).unwrap(), 3);
    assert_eq!(
        model.support_labels(&t).unwrap(),
        LabelSet::from([SupportLabel::UserDefined, SupportLabel::UniformGrid])
    );

    let grid: Vec<f64> = model
        .supports(&t, SupportLabel::UniformGrid.into())
        .unwrap()
        .collect();
    assert_eq!(grid, vec![3.0]);
}

#[test]
fn test_support_iteration_is_restartable() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    model
        .add_supports(&t, &[0.0, 0.5, 1.0], SupportLabel::UserDefined)
        .unwrap();

    let supports = model.supports(&t, SupportFilter::All).unwrap();
    let first: Vec<f64> = supports.clone().collect();
    let second: Vec<f64> = supports.collect();
    assert_eq!(first, second);
}

#[test]
fn test_floating_point_noise_collapses_to_one_support() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);

    model.add_support(&t, 0.1 + 0.2, SupportLabel::UserDefined).unwrap();
    model.add_support(&t, 0.3, SupportLabel::UserDefined).unwrap();

    assert_eq!(model.num_supports(&t).unwrap(), 1);
}

#[test]
fn test_out_of_domain_support_is_rejected_atomically() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);

    let err = model
        .add_supports(&t, &[0.5, 1.5], SupportLabel::UserDefined)
        .unwrap_err();

    assert!(matches!(err, ModelError::OutOfDomain { value, .. } if value == 1.5));
    assert_eq!(model.num_supports(&t).unwrap(), 0);
}

#[test]
fn test_group_takes_whole_columns() {
    let mut model = InfiniteModel::new();
    let (group, x) = unit_group(&mut model, "x", 2);

    model
        .add_supports(&group, &[0.2, 0.8], SupportLabel::UserDefined)
        .unwrap();
    model
        .add_supports(&x[1], &[0.1, 0.4], SupportLabel::McSample)
        .unwrap();

    assert_eq!(model.num_supports(&x[0]).unwrap(), 2);
    assert_eq!(all_supports(&model, &x[0]), vec![0.2, 0.1]);
    assert_eq!(all_supports(&model, &x[1]), vec![0.8, 0.4]);

    let columns: Vec<&[f64]> = model
        .support_columns(&group, SupportLabel::McSample.into())
        .unwrap()
        .collect();
    assert_eq!(columns, vec![&[0.1, 0.4][..]]);
}

#[test]
fn test_group_column_must_match_dimension() {
    let mut model = InfiniteModel::new();
    let (group, _) = unit_group(&mut model, "x", 2);

    assert_eq!(
        model
            .add_supports(&group, &[0.2], SupportLabel::UserDefined)
            .unwrap_err(),
        ModelError::DimensionMismatch {
            expected: 2,
            found: 1
        }
    );
    assert!(matches!(
        model.add_supports(&group, &[0.2, 1.2], SupportLabel::UserDefined),
        Err(ModelError::OutOfDomain { .. })
    ));
    assert_eq!(model.num_supports(&group).unwrap(), 0);
}

#[test]
fn test_single_support_on_group_member_is_rejected() {
    let mut model = InfiniteModel::new();
    let (_, x) = unit_group(&mut model, "x", 2);

    assert!(matches!(
        model.add_support(&x[0], 0.5, SupportLabel::UserDefined),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn test_supports_of_whole_group_are_read_as_columns() {
    let mut model = InfiniteModel::new();
    let (group, _) = unit_group(&mut model, "x", 2);

    assert!(matches!(
        model.supports(&group, SupportFilter::All),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn test_finite_parameter_has_no_supports() {
    let mut model = InfiniteModel::new();
    let p = finite_param(&mut model, "p", 2.0);

    assert!(model.add_support(&p, 1.0, SupportLabel::UserDefined).is_err());
    assert!(model.num_supports(&p).is_err());
}

#[test]
fn test_delete_supports_by_label() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    model
        .add_supports(&t, &[0.0, 0.5], SupportLabel::UserDefined)
        .unwrap();
    model
        .add_supports(&t, &[0.5, 1.0], SupportLabel::UniformGrid)
        .unwrap();

    model
        .delete_supports(&t, SupportLabel::UniformGrid.into())
        .unwrap();

    assert_eq!(all_supports(&model, &t), vec![0.0, 0.5]);
    assert_eq!(
        model.support_labels(&t).unwrap(),
        LabelSet::from([SupportLabel::UserDefined])
    );

    model.delete_supports(&t, SupportFilter::All).unwrap();
    assert!(!model.has_supports(&t).unwrap());
}

#[test]
fn test_set_supports_replaces_everything() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    model
        .add_supports(&t, &[0.0, 0.5], SupportLabel::UserDefined)
        .unwrap();

    model
        .set_supports(&t, &[0.25, 0.75], SupportLabel::WeightedSample)
        .unwrap();

    assert_eq!(all_supports(&model, &t), vec![0.25, 0.75]);
    assert_eq!(
        model.support_labels(&t).unwrap(),
        LabelSet::from([SupportLabel::WeightedSample])
    );
}

#[test]
fn test_fill_in_supports_on_interval_builds_grid() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    model.add_support(&t, 0.5, SupportLabel::UserDefined).unwrap();

    let added = model.fill_in_supports(&t, Some(5)).unwrap();

    assert_eq!(added, 4);
    assert_eq!(all_supports(&model, &t), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    let grid: Vec<f64> = model
        .supports(&t, SupportLabel::UniformGrid.into())
        .unwrap()
        .collect();
    assert_eq!(grid.len(), 5);
}

#[test]
fn test_fill_in_supports_uses_configured_default() {
    let mut model = InfiniteModel::with_config(ModelConfig::new().with_default_num_supports(3));
    let t = interval_param(&mut model, "t", 0.0, 2.0);

    assert_eq!(model.fill_in_supports(&t, None).unwrap(), 3);
    assert_eq!(all_supports(&model, &t), vec![0.0, 1.0, 2.0]);
    assert!(matches!(
        model.fill_in_supports(&t, Some(0)),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn test_fill_in_supports_samples_distribution_reproducibly() {
    let sample = || {
        let mut model = InfiniteModel::with_config(ModelConfig::new().with_random_seed(42));
        let xi = model
            .insert_parameter(
                IndependentParameter::new(UnivariateDistribution::uniform(-1.0, 1.0).unwrap()),
                "xi",
            )
            .unwrap();
        model.fill_in_supports(&xi, Some(6)).unwrap();
        let labels = model.support_labels(&xi).unwrap();
        (all_supports(&model, &xi), labels)
    };

    let (first, labels) = sample();
    let (second, _) = sample();
    assert_eq!(first, second);
    assert_eq!(labels, LabelSet::from([SupportLabel::McSample]));
    assert!(!first.is_empty());
    assert!(first.iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn test_fill_in_supports_zips_group_dimensions() {
    let mut model = InfiniteModel::new();
    let (group, x) = unit_group(&mut model, "x", 2);

    model.fill_in_supports(&group, Some(3)).unwrap();

    assert_eq!(model.num_supports(&group).unwrap(), 3);
    assert_eq!(all_supports(&model, &x[0]), vec![0.0, 0.5, 1.0]);
    assert_eq!(all_supports(&model, &x[1]), vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_set_infinite_domain_checks_existing_supports() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 10.0);
    model.add_support(&t, 8.0, SupportLabel::UserDefined).unwrap();

    assert!(matches!(
        model.set_infinite_domain(&t, IntervalDomain::new(0.0, 5.0).unwrap()),
        Err(ModelError::OutOfDomain { .. })
    ));

    model
        .set_infinite_domain(&t, IntervalDomain::new(0.0, 8.0).unwrap())
        .unwrap();
    match model.parameter_set(&t).unwrap() {
        ParameterSet::Scalar(domain) => assert_eq!(domain.upper_bound(), 8.0),
        other => panic!("unexpected set {other:?}"),
    }
}

#[test]
fn test_set_group_domain_keeps_dimension() {
    let mut model = InfiniteModel::new();
    let (group, _) = unit_group(&mut model, "x", 2);
    let wider = InfiniteArrayDomain::collection(vec![
        IntervalDomain::new(-1.0, 1.0).unwrap().into(),
        IntervalDomain::new(-1.0, 1.0).unwrap().into(),
    ])
    .unwrap();
    let narrower = InfiniteArrayDomain::collection(vec![IntervalDomain::new(0.0, 1.0)
        .unwrap()
        .into()])
    .unwrap();

    assert_eq!(
        model.set_group_domain(&group, narrower).unwrap_err(),
        ModelError::DimensionMismatch {
            expected: 2,
            found: 1
        }
    );
    model.set_group_domain(&group, wider).unwrap();
    model
        .add_supports(&group, &[-0.5, 0.5], SupportLabel::UserDefined)
        .unwrap();
}

#[test]
fn test_finite_parameter_value() {
    let mut model = InfiniteModel::new();
    let p = finite_param(&mut model, "p", 2.0);

    model.set_parameter_value(&p, 3.5).unwrap();
    assert_eq!(model.parameter_value(&p).unwrap(), 3.5);
    assert!(matches!(
        model.set_parameter_value(&p, f64::NAN),
        Err(ModelError::InvalidArgument(_))
    ));
    assert!(matches!(
        model.insert_parameter(FiniteParameter::new(f64::INFINITY), "bad"),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn test_parameters_adopt_configured_digits() {
    let mut model = InfiniteModel::with_config(ModelConfig::new().with_significant_digits(3));
    let t = interval_param(&mut model, "t", 0.0, 1.0);

    model.add_support(&t, 0.12345, SupportLabel::UserDefined).unwrap();
    model.add_support(&t, 0.1234, SupportLabel::UserDefined).unwrap();

    assert_eq!(model.independent_parameter(&t).unwrap().significant_digits(), 3);
    assert_eq!(all_supports(&model, &t), vec![0.123]);
}

#[test]
fn test_tiny_support_is_stored_as_given() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);

    model.add_support(&t, 1e-300, SupportLabel::UserDefined).unwrap();
    model.add_support(&t, 0.5, SupportLabel::UserDefined).unwrap();

    assert_eq!(all_supports(&model, &t), vec![1e-300, 0.5]);
}

#[test]
fn test_out_of_range_support_settings_are_clamped() {
    let config = ModelConfig::new()
        .with_significant_digits(0)
        .with_default_num_supports(0);
    let mut model = InfiniteModel::with_config(config);
    let t = interval_param(&mut model, "t", 0.0, 1.0);

    assert_eq!(model.config().supports.significant_digits, 1);
    assert_eq!(model.config().supports.default_num_supports, 1);

    model.add_support(&t, 0.5, SupportLabel::UserDefined).unwrap();
    assert_eq!(all_supports(&model, &t), vec![0.5]);

    let many = InfiniteModel::with_config(ModelConfig::new().with_significant_digits(40));
    assert_eq!(many.config().supports.significant_digits, 17);
}

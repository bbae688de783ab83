//! Integration tests for building, editing and tearing down models through
//! the public API.

use infopt::prelude::*;
use infopt_test::{scalar_interval_model, DynamicFixture, StochasticFixture};

#[test]
fn test_deletion_follows_dependency_order() {
    let DynamicFixture {
        mut model,
        t,
        y,
        y_mid,
    } = DynamicFixture::new();

    assert!(matches!(
        model.delete(&t),
        Err(ModelError::ObjectInUse { .. })
    ));
    assert!(matches!(
        model.delete(&y),
        Err(ModelError::ObjectInUse { .. })
    ));

    model.delete(&y_mid).unwrap();
    model.delete(&y).unwrap();
    model.delete(&t).unwrap();

    for r in [t, y, y_mid] {
        assert!(matches!(model.resolve(&r), Err(ModelError::NotFound(_))));
    }
    assert_eq!(model.objective_function(), &Expression::Constant(0.0));
}

#[test]
fn test_point_variable_joins_user_supports() {
    let fixture = DynamicFixture::new();
    let supports: Vec<f64> = fixture
        .model
        .supports(&fixture.t, SupportFilter::All)
        .unwrap()
        .collect();

    assert_eq!(supports, vec![0.0, 0.5, 1.0]);
    assert!(fixture.model.is_used_by_objective(&fixture.y_mid).unwrap());
}

#[test]
fn test_cascade_configuration_tears_down_dependents() {
    let config = ModelConfig::new().with_deletion_policy(DeletionPolicy::Cascade);
    let DynamicFixture {
        mut model,
        t,
        y,
        y_mid,
    } = DynamicFixture::with_config(config);

    model.delete(&t).unwrap();

    assert!(!model.is_valid(&y));
    assert!(!model.is_valid(&y_mid));
    assert_eq!(model.num_variables(), 0);
    assert_eq!(model.objective_function(), &Expression::Constant(0.0));
}

#[test]
fn test_configuration_loads_from_toml() {
    let config = ModelConfig::from_toml_str(
        r#"
        deletion_policy = "cascade"

        [supports]
        significant_digits = 4
        "#,
    )
    .unwrap();
    let mut model = InfiniteModel::with_config(config);
    let t = model
        .insert_parameter(IndependentParameter::new(IntervalDomain::new(0.0, 1.0).unwrap()), "t")
        .unwrap();

    model
        .add_supports(&t, &[0.12341, 0.12339], SupportLabel::UserDefined)
        .unwrap();

    assert_eq!(model.num_supports(&t).unwrap(), 1);
    assert_eq!(model.config().deletion_policy, DeletionPolicy::Cascade);
}

#[test]
fn test_expectation_over_random_vector() {
    let fixture = StochasticFixture::new();
    let model = &fixture.model;

    assert_eq!(model.num_supports(&fixture.xi).unwrap(), 4);
    for member in &fixture.xi_members {
        assert_eq!(model.num_supports(member).unwrap(), 4);
    }
    assert!(model.parameter_refs(&fixture.e_x).unwrap().is_empty());
    assert_eq!(
        model.dependents_of(&fixture.e_x, DependentKind::Constraint).unwrap(),
        vec![fixture.cap]
    );
    assert_eq!(
        model.dependents_of(&fixture.xi, DependentKind::Measure).unwrap(),
        vec![fixture.e_x]
    );
}

#[test]
fn test_expectation_can_be_removed_step_by_step() {
    let StochasticFixture {
        mut model,
        xi,
        x,
        e_x,
        cap,
        label,
        ..
    } = StochasticFixture::new();

    model.delete(&cap).unwrap();
    model.delete(&e_x).unwrap();

    assert!(!model.support_labels(&xi).unwrap().contains(&label));
    assert!(!model.has_supports(&xi).unwrap());
    model.delete(&x).unwrap();
    model.delete(&xi).unwrap();
    assert_eq!(model.num_parameters(), 0);
}

#[test]
fn test_group_support_dimension_is_checked() {
    let mut fixture = StochasticFixture::new();

    assert_eq!(
        fixture
            .model
            .add_supports(&fixture.xi, &[0.5, 0.5], SupportLabel::UserDefined)
            .unwrap_err(),
        ModelError::DimensionMismatch {
            expected: 3,
            found: 2
        }
    );
    fixture
        .model
        .add_supports(&fixture.xi, &[0.5, 0.5, 0.5], SupportLabel::UserDefined)
        .unwrap();
    for member in &fixture.xi_members {
        assert_eq!(fixture.model.num_supports(member).unwrap(), 5);
    }
}

#[test]
fn test_objective_rejects_bare_parameter() {
    let (mut model, t) = scalar_interval_model();

    assert!(matches!(
        model.set_objective(ObjectiveSense::Minimize, t),
        Err(ModelError::NotFinite(_))
    ));
}

#[test]
fn test_bounds_merge_keeps_tighter_interval() {
    let (_, p) = scalar_interval_model();
    let a = ParameterBounds::new().with(p, 0.0, 1.0).unwrap();
    let b = ParameterBounds::new().with(p, 0.5, 2.0).unwrap();
    let c = ParameterBounds::new().with(p, 2.0, 3.0).unwrap();

    assert_eq!(
        a.merge(&b).unwrap().get(&p),
        Some(&IntervalDomain::new(0.5, 1.0).unwrap())
    );
    assert!(matches!(a.merge(&c), Err(ModelError::EmptyIntersection(_))));
}

#[test]
fn test_models_do_not_share_references() {
    let (first, t) = scalar_interval_model();
    let (second, _) = scalar_interval_model();

    assert!(first.is_valid(&t));
    assert_eq!(second.resolve(&t).unwrap_err(), ModelError::OwningModelMismatch);
}

use super::*;
use crate::data::DependentKind;

#[test]
fn test_restrict_policy_reports_blockers() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);

    assert_eq!(
        model.delete(&t).unwrap_err(),
        ModelError::ObjectInUse {
            object: format!("{t} 't'"),
            blockers: vec![("infinite variable(s)", 1)],
        }
    );
    assert!(model.is_valid(&t));
    assert!(model.is_valid(&y));
}

#[test]
fn test_blockers_are_counted_per_kind() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);
    model
        .insert_variable(PointVariable::new(y, vec![0.5]), "y0")
        .unwrap();
    model
        .insert_variable(PointVariable::new(y, vec![1.0]), "y1")
        .unwrap();
    model
        .insert_constraint(Constraint::new(y, ConstraintSet::LessThan(1.0)), "c")
        .unwrap();

    match model.delete(&y) {
        Err(ModelError::ObjectInUse { blockers, .. }) => assert_eq!(
            blockers,
            vec![("point variable(s)", 2), ("constraint(s)", 1)]
        ),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_own_info_constraints_do_not_block() {
    let mut model = InfiniteModel::new();
    let z = model
        .insert_variable(
            HoldVariable::new().with_info(VariableInfo::new().with_lower_bound(0.0).with_upper_bound(1.0)),
            "z",
        )
        .unwrap();
    assert_eq!(model.num_constraints(), 2);

    model.delete(&z).unwrap();

    assert_eq!(model.num_constraints(), 0);
    assert_eq!(model.num_variables(), 0);
}

#[test]
fn test_unused_objects_delete_under_restrict() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);
    let c = model
        .insert_constraint(Constraint::new(y, ConstraintSet::LessThan(1.0)), "c")
        .unwrap();

    model.delete(&c).unwrap();
    model.delete(&y).unwrap();
    model.delete(&t).unwrap();

    assert_eq!(model.num_parameters(), 0);
    assert_eq!(model.num_variables(), 0);
    assert_eq!(model.num_constraints(), 0);
}

#[test]
fn test_deleting_unlinks_from_referenced_objects() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);
    let y0 = model
        .insert_variable(PointVariable::new(y, vec![0.5]), "y0")
        .unwrap();

    model.delete(&y0).unwrap();

    assert!(model.dependents_of(&y, DependentKind::PointVariable).unwrap().is_empty());
    // The support added for the point stays with the parameter.
    assert_eq!(all_supports(&model, &t), vec![0.5]);
}

#[test]
fn test_cascade_removes_every_dependent() {
    let mut model = cascade_model();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let s = interval_param(&mut model, "s", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t, s]);
    let w = infinite_var(&mut model, "w", &[s]);
    let y0 = model
        .insert_variable(PointVariable::new(y, vec![0.5, 0.5]), "y0")
        .unwrap();
    let m = model
        .insert_measure(Measure::new(y, trapezoid(t, quadrature())), "int_y")
        .unwrap();
    let c = model
        .insert_constraint(
            Constraint::new(AffineExpr::new(vec![(1.0, m), (1.0, w)], 0.0), ConstraintSet::EqualTo(0.0)),
            "c",
        )
        .unwrap();

    model.delete(&t).unwrap();

    for gone in [t, y, y0, m, c] {
        assert!(!model.is_valid(&gone), "{gone} survived");
    }
    assert!(model.is_valid(&s));
    assert!(model.is_valid(&w));
    assert_eq!(model.dependents_of(&s, DependentKind::InfiniteVariable).unwrap(), vec![w]);
    assert!(!model.is_used_by_constraint(&w).unwrap());
    assert!(!model.is_used_by_measure(&s).unwrap());
}

#[test]
fn test_cascade_handles_shared_dependents_once() {
    let mut model = cascade_model();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = model
        .insert_variable(
            InfiniteVariable::new(vec![t]).with_info(VariableInfo::new().with_lower_bound(0.0)),
            "y",
        )
        .unwrap();
    let yr = model
        .insert_variable(ReducedVariable::new(y, [(0, 0.5)].into()), "yr")
        .unwrap();
    // Depends on t through y and through yr.
    let c = model
        .insert_constraint(
            Constraint::new(AffineExpr::new(vec![(1.0, y), (1.0, yr)], 0.0), ConstraintSet::LessThan(1.0))
                .with_parameter_bounds(ParameterBounds::new().with(t, 0.0, 0.5).unwrap()),
            "c",
        )
        .unwrap();

    model.delete(&t).unwrap();

    for gone in [t, y, yr, c] {
        assert!(!model.is_valid(&gone), "{gone} survived");
    }
    assert_eq!(model.num_constraints(), 0);
}

#[test]
fn test_group_member_cannot_be_deleted_alone() {
    let mut model = cascade_model();
    let (group, x) = unit_group(&mut model, "x", 2);

    assert!(matches!(model.delete(&x[0]), Err(ModelError::InvalidArgument(_))));

    model.delete(&group).unwrap();
    assert!(!model.is_valid(&x[0]));
    assert!(!model.is_valid(&x[1]));
}

#[test]
fn test_deleting_hold_variable_refreshes_bound_flag() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let z = model
        .insert_variable(
            HoldVariable::new().with_parameter_bounds(ParameterBounds::new().with(t, 0.0, 0.5).unwrap()),
            "z",
        )
        .unwrap();
    assert!(model.has_hold_bounds());
    assert!(matches!(model.delete(&t), Err(ModelError::ObjectInUse { .. })));

    model.delete(&z).unwrap();

    assert!(!model.has_hold_bounds());
    assert!(!model.is_used(&t).unwrap());
    model.delete(&t).unwrap();
}

#[test]
fn test_deleted_reference_cannot_be_deleted_again() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    model.delete(&z).unwrap();

    assert!(matches!(model.delete(&z), Err(ModelError::NotFound(_))));
}

#[test]
fn test_new_objects_never_reuse_deleted_keys() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    model.delete(&z).unwrap();

    let w = hold_var(&mut model, "w");

    assert_ne!(z, w);
    assert!(!model.is_valid(&z));
}

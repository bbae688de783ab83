use std::collections::BTreeMap;

use super::*;
use crate::data::{DependentKind, InfoConstraintKind};
use crate::parameter::LabelSet;

#[test]
fn test_infinite_variable_registers_with_its_parameters() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let (group, x) = unit_group(&mut model, "x", 2);

    let y = infinite_var(&mut model, "y", &[t, x[0], x[1]]);

    assert_eq!(model.dependents_of(&t, DependentKind::InfiniteVariable).unwrap(), vec![y]);
    assert_eq!(
        model.dependents_of(&group, DependentKind::InfiniteVariable).unwrap(),
        vec![y]
    );
    assert_eq!(model.parameter_refs(&y).unwrap(), vec![t, x[0], x[1]]);
    assert_eq!(model.num_variables(), 1);
}

#[test]
fn test_parameter_tuple_is_validated() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let p = finite_param(&mut model, "p", 1.0);
    let (group, x) = unit_group(&mut model, "x", 3);

    let rejected = [
        vec![],
        vec![t, t],
        vec![t, p],
        vec![x[0], x[1]],
        vec![x[0], t, x[1], x[2]],
        vec![x[1], x[0], x[2]],
        vec![group],
    ];
    for tuple in rejected {
        let result = model.insert_variable(InfiniteVariable::new(tuple.clone()), "y");
        assert!(
            matches!(result, Err(ModelError::InvalidArgument(_))),
            "tuple {tuple:?} was accepted"
        );
    }
    assert_eq!(model.num_variables(), 0);
    assert!(!model.is_used(&t).unwrap());
}

#[test]
fn test_point_variable_adds_its_point_as_support() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let (_, x) = unit_group(&mut model, "x", 2);
    let y = infinite_var(&mut model, "y", &[t, x[0], x[1]]);

    let y0 = model
        .insert_variable(PointVariable::new(y, vec![0.5, 0.2, 0.4]), "y0")
        .unwrap();

    assert_eq!(all_supports(&model, &t), vec![0.5]);
    assert_eq!(all_supports(&model, &x[0]), vec![0.2]);
    assert_eq!(all_supports(&model, &x[1]), vec![0.4]);
    assert_eq!(
        model.support_labels(&t).unwrap(),
        LabelSet::from([SupportLabel::UserDefined])
    );
    assert_eq!(model.parameter_values(&y0).unwrap(), &[0.5, 0.2, 0.4]);
    assert_eq!(model.infinite_variable_ref(&y0).unwrap(), y);
    assert_eq!(model.dependents_of(&y, DependentKind::PointVariable).unwrap(), vec![y0]);
    assert!(model.parameter_refs(&y0).unwrap().is_empty());
}

#[test]
fn test_point_variable_outside_domain_changes_nothing() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let s = interval_param(&mut model, "s", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t, s]);

    assert!(matches!(
        model.insert_variable(PointVariable::new(y, vec![0.5, 3.0]), "bad"),
        Err(ModelError::OutOfDomain { .. })
    ));
    assert_eq!(
        model
            .insert_variable(PointVariable::new(y, vec![0.5]), "short")
            .unwrap_err(),
        ModelError::DimensionMismatch {
            expected: 2,
            found: 1
        }
    );
    assert_eq!(model.num_supports(&t).unwrap(), 0);
    assert!(model.dependents_of(&y, DependentKind::PointVariable).unwrap().is_empty());
}

#[test]
fn test_reduced_variable_drops_fixed_positions() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let s = interval_param(&mut model, "s", 0.0, 5.0);
    let y = infinite_var(&mut model, "y", &[t, s]);

    let yr = model
        .insert_variable(ReducedVariable::new(y, BTreeMap::from([(0, 0.5)])), "yr")
        .unwrap();

    assert_eq!(model.parameter_refs(&yr).unwrap(), vec![s]);
    assert_eq!(model.infinite_variable_ref(&yr).unwrap(), y);
    assert_eq!(model.dependents_of(&y, DependentKind::ReducedVariable).unwrap(), vec![yr]);
    assert_eq!(model.infinite_parameters_of(&Expression::from(yr)).unwrap(), vec![s]);
}

#[test]
fn test_reduced_variable_positions_and_values_are_checked() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);

    assert_eq!(
        model
            .insert_variable(ReducedVariable::new(y, BTreeMap::from([(1, 0.5)])), "yr")
            .unwrap_err(),
        ModelError::DimensionMismatch {
            expected: 1,
            found: 2
        }
    );
    assert!(matches!(
        model.insert_variable(ReducedVariable::new(y, BTreeMap::from([(0, 2.0)])), "yr"),
        Err(ModelError::OutOfDomain { .. })
    ));
    assert!(matches!(
        model.insert_variable(ReducedVariable::new(y, BTreeMap::new()), "yr"),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn test_info_creates_info_constraints() {
    let mut model = InfiniteModel::new();
    let info = VariableInfo::new()
        .with_lower_bound(0.0)
        .with_upper_bound(10.0)
        .with_integrality(Integrality::Integer);

    let z = model
        .insert_variable(HoldVariable::new().with_info(info), "z")
        .unwrap();

    assert_eq!(model.num_constraints(), 3);
    let lower = model
        .info_constraint(&z, InfoConstraintKind::LowerBound)
        .unwrap()
        .unwrap();
    assert!(model.is_info_constraint(&lower).unwrap());
    assert_eq!(model.constraint(&lower).unwrap().set(), &ConstraintSet::GreaterThan(0.0));
    assert_eq!(model.constraint(&lower).unwrap().expression(), &Expression::Reference(z));
    assert_eq!(model.name(&lower).unwrap(), "");
    assert!(model
        .info_constraint(&z, InfoConstraintKind::Fix)
        .unwrap()
        .is_none());
    assert!(model.is_used_by_constraint(&z).unwrap());
}

#[test]
fn test_bound_updates_reuse_info_constraint() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");

    model.set_lower_bound(&z, 1.0).unwrap();
    let first = model
        .info_constraint(&z, InfoConstraintKind::LowerBound)
        .unwrap();
    model.set_lower_bound(&z, 2.0).unwrap();
    let second = model
        .info_constraint(&z, InfoConstraintKind::LowerBound)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(model.variable_info(&z).unwrap().lower_bound, Some(2.0));
    assert_eq!(
        model.constraint(&second.unwrap()).unwrap().set(),
        &ConstraintSet::GreaterThan(2.0)
    );
    assert_eq!(model.num_constraints(), 1);
}

#[test]
fn test_delete_bound_removes_info_constraint() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    model.set_upper_bound(&z, 4.0).unwrap();
    let c = model
        .info_constraint(&z, InfoConstraintKind::UpperBound)
        .unwrap()
        .unwrap();

    model.delete_upper_bound(&z).unwrap();

    assert!(!model.is_valid(&c));
    assert_eq!(model.variable_info(&z).unwrap().upper_bound, None);
    assert!(!model.is_used_by_constraint(&z).unwrap());
    assert!(matches!(
        model.delete_upper_bound(&z),
        Err(ModelError::NotFound(_))
    ));
}

#[test]
fn test_deleting_info_constraint_clears_info() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = model
        .insert_variable(
            InfiniteVariable::new(vec![t]).with_info(VariableInfo::new().with_fix_value(3.0)),
            "y",
        )
        .unwrap();
    let fix = model
        .info_constraint(&y, InfoConstraintKind::Fix)
        .unwrap()
        .unwrap();

    model.delete(&fix).unwrap();

    assert_eq!(model.variable_info(&y).unwrap().fix_value, None);
    assert!(model
        .info_constraint(&y, InfoConstraintKind::Fix)
        .unwrap()
        .is_none());
}

#[test]
fn test_inconsistent_bounds_are_rejected() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    model.set_upper_bound(&z, 1.0).unwrap();

    assert_eq!(
        model.set_lower_bound(&z, 2.0).unwrap_err(),
        ModelError::InvalidBounds {
            lower: 2.0,
            upper: 1.0
        }
    );
    assert!(matches!(
        model.insert_variable(
            HoldVariable::new().with_info(
                VariableInfo::new()
                    .with_lower_bound(3.0)
                    .with_upper_bound(1.0)
            ),
            "w",
        ),
        Err(ModelError::InvalidBounds { .. })
    ));
    assert_eq!(model.num_variables(), 1);
}

#[test]
fn test_fixed_variable_rejects_bounds() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    model.fix(&z, 5.0).unwrap();

    assert!(matches!(
        model.set_lower_bound(&z, 0.0),
        Err(ModelError::InvalidArgument(_))
    ));

    model.unfix(&z).unwrap();
    model.set_lower_bound(&z, 0.0).unwrap();
    assert_eq!(model.num_constraints(), 1);
}

#[test]
fn test_integrality_switches_set() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");

    model.set_integer(&z).unwrap();
    let c = model
        .info_constraint(&z, InfoConstraintKind::Integrality)
        .unwrap()
        .unwrap();
    model.set_binary(&z).unwrap();

    assert_eq!(model.constraint(&c).unwrap().set(), &ConstraintSet::ZeroOne);
    assert_eq!(model.variable_info(&z).unwrap().integrality, Integrality::Binary);

    model.unset_integrality(&z).unwrap();
    assert_eq!(model.variable_info(&z).unwrap().integrality, Integrality::Continuous);
    assert_eq!(model.num_constraints(), 0);
}

#[test]
fn test_reduced_variable_has_no_info() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let s = interval_param(&mut model, "s", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t, s]);
    let yr = model
        .insert_variable(ReducedVariable::new(y, BTreeMap::from([(1, 0.0)])), "yr")
        .unwrap();

    assert!(matches!(
        model.set_lower_bound(&yr, 0.0),
        Err(ModelError::InvalidArgument(_))
    ));
    assert!(model.variable_info(&yr).is_err());
}

#[test]
fn test_start_value_creates_no_constraint() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");

    model.set_start_value(&z, Some(1.5)).unwrap();

    assert_eq!(model.variable_info(&z).unwrap().start_value, Some(1.5));
    assert_eq!(model.num_constraints(), 0);
}

use super::*;

#[test]
fn test_lookup_by_name_per_kind() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);
    let c = model
        .insert_constraint(Constraint::new(y, ConstraintSet::LessThan(1.0)), "cap")
        .unwrap();

    assert_eq!(model.parameter_by_name("t").unwrap(), t);
    assert_eq!(model.variable_by_name("y").unwrap(), y);
    assert_eq!(model.constraint_by_name("cap").unwrap(), c);
    assert!(matches!(model.variable_by_name("t"), Err(ModelError::NotFound(_))));
}

#[test]
fn test_duplicate_names_are_ambiguous() {
    let mut model = InfiniteModel::new();
    hold_var(&mut model, "z");
    hold_var(&mut model, "z");

    assert_eq!(
        model.variable_by_name("z").unwrap_err(),
        ModelError::AmbiguousName("z".to_string())
    );
}

#[test]
fn test_rename_refreshes_lookup() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    assert_eq!(model.variable_by_name("z").unwrap(), z);

    model.set_name(&z, "speed").unwrap();

    assert_eq!(model.name(&z).unwrap(), "speed");
    assert_eq!(model.variable_by_name("speed").unwrap(), z);
    assert!(model.variable_by_name("z").is_err());
}

#[test]
fn test_delete_refreshes_lookup() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    let w = hold_var(&mut model, "z");
    assert!(model.variable_by_name("z").is_err());

    model.delete(&z).unwrap();

    assert_eq!(model.variable_by_name("z").unwrap(), w);
}

#[test]
fn test_group_members_have_indexed_names() {
    let mut model = InfiniteModel::new();
    let (group, x) = unit_group(&mut model, "x", 2);

    assert_eq!(model.name(&group).unwrap(), "x");
    assert_eq!(model.name(&x[1]).unwrap(), "x[1]");
    assert_eq!(model.parameter_by_name("x").unwrap(), group);
    assert_eq!(model.parameter_by_name("x[0]").unwrap(), x[0]);

    model.set_name(&x[0], "pos").unwrap();
    assert_eq!(model.parameter_by_name("pos").unwrap(), x[0]);
    assert_eq!(model.name(&group).unwrap(), "x");
}

#[test]
fn test_info_constraints_are_unnamed() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    model.set_lower_bound(&z, 0.0).unwrap();

    assert_eq!(model.num_constraints(), 1);
    assert!(matches!(model.constraint_by_name(""), Err(ModelError::NotFound(_))));
}

#[test]
fn test_concrete_reference_renames() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    let concrete = model.resolve(&z).unwrap();

    concrete.set_name(&mut model, "w").unwrap();

    assert_eq!(concrete.name(&model).unwrap(), "w");
}

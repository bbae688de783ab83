use super::*;

#[test]
fn test_objective_defaults_to_feasibility() {
    let model = InfiniteModel::new();

    assert_eq!(model.objective_sense(), ObjectiveSense::Feasibility);
    assert_eq!(model.objective_function(), &Expression::Constant(0.0));
}

#[test]
fn test_objective_must_be_finite() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);

    assert!(matches!(
        model.set_objective(ObjectiveSense::Minimize, y),
        Err(ModelError::NotFinite(_))
    ));
    assert!(matches!(
        model.set_objective(ObjectiveSense::Minimize, t),
        Err(ModelError::NotFinite(_))
    ));
    assert_eq!(model.objective_sense(), ObjectiveSense::Feasibility);
    assert!(!model.is_used_by_objective(&y).unwrap());
}

#[test]
fn test_point_variables_and_measures_are_finite() {
    let mut model = InfiniteModel::new();
    let t = interval_param(&mut model, "t", 0.0, 1.0);
    let y = infinite_var(&mut model, "y", &[t]);
    let y0 = model
        .insert_variable(PointVariable::new(y, vec![0.0]), "y0")
        .unwrap();
    let m = model
        .insert_measure(Measure::new(y, trapezoid(t, quadrature())), "int_y")
        .unwrap();

    model
        .set_objective(
            ObjectiveSense::Minimize,
            AffineExpr::new(vec![(1.0, y0), (2.0, m)], 3.0),
        )
        .unwrap();

    assert!(model.is_used_by_objective(&y0).unwrap());
    assert!(model.is_used_by_objective(&m).unwrap());
    assert!(!model.is_used_by_objective(&y).unwrap());
    assert!(model.is_used(&y0).unwrap());
}

#[test]
fn test_replacing_objective_moves_flags() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    let w = hold_var(&mut model, "w");

    model.set_objective(ObjectiveSense::Maximize, z).unwrap();
    model.set_objective_function(w).unwrap();

    assert!(!model.is_used_by_objective(&z).unwrap());
    assert!(model.is_used_by_objective(&w).unwrap());
    assert_eq!(model.objective_sense(), ObjectiveSense::Maximize);
}

#[test]
fn test_objective_views_widen_but_never_narrow() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    let w = hold_var(&mut model, "w");

    model.set_objective(ObjectiveSense::Minimize, z).unwrap();
    assert_eq!(model.objective_function_as::<GeneralRef>().unwrap(), z);
    assert_eq!(
        model.objective_function_as::<AffineExpr>().unwrap(),
        AffineExpr::new(vec![(1.0, z)], 0.0)
    );

    let quad = QuadExpr::new(vec![(1.0, z, w)], AffineExpr::default());
    model.set_objective_function(quad.clone()).unwrap();
    assert_eq!(model.objective_function_as::<QuadExpr>().unwrap(), quad);
    assert_eq!(
        model.objective_function_as::<AffineExpr>().unwrap_err(),
        ModelError::TypeMismatch {
            found: "quadratic",
            requested: "affine"
        }
    );
}

#[test]
fn test_deleting_variable_drops_objective_terms() {
    let mut model = InfiniteModel::new();
    let z = hold_var(&mut model, "z");
    let w = hold_var(&mut model, "w");
    let v = hold_var(&mut model, "v");
    let quad = QuadExpr::new(
        vec![(1.0, z, w)],
        AffineExpr::new(vec![(2.0, v)], 1.0),
    );
    model.set_objective(ObjectiveSense::Minimize, quad).unwrap();

    model.delete(&z).unwrap();

    assert!(!model.is_used_by_objective(&w).unwrap());
    assert!(model.is_used_by_objective(&v).unwrap());
    assert_eq!(
        model.objective_function(),
        &Expression::Quadratic(QuadExpr::new(
            Vec::new(),
            AffineExpr::new(vec![(2.0, v)], 1.0)
        ))
    );
}

#[test]
fn test_objective_rejects_group_reference() {
    let mut model = InfiniteModel::new();
    let (group, _) = unit_group(&mut model, "x", 2);

    assert!(matches!(
        model.set_objective(ObjectiveSense::Minimize, group),
        Err(ModelError::InvalidArgument(_))
    ));
}

//! Decision variable kinds.

use std::collections::BTreeMap;

use crate::bounds::ParameterBounds;
use crate::reference::GeneralRef;

/// Integrality restriction of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Integrality {
    #[default]
    Continuous,
    Integer,
    Binary,
}

/// Standard variable metadata.
///
/// Bounds, fix value and integrality are mirrored by info constraints once
/// the variable is inserted into a model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableInfo {
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub fix_value: Option<f64>,
    pub start_value: Option<f64>,
    pub integrality: Integrality,
}

impl VariableInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lower_bound(mut self, value: f64) -> Self {
        self.lower_bound = Some(value);
        self
    }

    pub fn with_upper_bound(mut self, value: f64) -> Self {
        self.upper_bound = Some(value);
        self
    }

    pub fn with_fix_value(mut self, value: f64) -> Self {
        self.fix_value = Some(value);
        self
    }

    pub fn with_start_value(mut self, value: f64) -> Self {
        self.start_value = Some(value);
        self
    }

    pub fn with_integrality(mut self, integrality: Integrality) -> Self {
        self.integrality = integrality;
        self
    }
}

/// Variable defined over a tuple of infinite parameters.
///
/// Parameters of one dependent group must appear together, complete and in
/// group order.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteVariable {
    pub(crate) info: VariableInfo,
    pub(crate) parameter_refs: Vec<GeneralRef>,
}

impl InfiniteVariable {
    pub fn new(parameter_refs: Vec<GeneralRef>) -> Self {
        Self {
            info: VariableInfo::default(),
            parameter_refs,
        }
    }

    pub fn with_info(mut self, info: VariableInfo) -> Self {
        self.info = info;
        self
    }

    pub fn info(&self) -> &VariableInfo {
        &self.info
    }

    pub fn parameter_refs(&self) -> &[GeneralRef] {
        &self.parameter_refs
    }
}

/// Infinite variable with some tuple positions fixed to values.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedVariable {
    pub(crate) infinite_variable: GeneralRef,
    pub(crate) eval_supports: BTreeMap<usize, f64>,
}

impl ReducedVariable {
    /// `eval_supports` maps tuple positions to fixed values.
    pub fn new(infinite_variable: GeneralRef, eval_supports: BTreeMap<usize, f64>) -> Self {
        Self {
            infinite_variable,
            eval_supports,
        }
    }

    pub fn infinite_variable(&self) -> GeneralRef {
        self.infinite_variable
    }

    pub fn eval_supports(&self) -> &BTreeMap<usize, f64> {
        &self.eval_supports
    }
}

/// Infinite variable evaluated at one fully specified point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointVariable {
    pub(crate) info: VariableInfo,
    pub(crate) infinite_variable: GeneralRef,
    pub(crate) parameter_values: Vec<f64>,
}

impl PointVariable {
    /// `parameter_values` holds one value per tuple position of the
    /// infinite variable.
    pub fn new(infinite_variable: GeneralRef, parameter_values: Vec<f64>) -> Self {
        Self {
            info: VariableInfo::default(),
            infinite_variable,
            parameter_values,
        }
    }

    pub fn with_info(mut self, info: VariableInfo) -> Self {
        self.info = info;
        self
    }

    pub fn info(&self) -> &VariableInfo {
        &self.info
    }

    pub fn infinite_variable(&self) -> GeneralRef {
        self.infinite_variable
    }

    pub fn parameter_values(&self) -> &[f64] {
        &self.parameter_values
    }
}

/// Finite variable, optionally held over a parameter sub-rectangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldVariable {
    pub(crate) info: VariableInfo,
    pub(crate) parameter_bounds: ParameterBounds,
}

impl HoldVariable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(mut self, info: VariableInfo) -> Self {
        self.info = info;
        self
    }

    pub fn with_parameter_bounds(mut self, bounds: ParameterBounds) -> Self {
        self.parameter_bounds = bounds;
        self
    }

    pub fn info(&self) -> &VariableInfo {
        &self.info
    }

    pub fn parameter_bounds(&self) -> &ParameterBounds {
        &self.parameter_bounds
    }
}

/// Any variable accepted by `insert_variable`.
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Infinite(InfiniteVariable),
    Reduced(ReducedVariable),
    Point(PointVariable),
    Hold(HoldVariable),
}

impl Variable {
    /// Info of the variable; reduced variables have none of their own.
    pub fn info(&self) -> Option<&VariableInfo> {
        match self {
            Variable::Infinite(v) => Some(&v.info),
            Variable::Reduced(_) => None,
            Variable::Point(v) => Some(&v.info),
            Variable::Hold(v) => Some(&v.info),
        }
    }
}

impl From<InfiniteVariable> for Variable {
    fn from(var: InfiniteVariable) -> Self {
        Variable::Infinite(var)
    }
}

impl From<ReducedVariable> for Variable {
    fn from(var: ReducedVariable) -> Self {
        Variable::Reduced(var)
    }
}

impl From<PointVariable> for Variable {
    fn from(var: PointVariable) -> Self {
        Variable::Point(var)
    }
}

impl From<HoldVariable> for Variable {
    fn from(var: HoldVariable) -> Self {
        Variable::Hold(var)
    }
}

//! Measures: discrete approximations of integrals over infinite parameters.
//!
//! Coefficients, support points and the weight callback are stored as given
//! and never interpreted here; transcription consumes them.

use std::fmt;
use std::sync::Arc;

use crate::error::{ModelError, Result};
use crate::expression::Expression;
use crate::parameter::SupportLabel;
use crate::reference::GeneralRef;

/// Maps one support point (one value per integrated parameter) to a weight.
pub type WeightFunction = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// How an integral is approximated.
///
/// # Example
///
/// ```
/// use infopt_core::measure::MeasureData;
/// use infopt_core::parameter::SupportLabel;
/// use infopt_core::reference::{GeneralRef, RefKind};
/// # use infopt_core::model::InfiniteModel;
/// # let model = InfiniteModel::new();
/// let t = GeneralRef::new(model.id(), RefKind::IndependentParameter, 1, None);
///
/// // Trapezoid rule over two points.
/// let data = MeasureData::new(
///     vec![t],
///     vec![0.5, 0.5],
///     vec![vec![0.0], vec![1.0]],
///     SupportLabel::Custom("trapezoid".to_string()),
///     "integral",
/// )
/// .unwrap();
///
/// assert_eq!(data.num_points(), 2);
/// assert_eq!(data.weight(&[0.3]), 1.0);
/// ```
#[derive(Clone)]
pub struct MeasureData {
    parameter_refs: Vec<GeneralRef>,
    coefficients: Vec<f64>,
    supports: Vec<Vec<f64>>,
    label: SupportLabel,
    name: String,
    weight_function: WeightFunction,
}

impl MeasureData {
    /// Creates measure data with a unit weight function.
    ///
    /// `supports` holds one point per coefficient; each point holds one
    /// value per entry of `parameter_refs`.
    pub fn new(
        parameter_refs: Vec<GeneralRef>,
        coefficients: Vec<f64>,
        supports: Vec<Vec<f64>>,
        label: SupportLabel,
        name: impl Into<String>,
    ) -> Result<Self> {
        if parameter_refs.is_empty() {
            return Err(ModelError::InvalidArgument(
                "a measure must integrate over at least one parameter".to_string(),
            ));
        }
        if supports.len() != coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: coefficients.len(),
                found: supports.len(),
            });
        }
        if let Some(point) = supports.iter().find(|p| p.len() != parameter_refs.len()) {
            return Err(ModelError::DimensionMismatch {
                expected: parameter_refs.len(),
                found: point.len(),
            });
        }
        Ok(Self {
            parameter_refs,
            coefficients,
            supports,
            label,
            name: name.into(),
            weight_function: Arc::new(|_| 1.0),
        })
    }

    /// Replaces the weight function.
    pub fn with_weight_function(
        mut self,
        weight: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.weight_function = Arc::new(weight);
        self
    }

    /// Parameters integrated over.
    pub fn parameter_refs(&self) -> &[GeneralRef] {
        &self.parameter_refs
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Support points, one per coefficient.
    pub fn supports(&self) -> &[Vec<f64>] {
        &self.supports
    }

    pub fn num_points(&self) -> usize {
        self.coefficients.len()
    }

    /// Label carried by the supports realizing this measure.
    pub fn label(&self) -> &SupportLabel {
        &self.label
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the weight function at `point`.
    pub fn weight(&self, point: &[f64]) -> f64 {
        (self.weight_function)(point)
    }

    pub fn weight_function(&self) -> &WeightFunction {
        &self.weight_function
    }
}

impl fmt::Debug for MeasureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasureData")
            .field("name", &self.name)
            .field("parameter_refs", &self.parameter_refs)
            .field("coefficients", &self.coefficients)
            .field("supports", &self.supports)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Expression integrated according to [`MeasureData`].
#[derive(Debug, Clone)]
pub struct Measure {
    pub(crate) expression: Expression,
    pub(crate) data: MeasureData,
}

impl Measure {
    pub fn new(expression: impl Into<Expression>, data: MeasureData) -> Self {
        Self {
            expression: expression.into(),
            data,
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn data(&self) -> &MeasureData {
        &self.data
    }
}

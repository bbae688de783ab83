//! Infinite and finite parameters.
//!
//! - [`IndependentParameter`]: scalar parameter with its own supports
//! - [`DependentParameters`]: fixed-size group sharing one support set
//! - [`FiniteParameter`]: constant substituted wherever referenced

mod support;

pub use support::{
    ColumnSupports, LabelSet, ScalarSupports, SupportColumns, SupportFilter, SupportLabel,
    Supports,
};

pub(crate) use support::round_significant;

use crate::domain::{InfiniteArrayDomain, InfiniteScalarDomain};
use crate::error::{ModelError, Result};

/// Significant digits used until a model applies its configured value.
pub const DEFAULT_SIGNIFICANT_DIGITS: u32 = 12;

/// Scalar infinite parameter.
///
/// # Example
///
/// ```
/// use infopt_core::domain::IntervalDomain;
/// use infopt_core::parameter::{IndependentParameter, SupportFilter, SupportLabel};
///
/// let t = IndependentParameter::new(IntervalDomain::new(0.0, 10.0).unwrap())
///     .with_supports([0.0, 5.0, 10.0, 5.0], SupportLabel::UserDefined)
///     .unwrap();
///
/// assert_eq!(t.num_supports(), 3);
/// let all: Vec<f64> = t.supports(SupportFilter::All).collect();
/// assert_eq!(all, vec![0.0, 5.0, 10.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndependentParameter {
    domain: InfiniteScalarDomain,
    supports: ScalarSupports,
    significant_digits: Option<u32>,
}

impl IndependentParameter {
    /// Creates a parameter over `domain` with no supports.
    pub fn new(domain: impl Into<InfiniteScalarDomain>) -> Self {
        Self {
            domain: domain.into(),
            supports: ScalarSupports::new(),
            significant_digits: None,
        }
    }

    /// Fixes the rounding precision instead of using the model default.
    pub fn with_significant_digits(mut self, digits: u32) -> Self {
        self.significant_digits = Some(digits.clamp(1, infopt_config::MAX_SIGNIFICANT_DIGITS));
        self
    }

    /// Adds supports before the parameter is inserted into a model.
    pub fn with_supports(
        mut self,
        values: impl IntoIterator<Item = f64>,
        label: SupportLabel,
    ) -> Result<Self> {
        let checked = values
            .into_iter()
            .map(|v| self.check_value(v, "parameter"))
            .collect::<Result<Vec<_>>>()?;
        for value in checked {
            self.supports.insert(value, label.clone());
        }
        Ok(self)
    }

    pub fn domain(&self) -> &InfiniteScalarDomain {
        &self.domain
    }

    pub fn significant_digits(&self) -> u32 {
        self.significant_digits
            .unwrap_or(DEFAULT_SIGNIFICANT_DIGITS)
    }

    /// Supports passing `filter`, ascending.
    pub fn supports(&self, filter: SupportFilter) -> Supports<'_> {
        self.supports.iter(filter)
    }

    /// Number of distinct supports.
    pub fn num_supports(&self) -> usize {
        self.supports.len()
    }

    pub fn support_storage(&self) -> &ScalarSupports {
        &self.supports
    }

    /// Applies the model default precision unless one was chosen explicitly.
    pub(crate) fn adopt_significant_digits(&mut self, digits: u32) {
        if self.significant_digits.is_none() {
            self.significant_digits = Some(digits);
            let values: Vec<(f64, LabelSet)> = self
                .supports
                .values()
                .filter_map(|v| self.supports.labels_at(v).map(|l| (v, l.clone())))
                .collect();
            self.supports.clear();
            for (value, labels) in values {
                let rounded = round_significant(value, digits);
                for label in labels {
                    self.supports.insert(rounded, label);
                }
            }
        }
    }

    /// Checks `value` against the domain and rounds it, staying inside the
    /// domain bounds.
    pub(crate) fn check_value(&self, value: f64, who: &str) -> Result<f64> {
        if value.is_nan() || !self.domain.contains(value) {
            return Err(ModelError::OutOfDomain {
                parameter: who.to_string(),
                value,
            });
        }
        let bounds = self.domain.bounds();
        let rounded = round_significant(value, self.significant_digits());
        Ok(rounded.clamp(bounds.lower(), bounds.upper()))
    }

    pub(crate) fn supports_mut(&mut self) -> &mut ScalarSupports {
        &mut self.supports
    }

    pub(crate) fn set_domain(&mut self, domain: InfiniteScalarDomain) {
        self.domain = domain;
    }
}

/// Group of infinite parameters sharing one support set.
#[derive(Debug, Clone, PartialEq)]
pub struct DependentParameters {
    domain: InfiniteArrayDomain,
    supports: ColumnSupports,
    significant_digits: Option<u32>,
}

impl DependentParameters {
    /// Creates a group characterized by `domain`; its dimension fixes the
    /// group size.
    pub fn new(domain: impl Into<InfiniteArrayDomain>) -> Self {
        let domain = domain.into();
        let supports = ColumnSupports::new(domain.dimension());
        Self {
            domain,
            supports,
            significant_digits: None,
        }
    }

    /// Fixes the rounding precision instead of using the model default.
    pub fn with_significant_digits(mut self, digits: u32) -> Self {
        self.significant_digits = Some(digits.clamp(1, infopt_config::MAX_SIGNIFICANT_DIGITS));
        self
    }

    pub fn domain(&self) -> &InfiniteArrayDomain {
        &self.domain
    }

    /// Number of parameters in the group.
    pub fn dimension(&self) -> usize {
        self.domain.dimension()
    }

    pub fn significant_digits(&self) -> u32 {
        self.significant_digits
            .unwrap_or(DEFAULT_SIGNIFICANT_DIGITS)
    }

    /// Number of support columns; identical for every parameter of the group.
    pub fn num_supports(&self) -> usize {
        self.supports.len()
    }

    /// Support columns passing `filter`, in insertion order.
    pub fn support_columns(&self, filter: SupportFilter) -> SupportColumns<'_> {
        self.supports.columns(filter)
    }

    /// Supports of parameter `param` passing `filter`, in column order.
    pub fn supports(&self, param: usize, filter: SupportFilter) -> Supports<'_> {
        self.supports.row(param, filter)
    }

    pub fn support_storage(&self) -> &ColumnSupports {
        &self.supports
    }

    pub(crate) fn adopt_significant_digits(&mut self, digits: u32) {
        if self.significant_digits.is_none() {
            self.significant_digits = Some(digits);
        }
    }

    /// Checks arity and each coordinate against the domain, then rounds.
    pub(crate) fn check_column(&self, column: &[f64], who: &str) -> Result<Vec<f64>> {
        if column.len() != self.dimension() {
            return Err(ModelError::DimensionMismatch {
                expected: self.dimension(),
                found: column.len(),
            });
        }
        if let Some((dim, value)) = self.domain.first_violation(column) {
            return Err(ModelError::OutOfDomain {
                parameter: format!("{who}[{dim}]"),
                value,
            });
        }
        let digits = self.significant_digits();
        Ok(column
            .iter()
            .enumerate()
            .map(|(dim, v)| {
                let rounded = round_significant(*v, digits);
                match self.domain.bounds(dim) {
                    Some(b) => rounded.clamp(b.lower(), b.upper()),
                    None => rounded,
                }
            })
            .collect())
    }

    pub(crate) fn supports_mut(&mut self) -> &mut ColumnSupports {
        &mut self.supports
    }

    pub(crate) fn set_domain(&mut self, domain: InfiniteArrayDomain) {
        self.domain = domain;
    }
}

/// Parameter with one fixed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteParameter {
    value: f64,
}

impl FiniteParameter {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }
}

/// Any single parameter accepted by `insert_parameter`.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Independent(IndependentParameter),
    Finite(FiniteParameter),
}

impl From<IndependentParameter> for Parameter {
    fn from(param: IndependentParameter) -> Self {
        Parameter::Independent(param)
    }
}

impl From<FiniteParameter> for Parameter {
    fn from(param: FiniteParameter) -> Self {
        Parameter::Finite(param)
    }
}

/// Characterizing set of a parameter, as returned by `parameter_set`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterSet<'a> {
    Scalar(&'a InfiniteScalarDomain),
    Array(&'a InfiniteArrayDomain),
}

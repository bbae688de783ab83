use crate::error::{ModelError, Result};

/// Closed interval `[lower, upper]`.
///
/// Used both as a parameter domain and as a parameter-bounds restriction.
/// Endpoints may be infinite; `lower <= upper` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalDomain {
    lower: f64,
    upper: f64,
}

impl IntervalDomain {
    /// Creates an interval; fails with `InvalidBounds` if `lower > upper` or
    /// either endpoint is NaN.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(ModelError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// The whole real line.
    pub fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// A degenerate interval holding exactly one value.
    pub fn point(value: f64) -> Result<Self> {
        Self::new(value, value)
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns true if `value` lies within the interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Returns true if both endpoints are finite.
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// The tighter interval common to both, or `None` if they do not overlap.
    pub fn intersect(&self, other: &IntervalDomain) -> Option<IntervalDomain> {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        (lower <= upper).then_some(IntervalDomain { lower, upper })
    }

    /// `num` equally spaced values from `lower` to `upper` inclusive.
    pub(crate) fn uniform_grid(&self, num: usize) -> Result<Vec<f64>> {
        if !self.is_finite() {
            return Err(ModelError::InvalidArgument(format!(
                "cannot build a uniform grid over [{}, {}]",
                self.lower, self.upper
            )));
        }
        Ok(match num {
            0 => Vec::new(),
            1 => vec![(self.lower + self.upper) / 2.0],
            _ => {
                let step = (self.upper - self.lower) / (num - 1) as f64;
                (0..num)
                    .map(|i| {
                        if i == num - 1 {
                            self.upper
                        } else {
                            self.lower + step * i as f64
                        }
                    })
                    .collect()
            }
        })
    }
}

use rand::Rng;

use super::IntervalDomain;
use crate::error::{ModelError, Result};

/// Distribution characterizing a random scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnivariateDistribution {
    Uniform { lower: f64, upper: f64 },
    Normal { mean: f64, std_dev: f64 },
}

impl UnivariateDistribution {
    /// Uniform distribution over `[lower, upper]`.
    pub fn uniform(lower: f64, upper: f64) -> Result<Self> {
        IntervalDomain::new(lower, upper)?;
        if !(lower.is_finite() && upper.is_finite()) {
            return Err(ModelError::InvalidArgument(
                "uniform distribution needs finite bounds".to_string(),
            ));
        }
        Ok(UnivariateDistribution::Uniform { lower, upper })
    }

    /// Normal distribution; `std_dev` must be positive.
    pub fn normal(mean: f64, std_dev: f64) -> Result<Self> {
        if !(std_dev > 0.0) || !mean.is_finite() || !std_dev.is_finite() {
            return Err(ModelError::InvalidArgument(format!(
                "normal distribution needs a finite mean and positive std_dev, got ({mean}, {std_dev})"
            )));
        }
        Ok(UnivariateDistribution::Normal { mean, std_dev })
    }

    /// The interval containing every value the distribution can produce.
    pub fn support_bounds(&self) -> IntervalDomain {
        match *self {
            UnivariateDistribution::Uniform { lower, upper } => {
                IntervalDomain::new(lower, upper).unwrap_or_else(|_| IntervalDomain::unbounded())
            }
            UnivariateDistribution::Normal { .. } => IntervalDomain::unbounded(),
        }
    }

    /// Draws one sample.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            UnivariateDistribution::Uniform { lower, upper } => {
                if lower == upper {
                    lower
                } else {
                    rng.random_range(lower..=upper)
                }
            }
            UnivariateDistribution::Normal { mean, std_dev } => {
                mean + std_dev * standard_normal(rng)
            }
        }
    }
}

/// Distribution characterizing a dependent parameter group.
#[derive(Debug, Clone, PartialEq)]
pub enum JointDistribution {
    /// Independent marginals, one per parameter.
    Independent(Vec<UnivariateDistribution>),
    /// Multivariate normal with full covariance.
    MultivariateNormal(MultivariateNormal),
}

impl JointDistribution {
    /// Number of parameters the distribution covers.
    pub fn dimension(&self) -> usize {
        match self {
            JointDistribution::Independent(marginals) => marginals.len(),
            JointDistribution::MultivariateNormal(mvn) => mvn.mean.len(),
        }
    }

    /// Support bounds of dimension `dim`.
    pub fn support_bounds(&self, dim: usize) -> Option<IntervalDomain> {
        match self {
            JointDistribution::Independent(marginals) => {
                marginals.get(dim).map(|m| m.support_bounds())
            }
            JointDistribution::MultivariateNormal(mvn) => {
                (dim < mvn.mean.len()).then(IntervalDomain::unbounded)
            }
        }
    }

    /// Draws one sample column.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        match self {
            JointDistribution::Independent(marginals) => {
                marginals.iter().map(|m| m.sample(rng)).collect()
            }
            JointDistribution::MultivariateNormal(mvn) => mvn.sample(rng),
        }
    }
}

/// Multivariate normal distribution.
///
/// The lower Cholesky factor of the covariance is computed at construction
/// and used for sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct MultivariateNormal {
    mean: Vec<f64>,
    covariance: Vec<Vec<f64>>,
    cholesky: Vec<Vec<f64>>,
}

impl MultivariateNormal {
    /// Creates the distribution; `covariance` must be square, match `mean`
    /// and be symmetric positive definite.
    pub fn new(mean: Vec<f64>, covariance: Vec<Vec<f64>>) -> Result<Self> {
        let n = mean.len();
        if n == 0 {
            return Err(ModelError::InvalidArgument(
                "multivariate normal needs at least one dimension".to_string(),
            ));
        }
        if covariance.len() != n {
            return Err(ModelError::DimensionMismatch {
                expected: n,
                found: covariance.len(),
            });
        }
        if let Some(row) = covariance.iter().find(|row| row.len() != n) {
            return Err(ModelError::DimensionMismatch {
                expected: n,
                found: row.len(),
            });
        }
        let cholesky = cholesky(&covariance).ok_or_else(|| {
            ModelError::InvalidArgument(
                "covariance must be symmetric positive definite".to_string(),
            )
        })?;
        Ok(Self {
            mean,
            covariance,
            cholesky,
        })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn covariance(&self) -> &[Vec<f64>] {
        &self.covariance
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let z: Vec<f64> = self.mean.iter().map(|_| standard_normal(rng)).collect();
        self.mean
            .iter()
            .zip(&self.cholesky)
            .map(|(mu, row)| mu + row.iter().zip(&z).map(|(l, zi)| l * zi).sum::<f64>())
            .collect()
    }
}

impl From<MultivariateNormal> for JointDistribution {
    fn from(mvn: MultivariateNormal) -> Self {
        JointDistribution::MultivariateNormal(mvn)
    }
}

fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            if (a[i][j] - a[j][i]).abs() > 1e-12 * (1.0 + a[i][j].abs()) {
                return None;
            }
            let partial: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                let diag = a[i][i] - partial;
                if diag <= 0.0 {
                    return None;
                }
                l[i][j] = diag.sqrt();
            } else {
                l[i][j] = (a[i][j] - partial) / l[j][j];
            }
        }
    }
    Some(l)
}

// Box-Muller transform.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

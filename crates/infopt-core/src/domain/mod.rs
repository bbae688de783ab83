//! Characterizing sets of infinite parameters.
//!
//! - [`IntervalDomain`]: closed interval, endpoints may be infinite
//! - [`UnivariateDistribution`]: distribution of a scalar parameter
//! - [`JointDistribution`]: distribution of a dependent parameter group
//! - [`InfiniteScalarDomain`] / [`InfiniteArrayDomain`]: what a scalar
//!   parameter or a dependent group is defined over

mod distribution;
mod interval;

pub use distribution::{JointDistribution, MultivariateNormal, UnivariateDistribution};
pub use interval::IntervalDomain;

use rand::Rng;

use crate::error::{ModelError, Result};

/// Set characterizing a scalar infinite parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum InfiniteScalarDomain {
    Interval(IntervalDomain),
    Distribution(UnivariateDistribution),
}

impl InfiniteScalarDomain {
    /// Smallest value of the domain (may be `-inf`).
    pub fn lower_bound(&self) -> f64 {
        match self {
            InfiniteScalarDomain::Interval(interval) => interval.lower(),
            InfiniteScalarDomain::Distribution(dist) => dist.support_bounds().lower(),
        }
    }

    /// Largest value of the domain (may be `inf`).
    pub fn upper_bound(&self) -> f64 {
        match self {
            InfiniteScalarDomain::Interval(interval) => interval.upper(),
            InfiniteScalarDomain::Distribution(dist) => dist.support_bounds().upper(),
        }
    }

    /// The domain bounds as an interval.
    pub fn bounds(&self) -> IntervalDomain {
        match self {
            InfiniteScalarDomain::Interval(interval) => *interval,
            InfiniteScalarDomain::Distribution(dist) => dist.support_bounds(),
        }
    }

    /// Returns true if `value` belongs to the domain.
    pub fn contains(&self, value: f64) -> bool {
        self.bounds().contains(value)
    }

    /// Returns true for distribution domains.
    pub fn is_distribution(&self) -> bool {
        matches!(self, InfiniteScalarDomain::Distribution(_))
    }

    /// Generates `num` support values and the label they should carry.
    ///
    /// Intervals produce a uniform grid including both endpoints,
    /// distributions produce random samples.
    pub(crate) fn generate<R: Rng + ?Sized>(
        &self,
        num: usize,
        rng: &mut R,
    ) -> Result<(Vec<f64>, GeneratedKind)> {
        match self {
            InfiniteScalarDomain::Interval(interval) => {
                Ok((interval.uniform_grid(num)?, GeneratedKind::Grid))
            }
            InfiniteScalarDomain::Distribution(dist) => Ok((
                (0..num).map(|_| dist.sample(rng)).collect(),
                GeneratedKind::Sample,
            )),
        }
    }
}

impl From<IntervalDomain> for InfiniteScalarDomain {
    fn from(interval: IntervalDomain) -> Self {
        InfiniteScalarDomain::Interval(interval)
    }
}

impl From<UnivariateDistribution> for InfiniteScalarDomain {
    fn from(dist: UnivariateDistribution) -> Self {
        InfiniteScalarDomain::Distribution(dist)
    }
}

/// How generated supports were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GeneratedKind {
    Grid,
    Sample,
}

/// Set characterizing a dependent parameter group.
#[derive(Debug, Clone, PartialEq)]
pub enum InfiniteArrayDomain {
    /// One scalar domain per parameter of the group.
    Collection(Vec<InfiniteScalarDomain>),
    /// One joint distribution over the whole group.
    Distribution(JointDistribution),
}

impl InfiniteArrayDomain {
    /// Creates a collection domain; it must hold at least one scalar domain.
    pub fn collection(domains: Vec<InfiniteScalarDomain>) -> Result<Self> {
        if domains.is_empty() {
            return Err(ModelError::InvalidArgument(
                "a collection domain needs at least one dimension".to_string(),
            ));
        }
        Ok(InfiniteArrayDomain::Collection(domains))
    }

    /// Number of parameters the domain characterizes.
    pub fn dimension(&self) -> usize {
        match self {
            InfiniteArrayDomain::Collection(domains) => domains.len(),
            InfiniteArrayDomain::Distribution(dist) => dist.dimension(),
        }
    }

    /// Bounds of dimension `dim`.
    pub fn bounds(&self, dim: usize) -> Option<IntervalDomain> {
        match self {
            InfiniteArrayDomain::Collection(domains) => domains.get(dim).map(|d| d.bounds()),
            InfiniteArrayDomain::Distribution(dist) => dist.support_bounds(dim),
        }
    }

    /// Returns the first dimension whose value lies outside the domain.
    pub(crate) fn first_violation(&self, column: &[f64]) -> Option<(usize, f64)> {
        column
            .iter()
            .enumerate()
            .find(|(dim, value)| !self.bounds(*dim).is_some_and(|b| b.contains(**value)))
            .map(|(dim, value)| (dim, *value))
    }

    /// Generates `num` support columns and the label kind they should carry.
    pub(crate) fn generate<R: Rng + ?Sized>(
        &self,
        num: usize,
        rng: &mut R,
    ) -> Result<(Vec<Vec<f64>>, GeneratedKind)> {
        match self {
            InfiniteArrayDomain::Collection(domains) => {
                let mut rows = Vec::with_capacity(domains.len());
                let mut kind = GeneratedKind::Grid;
                for domain in domains {
                    let (values, generated) = domain.generate(num, rng)?;
                    if generated == GeneratedKind::Sample {
                        kind = GeneratedKind::Sample;
                    }
                    rows.push(values);
                }
                let columns = (0..num)
                    .map(|col| rows.iter().map(|row| row[col]).collect())
                    .collect();
                Ok((columns, kind))
            }
            InfiniteArrayDomain::Distribution(dist) => Ok((
                (0..num).map(|_| dist.sample(rng)).collect(),
                GeneratedKind::Sample,
            )),
        }
    }
}

impl From<JointDistribution> for InfiniteArrayDomain {
    fn from(dist: JointDistribution) -> Self {
        InfiniteArrayDomain::Distribution(dist)
    }
}

#[cfg(test)]
mod tests;

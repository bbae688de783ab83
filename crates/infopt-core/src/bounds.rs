//! Parameter bounds: interval restrictions of parameter space.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::domain::IntervalDomain;
use crate::error::{ModelError, Result};
use crate::reference::GeneralRef;

/// Mapping from infinite parameter to the interval it is restricted to.
///
/// Whether each key really is an infinite parameter is checked by the model
/// when the bounds are attached to a hold variable or constraint.
///
/// # Example
///
/// ```
/// use infopt_core::bounds::ParameterBounds;
/// use infopt_core::domain::IntervalDomain;
/// use infopt_core::reference::{GeneralRef, RefKind};
/// # use infopt_core::model::InfiniteModel;
/// # let model = InfiniteModel::new();
/// let p = GeneralRef::new(model.id(), RefKind::IndependentParameter, 1, None);
///
/// let a = ParameterBounds::new().with(p, 0.0, 1.0).unwrap();
/// let b = ParameterBounds::new().with(p, 0.5, 2.0).unwrap();
/// let merged = a.merge(&b).unwrap();
/// assert_eq!(merged.get(&p), Some(&IntervalDomain::new(0.5, 1.0).unwrap()));
///
/// let c = ParameterBounds::new().with(p, 2.0, 3.0).unwrap();
/// assert!(a.merge(&c).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBounds {
    intervals: BTreeMap<GeneralRef, IntervalDomain>,
}

impl ParameterBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `[lower, upper]` for `parameter`, intersecting with any existing
    /// restriction on it.
    pub fn with(mut self, parameter: GeneralRef, lower: f64, upper: f64) -> Result<Self> {
        self.restrict(parameter, IntervalDomain::new(lower, upper)?)?;
        Ok(self)
    }

    /// Adds the same restriction for every parameter of a dependent group
    /// (or any other set of parameters), one entry each.
    pub fn with_group(
        mut self,
        parameters: impl IntoIterator<Item = GeneralRef>,
        lower: f64,
        upper: f64,
    ) -> Result<Self> {
        let interval = IntervalDomain::new(lower, upper)?;
        for parameter in parameters {
            self.restrict(parameter, interval)?;
        }
        Ok(self)
    }

    /// Intersects the restriction on `parameter` with `interval`.
    pub fn restrict(&mut self, parameter: GeneralRef, interval: IntervalDomain) -> Result<()> {
        let merged = match self.intervals.get(&parameter) {
            Some(existing) => existing
                .intersect(&interval)
                .ok_or_else(|| ModelError::EmptyIntersection(parameter.to_string()))?,
            None => interval,
        };
        self.intervals.insert(parameter, merged);
        Ok(())
    }

    /// Tighter of the two per shared key; other keys pass through unchanged.
    pub fn merge(&self, other: &ParameterBounds) -> Result<ParameterBounds> {
        let mut merged = self.clone();
        for (parameter, interval) in &other.intervals {
            merged.restrict(*parameter, *interval)?;
        }
        Ok(merged)
    }

    pub fn get(&self, parameter: &GeneralRef) -> Option<&IntervalDomain> {
        self.intervals.get(parameter)
    }

    pub fn contains_key(&self, parameter: &GeneralRef) -> bool {
        self.intervals.contains_key(parameter)
    }

    pub fn remove(&mut self, parameter: &GeneralRef) -> Option<IntervalDomain> {
        self.intervals.remove(parameter)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Restricted parameters in key order.
    pub fn keys(&self) -> impl Iterator<Item = GeneralRef> + '_ {
        self.intervals.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, GeneralRef, IntervalDomain> {
        self.intervals.iter()
    }
}

impl<'a> IntoIterator for &'a ParameterBounds {
    type Item = (&'a GeneralRef, &'a IntervalDomain);
    type IntoIter = btree_map::Iter<'a, GeneralRef, IntervalDomain>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

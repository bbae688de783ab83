//! Provenance-tagged support storage.
//!
//! Scalar parameters keep a sorted map from coordinate to label set. Dependent
//! groups keep columns: one coordinate per parameter, one label set per
//! column shared by the whole group.

use std::cmp::Ordering;
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;
use std::slice;

/// Tag recording why a support exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupportLabel {
    /// Entered by the modeler (or by a point variable).
    UserDefined,
    /// Part of a uniform grid.
    UniformGrid,
    /// Monte Carlo sample drawn from a distribution.
    McSample,
    /// Sample carrying a quadrature weight.
    WeightedSample,
    /// Model-unique label produced for a measure.
    Generated(u64),
    /// Caller-defined label.
    Custom(String),
}

impl fmt::Display for SupportLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportLabel::UserDefined => write!(f, "UserDefined"),
            SupportLabel::UniformGrid => write!(f, "UniformGrid"),
            SupportLabel::McSample => write!(f, "McSample"),
            SupportLabel::WeightedSample => write!(f, "WeightedSample"),
            SupportLabel::Generated(id) => write!(f, "Generated({id})"),
            SupportLabel::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Labels attached to one support coordinate or column.
pub type LabelSet = BTreeSet<SupportLabel>;

/// Selects supports by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SupportFilter {
    /// Every support.
    #[default]
    All,
    /// Supports whose label set intersects this set.
    Labels(LabelSet),
}

impl SupportFilter {
    /// Returns true if a support with `labels` passes the filter.
    pub fn matches(&self, labels: &LabelSet) -> bool {
        match self {
            SupportFilter::All => true,
            SupportFilter::Labels(wanted) => !wanted.is_disjoint(labels),
        }
    }
}

impl From<SupportLabel> for SupportFilter {
    fn from(label: SupportLabel) -> Self {
        SupportFilter::Labels(LabelSet::from([label]))
    }
}

impl From<LabelSet> for SupportFilter {
    fn from(labels: LabelSet) -> Self {
        SupportFilter::Labels(labels)
    }
}

/// Rounds `value` to `digits` significant digits.
pub(crate) fn round_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits as i32 - 1 - magnitude;
    let factor = 10f64.powi(shift.abs());
    // Near the subnormal range the scale factor overflows; keep the value.
    if !factor.is_finite() {
        return value;
    }
    let rounded = if shift >= 0 {
        (value * factor).round() / factor
    } else {
        (value / factor).round() * factor
    };
    if !rounded.is_finite() {
        return value;
    }
    // -0.0 collapses onto 0.0 so both map to one coordinate.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Totally ordered support coordinate.
#[derive(Debug, Clone, Copy)]
struct SupportKey(f64);

impl PartialEq for SupportKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SupportKey {}

impl PartialOrd for SupportKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SupportKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Totally ordered support column, compared coordinate by coordinate.
#[derive(Debug, Clone)]
struct ColumnKey(Vec<f64>);

impl PartialEq for ColumnKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ColumnKey {}

impl PartialOrd for ColumnKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColumnKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.total_cmp(b))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| self.0.len().cmp(&other.0.len()))
    }
}

/// Sorted supports of a scalar parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarSupports {
    points: BTreeMap<SupportKey, LabelSet>,
}

impl ScalarSupports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` with `label`; returns true if the coordinate is new.
    pub(crate) fn insert(&mut self, value: f64, label: SupportLabel) -> bool {
        match self.points.entry(SupportKey(value)) {
            btree_map::Entry::Occupied(mut entry) => {
                entry.get_mut().insert(label);
                false
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(LabelSet::from([label]));
                true
            }
        }
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Labels at `value`, if it is a support.
    pub fn labels_at(&self, value: f64) -> Option<&LabelSet> {
        self.points.get(&SupportKey(value))
    }

    /// Coordinates passing `filter`, ascending.
    pub fn iter(&self, filter: SupportFilter) -> Supports<'_> {
        Supports {
            inner: SupportsInner::Scalar(self.points.iter()),
            filter,
        }
    }

    /// Every label in use.
    pub fn labels(&self) -> LabelSet {
        self.points.values().flatten().cloned().collect()
    }

    /// Strips `label` everywhere; coordinates left unlabelled are dropped.
    /// Returns the number of dropped coordinates.
    pub(crate) fn remove_label(&mut self, label: &SupportLabel) -> usize {
        let before = self.points.len();
        self.points.retain(|_, labels| {
            labels.remove(label);
            !labels.is_empty()
        });
        before - self.points.len()
    }

    pub(crate) fn clear(&mut self) {
        self.points.clear();
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.keys().map(|key| key.0)
    }
}

/// Column-wise supports of a dependent parameter group.
///
/// Every column holds exactly one coordinate per parameter, so all parameters
/// of the group always report the same support count.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSupports {
    dimension: usize,
    columns: Vec<Vec<f64>>,
    labels: Vec<LabelSet>,
    positions: BTreeMap<ColumnKey, usize>,
}

impl ColumnSupports {
    /// Creates empty storage for `dimension` parameters.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            columns: Vec::new(),
            labels: Vec::new(),
            positions: BTreeMap::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Adds a column; an identical existing column only gains `label`.
    /// Returns true if the column is new.
    ///
    /// The caller guarantees `column.len() == dimension`.
    pub(crate) fn insert(&mut self, column: Vec<f64>, label: SupportLabel) -> bool {
        debug_assert_eq!(column.len(), self.dimension);
        match self.positions.entry(ColumnKey(column)) {
            btree_map::Entry::Occupied(entry) => {
                self.labels[*entry.get()].insert(label);
                false
            }
            btree_map::Entry::Vacant(entry) => {
                self.columns.push(entry.key().0.clone());
                self.labels.push(LabelSet::from([label]));
                entry.insert(self.columns.len() - 1);
                true
            }
        }
    }

    /// Columns passing `filter`, in insertion order.
    pub fn columns(&self, filter: SupportFilter) -> SupportColumns<'_> {
        SupportColumns {
            inner: self.columns.iter().zip(self.labels.iter()),
            filter,
        }
    }

    /// Coordinates of parameter `row` passing `filter`, in column order.
    pub fn row(&self, row: usize, filter: SupportFilter) -> Supports<'_> {
        Supports {
            inner: SupportsInner::Row {
                columns: self.columns.iter().zip(self.labels.iter()),
                row,
            },
            filter,
        }
    }

    /// Every label in use.
    pub fn labels(&self) -> LabelSet {
        self.labels.iter().flatten().cloned().collect()
    }

    /// Strips `label` from every column; unlabelled columns are dropped.
    pub(crate) fn remove_label(&mut self, label: &SupportLabel) -> usize {
        let before = self.columns.len();
        let mut kept_columns = Vec::with_capacity(before);
        let mut kept_labels = Vec::with_capacity(before);
        for (column, mut labels) in self.columns.drain(..).zip(self.labels.drain(..)) {
            labels.remove(label);
            if !labels.is_empty() {
                kept_columns.push(column);
                kept_labels.push(labels);
            }
        }
        self.positions = kept_columns
            .iter()
            .enumerate()
            .map(|(pos, column)| (ColumnKey(column.clone()), pos))
            .collect();
        self.columns = kept_columns;
        self.labels = kept_labels;
        before - self.columns.len()
    }

    pub(crate) fn clear(&mut self) {
        self.columns.clear();
        self.labels.clear();
        self.positions.clear();
    }
}

#[derive(Debug, Clone)]
enum SupportsInner<'a> {
    Scalar(btree_map::Iter<'a, SupportKey, LabelSet>),
    Row {
        columns: std::iter::Zip<slice::Iter<'a, Vec<f64>>, slice::Iter<'a, LabelSet>>,
        row: usize,
    },
}

/// Lazy, restartable sequence of support coordinates.
#[derive(Debug, Clone)]
pub struct Supports<'a> {
    inner: SupportsInner<'a>,
    filter: SupportFilter,
}

impl Iterator for Supports<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let (value, labels) = match &mut self.inner {
                SupportsInner::Scalar(iter) => {
                    let (key, labels) = iter.next()?;
                    (key.0, labels)
                }
                SupportsInner::Row { columns, row } => {
                    let (column, labels) = columns.next()?;
                    (column[*row], labels)
                }
            };
            if self.filter.matches(labels) {
                return Some(value);
            }
        }
    }
}

/// Lazy, restartable sequence of support columns.
#[derive(Debug, Clone)]
pub struct SupportColumns<'a> {
    inner: std::iter::Zip<slice::Iter<'a, Vec<f64>>, slice::Iter<'a, LabelSet>>,
    filter: SupportFilter,
}

impl<'a> Iterator for SupportColumns<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<&'a [f64]> {
        self.inner
            .by_ref()
            .find(|(_, labels)| self.filter.matches(labels))
            .map(|(column, _)| column.as_slice())
    }
}

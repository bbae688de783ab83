//! Measure insertion and the supports measures contribute.

use tracing::debug;

use super::InfiniteModel;
use crate::data::{Dependent, ObjectData};
use super::dependencies::LinkTargets;
use crate::error::{ModelError, Result};
use crate::measure::{Measure, MeasureData};
use crate::parameter::SupportLabel;
use crate::reference::{GeneralRef, ObjectIndex, RefKind};

impl InfiniteModel {
    /// Inserts a measure.
    ///
    /// The integrated parameters follow the same rules as the tuple of an
    /// infinite variable. Every support point of the measure data must lie in
    /// the parameter domains; the points are added to the parameters'
    /// supports under the measure's label.
    ///
    /// The label must be `Generated` or `Custom` and must not already tag
    /// supports that no measure owns, since deleting the measure strips it.
    pub fn insert_measure(
        &mut self,
        measure: Measure,
        name: impl Into<String>,
    ) -> Result<GeneralRef> {
        let name = name.into();
        self.check_expression(&measure.expression)?;
        let params = measure.data.parameter_refs();
        self.check_parameter_tuple(params, "measure")?;
        let mut staged = Vec::with_capacity(measure.data.num_points() * params.len());
        for point in measure.data.supports() {
            staged.extend(self.stage_point(params, point)?);
        }
        let label = measure.data.label().clone();
        self.check_measure_label(&label, &self.link_targets(params)?)?;
        let mut targets = self.link_targets(&measure.expression.references())?;
        targets.extend(self.link_targets(params)?);
        let points = measure.data.num_points();

        let index = self.measures.insert(ObjectData::new(measure, name.clone()));
        self.link(&targets, Dependent::Measure(index));
        self.apply_staged(staged, &label);
        let r = self.general(ObjectIndex::Measure(index));
        debug!(
            event = "insert",
            kind = RefKind::Measure.name(),
            object = %r,
            name = %name,
            label = %label,
            points,
        );
        self.invalidate_names();
        self.touch();
        Ok(r)
    }

    /// Approximation data of a measure.
    pub fn measure_data(&self, r: &GeneralRef) -> Result<&MeasureData> {
        Ok(self.measure(r)?.data())
    }

    /// Strips the label of a removed measure from the parameters it
    /// integrated over, unless another live measure with the same label still
    /// integrates over them.
    pub(crate) fn release_measure_supports(&mut self, measure: &Measure) -> Result<()> {
        let label = measure.data.label();
        let released = self.link_targets(measure.data.parameter_refs())?;
        for target in released {
            if !self.measure_owns_label(target, label)? && self.check_live(target).is_ok() {
                let parameter = self.general(target);
                let dropped = self.strip_label_from(&parameter, label)?;
                debug!(event = "supports_release", parameter = %parameter, label = %label, dropped);
            }
        }
        Ok(())
    }

    /// Returns true if a live measure labelled `label` integrates over
    /// `target`.
    pub(crate) fn measure_owns_label(
        &self,
        target: ObjectIndex,
        label: &SupportLabel,
    ) -> Result<bool> {
        for (_, other) in self.measures.iter() {
            if other.object.data.label() == label
                && self
                    .link_targets(other.object.data.parameter_refs())?
                    .contains(&target)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_measure_label(&self, label: &SupportLabel, targets: &LinkTargets) -> Result<()> {
        if !matches!(label, SupportLabel::Generated(_) | SupportLabel::Custom(_)) {
            return Err(ModelError::InvalidArgument(format!(
                "measure supports need a generated or custom label, not {label}"
            )));
        }
        for target in targets {
            let parameter = self.general(*target);
            if self.support_labels(&parameter)?.contains(label)
                && !self.measure_owns_label(*target, label)?
            {
                return Err(ModelError::InvalidArgument(format!(
                    "label {label} already tags supports of {} outside any measure",
                    self.describe(&parameter)
                )));
            }
        }
        Ok(())
    }
}

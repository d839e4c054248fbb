/// Clinician-adjusted session parameters
use crate::error::{PlanError, Result};

/// Angle step counts and resection depth for one planning session.
///
/// Angles are stored as whole steps and only converted to radians when the
/// planes are derived, so repeated increments never accumulate float error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanParameters {
    pub varus_valgus_steps: i32,
    pub flexion_extension_steps: i32,
    /// Signed distal resection depth in mm.
    pub distal_resection_offset: f64,
}

impl PlanParameters {
    pub fn new(distal_resection_offset: f64) -> Self {
        Self {
            varus_valgus_steps: 0,
            flexion_extension_steps: 0,
            distal_resection_offset,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0)
    }

    pub fn adjust_varus_valgus(&mut self, delta: i32) {
        self.varus_valgus_steps = self.varus_valgus_steps.saturating_add(delta);
    }

    pub fn adjust_flexion_extension(&mut self, delta: i32) {
        self.flexion_extension_steps = self.flexion_extension_steps.saturating_add(delta);
    }

    pub fn adjust_distal_resection(&mut self, delta_mm: f64) -> Result<()> {
        let offset = self.distal_resection_offset + delta_mm;
        if !delta_mm.is_finite() || !offset.is_finite() {
            return Err(PlanError::NonFiniteParameter {
                parameter: "distalResectionOffset",
            });
        }
        self.distal_resection_offset = offset;
        Ok(())
    }

    /// Varus/valgus rotation in radians.
    pub fn varus_valgus_angle(&self, step_degrees: f64) -> f64 {
        (f64::from(self.varus_valgus_steps) * step_degrees).to_radians()
    }

    /// Flexion/extension rotation in radians.
    pub fn flexion_extension_angle(&self, step_degrees: f64) -> f64 {
        (f64::from(self.flexion_extension_steps) * step_degrees).to_radians()
    }
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self::zero()
    }
}

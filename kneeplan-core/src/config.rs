/// Planner configuration
use nalgebra::{Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Operand used for the anterior construction line's cross product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceAxis {
    /// Direction of the mechanical axis (femur center to hip center).
    MechanicalAxis,
    /// A fixed world direction, e.g. the scanner's superior axis.
    Fixed([f64; 3]),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Edge length reported for every plane, in mm.
    pub plane_extent: f64,
    /// Length of the anterior and lateral construction lines, in mm.
    pub construction_line_length: f64,
    pub angle_step_degrees: f64,
    /// Below this length two points do not define a direction.
    pub degenerate_epsilon: f64,
    pub reference_axis: ReferenceAxis,
    pub initial_resection_offset: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            plane_extent: 100.0,
            construction_line_length: 10.0,
            angle_step_degrees: 1.0,
            degenerate_epsilon: 1e-6,
            reference_axis: ReferenceAxis::MechanicalAxis,
            initial_resection_offset: 0.0,
        }
    }
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PlanError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("planeExtent", self.plane_extent),
            ("constructionLineLength", self.construction_line_length),
            ("angleStepDegrees", self.angle_step_degrees),
            ("degenerateEpsilon", self.degenerate_epsilon),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanError::InvalidConfig(format!(
                    "{field} must be a positive finite number, got {value}"
                )));
            }
        }

        if !self.initial_resection_offset.is_finite() {
            return Err(PlanError::InvalidConfig(
                "initialResectionOffset must be finite".to_string(),
            ));
        }

        if let ReferenceAxis::Fixed(_) = self.reference_axis {
            if self.fixed_reference().is_none() {
                return Err(PlanError::InvalidConfig(
                    "fixed reference axis must be a non-zero finite vector".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Normalized fixed reference axis, if one is configured and usable.
    pub fn fixed_reference(&self) -> Option<Unit<Vector3<f64>>> {
        match self.reference_axis {
            ReferenceAxis::MechanicalAxis => None,
            ReferenceAxis::Fixed([x, y, z]) => {
                let axis = Vector3::new(x, y, z);
                if !axis.iter().all(|c| c.is_finite()) {
                    return None;
                }
                Unit::try_new(axis, self.degenerate_epsilon)
            }
        }
    }
}

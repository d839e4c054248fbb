/// Error taxonomy for the planning engine
use crate::geometry::{LineKind, PlaneKind};
use crate::landmark::LandmarkName;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// A landmark required by a derived entity has not been placed.
    #[error("landmark `{0}` has not been placed")]
    MissingLandmark(LandmarkName),
    #[error("line `{0}` is not available")]
    MissingLine(LineKind),
    #[error("plane `{0}` is not available")]
    MissingPlane(PlaneKind),
    /// Two points closer than the configured epsilon cannot define a direction.
    #[error("axis is degenerate (length {length:e})")]
    DegenerateAxis { length: f64 },
    #[error("invalid landmark name {0:?}")]
    InvalidLandmarkName(String),
    #[error("landmark `{name}` has a non-finite position")]
    NonFinitePosition { name: LandmarkName },
    #[error("parameter `{parameter}` must be finite")]
    NonFiniteParameter { parameter: &'static str },
    #[error("invalid planner config: {0}")]
    InvalidConfig(String),
    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },
}

impl PlanError {
    /// True for errors that only mean "an input is not there yet".
    pub fn is_missing_dependency(&self) -> bool {
        matches!(
            self,
            PlanError::MissingLandmark(_) | PlanError::MissingLine(_) | PlanError::MissingPlane(_)
        )
    }
}

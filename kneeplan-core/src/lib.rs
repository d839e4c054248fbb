//! Kneeplan Core Library - Surgical geometry for knee arthroplasty planning
//!
//! Turns a sparse set of named femoral landmarks into reference axes,
//! perpendicular and rotated planes, projections and resection planes.
//! Every landmark or parameter change rebuilds the whole derived snapshot.

pub mod axes;
pub mod config;
pub mod error;
pub mod geometry;
pub mod landmark;
pub mod params;
pub mod planes;
pub mod recompute;
pub mod script;
pub mod session;
pub mod transform;

// Re-export commonly used types
pub use config::{PlannerConfig, ReferenceAxis};
pub use error::{PlanError, Result};
pub use geometry::{LineKind, PlanSnapshot, Plane, PlaneKind, ProjectionKind, Segment};
pub use landmark::{Landmark, LandmarkName, LandmarkStore, Placement};
pub use params::PlanParameters;
pub use recompute::derive_snapshot;
pub use script::{parse_script, PlanEvent};
pub use session::PlanningSession;

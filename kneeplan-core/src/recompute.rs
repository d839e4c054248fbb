/// Full-graph recompute of every derived entity
///
/// Stages run in a fixed topological order on every call: axes, reference
/// plane and projections, construction lines, rotated planes, parallel
/// planes. Nothing is carried over from a previous snapshot.
use std::fmt::Display;

use crate::axes::{self, AXIS_LANDMARKS};
use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::geometry::{LineKind, PlanSnapshot, PlaneKind, ProjectionKind, Segment};
use crate::landmark::LandmarkStore;
use crate::params::PlanParameters;
use crate::planes::{self, DerivationContext};

/// Derive a fresh snapshot from the current landmarks and parameters.
///
/// Never fails: entities whose inputs are missing or degenerate are left out.
pub fn derive_snapshot(
    store: &LandmarkStore,
    params: &PlanParameters,
    config: &PlannerConfig,
) -> PlanSnapshot {
    let ctx = DerivationContext::new(store, config);
    let mut snapshot = PlanSnapshot::new();

    for (kind, from, to) in AXIS_LANDMARKS {
        if let Some(axis) = settle(kind, axes::derive_axis(store, from, to)) {
            snapshot.lines.insert(kind, axis);
        }
    }

    if let Some(plane) = settle(
        PlaneKind::MechanicalAxisPlane,
        planes::mechanical_axis_plane(&ctx, &snapshot),
    ) {
        snapshot.planes.insert(PlaneKind::MechanicalAxisPlane, plane);
    }

    if let Some((medial, lateral)) =
        settle(LineKind::TeaProjection, planes::tea_projection(&ctx, &snapshot))
    {
        snapshot
            .projections
            .insert(ProjectionKind::MedialEpicondyle, medial);
        snapshot
            .projections
            .insert(ProjectionKind::LateralEpicondyle, lateral);
        snapshot
            .lines
            .insert(LineKind::TeaProjection, Segment::new(medial, lateral));
    }

    if let Some(line) = settle(LineKind::AnteriorLine, planes::anterior_line(&ctx, &snapshot)) {
        snapshot.lines.insert(LineKind::AnteriorLine, line);
    }
    if let Some(line) = settle(LineKind::LateralLine, planes::lateral_line(&ctx, &snapshot)) {
        snapshot.lines.insert(LineKind::LateralLine, line);
    }

    let rotations = [
        (
            PlaneKind::VarusValgusPlane,
            LineKind::AnteriorLine,
            params.varus_valgus_angle(config.angle_step_degrees),
        ),
        (
            PlaneKind::FlexionExtensionPlane,
            LineKind::LateralLine,
            params.flexion_extension_angle(config.angle_step_degrees),
        ),
    ];
    for (kind, about, angle) in rotations {
        if let Some(plane) = settle(kind, planes::rotated_plane(&ctx, &snapshot, about, angle)) {
            snapshot.planes.insert(kind, plane);
        }
    }

    if let Some(plane) = settle(
        PlaneKind::DistalMedialPlane,
        planes::distal_medial_plane(&ctx, &snapshot),
    ) {
        snapshot.planes.insert(PlaneKind::DistalMedialPlane, plane);
    }
    if let Some(plane) = settle(
        PlaneKind::DistalResectionPlane,
        planes::distal_resection_plane(&ctx, &snapshot, params.distal_resection_offset),
    ) {
        snapshot.planes.insert(PlaneKind::DistalResectionPlane, plane);
    }

    log::trace!(
        "recomputed plan: {} lines, {} planes, {} projections from {} landmarks",
        snapshot.lines.len(),
        snapshot.planes.len(),
        snapshot.projections.len(),
        store.len()
    );

    snapshot
}

/// Turn a stage result into "present" or "skipped", logging why it was skipped.
fn settle<T>(entity: impl Display, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_missing_dependency() => {
            log::debug!("skipping {entity}: {err}");
            None
        }
        Err(err @ PlanError::DegenerateAxis { .. }) => {
            log::warn!("skipping {entity}: {err}");
            None
        }
        Err(err) => {
            log::error!("skipping {entity}: unexpected error {err}");
            None
        }
    }
}

/// Reference planes, construction lines and resection planes
///
/// Every function here derives one entity from the landmark store and the
/// entities already present in the snapshot being built. A missing input is
/// reported as an error and the caller decides to skip the entity.
use nalgebra::{Point3, Unit, Vector3};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::geometry::{LineKind, PlanSnapshot, Plane, PlaneKind, Segment};
use crate::landmark::{Landmark, LandmarkStore};
use crate::transform;

/// Inputs shared by every derivation step of one recompute.
#[derive(Debug, Clone, Copy)]
pub struct DerivationContext<'a> {
    pub store: &'a LandmarkStore,
    pub config: &'a PlannerConfig,
}

impl<'a> DerivationContext<'a> {
    pub fn new(store: &'a LandmarkStore, config: &'a PlannerConfig) -> Self {
        Self { store, config }
    }

    fn epsilon(&self) -> f64 {
        self.config.degenerate_epsilon
    }

    fn mechanical_direction(&self, snapshot: &PlanSnapshot) -> Result<Unit<Vector3<f64>>> {
        snapshot
            .require_line(LineKind::MechanicalAxis)?
            .direction(self.epsilon())
    }

    /// Second operand of the anterior cross product.
    fn reference_direction(&self, snapshot: &PlanSnapshot) -> Result<Unit<Vector3<f64>>> {
        match self.config.fixed_reference() {
            Some(axis) => Ok(axis),
            None => self.mechanical_direction(snapshot),
        }
    }

    /// Segment of the configured construction length from femur center.
    fn construction_line(&self, direction: &Unit<Vector3<f64>>) -> Result<Segment> {
        let start = self.store.require(Landmark::FemurCenter)?;
        let end = transform::translate_along(&start, direction, self.config.construction_line_length);
        Ok(Segment::new(start, end))
    }
}

/// Plane perpendicular to the mechanical axis through femur center.
pub fn mechanical_axis_plane(ctx: &DerivationContext, snapshot: &PlanSnapshot) -> Result<Plane> {
    let direction = ctx.mechanical_direction(snapshot)?;
    let anchor = ctx.store.require(Landmark::FemurCenter)?;
    Ok(Plane::new(
        anchor,
        transform::perpendicular_orientation(&direction),
        ctx.config.plane_extent,
    ))
}

/// Medial and lateral epicondyles projected onto the mechanical axis plane.
pub fn tea_projection(
    ctx: &DerivationContext,
    snapshot: &PlanSnapshot,
) -> Result<(Point3<f64>, Point3<f64>)> {
    let plane = snapshot.require_plane(PlaneKind::MechanicalAxisPlane)?;
    let medial = ctx.store.require(Landmark::MedialEpicondyle)?;
    let lateral = ctx.store.require(Landmark::LateralEpicondyle)?;
    Ok((plane.project(&medial), plane.project(&lateral)))
}

/// `TEA_Projection x reference`, laid off from femur center.
///
/// The operand order fixes the anterior sign for a right-leg model.
pub fn anterior_line(ctx: &DerivationContext, snapshot: &PlanSnapshot) -> Result<Segment> {
    let tea = snapshot
        .require_line(LineKind::TeaProjection)?
        .direction(ctx.epsilon())?;
    let reference = ctx.reference_direction(snapshot)?;
    let anterior = transform::cross_direction(&tea, &reference, ctx.epsilon())?;
    ctx.construction_line(&anterior)
}

/// `reference x AnteriorLine`; points from the medial towards the lateral side.
pub fn lateral_line(ctx: &DerivationContext, snapshot: &PlanSnapshot) -> Result<Segment> {
    let anterior = snapshot
        .require_line(LineKind::AnteriorLine)?
        .direction(ctx.epsilon())?;
    let reference = ctx.reference_direction(snapshot)?;
    let lateral = transform::cross_direction(&reference, &anterior, ctx.epsilon())?;
    ctx.construction_line(&lateral)
}

/// The mechanical axis plane turned about a construction line by `angle`.
///
/// Always starts from the un-rotated mechanical axis plane.
pub fn rotated_plane(
    ctx: &DerivationContext,
    snapshot: &PlanSnapshot,
    about: LineKind,
    angle: f64,
) -> Result<Plane> {
    let base = snapshot.require_plane(PlaneKind::MechanicalAxisPlane)?;
    let line = snapshot.require_line(about)?.direction(ctx.epsilon())?;
    Ok(Plane {
        orientation: transform::rotate_about_line(&base.orientation, &line, angle),
        ..*base
    })
}

/// Flexion/extension plane moved to the distal medial point.
pub fn distal_medial_plane(ctx: &DerivationContext, snapshot: &PlanSnapshot) -> Result<Plane> {
    let reference = snapshot.require_plane(PlaneKind::FlexionExtensionPlane)?;
    let anchor = ctx.store.require(Landmark::DistalMedialPt)?;
    Ok(reference.parallel_through(anchor))
}

/// Flexion/extension plane through the distal medial point shifted
/// `offset` mm along the plane normal.
pub fn distal_resection_plane(
    ctx: &DerivationContext,
    snapshot: &PlanSnapshot,
    offset: f64,
) -> Result<Plane> {
    let reference = snapshot.require_plane(PlaneKind::FlexionExtensionPlane)?;
    let distal = ctx.store.require(Landmark::DistalMedialPt)?;
    let anchor = transform::translate_along(&distal, &reference.normal(), offset);
    Ok(reference.parallel_through(anchor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::landmark::LandmarkName;

    fn store_with(points: &[(Landmark, [f64; 3])]) -> LandmarkStore {
        let mut store = LandmarkStore::new();
        for (landmark, [x, y, z]) in points {
            store
                .upsert(LandmarkName::from(*landmark), Point3::new(*x, *y, *z))
                .unwrap();
        }
        store
    }

    fn with_mechanical_axis(store: &LandmarkStore) -> PlanSnapshot {
        let mut snapshot = PlanSnapshot::new();
        let axis = Segment::new(
            store.require(Landmark::FemurCenter).unwrap(),
            store.require(Landmark::HipCenter).unwrap(),
        );
        snapshot.lines.insert(LineKind::MechanicalAxis, axis);
        snapshot
    }

    #[test]
    fn test_mechanical_axis_plane() {
        let store = store_with(&[
            (Landmark::FemurCenter, [0.0, 0.0, 0.0]),
            (Landmark::HipCenter, [0.0, 0.0, 100.0]),
        ]);
        let config = PlannerConfig::default();
        let ctx = DerivationContext::new(&store, &config);
        let plane = mechanical_axis_plane(&ctx, &with_mechanical_axis(&store)).unwrap();

        assert_eq!(plane.anchor, Point3::origin());
        assert!((plane.normal().into_inner() - Vector3::z()).norm() < 1e-12);
        assert_eq!(plane.extent, 100.0);
    }

    #[test]
    fn test_mechanical_axis_plane_needs_axis() {
        let store = store_with(&[(Landmark::FemurCenter, [0.0, 0.0, 0.0])]);
        let config = PlannerConfig::default();
        let ctx = DerivationContext::new(&store, &config);
        let result = mechanical_axis_plane(&ctx, &PlanSnapshot::new());
        assert_eq!(result, Err(PlanError::MissingLine(LineKind::MechanicalAxis)));
    }

    #[test]
    fn test_degenerate_mechanical_axis() {
        let store = store_with(&[
            (Landmark::FemurCenter, [1.0, 1.0, 1.0]),
            (Landmark::HipCenter, [1.0, 1.0, 1.0]),
        ]);
        let config = PlannerConfig::default();
        let ctx = DerivationContext::new(&store, &config);
        let result = mechanical_axis_plane(&ctx, &with_mechanical_axis(&store));
        assert!(matches!(result, Err(PlanError::DegenerateAxis { .. })));
    }

    #[test]
    fn test_construction_lines_are_perpendicular() {
        let store = store_with(&[
            (Landmark::FemurCenter, [0.0, 0.0, 0.0]),
            (Landmark::HipCenter, [0.0, 0.0, 100.0]),
            (Landmark::MedialEpicondyle, [-40.0, 0.0, 5.0]),
            (Landmark::LateralEpicondyle, [40.0, 0.0, -5.0]),
        ]);
        let config = PlannerConfig::default();
        let ctx = DerivationContext::new(&store, &config);
        let mut snapshot = with_mechanical_axis(&store);
        let plane = mechanical_axis_plane(&ctx, &snapshot).unwrap();
        snapshot.planes.insert(PlaneKind::MechanicalAxisPlane, plane);

        let (medial, lateral) = tea_projection(&ctx, &snapshot).unwrap();
        assert!((medial - Point3::new(-40.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((lateral - Point3::new(40.0, 0.0, 0.0)).norm() < 1e-12);
        snapshot
            .lines
            .insert(LineKind::TeaProjection, Segment::new(medial, lateral));

        let anterior = anterior_line(&ctx, &snapshot).unwrap();
        assert!((anterior.length() - 10.0).abs() < 1e-12);
        // +X cross +Z
        assert!((anterior.end - Point3::new(0.0, -10.0, 0.0)).norm() < 1e-12);
        snapshot.lines.insert(LineKind::AnteriorLine, anterior);

        let lateral_line = lateral_line(&ctx, &snapshot).unwrap();
        assert!((lateral_line.end - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-12);
        let a = anterior.direction(1e-6).unwrap();
        let l = lateral_line.direction(1e-6).unwrap();
        assert!(a.dot(&l.into_inner()).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_reference_axis_drives_anterior_line() {
        let store = store_with(&[(Landmark::FemurCenter, [0.0, 0.0, 0.0])]);
        let config = PlannerConfig {
            reference_axis: crate::config::ReferenceAxis::Fixed([0.0, 1.0, 0.0]),
            ..PlannerConfig::default()
        };
        let ctx = DerivationContext::new(&store, &config);
        let mut snapshot = PlanSnapshot::new();
        snapshot.lines.insert(
            LineKind::TeaProjection,
            Segment::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)),
        );

        // +X cross +Y, no mechanical axis needed
        let anterior = anterior_line(&ctx, &snapshot).unwrap();
        assert!((anterior.end - Point3::new(0.0, 0.0, 10.0)).norm() < 1e-12);
    }

    #[test]
    fn test_resection_plane_offsets_along_normal() {
        let store = store_with(&[(Landmark::DistalMedialPt, [5.0, 5.0, -20.0])]);
        let config = PlannerConfig::default();
        let ctx = DerivationContext::new(&store, &config);
        let mut snapshot = PlanSnapshot::new();
        let orientation = transform::perpendicular_orientation(&Vector3::z_axis());
        snapshot.planes.insert(
            PlaneKind::FlexionExtensionPlane,
            Plane::new(Point3::origin(), orientation, 100.0),
        );

        let medial = distal_medial_plane(&ctx, &snapshot).unwrap();
        let resection = distal_resection_plane(&ctx, &snapshot, 9.0).unwrap();

        assert_eq!(medial.anchor, Point3::new(5.0, 5.0, -20.0));
        assert!((resection.anchor - Point3::new(5.0, 5.0, -11.0)).norm() < 1e-12);
        assert_eq!(medial.orientation, orientation);
        assert_eq!(resection.orientation, orientation);
    }
}

/// Derived geometry handed to the render layer
use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use crate::transform;

/// Named line segments: anatomical axes and construction lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineKind {
    MechanicalAxis,
    AnatomicalAxis,
    Tea,
    Pca,
    TeaProjection,
    AnteriorLine,
    LateralLine,
}

impl LineKind {
    pub const ALL: [LineKind; 7] = [
        LineKind::MechanicalAxis,
        LineKind::AnatomicalAxis,
        LineKind::Tea,
        LineKind::Pca,
        LineKind::TeaProjection,
        LineKind::AnteriorLine,
        LineKind::LateralLine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LineKind::MechanicalAxis => "MechanicalAxis",
            LineKind::AnatomicalAxis => "AnatomicalAxis",
            LineKind::Tea => "TEA",
            LineKind::Pca => "PCA",
            LineKind::TeaProjection => "TEA_Projection",
            LineKind::AnteriorLine => "AnteriorLine",
            LineKind::LateralLine => "LateralLine",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlaneKind {
    MechanicalAxisPlane,
    VarusValgusPlane,
    FlexionExtensionPlane,
    DistalMedialPlane,
    DistalResectionPlane,
}

impl PlaneKind {
    pub const ALL: [PlaneKind; 5] = [
        PlaneKind::MechanicalAxisPlane,
        PlaneKind::VarusValgusPlane,
        PlaneKind::FlexionExtensionPlane,
        PlaneKind::DistalMedialPlane,
        PlaneKind::DistalResectionPlane,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlaneKind::MechanicalAxisPlane => "MechanicalAxisPlane",
            PlaneKind::VarusValgusPlane => "VarusValgusPlane",
            PlaneKind::FlexionExtensionPlane => "FlexionExtensionPlane",
            PlaneKind::DistalMedialPlane => "DistalMedialPlane",
            PlaneKind::DistalResectionPlane => "DistalResectionPlane",
        }
    }
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points projected onto the mechanical axis plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectionKind {
    MedialEpicondyle,
    LateralEpicondyle,
}

impl ProjectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionKind::MedialEpicondyle => "medialEpicondyleProjection",
            ProjectionKind::LateralEpicondyle => "lateralEpicondyleProjection",
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Segment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end; fails for a zero-length segment.
    pub fn direction(&self, epsilon: f64) -> crate::Result<Unit<Vector3<f64>>> {
        transform::direction(&self.start, &self.end, epsilon)
    }
}

/// An oriented square plane.
///
/// The plane's local +Z axis is its normal; `orientation` maps local space
/// into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub anchor: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub extent: f64,
}

impl Plane {
    pub fn new(anchor: Point3<f64>, orientation: UnitQuaternion<f64>, extent: f64) -> Self {
        Self {
            anchor,
            orientation,
            extent,
        }
    }

    pub fn normal(&self) -> Unit<Vector3<f64>> {
        Unit::new_unchecked(self.orientation * Vector3::z())
    }

    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.anchor).dot(&self.normal().into_inner())
    }

    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        transform::project_onto_plane(point, &self.normal(), &self.anchor)
    }

    /// A plane with this orientation through another anchor.
    pub fn parallel_through(&self, anchor: Point3<f64>) -> Self {
        Self {
            anchor,
            ..*self
        }
    }
}

/// Everything derived from one landmark/parameter state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanSnapshot {
    pub lines: BTreeMap<LineKind, Segment>,
    pub planes: BTreeMap<PlaneKind, Plane>,
    pub projections: BTreeMap<ProjectionKind, Point3<f64>>,
}

impl PlanSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, kind: LineKind) -> Option<&Segment> {
        self.lines.get(&kind)
    }

    pub fn plane(&self, kind: PlaneKind) -> Option<&Plane> {
        self.planes.get(&kind)
    }

    pub fn projection(&self, kind: ProjectionKind) -> Option<Point3<f64>> {
        self.projections.get(&kind).copied()
    }

    pub fn require_line(&self, kind: LineKind) -> crate::Result<&Segment> {
        self.line(kind).ok_or(crate::PlanError::MissingLine(kind))
    }

    pub fn require_plane(&self, kind: PlaneKind) -> crate::Result<&Plane> {
        self.plane(kind).ok_or(crate::PlanError::MissingPlane(kind))
    }

    pub fn axes(&self) -> impl Iterator<Item = (LineKind, &Segment)> {
        self.lines.iter().map(|(kind, segment)| (*kind, segment))
    }

    pub fn planes(&self) -> impl Iterator<Item = (PlaneKind, &Plane)> {
        self.planes.iter().map(|(kind, plane)| (*kind, plane))
    }

    pub fn projections(&self) -> impl Iterator<Item = (ProjectionKind, Point3<f64>)> + '_ {
        self.projections.iter().map(|(kind, point)| (*kind, *point))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.planes.is_empty() && self.projections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_plane_normal_is_z() {
        let plane = Plane::new(Point3::origin(), UnitQuaternion::identity(), 100.0);
        let normal = plane.normal();
        assert!((normal.into_inner() - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_signed_distance_and_projection() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 5.0), UnitQuaternion::identity(), 100.0);
        let point = Point3::new(3.0, -2.0, 12.0);

        assert!((plane.signed_distance(&point) - 7.0).abs() < 1e-12);
        let projected = plane.project(&point);
        assert!((projected - Point3::new(3.0, -2.0, 5.0)).norm() < 1e-12);
        assert!(plane.signed_distance(&projected).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_plane_keeps_orientation() {
        let orientation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
        let plane = Plane::new(Point3::origin(), orientation, 100.0);
        let offset = plane.parallel_through(Point3::new(1.0, 2.0, 3.0));

        assert_eq!(offset.orientation, plane.orientation);
        assert_eq!(offset.extent, plane.extent);
        assert_eq!(offset.anchor, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_segment_length_and_direction() {
        let segment = Segment::new(Point3::origin(), Point3::new(0.0, 3.0, 4.0));
        assert!((segment.length() - 5.0).abs() < 1e-12);
        let direction = segment.direction(1e-6).unwrap();
        assert!((direction.into_inner() - Vector3::new(0.0, 0.6, 0.8)).norm() < 1e-12);

        let collapsed = Segment::new(Point3::origin(), Point3::origin());
        assert!(collapsed.direction(1e-6).is_err());
    }

    #[test]
    fn test_empty_snapshot_reports_missing() {
        let snapshot = PlanSnapshot::new();
        assert!(snapshot.is_empty());
        assert!(snapshot.require_line(LineKind::Tea).is_err());
        assert!(snapshot.require_plane(PlaneKind::DistalMedialPlane).is_err());
    }
}

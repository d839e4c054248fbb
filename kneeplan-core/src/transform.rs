/// Vector and plane math primitives used by the derivation stages
use std::f64::consts::PI;

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use crate::error::{PlanError, Result};

/// Cosine beyond which two unit vectors are treated as anti-parallel.
const ANTIPARALLEL_COS: f64 = -1.0 + 1e-12;

/// Unit vector pointing from `a` to `b`.
///
/// Fails with `DegenerateAxis` when the points are closer than `epsilon`.
pub fn direction(a: &Point3<f64>, b: &Point3<f64>, epsilon: f64) -> Result<Unit<Vector3<f64>>> {
    let delta = b - a;
    let length = delta.norm();
    if length < epsilon || !length.is_finite() {
        return Err(PlanError::DegenerateAxis { length });
    }
    Ok(Unit::new_unchecked(delta / length))
}

/// `point - normal * dot(point - anchor, normal)`
pub fn project_onto_plane(
    point: &Point3<f64>,
    normal: &Unit<Vector3<f64>>,
    anchor: &Point3<f64>,
) -> Point3<f64> {
    let normal = normal.into_inner();
    let distance = (point - anchor).dot(&normal);
    point - normal * distance
}

/// Minimal rotation taking the plane's local +Z onto `axis`.
///
/// The anti-parallel case has no unique minimal rotation; it resolves to a
/// half turn about local +X so the result is always well defined.
pub fn perpendicular_orientation(axis: &Unit<Vector3<f64>>) -> UnitQuaternion<f64> {
    let canonical = Vector3::z_axis();
    if canonical.dot(&axis.into_inner()) <= ANTIPARALLEL_COS {
        return UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI);
    }
    UnitQuaternion::rotation_between_axis(&canonical, axis)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI))
}

/// Rotate `base` by `angle` radians about the world-space `line` direction.
///
/// Callers always pass the un-rotated base orientation so that the angle is
/// absolute: applying the same angle twice gives the same result.
pub fn rotate_about_line(
    base: &UnitQuaternion<f64>,
    line: &Unit<Vector3<f64>>,
    angle: f64,
) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(line, angle) * base
}

/// Move a point `distance` along `direction`.
pub fn translate_along(point: &Point3<f64>, direction: &Unit<Vector3<f64>>, distance: f64) -> Point3<f64> {
    point + direction.into_inner() * distance
}

/// Unit cross product `a x b`, or `DegenerateAxis` if the inputs are parallel.
pub fn cross_direction(
    a: &Unit<Vector3<f64>>,
    b: &Unit<Vector3<f64>>,
    epsilon: f64,
) -> Result<Unit<Vector3<f64>>> {
    let cross = a.into_inner().cross(&b.into_inner());
    let length = cross.norm();
    if length < epsilon {
        return Err(PlanError::DegenerateAxis { length });
    }
    Ok(Unit::new_unchecked(cross / length))
}

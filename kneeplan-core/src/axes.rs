/// Anatomical axes built from landmark pairs
use crate::error::Result;
use crate::geometry::{LineKind, Segment};
use crate::landmark::{Landmark, LandmarkStore};

/// Each anatomical axis and the landmarks it runs from and to.
pub const AXIS_LANDMARKS: [(LineKind, Landmark, Landmark); 4] = [
    (LineKind::MechanicalAxis, Landmark::FemurCenter, Landmark::HipCenter),
    (
        LineKind::AnatomicalAxis,
        Landmark::FemurProximalCanal,
        Landmark::FemurDistalCanal,
    ),
    (LineKind::Tea, Landmark::MedialEpicondyle, Landmark::LateralEpicondyle),
    (LineKind::Pca, Landmark::PosteriorMedialPt, Landmark::PosteriorLateralPt),
];

/// Segment between two placed landmarks.
pub fn derive_axis(store: &LandmarkStore, from: Landmark, to: Landmark) -> Result<Segment> {
    let start = store.require(from)?;
    let end = store.require(to)?;
    Ok(Segment::new(start, end))
}

/// The landmark pair behind an anatomical axis, `None` for construction lines.
pub fn axis_landmarks(kind: LineKind) -> Option<(Landmark, Landmark)> {
    AXIS_LANDMARKS
        .iter()
        .find(|(axis, _, _)| *axis == kind)
        .map(|(_, from, to)| (*from, *to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use nalgebra::Point3;

    #[test]
    fn test_axis_requires_both_landmarks() {
        let mut store = LandmarkStore::new();
        let result = derive_axis(&store, Landmark::FemurCenter, Landmark::HipCenter);
        assert_eq!(result, Err(PlanError::MissingLandmark(Landmark::FemurCenter.into())));

        store.upsert(Landmark::FemurCenter.into(), Point3::origin()).unwrap();
        let result = derive_axis(&store, Landmark::FemurCenter, Landmark::HipCenter);
        assert_eq!(result, Err(PlanError::MissingLandmark(Landmark::HipCenter.into())));

        store.upsert(Landmark::HipCenter.into(), Point3::new(0.0, 0.0, 100.0)).unwrap();
        let axis = derive_axis(&store, Landmark::FemurCenter, Landmark::HipCenter).unwrap();
        assert_eq!(axis.start, Point3::origin());
        assert_eq!(axis.end, Point3::new(0.0, 0.0, 100.0));
    }

    #[test]
    fn test_axis_landmark_table() {
        assert_eq!(
            axis_landmarks(LineKind::Tea),
            Some((Landmark::MedialEpicondyle, Landmark::LateralEpicondyle))
        );
        assert_eq!(
            axis_landmarks(LineKind::Pca),
            Some((Landmark::PosteriorMedialPt, Landmark::PosteriorLateralPt))
        );
        assert_eq!(axis_landmarks(LineKind::AnteriorLine), None);
    }
}

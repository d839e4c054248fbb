/// Landmark vocabulary and the store that owns landmark positions
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;
use serde::{Serialize, Serializer};

use crate::error::{PlanError, Result};

const MAX_NAME_LEN: usize = 64;

/// Landmark roles the derivation engine knows how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Landmark {
    FemurCenter,
    HipCenter,
    FemurProximalCanal,
    FemurDistalCanal,
    MedialEpicondyle,
    LateralEpicondyle,
    PosteriorMedialPt,
    PosteriorLateralPt,
    DistalMedialPt,
}

impl Landmark {
    pub const ALL: [Landmark; 9] = [
        Landmark::FemurCenter,
        Landmark::HipCenter,
        Landmark::FemurProximalCanal,
        Landmark::FemurDistalCanal,
        Landmark::MedialEpicondyle,
        Landmark::LateralEpicondyle,
        Landmark::PosteriorMedialPt,
        Landmark::PosteriorLateralPt,
        Landmark::DistalMedialPt,
    ];

    /// Name used by the UI layer for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Landmark::FemurCenter => "femurCenter",
            Landmark::HipCenter => "hipCenter",
            Landmark::FemurProximalCanal => "femurProximalCanal",
            Landmark::FemurDistalCanal => "femurDistalCanal",
            Landmark::MedialEpicondyle => "medialEpicondyle",
            Landmark::LateralEpicondyle => "lateralEpicondyle",
            Landmark::PosteriorMedialPt => "posteriorMedialPt",
            Landmark::PosteriorLateralPt => "posteriorLateralPt",
            Landmark::DistalMedialPt => "distalMedialPt",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a landmark in the store.
///
/// Names outside the known vocabulary are kept as `Custom`; they are stored
/// and reported but never feed derived geometry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LandmarkName {
    Known(Landmark),
    Custom(String),
}

impl LandmarkName {
    /// Check that the name is usable as a key. Custom names must start with
    /// an ASCII letter and contain only ASCII alphanumerics, `_` or `-`.
    pub fn validate(&self) -> Result<()> {
        match self {
            LandmarkName::Known(_) => Ok(()),
            LandmarkName::Custom(name) => {
                let mut chars = name.chars();
                let valid_head = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
                let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
                if valid_head && valid_tail && name.len() <= MAX_NAME_LEN {
                    Ok(())
                } else {
                    Err(PlanError::InvalidLandmarkName(name.clone()))
                }
            }
        }
    }

    pub fn known(&self) -> Option<Landmark> {
        match self {
            LandmarkName::Known(landmark) => Some(*landmark),
            LandmarkName::Custom(_) => None,
        }
    }
}

impl From<Landmark> for LandmarkName {
    fn from(landmark: Landmark) -> Self {
        LandmarkName::Known(landmark)
    }
}

impl FromStr for LandmarkName {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(landmark) = Landmark::ALL.iter().find(|l| l.as_str() == s) {
            return Ok(LandmarkName::Known(*landmark));
        }
        let name = LandmarkName::Custom(s.to_string());
        name.validate()?;
        Ok(name)
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkName::Known(landmark) => f.write_str(landmark.as_str()),
            LandmarkName::Custom(name) => f.write_str(name),
        }
    }
}

impl Serialize for LandmarkName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of placing a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Created,
    Moved,
}

/// Source of truth for every derived entity: landmark name to position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkStore {
    positions: BTreeMap<LandmarkName, Point3<f64>>,
}

impl LandmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the landmark or move it if the name is already placed.
    pub fn upsert(&mut self, name: LandmarkName, position: Point3<f64>) -> Result<Placement> {
        name.validate()?;
        if !position.coords.iter().all(|c| c.is_finite()) {
            return Err(PlanError::NonFinitePosition { name });
        }

        match self.positions.insert(name, position) {
            Some(_) => Ok(Placement::Moved),
            None => Ok(Placement::Created),
        }
    }

    pub fn get(&self, name: &LandmarkName) -> Option<Point3<f64>> {
        self.positions.get(name).copied()
    }

    pub fn has(&self, name: &LandmarkName) -> bool {
        self.positions.contains_key(name)
    }

    pub fn remove(&mut self, name: &LandmarkName) -> Option<Point3<f64>> {
        self.positions.remove(name)
    }

    pub fn all(&self) -> impl Iterator<Item = (&LandmarkName, Point3<f64>)> {
        self.positions.iter().map(|(name, position)| (name, *position))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a known landmark, or `MissingLandmark` if it is not placed.
    pub fn require(&self, landmark: Landmark) -> Result<Point3<f64>> {
        let name = LandmarkName::Known(landmark);
        self.get(&name).ok_or(PlanError::MissingLandmark(name))
    }
}

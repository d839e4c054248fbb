/// Planning session: owns landmarks, parameters and the derived snapshot
use nalgebra::Point3;

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::geometry::{LineKind, PlanSnapshot, Plane, PlaneKind, ProjectionKind, Segment};
use crate::landmark::{LandmarkName, LandmarkStore, Placement};
use crate::params::PlanParameters;
use crate::recompute::derive_snapshot;
use crate::script::PlanEvent;

/// One clinician's planning state.
///
/// Every mutation runs exactly one full recompute before returning, so the
/// snapshot always reflects the current landmarks and parameters.
#[derive(Debug, Clone)]
pub struct PlanningSession {
    config: PlannerConfig,
    landmarks: LandmarkStore,
    params: PlanParameters,
    snapshot: PlanSnapshot,
}

impl PlanningSession {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let params = PlanParameters::new(config.initial_resection_offset);
        Ok(Self {
            config,
            landmarks: LandmarkStore::new(),
            params,
            snapshot: PlanSnapshot::new(),
        })
    }

    pub fn place_or_move_landmark(
        &mut self,
        name: LandmarkName,
        position: Point3<f64>,
    ) -> Result<Placement> {
        let placement = self.landmarks.upsert(name, position)?;
        self.recompute();
        Ok(placement)
    }

    /// Remove a landmark; returns whether it was placed.
    pub fn remove_landmark(&mut self, name: &LandmarkName) -> bool {
        let removed = self.landmarks.remove(name).is_some();
        self.recompute();
        removed
    }

    pub fn set_varus_valgus(&mut self, delta: i32) {
        self.params.adjust_varus_valgus(delta);
        self.recompute();
    }

    pub fn set_flexion_extension(&mut self, delta: i32) {
        self.params.adjust_flexion_extension(delta);
        self.recompute();
    }

    pub fn set_distal_resection_offset(&mut self, delta_mm: f64) -> Result<()> {
        self.params.adjust_distal_resection(delta_mm)?;
        self.recompute();
        Ok(())
    }

    /// Apply one UI or script event.
    pub fn apply(&mut self, event: PlanEvent) -> Result<()> {
        match event {
            PlanEvent::PlaceLandmark { name, position } => {
                self.place_or_move_landmark(name, position)?;
            }
            PlanEvent::RemoveLandmark(name) => {
                self.remove_landmark(&name);
            }
            PlanEvent::VarusValgus(delta) => self.set_varus_valgus(delta),
            PlanEvent::FlexionExtension(delta) => self.set_flexion_extension(delta),
            PlanEvent::DistalResection(delta) => self.set_distal_resection_offset(delta)?,
        }
        Ok(())
    }

    /// Rebuild every derived entity from the current state.
    pub fn recompute(&mut self) {
        self.snapshot = derive_snapshot(&self.landmarks, &self.params, &self.config);
    }

    pub fn landmarks(&self) -> &LandmarkStore {
        &self.landmarks
    }

    pub fn parameters(&self) -> &PlanParameters {
        &self.params
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &PlanSnapshot {
        &self.snapshot
    }

    pub fn axes(&self) -> impl Iterator<Item = (LineKind, &Segment)> {
        self.snapshot.axes()
    }

    pub fn planes(&self) -> impl Iterator<Item = (PlaneKind, &Plane)> {
        self.snapshot.planes()
    }

    pub fn projections(&self) -> impl Iterator<Item = (ProjectionKind, Point3<f64>)> + '_ {
        self.snapshot.projections()
    }
}

impl Default for PlanningSession {
    fn default() -> Self {
        let config = PlannerConfig::default();
        let params = PlanParameters::new(config.initial_resection_offset);
        Self {
            config,
            landmarks: LandmarkStore::new(),
            params,
            snapshot: PlanSnapshot::new(),
        }
    }
}

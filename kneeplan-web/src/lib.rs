/// Kneeplan Web - WASM boundary between the browser UI and the planning core
///
/// The picking/UI layer pushes landmark placements and parameter steps in;
/// the render layer reads axes, planes and projections back out and diffs
/// them against its own scene objects.
use kneeplan_core::{
    parse_script, LandmarkName, PlanSnapshot, Placement, PlannerConfig, PlanningSession,
};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::Serialize;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn main() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn main() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[derive(Debug, Serialize, PartialEq)]
struct AxisExport {
    name: &'static str,
    start: [f64; 3],
    end: [f64; 3],
}

#[derive(Debug, Serialize, PartialEq)]
struct PlaneExport {
    name: &'static str,
    anchor: [f64; 3],
    normal: [f64; 3],
    /// `[x, y, z, w]`, the order three.js quaternions use.
    orientation: [f64; 4],
    extent: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct PointExport {
    name: String,
    position: [f64; 3],
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ParameterExport {
    varus_valgus_steps: i32,
    flexion_extension_steps: i32,
    varus_valgus_angle: f64,
    flexion_extension_angle: f64,
    distal_resection_offset: f64,
}

fn point_array(point: &Point3<f64>) -> [f64; 3] {
    [point.x, point.y, point.z]
}

fn vector_array(vector: &Vector3<f64>) -> [f64; 3] {
    [vector.x, vector.y, vector.z]
}

fn quaternion_array(orientation: &UnitQuaternion<f64>) -> [f64; 4] {
    let coords = orientation.coords;
    [coords.x, coords.y, coords.z, coords.w]
}

fn axis_exports(snapshot: &PlanSnapshot) -> Vec<AxisExport> {
    snapshot
        .axes()
        .map(|(kind, segment)| AxisExport {
            name: kind.as_str(),
            start: point_array(&segment.start),
            end: point_array(&segment.end),
        })
        .collect()
}

fn plane_exports(snapshot: &PlanSnapshot) -> Vec<PlaneExport> {
    snapshot
        .planes()
        .map(|(kind, plane)| PlaneExport {
            name: kind.as_str(),
            anchor: point_array(&plane.anchor),
            normal: vector_array(&plane.normal()),
            orientation: quaternion_array(&plane.orientation),
            extent: plane.extent,
        })
        .collect()
}

fn projection_exports(snapshot: &PlanSnapshot) -> Vec<PointExport> {
    snapshot
        .projections()
        .map(|(kind, point)| PointExport {
            name: kind.to_string(),
            position: point_array(&point),
        })
        .collect()
}

/// Planning session handle owned by the browser page.
#[wasm_bindgen]
pub struct WebPlanner {
    session: PlanningSession,
}

#[wasm_bindgen]
impl WebPlanner {
    /// Create a planner; `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WebPlanner, JsError> {
        let config: PlannerConfig = if config.is_undefined() || config.is_null() {
            PlannerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(WebPlanner {
            session: PlanningSession::new(config)?,
        })
    }

    /// Place or drag a landmark. Returns `true` when it was newly created.
    #[wasm_bindgen(js_name = placeOrMoveLandmark)]
    pub fn place_or_move_landmark(&mut self, name: &str, x: f64, y: f64, z: f64) -> Result<bool, JsError> {
        let name: LandmarkName = name.parse()?;
        let placement = self
            .session
            .place_or_move_landmark(name, Point3::new(x, y, z))?;
        Ok(placement == Placement::Created)
    }

    #[wasm_bindgen(js_name = removeLandmark)]
    pub fn remove_landmark(&mut self, name: &str) -> Result<bool, JsError> {
        let name: LandmarkName = name.parse()?;
        Ok(self.session.remove_landmark(&name))
    }

    #[wasm_bindgen(js_name = setVarusValgus)]
    pub fn set_varus_valgus(&mut self, delta: i32) {
        self.session.set_varus_valgus(delta);
    }

    #[wasm_bindgen(js_name = setFlexionExtension)]
    pub fn set_flexion_extension(&mut self, delta: i32) {
        self.session.set_flexion_extension(delta);
    }

    #[wasm_bindgen(js_name = setDistalResectionOffset)]
    pub fn set_distal_resection_offset(&mut self, delta: f64) -> Result<(), JsError> {
        self.session.set_distal_resection_offset(delta)?;
        Ok(())
    }

    /// Replay an event script; returns the number of events applied.
    #[wasm_bindgen(js_name = applyScript)]
    pub fn apply_script(&mut self, script: &str) -> Result<u32, JsError> {
        let events = parse_script(script)?;
        let count = events.len();
        for event in events {
            self.session.apply(event)?;
        }
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    pub fn axes(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&axis_exports(self.session.snapshot()))?)
    }

    pub fn planes(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&plane_exports(self.session.snapshot()))?)
    }

    pub fn projections(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&projection_exports(self.session.snapshot()))?)
    }

    pub fn landmarks(&self) -> Result<JsValue, JsError> {
        let landmarks: Vec<PointExport> = self
            .session
            .landmarks()
            .all()
            .map(|(name, position)| PointExport {
                name: name.to_string(),
                position: point_array(&position),
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&landmarks)?)
    }

    pub fn parameters(&self) -> Result<JsValue, JsError> {
        let params = self.session.parameters();
        let step = self.session.config().angle_step_degrees;
        let export = ParameterExport {
            varus_valgus_steps: params.varus_valgus_steps,
            flexion_extension_steps: params.flexion_extension_steps,
            varus_valgus_angle: params.varus_valgus_angle(step),
            flexion_extension_angle: params.flexion_extension_angle(step),
            distal_resection_offset: params.distal_resection_offset,
        };
        Ok(serde_wasm_bindgen::to_value(&export)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kneeplan_core::Landmark;

    fn session() -> PlanningSession {
        let mut session = PlanningSession::default();
        for (landmark, position) in [
            (Landmark::FemurCenter, Point3::new(0.0, 0.0, 0.0)),
            (Landmark::HipCenter, Point3::new(0.0, 0.0, 100.0)),
            (Landmark::MedialEpicondyle, Point3::new(-40.0, 0.0, 2.0)),
            (Landmark::LateralEpicondyle, Point3::new(40.0, 0.0, 2.0)),
        ] {
            session.place_or_move_landmark(landmark.into(), position).unwrap();
        }
        session
    }

    #[test]
    fn test_axis_exports_use_render_names() {
        let exports = axis_exports(session().snapshot());
        let names: Vec<&str> = exports.iter().map(|a| a.name).collect();
        assert_eq!(
            names,
            vec!["MechanicalAxis", "TEA", "TEA_Projection", "AnteriorLine", "LateralLine"]
        );
        assert_eq!(exports[0].start, [0.0, 0.0, 0.0]);
        assert_eq!(exports[0].end, [0.0, 0.0, 100.0]);
    }

    #[test]
    fn test_plane_exports_carry_orientation_and_normal() {
        let exports = plane_exports(session().snapshot());
        let mechanical = exports
            .iter()
            .find(|p| p.name == "MechanicalAxisPlane")
            .unwrap();
        assert_eq!(mechanical.anchor, [0.0, 0.0, 0.0]);
        assert_eq!(mechanical.orientation, [0.0, 0.0, 0.0, 1.0]);
        assert!((mechanical.normal[2] - 1.0).abs() < 1e-12);
        assert_eq!(mechanical.extent, 100.0);
        // no distal medial point placed
        assert!(exports.iter().all(|p| p.name != "DistalMedialPlane"));
    }

    #[test]
    fn test_projection_exports() {
        let exports = projection_exports(session().snapshot());
        assert_eq!(exports.len(), 2);
        assert_eq!(exports[0].name, "medialEpicondyleProjection");
        assert!((exports[0].position[2]).abs() < 1e-12);
    }
}

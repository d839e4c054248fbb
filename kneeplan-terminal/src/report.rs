/// Colored text report of a planning session
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use kneeplan_core::{LineKind, PlaneKind, PlanningSession};
use nalgebra::{Point3, Vector3};
use std::io::Write;

const ABSENT: &str = "absent";

/// Writes landmarks, parameters and every derived entity, one per line.
pub struct SnapshotPrinter {
    precision: usize,
}

impl SnapshotPrinter {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn draw<W: Write>(&self, writer: &mut W, session: &PlanningSession) -> std::io::Result<()> {
        self.heading(writer, "Landmarks")?;
        if session.landmarks().is_empty() {
            self.row(writer, "(none)", None, Color::DarkGrey)?;
        }
        for (name, position) in session.landmarks().all() {
            let text = self.point(&position);
            self.row(writer, &name.to_string(), Some(text), Color::Cyan)?;
        }

        let params = session.parameters();
        let step = session.config().angle_step_degrees;
        self.heading(writer, "Parameters")?;
        self.row(
            writer,
            "varusValgus",
            Some(format!(
                "{} steps ({:.*} deg)",
                params.varus_valgus_steps,
                self.precision,
                params.varus_valgus_angle(step).to_degrees()
            )),
            Color::White,
        )?;
        self.row(
            writer,
            "flexionExtension",
            Some(format!(
                "{} steps ({:.*} deg)",
                params.flexion_extension_steps,
                self.precision,
                params.flexion_extension_angle(step).to_degrees()
            )),
            Color::White,
        )?;
        self.row(
            writer,
            "distalResectionOffset",
            Some(format!("{:.*} mm", self.precision, params.distal_resection_offset)),
            Color::White,
        )?;

        let snapshot = session.snapshot();
        self.heading(writer, "Axes")?;
        for kind in LineKind::ALL {
            let text = snapshot
                .line(kind)
                .map(|s| format!("{} -> {}", self.point(&s.start), self.point(&s.end)));
            self.row(writer, kind.as_str(), text, Color::Yellow)?;
        }

        self.heading(writer, "Planes")?;
        for kind in PlaneKind::ALL {
            let text = snapshot.plane(kind).map(|p| {
                format!(
                    "anchor {} normal {}",
                    self.point(&p.anchor),
                    self.vector(&p.normal())
                )
            });
            self.row(writer, kind.as_str(), text, Color::Green)?;
        }

        writer.queue(ResetColor)?;
        Ok(())
    }

    fn heading<W: Write>(&self, writer: &mut W, title: &str) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Magenta))?;
        writer.queue(Print(format!("{title}\n")))?;
        Ok(())
    }

    fn row<W: Write>(
        &self,
        writer: &mut W,
        name: &str,
        value: Option<String>,
        color: Color,
    ) -> std::io::Result<()> {
        let (color, value) = match value {
            Some(value) => (color, value),
            None => (Color::DarkGrey, ABSENT.to_string()),
        };
        writer.queue(SetForegroundColor(color))?;
        writer.queue(Print(format!("  {name:<24}{value}\n")))?;
        Ok(())
    }

    fn point(&self, p: &Point3<f64>) -> String {
        self.vector(&p.coords)
    }

    fn vector(&self, v: &Vector3<f64>) -> String {
        let precision = self.precision;
        format!("({:.precision$}, {:.precision$}, {:.precision$})", v.x, v.y, v.z)
    }
}

impl Default for SnapshotPrinter {
    fn default() -> Self {
        Self::new(2)
    }
}

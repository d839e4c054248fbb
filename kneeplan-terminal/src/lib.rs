/// Terminal replay of planning event scripts
use kneeplan_core::{parse_script, PlannerConfig, PlanningSession, Result};
use std::io::Write;

pub mod report;

pub use report::SnapshotPrinter;

/// Feeds scripted events through a planning session and reports the outcome.
pub struct ReplayApp {
    session: PlanningSession,
    printer: SnapshotPrinter,
}

impl ReplayApp {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        Ok(Self {
            session: PlanningSession::new(config)?,
            printer: SnapshotPrinter::default(),
        })
    }

    /// Apply every event of the script in order; returns the event count.
    ///
    /// Parsing fails up front, so a malformed script leaves the session untouched.
    pub fn replay(&mut self, script: &str) -> Result<usize> {
        let events = parse_script(script)?;
        let count = events.len();
        for event in events {
            log::debug!("applying {event:?}");
            self.session.apply(event)?;
        }
        Ok(count)
    }

    pub fn session(&self) -> &PlanningSession {
        &self.session
    }

    pub fn print<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.printer.draw(writer, &self.session)?;
        writer.flush()
    }
}

use crate::actions::Simulator;
use crate::error::Result;
use crate::event::EventKind;
use serde_json::json;

impl Simulator {
    /// Run the full demonstration scenario: persistence, duplication, scan,
    /// lock and propagation in that fixed order, bracketed by start/end
    /// events. Pure sequencing — no file operations of its own. An inner
    /// failure propagates immediately, so a missing `SCENARIO_END` marks the
    /// log as a partial trace.
    pub fn run_full(&self) -> Result<()> {
        self.log()
            .append(EventKind::ScenarioStart, json!({"scenario": "full"}))?;
        self.simulate_persistence()?;
        self.simulate_duplication(self.sandbox().config().default_copies)?;
        self.simulate_scan()?;
        self.simulate_lock()?;
        self.simulate_propagation()?;
        self.log()
            .append(EventKind::ScenarioEnd, json!({"scenario": "full"}))?;
        Ok(())
    }
}

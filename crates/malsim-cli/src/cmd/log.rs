use crate::output;
use malsim_core::{EventLog, Sandbox, SimConfig};
use std::path::Path;

/// Show the last `tail` events. Human mode prints the `sim.log` lines;
/// `--json` re-emits the parsed `sim.jsonl` records.
pub fn run(root: &Path, tail: usize, json: bool) -> anyhow::Result<()> {
    let config = SimConfig::load_or_default(root)?;
    let log = EventLog::new(Sandbox::new(root, config));

    if json {
        let events = log.read_events()?;
        let start = events.len().saturating_sub(tail);
        output::print_json(&events[start..])?;
    } else {
        for line in log.tail(tail)? {
            println!("{line}");
        }
    }
    Ok(())
}

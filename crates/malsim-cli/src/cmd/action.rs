use crate::output;
use anyhow::Context;
use malsim_core::{SimConfig, Simulator};
use serde_json::json;
use std::path::Path;

fn simulator(root: &Path) -> anyhow::Result<Simulator> {
    let config = SimConfig::load_or_default(root)
        .with_context(|| format!("failed to load config from {}", root.display()))?;
    Ok(Simulator::new(root, config))
}

pub fn init(root: &Path, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    sim.sandbox().ensure()?;
    if json {
        output::print_json(&json!({"root": root.display().to_string()}))?;
    } else {
        println!("sandbox ready: {}", root.display());
    }
    Ok(())
}

pub fn persistence(root: &Path, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    let entry = sim.simulate_persistence()?;
    if json {
        output::print_json(&json!({"created": entry.display().to_string()}))?;
    } else {
        println!("simulated autostart entry: {}", entry.display());
    }
    Ok(())
}

pub fn duplicate(root: &Path, copies: Option<usize>, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    let copies = copies.unwrap_or(sim.sandbox().config().default_copies);
    let created = sim.simulate_duplication(copies)?;
    if json {
        let paths: Vec<String> = created.iter().map(|p| p.display().to_string()).collect();
        output::print_json(&json!({"copies": paths}))?;
    } else {
        println!("payload stub duplicated {} time(s)", created.len());
        for path in &created {
            println!("  {}", path.display());
        }
    }
    Ok(())
}

pub fn scan(root: &Path, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    let files = sim.simulate_scan()?;
    if json {
        let paths: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
        output::print_json(&json!({"count": files.len(), "files": paths}))?;
    } else {
        println!("scanned {} file(s) under user_files", files.len());
        for file in &files {
            println!("  {}", file.display());
        }
    }
    Ok(())
}

pub fn lock(root: &Path, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    let outcome = sim.simulate_lock()?;
    if json {
        output::print_json(&outcome)?;
    } else {
        println!(
            "locked {} of {} target(s) ({} skipped); reverse with 'malsim unlock'",
            outcome.renamed, outcome.targets, outcome.skipped
        );
    }
    Ok(())
}

pub fn unlock(root: &Path, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    let outcome = sim.undo_lock()?;
    if json {
        output::print_json(&outcome)?;
    } else {
        println!(
            "restored {} file(s), quarantined {} collision(s)",
            outcome.restored, outcome.quarantined
        );
    }
    Ok(())
}

pub fn propagate(root: &Path, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    let terminal = sim.simulate_propagation()?;
    if json {
        output::print_json(&json!({"final": terminal.as_str()}))?;
    } else {
        println!("propagation trace complete, terminal state: {terminal}");
    }
    Ok(())
}

pub fn run_full(root: &Path, json: bool) -> anyhow::Result<()> {
    let sim = simulator(root)?;
    sim.run_full()?;
    if json {
        output::print_json(&json!({"scenario": "full", "root": root.display().to_string()}))?;
    } else {
        println!("full scenario complete; see {}/logs/sim.log", root.display());
    }
    Ok(())
}

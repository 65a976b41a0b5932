//! Launch a docker swarm

use super::RunnerSettings;
use crate::config::drivers::MachineArgs;
use crate::exec::DockerMachine;
use crate::services::swarm::{self, SwarmPlan, SwarmReport};
use anyhow::{Context, Result};

/// Create the machines, initialize the manager and join the workers
pub fn handle_create(
    swarm_name: &str,
    node_count: usize,
    machine: &MachineArgs,
    settings: &RunnerSettings,
) -> Result<()> {
    // Everything that can be checked locally is checked before docker-machine runs
    let plan = SwarmPlan::new(swarm_name, node_count)?;
    let options = machine.resolve()?;
    let runner = DockerMachine::new(&settings.machine_bin, settings.timeout)?;

    let report = swarm::launch_swarm(&runner, &plan, &options)
        .with_context(|| format!("Failed to launch swarm '{}'", swarm_name))?;

    print_summary(&plan, &report);
    Ok(())
}

fn print_summary(plan: &SwarmPlan, report: &SwarmReport) {
    println!();
    println!("✓ Swarm '{}' is up ({} nodes)", plan.name, plan.node_count);
    println!(
        "  Manager: {} ({})",
        report.manager.name,
        report.manager.private_address.as_deref().unwrap_or("unknown")
    );
    for worker in &report.workers {
        println!("  Worker:  {}", worker.name);
    }
    println!();
    println!(
        "Run `eval $(docker-machine env {})` to point docker at the manager.",
        report.manager.name
    );
}

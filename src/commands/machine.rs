//! Create one machine without any swarm setup

use super::RunnerSettings;
use crate::config::drivers::MachineArgs;
use crate::exec::DockerMachine;
use crate::services::swarm::provision;
use anyhow::{Context, Result};

pub fn handle_machine(
    machine_name: &str,
    machine: &MachineArgs,
    settings: &RunnerSettings,
) -> Result<()> {
    let options = machine.resolve()?;
    let runner = DockerMachine::new(&settings.machine_bin, settings.timeout)?;

    provision::provision_machine(&runner, machine_name, &options)
        .with_context(|| format!("Failed to create machine '{}'", machine_name))?;

    println!("✓ Machine '{}' created", machine_name);
    Ok(())
}

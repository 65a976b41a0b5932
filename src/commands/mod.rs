// Command module routing
//
// To add a new command:
// 1. Create a new file in this directory (e.g., `mycommand.rs`)
// 2. Add `pub mod mycommand;` below
// 3. Add the match arm in `handle_command` function

pub mod create;
pub mod machine;

use crate::cli_types::{Cli, Commands};
use anyhow::Result;
use std::time::Duration;

/// Settings shared by every command that runs docker-machine
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub machine_bin: String,
    pub timeout: Duration,
}

impl From<&Cli> for RunnerSettings {
    fn from(cli: &Cli) -> Self {
        Self {
            machine_bin: cli.machine_bin.clone(),
            timeout: Duration::from_secs(cli.timeout),
        }
    }
}

/// Dispatch command to appropriate handler
pub fn handle_command(cli: Cli) -> Result<()> {
    let settings = RunnerSettings::from(&cli);

    match cli.command {
        Commands::Create {
            swarm_name,
            node_count,
            machine,
        } => {
            create::handle_create(&swarm_name, node_count, &machine, &settings)?;
        }
        Commands::Machine {
            machine_name,
            machine,
        } => {
            machine::handle_machine(&machine_name, &machine, &settings)?;
        }
    }
    Ok(())
}

// CLI types for dmswarm (used by both library and binary)

use crate::config::drivers::MachineArgs;
use crate::exec::{DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dmswarm")]
#[command(version)]
#[command(about = "Quickly launch a docker swarm on cloud instances created with docker-machine", long_about = None)]
pub struct Cli {
    /// Set the log level to DEBUG, INFO, WARNING, CRITICAL, or ERROR
    #[arg(long, global = true, value_name = "LOG", default_value = "DEBUG")]
    pub log_level: String,

    /// docker-machine executable to run
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_PROGRAM)]
    pub machine_bin: String,

    /// Seconds to wait for each docker-machine call before killing it
    #[arg(long, global = true, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a swarm: one manager node plus workers
    ///
    /// docker-machine's default security group does not open the swarm ports.
    /// Pass --amazonec2-security-group with TCP 2377, 2376, 7946, 22 and
    /// UDP 7946, 4789 open, or prepare a group named `docker-machine`.
    ///
    /// Driver flags given on the command line override the same flags in
    /// --userconfig.
    Create {
        /// Base name for the swarm's machines
        swarm_name: String,
        /// Total number of nodes, manager included
        #[arg(long, value_name = "NODE", default_value_t = 1)]
        node_count: usize,
        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Create a single machine with the resolved driver options
    Machine {
        /// Name of the machine to create
        machine_name: String,
        #[command(flatten)]
        machine: MachineArgs,
    },
}

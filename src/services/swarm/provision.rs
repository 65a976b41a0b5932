//! Machine creation

use super::Node;
use crate::config::OptionSet;
use crate::error::Result;
use crate::exec::{CommandOutcome, MachineRunner};

/// Outcome of `docker-machine create` for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningResult {
    pub node: String,
    pub outcome: CommandOutcome,
}

/// Create a single machine. A non-zero exit is an error.
pub fn provision_machine<R: MachineRunner>(
    runner: &R,
    name: &str,
    options: &OptionSet,
) -> Result<ProvisioningResult> {
    tracing::info!(node = name, "creating {}", name);
    let outcome = runner.create(name, options)?.check("create", name)?;
    tracing::info!(node = name, "✓ {} created", name);

    Ok(ProvisioningResult {
        node: name.to_string(),
        outcome,
    })
}

/// Create every node in order, stopping at the first failure
pub fn provision_nodes<R: MachineRunner>(
    runner: &R,
    nodes: &[Node],
    options: &OptionSet,
) -> Result<Vec<ProvisioningResult>> {
    nodes
        .iter()
        .map(|node| provision_machine(runner, &node.name, options))
        .collect()
}

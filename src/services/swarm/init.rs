//! Swarm initialization on the manager

use crate::error::{Result, SwarmError};
use crate::exec::MachineRunner;
use std::fmt;

/// Substring identifying the worker join command in `docker swarm init` output
pub const JOIN_MARKER: &str = "docker swarm join --token";

/// Remote command that creates the swarm, advertising the manager's private address
pub fn init_command(advertise_addr: &str) -> String {
    format!("sudo docker swarm init --advertise-addr {}", advertise_addr)
}

/// The `docker swarm join --token ...` line printed by the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinToken(String);

impl JoinToken {
    /// First line containing [`JOIN_MARKER`], trimmed
    pub fn from_output(output: &str) -> Option<Self> {
        output
            .lines()
            .find(|line| line.contains(JOIN_MARKER))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| JoinToken(line.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Remote command a worker runs to join
    pub fn join_command(&self) -> String {
        format!("sudo {}", self.0)
    }
}

impl fmt::Display for JoinToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Run `docker swarm init` on the manager and capture the join command
pub fn init_manager<R: MachineRunner>(
    runner: &R,
    manager: &str,
    advertise_addr: &str,
) -> Result<JoinToken> {
    let outcome = runner
        .ssh(manager, &init_command(advertise_addr))?
        .check("ssh", manager)?;

    let token = JoinToken::from_output(&outcome.stdout)
        .or_else(|| JoinToken::from_output(&outcome.stderr))
        .ok_or_else(|| SwarmError::TokenNotFound(manager.to_string()))?;

    tracing::debug!(node = manager, %token, "captured join command");
    Ok(token)
}

//! Manager address lookup via `docker-machine inspect`

use crate::error::{Result, SwarmError};
use crate::exec::MachineRunner;
use serde::Deserialize;
use std::net::IpAddr;

#[derive(Debug, Deserialize)]
struct MachineInspect {
    #[serde(rename = "Driver")]
    driver: InspectDriver,
}

#[derive(Debug, Deserialize)]
struct InspectDriver {
    #[serde(rename = "PrivateIPAddress", default)]
    private_ip_address: Option<String>,
}

/// Pull `Driver.PrivateIPAddress` out of inspect JSON
pub fn parse_private_address(node: &str, stdout: &str) -> Result<String> {
    let parse_error = |message: String| SwarmError::AddressParse {
        node: node.to_string(),
        message,
    };

    let inspect: MachineInspect =
        serde_json::from_str(stdout).map_err(|e| parse_error(e.to_string()))?;

    let address = inspect
        .driver
        .private_ip_address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| parse_error("Driver.PrivateIPAddress is missing".to_string()))?;

    address
        .parse::<IpAddr>()
        .map_err(|_| parse_error(format!("'{}' is not an IP address", address)))?;

    Ok(address)
}

/// Inspect `node` and return its private address
pub fn resolve_private_address<R: MachineRunner>(runner: &R, node: &str) -> Result<String> {
    let outcome = runner.inspect(node)?.check("inspect", node)?;
    parse_private_address(node, &outcome.stdout)
}

//! dmswarm: launch a docker swarm on machines created with docker-machine
//!
//! The library holds the whole pipeline so it can be driven from tests with a
//! fake [`exec::MachineRunner`]; the binary only parses arguments and sets up logging.

pub mod cli_types;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod services;

pub use error::{Result, SwarmError};

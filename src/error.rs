//! Error types for dmswarm

use std::path::PathBuf;
use thiserror::Error;

/// Result type for dmswarm operations
pub type Result<T> = std::result::Result<T, SwarmError>;

/// A worker that could not join the swarm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerJoinFailure {
    pub node: String,
    pub code: Option<i32>,
    pub stderr: String,
}

impl std::fmt::Display for WorkerJoinFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (exit code {})", self.node, code)?,
            None => write!(f, "{} (terminated by signal)", self.node)?,
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, ": {}", stderr)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid log level: {0} (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
    InvalidLogLevel(String),

    #[error("Node count must be at least 1 (got {0})")]
    InvalidNodeCount(usize),

    #[error("External tool not found: {0}")]
    ExternalToolNotFound(String),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} failed for {node} with exit code {}: {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()), .stderr.trim())]
    ExternalToolExit {
        operation: String,
        node: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{operation} for {node} timed out after {secs}s")]
    ExternalToolTimeout {
        operation: String,
        node: String,
        secs: u64,
    },

    #[error("Could not read private address of {node}: {message}")]
    AddressParse { node: String, message: String },

    #[error("No join token found in swarm init output from {0}")]
    TokenNotFound(String),

    #[error("Worker {0}")]
    WorkerJoin(WorkerJoinFailure),

    #[error("{} of {total} workers failed to join: {}", .failed.len(), .failed.iter().map(|f| f.node.as_str()).collect::<Vec<_>>().join(", "))]
    JoinIncomplete {
        failed: Vec<WorkerJoinFailure>,
        total: usize,
    },
}

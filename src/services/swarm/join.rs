//! Joining workers to the swarm

use super::{JoinToken, Node};
use crate::error::{Result, SwarmError, WorkerJoinFailure};
use crate::exec::MachineRunner;

/// Per-worker join results
#[derive(Debug, Clone, Default)]
pub struct JoinReport {
    pub joined: Vec<String>,
    pub failed: Vec<WorkerJoinFailure>,
}

impl JoinReport {
    pub fn total(&self) -> usize {
        self.joined.len() + self.failed.len()
    }

    /// Names of the joined workers, or [`SwarmError::JoinIncomplete`] if any failed
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.failed.is_empty() {
            return Ok(self.joined);
        }
        let total = self.total();
        Err(SwarmError::JoinIncomplete {
            failed: self.failed,
            total,
        })
    }
}

/// Run the join command on one worker
pub fn join_worker<R: MachineRunner>(runner: &R, worker: &str, token: &JoinToken) -> Result<()> {
    tracing::info!(node = worker, "{} is attempting to join the swarm", worker);

    let outcome = runner.ssh(worker, &token.join_command())?;
    if !outcome.success() {
        return Err(SwarmError::WorkerJoin(WorkerJoinFailure {
            node: worker.to_string(),
            code: outcome.code,
            stderr: outcome.stderr,
        }));
    }

    tracing::info!(node = worker, "✓ {} joined", worker);
    Ok(())
}

/// Join every worker in order. A failure is recorded and the next worker is still tried.
pub fn join_workers<R: MachineRunner>(runner: &R, workers: &[Node], token: &JoinToken) -> JoinReport {
    let mut report = JoinReport::default();

    for worker in workers {
        match join_worker(runner, &worker.name, token) {
            Ok(()) => report.joined.push(worker.name.clone()),
            Err(SwarmError::WorkerJoin(failure)) => {
                tracing::error!(node = %failure.node, "failed to join swarm: {}", failure);
                report.failed.push(failure);
            }
            Err(e) => {
                tracing::error!(node = %worker.name, "failed to join swarm: {}", e);
                report.failed.push(WorkerJoinFailure {
                    node: worker.name.clone(),
                    code: None,
                    stderr: e.to_string(),
                });
            }
        }
    }

    report
}

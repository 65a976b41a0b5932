//! Docker swarm bootstrap over docker-machine
//!
//! The pipeline is strictly sequential:
//! create every node, inspect the manager for its private address,
//! `docker swarm init` on the manager, then join each worker with the token.

pub mod init;
pub mod inspect;
pub mod join;
pub mod provision;

#[cfg(test)]
pub(crate) mod testing;

use crate::config::OptionSet;
use crate::error::{Result, SwarmError};
use crate::exec::MachineRunner;
pub use init::JoinToken;
pub use provision::ProvisioningResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Manager,
    Worker,
}

/// A swarm member, backed by one docker-machine host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub role: Role,
    /// Only filled in for the manager, after inspection
    pub private_address: Option<String>,
}

impl Node {
    fn new(name: String, role: Role) -> Self {
        Self {
            name,
            role,
            private_address: None,
        }
    }
}

/// Base name plus total node count (manager included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwarmPlan {
    pub name: String,
    pub node_count: usize,
}

impl SwarmPlan {
    pub fn new(name: &str, node_count: usize) -> Result<Self> {
        if node_count == 0 {
            return Err(SwarmError::InvalidNodeCount(node_count));
        }
        Ok(Self {
            name: name.to_string(),
            node_count,
        })
    }

    pub fn manager_name(&self) -> String {
        format!("{}-manager", self.name)
    }

    pub fn worker_name(&self, index: usize) -> String {
        format!("{}-worker-{}", self.name, index)
    }

    /// Index 0 is the manager, 1..node_count are workers
    pub fn nodes(&self) -> Vec<Node> {
        (0..self.node_count)
            .map(|i| {
                if i == 0 {
                    Node::new(self.manager_name(), Role::Manager)
                } else {
                    Node::new(self.worker_name(i), Role::Worker)
                }
            })
            .collect()
    }
}

/// What a successful swarm launch produced
#[derive(Debug, Clone)]
pub struct SwarmReport {
    pub manager: Node,
    pub workers: Vec<Node>,
    pub token: JoinToken,
    pub provisioned: Vec<ProvisioningResult>,
}

/// Run the whole pipeline. Provisioning, inspection and init fail fast; worker
/// joins are all attempted and any failures are reported together at the end.
pub fn launch_swarm<R: MachineRunner>(
    runner: &R,
    plan: &SwarmPlan,
    options: &OptionSet,
) -> Result<SwarmReport> {
    let mut nodes = plan.nodes();

    tracing::info!(swarm = %plan.name, nodes = nodes.len(), "launching swarm");
    let provisioned = provision::provision_nodes(runner, &nodes, options)?;

    let workers = nodes.split_off(1);
    let mut manager = nodes.remove(0);

    tracing::info!("finding manager ip");
    let address = inspect::resolve_private_address(runner, &manager.name)?;
    tracing::debug!(node = %manager.name, %address, "manager private ip");
    manager.private_address = Some(address.clone());

    tracing::info!("initializing swarm manager");
    let token = init::init_manager(runner, &manager.name, &address)?;

    join::join_workers(runner, &workers, &token).into_result()?;

    Ok(SwarmReport {
        manager,
        workers,
        token,
        provisioned,
    })
}

#[cfg(test)]
mod tests {
    use super::testing::{Call, FakeRunner};
    use super::*;
    use crate::config::MachineOption;

    fn options() -> OptionSet {
        let mut options = OptionSet::new();
        options.insert(MachineOption::value("--driver", "amazonec2"));
        options.insert(MachineOption::value("--amazonec2-region", "us-east-1"));
        options
    }

    #[test]
    fn test_node_names() {
        let plan = SwarmPlan::new("mycluster", 3).unwrap();
        let names: Vec<_> = plan.nodes().into_iter().map(|n| n.name).collect();
        assert_eq!(
            names,
            vec!["mycluster-manager", "mycluster-worker-1", "mycluster-worker-2"]
        );
    }

    #[test]
    fn test_roles() {
        let plan = SwarmPlan::new("mycluster", 2).unwrap();
        let nodes = plan.nodes();
        assert_eq!(nodes[0].role, Role::Manager);
        assert_eq!(nodes[1].role, Role::Worker);
        assert!(nodes.iter().all(|n| n.private_address.is_none()));
    }

    #[test]
    fn test_zero_nodes_rejected() {
        assert!(matches!(
            SwarmPlan::new("mycluster", 0),
            Err(SwarmError::InvalidNodeCount(0))
        ));
    }

    #[test]
    fn test_three_node_swarm_call_sequence() {
        let runner = FakeRunner::new();
        let plan = SwarmPlan::new("mycluster", 3).unwrap();

        let report = launch_swarm(&runner, &plan, &options()).unwrap();

        let join = "sudo docker swarm join --token SWMTKN-1-abc 10.0.0.5:2377";
        assert_eq!(
            runner.calls(),
            vec![
                Call::Create("mycluster-manager".to_string()),
                Call::Create("mycluster-worker-1".to_string()),
                Call::Create("mycluster-worker-2".to_string()),
                Call::Inspect("mycluster-manager".to_string()),
                Call::Ssh(
                    "mycluster-manager".to_string(),
                    "sudo docker swarm init --advertise-addr 10.0.0.5".to_string()
                ),
                Call::Ssh("mycluster-worker-1".to_string(), join.to_string()),
                Call::Ssh("mycluster-worker-2".to_string(), join.to_string()),
            ]
        );
        assert_eq!(report.manager.private_address.as_deref(), Some("10.0.0.5"));
        assert_eq!(report.workers.len(), 2);
        assert_eq!(report.provisioned.len(), 3);
    }

    #[test]
    fn test_single_node_swarm_has_no_joins() {
        let runner = FakeRunner::new();
        let plan = SwarmPlan::new("solo", 1).unwrap();

        let report = launch_swarm(&runner, &plan, &options()).unwrap();

        assert_eq!(runner.calls().len(), 3);
        assert!(report.workers.is_empty());
    }

    #[test]
    fn test_create_failure_aborts_pipeline() {
        let runner = FakeRunner::new().fail_create("mycluster-worker-1");
        let plan = SwarmPlan::new("mycluster", 3).unwrap();

        let err = launch_swarm(&runner, &plan, &options()).unwrap_err();

        assert!(matches!(
            err,
            SwarmError::ExternalToolExit { ref operation, ref node, .. }
                if operation == "create" && node == "mycluster-worker-1"
        ));
        assert_eq!(
            runner.calls(),
            vec![
                Call::Create("mycluster-manager".to_string()),
                Call::Create("mycluster-worker-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_bad_inspect_output_stops_before_init() {
        let runner = FakeRunner::new().inspect_output("not json");
        let plan = SwarmPlan::new("mycluster", 2).unwrap();

        let err = launch_swarm(&runner, &plan, &options()).unwrap_err();

        assert!(matches!(err, SwarmError::AddressParse { .. }));
        assert!(!runner.calls().iter().any(|c| matches!(c, Call::Ssh(..))));
    }

    #[test]
    fn test_missing_token_stops_before_joins() {
        let runner = FakeRunner::new().init_output("Swarm initialized\n");
        let plan = SwarmPlan::new("mycluster", 3).unwrap();

        let err = launch_swarm(&runner, &plan, &options()).unwrap_err();

        assert!(matches!(err, SwarmError::TokenNotFound(ref n) if n == "mycluster-manager"));
        let ssh_calls = runner
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Ssh(..)))
            .count();
        assert_eq!(ssh_calls, 1);
    }

    #[test]
    fn test_failed_worker_does_not_stop_siblings() {
        let runner = FakeRunner::new().fail_join("mycluster-worker-1");
        let plan = SwarmPlan::new("mycluster", 3).unwrap();

        let err = launch_swarm(&runner, &plan, &options()).unwrap_err();

        match err {
            SwarmError::JoinIncomplete { failed, total } => {
                assert_eq!(total, 2);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].node, "mycluster-worker-1");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(
            runner
                .calls()
                .contains(&Call::Ssh(
                    "mycluster-worker-2".to_string(),
                    "sudo docker swarm join --token SWMTKN-1-abc 10.0.0.5:2377".to_string()
                ))
        );
    }
}

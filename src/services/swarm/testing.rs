//! Recording stand-in for docker-machine

use crate::config::OptionSet;
use crate::error::Result;
use crate::exec::{CommandOutcome, MachineRunner};
use std::cell::RefCell;
use std::collections::HashSet;

pub const MANAGER_INSPECT: &str = r#"{"Driver":{"PrivateIPAddress":"10.0.0.5","IPAddress":"54.1.2.3"}}"#;

pub const INIT_OUTPUT: &str = concat!(
    "Swarm initialized: current node (abc) is now a manager.\n",
    "\n",
    "To add a worker to this swarm, run the following command:\n",
    "\n",
    "    docker swarm join --token SWMTKN-1-abc 10.0.0.5:2377\n",
    "\n",
    "To add a manager to this swarm, run 'docker swarm join-token manager' and follow the instructions.\n",
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Inspect(String),
    Ssh(String, String),
}

pub struct FakeRunner {
    calls: RefCell<Vec<Call>>,
    create_args: RefCell<Vec<Vec<String>>>,
    failing_creates: HashSet<String>,
    failing_joins: HashSet<String>,
    inspect_stdout: String,
    init_stdout: String,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            create_args: RefCell::new(Vec::new()),
            failing_creates: HashSet::new(),
            failing_joins: HashSet::new(),
            inspect_stdout: MANAGER_INSPECT.to_string(),
            init_stdout: INIT_OUTPUT.to_string(),
        }
    }

    pub fn fail_create(mut self, node: &str) -> Self {
        self.failing_creates.insert(node.to_string());
        self
    }

    pub fn fail_join(mut self, node: &str) -> Self {
        self.failing_joins.insert(node.to_string());
        self
    }

    pub fn inspect_output(mut self, stdout: &str) -> Self {
        self.inspect_stdout = stdout.to_string();
        self
    }

    pub fn init_output(mut self, stdout: &str) -> Self {
        self.init_stdout = stdout.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn create_args(&self) -> Vec<Vec<String>> {
        self.create_args.borrow().clone()
    }

    fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutcome {
        CommandOutcome {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

impl MachineRunner for FakeRunner {
    fn create(&self, node: &str, options: &OptionSet) -> Result<CommandOutcome> {
        self.calls.borrow_mut().push(Call::Create(node.to_string()));
        self.create_args.borrow_mut().push(options.to_args());
        if self.failing_creates.contains(node) {
            return Ok(Self::exit(1, "", "Error creating machine: quota exceeded"));
        }
        Ok(Self::exit(0, "Docker is up and running!\n", ""))
    }

    fn inspect(&self, node: &str) -> Result<CommandOutcome> {
        self.calls.borrow_mut().push(Call::Inspect(node.to_string()));
        Ok(Self::exit(0, &self.inspect_stdout, ""))
    }

    fn ssh(&self, node: &str, command: &str) -> Result<CommandOutcome> {
        self.calls
            .borrow_mut()
            .push(Call::Ssh(node.to_string(), command.to_string()));
        if command.contains("swarm init") {
            return Ok(Self::exit(0, &self.init_stdout, ""));
        }
        if self.failing_joins.contains(node) {
            return Ok(Self::exit(1, "", "Error response from daemon: Timeout was reached"));
        }
        Ok(Self::exit(0, "This node joined a swarm as a worker.\n", ""))
    }
}

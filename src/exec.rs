//! Running docker-machine
//!
//! Every pipeline stage talks to docker-machine through [`MachineRunner`], so
//! tests can swap in a fake. [`DockerMachine`] is the subprocess-backed runner.

use crate::config::OptionSet;
use crate::error::{Result, SwarmError};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_PROGRAM: &str = "docker-machine";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1800);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Exit status and captured output of one docker-machine call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`SwarmError::ExternalToolExit`]
    pub fn check(self, operation: &str, node: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(SwarmError::ExternalToolExit {
                operation: operation.to_string(),
                node: node.to_string(),
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// The three docker-machine operations the swarm pipeline needs
pub trait MachineRunner {
    /// `docker-machine create <options> <node>`
    fn create(&self, node: &str, options: &OptionSet) -> Result<CommandOutcome>;

    /// `docker-machine inspect <node>`
    fn inspect(&self, node: &str) -> Result<CommandOutcome>;

    /// `docker-machine ssh <node> <command>`
    fn ssh(&self, node: &str, command: &str) -> Result<CommandOutcome>;
}

/// Runs the real docker-machine binary
#[derive(Debug, Clone)]
pub struct DockerMachine {
    program: PathBuf,
    timeout: Duration,
}

impl DockerMachine {
    /// Locate `program` on PATH (or at the given path)
    pub fn new(program: &str, timeout: Duration) -> Result<Self> {
        let program = which::which(program)
            .map_err(|_| SwarmError::ExternalToolNotFound(program.to_string()))?;

        tracing::debug!(program = %program.display(), "using docker-machine binary");

        Ok(Self { program, timeout })
    }

    /// Argument vector for `create`: driver flags first, machine name last
    pub fn create_args(node: &str, options: &OptionSet) -> Vec<String> {
        let mut args = vec!["create".to_string()];
        args.extend(options.to_args());
        args.push(node.to_string());
        args
    }

    pub fn inspect_args(node: &str) -> Vec<String> {
        vec!["inspect".to_string(), node.to_string()]
    }

    pub fn ssh_args(node: &str, command: &str) -> Vec<String> {
        vec!["ssh".to_string(), node.to_string(), command.to_string()]
    }

    fn run(&self, operation: &str, node: &str, args: &[String], shown: &[String]) -> Result<CommandOutcome> {
        let span = tracing::info_span!("docker-machine", op = operation, node = node);
        let _enter = span.enter();

        tracing::debug!(args = ?shown, "running subprocess");

        let program = self.program.display().to_string();
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a timeout also reaches the ssh clients docker-machine starts
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let mut child = command
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SwarmError::ExternalToolNotFound(program.clone()),
                _ => SwarmError::Spawn {
                    program: program.clone(),
                    source: e,
                },
            })?;

        // Drain both pipes so a chatty child never blocks on a full buffer
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() >= self.timeout => {
                    // A grandchild that escaped the group may still hold the pipes,
                    // so the drain threads are left behind instead of joined
                    terminate(&mut child);
                    tracing::error!(secs = self.timeout.as_secs(), "timed out, process killed");
                    return Err(SwarmError::ExternalToolTimeout {
                        operation: operation.to_string(),
                        node: node.to_string(),
                        secs: self.timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    terminate(&mut child);
                    return Err(SwarmError::Spawn { program, source: e });
                }
            }
        };

        let outcome = CommandOutcome {
            code: status.code(),
            stdout: String::from_utf8_lossy(&stdout.join().unwrap_or_default()).into_owned(),
            stderr: String::from_utf8_lossy(&stderr.join().unwrap_or_default()).into_owned(),
        };

        log_outcome(&outcome);
        Ok(outcome)
    }
}

/// Kill the child's whole process group, then reap the child
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        let group = Pid::from_raw(child.id() as i32);
        if let Err(e) = signal::killpg(group, Signal::SIGKILL) {
            tracing::debug!(error = %e, "killpg failed, killing the child only");
            let _ = child.kill();
        }
    }
    #[cfg(not(unix))]
    let _ = child.kill();

    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn log_outcome(outcome: &CommandOutcome) {
    for line in outcome.stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        tracing::info!("{}", line);
    }
    for line in outcome.stderr.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if outcome.success() {
            tracing::debug!("{}", line);
        } else {
            tracing::warn!("{}", line);
        }
    }
    tracing::debug!(code = ?outcome.code, "subprocess exited");
}

impl MachineRunner for DockerMachine {
    fn create(&self, node: &str, options: &OptionSet) -> Result<CommandOutcome> {
        let args = Self::create_args(node, options);
        let mut shown = vec!["create".to_string()];
        shown.extend(options.redacted_args());
        shown.push(node.to_string());
        self.run("create", node, &args, &shown)
    }

    fn inspect(&self, node: &str) -> Result<CommandOutcome> {
        let args = Self::inspect_args(node);
        self.run("inspect", node, &args, &args)
    }

    fn ssh(&self, node: &str, command: &str) -> Result<CommandOutcome> {
        let args = Self::ssh_args(node, command);
        self.run("ssh", node, &args, &args)
    }
}

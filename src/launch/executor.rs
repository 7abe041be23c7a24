use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::{self, Pid};
use std::io::IsTerminal;
use std::os::fd::AsFd;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use super::builder::Invocation;
use crate::error::LaunchError;

/// Runs a built invocation against a container runtime
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute the invocation and return the runtime's exit code
    async fn execute(&self, invocation: &Invocation) -> Result<i32, LaunchError>;
}

/// Executor that spawns the runtime CLI (docker, podman) as a child process
pub struct ProcessExecutor {
    runtime: String,
}

impl ProcessExecutor {
    pub fn new(runtime: impl Into<String>) -> Self {
        ProcessExecutor {
            runtime: runtime.into(),
        }
    }

    /// Locate the runtime executable on PATH (or as given, if it is a path)
    pub fn locate(&self) -> Result<PathBuf, LaunchError> {
        which::which(&self.runtime).map_err(|source| LaunchError::ExecutorUnavailable {
            runtime: self.runtime.clone(),
            source,
        })
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<i32, LaunchError> {
        let program = self.locate()?;
        tracing::debug!("Spawning {} with {} arguments", program.display(), invocation.args().len());

        let mut child = Command::new(&program)
            .args(invocation.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        // On interrupt we keep waiting for the runtime to exit. A child in the
        // terminal's foreground group already received the SIGINT itself.
        let forward = forwards_interrupt(terminal_owns_process_group());
        let status = loop {
            tokio::select! {
                status = child.wait() => {
                    break status.map_err(|source| LaunchError::Wait {
                        program: program.clone(),
                        source,
                    })?;
                }
                _ = tokio::signal::ctrl_c() => {
                    if !forward {
                        tracing::warn!("Interrupt received, waiting for {} to exit", self.runtime);
                    } else if let Some(pid) = child.id() {
                        tracing::warn!("Interrupt received, forwarding SIGINT to {}", self.runtime);
                        if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGINT) {
                            tracing::warn!("Failed to forward interrupt: {}", e);
                        }
                    }
                }
            }
        };

        Ok(exit_code(status))
    }
}

/// Whether simlaunch runs in the foreground process group of its terminal
fn terminal_owns_process_group() -> bool {
    let stdin = std::io::stdin();
    let stderr = std::io::stderr();
    let group = unistd::getpgrp();
    let owns = [stdin.as_fd(), stderr.as_fd()]
        .into_iter()
        .filter(|fd| fd.is_terminal())
        .any(|fd| unistd::tcgetpgrp(fd).map_or(false, |fg| fg == group));
    owns
}

/// SIGINT is only sent to the child when the terminal did not already deliver it
fn forwards_interrupt(in_terminal_foreground: bool) -> bool {
    !in_terminal_foreground
}

/// Exit code of the runtime; signal deaths map to 128 + signal like a shell
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

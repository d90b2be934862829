use std::process::Stdio;

use async_trait::async_trait;
use configtable::{RestartResponse, RestartTrigger, service::ServiceResult};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Restarts the system by running a shell command; exit status 0 means the
/// restart was accepted.
#[derive(Debug, Clone)]
pub struct CommandRestartTrigger {
    command: String,
}

impl CommandRestartTrigger {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl RestartTrigger for CommandRestartTrigger {
    async fn restart_system(&self) -> ServiceResult<RestartResponse> {
        info!(command = %self.command, "running restart command");
        let output = shell(&self.command)
            .stdin(Stdio::null())
            .output()
            .await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "restart command stderr");
        }
        if !output.status.success() {
            warn!(status = %output.status, "restart command failed");
        }
        Ok(RestartResponse {
            ok: output.status.success(),
        })
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::traits::Link;

/// Remote host reached through the system `ssh` client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub connect_timeout: Duration,
}

impl SshConfig {
    pub const DEFAULT_PORT: u16 = 22;
    pub const DEFAULT_USER: &'static str = "root";
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            user: Self::DEFAULT_USER.to_string(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// `user@host`
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// Executes every written command on the remote host.
///
/// Uses batch mode, so authentication must work without a prompt (keys or
/// an agent).
#[derive(Debug)]
pub struct SshLink {
    name: String,
    config: SshConfig,
    stdout: String,
    stderr: String,
}

impl SshLink {
    const PROGRAM: &'static str = "ssh";

    pub fn new(config: SshConfig) -> Self {
        info!(destination = %config.destination(), port = config.port, "using ssh link");
        Self {
            name: config.destination(),
            config,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn args(&self, text: &str) -> Vec<String> {
        vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.config.connect_timeout.as_secs().max(1)),
            "-p".to_string(),
            self.config.port.to_string(),
            self.config.destination(),
            text.to_string(),
        ]
    }
}

impl Link for SshLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        debug!(link = %self.name, command = %text, "S>>");
        let output = Command::new(Self::PROGRAM)
            .args(self.args(text))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| LinkError::Spawn {
                program: Self::PROGRAM.to_string(),
                source: e,
            })?;
        debug!(link = %self.name, status = %output.status, "ssh finished");
        self.stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        self.stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Ok(())
    }

    fn read(&mut self) -> Result<String> {
        let reply = reply(
            &std::mem::take(&mut self.stdout),
            &std::mem::take(&mut self.stderr),
        );
        debug!(link = %self.name, reply = %reply, "<<S");
        Ok(reply)
    }
}

/// Stdout when there is any, otherwise stderr flagged as an error.
fn reply(stdout: &str, stderr: &str) -> String {
    if stdout.is_empty() {
        format!("ERROR: {stderr}")
    } else {
        stdout.to_string()
    }
}

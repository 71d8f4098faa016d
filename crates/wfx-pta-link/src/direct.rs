use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{LinkError, Result};
use crate::traits::Link;

/// Runs each command through the local shell.
///
/// Every command gets a hard wall-clock limit covering both the shell and
/// its output pipes. A shell still running when it expires is killed; a pipe
/// still held open by a background child is abandoned. Either way the call
/// fails with [`LinkError::Timeout`].
#[derive(Debug)]
pub struct DirectLink {
    name: String,
    timeout: Duration,
    output: Option<String>,
}

impl DirectLink {
    /// Default per-command limit.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    const POLL_INTERVAL: Duration = Duration::from_millis(10);

    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            name: "direct".to_string(),
            timeout,
            output: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn shell(text: &str) -> Command {
        #[cfg(windows)]
        {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(text);
            command
        }
        #[cfg(not(windows))]
        {
            let mut command = Command::new("sh");
            command.arg("-c").arg(text);
            command
        }
    }

    fn execute(&self, text: &str) -> Result<String> {
        let deadline = Instant::now() + self.timeout;
        let mut child = Self::shell(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LinkError::Spawn {
                program: text.to_string(),
                source: e,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let Some(status) = wait_with_deadline(&mut child, deadline)? else {
            // Pipe readers are left detached; they end once the pipes close.
            let _ = child.kill();
            let _ = child.wait();
            return Err(self.timed_out(text));
        };

        let (Some(stdout), Some(stderr)) = (collect(stdout, deadline), collect(stderr, deadline))
        else {
            debug!(link = %self.name, %status, "output still open at deadline");
            return Err(self.timed_out(text));
        };
        debug!(link = %self.name, %status, "command finished");
        if !stderr.is_empty() {
            trace!(link = %self.name, stderr = %stderr.trim(), "command stderr");
        }
        Ok(stdout.trim().to_string())
    }

    fn timed_out(&self, text: &str) -> LinkError {
        LinkError::Timeout {
            command: text.to_string(),
            after: self.timeout,
        }
    }
}

impl Default for DirectLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Link for DirectLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, text: &str) -> Result<()> {
        debug!(link = %self.name, command = %text.trim(), "D>>");
        self.output = Some(self.execute(text.trim())?);
        Ok(())
    }

    fn read(&mut self) -> Result<String> {
        let reply = self.output.take().unwrap_or_default();
        debug!(link = %self.name, reply = %reply, "<<D");
        Ok(reply)
    }
}

/// Poll `child` until it exits or `deadline` passes.
///
/// Returns `None` when the deadline passed with the child still running.
fn wait_with_deadline(
    child: &mut Child,
    deadline: Instant,
) -> Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(DirectLink::POLL_INTERVAL.min(deadline - now));
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Everything written to a pipe, or `None` if it is still open at `deadline`.
fn collect(pipe: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<String> {
    let Some(pipe) = pipe else {
        return Some(String::new());
    };
    match pipe.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

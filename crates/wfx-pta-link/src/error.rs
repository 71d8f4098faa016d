use std::time::Duration;

/// Errors that can occur on a command link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The link could not be opened.
    #[error("failed to open {target}: {source}")]
    Open {
        target: String,
        source: std::io::Error,
    },

    /// An I/O error occurred on an open link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command did not complete in time and was killed.
    #[error("command timed out after {after:?}: {command}")]
    Timeout { command: String, after: Duration },

    /// The serial console answered but `wfx_test_agent` did not.
    #[error("no wfx_test_agent on {port}; the port answers but the agent is missing")]
    AgentMissing { port: String },

    /// The Telnet login handshake failed.
    #[error("telnet login to {host} failed: {reason}")]
    Login { host: String, reason: String },

    /// A local program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LinkError>;

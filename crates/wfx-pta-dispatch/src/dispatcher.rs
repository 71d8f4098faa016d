use std::time::Duration;

use tracing::{debug, info};

use wfx_pta_frame::Frame;
use wfx_pta_link::Link;

use crate::error::Result;
use crate::hif::{hif_command, HifStatus, DEFAULT_EXEC_COMMAND};

/// How frames are handed to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Command that receives the escaped frame as its only argument.
    pub exec_command: String,
    /// Delay between writing the command and reading the reply.
    pub wait: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            exec_command: DEFAULT_EXEC_COMMAND.to_string(),
            wait: Duration::ZERO,
        }
    }
}

/// Sends frames over a [`Link`], one request per frame.
#[derive(Debug)]
pub struct Dispatcher<L> {
    link: L,
    config: DispatchConfig,
}

impl<L: Link> Dispatcher<L> {
    pub fn new(link: L) -> Self {
        Self::with_config(link, DispatchConfig::default())
    }

    pub fn with_config(link: L, config: DispatchConfig) -> Self {
        Self { link, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn into_inner(self) -> L {
        self.link
    }

    /// The shell command line that would carry `frame`.
    pub fn command_for(&self, frame: &Frame) -> String {
        hif_command(&self.config.exec_command, frame)
    }

    /// Send `frame` and interpret the reply.
    ///
    /// A link timeout surfaces as [`DispatchError::Timeout`](crate::DispatchError::Timeout);
    /// every other link error is passed through unchanged.
    pub fn send(&mut self, frame: &Frame) -> Result<HifStatus> {
        let command = self.command_for(frame);
        debug!(link = self.link.name(), command = %command, "sending frame");

        let reply = self.link.run(&command, self.config.wait)?;
        let status = HifStatus::from_reply(&reply);

        info!(
            link = self.link.name(),
            pta = %frame.command(),
            status = %status,
            "frame sent"
        );
        Ok(status)
    }
}

use std::time::Duration;

use tracing::info;

use crate::direct::DirectLink;
use crate::error::Result;
use crate::ssh::{SshConfig, SshLink};
use crate::telnet::{TelnetConfig, TelnetLink};
use crate::traits::Link;
use crate::uart::{UartConfig, UartLink};

/// Which link to open and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkConfig {
    /// Local shell with a per-command limit.
    Direct { timeout: Duration },
    Uart(UartConfig),
    Ssh(SshConfig),
    Telnet(TelnetConfig),
}

impl LinkConfig {
    /// Short kind name for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "direct",
            Self::Uart(_) => "uart",
            Self::Ssh(_) => "ssh",
            Self::Telnet(_) => "telnet",
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::Direct {
            timeout: DirectLink::DEFAULT_TIMEOUT,
        }
    }
}

/// Open the link described by `config`.
pub fn open(config: &LinkConfig) -> Result<Box<dyn Link>> {
    info!(kind = config.kind(), "opening link");
    let link: Box<dyn Link> = match config {
        LinkConfig::Direct { timeout } => Box::new(DirectLink::with_timeout(*timeout)),
        LinkConfig::Uart(uart) => Box::new(UartLink::open(uart)?),
        LinkConfig::Ssh(ssh) => Box::new(SshLink::new(ssh.clone())),
        LinkConfig::Telnet(telnet) => Box::new(TelnetLink::open(telnet)?),
    };
    Ok(link)
}

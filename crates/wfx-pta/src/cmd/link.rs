use std::time::Duration;

use clap::{Args, ValueEnum};

use wfx_pta_dispatch::{DispatchConfig, DEFAULT_EXEC_COMMAND};
use wfx_pta_link::{LinkConfig, SshConfig, TelnetConfig, UartConfig};

use crate::exit::{CliError, CliResult, USAGE};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LinkKind {
    /// Local shell.
    #[default]
    Direct,
    /// Serial console running the test agent.
    Uart,
    /// System `ssh` client.
    Ssh,
    Telnet,
}

/// How `-x` reaches the target.
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Link used to send frames.
    #[arg(
        long = "link",
        value_name = "KIND",
        env = "WFX_PTA_LINK",
        default_value = "direct",
        global = true
    )]
    pub kind: LinkKind,

    /// Serial port for the uart link, e.g. /dev/ttyUSB0 or COM8.
    #[arg(long, value_name = "PORT", env = "WFX_PTA_PORT", global = true)]
    pub port: Option<String>,

    /// Serial baud rate.
    #[arg(
        long,
        value_name = "BAUD",
        env = "WFX_PTA_BAUD",
        default_value_t = UartConfig::DEFAULT_BAUD,
        global = true
    )]
    pub baud: u32,

    /// Host for the ssh and telnet links.
    #[arg(long, value_name = "HOST", env = "WFX_PTA_HOST", global = true)]
    pub host: Option<String>,

    /// TCP port for the ssh and telnet links (default 22 or 23).
    #[arg(long, value_name = "PORT", env = "WFX_PTA_REMOTE_PORT", global = true)]
    pub remote_port: Option<u16>,

    /// Login user (default root for ssh, pi for telnet).
    #[arg(long, value_name = "USER", env = "WFX_PTA_USER", global = true)]
    pub user: Option<String>,

    /// Telnet password.
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "WFX_PTA_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    pub password: Option<String>,

    /// Command that receives the escaped frame.
    #[arg(
        long,
        value_name = "COMMAND",
        env = "WFX_PTA_EXEC",
        default_value = DEFAULT_EXEC_COMMAND,
        global = true
    )]
    pub exec: String,

    /// Limit for a direct command, or for ssh connect and telnet login (e.g. 500ms, 15s).
    #[arg(
        long,
        value_name = "DURATION",
        env = "WFX_PTA_TIMEOUT",
        default_value = "15s",
        global = true
    )]
    pub timeout: String,

    /// Delay between sending a command and reading its reply.
    #[arg(long, value_name = "DURATION", env = "WFX_PTA_WAIT", global = true)]
    pub wait: Option<String>,
}

impl LinkArgs {
    pub fn link_config(&self) -> CliResult<LinkConfig> {
        let timeout = parse_duration(&self.timeout)?;

        let config = match self.kind {
            LinkKind::Direct => LinkConfig::Direct { timeout },
            LinkKind::Uart => {
                let port = self
                    .port
                    .as_deref()
                    .ok_or_else(|| CliError::new(USAGE, "--link uart requires --port"))?;
                LinkConfig::Uart(UartConfig {
                    baud: self.baud,
                    ..UartConfig::new(port)
                })
            }
            LinkKind::Ssh => {
                let mut ssh = SshConfig::new(self.require_host("ssh")?);
                if let Some(port) = self.remote_port {
                    ssh.port = port;
                }
                if let Some(user) = &self.user {
                    ssh.user = user.clone();
                }
                ssh.connect_timeout = timeout;
                LinkConfig::Ssh(ssh)
            }
            LinkKind::Telnet => {
                let mut telnet = TelnetConfig::new(self.require_host("telnet")?);
                if let Some(port) = self.remote_port {
                    telnet.port = port;
                }
                if let Some(user) = &self.user {
                    telnet.user = user.clone();
                }
                telnet.password = self.password.clone();
                telnet.login_timeout = timeout;
                LinkConfig::Telnet(telnet)
            }
        };
        Ok(config)
    }

    pub fn dispatch_config(&self) -> CliResult<DispatchConfig> {
        let wait = match &self.wait {
            Some(wait) => parse_duration(wait)?,
            None => Duration::ZERO,
        };
        Ok(DispatchConfig {
            exec_command: self.exec.clone(),
            wait,
        })
    }

    fn require_host(&self, kind: &str) -> CliResult<&str> {
        self.host
            .as_deref()
            .ok_or_else(|| CliError::new(USAGE, format!("--link {kind} requires --host")))
    }
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

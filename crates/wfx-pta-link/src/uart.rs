use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::traits::Link;

/// Serial console settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartConfig {
    /// Port name, e.g. `/dev/ttyUSB0` or `COM8`.
    pub port: String,
    pub baud: u32,
    /// How long a read waits for the next byte before the reply is considered complete.
    pub read_timeout: Duration,
    /// Check that `wfx_test_agent` answers right after opening.
    pub probe_agent: bool,
}

impl UartConfig {
    pub const DEFAULT_BAUD: u32 = 115_200;
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud: Self::DEFAULT_BAUD,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            probe_agent: true,
        }
    }
}

/// A serial console running the WFx test agent. 8N1, no flow control.
pub struct UartLink {
    name: String,
    port: Box<dyn SerialPort>,
}

impl UartLink {
    const AGENT_PROBE: &'static str = "wfx_test_agent";

    /// Open the port and, if configured, probe for the agent.
    pub fn open(config: &UartConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud)
            .timeout(config.read_timeout)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|e| LinkError::Open {
                target: config.port.clone(),
                source: e.into(),
            })?;
        info!(port = %config.port, baud = config.baud, "opened uart link");

        let mut link = Self {
            name: config.port.clone(),
            port,
        };

        if config.probe_agent {
            let reply = link.run(Self::AGENT_PROBE, Duration::ZERO)?;
            if reply.is_empty() {
                return Err(LinkError::AgentMissing {
                    port: config.port.clone(),
                });
            }
        }
        Ok(link)
    }
}

impl std::fmt::Debug for UartLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UartLink").field("name", &self.name).finish()
    }
}

impl Link for UartLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, text: &str) -> Result<()> {
        debug!(link = %self.name, command = %text.trim(), "U>>");
        self.port.write_all(format!("{}\n", text.trim()).as_bytes())?;
        self.port.flush()?;
        Ok(())
    }

    fn read(&mut self) -> Result<String> {
        let reply = read_lines(&mut self.port)?;
        debug!(link = %self.name, reply = %reply, "<<U");
        Ok(reply)
    }
}

/// Gather trimmed lines until an empty line or a read timeout.
fn read_lines<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<String> {
    let mut lines = Vec::new();
    loop {
        let line = read_line(reader)?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

fn read_line<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) => bytes.push(byte[0]),
            Err(e) if e.kind() == ErrorKind::TimedOut => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::error::{LinkError, Result};
use crate::traits::Link;

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

/// Telnet session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelnetConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    /// Idle time after which a reply is considered complete.
    pub read_timeout: Duration,
    /// Limit for each login prompt to show up.
    pub login_timeout: Duration,
}

impl TelnetConfig {
    pub const DEFAULT_PORT: u16 = 23;
    pub const DEFAULT_USER: &'static str = "pi";

    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            user: Self::DEFAULT_USER.to_string(),
            password: None,
            read_timeout: Duration::from_millis(500),
            login_timeout: Duration::from_secs(10),
        }
    }
}

/// A logged-in Telnet session.
///
/// Replies are cleaned of shell noise: the echoed command line and the
/// prompt that follows the output are dropped.
#[derive(Debug)]
pub struct TelnetLink {
    name: String,
    stream: TcpStream,
    /// Last command sent, as the shell will echo it.
    sent: Option<String>,
}

impl TelnetLink {
    /// Connect and walk through the `login:` / `Password:` prompts.
    pub fn open(config: &TelnetConfig) -> Result<Self> {
        let target = format!("{}:{}", config.host, config.port);
        let stream =
            TcpStream::connect((config.host.as_str(), config.port)).map_err(|e| LinkError::Open {
                target: target.clone(),
                source: e,
            })?;
        stream.set_read_timeout(Some(config.read_timeout))?;
        info!(%target, user = %config.user, "opened telnet link");

        let mut link = Self {
            name: format!("{}@{}", config.user, config.host),
            stream,
            sent: None,
        };

        link.expect("login: ", config)?;
        link.send_line(&config.user)?;
        if let Some(password) = &config.password {
            link.expect("Password: ", config)?;
            link.send_line(password)?;
        }
        link.settle(config)?;
        Ok(link)
    }

    /// Discard the banner and first prompt shown after login.
    fn settle(&mut self, config: &TelnetConfig) -> Result<()> {
        let deadline = Instant::now() + config.login_timeout;
        let mut buf = [0u8; 512];
        while Instant::now() < deadline {
            match self.stream.read(&mut buf) {
                Ok(0) => return Err(login_error(config, "connection closed".to_string())),
                Ok(n) => {
                    let text = self.filter(&buf[..n])?;
                    trace!(link = %self.name, text = %text.trim(), "discarded after login");
                }
                Err(e) if is_idle(&e) => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Read until `prompt` shows up or the login timeout passes.
    fn expect(&mut self, prompt: &str, config: &TelnetConfig) -> Result<()> {
        let deadline = Instant::now() + config.login_timeout;
        let mut seen = String::new();
        let mut buf = [0u8; 512];
        loop {
            if seen.contains(prompt) {
                trace!(link = %self.name, prompt, "prompt seen");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(login_error(config, format!("no {prompt:?} prompt")));
            }
            match self.stream.read(&mut buf) {
                Ok(0) => return Err(login_error(config, "connection closed".to_string())),
                Ok(n) => seen.push_str(&self.filter(&buf[..n])?),
                Err(e) if is_idle(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn send_line(&mut self, text: &str) -> Result<()> {
        self.stream.write_all(format!("{}\n", text.trim()).as_bytes())?;
        self.stream.flush()?;
        Ok(())
    }

    /// Strip option negotiation from `input`, refusing every option.
    fn filter(&mut self, input: &[u8]) -> Result<String> {
        let (text, replies) = negotiate(input);
        if !replies.is_empty() {
            self.stream.write_all(&replies)?;
        }
        Ok(String::from_utf8_lossy(&text).into_owned())
    }
}

impl Link for TelnetLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, text: &str) -> Result<()> {
        debug!(link = %self.name, command = %text.trim(), "T>>");
        self.sent = Some(text.trim().to_string());
        self.send_line(text)
    }

    fn read(&mut self) -> Result<String> {
        let mut reply = String::new();
        let mut buf = [0u8; 512];
        loop {
            match self.stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => reply.push_str(&self.filter(&buf[..n])?),
                Err(e) if is_idle(&e) => break,
                Err(e) => return Err(e.into()),
            }
        }
        let reply = shell_reply(&reply, self.sent.take().as_deref());
        debug!(link = %self.name, reply = %reply, "<<T");
        Ok(reply)
    }
}

/// Output lines of a shell exchange.
///
/// Drops blank lines, the line echoing `sent` (possibly behind a prompt),
/// and a trailing unterminated line that ends like a shell prompt.
fn shell_reply(raw: &str, sent: Option<&str>) -> String {
    let raw = raw.replace("\r\n", "\n").replace('\r', "\n");
    let (complete, tail) = match raw.rfind('\n') {
        Some(end) => (&raw[..end], &raw[end + 1..]),
        None => ("", raw.as_str()),
    };
    let tail = tail.trim();
    let tail = (!is_prompt(tail)).then_some(tail);

    complete
        .lines()
        .chain(tail)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !sent.is_some_and(|sent| !sent.is_empty() && line.ends_with(sent)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_prompt(line: &str) -> bool {
    line.ends_with(['$', '#', '>', '%'])
}

fn is_idle(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

fn login_error(config: &TelnetConfig, reason: String) -> LinkError {
    LinkError::Login {
        host: config.host.clone(),
        reason,
    }
}

/// Split Telnet commands out of a chunk.
///
/// Returns the data bytes and the refusals to send back: `WONT` for every
/// `DO`, `DONT` for every `WILL`. Subnegotiations are dropped. A command
/// split across chunks is treated as data.
fn negotiate(input: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut text = Vec::with_capacity(input.len());
    let mut replies = Vec::new();
    let mut i = 0;
    while i < input.len() {
        if input[i] != IAC || i + 1 >= input.len() {
            text.push(input[i]);
            i += 1;
            continue;
        }
        match input[i + 1] {
            IAC => {
                text.push(IAC);
                i += 2;
            }
            DO | DONT | WILL | WONT if i + 2 < input.len() => {
                let option = input[i + 2];
                match input[i + 1] {
                    DO => replies.extend_from_slice(&[IAC, WONT, option]),
                    WILL => replies.extend_from_slice(&[IAC, DONT, option]),
                    _ => {}
                }
                i += 3;
            }
            SB => {
                let end = input[i..]
                    .windows(2)
                    .position(|pair| pair == [IAC, SE])
                    .map_or(input.len(), |at| i + at + 2);
                i = end;
            }
            _ => i += 2,
        }
    }
    (text, replies)
}

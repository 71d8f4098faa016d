//! Text command links to a WFx target.
//!
//! A link carries one shell command line to the machine driving the radio and
//! brings its textual reply back:
//! - [`DirectLink`]: the local shell, with a hard timeout
//! - [`UartLink`]: a serial console running `wfx_test_agent`
//! - [`SshLink`]: the system `ssh` client in batch mode
//! - [`TelnetLink`]: a plain Telnet session
//!
//! Everything above this layer only sees the [`Link`] trait.

pub mod config;
pub mod direct;
pub mod error;
pub mod ssh;
pub mod telnet;
pub mod traits;
pub mod uart;

pub use config::{open, LinkConfig};
pub use direct::DirectLink;
pub use error::{LinkError, Result};
pub use ssh::{SshConfig, SshLink};
pub use telnet::{TelnetConfig, TelnetLink};
pub use traits::Link;
pub use uart::{UartConfig, UartLink};

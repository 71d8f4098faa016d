//! Dispatch of encoded PTA frames to a WFx target.
//!
//! This is the boundary layer. A frame is rendered as an escaped byte string,
//! wrapped in the `wfx_exec wfx_hif_send_msg` shell command, handed to a
//! [`Link`](wfx_pta_link::Link), and the single-character reply is mapped to a
//! [`HifStatus`]. Nothing is retried.

pub mod dispatcher;
pub mod error;
pub mod hif;
pub mod target;

pub use dispatcher::{DispatchConfig, Dispatcher};
pub use error::{DispatchError, Result};
pub use hif::{hif_command, HifStatus, DEFAULT_EXEC_COMMAND};
pub use target::{Applied, Prepared, PtaTarget};

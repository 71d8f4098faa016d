//! Binary framing of resolved PTA commands.
//!
//! Every frame is laid out as:
//! - A 2-byte little-endian total length (header included)
//! - A 2-byte little-endian HIF command id
//! - The payload, one field per encoded parameter in table order
//!
//! Encoding is a pure function of the [`ResolvedCommand`](wfx_pta_schema::ResolvedCommand);
//! frames are never decoded.

pub mod codec;
pub mod error;

pub use codec::{encode, escape, FieldSpan, Frame, HEADER_SIZE, MAX_FRAME_LEN};
pub use error::{FrameError, Result};

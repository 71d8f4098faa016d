//! Encode WFx PTA coexistence commands into HIF frames.
//!
//! wfx-pta turns named PTA options (`settings`, `priority`, `state`) into the
//! binary frame the WFx firmware expects, and can send that frame to a target
//! over a shell, serial, SSH or Telnet link.
//!
//! # Crate Structure
//!
//! - [`schema`]: Parameter tables, presets and value resolution
//! - [`frame`]: Binary frame encoding
//! - [`link`]: Command links to a target (behind `dispatch` feature)
//! - [`dispatch`]: Frame dispatch and HIF status (behind `dispatch` feature)

/// Re-export schema types.
pub mod schema {
    pub use wfx_pta_schema::*;
}

/// Re-export frame types.
pub mod frame {
    pub use wfx_pta_frame::*;
}

/// Re-export link types (requires `dispatch` feature).
#[cfg(feature = "dispatch")]
pub mod link {
    pub use wfx_pta_link::*;
}

/// Re-export dispatch types (requires `dispatch` feature).
#[cfg(feature = "dispatch")]
pub mod dispatch {
    pub use wfx_pta_dispatch::*;
}

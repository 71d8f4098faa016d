use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use wfx_pta_frame::Frame;

/// Shell command that forwards a raw HIF message to the driver.
pub const DEFAULT_EXEC_COMMAND: &str = "wfx_exec wfx_hif_send_msg";

/// Build the shell command line that sends `frame`: `<exec> "<escaped frame>"`.
pub fn hif_command(exec: &str, frame: &Frame) -> String {
    format!("{} \"{}\"", exec.trim(), frame.escaped())
}

/// Status the firmware returned for a HIF request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HifStatus {
    Success,
    Failure,
    InvalidParameter,
    UnsupportedCommand,
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl HifStatus {
    /// Interpret the trimmed reply of `wfx_exec`.
    pub fn from_reply(reply: &str) -> Self {
        match reply.trim() {
            "0" => Self::Success,
            "1" => Self::Failure,
            "2" => Self::InvalidParameter,
            "4" => Self::UnsupportedCommand,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Numeric HIF status, if the reply was a known one.
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Success => Some(0),
            Self::Failure => Some(1),
            Self::InvalidParameter => Some(2),
            Self::UnsupportedCommand => Some(4),
            Self::Unknown(_) => None,
        }
    }

    /// Firmware constant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success => "HI_STATUS_SUCCESS",
            Self::Failure => "HI_STATUS_FAILURE",
            Self::InvalidParameter => "HI_INVALID_PARAMETER",
            Self::UnsupportedCommand => "HI_ERROR_UNSUPPORTED_MSG_ID",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn is_success(&self) -> bool {
        *self == Self::Success
    }
}

impl fmt::Display for HifStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.code()) {
            (Self::Unknown(reply), _) => write!(f, "unknown reply {reply:?}"),
            (_, Some(code)) => write!(f, "{} ({code})", self.name()),
            (_, None) => f.write_str(self.name()),
        }
    }
}

impl Serialize for HifStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HifStatus", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("code", &self.code())?;
        let reply = match self {
            Self::Unknown(reply) => Some(reply.as_str()),
            _ => None,
        };
        state.serialize_field("reply", &reply)?;
        state.end()
    }
}

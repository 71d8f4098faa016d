use std::fmt;
use std::io;

use wfx_pta_dispatch::{DispatchError, HifStatus};
use wfx_pta_frame::FrameError;
use wfx_pta_link::LinkError;
use wfx_pta_schema::{ResolveError, SchemaError};

// 0, 1, 2 and 4 double as firmware HIF status codes when a frame is sent.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const HIF_INVALID_PARAMETER: i32 = 2;
pub const TRANSPORT_ERROR: i32 = 3;
pub const HIF_UNSUPPORTED: i32 = 4;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for a firmware reply. Unknown replies count as failure.
pub fn status_code(status: &HifStatus) -> i32 {
    match status {
        HifStatus::Success => SUCCESS,
        HifStatus::Failure => FAILURE,
        HifStatus::InvalidParameter => HIF_INVALID_PARAMETER,
        HifStatus::UnsupportedCommand => HIF_UNSUPPORTED,
        HifStatus::Unknown(_) => FAILURE,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    CliError::new(INTERNAL, format!("{context}: {err}"))
}

pub fn resolve_error(context: &str, err: ResolveError) -> CliError {
    let code = match err {
        ResolveError::MissingRequiredParameter { .. }
        | ResolveError::UnknownParameter { .. }
        | ResolveError::ConflictingPreset { .. } => USAGE,
        ResolveError::UnknownPreset { .. }
        | ResolveError::InvalidChoice { .. }
        | ResolveError::ValueOutOfRange { .. } => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::FrameTooLarge { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Open { target, source } => io_error(&format!("{context}: {target}"), source),
        LinkError::Io(source) => io_error(context, source),
        LinkError::Timeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn dispatch_error(context: &str, err: DispatchError) -> CliError {
    match err {
        DispatchError::Link(err) => link_error(context, err),
        DispatchError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        DispatchError::Schema(err) => schema_error(context, err),
        DispatchError::Resolve(err) => resolve_error(context, err),
        DispatchError::Frame(err) => frame_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wfx_pta_schema::PtaCommand;

    #[test]
    fn firmware_statuses_map_to_their_codes() {
        assert_eq!(status_code(&HifStatus::Success), 0);
        assert_eq!(status_code(&HifStatus::Failure), 1);
        assert_eq!(status_code(&HifStatus::InvalidParameter), 2);
        assert_eq!(status_code(&HifStatus::UnsupportedCommand), 4);
        assert_eq!(status_code(&HifStatus::Unknown("x".to_string())), 1);
    }

    #[test]
    fn resolution_errors_split_usage_and_data() {
        let missing = ResolveError::MissingRequiredParameter {
            command: PtaCommand::State,
            parameter: "State",
        };
        assert_eq!(resolve_error("state", missing).code, USAGE);

        let invalid = ResolveError::InvalidChoice {
            command: PtaCommand::State,
            parameter: "State",
            value: "MAYBE".to_string(),
            expected: "OFF, ON".to_string(),
        };
        let err = resolve_error("state", invalid);
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("State"));
    }

    #[test]
    fn dispatch_timeout_is_timeout() {
        let err = dispatch_error("send failed", DispatchError::Timeout(Duration::from_secs(15)));
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn missing_agent_is_transport_error() {
        let err = link_error(
            "open failed",
            LinkError::AgentMissing {
                port: "COM8".to_string(),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}

use std::time::Duration;

/// Errors that can occur while preparing or sending a PTA frame.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Link-level error, passed through unchanged.
    #[error("link error: {0}")]
    Link(wfx_pta_link::LinkError),

    /// The link gave up waiting for the target.
    #[error("execution timed out after {0:?}")]
    Timeout(Duration),

    /// The built-in tables failed validation.
    #[error("schema error: {0}")]
    Schema(#[from] wfx_pta_schema::SchemaError),

    /// The options did not resolve.
    #[error(transparent)]
    Resolve(#[from] wfx_pta_schema::ResolveError),

    /// The resolved command could not be encoded.
    #[error("frame error: {0}")]
    Frame(#[from] wfx_pta_frame::FrameError),
}

impl From<wfx_pta_link::LinkError> for DispatchError {
    fn from(err: wfx_pta_link::LinkError) -> Self {
        match err {
            wfx_pta_link::LinkError::Timeout { after, .. } => Self::Timeout(after),
            other => Self::Link(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

use wfx_pta_schema::PtaCommand;

/// Errors that can occur during frame encoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A resolved value has no integer code or does not fit its field.
    ///
    /// Values produced by the resolver never trigger this.
    #[error("cannot encode {value} for {command} parameter {parameter}")]
    EncodingInconsistency {
        command: PtaCommand,
        parameter: &'static str,
        value: String,
    },

    /// The frame would not fit the 16-bit length field.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Controls resolver behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveConfig {
    /// When true, every value changed by a preset or an override is returned
    /// as a [`TraceRecord`](crate::TraceRecord). Changes are logged at debug
    /// level either way.
    pub record_trace: bool,
}

impl ResolveConfig {
    /// Config that keeps the change trace.
    pub fn traced() -> Self {
        Self { record_trace: true }
    }
}

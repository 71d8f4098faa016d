use crate::command::PtaCommand;

/// Errors raised while building command tables and presets.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Two rows of one table share a name.
    #[error("duplicate parameter {name} in {command} table")]
    DuplicateParameter {
        command: PtaCommand,
        name: &'static str,
    },

    /// Two choices of one row share a name.
    #[error("duplicate choice {choice} for {command} parameter {name}")]
    DuplicateChoice {
        command: PtaCommand,
        name: &'static str,
        choice: &'static str,
    },

    /// A choice code does not fit the row's byte width.
    #[error("choice {choice} of {command} parameter {name} does not fit {width} byte(s)")]
    CodeOutOfRange {
        command: PtaCommand,
        name: &'static str,
        choice: &'static str,
        width: usize,
    },

    /// A row's default is not a legal value for that row.
    #[error("invalid default {value} for {command} parameter {name} (expected {expected})")]
    InvalidDefault {
        command: PtaCommand,
        name: &'static str,
        value: String,
        expected: String,
    },

    /// A table was registered under the wrong command.
    #[error("table for {found} registered as {expected}")]
    TableMismatch {
        expected: PtaCommand,
        found: PtaCommand,
    },

    /// Two presets share a name.
    #[error("duplicate preset {0}")]
    DuplicatePreset(&'static str),

    /// A preset cannot be selected, or the selector names a preset that does not exist.
    #[error("preset {0} is not both defined and selectable through Config")]
    PresetMismatch(&'static str),

    /// A preset assigns a parameter that the settings table does not encode.
    #[error("preset {preset} assigns unknown settings parameter {name}")]
    UnknownPresetParameter {
        preset: &'static str,
        name: &'static str,
    },

    /// A preset assigns a value the row would refuse.
    #[error("preset {preset} assigns invalid value {value} to {name} (expected {expected})")]
    InvalidPresetValue {
        preset: &'static str,
        name: &'static str,
        value: String,
        expected: String,
    },
}

/// Errors raised while resolving user options into concrete values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A parameter without a default was given neither a preset nor a user value.
    #[error("missing required parameter {parameter} for {command}")]
    MissingRequiredParameter {
        command: PtaCommand,
        parameter: &'static str,
    },

    /// The named preset does not exist for this command.
    #[error("unknown preset {name} for {command}")]
    UnknownPreset { command: PtaCommand, name: String },

    /// The option name is not part of the command's table.
    #[error("unknown parameter {parameter} for {command}")]
    UnknownParameter {
        command: PtaCommand,
        parameter: String,
    },

    /// The value is not one of the parameter's accepted values.
    #[error("invalid value {value} for {command} parameter {parameter} (expected {expected})")]
    InvalidChoice {
        command: PtaCommand,
        parameter: &'static str,
        value: String,
        expected: String,
    },

    /// A numeric value does not fit the parameter's byte width.
    #[error("value {value} for {command} parameter {parameter} exceeds {max}")]
    ValueOutOfRange {
        command: PtaCommand,
        parameter: &'static str,
        value: u64,
        max: u64,
    },

    /// The preset argument and a `Config` override name different presets.
    #[error("conflicting presets {explicit} and {selected}")]
    ConflictingPreset { explicit: String, selected: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;

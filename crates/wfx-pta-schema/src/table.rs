use std::collections::HashSet;

use crate::command::PtaCommand;
use crate::error::{Result, SchemaError};
use crate::param::{ParameterSpec, ValueKind};

/// Ordered parameter rows of one command.
///
/// Row order is the payload byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    command: PtaCommand,
    params: Vec<ParameterSpec>,
}

impl CommandTable {
    /// Build a table, rejecting rows that could not be encoded.
    pub fn new(command: PtaCommand, params: impl Into<Vec<ParameterSpec>>) -> Result<Self> {
        let params = params.into();
        let mut names = HashSet::new();

        for spec in &params {
            if !names.insert(spec.name) {
                return Err(SchemaError::DuplicateParameter {
                    command,
                    name: spec.name,
                });
            }
            check_choices(command, spec)?;
            check_default(command, spec)?;
        }

        Ok(Self { command, params })
    }

    pub fn command(&self) -> PtaCommand {
        self.command
    }

    /// Look a row up by exact name.
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    /// Every row, in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, ParameterSpec> {
        self.params.iter()
    }

    /// Rows that are packed into the payload, in table order.
    pub fn encoded(&self) -> impl Iterator<Item = &ParameterSpec> + '_ {
        self.params.iter().filter(|spec| spec.is_encoded())
    }

    /// The preset selector row, if this table has one.
    pub fn selector(&self) -> Option<&ParameterSpec> {
        self.params.iter().find(|spec| !spec.is_encoded())
    }

    /// Payload size in bytes once every encoded row is packed.
    pub fn payload_len(&self) -> usize {
        self.encoded().map(|spec| spec.width.bytes()).sum()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommandTable {
    type Item = &'a ParameterSpec;
    type IntoIter = std::slice::Iter<'a, ParameterSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn check_choices(command: PtaCommand, spec: &ParameterSpec) -> Result<()> {
    let ValueKind::Symbolic(choices) = spec.kind else {
        return Ok(());
    };

    let mut seen = HashSet::new();
    for choice in choices {
        if !seen.insert(choice.name) {
            return Err(SchemaError::DuplicateChoice {
                command,
                name: spec.name,
                choice: choice.name,
            });
        }
        if spec.is_encoded() && u64::from(choice.code) > spec.width.max_value() {
            return Err(SchemaError::CodeOutOfRange {
                command,
                name: spec.name,
                choice: choice.name,
                width: spec.width.bytes(),
            });
        }
    }
    Ok(())
}

fn check_default(command: PtaCommand, spec: &ParameterSpec) -> Result<()> {
    let Some(default) = &spec.default else {
        return Ok(());
    };

    match spec.admit(default) {
        // A numeric row must carry an integer default, not text that happens to parse.
        Ok(_) if spec.kind == ValueKind::Numeric && default.as_int().is_none() => {
            Err(invalid_default(command, spec))
        }
        Ok(_) => Ok(()),
        Err(_) => Err(invalid_default(command, spec)),
    }
}

fn invalid_default(command: PtaCommand, spec: &ParameterSpec) -> SchemaError {
    SchemaError::InvalidDefault {
        command,
        name: spec.name,
        value: spec
            .default
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        expected: spec.expected(),
    }
}

//! PTA command identifiers.
//!
//! Each command travels to the firmware with a fixed 16-bit message id.

use std::fmt;

use serde::Serialize;

/// HIF message id of the PTA settings request.
pub const SETTINGS_ID: u16 = 0x002B;

/// HIF message id of the PTA priority request.
pub const PRIORITY_ID: u16 = 0x002C;

/// HIF message id of the PTA state request.
pub const STATE_ID: u16 = 0x002D;

/// One of the three PTA commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PtaCommand {
    Settings,
    Priority,
    State,
}

impl PtaCommand {
    /// All commands in wire-id order.
    pub const ALL: [PtaCommand; 3] = [Self::Settings, Self::Priority, Self::State];

    /// The HIF message id carried in the frame header.
    pub const fn id(self) -> u16 {
        match self {
            Self::Settings => SETTINGS_ID,
            Self::Priority => PRIORITY_ID,
            Self::State => STATE_ID,
        }
    }

    /// Lower-case command name as typed on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Priority => "priority",
            Self::State => "state",
        }
    }

    /// Parse a command name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Look a command up by its message id.
    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }
}

impl fmt::Display for PtaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_hif_constants() {
        assert_eq!(PtaCommand::Settings.id(), 0x002B);
        assert_eq!(PtaCommand::Priority.id(), 0x002C);
        assert_eq!(PtaCommand::State.id(), 0x002D);
    }

    #[test]
    fn from_name_ignores_case() {
        assert_eq!(PtaCommand::from_name("STATE"), Some(PtaCommand::State));
        assert_eq!(PtaCommand::from_name("Priority"), Some(PtaCommand::Priority));
        assert_eq!(PtaCommand::from_name(" settings "), Some(PtaCommand::Settings));
        assert_eq!(PtaCommand::from_name("reset"), None);
    }

    #[test]
    fn from_id_roundtrips_every_command() {
        for command in PtaCommand::ALL {
            assert_eq!(PtaCommand::from_id(command.id()), Some(command));
        }
        assert_eq!(PtaCommand::from_id(0x0001), None);
    }
}

use std::collections::HashSet;

use crate::command::PtaCommand;
use crate::error::{Result, SchemaError};
use crate::preset::Preset;
use crate::table::CommandTable;
use crate::tables::{builtin_presets, PRIORITY_PARAMETERS, SETTINGS_PARAMETERS, STATE_PARAMETERS};

/// Validated command tables and `settings` presets.
///
/// Read-only once built; share it by reference between resolvers.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    settings: CommandTable,
    priority: CommandTable,
    state: CommandTable,
    presets: Vec<Preset>,
}

impl SchemaRegistry {
    /// Build the registry from the built-in firmware tables.
    pub fn builtin() -> Result<Self> {
        Self::from_parts(
            CommandTable::new(PtaCommand::Settings, SETTINGS_PARAMETERS.to_vec())?,
            CommandTable::new(PtaCommand::Priority, PRIORITY_PARAMETERS.to_vec())?,
            CommandTable::new(PtaCommand::State, STATE_PARAMETERS.to_vec())?,
            builtin_presets(),
        )
    }

    /// Assemble a registry from explicit tables and presets.
    ///
    /// Each table must belong to the slot it is passed in. Every preset must
    /// be selectable through the settings selector row and may only assign
    /// encoded settings parameters with values those rows accept.
    pub fn from_parts(
        settings: CommandTable,
        priority: CommandTable,
        state: CommandTable,
        presets: Vec<Preset>,
    ) -> Result<Self> {
        for (expected, table) in [
            (PtaCommand::Settings, &settings),
            (PtaCommand::Priority, &priority),
            (PtaCommand::State, &state),
        ] {
            if table.command() != expected {
                return Err(SchemaError::TableMismatch {
                    expected,
                    found: table.command(),
                });
            }
        }

        check_presets(&settings, &presets)?;

        Ok(Self {
            settings,
            priority,
            state,
            presets,
        })
    }

    /// Table of one command.
    pub fn table(&self, command: PtaCommand) -> &CommandTable {
        match command {
            PtaCommand::Settings => &self.settings,
            PtaCommand::Priority => &self.priority,
            PtaCommand::State => &self.state,
        }
    }

    /// Look a preset up by exact name.
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.name == name)
    }

    /// All presets in declaration order.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Preset names in declaration order.
    pub fn preset_names(&self) -> Vec<&'static str> {
        self.presets.iter().map(|preset| preset.name).collect()
    }
}

fn check_presets(settings: &CommandTable, presets: &[Preset]) -> Result<()> {
    let selectable: HashSet<&str> = settings
        .selector()
        .map(|spec| spec.kind.choices().iter().map(|choice| choice.name).collect())
        .unwrap_or_default();

    let mut seen = HashSet::new();
    for preset in presets {
        if !seen.insert(preset.name) {
            return Err(SchemaError::DuplicatePreset(preset.name));
        }
        if !selectable.contains(preset.name) {
            return Err(SchemaError::PresetMismatch(preset.name));
        }

        for (name, value) in preset.values() {
            let spec = settings
                .get(name)
                .filter(|spec| spec.is_encoded())
                .ok_or(SchemaError::UnknownPresetParameter {
                    preset: preset.name,
                    name: *name,
                })?;
            if spec.admit(value).is_err() {
                return Err(SchemaError::InvalidPresetValue {
                    preset: preset.name,
                    name: spec.name,
                    value: value.to_string(),
                    expected: spec.expected(),
                });
            }
        }
    }

    // Every selectable name needs a preset behind it.
    let choices = settings.selector().map(|spec| spec.kind.choices()).unwrap_or(&[]);
    if let Some(missing) = choices.iter().find(|choice| !seen.contains(choice.name)) {
        return Err(SchemaError::PresetMismatch(missing.name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{ByteWidth, Choice, ParameterSpec, Value};

    const ONE_PRESET: &[Choice] = &[Choice::new("FAST", 0)];
    const SWITCH: &[Choice] = &[Choice::new("OFF", 0), Choice::new("ON", 1)];

    fn small_settings() -> CommandTable {
        CommandTable::new(
            PtaCommand::Settings,
            vec![
                ParameterSpec::selector("Config", ONE_PRESET, ""),
                ParameterSpec::numeric("CoexQuota", ByteWidth::Two, Some(7500), ""),
            ],
        )
        .unwrap()
    }

    fn switch_table(command: PtaCommand) -> CommandTable {
        CommandTable::new(
            command,
            vec![ParameterSpec::symbolic("State", ByteWidth::Four, SWITCH, None, "")],
        )
        .unwrap()
    }

    #[test]
    fn builtin_registry_is_valid() {
        let registry = SchemaRegistry::builtin().expect("built-in tables should validate");
        assert_eq!(registry.table(PtaCommand::Settings).len(), 18);
        assert_eq!(registry.table(PtaCommand::Settings).payload_len(), 20);
        assert_eq!(registry.table(PtaCommand::Priority).payload_len(), 4);
        assert_eq!(registry.table(PtaCommand::State).payload_len(), 4);
        assert_eq!(
            registry.preset_names(),
            ["3W_BLE", "3W_NOT_COMBINED_ZIGBEE", "3W_COMBINED_ZIGBEE"]
        );
    }

    #[test]
    fn rejects_table_in_wrong_slot() {
        let result = SchemaRegistry::from_parts(
            small_settings(),
            switch_table(PtaCommand::State),
            switch_table(PtaCommand::State),
            Vec::new(),
        );
        assert!(matches!(
            result,
            Err(SchemaError::TableMismatch {
                expected: PtaCommand::Priority,
                ..
            })
        ));
    }

    #[test]
    fn rejects_preset_with_unknown_parameter() {
        static BAD: [(&str, Value); 1] = [("Turbo", Value::int(1))];
        let result = SchemaRegistry::from_parts(
            small_settings(),
            switch_table(PtaCommand::Priority),
            switch_table(PtaCommand::State),
            vec![Preset::new("FAST", &BAD)],
        );
        assert!(matches!(
            result,
            Err(SchemaError::UnknownPresetParameter { name: "Turbo", .. })
        ));
    }

    #[test]
    fn rejects_preset_value_too_wide() {
        static BAD: [(&str, Value); 1] = [("CoexQuota", Value::int(70_000))];
        let result = SchemaRegistry::from_parts(
            small_settings(),
            switch_table(PtaCommand::Priority),
            switch_table(PtaCommand::State),
            vec![Preset::new("FAST", &BAD)],
        );
        assert!(matches!(
            result,
            Err(SchemaError::InvalidPresetValue { .. })
        ));
    }

    #[test]
    fn rejects_selector_without_preset() {
        let result = SchemaRegistry::from_parts(
            small_settings(),
            switch_table(PtaCommand::Priority),
            switch_table(PtaCommand::State),
            Vec::new(),
        );
        assert!(matches!(result, Err(SchemaError::PresetMismatch("FAST"))));
    }

    #[test]
    fn reports_first_missing_preset_in_table_order() {
        const THREE: &[Choice] = &[
            Choice::new("FAST", 0),
            Choice::new("MEDIUM", 1),
            Choice::new("SLOW", 2),
        ];
        static OK: [(&str, Value); 1] = [("CoexQuota", Value::int(1))];
        let settings = CommandTable::new(
            PtaCommand::Settings,
            vec![
                ParameterSpec::selector("Config", THREE, ""),
                ParameterSpec::numeric("CoexQuota", ByteWidth::Two, Some(7500), ""),
            ],
        )
        .unwrap();

        for _ in 0..8 {
            let result = SchemaRegistry::from_parts(
                settings.clone(),
                switch_table(PtaCommand::Priority),
                switch_table(PtaCommand::State),
                vec![Preset::new("SLOW", &OK)],
            );
            assert!(matches!(result, Err(SchemaError::PresetMismatch("FAST"))));
        }
    }

    #[test]
    fn rejects_unselectable_preset() {
        static OK: [(&str, Value); 1] = [("CoexQuota", Value::int(1))];
        let result = SchemaRegistry::from_parts(
            small_settings(),
            switch_table(PtaCommand::Priority),
            switch_table(PtaCommand::State),
            vec![Preset::new("FAST", &OK), Preset::new("SLOW", &OK)],
        );
        assert!(matches!(result, Err(SchemaError::PresetMismatch("SLOW"))));
    }
}

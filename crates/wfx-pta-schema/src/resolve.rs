//! Resolution of user options into one concrete value per parameter.
//!
//! Precedence, lowest to highest:
//! 1. table default
//! 2. preset value (`settings` only)
//! 3. user override
//!
//! Every call builds a fresh [`ResolvedCommand`]; nothing is shared or mutated
//! across calls.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::command::PtaCommand;
use crate::config::ResolveConfig;
use crate::error::ResolveError;
use crate::param::{ParameterSpec, Rejection, Value};
use crate::preset::ValueMap;
use crate::registry::SchemaRegistry;
use crate::table::CommandTable;

/// User-supplied values keyed by parameter name.
pub type Overrides = BTreeMap<String, Value>;

/// Which step of resolution changed a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStage {
    Preset,
    Override,
}

/// One value change observed during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    pub field: &'static str,
    pub old: Option<Value>,
    pub new: Value,
    pub stage: TraceStage,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.stage {
            TraceStage::Preset => "=>",
            TraceStage::Override => "->",
        };
        let old = self
            .old
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        write!(f, "{:<30} {:>8} {} {:>8}", self.field, old, arrow, self.new)
    }
}

/// A parameter row together with its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameter {
    pub spec: ParameterSpec,
    pub value: Value,
}

/// Every encoded parameter of one command with exactly one concrete value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    command: PtaCommand,
    preset: Option<&'static str>,
    parameters: Vec<ResolvedParameter>,
}

impl ResolvedCommand {
    pub fn command(&self) -> PtaCommand {
        self.command
    }

    /// The preset that was overlaid, if any.
    pub fn preset(&self) -> Option<&'static str> {
        self.preset
    }

    /// Resolved parameters in table order.
    pub fn parameters(&self) -> &[ResolvedParameter] {
        &self.parameters
    }

    /// Resolved value of one parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|parameter| parameter.spec.name == name)
            .map(|parameter| &parameter.value)
    }
}

/// Result of a resolution: the command plus the optional change trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub command: ResolvedCommand,
    pub trace: Vec<TraceRecord>,
}

/// Resolves options against a borrowed [`SchemaRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r SchemaRegistry,
    config: ResolveConfig,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, ResolveConfig::default())
    }

    pub fn with_config(registry: &'r SchemaRegistry, config: ResolveConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Resolve `command` with an optional preset and user overrides.
    ///
    /// A `Config` entry in `overrides` selects a preset the same way `preset`
    /// does. All validation happens before any value is materialised.
    pub fn resolve(
        &self,
        command: PtaCommand,
        preset: Option<&str>,
        overrides: &Overrides,
    ) -> Result<Resolution, ResolveError> {
        let table = self.registry.table(command);
        let (selected, user) = admit_overrides(table, overrides)?;
        let preset_name = choose_preset(preset, selected)?;

        let mut trace = Vec::new();
        let mut current: ValueMap = table
            .encoded()
            .filter_map(|spec| spec.default.clone().map(|value| (spec.name, value)))
            .collect();

        let mut preset_used = None;
        if let Some(name) = preset_name {
            let preset = match command {
                PtaCommand::Settings => self.registry.preset(&name),
                PtaCommand::Priority | PtaCommand::State => None,
            }
            .ok_or_else(|| ResolveError::UnknownPreset {
                command,
                name: name.clone(),
            })?;

            debug!(%command, preset = preset.name, "applying preset");
            let overlaid = preset.overlay(&current);
            for spec in table.encoded() {
                let old = current.get(spec.name);
                if let Some(new) = overlaid.get(spec.name) {
                    if old != Some(new) {
                        self.record(&mut trace, spec.name, old.cloned(), new.clone(), TraceStage::Preset);
                    }
                }
            }
            current = overlaid;
            preset_used = Some(preset.name);
        }

        for (name, value) in user {
            let old = current.get(name).cloned();
            if old.as_ref() != Some(&value) {
                self.record(&mut trace, name, old, value.clone(), TraceStage::Override);
                current.insert(name, value);
            }
        }

        let parameters = table
            .encoded()
            .map(|spec| {
                current
                    .remove(spec.name)
                    .map(|value| ResolvedParameter {
                        spec: spec.clone(),
                        value,
                    })
                    .ok_or(ResolveError::MissingRequiredParameter {
                        command,
                        parameter: spec.name,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Resolution {
            command: ResolvedCommand {
                command,
                preset: preset_used,
                parameters,
            },
            trace,
        })
    }

    fn record(
        &self,
        trace: &mut Vec<TraceRecord>,
        field: &'static str,
        old: Option<Value>,
        new: Value,
        stage: TraceStage,
    ) {
        debug!(field, old = ?old, new = %new, ?stage, "parameter changed");
        if self.config.record_trace {
            trace.push(TraceRecord {
                field,
                old,
                new,
                stage,
            });
        }
    }
}

/// Validate every override against the table.
///
/// Returns the preset selected through the selector row, if any, and the
/// admitted values of encoded rows in table order.
fn admit_overrides(
    table: &CommandTable,
    overrides: &Overrides,
) -> Result<(Option<String>, Vec<(&'static str, Value)>), ResolveError> {
    let command = table.command();
    let mut selected = None;

    for name in overrides.keys() {
        if table.get(name).is_none() {
            return Err(ResolveError::UnknownParameter {
                command,
                parameter: name.clone(),
            });
        }
    }

    let mut user = Vec::new();
    for spec in table {
        let Some(raw) = overrides.get(spec.name) else {
            continue;
        };
        if !spec.is_encoded() {
            selected = Some(raw.to_string());
            continue;
        }
        let value = spec
            .admit(raw)
            .map_err(|rejection| rejection_error(command, spec, raw, rejection))?;
        user.push((spec.name, value));
    }

    Ok((selected, user))
}

fn choose_preset(
    explicit: Option<&str>,
    selected: Option<String>,
) -> Result<Option<String>, ResolveError> {
    match (explicit, selected) {
        (Some(explicit), Some(selected)) if explicit != selected => {
            Err(ResolveError::ConflictingPreset {
                explicit: explicit.to_string(),
                selected,
            })
        }
        (Some(explicit), _) => Ok(Some(explicit.to_string())),
        (None, selected) => Ok(selected),
    }
}

fn rejection_error(
    command: PtaCommand,
    spec: &ParameterSpec,
    raw: &Value,
    rejection: Rejection,
) -> ResolveError {
    match rejection {
        Rejection::OutOfRange { value, max } => ResolveError::ValueOutOfRange {
            command,
            parameter: spec.name,
            value,
            max,
        },
        Rejection::NotAChoice | Rejection::NotAnInteger => ResolveError::InvalidChoice {
            command,
            parameter: spec.name,
            value: raw.to_string(),
            expected: spec.expected(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builtin().expect("built-in registry")
    }

    fn overrides(pairs: &[(&str, Value)]) -> Overrides {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn settings_without_preset_uses_defaults() {
        let registry = registry();
        let resolution = Resolver::new(&registry)
            .resolve(PtaCommand::Settings, None, &Overrides::new())
            .unwrap();
        let resolved = resolution.command;

        assert_eq!(resolved.preset(), None);
        assert_eq!(resolved.parameters().len(), 17);
        assert_eq!(resolved.get("PtaMode"), Some(&Value::symbol("3W")));
        assert_eq!(resolved.get("FirstSlotTime"), Some(&Value::int(150)));
        assert_eq!(resolved.get("Config"), None);
        assert!(resolution.trace.is_empty());
    }

    #[test]
    fn preset_overrides_defaults() {
        let registry = registry();
        let resolved = Resolver::new(&registry)
            .resolve(PtaCommand::Settings, Some("3W_BLE"), &Overrides::new())
            .unwrap()
            .command;

        assert_eq!(resolved.preset(), Some("3W_BLE"));
        assert_eq!(resolved.get("CoexType"), Some(&Value::symbol("BLE")));
        assert_eq!(resolved.get("FirstSlotTime"), Some(&Value::int(0)));
        assert_eq!(resolved.get("GrantValidTime"), Some(&Value::int(72)));
    }

    #[test]
    fn user_value_beats_preset() {
        let registry = registry();
        let resolved = Resolver::new(&registry)
            .resolve(
                PtaCommand::Settings,
                Some("3W_NOT_COMBINED_ZIGBEE"),
                &overrides(&[("FirstSlotTime", Value::int(123))]),
            )
            .unwrap()
            .command;

        assert_eq!(resolved.get("FirstSlotTime"), Some(&Value::int(123)));
        assert_eq!(resolved.get("GrantValidTime"), Some(&Value::int(20)));
    }

    #[test]
    fn explicit_default_value_still_overrides_preset() {
        let registry = registry();
        let resolved = Resolver::new(&registry)
            .resolve(
                PtaCommand::Settings,
                Some("3W_BLE"),
                &overrides(&[("CoexType", Value::from("GENERIC".to_string()))]),
            )
            .unwrap()
            .command;

        assert_eq!(resolved.get("CoexType"), Some(&Value::symbol("GENERIC")));
    }

    #[test]
    fn trace_records_preset_and_override_changes() {
        let registry = registry();
        let resolution = Resolver::with_config(&registry, ResolveConfig::traced())
            .resolve(
                PtaCommand::Settings,
                Some("3W_BLE"),
                &overrides(&[
                    ("GrantValidTime", Value::int(40)),
                    ("CoexQuota", Value::int(7500)),
                ]),
            )
            .unwrap();

        let preset_fields: Vec<_> = resolution
            .trace
            .iter()
            .filter(|record| record.stage == TraceStage::Preset)
            .map(|record| record.field)
            .collect();
        assert_eq!(
            preset_fields,
            [
                "CoexType",
                "TxRxSamplingTime",
                "FreqSamplingTime",
                "FirstSlotTime",
                "PeriodicTxRxSamplingTime"
            ]
        );

        let overridden: Vec<_> = resolution
            .trace
            .iter()
            .filter(|record| record.stage == TraceStage::Override)
            .collect();
        assert_eq!(overridden.len(), 1);
        assert_eq!(overridden[0].field, "GrantValidTime");
        assert_eq!(overridden[0].old, Some(Value::int(72)));
        assert_eq!(overridden[0].new, Value::int(40));
    }

    #[test]
    fn trace_is_empty_unless_enabled() {
        let registry = registry();
        let resolution = Resolver::new(&registry)
            .resolve(PtaCommand::Settings, Some("3W_BLE"), &Overrides::new())
            .unwrap();
        assert!(resolution.trace.is_empty());
    }

    #[test]
    fn trace_record_display_aligns_columns() {
        let record = TraceRecord {
            field: "CoexType",
            old: Some(Value::symbol("GENERIC")),
            new: Value::symbol("BLE"),
            stage: TraceStage::Preset,
        };
        assert_eq!(
            record.to_string(),
            format!("{:<30} {:>8} => {:>8}", "CoexType", "GENERIC", "BLE")
        );
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let registry = registry();
        let err = Resolver::new(&registry)
            .resolve(PtaCommand::Settings, Some("4W_WIFI"), &Overrides::new())
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownPreset {
                command: PtaCommand::Settings,
                name: "4W_WIFI".to_string()
            }
        );
    }

    #[test]
    fn preset_on_state_is_rejected() {
        let registry = registry();
        let err = Resolver::new(&registry)
            .resolve(
                PtaCommand::State,
                Some("3W_BLE"),
                &overrides(&[("State", Value::from("ON".to_string()))]),
            )
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownPreset { .. }));
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let registry = registry();
        let err = Resolver::new(&registry)
            .resolve(
                PtaCommand::Priority,
                None,
                &overrides(&[("State", Value::from("ON".to_string()))]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownParameter {
                command: PtaCommand::Priority,
                parameter: "State".to_string()
            }
        );
    }

    #[test]
    fn invalid_choice_is_rejected() {
        let registry = registry();
        let err = Resolver::new(&registry)
            .resolve(
                PtaCommand::Priority,
                None,
                &overrides(&[("PriorityMode", Value::from("LOUD".to_string()))]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidChoice {
                parameter: "PriorityMode",
                ..
            }
        ));
    }

    #[test]
    fn numeric_text_is_accepted_but_words_are_not() {
        let registry = registry();
        let resolver = Resolver::new(&registry);

        let resolved = resolver
            .resolve(
                PtaCommand::Settings,
                None,
                &overrides(&[("CoexQuota", Value::from("0x100".to_string()))]),
            )
            .unwrap()
            .command;
        assert_eq!(resolved.get("CoexQuota"), Some(&Value::int(256)));

        let err = resolver
            .resolve(
                PtaCommand::Settings,
                None,
                &overrides(&[("CoexQuota", Value::from("lots".to_string()))]),
            )
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidChoice { .. }));
    }

    #[test]
    fn oversized_numeric_value_is_rejected() {
        let registry = registry();
        let err = Resolver::new(&registry)
            .resolve(
                PtaCommand::Settings,
                None,
                &overrides(&[("GrantValidTime", Value::int(256))]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::ValueOutOfRange {
                command: PtaCommand::Settings,
                parameter: "GrantValidTime",
                value: 256,
                max: 255
            }
        );
    }

    #[test]
    fn missing_priority_mode_is_reported() {
        let registry = registry();
        let err = Resolver::new(&registry)
            .resolve(PtaCommand::Priority, None, &Overrides::new())
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingRequiredParameter {
                command: PtaCommand::Priority,
                parameter: "PriorityMode"
            }
        );
    }

    #[test]
    fn config_override_selects_preset() {
        let registry = registry();
        let resolved = Resolver::new(&registry)
            .resolve(
                PtaCommand::Settings,
                None,
                &overrides(&[("Config", Value::from("3W_COMBINED_ZIGBEE".to_string()))]),
            )
            .unwrap()
            .command;
        assert_eq!(resolved.preset(), Some("3W_COMBINED_ZIGBEE"));
        assert_eq!(
            resolved.get("SimultaneousRxAccesses"),
            Some(&Value::symbol("TRUE"))
        );
    }

    #[test]
    fn conflicting_presets_are_rejected() {
        let registry = registry();
        let err = Resolver::new(&registry)
            .resolve(
                PtaCommand::Settings,
                Some("3W_BLE"),
                &overrides(&[("Config", Value::from("3W_COMBINED_ZIGBEE".to_string()))]),
            )
            .unwrap_err();
        assert!(matches!(err, ResolveError::ConflictingPreset { .. }));
    }

    #[test]
    fn resolution_is_repeatable() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let input = overrides(&[("WlanQuota", Value::int(5000))]);
        let first = resolver
            .resolve(PtaCommand::Settings, Some("3W_BLE"), &input)
            .unwrap();
        let second = resolver
            .resolve(PtaCommand::Settings, Some("3W_BLE"), &input)
            .unwrap();
        assert_eq!(first, second);
    }
}

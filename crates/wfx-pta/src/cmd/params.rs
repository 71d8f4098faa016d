//! Command-line flags generated from the parameter tables.
//!
//! Every table row becomes a `--<Name>` flag: symbolic rows accept exactly
//! their choice names, numeric rows accept decimal or `0x` hex integers. The
//! preset selector (or, without one, the required row) can also be given as
//! a single positional value, which is matched ignoring case.

use std::marker::PhantomData;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Args, FromArgMatches};

use wfx_pta_schema::tables::{PRIORITY_PARAMETERS, SETTINGS_PARAMETERS, STATE_PARAMETERS};
use wfx_pta_schema::{Overrides, ParameterSpec, PtaCommand, Value, ValueKind};

const SHORTHAND_ID: &str = "shorthand";

/// Ties a flag set to one command's table.
pub trait CommandRows {
    const COMMAND: PtaCommand;
}

#[derive(Debug, Clone, Copy)]
pub struct SettingsRows;

#[derive(Debug, Clone, Copy)]
pub struct PriorityRows;

#[derive(Debug, Clone, Copy)]
pub struct StateRows;

impl CommandRows for SettingsRows {
    const COMMAND: PtaCommand = PtaCommand::Settings;
}

impl CommandRows for PriorityRows {
    const COMMAND: PtaCommand = PtaCommand::Priority;
}

impl CommandRows for StateRows {
    const COMMAND: PtaCommand = PtaCommand::State;
}

/// Parameter values given on the command line for one command.
#[derive(Debug, Clone)]
pub struct ParamArgs<C> {
    pub overrides: Overrides,
    rows: PhantomData<C>,
}

impl<C: CommandRows> ParamArgs<C> {
    pub fn command(&self) -> PtaCommand {
        C::COMMAND
    }
}

pub fn rows(command: PtaCommand) -> &'static [ParameterSpec] {
    match command {
        PtaCommand::Settings => &SETTINGS_PARAMETERS,
        PtaCommand::Priority => &PRIORITY_PARAMETERS,
        PtaCommand::State => &STATE_PARAMETERS,
    }
}

/// Row the positional value stands for.
fn shorthand_row(rows: &'static [ParameterSpec]) -> Option<&'static ParameterSpec> {
    rows.iter()
        .find(|spec| !spec.is_encoded())
        .or_else(|| rows.iter().find(|spec| spec.is_required()))
}

fn choice_names(spec: &ParameterSpec) -> Vec<&'static str> {
    spec.kind.choices().iter().map(|choice| choice.name).collect()
}

fn parse_integer(text: &str) -> Result<u64, String> {
    match Value::parse(text) {
        Value::Int(value) => Ok(value),
        Value::Symbol(_) => Err(format!("`{text}` is not a decimal or 0x-prefixed integer")),
    }
}

fn flag(spec: &'static ParameterSpec) -> Arg {
    let mut help = spec.help.to_string();
    if let Some(default) = &spec.default {
        help.push_str(&format!(" [default: {default}]"));
    }

    let arg = Arg::new(spec.name).long(spec.name).help(help);
    match spec.kind {
        ValueKind::Symbolic(_) => arg
            .value_name("VALUE")
            .value_parser(PossibleValuesParser::new(choice_names(spec))),
        ValueKind::Numeric => arg.value_name("INT").value_parser(parse_integer),
    }
}

fn matches_error(err: impl std::fmt::Display) -> clap::Error {
    clap::Error::raw(ErrorKind::ValueValidation, err)
}

impl<C: CommandRows> Args for ParamArgs<C> {
    fn augment_args(cmd: clap::Command) -> clap::Command {
        let rows = rows(C::COMMAND);
        let mut cmd = cmd;

        if let Some(spec) = shorthand_row(rows) {
            cmd = cmd.arg(
                Arg::new(SHORTHAND_ID)
                    .value_name("VALUE")
                    .help(format!("Shorthand for --{}", spec.name))
                    .ignore_case(true)
                    .value_parser(
                        PossibleValuesParser::new(choice_names(spec))
                            .map(|value| value.to_ascii_uppercase()),
                    )
                    .conflicts_with(spec.name),
            );
        }

        for spec in rows {
            cmd = cmd.arg(flag(spec));
        }
        cmd
    }

    fn augment_args_for_update(cmd: clap::Command) -> clap::Command {
        Self::augment_args(cmd)
    }
}

impl<C: CommandRows> FromArgMatches for ParamArgs<C> {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let rows = rows(C::COMMAND);
        let mut overrides = Overrides::new();

        for spec in rows {
            let value = match spec.kind {
                ValueKind::Symbolic(_) => matches
                    .try_get_one::<String>(spec.name)
                    .map_err(matches_error)?
                    .map(|name| Value::from(name.clone())),
                ValueKind::Numeric => matches
                    .try_get_one::<u64>(spec.name)
                    .map_err(matches_error)?
                    .map(|value| Value::int(*value)),
            };
            if let Some(value) = value {
                overrides.insert(spec.name.to_string(), value);
            }
        }

        if let Some(spec) = shorthand_row(rows) {
            if let Some(value) = matches
                .try_get_one::<String>(SHORTHAND_ID)
                .map_err(matches_error)?
            {
                overrides.insert(spec.name.to_string(), Value::from(value.clone()));
            }
        }

        Ok(Self {
            overrides,
            rows: PhantomData,
        })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

use clap::{Args, Subcommand};

use wfx_pta_schema::PtaCommand;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod describe;
pub mod encode;
pub mod link;
pub mod params;
pub mod selftest;

use self::link::LinkArgs;
use self::params::{ParamArgs, PriorityRows, SettingsRows, StateRows};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a PTA settings request (--Config picks a preset).
    #[command(alias = "SETTINGS")]
    Settings(ParamArgs<SettingsRows>),
    /// Encode a PTA priority request.
    #[command(alias = "PRIORITY")]
    Priority(ParamArgs<PriorityRows>),
    /// Encode a PTA state request.
    #[command(alias = "STATE")]
    State(ParamArgs<StateRows>),
    /// Print parameter tables and presets.
    Describe(DescribeArgs),
    /// Send settings 3W_BLE, priority BALANCED and state OFF to the target.
    Selftest,
}

/// Global options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub verbose: bool,
    pub execute: bool,
    pub link: LinkArgs,
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Settings(args) => encode::run(args, ctx),
        Command::Priority(args) => encode::run(args, ctx),
        Command::State(args) => encode::run(args, ctx),
        Command::Describe(args) => describe::run(args, ctx),
        Command::Selftest => selftest::run(ctx),
    }
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Only this command (settings, priority or state).
    #[arg(value_parser = parse_command)]
    pub command: Option<PtaCommand>,
}

fn parse_command(name: &str) -> Result<PtaCommand, String> {
    PtaCommand::from_name(name).ok_or_else(|| {
        format!("unknown command `{name}`; expected settings, priority or state")
    })
}

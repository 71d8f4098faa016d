mod cmd;
mod exit;
mod logging;
mod output;

use clap::{Parser, ValueEnum};

use crate::cmd::link::LinkArgs;
use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Mode {
    #[default]
    #[value(name = "QUIET")]
    Quiet,
    #[value(name = "VERBOSE")]
    Verbose,
}

#[derive(Parser, Debug)]
#[command(
    name = "wfx-pta",
    version,
    about = "Encode WFx PTA commands into HIF frames and optionally send them"
)]
struct Cli {
    /// Output verbosity.
    #[arg(
        short,
        long,
        value_name = "MODE",
        default_value = "QUIET",
        ignore_case = true,
        global = true
    )]
    mode: Mode,

    /// Same as --mode VERBOSE.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Send the encoded frame to the target and report its status.
    #[arg(short = 'x', long, global = true)]
    execute: bool,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). Default: warn, debug when verbose.
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<LogLevel>,

    #[command(flatten)]
    link: LinkArgs,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn is_verbose(&self) -> bool {
        self.verbose || self.mode == Mode::Verbose
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let code = if err.use_stderr() {
                exit::USAGE
            } else {
                exit::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let verbose = cli.is_verbose();
    init_logging(
        cli.log_format,
        cli.log_level.unwrap_or(LogLevel::default_for(verbose)),
    );

    let ctx = Context {
        format: cli.format.unwrap_or_default(),
        verbose,
        execute: cli.execute,
        link: cli.link,
    };

    match cmd::run(cli.command, &ctx) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

use serde::Serialize;

use wfx_pta_dispatch::{Applied, Dispatcher, HifStatus, PtaTarget};
use wfx_pta_schema::PtaCommand;

use crate::cmd::Context;
use crate::exit::{dispatch_error, link_error, status_code, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct StepOutput<'a> {
    command: PtaCommand,
    frame: String,
    status: &'a HifStatus,
}

/// Send the reference sequence and report each status.
///
/// Exits with the code of the first refused command, 0 when all succeed.
pub fn run(ctx: &Context) -> CliResult<i32> {
    let link = wfx_pta_link::open(&ctx.link.link_config()?)
        .map_err(|err| link_error("open failed", err))?;
    let dispatcher = Dispatcher::with_config(link, ctx.link.dispatch_config()?);
    let mut target =
        PtaTarget::new(dispatcher).map_err(|err| dispatch_error("selftest", err))?;

    let steps = target
        .selftest()
        .map_err(|err| dispatch_error("selftest", err))?;
    print_steps(&steps, ctx.format, ctx.verbose);

    Ok(exit_code(&steps))
}

fn exit_code(steps: &[(PtaCommand, Applied)]) -> i32 {
    steps
        .iter()
        .map(|(_, applied)| status_code(&applied.status))
        .find(|code| *code != SUCCESS)
        .unwrap_or(SUCCESS)
}

fn print_steps(steps: &[(PtaCommand, Applied)], format: OutputFormat, verbose: bool) {
    match format {
        OutputFormat::Json => {
            let out: Vec<StepOutput<'_>> = steps
                .iter()
                .map(|(command, applied)| StepOutput {
                    command: *command,
                    frame: applied.frame.escaped(),
                    status: &applied.status,
                })
                .collect();
            print_json(&out);
        }
        _ => {
            for (command, applied) in steps {
                if verbose || !applied.status.is_success() {
                    println!("{command:<8} Sent = {}", applied.frame.escaped());
                }
                println!("{command:<8} Status = {}", applied.status);
            }
        }
    }
}

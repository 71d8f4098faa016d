use wfx_pta_dispatch::{Dispatcher, HifStatus};
use wfx_pta_frame::{encode, Frame};
use wfx_pta_schema::{ResolveConfig, Resolver, SchemaRegistry};

use crate::cmd::params::{CommandRows, ParamArgs};
use crate::cmd::Context;
use crate::exit::{
    dispatch_error, frame_error, link_error, resolve_error, schema_error, status_code, CliResult,
    SUCCESS,
};
use crate::output::{print_report, Report};

/// Resolve and encode one command, then print it or, with `-x`, send it.
pub fn run<C: CommandRows>(args: ParamArgs<C>, ctx: &Context) -> CliResult<i32> {
    let command = args.command();
    let registry =
        SchemaRegistry::builtin().map_err(|err| schema_error("schema tables", err))?;
    let config = if ctx.verbose {
        ResolveConfig::traced()
    } else {
        ResolveConfig::default()
    };

    let resolution = Resolver::with_config(&registry, config)
        .resolve(command, None, &args.overrides)
        .map_err(|err| resolve_error(command.name(), err))?;
    let frame = encode(&resolution.command).map_err(|err| frame_error(command.name(), err))?;

    if !ctx.execute {
        let report = Report {
            resolution: &resolution,
            frame: &frame,
            status: None,
        };
        print_report(&report, ctx.format, ctx.verbose);
        return Ok(SUCCESS);
    }

    let status = match send(&frame, ctx) {
        Ok(status) => status,
        Err(err) => {
            if ctx.verbose {
                eprintln!("Sent = {}", frame.escaped());
            }
            return Err(err);
        }
    };

    let report = Report {
        resolution: &resolution,
        frame: &frame,
        status: Some(&status),
    };
    print_report(&report, ctx.format, ctx.verbose);
    Ok(status_code(&status))
}

fn send(frame: &Frame, ctx: &Context) -> CliResult<HifStatus> {
    let link = wfx_pta_link::open(&ctx.link.link_config()?)
        .map_err(|err| link_error("open failed", err))?;
    let mut dispatcher = Dispatcher::with_config(link, ctx.link.dispatch_config()?);
    dispatcher
        .send(frame)
        .map_err(|err| dispatch_error("send failed", err))
}

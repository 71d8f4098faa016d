use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use wfx_pta_dispatch::HifStatus;
use wfx_pta_frame::{escape, FieldSpan, Frame};
use wfx_pta_schema::{PtaCommand, Resolution, TraceRecord};

#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Escaped frame only.
    #[default]
    Raw,
    /// `Data = ...` lines, as printed by the firmware tools.
    Pretty,
    Table,
    Json,
}

/// Everything known about one encoded command.
pub struct Report<'a> {
    pub resolution: &'a Resolution,
    pub frame: &'a Frame,
    /// Set once the frame was sent.
    pub status: Option<&'a HifStatus>,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    command: PtaCommand,
    command_id: u16,
    preset: Option<&'static str>,
    frame: String,
    length: usize,
    fields: &'a [FieldSpan],
    trace: &'a [TraceRecord],
    sent: bool,
    status: Option<&'a HifStatus>,
}

pub fn print_report(report: &Report<'_>, format: OutputFormat, verbose: bool) {
    match format {
        OutputFormat::Json => {
            let resolved = &report.resolution.command;
            let out = ReportOutput {
                command: resolved.command(),
                command_id: resolved.command().id(),
                preset: resolved.preset(),
                frame: report.frame.escaped(),
                length: report.frame.len(),
                fields: report.frame.fields(),
                trace: &report.resolution.trace,
                sent: report.status.is_some(),
                status: report.status,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            if verbose && !report.resolution.trace.is_empty() {
                println!("{}", trace_table(&report.resolution.trace));
            }
            println!("{}", field_table(report.frame));
            println!("Frame: {}", report.frame.escaped());
            match report.status {
                Some(status) => println!("Status: {status}"),
                None if verbose => println!("No signal sent."),
                None => {}
            }
        }
        OutputFormat::Pretty | OutputFormat::Raw => print_text(report, format, verbose),
    }
}

fn print_text(report: &Report<'_>, format: OutputFormat, verbose: bool) {
    if verbose {
        print_breakdown(report);
    }

    let escaped = report.frame.escaped();
    match (report.status, format) {
        (None, OutputFormat::Raw) => {
            if verbose {
                println!("No signal sent.");
            }
            println!("{escaped}");
        }
        (None, _) => {
            if verbose {
                println!("No signal sent.");
            }
            println!("Data = {escaped}");
        }
        (Some(status), OutputFormat::Raw) => {
            if verbose || !status.is_success() {
                println!("{escaped}");
            }
            println!("{status}");
        }
        (Some(status), _) => {
            if verbose || !status.is_success() {
                println!("Sent = {escaped}");
            }
            println!("Status = {status}");
        }
    }
}

/// Trace lines, then one line per field with the bytes it produced.
fn print_breakdown(report: &Report<'_>) {
    let frame = report.frame;
    for record in &report.resolution.trace {
        println!("{record}");
    }
    println!(
        "{} (0x{:04x}) {} bytes",
        frame.command(),
        frame.command().id(),
        frame.len()
    );
    for field in frame.fields() {
        let bytes = &frame.wire_bytes()[field.offset..field.offset + field.width];
        println!("  {:<30} {:>14}  {}", field.name, field.value, escape(bytes));
    }
}

pub fn field_table(frame: &Frame) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["PARAMETER", "VALUE", "CODE", "OFFSET", "BYTES"]);
    for field in frame.fields() {
        let bytes = &frame.wire_bytes()[field.offset..field.offset + field.width];
        table.add_row(vec![
            field.name.to_string(),
            field.value.to_string(),
            format!("0x{:x}", field.code),
            field.offset.to_string(),
            escape(bytes),
        ]);
    }
    table
}

fn trace_table(trace: &[TraceRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["PARAMETER", "FROM", "TO", "STAGE"]);
    for record in trace {
        table.add_row(vec![
            record.field.to_string(),
            record
                .old
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string()),
            record.new.to_string(),
            format!("{:?}", record.stage).to_lowercase(),
        ]);
    }
    table
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use wfx_pta_schema::{
    Choice, CommandTable, ParamRole, ParameterSpec, Preset, PtaCommand, SchemaRegistry, Value,
    ValueKind,
};

use crate::cmd::{Context, DescribeArgs};
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct DescribeOutput<'a> {
    commands: Vec<CommandOutput<'a>>,
    presets: Vec<PresetOutput>,
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    command: PtaCommand,
    id: u16,
    payload_len: usize,
    parameters: Vec<ParameterOutput<'a>>,
}

#[derive(Serialize)]
struct ParameterOutput<'a> {
    name: &'static str,
    kind: &'static str,
    width: usize,
    role: ParamRole,
    choices: &'static [Choice],
    default: Option<&'a Value>,
    help: &'static str,
}

#[derive(Serialize)]
struct PresetOutput {
    name: &'static str,
    values: BTreeMap<&'static str, &'static Value>,
}

pub fn run(args: DescribeArgs, ctx: &Context) -> CliResult<i32> {
    let registry = SchemaRegistry::builtin().map_err(|err| schema_error("schema tables", err))?;
    let commands: Vec<PtaCommand> = match args.command {
        Some(command) => vec![command],
        None => PtaCommand::ALL.to_vec(),
    };
    // Presets only apply to settings.
    let presets: &[Preset] = if commands.contains(&PtaCommand::Settings) {
        registry.presets()
    } else {
        &[]
    };

    match ctx.format {
        OutputFormat::Json => {
            let out = DescribeOutput {
                commands: commands
                    .iter()
                    .map(|command| command_output(registry.table(*command)))
                    .collect(),
                presets: presets.iter().map(preset_output).collect(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            for command in &commands {
                let table = registry.table(*command);
                println!("{}", heading(table));
                println!("{}", parameter_table(table));
            }
            if !presets.is_empty() {
                println!("{}", preset_table(presets));
            }
        }
        OutputFormat::Raw | OutputFormat::Pretty => {
            for command in &commands {
                print_command(registry.table(*command));
            }
            if !presets.is_empty() {
                print_presets(presets);
            }
        }
    }

    Ok(SUCCESS)
}

fn command_output(table: &CommandTable) -> CommandOutput<'_> {
    CommandOutput {
        command: table.command(),
        id: table.command().id(),
        payload_len: table.payload_len(),
        parameters: table
            .iter()
            .map(|spec| ParameterOutput {
                name: spec.name,
                kind: kind_name(spec),
                width: spec.width.bytes(),
                role: spec.role,
                choices: spec.kind.choices(),
                default: spec.default.as_ref(),
                help: spec.help,
            })
            .collect(),
    }
}

fn preset_output(preset: &Preset) -> PresetOutput {
    PresetOutput {
        name: preset.name,
        values: preset
            .values()
            .iter()
            .map(|(name, value)| (*name, value))
            .collect(),
    }
}

fn kind_name(spec: &ParameterSpec) -> &'static str {
    match (spec.role, spec.kind) {
        (ParamRole::PresetSelector, _) => "preset",
        (_, ValueKind::Symbolic(_)) => "symbolic",
        (_, ValueKind::Numeric) => "numeric",
    }
}

fn default_label(spec: &ParameterSpec) -> String {
    match &spec.default {
        Some(value) => value.to_string(),
        None if spec.is_encoded() => "(required)".to_string(),
        None => "(none)".to_string(),
    }
}

fn heading(table: &CommandTable) -> String {
    format!(
        "{} (0x{:04x}), {} payload bytes",
        table.command(),
        table.command().id(),
        table.payload_len()
    )
}

fn print_command(table: &CommandTable) {
    println!("{}", heading(table));
    for spec in table {
        println!(
            "  --{:<28} {:<8} {}B  default {}",
            spec.name,
            kind_name(spec),
            spec.width.bytes(),
            default_label(spec)
        );
        println!("      values: {}", spec.expected());
        if !spec.help.is_empty() {
            println!("      {}", spec.help);
        }
    }
    println!();
}

fn print_presets(presets: &[Preset]) {
    println!("presets (--Config):");
    for preset in presets {
        println!("  {}", preset.name);
        for (name, value) in preset.values() {
            println!("    {name:<28} {value}");
        }
    }
}

fn parameter_table(table: &CommandTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["NAME", "KIND", "WIDTH", "VALUES", "DEFAULT", "HELP"]);
    for spec in table {
        out.add_row(vec![
            spec.name.to_string(),
            kind_name(spec).to_string(),
            spec.width.bytes().to_string(),
            spec.expected(),
            default_label(spec),
            spec.help.to_string(),
        ]);
    }
    out
}

fn preset_table(presets: &[Preset]) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["PRESET", "PARAMETER", "VALUE"]);
    for preset in presets {
        for (name, value) in preset.values() {
            out.add_row(vec![
                preset.name.to_string(),
                name.to_string(),
                value.to_string(),
            ]);
        }
    }
    out
}

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use provider_schema_core::{SourceSchema, TargetSchema, convert_schema, convert_schemas};

/// Output format for converted schemas.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "provider-schema")]
#[command(about = "Convert introspected provider schemas to the plugin-framework representation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an introspection dump into the plugin-framework schema map.
    Convert(ConvertArgs),
    /// Check that every resource in a dump converts, reporting per-resource results.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Input introspection dump (JSON mapping resource name to schema); stdin if omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output file; stdout if omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Input introspection dump (JSON mapping resource name to schema); stdin if omitted.
    #[arg(long)]
    input: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), String> {
    let sources = load_dump(args.input.as_deref())?;
    let targets = convert_schemas(&sources).map_err(|e| e.to_string())?;

    let rendered = render(&targets, args.format)?;
    match args.output {
        Some(path) => fs::write(&path, rendered)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let sources = load_dump(args.input.as_deref())?;

    let mut failures = 0usize;
    for (name, schema) in &sources {
        match convert_schema(schema) {
            Ok(_) => println!("ok    {name}"),
            Err(err) => {
                println!("error {name}: {err}");
                failures += 1;
            }
        }
    }

    println!("{} resources, {failures} failed", sources.len());
    if failures > 0 {
        return Err(format!("{failures} resource(s) failed to convert"));
    }
    Ok(())
}

fn load_dump(input: Option<&std::path::Path>) -> Result<BTreeMap<String, SourceSchema>, String> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buf
        }
    };
    serde_json::from_str(&text).map_err(|e| format!("failed to parse introspection dump: {e}"))
}

fn render(
    targets: &BTreeMap<String, TargetSchema>,
    format: CliOutputFormat,
) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(targets)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(targets).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

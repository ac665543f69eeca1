//! typenv CLI - Typed environment variable lookup from the command line
//!
//! Usage:
//!   typenv get DEBUG
//!   typenv get PRICE --type decimal --format json
//!   typenv dump HOME PORT DEBUG --format yaml
//!   typenv defaults

use clap::{Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use typenv_core::{split_list, EnvVarGetter, GetterOptions, Lookup, ProcessEnv, TargetType, Value};

/// typenv - Read environment variables as typed values
#[derive(Parser, Debug)]
#[command(name = "typenv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a single environment variable
    Get {
        /// Variable name
        name: String,

        /// Explicit target type: bool, int, float, decimal, str
        #[arg(short = 't', long = "type")]
        target: Option<TargetType>,

        /// Value printed when the variable is not set
        #[arg(short, long)]
        default: Option<String>,

        /// Fail if the variable is not set and no default is given
        #[arg(short, long)]
        required: bool,

        /// Comma-separated aliases for true (replaces configured ones for this call)
        #[arg(long)]
        true_values: Option<String>,

        /// Comma-separated aliases for false (replaces configured ones for this call)
        #[arg(long)]
        false_values: Option<String>,

        #[command(flatten)]
        config: GetterArgs,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Resolve several variables with type guessing
    Dump {
        /// Variable names
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        config: GetterArgs,

        /// Output format: json, yaml
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Print the built-in getter options
    Defaults {
        /// Output format: yaml, json
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },
}

/// Options shared by commands that build a getter
#[derive(clap::Args, Debug, Default)]
struct GetterArgs {
    /// YAML file with getter options
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Override a getter option (KEY=VALUE), applied after --options
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

/// Initialize the tracing subscriber for logging.
///
/// `--debug` forces debug level; otherwise `RUST_LOG` applies, defaulting to
/// warnings only so command output stays clean.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("typenv_core=debug,typenv_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Ignore a second initialization (e.g. when embedded)
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Run the CLI with the given arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Get {
            name,
            target,
            default,
            required,
            true_values,
            false_values,
            config,
            format,
        } => {
            let mut lookup = Lookup::new().required(required);
            lookup.target = target;
            lookup.default = default.map(Value::String);
            lookup.true_bool_values = true_values.as_deref().map(split_list);
            lookup.false_bool_values = false_values.as_deref().map(split_list);
            cmd_get(&name, &lookup, &config, &format)
        }

        Commands::Dump {
            names,
            config,
            format,
        } => cmd_dump(&names, &config, &format),

        Commands::Defaults { format } => cmd_defaults(&format),
    }
}

fn build_getter(args: &GetterArgs) -> Result<EnvVarGetter<ProcessEnv>, String> {
    let options = match &args.options {
        Some(path) => GetterOptions::from_file(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?,
        None => GetterOptions::default(),
    };

    let mut getter = EnvVarGetter::from_options(&options, ProcessEnv)
        .map_err(|e| format!("Invalid getter options: {}", e))?;

    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        getter
            .set_option(key, value)
            .map_err(|e| format!("Invalid --set {}: {}", assignment, e))?;
    }

    Ok(getter)
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str), String> {
    assignment
        .split_once('=')
        .map(|(k, v)| (k.trim(), v))
        .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", assignment))
}

fn render<T: Serialize>(value: &T, format: &str) -> Result<String, String> {
    match format {
        "json" => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        "yaml" | "yml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        other => Err(format!("Unsupported format: {}", other)),
    }
}

/// JSON and YAML have no portable infinity or NaN: print those as text
fn printable(value: &Option<Value>) -> Option<Value> {
    match value {
        Some(Value::Float(f)) if !f.is_finite() => Some(Value::String(f.to_string())),
        other => other.clone(),
    }
}

fn render_value(value: &Option<Value>, format: &str) -> Result<String, String> {
    match format {
        "text" => Ok(match value {
            Some(v) => format!("{}\n", v),
            None => "null\n".to_string(),
        }),
        _ => render(&printable(value), format),
    }
}

fn cmd_get(name: &str, lookup: &Lookup, config: &GetterArgs, format: &str) -> ExitCode {
    let getter = match build_getter(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match getter.resolve(name, lookup) {
        Ok(value) => {
            if let Some(v) = &value {
                log::debug!("{} resolved as {}", name, v.type_name());
            }
            match render_value(&value, format) {
                Ok(output) => {
                    print!("{}", output);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}: {}", "Error".red(), e);
                    ExitCode::from(2)
                }
            }
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            ExitCode::from(1)
        }
    }
}

fn cmd_dump(names: &[String], config: &GetterArgs, format: &str) -> ExitCode {
    let getter = match build_getter(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let values: IndexMap<String, Option<Value>> = match getter.resolve_many(names, &Lookup::new())
    {
        Ok(v) => v.into_iter().map(|(k, v)| (k, printable(&v))).collect(),
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            return ExitCode::from(1);
        }
    };

    match render(&values, format) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(2)
        }
    }
}

fn cmd_defaults(format: &str) -> ExitCode {
    match render(&GetterOptions::defaults(), format) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

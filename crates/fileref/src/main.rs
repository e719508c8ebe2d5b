//! fileref
//!
//! Reads a task description, finds the local files it mentions, and prints the
//! description rewritten to sandbox paths together with the reference mapping.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use fileref::cli::{Cli, Commands, ConfigCommands, LayoutArgs, ParseArgs};
use fileref::config::{ConfigError, LoadedConfig};
use fileref::errors::{self, ActionableError};
use fileref::observer::{RecordingObserver, Tee, TracingObserver};
use fileref::output::{ExitCode, JsonError, JsonOutput, OutputContext};
use fileref::paths::normalize;
use fileref::{CollisionPolicy, ParseResult, ReferenceExtractor};
use serde::Serialize;
use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Helper to determine exit code from error
fn error_to_exit_code(error: &anyhow::Error) -> ExitCode {
    if let Some(config_error) = error.downcast_ref::<ConfigError>() {
        return match config_error {
            ConfigError::NotFound(_) => ExitCode::NotFound,
            _ => ExitCode::InvalidArgument,
        };
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => ExitCode::NotFound,
            _ => ExitCode::ExternalError,
        };
    }

    let error_msg = error.to_string().to_lowercase();
    if error_msg.contains("validation failed") {
        ExitCode::ValidationFailed
    } else if error_msg.contains("not found") {
        ExitCode::NotFound
    } else if error_msg.contains("invalid") {
        ExitCode::InvalidArgument
    } else {
        ExitCode::GenericError
    }
}

fn report_error(error: &anyhow::Error, exit_code: ExitCode, cli: &Cli) {
    let actionable = error.downcast_ref::<ActionableError>();

    if cli.wants_json() {
        let (message, suggestions) = match actionable {
            Some(actionable) => (
                actionable.message().to_string(),
                actionable.remedies().to_vec(),
            ),
            None => (format!("{:#}", error), Vec::new()),
        };
        let json_error = JsonError::new(exit_code.error_code(), message, cli.command_name())
            .with_suggestions(suggestions);
        match json_error.to_json_string() {
            Ok(json) => println!("{}", json),
            Err(_) => eprintln!("Error: {:#}", error),
        }
        return;
    }

    match actionable {
        Some(actionable) => {
            eprint!("{}", actionable);
            if let Some(source) = error.chain().nth(1) {
                eprintln!("\nDetails: {}", source);
            }
        }
        None => eprintln!("Error: {:#}", error),
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("FILEREF_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let exit_code = error_to_exit_code(&e);
            report_error(&e, exit_code, &cli);
            exit_code
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.schema {
        let schema = schemars::schema_for!(ParseResult);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let command = cli
        .command
        .as_ref()
        .ok_or_else(|| anyhow!("Invalid usage: no command provided. Use --help for usage."))?;

    let working_dir = env::current_dir().context("Failed to determine the current directory")?;
    let loaded =
        LoadedConfig::discover(&working_dir, cli.config.as_deref()).map_err(config_failure)?;

    match command {
        Commands::Parse(args) => run_parse(cli, args, &working_dir, &loaded),
        Commands::Config(ConfigCommands::Show { layout, json }) => {
            run_config_show(cli, layout, *json, &working_dir, &loaded)
        }
    }
}

fn run_parse(cli: &Cli, args: &ParseArgs, working_dir: &Path, loaded: &LoadedConfig) -> Result<()> {
    let output = OutputContext::new(cli.quiet, args.json);

    let layout = loaded
        .config
        .sandbox_layout(&args.layout.overrides())
        .map_err(config_failure)?;
    let base_dir = resolve_base_dir(&args.layout, loaded, working_dir);

    let description = match (&args.description, &args.from_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_text_file("description", &working_dir.join(path))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read description from stdin")?;
            buffer
        }
    };
    let context = match (&args.context, &args.context_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(read_text_file("context", &working_dir.join(path))?),
        (None, None) => None,
    };

    let recorder = RecordingObserver::new();
    let extractor = ReferenceExtractor::new(layout)
        .with_base_dir(base_dir)
        .with_observer(Tee(TracingObserver, recorder.clone()));

    let result = extractor.parse(&description, context.as_deref());
    let unresolved = recorder.unresolved_inputs();

    if args.strict && unresolved > 0 && output.is_json() {
        return Err(errors::unresolved_inputs(unresolved).into());
    }

    if output.is_json() {
        let json = JsonOutput::success(&result, "parse").to_json_string()?;
        output.print_json(&json)?;
    } else {
        output.print_data(result.updated_description.trim_end_matches('\n'))?;
        if !result.references.is_empty() {
            output.print_info("")?;
        }
        for reference in &result.references {
            output.print_info(format!(
                "{:<6} {} -> {}",
                reference.kind.to_string(),
                reference.local_path.display(),
                reference.sandbox_path
            ))?;
        }
    }

    if args.strict && unresolved > 0 {
        return Err(errors::unresolved_inputs(unresolved).into());
    }

    Ok(())
}

/// Effective configuration as shown by `fileref config show`
#[derive(Debug, Serialize)]
struct EffectiveConfig {
    source: Option<PathBuf>,
    base_dir: PathBuf,
    input_root: String,
    output_root: String,
    collision: CollisionPolicy,
}

fn run_config_show(
    cli: &Cli,
    layout_args: &LayoutArgs,
    json: bool,
    working_dir: &Path,
    loaded: &LoadedConfig,
) -> Result<()> {
    let output = OutputContext::new(cli.quiet, json);

    let layout = loaded
        .config
        .sandbox_layout(&layout_args.overrides())
        .map_err(config_failure)?;
    let effective = EffectiveConfig {
        source: loaded.source.clone(),
        base_dir: resolve_base_dir(layout_args, loaded, working_dir),
        input_root: layout.input_root().to_string(),
        output_root: layout.output_root().to_string(),
        collision: layout.collision(),
    };

    if output.is_json() {
        let json = JsonOutput::success(&effective, "config show").to_json_string()?;
        output.print_json(&json)?;
        return Ok(());
    }

    let source = effective
        .source
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    output.print_info(format!("config:      {}", source))?;
    output.print_data(format!("base_dir:    {}", effective.base_dir.display()))?;
    output.print_data(format!("input_root:  {}", effective.input_root))?;
    output.print_data(format!("output_root: {}", effective.output_root))?;
    output.print_data(format!("collision:   {}", effective.collision))?;

    Ok(())
}

/// `--base-dir` wins, then `[extract] base_dir`, then the working directory
fn resolve_base_dir(layout_args: &LayoutArgs, loaded: &LoadedConfig, working_dir: &Path) -> PathBuf {
    if let Some(dir) = &layout_args.base_dir {
        return normalize(&working_dir.join(dir));
    }
    loaded
        .base_dir(working_dir)
        .unwrap_or_else(|| working_dir.to_path_buf())
}

fn read_text_file(what: &str, path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| errors::text_file_unreadable(what, path))
}

fn config_failure(error: ConfigError) -> anyhow::Error {
    let detail = error.to_string();
    anyhow::Error::new(error).context(errors::config_invalid(&detail))
}

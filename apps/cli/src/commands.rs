//! CLI definition, tracing setup, and command handlers.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;
use groups2bi_core::{RegenerateConfig, RegenerateResult, regenerate};
use groups2bi_shared::{
    AppConfig, BuildOptions, Groups2BiError, init_config, load_config, load_config_from,
};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Generate building instructions from the groups of an LXFML model.
#[derive(Parser, Debug)]
#[command(
    name = "g2bi",
    version,
    about = "Generate building instructions from the groups of an LXFML model.",
    long_about = None,
    after_help = "Example usage:\n  g2bi design.lxfml",
)]
pub(crate) struct Cli {
    /// LXFML file to generate building instructions from.
    #[arg(value_name = "INPUT")]
    pub input_file: Option<PathBuf>,

    /// LXFML file to generate building instructions from (overrides the positional INPUT).
    #[arg(short, long, value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// File to write the output to. The input file is overwritten if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// The maximum depth of substeps to generate (defaults to the config value, 3).
    #[arg(short = 's', long = "substep", allow_negative_numbers = true)]
    pub substep: Option<i32>,

    /// Print the generated instruction as JSON instead of writing the file.
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of ~/.groups2bi/groups2bi.toml.
    #[arg(long, env = "G2BI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write a default config file and exit.
    #[arg(long)]
    pub init_config: bool,

    /// Print the resolved configuration and exit.
    #[arg(long)]
    pub show_config: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// The input path, preferring `-i` over the positional argument.
    fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().or(self.input_file.as_deref())
    }

    /// Merge config file values with CLI flags.
    fn build_options(&self, config: &AppConfig) -> BuildOptions {
        let mut options = BuildOptions::from(config);
        if let Some(depth) = self.substep {
            options.max_substep_depth = depth;
        }
        options
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so that `--json`
/// output stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "groups2bi=warn,g2bi=warn",
        1 => "groups2bi=info,g2bi=info",
        2 => "groups2bi=debug,g2bi=debug",
        _ => "groups2bi=trace,g2bi=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI. Document and config problems are reported to the user and
/// the process still exits with status 0; only unexpected failures bubble up
/// as errors.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    if cli.init_config {
        return cmd_init_config();
    }

    let config = match load_app_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return Ok(report(&err)),
    };

    if cli.show_config {
        return cmd_show_config(&config);
    }

    let Some(input) = cli.input_path() else {
        print_missing_input();
        return Ok(ExitCode::SUCCESS);
    };

    let regenerate_config = RegenerateConfig {
        input: input.to_path_buf(),
        output: cli.output.clone(),
        options: cli.build_options(&config),
        dry_run: cli.json,
    };

    cmd_generate(&regenerate_config, cli.json)
}

fn load_app_config(path: Option<&Path>) -> groups2bi_shared::Result<AppConfig> {
    match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

/// Print a user-facing error. The exit status stays 0.
fn report(err: &Groups2BiError) -> ExitCode {
    debug!(?err, "aborting");
    eprintln!("{}", error_message(err));
    ExitCode::SUCCESS
}

/// The line shown to the user for `err`.
fn error_message(err: &Groups2BiError) -> String {
    match err {
        Groups2BiError::InputNotFound { .. } => err.to_string(),
        _ => format!("Error! {err}"),
    }
}

fn print_missing_input() {
    println!("ERROR(S):");
    println!("  input option is missing.");
    println!();
    println!("{}", Cli::command().render_help());
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(config: &RegenerateConfig, json: bool) -> Result<ExitCode> {
    info!(
        input = %config.input.display(),
        max_substep_depth = config.options.max_substep_depth,
        "generating building instructions"
    );

    let result = match regenerate(config) {
        Ok(result) => result,
        Err(err) => return Ok(report(&err)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result.instruction)?);
    } else {
        print_summary(&result);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_summary(result: &RegenerateResult) {
    println!();
    println!("  Building instructions generated!");
    println!("  Output:    {}", result.output.display());
    println!("  Steps:     {}", result.instruction.step_count());
    println!("  Top-level: {}", result.instruction.steps.len());
    println!("  Part refs: {}", result.instruction.part_ref_count());
    println!("  Depth:     {}", result.instruction.max_depth());
    println!("  Replaced:  {}", result.removed);
    println!(
        "  Time:      {:.1}ms",
        result.elapsed.as_secs_f64() * 1000.0
    );
    println!();
}

fn cmd_init_config() -> Result<ExitCode> {
    match init_config() {
        Ok(path) => {
            println!("Config initialized at: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(report(&err)),
    }
}

fn cmd_show_config(config: &AppConfig) -> Result<ExitCode> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}

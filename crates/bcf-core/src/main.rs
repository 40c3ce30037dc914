//! Bayesian Coin Flip - command line front end
//!
//! Simulates flips of a biased coin, updates a Beta prior and prints the
//! posterior estimate. Subcommands:
//! - `run` (default): simulate and report
//! - `update`: report the posterior for counts observed elsewhere
//! - `config show|validate`: inspect settings resolution
//! - `schema`: JSON Schemas for settings and reports

use std::io::{self, Write};
use std::path::PathBuf;

use bcf_common::{Error, OutputFormat, StructuredError, SCHEMA_VERSION};
use bcf_config::{load_settings, ConfigError, ResolvedSettings, Settings};
use bcf_core::estimator::{Estimate, EstimatorParams, PosteriorEstimator, Tally};
use bcf_core::exit_codes::ExitCode;
use bcf_core::log_event;
use bcf_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use bcf_core::report::{summary_line, write_human, PosteriorReport, SequenceLayout};
use bcf_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use clap::{Args, Parser, Subcommand};

/// Bayesian coin flip: estimate a coin's bias from simulated flips
#[derive(Parser)]
#[command(name = "bcf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (otherwise BCF_CONFIG, BCF_CONFIG_DIR, XDG, /etc)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate flips and estimate the bias (default)
    Run(RunArgs),

    /// Estimate the bias from observed head and tail counts
    Update(UpdateArgs),

    /// Inspect settings resolution
    Config(ConfigArgs),

    /// Print JSON Schemas for settings and reports
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

/// Prior and summary overrides shared by `run` and `update`.
#[derive(Args, Debug, Default)]
struct PosteriorArgs {
    /// Prior alpha (pseudo-heads)
    #[arg(long)]
    alpha: Option<f64>,

    /// Prior beta (pseudo-tails)
    #[arg(long)]
    beta: Option<f64>,

    /// Credible interval mass, in (0, 1)
    #[arg(long)]
    confidence: Option<f64>,

    /// Half-width of the "roughly fair" band around 0.5
    #[arg(long)]
    fair_band: Option<f64>,

    /// Monte Carlo posterior draws (0 disables the cross-check)
    #[arg(long)]
    samples: Option<u64>,

    /// Seed for reproducible runs
    #[arg(long, env = "BCF_SEED")]
    seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Number of flips to simulate
    #[arg(long, short = 'n')]
    flips: Option<u64>,

    /// True P(heads), used only to drive the simulation
    #[arg(long)]
    true_p: Option<f64>,

    #[command(flatten)]
    posterior: PosteriorArgs,

    /// Flip sequence line width
    #[arg(long)]
    wrap: Option<usize>,

    /// Pause between printed flips, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Flips printed before the sequence is elided
    #[arg(long)]
    max_shown: Option<usize>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    /// Observed heads
    #[arg(long)]
    heads: u64,

    /// Observed tails
    #[arg(long)]
    tails: u64,

    #[command(flatten)]
    posterior: PosteriorArgs,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved settings and where they came from
    Show,

    /// Validate a settings file
    Validate {
        /// File to validate (defaults to the resolved settings file)
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type to print (all types when omitted)
    name: Option<String>,

    /// List available types
    #[arg(long)]
    list: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet || cli.global.verbose > 0 {
        Some(LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet))
    } else {
        None
    };
    // JSON payloads on stdout get JSONL logs on stderr.
    let cli_format = cli.global.format.is_machine().then_some(LogFormat::Jsonl);
    let log_config = LogConfig::from_env(cli_level, cli_format).with_color(!cli.global.no_color);
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());

    let result = match cli.command {
        None => cmd_run(&cli.global, &RunArgs::default(), &ctx),
        Some(Commands::Run(ref args)) => cmd_run(&cli.global, args, &ctx),
        Some(Commands::Update(ref args)) => cmd_update(&cli.global, args, &ctx),
        Some(Commands::Config(ref args)) => match &args.command {
            ConfigCommands::Show => cmd_config_show(&cli.global),
            ConfigCommands::Validate { path } => cmd_config_validate(&cli.global, path.as_ref()),
        },
        Some(Commands::Schema(ref args)) => cmd_schema(args),
        Some(Commands::Version) => print_version(&cli.global),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            // The error itself is reported by output_error.
            log_event!(ctx, DEBUG, event_names::RUN_FAILED, Stage::Report, err.to_string(),
                code = err.code());
            output_error(&cli.global, &err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Settings
// ============================================================================

fn config_error(err: ConfigError) -> Error {
    match err {
        ConfigError::Validation(v) => Error::InvalidSettings(v.to_string()),
        other => Error::Config(other.to_string()),
    }
}

fn resolve(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedSettings, Error> {
    let resolved = load_settings(global.config.as_deref()).map_err(|err| {
        log_event!(ctx, DEBUG, event_names::CONFIG_ERROR, Stage::Init,
            "settings could not be loaded", error = display(&err));
        config_error(err)
    })?;
    match &resolved.path {
        Some(path) => log_event!(ctx, INFO, event_names::CONFIG_LOADED, Stage::Init,
            "settings loaded", path = display(path.display()), source = display(&resolved.source)),
        None => log_event!(ctx, DEBUG, event_names::CONFIG_DEFAULT_USED, Stage::Init,
            "no settings file, using built-in defaults"),
    }
    Ok(resolved)
}

fn apply_posterior_args(settings: &mut Settings, args: &PosteriorArgs) {
    if let Some(alpha) = args.alpha {
        settings.prior.alpha = alpha;
    }
    if let Some(beta) = args.beta {
        settings.prior.beta = beta;
    }
    if let Some(confidence) = args.confidence {
        settings.summary.confidence = confidence;
    }
    if let Some(eps) = args.fair_band {
        settings.summary.fair_band = eps;
    }
    if let Some(samples) = args.samples {
        settings.summary.mc_samples = samples;
    }
    if args.seed.is_some() {
        settings.simulation.seed = args.seed;
    }
}

fn apply_run_args(settings: &mut Settings, args: &RunArgs) -> Result<(), Error> {
    if let Some(flips) = args.flips {
        settings.simulation.flips = flips;
    }
    if let Some(true_p) = args.true_p {
        settings.simulation.true_p = true_p;
    }
    apply_posterior_args(settings, &args.posterior);
    if let Some(wrap) = args.wrap {
        if wrap == 0 {
            return Err(Error::invalid("wrap", "must be at least 1"));
        }
        settings.display.wrap = wrap;
    }
    if let Some(delay_ms) = args.delay_ms {
        settings.display.delay_ms = delay_ms;
    }
    if let Some(max_shown) = args.max_shown {
        settings.display.max_shown = max_shown;
    }
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_run(global: &GlobalOpts, args: &RunArgs, ctx: &LogContext) -> Result<(), Error> {
    let resolved = resolve(global, ctx)?;
    let mut settings = resolved.settings.clone();
    apply_run_args(&mut settings, args)?;

    let params = EstimatorParams::from_settings(&settings);
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting run",
        flips = params.flips, true_p = params.true_p, seed = debug(params.seed));

    let mut estimator = PosteriorEstimator::new(params)?;
    let estimate = estimator.run()?;
    log_event!(ctx, INFO, event_names::SIMULATE_FINISHED, Stage::Simulate, "flips drawn",
        heads = estimate.tally.heads, tails = estimate.tally.tails);

    emit(global, ctx, &resolved, &settings, &estimate)
}

fn cmd_update(global: &GlobalOpts, args: &UpdateArgs, ctx: &LogContext) -> Result<(), Error> {
    let resolved = resolve(global, ctx)?;
    let mut settings = resolved.settings.clone();
    apply_posterior_args(&mut settings, &args.posterior);

    let params = EstimatorParams::from_settings(&settings);
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "updating from counts",
        heads = args.heads, tails = args.tails);

    let mut estimator = PosteriorEstimator::new(params)?;
    let estimate = estimator.estimate_from_counts(Tally::new(args.heads, args.tails))?;

    emit(global, ctx, &resolved, &settings, &estimate)
}

/// Log the summary stages and write the estimate in the requested format.
fn emit(
    global: &GlobalOpts,
    ctx: &LogContext,
    resolved: &ResolvedSettings,
    settings: &Settings,
    estimate: &Estimate,
) -> Result<(), Error> {
    log_event!(ctx, INFO, event_names::UPDATE_FINISHED, Stage::Update, "posterior updated",
        alpha = estimate.posterior.alpha, beta = estimate.posterior.beta);
    log_event!(ctx, INFO, event_names::SUMMARIZE_FINISHED, Stage::Summarize, "posterior summarized",
        mean = estimate.summary.mean, tail_prob = estimate.summary.tail_prob);
    if estimate.summary.map.value().is_none() {
        log_event!(ctx, INFO, event_names::SUMMARIZE_MAP_UNDEFINED, Stage::Summarize,
            "posterior has no mode", posterior = display(estimate.posterior));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match global.format {
        OutputFormat::Human => {
            write_human(&mut out, estimate, &SequenceLayout::from(&settings.display))?;
        }
        OutputFormat::Json => {
            let report = PosteriorReport::new(
                estimate,
                ctx.run_id.clone(),
                resolved.snapshot(),
                settings.display.max_shown,
            );
            writeln!(out, "{}", report.to_json_pretty()?)?;
        }
        OutputFormat::Summary => writeln!(out, "{}", summary_line(estimate))?,
        OutputFormat::Exitcode => {}
    }
    out.flush()?;

    log_event!(ctx, DEBUG, event_names::REPORT_WRITTEN, Stage::Report, "report written",
        format = display(global.format));
    log_event!(ctx, INFO, event_names::RUN_FINISHED, Stage::Report, "run finished");
    Ok(())
}

fn cmd_config_show(global: &GlobalOpts) -> Result<(), Error> {
    let resolved = load_settings(global.config.as_deref()).map_err(config_error)?;
    let snapshot = resolved.snapshot();

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "config": &snapshot,
                "settings": &resolved.settings,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Summary => {
            let path = snapshot.path.as_deref().unwrap_or("built-in defaults");
            println!("config: source={} path={}", snapshot.source, path);
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Human => {
            println!("# bcf config show");
            println!();
            match &snapshot.path {
                Some(path) => {
                    println!("Source: {} ({})", path, snapshot.source);
                    println!("Hash: {}", snapshot.hash.as_deref().unwrap_or("n/a"));
                }
                None => println!("Source: built-in defaults (no settings.json found)"),
            }
            println!("Schema version: {}", snapshot.schema_version);
            println!();
            println!("{}", serde_json::to_string_pretty(&resolved.settings)?);
        }
    }
    Ok(())
}

fn cmd_config_validate(global: &GlobalOpts, path: Option<&PathBuf>) -> Result<(), Error> {
    let target = path.or(global.config.as_ref());
    let resolved = load_settings(target.map(PathBuf::as_path)).map_err(config_error)?;
    let snapshot = resolved.snapshot();

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "valid",
                "config": &snapshot,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Summary => println!("config validate: OK"),
        OutputFormat::Exitcode => {}
        OutputFormat::Human => {
            println!("Status: ✓ Valid");
            match &snapshot.path {
                Some(path) => println!("Settings: {}", path),
                None => println!("Settings: using built-in defaults"),
            }
        }
    }
    Ok(())
}

fn cmd_schema(args: &SchemaArgs) -> Result<(), Error> {
    if args.list {
        for (name, desc) in available_schemas() {
            println!("{:<18} {}", name, desc);
        }
        return Ok(());
    }

    let value = match &args.name {
        Some(name) => generate_schema(name).ok_or_else(|| {
            let known: Vec<&str> = available_schemas().iter().map(|(n, _)| *n).collect();
            Error::invalid("schema", format!("unknown type {name}; known: {}", known.join(", ")))
        })?,
        None => serde_json::to_value(generate_all_schemas())?,
    };

    let text = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{text}");
    Ok(())
}

fn print_version(global: &GlobalOpts) -> Result<(), Error> {
    match global.format {
        OutputFormat::Json => {
            let version_info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "bcf_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            println!("{}", serde_json::to_string_pretty(&version_info)?);
        }
        OutputFormat::Exitcode => {}
        _ => {
            println!("bcf {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
    Ok(())
}

/// Report an error in the requested format and pick the exit code.
fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(err);
    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(err).with_context("exit_code", exit_code.code_name());
            println!("{}", structured.to_json_pretty());
        }
        OutputFormat::Summary => eprintln!("error {}: {}", err.code(), err),
        OutputFormat::Exitcode => {}
        OutputFormat::Human => eprintln!("{}", err.format_human()),
    }
    exit_code
}

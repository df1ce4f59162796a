//! Shockwatch CLI
//!
//! Usage:
//!   shockwatch --snapshot cycle.json                     # Single evaluation
//!   shockwatch --snapshot cycle.json --prior prior.json  # With explicit prior state
//!   shockwatch --snapshot - --env harbor --state-dir ./state
//!   shockwatch --replay cycles.jsonl                     # Evaluate a run of cycles
//!   shockwatch --serve                                   # HTTP API server
//!   shockwatch --snapshot cycle.json --json              # JSON output

use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

use shockwatch::core::{load_state, parse_prior, parse_snapshot, run_server, save_state, ShockDetector};
use shockwatch::types::{AlertFlag, AlertRecord, Evaluation, PriorCycleState};
use shockwatch::{ShockError, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "shockwatch",
    version = VERSION,
    about = "Shockwatch - Detect narrative shocks in simulated environments",
    long_about = "Shockwatch evaluates one cycle of a simulated environment at a time.\n\n\
                  Each cycle's signal snapshot is compared with the previous cycle's\n\
                  state under calendar-adjusted thresholds, and the alert flag moves\n\
                  through a hysteresis state machine.\n\n\
                  Flags:\n  \
                  NONE      - Nothing unusual\n  \
                  FIRING    - Shock in progress\n  \
                  FADING    - Episode winding down\n  \
                  CHRONIC   - Long episode with few remaining triggers\n  \
                  RESOLVED  - Episode ended this cycle"
)]
struct Args {
    /// Snapshot JSON file to evaluate ('-' for stdin)
    #[arg(short, long, conflicts_with = "replay")]
    snapshot: Option<String>,

    /// Prior cycle state JSON file ('-' for stdin)
    #[arg(short, long)]
    prior: Option<String>,

    /// JSON-lines file of snapshots, evaluated in order ('-' for stdin)
    #[arg(short, long)]
    replay: Option<String>,

    /// Environment id; loads prior state and saves next state
    #[arg(short, long, requires = "state_dir")]
    env: Option<String>,

    /// Directory for environment state files
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Run as HTTP API server
    #[arg(long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show calendar context and debug logs
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let result = if args.serve {
        run_serve(&args).await
    } else if let Some(ref path) = args.replay {
        run_replay(path, &args)
    } else if let Some(ref path) = args.snapshot {
        run_single(path, &args)
    } else {
        eprintln!("Nothing to do: pass --snapshot, --replay or --serve (see --help)");
        std::process::exit(2);
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(verbose: bool) {
    let default = if verbose { "shockwatch=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read a file, or stdin for '-'
fn read_input(path: &str) -> Result<String, ShockError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ShockError::io("read stdin", e))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(|e| ShockError::io(format!("read {}", path), e))
    }
}

fn read_json(path: &str) -> Result<Value, ShockError> {
    let text = read_input(path)?;
    serde_json::from_str(&text).map_err(|e| ShockError::serialization(format!("parse {}", path), e))
}

/// Prior from --prior, else from the environment's state file, else none
fn initial_prior(args: &Args) -> Result<Option<PriorCycleState>, ShockError> {
    if let Some(ref path) = args.prior {
        return Ok(Some(parse_prior(&read_json(path)?)?));
    }
    if let (Some(env), Some(dir)) = (&args.env, &args.state_dir) {
        return Ok(load_state(dir, env)?.map(|file| file.prior()));
    }
    Ok(None)
}

fn persist(eval: &Evaluation, args: &Args) -> Result<(), ShockError> {
    if let (Some(env), Some(dir)) = (&args.env, &args.state_dir) {
        let path = save_state(dir, env, eval)?;
        tracing::info!(env = %env, path = %path.display(), "state saved");
    }
    Ok(())
}

/// Run single snapshot evaluation
fn run_single(path: &str, args: &Args) -> Result<(), ShockError> {
    let snapshot = parse_snapshot(&read_json(path)?)?;
    let prior = initial_prior(args)?;

    let eval = ShockDetector::new().evaluate(&snapshot, prior.as_ref());

    if args.json {
        let json = serde_json::to_string_pretty(&eval)
            .map_err(|e| ShockError::serialization("evaluation output", e))?;
        println!("{}", json);
    } else {
        print_alert(&eval.alert, args);
    }
    persist(&eval, args)
}

/// Run a JSON-lines file of snapshots, threading state between cycles
fn run_replay(path: &str, args: &Args) -> Result<(), ShockError> {
    let text = read_input(path)?;
    let detector = ShockDetector::new();
    let mut prior = initial_prior(args)?;
    let mut last: Option<Evaluation> = None;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|e| ShockError::serialization(format!("{} line {}", path, index + 1), e))?;
        let snapshot = parse_snapshot(&value)?;

        let eval = detector.evaluate(&snapshot, prior.as_ref());
        if args.json {
            // One evaluation per line
            let json = serde_json::to_string(&eval)
                .map_err(|e| ShockError::serialization("evaluation output", e))?;
            println!("{}", json);
        } else {
            print_alert(&eval.alert, args);
        }

        prior = Some(PriorCycleState::from(&eval.next));
        last = Some(eval);
    }

    match last {
        Some(eval) => persist(&eval, args),
        None => {
            tracing::warn!(path, "replay file had no snapshots");
            Ok(())
        }
    }
}

fn flag_label(flag: AlertFlag) -> colored::ColoredString {
    let label = format!("{:<8}", flag.to_string());
    match flag {
        AlertFlag::None => label.dimmed(),
        AlertFlag::Firing => label.red().bold(),
        AlertFlag::Fading => label.yellow(),
        AlertFlag::Chronic => label.magenta().bold(),
        AlertFlag::Resolved => label.green(),
    }
}

/// Print one alert record; `--no-color` prints the parseable one-line form
fn print_alert(alert: &AlertRecord, args: &Args) {
    if args.no_color {
        println!("{}", alert.to_parseable_string());
    } else {
        println!(
            "[{}] cycle={} score={} since={} duration={}",
            flag_label(alert.flag),
            alert.cycle_number,
            alert.score,
            alert.start_cycle,
            alert.duration
        );

        for reason in &alert.reasons {
            let line = format!("  └─ {} {}", reason.code.code(), reason);
            if reason.code.is_hysteresis_note() {
                println!("{}", line.italic());
            } else {
                println!("{}", line);
            }
        }
    }

    if args.verbose {
        let ctx = &alert.calendar_context;
        let t = &ctx.thresholds;
        println!(
            "{}",
            format!(
                "  phase={} holiday={} | thresholds: events={} chaos={} saturation={} migration={}",
                ctx.seasonal_phase,
                ctx.holiday_name.as_deref().unwrap_or("-"),
                t.event_spike,
                t.chaos_spike,
                t.chaos_saturation,
                t.migration
            )
            .dimmed()
        );
        println!("{}", format!("  fingerprint={}", alert.fingerprint).dimmed());
    }
}

/// Run HTTP API server
async fn run_serve(args: &Args) -> Result<(), ShockError> {
    tracing::info!("shockwatch v{} starting", VERSION);
    if let Some(ref dir) = args.state_dir {
        tracing::info!("environment state mirrored to {}", dir.display());
    }

    if let Err(e) = run_server(&args.addr, args.state_dir.clone()).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

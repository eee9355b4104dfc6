//! TREAD Replay
//!
//! Feeds a recorded encoder log through the odometry node and prints every
//! published pose as a JSON line on stdout.
//!
//! Input is one JSON object per line:
//!   {"left": 1200, "right": 1180}               tick sample
//!   {"reset": {"x": 0, "y": 0, "theta": 0}}     reset command

mod replay;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use replay::{PoseSinkNode, TickSourceNode};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};
use tread_core::{LogLevel, RuntimeParams, Scheduler};
use tread_library::config::{ConfigPreset, OdometryConfig};
use tread_library::OdometryNode;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Reset channel, republish on zero motion, 0.428 m wheelbase
    Resettable,
    /// No reset channel, integrate every sample, 0.43 m wheelbase
    Streaming,
}

impl From<Preset> for ConfigPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Resettable => ConfigPreset::Resettable,
            Preset::Streaming => ConfigPreset::Streaming,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tread_replay")]
#[command(about = "Replay an encoder log through TREAD odometry", long_about = None)]
struct Args {
    /// Log file to replay (stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Deployment preset
    #[arg(long, value_enum, default_value_t = Preset::Resettable)]
    preset: Preset,

    /// Parameter file whose odometry.* keys override the preset
    #[arg(long, conflicts_with = "config")]
    params: Option<PathBuf>,

    /// Complete odometry config in YAML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pause between scheduler cycles in milliseconds
    #[arg(long, default_value_t = 0)]
    period_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_params(args: &Args) -> Result<RuntimeParams> {
    match &args.params {
        Some(path) => RuntimeParams::from_file(path)
            .with_context(|| format!("loading parameters {}", path.display())),
        None => Ok(RuntimeParams::with_defaults()),
    }
}

fn load_config(args: &Args, params: &RuntimeParams) -> Result<OdometryConfig> {
    if let Some(path) = &args.config {
        return OdometryConfig::from_yaml_file(path)
            .with_context(|| format!("loading odometry config {}", path.display()));
    }
    OdometryConfig::from_params(params, args.preset.into()).context("invalid odometry parameters")
}

/// `--verbose` forces debug; otherwise the `log_level` parameter applies
fn node_log_level(verbose: bool, params: &RuntimeParams) -> LogLevel {
    if verbose {
        return LogLevel::Debug;
    }
    let level = params.get_string("log_level", "INFO");
    LogLevel::parse(&level).unwrap_or_else(|| {
        warn!("Unknown log_level '{}', using INFO", level);
        LogLevel::Info
    })
}

fn open_input(input: Option<&PathBuf>) -> Result<Box<dyn BufRead + Send>> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout carries the pose stream
    let filter = if args.verbose {
        "tread=debug,info"
    } else {
        "tread=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let params = load_params(&args)?;
    let config = load_config(&args, &params)?;
    info!(
        "Replaying with wheelbase {} m, zero delta {:?}, reset channel {}",
        config.geometry.wheelbase, config.zero_delta_policy, config.reset_channel
    );

    let mut scheduler = Scheduler::new()
        .with_name("tread_replay")
        .with_tick_period(Duration::from_millis(args.period_ms))
        .with_log_level(node_log_level(args.verbose, &params));

    let source = TickSourceNode::new(open_input(args.input.as_ref())?, &config)?;
    let finished = source.finished_handle();
    let sink = PoseSinkNode::new(
        BufWriter::new(io::stdout()),
        &config,
        scheduler.running_handle(),
    )?;

    // Source, estimator and sink all run within one cycle
    scheduler
        .add(Box::new(source), 0, Some(true))
        .add(Box::new(OdometryNode::from_config(&config)?), 10, Some(true))
        .add(Box::new(sink), 20, Some(true));

    scheduler.run_until(|| finished.load(Ordering::SeqCst))?;

    if let Some(source) = scheduler.node_info("tick_source") {
        let skipped = source.metrics().warnings_count;
        if skipped > 0 {
            warn!("{} input lines were skipped or dropped", skipped);
        }
    }
    if let Some(sink) = scheduler.node_info("pose_sink") {
        if sink.metrics().errors_count > 0 {
            anyhow::bail!("pose output failed; replay stopped early");
        }
    }
    info!("Replay finished after {} cycles", scheduler.cycles());
    Ok(())
}

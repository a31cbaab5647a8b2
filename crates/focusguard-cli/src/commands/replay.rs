use std::path::{Path, PathBuf};

use clap::Args;
use focusguard_core::{load_trace, replay, Config, CoreError, Event, ReplayOptions, ReplayReport};

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON Lines trace file
    pub trace: PathBuf,
    /// Use this config file instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Keep ticking until this epoch millisecond after the last entry
    #[arg(long)]
    pub until_ms: Option<u64>,
    /// Only tick on explicit `tick` entries
    #[arg(long)]
    pub no_ticks: bool,
    /// Seed for distraction prompt selection
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Print every event as a JSON line
    #[arg(long)]
    pub json: bool,
}

/// Load config, parse the trace and run it.
pub fn execute(args: &ReplayArgs) -> Result<ReplayReport, CoreError> {
    let config = load_config(args.config.as_deref())?;
    let entries = load_trace(&args.trace)?;
    log::info!("replaying {} entries from {}", entries.len(), args.trace.display());

    let options = ReplayOptions {
        synthesize_ticks: !args.no_ticks,
        until_ms: args.until_ms,
        seed: args.seed,
    };
    Ok(replay(&entries, &config, options))
}

fn load_config(path: Option<&Path>) -> Result<Config, CoreError> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = execute(&args)?;

    if args.json {
        for event in &report.events {
            println!("{}", serde_json::to_string(event)?);
        }
        return Ok(());
    }

    for event in &report.events {
        println!("{}", describe(event));
    }
    println!();
    println!("ticks:     {}", report.ticks);
    println!("attention: {}", report.final_attention);
    println!("score:     {:.1}", report.final_score);
    println!(
        "session:   {} {}s remaining, {} cycles completed",
        report.session.mode, report.session.remaining_secs, report.session.completed_cycles
    );
    Ok(())
}

fn describe(event: &Event) -> String {
    let detail = match event {
        Event::AttentionChanged { from, to, .. } => format!("{from} -> {to}"),
        Event::StillnessDetected { still_for_ms, .. } => format!("still for {still_for_ms} ms"),
        Event::ThresholdBreached {
            score, threshold, ..
        } => format!("{score:.1} < {threshold}"),
        Event::ChallengePrompted { score, .. } => format!("score {score:.1}"),
        Event::IdlePenaltyApplied { penalty, score, .. }
        | Event::AwayPenaltyApplied { penalty, score, .. }
        | Event::VisibilityPenaltyApplied { penalty, score, .. } => {
            format!("-{penalty:.1} -> {score:.1}")
        }
        Event::EngagementReset { reason, .. } => format!("{reason:?}"),
        Event::TimerStarted {
            mode,
            remaining_secs,
            ..
        } => format!("{mode}, {remaining_secs}s"),
        Event::TimerPaused { remaining_secs, .. } => format!("{remaining_secs}s left"),
        Event::PausedByAttention { attention, .. }
        | Event::DistractionDetected { attention, .. } => attention.to_string(),
        Event::DistractionAlert { message, .. } => message.clone(),
        Event::FocusCompleted {
            minutes,
            completed_cycles,
            ..
        } => format!("{minutes} min, cycle {completed_cycles}"),
        Event::BreakCompleted { minutes, .. } => format!("{minutes} min"),
        Event::ModeChanged { message, .. } => message.clone(),
        Event::StillnessAlert { count, .. } => format!("#{count}"),
        Event::TimerReset { .. } | Event::ResumedByAttention { .. } => String::new(),
    };
    format!(
        "{} {:<26} {detail}",
        event.at().format("%H:%M:%S%.3f"),
        event.kind()
    )
}

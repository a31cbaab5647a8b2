use chrono::{DateTime, Utc};
use clap::Args;
use focusguard_core::{Event, SessionSummary};
use serde::Serialize;

use super::replay::{execute, ReplayArgs};

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub replay: ReplayArgs,
}

/// One completed focus session from a trace.
#[derive(Serialize)]
struct SessionRow {
    session_id: String,
    completed_at: DateTime<Utc>,
    minutes: u32,
    cycle: u32,
    summary: Option<SessionSummary>,
}

pub fn run(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = execute(&args.replay)?;
    let rows: Vec<SessionRow> = report
        .events
        .iter()
        .filter_map(|event| match event {
            Event::FocusCompleted {
                session_id,
                minutes,
                summary,
                completed_cycles,
                at,
            } => Some(SessionRow {
                session_id: session_id.to_string(),
                completed_at: *at,
                minutes: *minutes,
                cycle: *completed_cycles,
                summary: *summary,
            }),
            _ => None,
        })
        .collect();

    if args.replay.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("no focus sessions completed");
        return Ok(());
    }
    println!("{:<6} {:>5} {:>9} {:>11} {:>8}", "cycle", "min", "avg score", "below (s)", "still");
    for row in &rows {
        match &row.summary {
            Some(s) => println!(
                "{:<6} {:>5} {:>9} {:>11} {:>8}",
                row.cycle, row.minutes, s.average_score, s.seconds_below_threshold, s.stillness_alerts
            ),
            None => println!("{:<6} {:>5} {:>9}", row.cycle, row.minutes, "-"),
        }
    }
    Ok(())
}

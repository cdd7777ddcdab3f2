//! Vestgate CLI: inspect unlock schedules and replay scripted token sessions.

mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use vestgate_token::TokenConfig;
use vestgate_types::Timestamp;
use vestgate_utils::{format_days, LogFormat};
use vestgate_vesting::PlanClass;

use crate::script::Script;

#[derive(Parser)]
#[command(name = "vestgate", about = "Gated, vesting-aware token tooling")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "VESTGATE_LOG_LEVEL", global = true)]
    log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the lock remaining at each cliff of a vesting plan.
    Schedule {
        /// Plan size in whole tokens.
        #[arg(long)]
        total: u128,

        /// Use the four-cliff team curve instead of the single external cliff.
        #[arg(long)]
        team: bool,

        /// Release time in seconds since the Unix epoch; adds absolute unlock times.
        #[arg(long)]
        incubation: Option<u64>,

        /// Print the table as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replay a TOML script of timed operations against a fresh token.
    Replay {
        /// Path to the script.
        #[arg(long)]
        script: PathBuf,

        /// Token configuration file; overrides the script's `[token]` table.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Abort on the first rejected step.
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Serialize)]
struct CliffRow {
    stage: u8,
    after_days: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    unlocks_at: Option<Timestamp>,
    locked: u128,
    unlocked: u128,
}

fn schedule_rows(total: u128, class: PlanClass, incubation: Option<u64>) -> Vec<CliffRow> {
    let initial = class.initial_stage();
    let mut rows = vec![CliffRow {
        stage: initial,
        after_days: 0,
        unlocks_at: incubation.map(Timestamp::new),
        locked: class.locked_at_stage(total, initial),
        unlocked: total.saturating_sub(class.locked_at_stage(total, initial)),
    }];
    for &days in class.cliffs() {
        let stage = class.stage_at(days);
        let locked = class.locked_at_stage(total, stage);
        rows.push(CliffRow {
            stage,
            after_days: days,
            unlocks_at: incubation.map(|t| Timestamp::new(t).plus_days(days)),
            locked,
            unlocked: total.saturating_sub(locked),
        });
    }
    rows
}

fn print_schedule(total: u128, team: bool, incubation: Option<u64>, json: bool) -> anyhow::Result<()> {
    let class = PlanClass::from_is_team(team);
    let rows = schedule_rows(total, class, incubation);
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("{} plan of {total} tokens", class.as_str());
    println!("{:>6}  {:>10}  {:>12}  {:>24}  {:>24}", "stage", "after", "at", "locked", "unlocked");
    for row in rows {
        let at = row
            .unlocks_at
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:>6}  {:>10}  {:>12}  {:>24}  {:>24}",
            row.stage,
            format_days(row.after_days),
            at,
            row.locked,
            row.unlocked
        );
    }
    Ok(())
}

fn replay(script_path: PathBuf, config_path: Option<PathBuf>, strict: bool) -> anyhow::Result<()> {
    let script = Script::from_toml_file(&script_path)?;
    let config = match config_path {
        Some(path) => {
            let config = TokenConfig::from_toml_file(&path)?;
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        None => {
            let config = script
                .token
                .clone()
                .context("no token configuration: pass --config or add a [token] table")?;
            config.validate()?;
            config
        }
    };

    let report = script.replay(config, strict)?;
    for step in &report.steps {
        println!("{}", serde_json::to_string(step)?);
    }
    println!("{}", serde_json::to_string_pretty(&report.summary)?);
    if report.rejected > 0 {
        tracing::warn!(rejected = report.rejected, "some steps were rejected");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    vestgate_utils::init_tracing(&cli.log_level, format);

    match cli.command {
        Command::Schedule {
            total,
            team,
            incubation,
            json,
        } => print_schedule(total, team, incubation, json)?,
        Command::Replay {
            script,
            config,
            strict,
        } => replay(script, config, strict)?,
    }
    Ok(())
}

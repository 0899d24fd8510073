use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use stateparam_common::ScheduleConfig;
use stateparam_engine::{Engine, Events, State};
use stateparam_sched::{attach_from_config, build_scheduler, DynStateScheduler, StateDict};

#[derive(Parser, Debug)]
#[command(name = "stateparam", about = "Simulate and run state parameter schedules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the values each configured scheduler would emit, as CSV.
    Simulate(SimulateArgs),
    /// Attach every configured scheduler to a no-op loop and run it.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[arg(long, default_value = "schedule.json")]
    config: PathBuf,
    #[arg(long, default_value_t = 100)]
    num_events: usize,
    /// Write CSV here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also draw a text chart per scheduler on stderr.
    #[arg(long)]
    plot: bool,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[arg(long, default_value = "schedule.json")]
    config: PathBuf,
    /// Overrides `max_epochs` from the config.
    #[arg(long)]
    max_epochs: Option<usize>,
    /// Overrides `epoch_length` from the config.
    #[arg(long)]
    epoch_length: Option<usize>,
    /// Restore scheduler counters from a snapshot file before running.
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Write scheduler counters to a snapshot file after running.
    #[arg(long)]
    save_snapshot: Option<PathBuf>,
    /// Write the recorded parameter history as JSON.
    #[arg(long)]
    history_out: Option<PathBuf>,
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Run(args) => cmd_run(args),
    }
}

// ── Command implementations ────────────────────────────────────────────────────

fn cmd_simulate(args: SimulateArgs) -> Result<()> {
    let config = load_or_create_config(&args.config)?;
    if config.schedulers.is_empty() {
        anyhow::bail!("No schedulers configured in {}", args.config.display());
    }

    let mut out: Box<dyn Write> = match args.output {
        Some(ref p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Cannot create {}", p.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    writeln!(out, "param_name,event,value")?;

    for sched_config in &config.schedulers {
        let scheduler = build_scheduler(sched_config)
            .with_context(|| format!("Invalid scheduler '{}'", sched_config.param_name))?;
        for (event, value) in scheduler.simulate(args.num_events) {
            writeln!(out, "{},{event},{value}", scheduler.param_name())?;
        }
        if args.plot {
            eprintln!("{}", scheduler.plot(args.num_events)?);
        }
    }
    out.flush()?;

    if let Some(ref p) = args.output {
        eprintln!("Wrote {} values per scheduler to {}", args.num_events, p.display());
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let config = load_or_create_config(&args.config)?;
    let max_epochs = args.max_epochs.unwrap_or(config.max_epochs);
    let epoch_length = args.epoch_length.unwrap_or(config.epoch_length);

    let snapshots = match args.resume {
        Some(ref p) => load_snapshots(p)?,
        None => BTreeMap::new(),
    };

    let mut engine: Engine<()> = Engine::new(|_: &mut State, _: &()| {});
    let mut schedulers = Vec::with_capacity(config.schedulers.len());
    for sched_config in &config.schedulers {
        let scheduler = attach_from_config(sched_config, &mut engine)
            .with_context(|| format!("Cannot attach scheduler '{}'", sched_config.param_name))?;
        if let Some(snapshot) = snapshots.get(scheduler.param_name()) {
            scheduler.load_state_dict(snapshot);
            tracing::info!(
                param = scheduler.param_name(),
                event_index = snapshot.event_index,
                "Restored scheduler"
            );
        }
        schedulers.push(scheduler);
    }

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(max_epochs as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} epochs")?
            .progress_chars("=>-"),
    );
    {
        let progress = progress.clone();
        engine.add_event_handler(Events::EpochCompleted, move |state: &mut State| {
            progress.set_position(state.epoch as u64);
        });
    }

    let data = vec![(); epoch_length];
    engine.run(&data, max_epochs)?;
    progress.finish_and_clear();

    let state = engine.state();
    eprintln!(
        "Completed {} epochs ({} iterations).",
        state.epoch, state.iteration
    );
    for (name, value) in state.params() {
        match value {
            Some(v) => println!("{name} = {v}"),
            None => println!("{name} = (not fired)"),
        }
    }

    if let Some(ref p) = args.history_out {
        let json = serde_json::to_string_pretty(&state.param_history())?;
        std::fs::write(p, json).with_context(|| format!("Cannot write {}", p.display()))?;
        eprintln!("Saved history to {}", p.display());
    }
    if let Some(ref p) = args.save_snapshot {
        save_snapshots(p, &schedulers)?;
        eprintln!("Saved snapshot to {}", p.display());
    }
    Ok(())
}

// ── Helpers ────────────────────────────────────────────────────────────────────

fn load_or_create_config(path: &Path) -> Result<ScheduleConfig> {
    if path.exists() {
        ScheduleConfig::load(path).with_context(|| format!("Cannot load {}", path.display()))
    } else {
        let default = ScheduleConfig::default();
        default.save(path)?;
        eprintln!("Created default config at {}", path.display());
        Ok(default)
    }
}

/// Snapshot file: `{ "<param_name>": { "event_index": n }, ... }`.
fn save_snapshots(path: &Path, schedulers: &[DynStateScheduler]) -> Result<()> {
    let map: serde_json::Map<String, serde_json::Value> = schedulers
        .iter()
        .map(|s| (s.param_name().to_string(), s.state_dict().to_json()))
        .collect();
    let json = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;
    std::fs::write(path, json)?;
    Ok(())
}

fn load_snapshots(path: &Path) -> Result<BTreeMap<String, StateDict>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read snapshot {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    let Some(map) = value.as_object() else {
        anyhow::bail!("Snapshot {} should be a JSON object", path.display());
    };
    map.iter()
        .map(|(name, dict)| {
            let dict = StateDict::from_json(dict)
                .with_context(|| format!("Bad snapshot entry for '{name}'"))?;
            Ok((name.clone(), dict))
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! CLI commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bus::{Alert, AlertBus};
use crate::config;
use crate::notify::{self, NotificationSink, NotifyError};
use crate::recurrence::RecurrenceRule;
use crate::scheduler::reconciler::spawn_refresh_loop;
use crate::scheduler::ScheduleReconciler;
use crate::store::{DayStore, StoreError};
use crate::task::{today_key, ClockTime, Task, TaskList};

#[derive(Parser)]
#[command(name = "daylist", about = "daylist — daily checklist with reminders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and data directories.
    Onboard,

    /// Start the reminder daemon (scheduler + notification sinks).
    Start,

    /// Add a task to today's checklist.
    Add {
        /// Task label.
        label: String,

        /// Reminder time of day, e.g. "09:00".
        #[arg(long)]
        time: Option<String>,

        /// Repeat every N minutes (interval mode).
        #[arg(long)]
        every: Option<u32>,

        /// Recurrence rule, e.g. "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,FR;DTSTART=2024-01-01".
        #[arg(long)]
        rrule: Option<String>,
    },

    /// Show today's checklist.
    List,

    /// Toggle a task's done flag.
    Done { id: String },

    /// Delete a task.
    Remove { id: String },

    /// Edit a task. Omitted options keep their value; `--every 0` and
    /// `--rrule ""` clear interval and recurrence.
    Edit {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        every: Option<u32>,
        #[arg(long)]
        rrule: Option<String>,
    },

    /// Show past days with completion counts.
    History,

    /// Fire a test alert through the configured sinks.
    TestNotify,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(None)?;
    let _log_guard = crate::logging::init_logging(&cfg)?;

    match cli.command {
        Commands::Onboard => cmd_onboard().await,
        Commands::Start => cmd_start(cfg).await,
        Commands::Add {
            label,
            time,
            every,
            rrule,
        } => cmd_add(cfg, label, time, every, rrule).await,
        Commands::List => cmd_list(cfg).await,
        Commands::Done { id } => cmd_done(cfg, id).await,
        Commands::Remove { id } => cmd_remove(cfg, id).await,
        Commands::Edit {
            id,
            label,
            time,
            every,
            rrule,
        } => cmd_edit(cfg, id, label, time, every, rrule).await,
        Commands::History => cmd_history(cfg).await,
        Commands::TestNotify => cmd_test_notify(cfg).await,
    }
}

// ---------------------------------------------------------------------------
// onboard
// ---------------------------------------------------------------------------

async fn cmd_onboard() -> Result<()> {
    let cfg_path = config::config_path();
    if cfg_path.exists() {
        println!("Config already exists at {}", cfg_path.display());
        println!("Delete it first if you want to re-initialize.");
        return Ok(());
    }

    let cfg = config::Config::default();
    config::save_config(&cfg, None)?;
    println!("✓ Created config at {}", cfg_path.display());

    std::fs::create_dir_all(config::cache_dir())?;
    std::fs::create_dir_all(config::log_dir())?;
    println!("✓ Created data directories under {}", config::config_dir().display());

    println!("\nNext steps:");
    println!("  1. Optionally set store.remoteUrl in {}", cfg_path.display());
    println!("  2. Add a task: daylist add \"Drink water\" --every 60");
    println!("  3. Run the daemon: daylist start");
    Ok(())
}

// ---------------------------------------------------------------------------
// start (daemon)
// ---------------------------------------------------------------------------

async fn cmd_start(cfg: config::Config) -> Result<()> {
    let store = Arc::new(DayStore::from_config(&cfg.store));
    let bus = Arc::new(AlertBus::new());
    let cancel = CancellationToken::new();

    // One delivery loop per sink.
    let mut delivery = Vec::new();
    for sink in notify::build_sinks(&cfg.notify) {
        delivery.push(notify::spawn_delivery_loop(
            sink,
            bus.subscribe(),
            cancel.clone(),
        ));
    }

    // Scheduler loop plus the snapshot refresh poll.
    let reconciler =
        ScheduleReconciler::new(&cfg.scheduler, &cfg.notify, bus.clone(), store.clone());
    let events_tx = reconciler.events_sender();
    let refresh = spawn_refresh_loop(
        store,
        events_tx,
        std::time::Duration::from_secs(cfg.store.refresh_secs.max(1)),
        cancel.clone(),
    );
    let scheduler = tokio::spawn(reconciler.run(cancel.clone()));

    // Startup confirmation that alerts actually reach the user.
    bus.publish(Alert::new("daylist", "Notifications are enabled!"));

    info!("daylist daemon running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    cancel.cancel();
    let _ = scheduler.await;
    let _ = refresh.await;
    for handle in delivery {
        let _ = handle.await;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// task CRUD
// ---------------------------------------------------------------------------

async fn cmd_add(
    cfg: config::Config,
    label: String,
    time: Option<String>,
    every: Option<u32>,
    rrule: Option<String>,
) -> Result<()> {
    let mut task = Task::new(&label)?;
    if let Some(t) = time {
        task.reminder_time = Some(parse_time(&t)?);
    }
    if let Some(minutes) = every {
        if minutes == 0 {
            anyhow::bail!("--every must be a positive number of minutes");
        }
        task.repeat_interval = Some(minutes);
    }
    if let Some(r) = rrule {
        task.rrule = parse_rrule(&r)?;
    }

    let store = DayStore::from_config(&cfg.store);
    let day = today_key();
    let mut tasks = store.load_day(&day).await;
    let id = task.id.clone();
    tasks.tasks.push(task);
    save_with_banner(&store, &day, &tasks).await?;
    println!("✓ Added task {id}");
    Ok(())
}

async fn cmd_list(cfg: config::Config) -> Result<()> {
    let store = DayStore::from_config(&cfg.store);
    let day = today_key();
    let tasks = store.load_day(&day).await;

    println!("Tasks for {day}");
    if tasks.is_empty() {
        println!("  (no tasks yet; add one with `daylist add`)");
        return Ok(());
    }
    for (i, t) in tasks.tasks.iter().enumerate() {
        let mark = if t.done { "x" } else { " " };
        println!("  {}. [{mark}] {} ({})  {}", i + 1, t.label, t.id, summarize(t));
    }
    Ok(())
}

async fn cmd_done(cfg: config::Config, id: String) -> Result<()> {
    let store = DayStore::from_config(&cfg.store);
    let day = today_key();
    let mut tasks = store.load_day(&day).await;
    let Some(done) = tasks.toggle(&id) else {
        anyhow::bail!("no task with id {id}");
    };
    save_with_banner(&store, &day, &tasks).await?;
    println!("✓ Task {id} marked {}", if done { "done" } else { "not done" });
    Ok(())
}

async fn cmd_remove(cfg: config::Config, id: String) -> Result<()> {
    let store = DayStore::from_config(&cfg.store);
    let day = today_key();
    let mut tasks = store.load_day(&day).await;
    if !tasks.remove(&id) {
        anyhow::bail!("no task with id {id}");
    }
    save_with_banner(&store, &day, &tasks).await?;
    println!("✓ Removed task {id}");
    Ok(())
}

async fn cmd_edit(
    cfg: config::Config,
    id: String,
    label: Option<String>,
    time: Option<String>,
    every: Option<u32>,
    rrule: Option<String>,
) -> Result<()> {
    let store = DayStore::from_config(&cfg.store);
    let day = today_key();
    let mut tasks = store.load_day(&day).await;
    {
        let Some(task) = tasks.get_mut(&id) else {
            anyhow::bail!("no task with id {id}");
        };
        if let Some(l) = label {
            let l = l.trim().to_string();
            if l.is_empty() {
                anyhow::bail!("task label must not be empty");
            }
            task.label = l;
        }
        if let Some(t) = time {
            task.reminder_time = Some(parse_time(&t)?);
        }
        if let Some(minutes) = every {
            task.repeat_interval = if minutes == 0 { None } else { Some(minutes) };
        }
        if let Some(r) = rrule {
            task.rrule = parse_rrule(&r)?;
        }
    }
    save_with_banner(&store, &day, &tasks).await?;
    println!("✓ Updated task {id}");
    Ok(())
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

async fn cmd_history(cfg: config::Config) -> Result<()> {
    let store = DayStore::from_config(&cfg.store);
    let history = store.history()?;
    if history.is_empty() {
        println!("No history found.");
        return Ok(());
    }
    for (day, tasks) in history {
        let done = tasks.tasks.iter().filter(|t| t.done).count();
        println!("{day}");
        for t in &tasks.tasks {
            println!("  [{}] {}", if t.done { "x" } else { " " }, t.label);
        }
        println!("  {done} / {} tasks done", tasks.tasks.len());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// test-notify
// ---------------------------------------------------------------------------

async fn cmd_test_notify(cfg: config::Config) -> Result<()> {
    let alert = Alert::new("daylist", "Test notification").with_icon(cfg.notify.icon.clone());
    for sink in notify::build_sinks(&cfg.notify) {
        match sink.notify(&alert).await {
            Ok(()) => println!("✓ {} sink delivered", sink.name()),
            Err(NotifyError::PermissionDenied) => {
                println!("⚠ {} sink skipped (alerts disabled)", sink.name())
            }
            Err(e) => println!("⚠ {} sink failed: {e}", sink.name()),
        }
        sink.play_cue().await;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_time(value: &str) -> Result<ClockTime> {
    value
        .parse::<ClockTime>()
        .with_context(|| format!("invalid time {value:?}, expected HH:MM"))
}

/// Validate and canonicalize an rrule option; the empty string clears it.
fn parse_rrule(value: &str) -> Result<Option<String>> {
    let rule = RecurrenceRule::parse(value)
        .with_context(|| format!("invalid recurrence rule {value:?}"))?;
    Ok(rule.map(|r| r.encode()))
}

/// Persist the day document; a failed remote write is a transient
/// warning, not an error, because the local cache already has the data.
async fn save_with_banner(store: &DayStore, day: &str, tasks: &TaskList) -> Result<()> {
    match store.save_day(day, tasks).await {
        Ok(()) => Ok(()),
        Err(StoreError::Write(e)) => {
            eprintln!("⚠ Remote sync failed ({e}); changes saved locally.");
            Ok(())
        }
        Err(e) => Err(e).context("saving day document"),
    }
}

/// One-line schedule summary for `list`.
fn summarize(task: &Task) -> String {
    let mut parts = Vec::new();
    if let Some(minutes) = task.repeat_interval {
        parts.push(format!("every {minutes} min"));
    }
    match task.rrule.as_deref() {
        Some(encoded) if !encoded.trim().is_empty() => match RecurrenceRule::parse(encoded) {
            Ok(Some(rule)) => parts.push(rule.describe()),
            _ => parts.push("invalid recurrence".into()),
        },
        _ => {}
    }
    if let Some(t) = task.reminder_time {
        parts.push(format!("@ {t}"));
    }
    if parts.is_empty() {
        "no reminder".into()
    } else {
        parts.join(" | ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Schedule reconciler: rebuilds the armed timer set from the current
//! task snapshot and reacts to firings, snapshot changes, and the day
//! rollover.

use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveTime};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{registry::TimerRegistry, SchedulerEvent};
use crate::bus::{Alert, AlertBus};
use crate::config::{NotifyConfig, SchedulerConfig};
use crate::recurrence::RecurrenceRule;
use crate::store::DayStore;
use crate::task::{today_key, FiringMode, Task, TaskList};

const EVENT_QUEUE_CAPACITY: usize = 64;

/// The scheduling orchestrator. Owns the timer registry and the live
/// snapshot; every mutation flows through its single event queue, so a
/// reconciliation pass and a firing callback never interleave.
///
/// Timers are armed in task-insertion order, which is also the delivery
/// order for firings that target the same instant.
pub struct ScheduleReconciler {
    registry: TimerRegistry,
    snapshot: TaskList,
    day: String,
    default_clock: NaiveTime,
    rollover_summary: bool,
    icon: String,
    bus: Arc<AlertBus>,
    store: Arc<DayStore>,
    events_tx: mpsc::Sender<SchedulerEvent>,
    events_rx: mpsc::Receiver<SchedulerEvent>,
    rollover: Option<JoinHandle<()>>,
}

impl ScheduleReconciler {
    pub fn new(
        scheduler_cfg: &SchedulerConfig,
        notify_cfg: &NotifyConfig,
        bus: Arc<AlertBus>,
        store: Arc<DayStore>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let default_clock = scheduler_cfg
            .default_reminder_time
            .parse::<crate::task::ClockTime>()
            .map(|c| c.time())
            .unwrap_or_else(|_| {
                warn!(
                    value = %scheduler_cfg.default_reminder_time,
                    "Bad defaultReminderTime, using 09:00"
                );
                NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
            });
        Self {
            registry: TimerRegistry::new(events_tx.clone()),
            snapshot: TaskList::default(),
            day: today_key(),
            default_clock,
            rollover_summary: scheduler_cfg.rollover_summary,
            icon: notify_cfg.icon.clone(),
            bus,
            store,
            events_tx,
            events_rx,
            rollover: None,
        }
    }

    /// Sender for external event sources: the snapshot refresh loop, CLI
    /// nudges, and whatever transport delivers remote push payloads.
    pub fn events_sender(&self) -> mpsc::Sender<SchedulerEvent> {
        self.events_tx.clone()
    }

    /// The armed (task id, target instant) set.
    pub fn armed(&self) -> BTreeMap<String, DateTime<Local>> {
        self.registry.armed()
    }

    // -- reconciliation -----------------------------------------------------

    /// Full rebuild: cancel every armed timer, then arm one timer per
    /// not-done task with a valid firing mode, plus the day-rollover
    /// timer. Deterministic in `(snapshot, now)`, so running it twice
    /// with the same inputs arms the same (task id, instant) set.
    pub fn reconcile(&mut self, now: DateTime<Local>) {
        self.registry.cancel_all();

        let mut to_arm = Vec::new();
        for task in &self.snapshot.tasks {
            if task.done {
                continue;
            }
            match task.firing_mode() {
                FiringMode::Interval(minutes) => {
                    to_arm.push((task.id.clone(), now + Duration::minutes(i64::from(minutes))));
                }
                FiringMode::Calendar => {
                    if let Some(at) = self.next_calendar_firing(task, &now) {
                        to_arm.push((task.id.clone(), at));
                    }
                }
                FiringMode::None => {}
            }
        }
        for (id, at) in to_arm {
            self.registry.arm(&id, at);
        }

        self.arm_rollover(now);
        debug!(day = %self.day, timers = self.registry.len(), "Reconciled");
    }

    /// Next firing instant for a calendar-mode task. A malformed stored
    /// rule degrades to "no recurrence"; a clock time without a rule is
    /// the degenerate daily case; an exhausted rule leaves the task
    /// unscheduled.
    fn next_calendar_firing(&self, task: &Task, now: &DateTime<Local>) -> Option<DateTime<Local>> {
        let rule = match task.rrule.as_deref() {
            Some(encoded) => match RecurrenceRule::parse(encoded) {
                Ok(rule) => rule,
                Err(e) => {
                    warn!(task_id = %task.id, error = %e, "Malformed recurrence rule, treating as none");
                    None
                }
            },
            None => None,
        };
        let clock = task
            .reminder_time
            .map(|c| c.time())
            .unwrap_or(self.default_clock);
        let rule = match rule {
            Some(rule) => rule,
            None => {
                task.reminder_time?;
                RecurrenceRule::daily(1, now.date_naive()).ok()?
            }
        };
        match rule.next_firing(clock, now) {
            Ok(at) => at,
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "Leaving task without a reminder");
                None
            }
        }
    }

    fn arm_rollover(&mut self, now: DateTime<Local>) {
        if let Some(handle) = self.rollover.take() {
            handle.abort();
        }
        let midnight = next_midnight(&now);
        let delay = (midnight - now).to_std().unwrap_or_default();
        let tx = self.events_tx.clone();
        self.rollover = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SchedulerEvent::DayRollover).await;
        }));
    }

    // -- event handling -----------------------------------------------------

    fn on_snapshot(&mut self, day: String, tasks: TaskList) {
        if day != self.day {
            debug!(incoming = %day, current = %self.day, "Snapshot for another day ignored");
            return;
        }
        if tasks == self.snapshot {
            return;
        }
        self.snapshot = tasks;
        self.reconcile(Local::now());
    }

    fn on_fired(&mut self, task_id: String, seq: u64) {
        if !self.registry.is_current(&task_id, seq) {
            debug!(task_id = %task_id, "Stale fire event ignored");
            return;
        }
        self.registry.cancel(&task_id);

        // Gate on the live snapshot, not the one captured at arm time: a
        // task completed or deleted while the timer was pending must not
        // notify or re-arm.
        let Some(task) = self.snapshot.get(&task_id) else {
            debug!(task_id = %task_id, "Fired task no longer in snapshot");
            return;
        };
        if task.done {
            debug!(task_id = %task_id, "Fired task already done");
            return;
        }

        match task.firing_mode() {
            FiringMode::Interval(minutes) => {
                let alert = Alert::repeating(&task.label);
                let at = Local::now() + Duration::minutes(i64::from(minutes));
                self.publish(alert);
                self.registry.arm(&task_id, at);
            }
            FiringMode::Calendar => {
                let alert = Alert::one_shot(&task.label);
                let next = self.next_calendar_firing(task, &Local::now());
                self.publish(alert);
                if let Some(at) = next {
                    self.registry.arm(&task_id, at);
                }
            }
            FiringMode::None => {
                debug!(task_id = %task_id, "Fired task no longer has a firing mode");
            }
        }
    }

    async fn on_rollover(&mut self) {
        let pending = self.snapshot.pending_count();
        if self.rollover_summary && pending > 0 {
            self.publish(Alert::new(
                "daylist",
                format!("Day ended with {pending} unfinished task(s)"),
            ));
        }
        self.day = today_key();
        info!(day = %self.day, "Day rollover");
        self.snapshot = self.store.load_day(&self.day).await;
        self.reconcile(Local::now());
    }

    fn publish(&self, alert: Alert) {
        let alert = if alert.icon.is_none() {
            alert.with_icon(self.icon.clone())
        } else {
            alert
        };
        self.bus.publish(alert);
    }

    // -- main loop ----------------------------------------------------------

    /// Load the current day and run the scheduler loop until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        self.snapshot = self.store.load_day(&self.day).await;
        self.reconcile(Local::now());
        info!(day = %self.day, tasks = self.snapshot.tasks.len(), "Scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.registry.cancel_all();
                    if let Some(handle) = self.rollover.take() {
                        handle.abort();
                    }
                    info!("Scheduler stopped");
                    return Ok(());
                }
                event = self.events_rx.recv() => match event {
                    Some(SchedulerEvent::SnapshotChanged { day, tasks }) => {
                        self.on_snapshot(day, tasks)
                    }
                    Some(SchedulerEvent::Fired { task_id, seq }) => self.on_fired(task_id, seq),
                    Some(SchedulerEvent::DayRollover) => self.on_rollover().await,
                    Some(SchedulerEvent::Push(payload)) => self.publish(payload.into_alert()),
                    None => return Ok(()),
                },
            }
        }
    }

    #[cfg(test)]
    fn set_snapshot(&mut self, tasks: TaskList) {
        self.snapshot = tasks;
    }
}

fn next_midnight(now: &DateTime<Local>) -> DateTime<Local> {
    use chrono::TimeZone;
    let next_day = now.date_naive().succ_opt().unwrap_or(now.date_naive());
    Local
        .from_local_datetime(&next_day.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or(*now + Duration::hours(24))
}

// ---------------------------------------------------------------------------
// Snapshot refresh loop
// ---------------------------------------------------------------------------

/// Periodically re-read the authoritative day document and hand it to
/// the reconciler. The reconciler skips reconciliation when nothing
/// changed, so the poll period only bounds how quickly external edits
/// are picked up.
pub fn spawn_refresh_loop(
    store: Arc<DayStore>,
    tx: mpsc::Sender<SchedulerEvent>,
    period: std::time::Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // first tick fires immediately, skip it
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = interval.tick() => {}
            }
            let day = today_key();
            let tasks = store.load_day(&day).await;
            if tx
                .send(SchedulerEvent::SnapshotChanged { day, tasks })
                .await
                .is_err()
            {
                return;
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::PushPayload;
    use crate::store::LocalCache;
    use crate::task::ClockTime;

    fn make_reconciler() -> (ScheduleReconciler, Arc<AlertBus>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DayStore::with_parts(
            None,
            LocalCache::new(dir.path().to_path_buf()),
        ));
        let bus = Arc::new(AlertBus::new());
        let rec = ScheduleReconciler::new(
            &SchedulerConfig::default(),
            &NotifyConfig::default(),
            bus.clone(),
            store,
        );
        (rec, bus, dir)
    }

    fn interval_task(label: &str, minutes: u32) -> Task {
        let mut t = Task::new(label).unwrap();
        t.repeat_interval = Some(minutes);
        t
    }

    fn clock_task(label: &str, hour: u32, minute: u32) -> Task {
        let mut t = Task::new(label).unwrap();
        t.reminder_time = Some(ClockTime::new(hour, minute).unwrap());
        t
    }

    // -- direct reconcile ---------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn one_timer_per_eligible_task() {
        let (mut rec, _bus, _dir) = make_reconciler();
        let mut done = interval_task("done", 5);
        done.done = true;
        let mut rule_task = Task::new("weekly").unwrap();
        rule_task.rrule =
            Some("FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE,FR;DTSTART=2024-01-01".into());
        rec.set_snapshot(TaskList {
            tasks: vec![
                interval_task("water", 10),
                clock_task("journal", 23, 59),
                rule_task,
                done,
                Task::new("bare").unwrap(),
            ],
        });
        rec.reconcile(Local::now());
        // water + journal + weekly; the done task and the task with no
        // firing mode arm nothing.
        assert_eq!(rec.armed().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn reconcile_is_idempotent() {
        let (mut rec, _bus, _dir) = make_reconciler();
        rec.set_snapshot(TaskList {
            tasks: vec![interval_task("a", 10), clock_task("b", 12, 0)],
        });
        let now = Local::now();
        rec.reconcile(now);
        let first = rec.armed();
        rec.reconcile(now);
        assert_eq!(rec.armed(), first);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_timer_targets_now_plus_interval() {
        let (mut rec, _bus, _dir) = make_reconciler();
        let task = interval_task("water", 10);
        let id = task.id.clone();
        rec.set_snapshot(TaskList { tasks: vec![task] });
        let now = Local::now();
        rec.reconcile(now);
        assert_eq!(rec.armed()[&id], now + Duration::minutes(10));
    }

    #[tokio::test(start_paused = true)]
    async fn interval_wins_when_both_modes_are_set() {
        let (mut rec, _bus, _dir) = make_reconciler();
        let mut task = interval_task("both", 5);
        task.rrule = Some("FREQ=DAILY;INTERVAL=1;DTSTART=2024-01-01".into());
        task.reminder_time = Some(ClockTime::new(9, 0).unwrap());
        let id = task.id.clone();
        rec.set_snapshot(TaskList { tasks: vec![task] });
        let now = Local::now();
        rec.reconcile(now);
        assert_eq!(rec.armed()[&id], now + Duration::minutes(5));
    }

    #[tokio::test(start_paused = true)]
    async fn clock_time_task_is_the_degenerate_daily_case() {
        let (mut rec, _bus, _dir) = make_reconciler();
        let task = clock_task("journal", 9, 0);
        let id = task.id.clone();
        rec.set_snapshot(TaskList { tasks: vec![task] });
        let now = Local::now();
        rec.reconcile(now);

        let target = rec.armed()[&id];
        assert!(target > now);
        assert_eq!(target.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let days_ahead = target.date_naive() - now.date_naive();
        // Today if 09:00 is still ahead, otherwise tomorrow.
        assert!(days_ahead.num_days() <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rule_without_reminder_time_uses_the_default_clock() {
        let (mut rec, _bus, _dir) = make_reconciler();
        let mut task = Task::new("weekly").unwrap();
        task.rrule = Some("FREQ=DAILY;INTERVAL=1;DTSTART=2024-01-01".into());
        let id = task.id.clone();
        rec.set_snapshot(TaskList { tasks: vec![task] });
        rec.reconcile(Local::now());
        assert_eq!(
            rec.armed()[&id].time(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_rule_degrades_to_no_recurrence() {
        let (mut rec, _bus, _dir) = make_reconciler();
        let mut with_clock = clock_task("salvageable", 23, 59);
        with_clock.rrule = Some("FREQ=BOGUS".into());
        let salvageable = with_clock.id.clone();
        let mut without_clock = Task::new("hopeless").unwrap();
        without_clock.rrule = Some("FREQ=BOGUS".into());
        rec.set_snapshot(TaskList {
            tasks: vec![with_clock, without_clock],
        });
        rec.reconcile(Local::now());

        // The clock time still schedules; the rule-only task cannot.
        let armed = rec.armed();
        assert_eq!(armed.len(), 1);
        assert!(armed.contains_key(&salvageable));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_rule_leaves_task_unscheduled() {
        let (mut rec, _bus, _dir) = make_reconciler();
        let mut task = Task::new("feb30").unwrap();
        // February never has 30 days.
        task.rrule = Some("FREQ=YEARLY;INTERVAL=1;BYMONTHDAY=30;BYMONTH=2;DTSTART=2024-01-01".into());
        rec.set_snapshot(TaskList { tasks: vec![task] });
        rec.reconcile(Local::now());
        assert!(rec.armed().is_empty());
    }

    // -- event loop ---------------------------------------------------------

    struct Harness {
        tx: mpsc::Sender<SchedulerEvent>,
        alerts: tokio::sync::broadcast::Receiver<Alert>,
        cancel: CancellationToken,
        _dir: tempfile::TempDir,
    }

    /// Spawn a running scheduler loop. `seed_store` also writes the task
    /// list into the day store, so a rollover that happens to cross the
    /// test's virtual-time window reloads the same tasks instead of an
    /// empty day. The rollover summary is off except where it is the
    /// thing under test.
    async fn start_loop_cfg(rollover_summary: bool, seed_store: bool, tasks: Vec<Task>) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DayStore::with_parts(
            None,
            LocalCache::new(dir.path().to_path_buf()),
        ));
        if seed_store {
            store
                .save_day(&today_key(), &TaskList { tasks: tasks.clone() })
                .await
                .unwrap();
        }
        let bus = Arc::new(AlertBus::new());
        let cfg = SchedulerConfig {
            rollover_summary,
            ..Default::default()
        };
        let rec = ScheduleReconciler::new(&cfg, &NotifyConfig::default(), bus.clone(), store);
        let tx = rec.events_sender();
        let alerts = bus.subscribe();
        let cancel = CancellationToken::new();
        let _loop = tokio::spawn(rec.run(cancel.clone()));
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        tx.send(SchedulerEvent::SnapshotChanged {
            day: today_key(),
            tasks: TaskList { tasks },
        })
        .await
        .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        Harness {
            tx,
            alerts,
            cancel,
            _dir: dir,
        }
    }

    async fn start_loop(tasks: Vec<Task>) -> Harness {
        start_loop_cfg(false, false, tasks).await
    }

    #[tokio::test(start_paused = true)]
    async fn interval_task_fires_and_rearms() {
        let task = interval_task("water", 10);
        let mut h = start_loop_cfg(false, true, vec![task]).await;

        let first = h.alerts.recv().await.unwrap();
        assert_eq!(first.title, "\u{1F501} water");
        assert_eq!(first.body, "Reminder: water");
        // Self-renewing: a second firing arrives one interval later.
        let second = h.alerts.recv().await.unwrap();
        assert_eq!(second.title, first.title);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn marking_done_before_the_fire_suppresses_it() {
        let task = interval_task("water", 10);
        let mut done = task.clone();
        done.done = true;
        let mut h = start_loop(vec![task]).await;

        // Three minutes in, the task is completed.
        tokio::time::sleep(std::time::Duration::from_secs(180)).await;
        h.tx.send(SchedulerEvent::SnapshotChanged {
            day: today_key(),
            tasks: TaskList { tasks: vec![done] },
        })
        .await
        .unwrap();

        // Well past minute 10: nothing fired, nothing re-armed.
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(3600),
            h.alerts.recv(),
        )
        .await;
        assert!(result.is_err(), "expected no alert, got {result:?}");
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn deleting_a_task_cancels_its_timer() {
        let task = interval_task("water", 10);
        let mut h = start_loop(vec![task]).await;

        h.tx.send(SchedulerEvent::SnapshotChanged {
            day: today_key(),
            tasks: TaskList::default(),
        })
        .await
        .unwrap();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(3600),
            h.alerts.recv(),
        )
        .await;
        assert!(result.is_err(), "expected no alert, got {result:?}");
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn push_payload_renders_through_the_alert_path() {
        let mut h = start_loop(vec![]).await;
        h.tx.send(SchedulerEvent::Push(PushPayload::default()))
            .await
            .unwrap();

        let alert = h.alerts.recv().await.unwrap();
        assert_eq!(alert.title, "Reminder");
        assert_eq!(alert.body, "You have a reminder.");
        // The configured icon is attached when the payload has none.
        assert_eq!(alert.icon.as_deref(), Some("/icon-192.png"));
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn rollover_summarizes_unfinished_tasks() {
        // A bare task: pending, but arms no reminder timer, so the only
        // timer left is the rollover itself.
        let task = Task::new("loose end").unwrap();
        let mut h = start_loop_cfg(true, false, vec![task]).await;

        let alert = h.alerts.recv().await.unwrap();
        assert_eq!(alert.title, "daylist");
        assert!(alert.body.contains("1 unfinished task"));
        h.cancel.cancel();
    }
}

//! Timer registry: owns every armed reminder timer.

use chrono::{DateTime, Local};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::SchedulerEvent;

struct ArmedTimer {
    seq: u64,
    target: DateTime<Local>,
    handle: JoinHandle<()>,
}

/// Maps task ids to armed, cancellable timers. At most one live timer
/// per task id: arming a task aborts its previous timer in the same
/// call, and the sequence number lets the reconciler drop fire events
/// from timers that had already elapsed when they were superseded.
///
/// Arming an instant that is already in the past fires immediately
/// (missed reminders are caught up, not dropped).
pub struct TimerRegistry {
    tx: mpsc::Sender<SchedulerEvent>,
    timers: HashMap<String, ArmedTimer>,
    next_seq: u64,
}

impl TimerRegistry {
    pub fn new(tx: mpsc::Sender<SchedulerEvent>) -> Self {
        Self {
            tx,
            timers: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Arm (or atomically re-arm) the timer for a task.
    pub fn arm(&mut self, task_id: &str, at: DateTime<Local>) {
        self.cancel(task_id);
        let seq = self.next_seq;
        self.next_seq += 1;

        let delay = (at - Local::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        let tx = self.tx.clone();
        let id = task_id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SchedulerEvent::Fired { task_id: id, seq }).await;
        });

        self.timers.insert(
            task_id.to_string(),
            ArmedTimer {
                seq,
                target: at,
                handle,
            },
        );
    }

    /// Cancel a task's timer. Returns whether one was live.
    pub fn cancel(&mut self, task_id: &str) -> bool {
        if let Some(timer) = self.timers.remove(task_id) {
            timer.handle.abort();
            true
        } else {
            false
        }
    }

    /// Cancel every live timer. Called before each reconciliation pass
    /// and on shutdown so no timer outlives its snapshot.
    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }

    /// Whether a fire event's sequence number matches the live timer for
    /// the task. Stale events come from timers that elapsed in flight.
    pub fn is_current(&self, task_id: &str, seq: u64) -> bool {
        self.timers.get(task_id).is_some_and(|t| t.seq == seq)
    }

    pub fn target(&self, task_id: &str) -> Option<DateTime<Local>> {
        self.timers.get(task_id).map(|t| t.target)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// The armed (task id, target instant) view, for status output and
    /// idempotence checks.
    pub fn armed(&self) -> BTreeMap<String, DateTime<Local>> {
        self.timers
            .iter()
            .map(|(id, t)| (id.clone(), t.target))
            .collect()
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

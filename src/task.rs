//! Task model and the per-day document shape.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// ClockTime
// ---------------------------------------------------------------------------

/// Wall-clock time of day, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M").map(Self)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// One checklist entry. The JSON shape is the per-day document element
/// stored remotely and in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub done: bool,
    /// Reminder time of day for calendar-mode firings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<ClockTime>,
    /// Repeat interval in minutes. When set, interval mode takes
    /// precedence over `rrule`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<u32>,
    /// Canonical recurrence encoding (see `recurrence::RecurrenceRule`).
    /// Kept as the raw stored string; parsed at scheduling time so a
    /// malformed rule degrades to "no recurrence" instead of poisoning
    /// the whole document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
}

/// Which of the mutually exclusive firing modes a task is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiringMode {
    /// Self-renewing fixed-period timer (minutes).
    Interval(u32),
    /// One-shot timer at the next recurrence/clock-time occurrence.
    Calendar,
    /// Nothing to schedule.
    None,
}

impl Task {
    /// Create a task with a fresh id. Fails on an empty label.
    pub fn new(label: &str) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            anyhow::bail!("task label must not be empty");
        }
        Ok(Self {
            id: new_task_id(),
            label: label.to_string(),
            done: false,
            reminder_time: None,
            repeat_interval: None,
            rrule: None,
        })
    }

    /// Resolve the active firing mode. Interval wins when both an
    /// interval and a recurrence are set.
    pub fn firing_mode(&self) -> FiringMode {
        if let Some(minutes) = self.repeat_interval {
            if minutes > 0 {
                return FiringMode::Interval(minutes);
            }
        }
        let has_rule = self.rrule.as_deref().is_some_and(|r| !r.trim().is_empty());
        if has_rule || self.reminder_time.is_some() {
            return FiringMode::Calendar;
        }
        FiringMode::None
    }
}

/// Task ids only need uniqueness; an 8-char uuid prefix is plenty for a
/// personal checklist.
pub fn new_task_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

// ---------------------------------------------------------------------------
// TaskList (day document)
// ---------------------------------------------------------------------------

/// The full task collection for one day, `{ "tasks": [...] }`.
/// Order is insertion order and is preserved across writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Flip a task's done flag. Returns the new state, or `None` if the
    /// id is unknown.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.done = !task.done;
        Some(task.done)
    }

    /// Remove a task by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() < before
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Day key for store documents and cache files: local date as `YYYY-MM-DD`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn today_key() -> String {
    day_key(chrono::Local::now().date_naive())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

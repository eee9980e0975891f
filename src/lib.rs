//! # daylist - Daily Checklist with Reminders
//!
//! daylist is a personal per-day checklist with time-based and recurring
//! reminders, backed by a remote per-day document store with a local
//! offline cache.
//!
//! ## Features
//!
//! - **Three reminder modes**: one-shot clock time, fixed interval in
//!   minutes, and calendar recurrence rules (daily/weekly/monthly/yearly
//!   with interval, weekday set, month-day, month, and end date)
//! - **Reactive scheduling**: every change to the day's task collection
//!   rebuilds the full timer set; no stale timer survives an edit,
//!   completion, or deletion
//! - **Day rollover**: an end-of-day summary of unfinished tasks, then a
//!   fresh schedule for the new day
//! - **Offline-first storage**: remote reads fall back to the local
//!   cache; failed remote writes leave the cache authoritative
//!
//! ## Modules
//!
//! - [`task`] - task model and the per-day document shape
//! - [`recurrence`] - recurrence rules and next-occurrence computation
//! - [`scheduler`] - timer registry and the schedule reconciler
//! - [`store`] - remote document store and local cache
//! - [`notify`] - notification sinks (visual alert + audible cue)
//! - [`bus`] - alert fan-out between scheduler and sinks
//! - [`config`] - configuration management
//! - [`cli`] - command-line interface
//!
//! ## Scheduling model
//!
//! All timer and snapshot mutation is confined to one scheduler event
//! loop: timers deliver fire events into the loop's queue instead of
//! running callbacks of their own, so a reconciliation pass and a firing
//! never interleave mid-step. Cancellation is total by design - each
//! pass tears down every armed timer before arming the next set.

pub mod bus;
pub mod cli;
pub mod config;
pub mod logging;
pub mod notify;
pub mod recurrence;
pub mod scheduler;
pub mod store;
pub mod task;

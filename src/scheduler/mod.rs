//! Reminder scheduling engine: timer registry, reconciler loop, and the
//! snapshot refresh service.

pub mod reconciler;
pub mod registry;

pub use reconciler::ScheduleReconciler;
pub use registry::TimerRegistry;

use crate::bus::PushPayload;
use crate::task::TaskList;

/// Events driving the scheduler loop. Everything that mutates the armed
/// timer set flows through this queue, so a reconciliation pass and a
/// firing callback never interleave mid-step.
#[derive(Debug)]
pub enum SchedulerEvent {
    /// The authoritative day document changed.
    SnapshotChanged { day: String, tasks: TaskList },
    /// An armed timer elapsed. `seq` is the arming sequence number; a
    /// stale one means the timer was superseded while the event was in
    /// flight and must be ignored.
    Fired { task_id: String, seq: u64 },
    /// Local midnight passed.
    DayRollover,
    /// Remote-origin push payload to render through the sinks.
    Push(PushPayload),
}

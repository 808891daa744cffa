//! Deferred work.
//!
//! Toast entry/exit animations and auto-dismissal run on timers. The browser
//! binding uses `setTimeout`; tests drive a virtual clock. Async work started
//! from a listener goes through a [`Spawner`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Async work that runs to completion on the page's thread.
pub type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Starts async work without waiting for it.
pub trait Spawner {
    fn spawn(&self, future: LocalFuture);
}

/// Runs tasks after a delay on the same thread.
///
/// Tasks are fire-and-forget: nothing scheduled here can be cancelled.
pub trait Scheduler {
    /// Run `task` once, no sooner than `delay` from now.
    fn schedule(&self, delay: Duration, task: Task);
}

/// Longest delay a browser timer honours; `setTimeout` treats anything
/// larger as zero.
pub const MAX_TIMER_MS: u32 = i32::MAX.unsigned_abs();

/// `delay` in whole milliseconds, clamped to [`MAX_TIMER_MS`].
#[must_use]
pub fn timer_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis())
        .unwrap_or(u32::MAX)
        .min(MAX_TIMER_MS)
}

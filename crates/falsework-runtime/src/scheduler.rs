#![forbid(unsafe_code)]

//! Task scheduling for deferred renders.
//!
//! A [`Scheduler`] accepts one-shot tasks and decides when they run:
//!
//! - [`FrameScheduler`] queues tasks until the host drives the next frame
//!   with [`FrameScheduler::run_frame`]. Work queued while a frame runs is
//!   held for the following frame, so a render that requests another
//!   render never spins within one tick.
//! - [`ImmediateScheduler`] runs each task at once. Useful for
//!   deterministic tests and headless hosts without a frame loop.
//!
//! Both are single-threaded; tasks are plain `FnOnce` closures.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Accepts tasks for later (or immediate) execution.
pub trait Scheduler {
    /// Queue `task`. Implementations decide when it runs.
    fn schedule(&self, task: Task);

    /// Short label used in diagnostics.
    fn label(&self) -> &'static str;
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(&self, task: Task) {
        (**self).schedule(task);
    }

    fn label(&self) -> &'static str {
        (**self).label()
    }
}

/// Summary of one executed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Tasks run during the frame.
    pub tasks: usize,
    /// Wall time spent running them.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// FrameScheduler
// ---------------------------------------------------------------------------

/// Queues tasks until the next frame tick.
#[derive(Default)]
pub struct FrameScheduler {
    queue: RefCell<VecDeque<Task>>,
    frame: Cell<u64>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every task queued before this call.
    ///
    /// Tasks scheduled by those tasks wait for the next frame.
    pub fn run_frame(&self) -> FrameReport {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let frame = self.frame.get() + 1;
        self.frame.set(frame);

        let _span = tracing::debug_span!("frame", frame, tasks = batch.len()).entered();
        let start = Instant::now();
        let tasks = batch.len();
        for task in batch {
            task();
        }
        let report = FrameReport {
            frame,
            tasks,
            elapsed: start.elapsed(),
        };
        tracing::trace!(
            frame,
            tasks,
            elapsed_us = report.elapsed.as_micros() as u64,
            deferred = self.pending(),
            "frame complete"
        );
        report
    }

    /// Tasks waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame.get()
    }
}

impl Scheduler for FrameScheduler {
    fn schedule(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }

    fn label(&self) -> &'static str {
        "frame"
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending())
            .field("frame", &self.frame.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ImmediateScheduler
// ---------------------------------------------------------------------------

/// Runs every task as soon as it is scheduled.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, task: Task) {
        task();
    }

    fn label(&self) -> &'static str {
        "immediate"
    }
}

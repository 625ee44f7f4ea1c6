#![forbid(unsafe_code)]

//! Per-instance render bookkeeping.
//!
//! The queue answers two questions: "does a request need a new scheduled
//! task?" (at most one pending render per instance) and "may a render
//! start now?" (renders of one instance never overlap; a request arriving
//! mid-render reruns once the current render returns).

use std::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct RenderQueue {
    pending: Cell<bool>,
    rendering: Cell<bool>,
    rerun: Cell<bool>,
    renders: Cell<u64>,
}

/// Clears the `rendering` flag even if a render panics.
struct RenderingGuard<'a>(&'a Cell<bool>);

impl Drop for RenderingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl RenderQueue {
    /// Mark a render pending. Returns `true` when this request must
    /// schedule a task, `false` when one is already pending.
    pub(crate) fn mark_pending(&self) -> bool {
        !self.pending.replace(true)
    }

    /// Consume the pending flag. Returns whether a render was pending.
    pub(crate) fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub(crate) fn clear(&self) {
        self.pending.set(false);
        self.rerun.set(false);
    }

    /// Run `render` unless a render is already in progress, in which case
    /// it is rerun after the current one. `render` returns whether it
    /// actually wrote anything (a skipped render is not counted).
    pub(crate) fn run(&self, mut render: impl FnMut() -> bool) {
        if self.rendering.get() {
            self.rerun.set(true);
            return;
        }
        self.rendering.set(true);
        let _guard = RenderingGuard(&self.rendering);
        loop {
            self.rerun.set(false);
            if render() {
                self.renders.set(self.renders.get() + 1);
            }
            if !self.rerun.get() {
                break;
            }
        }
    }

    pub(crate) fn renders(&self) -> u64 {
        self.renders.get()
    }
}

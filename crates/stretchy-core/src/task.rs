#![forbid(unsafe_code)]

//! Cancellable animation tasks.
//!
//! A [`TaskSlot`] owns at most one running session. Starting a new session
//! replaces (and returns) the previous one, and [`TaskSlot::clear`] cancels
//! whatever is running. Once a session leaves the slot, nothing drives it
//! again, so a cancelled animation never writes another frame.

/// Owner of at most one running session.
#[derive(Debug)]
pub struct TaskSlot<T> {
    running: Option<T>,
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskSlot<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { running: None }
    }

    /// Start `task`, returning the session it replaced.
    pub fn start(&mut self, task: T) -> Option<T> {
        self.running.replace(task)
    }

    /// Stop whatever is running. Used both for cancellation and for
    /// retiring a session that completed.
    pub fn clear(&mut self) -> Option<T> {
        self.running.take()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running.is_some()
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.running.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.running.as_mut()
    }
}

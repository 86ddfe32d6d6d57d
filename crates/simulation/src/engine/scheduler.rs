//! Deferred frame scheduling.
//!
//! The engine never loops on its own. After each tick it asks a
//! [`FrameScheduler`] for the next frame and keeps the returned handle so a
//! pause can cancel it. The host fires due frames back into the engine.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub trait FrameScheduler {
    /// Request one callback on the host's next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// In-process frame queue.
///
/// Used by the Bevy adapter (one due frame per app update) and by tests,
/// which can count requests and cancellations.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_handle: u64,
    pending: VecDeque<FrameHandle>,
    requested: u64,
    cancelled: u64,
    last_cancelled: Option<FrameHandle>,
}

impl FrameQueue {
    /// Pop the oldest pending frame.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    /// Number of pending frames withdrawn so far.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    pub fn last_cancelled(&self) -> Option<FrameHandle> {
        self.last_cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|&h| h != handle);
        if self.pending.len() < before {
            self.cancelled += 1;
            self.last_cancelled = Some(handle);
        }
    }
}

//! Frame scheduling. The field only ever asks for "one more frame" or
//! cancels the one it asked for; the host decides when frames fire.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub trait FrameScheduler {
    /// Schedules a single callback for the next display frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a requested frame. Unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct FrameQueue {
    issued: u64,
    pending: Vec<FrameHandle>,
}

/// A frame queue the host drains once per display refresh.
///
/// Clones share the queue, so the host keeps one clone and hands another to
/// the field:
///
/// ```
/// use particle_field::{FrameScheduler, ManualScheduler};
///
/// let host = ManualScheduler::default();
/// let mut field_side = host.clone();
/// let handle = field_side.request_frame();
/// assert_eq!(host.drain(), vec![handle]);
/// assert!(host.drain().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<FrameQueue>>,
}

impl ManualScheduler {
    /// Takes every frame that is due, in request order.
    pub fn drain(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queue.lock().pending)
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut queue = self.queue.lock();
        queue.issued += 1;
        let handle = FrameHandle(queue.issued);
        queue.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.lock().pending.retain(|pending| *pending != handle);
    }
}

//! Animation-frame scheduling.
//!
//! Work requested through [`AnimationFrames::request`] runs on the next call
//! to [`AnimationFrames::begin_frame`]. Requests made while a frame is being
//! processed land in the following frame.

/// Identifier returned by [`AnimationFrames::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(u64);

#[derive(Debug)]
pub struct AnimationFrames<T> {
    queue: Vec<(FrameRequestId, T)>,
    next_id: u64,
    frame: u64,
}

impl<T> Default for AnimationFrames<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AnimationFrames<T> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            next_id: 0,
            frame: 0,
        }
    }

    /// Queues `task` for the next frame.
    pub fn request(&mut self, task: T) -> FrameRequestId {
        let id = FrameRequestId(self.next_id);
        self.next_id += 1;
        self.queue.push((id, task));
        id
    }

    pub fn cancel(&mut self, id: FrameRequestId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|(queued, _)| *queued != id);
        self.queue.len() != before
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of frames started so far.
    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    /// Starts a frame and hands back the tasks queued before it.
    pub fn begin_frame(&mut self) -> Vec<T> {
        self.frame += 1;
        std::mem::take(&mut self.queue)
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// The "pending" flag that collapses many raw events into one frame task.
///
/// ```
/// use pagefx::frame::{AnimationFrames, FrameGate};
///
/// let mut frames = AnimationFrames::new();
/// let mut gate = FrameGate::default();
/// for _ in 0..5 {
///     gate.schedule(&mut frames, "navbar");
/// }
/// assert_eq!(frames.begin_frame(), vec!["navbar"]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Requests `task` unless a request is already outstanding.
    /// Returns true when a new frame request was made.
    pub fn schedule<T>(&mut self, frames: &mut AnimationFrames<T>, task: T) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        frames.request(task);
        true
    }

    /// Called from the frame callback before doing the work.
    pub fn release(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

use std::time::Duration;

/// Host services the engine needs to pace its animation.
///
/// All calls happen on the host's UI thread. When a scheduled frame fires,
/// the host calls [`ChartEngine::on_frame_tick`](super::ChartEngine::on_frame_tick);
/// when a repaint is requested, the host eventually calls
/// [`ChartEngine::paint`](super::ChartEngine::paint).
pub trait FrameHost {
    /// Arms a one-shot timer that fires after `delay`.
    fn schedule_frame(&mut self, delay: Duration);

    /// Drops a pending frame, if any.
    fn cancel_frame(&mut self);

    /// Asks for the visible surface to be composited again.
    fn request_repaint(&mut self);

    /// Whether a scheduled frame is still armed.
    fn has_pending_frame(&self) -> bool;
}

impl<H: FrameHost + ?Sized> FrameHost for &mut H {
    fn schedule_frame(&mut self, delay: Duration) {
        (**self).schedule_frame(delay);
    }

    fn cancel_frame(&mut self) {
        (**self).cancel_frame();
    }

    fn request_repaint(&mut self) {
        (**self).request_repaint();
    }

    fn has_pending_frame(&self) -> bool {
        (**self).has_pending_frame()
    }
}

/// Headless host that records requests instead of acting on them.
///
/// Drive it by calling `take_pending_frame` and forwarding to the engine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualFrameHost {
    pending: Option<Duration>,
    scheduled_total: usize,
    cancelled_total: usize,
    repaint_requests: usize,
}

impl ManualFrameHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay of the armed frame, if one is pending.
    #[must_use]
    pub fn pending_frame(&self) -> Option<Duration> {
        self.pending
    }

    /// Consumes the armed frame so the caller can fire it.
    pub fn take_pending_frame(&mut self) -> Option<Duration> {
        self.pending.take()
    }

    #[must_use]
    pub fn scheduled_total(&self) -> usize {
        self.scheduled_total
    }

    #[must_use]
    pub fn cancelled_total(&self) -> usize {
        self.cancelled_total
    }

    #[must_use]
    pub fn repaint_requests(&self) -> usize {
        self.repaint_requests
    }
}

impl FrameHost for ManualFrameHost {
    fn schedule_frame(&mut self, delay: Duration) {
        self.pending = Some(delay);
        self.scheduled_total += 1;
    }

    fn cancel_frame(&mut self) {
        if self.pending.take().is_some() {
            self.cancelled_total += 1;
        }
    }

    fn request_repaint(&mut self) {
        self.repaint_requests += 1;
    }

    fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }
}

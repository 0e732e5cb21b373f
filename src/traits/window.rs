use std::cell::Cell;

/// Asks the host for one more frame
pub trait RefreshScheduler {
    fn request_refresh(&self);
}

impl RefreshScheduler for winit::window::Window {
    fn request_refresh(&self) {
        self.request_redraw();
    }
}

/// Refresh request latch for hosts that drive frames themselves
#[derive(Debug, Default)]
pub struct RefreshFlag {
    requested: Cell<bool>,
}

impl RefreshFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and clear the request
    pub fn take(&self) -> bool {
        self.requested.replace(false)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }
}

impl RefreshScheduler for RefreshFlag {
    fn request_refresh(&self) {
        self.requested.set(true);
    }
}

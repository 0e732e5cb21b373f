use winit::event::WindowEvent;

/// Normalized pointer position. Both axes in [-1, 1]; x grows to the right,
/// y grows upward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub const CENTER: PointerState = PointerState { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    /// Map cursor pixel coordinates inside a `width` x `height` viewport.
    /// Returns `None` when the viewport has no area.
    pub fn from_cursor(cursor_x: f32, cursor_y: f32, width: f32, height: f32) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self::new(
            (cursor_x / width) * 2.0 - 1.0,
            -(cursor_y / height) * 2.0 + 1.0,
        ))
    }
}

/// Tracks the pointer against the current viewport size.
///
/// Single writer (window events), single reader (the frame loop); last write
/// wins.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    state: PointerState,
    /// Viewport size in the same pixel units the cursor is reported in
    viewport: (f32, f32),
    /// Last raw cursor position
    cursor: Option<(f32, f32)>,
}

impl PointerTracker {
    /// Create a tracker for a viewport, with the pointer at the centre
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: PointerState::CENTER,
            viewport: (width as f32, height as f32),
            cursor: None,
        }
    }

    /// Process a winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::Resized(size) => {
                self.on_resize(size.width, size.height);
            }
            _ => {}
        }
    }

    /// Record a cursor move in viewport pixels
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        let (width, height) = self.viewport;
        if let Some(state) = PointerState::from_cursor(x, y, width, height) {
            self.state = state;
            self.cursor = Some((x, y));
        }
    }

    /// Update the viewport size. A zero-area viewport (minimized window) is
    /// recorded, and cursor events are ignored until it has area again.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
    }

    /// Current normalized pointer state
    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Last raw cursor position (if any event has arrived)
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Force a pointer state, bypassing cursor normalization
    pub fn set_state(&mut self, state: PointerState) {
        self.state = state;
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

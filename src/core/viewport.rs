/// Viewport - window size in physical pixels plus the display scale factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in physical pixels
    pub width: u32,
    /// Height in physical pixels
    pub height: u32,
    /// Display scale factor reported by the window system
    pub scale_factor: f64,
    /// Upper bound on the pixel ratio used for the render target
    pub max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
            max_pixel_ratio,
        }
    }

    /// Width over height. Degenerate sizes fall back to 1.0
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Pixel ratio actually rendered at, capped at `max_pixel_ratio`
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(self.max_pixel_ratio).max(f64::EPSILON)
    }

    /// Render target size: logical size times the capped pixel ratio
    pub fn render_size(&self) -> (u32, u32) {
        let scale = if self.scale_factor > 0.0 {
            self.pixel_ratio() / self.scale_factor
        } else {
            1.0
        };
        (
            (self.width as f64 * scale).round() as u32,
            (self.height as f64 * scale).round() as u32,
        )
    }

    /// True when there is nothing to draw into (e.g. minimized window)
    pub fn is_empty(&self) -> bool {
        let (w, h) = self.render_size();
        w == 0 || h == 0
    }

    /// Record a new physical size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

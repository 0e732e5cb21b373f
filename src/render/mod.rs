//! wgpu forward renderer for the scene

mod gpu;
mod overlay;
mod pipelines;
mod renderer;
mod uniforms;

pub use gpu::GpuContext;
pub use overlay::Overlay;
pub use renderer::SceneRenderer;
pub use uniforms::{FrameUniform, ObjectUniform};

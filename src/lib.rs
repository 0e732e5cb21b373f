pub mod animation;
pub mod cli;
pub mod config;
pub mod core;
pub mod geometry;
pub mod loaders;
pub mod math;
pub mod render;
pub mod scene;
pub mod traits;

pub use config::DemoConfig;
pub use crate::core::{advance_frame, CancelToken, RunLoop, Session};

mod color;
mod motion;
mod spherical;

pub use color::{hex_to_linear, hex_to_srgb, scaled_rgba, srgb_to_linear};
pub use motion::{approach, steps_to_within, wrap_step};
pub use spherical::{spherical_to_cartesian, sun_position};

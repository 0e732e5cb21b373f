pub mod asset;
pub mod gltf;

pub use asset::PendingAsset;
pub use self::gltf::{load_actor_template, load_actor_template_slice};

use crate::animation::ActorTemplate;
use std::path::PathBuf;

/// Start loading an actor model in the background
pub fn load_actor_template_async(path: impl Into<PathBuf>) -> PendingAsset<ActorTemplate> {
    let path = path.into();
    PendingAsset::spawn(path.display().to_string(), move || load_actor_template(&path))
}

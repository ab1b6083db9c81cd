use std::sync::{Arc, Mutex};

use crate::{character_map::character_map::VisualRef, customization::color::Rgba};

/// The renderer-facing side of one body-part slot. Drawing meshes and
/// materials happens behind this trait.
pub trait RenderTarget {
    /// Swap the slot's mesh and material
    fn set_visual(&mut self, visual: &VisualRef);

    /// Tint the slot's current material
    fn set_override_color(&mut self, color: Rgba);

    /// Tint currently applied, if any
    fn override_color(&self) -> Option<Rgba>;
}

pub type SharedRenderTarget = Arc<Mutex<dyn RenderTarget + Send>>;

pub fn shared<R: RenderTarget + Send + 'static>(target: R) -> SharedRenderTarget {
    Arc::new(Mutex::new(target))
}

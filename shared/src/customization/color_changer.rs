use log::warn;

use crate::{
    customization::{color::Rgba, render_target::SharedRenderTarget},
    world::{
        error::PropertyError,
        replicated_property::{ListenerKey, ReplicatedProperty, SetOutcome},
    },
};

/// Replicates the override color of one slot
pub struct ColorChanger {
    property: ReplicatedProperty<Rgba>,
    target: SharedRenderTarget,
    listener: ListenerKey,
}

impl ColorChanger {
    pub fn new(target: SharedRenderTarget) -> Self {
        let property = ReplicatedProperty::new();
        let listener = {
            let target = target.clone();
            property.on_change(move |_old: &Rgba, new: &Rgba| apply_color(&target, *new))
        };

        Self {
            property,
            target,
            listener,
        }
    }

    pub fn property(&self) -> &ReplicatedProperty<Rgba> {
        &self.property
    }

    pub fn current_color(&self) -> Option<Rgba> {
        self.property
            .try_get()
            .ok()
            .filter(|color| *color != Rgba::default())
    }

    pub fn start(&self) {
        if let Some(color) = self.current_color() {
            apply_color(&self.target, color);
        }
    }

    pub fn change_color(&self, color: Rgba) -> Result<SetOutcome, PropertyError> {
        self.property.set(color)
    }
}

impl Drop for ColorChanger {
    fn drop(&mut self) {
        self.property.remove_listener(self.listener);
    }
}

fn apply_color(target: &SharedRenderTarget, color: Rgba) {
    match target.lock() {
        Ok(mut target) => target.set_override_color(color),
        Err(_) => warn!("Render target is poisoned, color {:?} not applied", color),
    }
}

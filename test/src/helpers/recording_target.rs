use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use outfit_shared::{
    CharacterMapCatalog, CharacterMapType, RenderTarget, Rgba, SharedRenderTarget, SlotBindings,
    VisualRef,
};

/// Render target that remembers what it was last told to show
#[derive(Default)]
pub struct RecordingTarget {
    pub visual: Option<VisualRef>,
    pub color: Option<Rgba>,
    pub visual_changes: usize,
}

impl RenderTarget for RecordingTarget {
    fn set_visual(&mut self, visual: &VisualRef) {
        self.visual = Some(visual.clone());
        self.visual_changes += 1;
    }

    fn set_override_color(&mut self, color: Rgba) {
        self.color = Some(color);
    }

    fn override_color(&self) -> Option<Rgba> {
        self.color
    }
}

impl RecordingTarget {
    pub fn mesh(&self) -> Option<&str> {
        self.visual.as_ref().and_then(|visual| visual.mesh.as_deref())
    }
}

/// One recording target per slot of a player
#[derive(Clone)]
pub struct RecordingTargets {
    targets: BTreeMap<CharacterMapType, Arc<Mutex<RecordingTarget>>>,
}

impl RecordingTargets {
    pub fn new() -> Self {
        Self {
            targets: CharacterMapType::slots()
                .map(|map_type| (map_type, Arc::new(Mutex::new(RecordingTarget::default()))))
                .collect(),
        }
    }

    pub fn slot_bindings(&self, catalog: &Arc<CharacterMapCatalog>) -> SlotBindings {
        SlotBindings::from_targets(
            catalog,
            self.targets.iter().map(|(map_type, target)| {
                let shared: SharedRenderTarget = target.clone();
                (*map_type, shared)
            }),
        )
    }

    pub fn get(&self, map_type: CharacterMapType) -> MutexGuard<'_, RecordingTarget> {
        self.targets[&map_type].lock().unwrap()
    }

    pub fn mesh(&self, map_type: CharacterMapType) -> Option<String> {
        self.get(map_type).mesh().map(str::to_string)
    }

    pub fn color(&self, map_type: CharacterMapType) -> Option<Rgba> {
        self.get(map_type).color
    }
}

impl Default for RecordingTargets {
    fn default() -> Self {
        Self::new()
    }
}

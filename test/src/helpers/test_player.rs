use std::{path::Path, sync::Arc};

use outfit_shared::{
    CharacterMapCatalog, ColorPalette, Player, PlayerContext, PlayerSetup, SaveConfig,
};

use crate::helpers::recording_target::RecordingTargets;

/// A player entity together with the targets its slots render into
pub struct TestPlayer {
    pub player: Player,
    pub targets: RecordingTargets,
}

impl TestPlayer {
    pub fn spawn(
        context: &PlayerContext<'_>,
        catalog: &Arc<CharacterMapCatalog>,
        save_directory: &Path,
    ) -> Self {
        let targets = RecordingTargets::new();
        let player = Player::spawn(
            context,
            PlayerSetup {
                catalog: catalog.clone(),
                slots: targets.slot_bindings(catalog),
                save_config: SaveConfig::in_directory(save_directory),
                palette: ColorPalette::default(),
            },
        );
        Self { player, targets }
    }
}

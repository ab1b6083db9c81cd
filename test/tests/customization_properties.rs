use std::sync::Arc;

use proptest::prelude::*;

use outfit_shared::{
    CharacterMapCatalog, CharacterMapType, SaveConfig, SaveStore, STARTING_CURRENCY,
};
use outfit_test::{
    exchange_packets, test_catalog_source, TestClient, TestServer, HAIR_V2, HAIR_V3, TORSO_V2,
};

#[derive(Clone, Debug)]
enum Op {
    Buy(usize),
    Equip(usize),
    Color(usize, u32),
}

const MAPS: [(&str, CharacterMapType); 6] = [
    ("CharacterMap_Hair_V1", CharacterMapType::Hair),
    (HAIR_V2, CharacterMapType::Hair),
    (HAIR_V3, CharacterMapType::Hair),
    ("CharacterMap_Torso_V1", CharacterMapType::Torso),
    (TORSO_V2, CharacterMapType::Torso),
    ("CharacterMap_Unknown", CharacterMapType::Eyes),
];

const COLOR_SLOTS: [CharacterMapType; 3] = [
    CharacterMapType::Hair,
    CharacterMapType::Torso,
    CharacterMapType::None,
];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..MAPS.len()).prop_map(Op::Buy),
        (0..MAPS.len()).prop_map(Op::Equip),
        ((0..COLOR_SLOTS.len()), 0u32..10).prop_map(|(slot, index)| Op::Color(slot, index)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_inventory_ops_keep_save_consistent(ops in prop::collection::vec(op_strategy(), 1..12)) {
        let mut server = TestServer::new();
        let mut client = TestClient::new();
        server.connect(&mut client);
        let host_entity = server.spawn_player(None);
        exchange_packets(&mut server, &mut [&mut client]);

        let catalog = Arc::new(CharacterMapCatalog::new());
        catalog.load_all(&test_catalog_source());

        for op in ops {
            let inventory = server
                .player_mut(&host_entity)
                .player
                .inventory_mut()
                .unwrap();
            let _ = match op {
                Op::Buy(index) => inventory.buy(MAPS[index].0, MAPS[index].1).map(|_| ()),
                Op::Equip(index) => inventory.equip(MAPS[index].0, MAPS[index].1).map(|_| ()),
                Op::Color(slot, index) => inventory.select_color(COLOR_SLOTS[slot], index).map(|_| ()),
            };
        }
        exchange_packets(&mut server, &mut [&mut client]);

        let host = server.player(&host_entity);
        let data = host.player.inventory().unwrap().store().data().clone();

        // currency accounts for exactly what was bought
        let spent: u32 = data
            .unlocked_character_maps
            .iter()
            .filter_map(|record| catalog.lookup(&record.name))
            .map(|character_map| character_map.price)
            .sum();
        prop_assert_eq!(data.currency + spent, STARTING_CURRENCY);

        // one equipped map per slot, always an unlocked one
        for map_type in CharacterMapType::slots() {
            let equipped: Vec<_> = data
                .current_character_maps
                .iter()
                .filter(|record| record.map_type == map_type)
                .collect();
            prop_assert_eq!(equipped.len(), 1);
            prop_assert!(data.is_record_unlocked(equipped[0]));

            // the remote mirror shows what the save has equipped
            let visual = &catalog.lookup(&equipped[0].name).unwrap().visual;
            prop_assert_eq!(
                client.player(&host_entity).targets.mesh(map_type),
                visual.mesh.clone()
            );
        }

        // what was persisted is what is held in memory
        let reloaded = SaveStore::open(
            SaveConfig::in_directory(server.save_directory()),
            catalog.clone(),
        );
        prop_assert_eq!(reloaded.data(), &data);
    }
}

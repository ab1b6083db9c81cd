use outfit_shared::{CharacterMapType, ColorPalette, Rgba, DEFAULT_CHARACTER_MAPS};
use outfit_test::{
    exchange_packets, exchange_packets_n_times, init_logging, TestClient, TestServer, HAIR_V2,
    HAIR_V2_PRICE, TORSO_V2,
};

fn connected_owner() -> (TestServer, TestClient, outfit_shared::EntityKey) {
    init_logging();
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);
    let entity = server.spawn_player(Some(user_key));
    exchange_packets(&mut server, &mut [&mut client]);
    (server, client, entity)
}

#[test]
fn test_owned_player_converges_on_both_peers() {
    let (server, client, entity) = connected_owner();

    let owned = client.owned_player().expect("client should own its player");
    assert_eq!(owned.player.entity(), entity);
    let remote = server.player(&entity);
    assert!(!remote.player.is_owner());

    for (name, map_type) in DEFAULT_CHARACTER_MAPS {
        assert_eq!(owned.targets.mesh(map_type).as_deref(), Some(name));
        assert_eq!(remote.targets.mesh(map_type).as_deref(), Some(name));
        assert_eq!(owned.targets.color(map_type), Some(Rgba::WHITE));
        assert_eq!(remote.targets.color(map_type), Some(Rgba::WHITE));
    }
    assert!(client.errors.is_empty());
}

#[test]
fn test_client_change_waits_for_server_echo() {
    let (mut server, mut client, entity) = connected_owner();

    let owned = client.owned_player_mut().unwrap();
    owned
        .player
        .inventory_mut()
        .unwrap()
        .buy(HAIR_V2, CharacterMapType::Hair)
        .unwrap();

    // the save changed at once, the mirror did not
    assert_eq!(
        client.owned_player().unwrap().player.inventory().unwrap().currency(),
        100_000 - HAIR_V2_PRICE
    );
    assert_eq!(
        client.owned_player().unwrap().targets.mesh(CharacterMapType::Hair).as_deref(),
        Some("CharacterMap_Hair_V1")
    );

    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(
        server.player(&entity).targets.mesh(CharacterMapType::Hair).as_deref(),
        Some("hair_v2")
    );
    assert_eq!(
        client.owned_player().unwrap().targets.mesh(CharacterMapType::Hair).as_deref(),
        Some("hair_v2")
    );
}

#[test]
fn test_other_clients_see_changes() {
    init_logging();
    let mut server = TestServer::new();
    let mut alice = TestClient::new();
    let mut bob = TestClient::new();
    let alice_key = server.connect(&mut alice);
    let bob_key = server.connect(&mut bob);
    let alice_entity = server.spawn_player(Some(alice_key));
    let bob_entity = server.spawn_player(Some(bob_key));
    exchange_packets(&mut server, &mut [&mut alice, &mut bob]);

    assert_eq!(alice.players.len(), 2);
    assert_eq!(bob.players.len(), 2);
    assert!(!bob.player(&alice_entity).player.is_owner());
    assert!(!alice.player(&bob_entity).player.is_owner());

    let red = ColorPalette::default().get(2).unwrap();
    let inventory = alice.owned_player_mut().unwrap().player.inventory_mut().unwrap();
    inventory.buy(TORSO_V2, CharacterMapType::Torso).unwrap();
    inventory.select_color(CharacterMapType::Torso, 2).unwrap();
    exchange_packets(&mut server, &mut [&mut alice, &mut bob]);

    let seen_by_bob = &bob.player(&alice_entity).targets;
    assert_eq!(seen_by_bob.mesh(CharacterMapType::Torso).as_deref(), Some("torso_v2"));
    assert_eq!(seen_by_bob.color(CharacterMapType::Torso), Some(red));
    // bob's own player is untouched
    assert_eq!(
        bob.player(&bob_entity).targets.mesh(CharacterMapType::Torso).as_deref(),
        Some("CharacterMap_Torso_V1")
    );
}

#[test]
fn test_host_owned_player_replicates_to_clients() {
    init_logging();
    let mut server = TestServer::new();
    let host_entity = server.spawn_player(None);
    assert!(server.player(&host_entity).player.is_owner());

    let mut client = TestClient::new();
    server.connect(&mut client);
    exchange_packets(&mut server, &mut [&mut client]);

    assert!(client.owned_player().is_none());
    assert_eq!(
        client.player(&host_entity).targets.mesh(CharacterMapType::Hair).as_deref(),
        Some("CharacterMap_Hair_V1")
    );

    server
        .player_mut(&host_entity)
        .player
        .inventory_mut()
        .unwrap()
        .buy(HAIR_V2, CharacterMapType::Hair)
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(
        client.player(&host_entity).targets.mesh(CharacterMapType::Hair).as_deref(),
        Some("hair_v2")
    );
}

#[test]
fn test_late_joiner_receives_snapshot() {
    let (mut server, mut alice, alice_entity) = connected_owner();
    alice
        .owned_player_mut()
        .unwrap()
        .player
        .inventory_mut()
        .unwrap()
        .buy(HAIR_V2, CharacterMapType::Hair)
        .unwrap();
    exchange_packets(&mut server, &mut [&mut alice]);

    let mut bob = TestClient::new();
    server.connect(&mut bob);
    bob.receive_all();

    let seen_by_bob = &bob.player(&alice_entity).targets;
    assert_eq!(seen_by_bob.mesh(CharacterMapType::Hair).as_deref(), Some("hair_v2"));
    assert_eq!(seen_by_bob.color(CharacterMapType::Hair), Some(Rgba::WHITE));
    assert_eq!(bob.client.registry().waiting_updates(), 0);
    assert!(bob.errors.is_empty());
}

#[test]
fn test_repeated_exchanges_are_quiet() {
    let (mut server, mut client, entity) = connected_owner();
    let changes = client
        .player(&entity)
        .targets
        .get(CharacterMapType::Hair)
        .visual_changes;

    exchange_packets_n_times(&mut server, &mut [&mut client], 3);

    assert_eq!(
        client
            .player(&entity)
            .targets
            .get(CharacterMapType::Hair)
            .visual_changes,
        changes
    );
}

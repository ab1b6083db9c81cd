use outfit_server::{
    DisconnectEvent, ErrorEvent, OutfitServerError, RequestEvent, ServerConfig,
};
use outfit_shared::{
    write_packets, CharacterMapType, MessageError, PropertyError, PropertyKey, RegistryError,
    ReplicationMessage, Rgba, SetOutcome, TransportError, STARTING_CURRENCY,
};
use outfit_test::{exchange_packets, init_logging, TestClient, TestServer, HAIR_V2, HAIR_V2_PRICE};

fn server_errors(server: &mut TestServer) -> Vec<OutfitServerError> {
    server
        .take_events()
        .into_iter()
        .flat_map(|mut events| events.read::<ErrorEvent>())
        .collect()
}

#[test]
fn test_fresh_install_purchase_survives_reconnect() {
    init_logging();
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);
    server.spawn_player(Some(user_key));
    exchange_packets(&mut server, &mut [&mut client]);

    let inventory = client.owned_player_mut().unwrap().player.inventory_mut().unwrap();
    assert_eq!(inventory.currency(), STARTING_CURRENCY);
    inventory.buy(HAIR_V2, CharacterMapType::Hair).unwrap();
    inventory.select_color(CharacterMapType::Hair, 4).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    client.disconnect();
    server.disconnect(&user_key).unwrap();

    let mut server = TestServer::new();
    let mut client = TestClient::with_save_dir(client.into_save_dir());
    let user_key = server.connect(&mut client);
    let entity = server.spawn_player(Some(user_key));
    exchange_packets(&mut server, &mut [&mut client]);

    let owned = client.owned_player().unwrap();
    let inventory = owned.player.inventory().unwrap();
    assert_eq!(inventory.currency(), STARTING_CURRENCY - HAIR_V2_PRICE);
    assert_eq!(
        inventory.store().selected_map_for(CharacterMapType::Hair),
        Some(HAIR_V2)
    );
    assert_eq!(owned.targets.mesh(CharacterMapType::Hair).as_deref(), Some("hair_v2"));
    let yellow = inventory.palette().get(4).unwrap();
    assert_eq!(
        server.player(&entity).targets.color(CharacterMapType::Hair),
        Some(yellow)
    );
}

#[test]
fn test_disconnect_despawns_owned_players() {
    init_logging();
    let mut server = TestServer::new();
    let mut alice = TestClient::new();
    let mut bob = TestClient::new();
    let alice_key = server.connect(&mut alice);
    server.connect(&mut bob);
    let alice_entity = server.spawn_player(Some(alice_key));
    exchange_packets(&mut server, &mut [&mut alice, &mut bob]);
    assert_eq!(bob.client.registry().len(), 16);

    let despawned = server.disconnect(&alice_key).unwrap();
    assert_eq!(despawned, vec![alice_entity]);
    exchange_packets(&mut server, &mut [&mut bob]);

    assert!(bob.players.is_empty());
    assert!(bob.client.registry().is_empty());
    assert!(!bob.client.gate().is_registered(&alice_entity));
    assert!(server.server.registry().is_empty());

    let disconnections: Vec<_> = server
        .take_events()
        .into_iter()
        .flat_map(|mut events| events.read::<DisconnectEvent>())
        .collect();
    assert_eq!(disconnections, vec![(alice_key, vec![alice_entity])]);
}

#[test]
fn test_disconnect_can_keep_players() {
    init_logging();
    let mut server = TestServer::with_config(ServerConfig {
        despawn_on_disconnect: false,
        ..ServerConfig::default()
    });
    let mut alice = TestClient::new();
    let alice_key = server.connect(&mut alice);
    let alice_entity = server.spawn_player(Some(alice_key));
    exchange_packets(&mut server, &mut [&mut alice]);

    assert!(server.disconnect(&alice_key).unwrap().is_empty());
    assert_eq!(server.server.entity_owner(&alice_entity), None);
    assert!(server.server.gate().is_owner(&alice_entity));
    assert_eq!(server.server.registry().len(), 16);
}

#[test]
fn test_despawn_discards_queued_updates() {
    init_logging();
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    server.connect(&mut client);

    let entity = server.spawn_player(None);
    server.despawn_player(&entity);
    exchange_packets(&mut server, &mut [&mut client]);

    assert!(client.players.is_empty());
    assert_eq!(client.client.registry().waiting_updates(), 0);
    assert!(client.errors.is_empty());
}

#[test]
fn test_requests_are_reported() {
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);
    let entity = server.spawn_player(Some(user_key));
    exchange_packets(&mut server, &mut [&mut client]);

    let requests: Vec<_> = server
        .take_events()
        .into_iter()
        .flat_map(|mut events| events.read::<RequestEvent>())
        .collect();
    assert_eq!(requests.len(), 16);
    assert!(requests
        .iter()
        .all(|(user, key, outcome)| *user == user_key
            && key.entity == entity
            && *outcome == SetOutcome::Applied));
}

#[test]
fn test_malformed_packet_is_reported() {
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);

    server.server.receive(&user_key, &[0x01]);

    assert_eq!(
        server_errors(&mut server),
        vec![OutfitServerError::Message {
            user: user_key,
            source: MessageError::MissingHeader { length: 1 },
        }]
    );
}

#[test]
fn test_client_cannot_send_updates() {
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);
    let entity = server.spawn_player(Some(user_key));
    exchange_packets(&mut server, &mut [&mut client]);
    server.take_events();

    let forged = ReplicationMessage::Update {
        key: PropertyKey::color(entity, CharacterMapType::Hair),
        payload: outfit_shared::encode_value(&Rgba::BLACK),
    };
    for packet in write_packets(&[forged]) {
        server.server.receive(&user_key, &packet);
    }

    assert_eq!(
        server_errors(&mut server),
        vec![OutfitServerError::UnexpectedMessage {
            user: user_key,
            message: "Update",
        }]
    );
    assert_eq!(
        server.player(&entity).targets.color(CharacterMapType::Hair),
        Some(Rgba::WHITE)
    );
}

#[test]
fn test_invalid_map_name_requests_are_refused() {
    init_logging();
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);
    let entity = server.spawn_player(Some(user_key));
    exchange_packets(&mut server, &mut [&mut client]);
    server.take_events();
    let server_mesh = server.player(&entity).targets.mesh(CharacterMapType::Hair);
    let client_mesh = client.player(&entity).targets.mesh(CharacterMapType::Hair);

    let key = PropertyKey::mesh(entity, CharacterMapType::Hair);
    let requests = vec![
        ReplicationMessage::Request {
            key,
            payload: outfit_shared::encode_value(&"x".repeat(200)),
        },
        ReplicationMessage::Request {
            key,
            payload: outfit_shared::encode_value(&String::new()),
        },
    ];
    for packet in write_packets(&requests) {
        server.server.receive(&user_key, &packet);
    }

    assert_eq!(
        server_errors(&mut server),
        vec![
            OutfitServerError::Request {
                user: user_key,
                source: RegistryError::Property(PropertyError::InvalidValue {
                    reason: "map name is longer than 64 bytes",
                }),
            },
            OutfitServerError::Request {
                user: user_key,
                source: RegistryError::Property(PropertyError::InvalidValue {
                    reason: "map name is empty",
                }),
            },
        ]
    );

    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(
        server.player(&entity).targets.mesh(CharacterMapType::Hair),
        server_mesh
    );
    assert_eq!(
        client.player(&entity).targets.mesh(CharacterMapType::Hair),
        client_mesh
    );
    assert!(client.errors.is_empty());
}

#[test]
fn test_request_for_unknown_property_is_reported() {
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);
    let missing = PropertyKey::mesh(outfit_shared::EntityKey::new(42), CharacterMapType::Hair);

    let request = ReplicationMessage::Request {
        key: missing,
        payload: outfit_shared::encode_value(&HAIR_V2.to_string()),
    };
    for packet in write_packets(&[request]) {
        server.server.receive(&user_key, &packet);
    }

    assert_eq!(
        server_errors(&mut server),
        vec![OutfitServerError::Request {
            user: user_key,
            source: RegistryError::NotRegistered { key: missing },
        }]
    );
}

#[test]
fn test_closed_transport_is_reported() {
    let mut server = TestServer::new();
    let mut client = TestClient::new();
    let user_key = server.connect(&mut client);
    server.sever(&user_key);

    server.spawn_player(None);

    let errors = server_errors(&mut server);
    assert!(matches!(
        errors.first(),
        Some(OutfitServerError::Transport {
            user,
            source: TransportError::ConnectionClosed { .. },
        }) if *user == user_key
    ));
}

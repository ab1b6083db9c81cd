use crate::helpers::{test_client::TestClient, test_server::TestServer};

/// One full round trip: server output reaches the clients, their requests
/// reach the server, and the resulting updates come back
pub fn exchange_packets(server: &mut TestServer, clients: &mut [&mut TestClient]) {
    server.flush();
    for client in clients.iter_mut() {
        client.receive_all();
        client.flush();
    }
    server.receive_all();
    server.flush();
    for client in clients.iter_mut() {
        client.receive_all();
    }
}

pub fn exchange_packets_n_times(
    server: &mut TestServer,
    clients: &mut [&mut TestClient],
    times: usize,
) {
    for _ in 0..times {
        exchange_packets(server, clients);
    }
}

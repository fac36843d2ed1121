//! Integration test: build a two-host tunnel config from generated keys,
//! render it, read it back, and check that both ends agree on the keys.

use wg_keys::conf::{parse, render};
use wg_keys::{
    generate_mesh, generate_pre_key, InterfaceSection, KeyPair, MeshOptions, PeerSection,
    WireGuardConfig,
};

fn server_and_client() -> (WireGuardConfig, WireGuardConfig) {
    let server = KeyPair::generate().unwrap();
    let client = KeyPair::generate().unwrap();
    let psk = generate_pre_key().unwrap();

    let server_conf = WireGuardConfig::new(
        InterfaceSection::new(server.private_key().to_base64(), "10.8.0.1/24")
            .with_listen_port(51820),
    )
    .with_peer(
        PeerSection::new(client.public_key().to_base64(), "10.8.0.2/32")
            .with_preshared_key(psk.clone()),
    );

    let client_conf = WireGuardConfig::new(
        InterfaceSection::new(client.private_key().to_base64(), "10.8.0.2/32")
            .with_dns("10.8.0.1")
            .with_mtu(1380),
    )
    .with_peer(
        PeerSection::new(server.public_key().to_base64(), "0.0.0.0/0, ::/0")
            .with_preshared_key(psk)
            .with_endpoint("vpn.example.net:51820")
            .with_persistent_keepalive(25)
            .with_reserved("0, 0, 0"),
    );

    (server_conf, client_conf)
}

#[test]
fn rendered_configs_parse_back_identically() {
    let (server, client) = server_and_client();
    for config in [server, client] {
        let text = render(&config);
        let parsed = parse(&text).expect("rendered config must parse");
        assert_eq!(parsed, config);
        assert!(parsed.validate().is_ok());
    }
}

#[test]
fn peers_reference_each_others_public_keys() {
    let (server, client) = server_and_client();
    let server = parse(&render(&server)).unwrap();
    let client = parse(&render(&client)).unwrap();

    assert_eq!(
        server.peers[0].public_key,
        client.interface_public_key().unwrap().to_base64()
    );
    assert_eq!(
        client.peers[0].public_key,
        server.interface_public_key().unwrap().to_base64()
    );
    assert_eq!(server.peers[0].preshared_key, client.peers[0].preshared_key);
}

#[test]
fn json_roundtrip_through_host_shape() {
    let (_, client) = server_and_client();
    let json = serde_json::to_string(&client).unwrap();
    assert!(json.contains("\"privateKey\""));
    assert!(json.contains("\"allowedIPs\""));
    let back: WireGuardConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, client);
}

#[test]
fn mesh_configs_survive_render_and_parse() {
    let options = MeshOptions::new(4, "10.20.0.1/24, fd20::1/64")
        .with_endpoints(["hub-a.example.org", "", "hub-b.example.org:4500"]);
    let configs = generate_mesh(&options).unwrap();

    let parsed: Vec<WireGuardConfig> = configs
        .iter()
        .map(|c| parse(&render(c)).unwrap())
        .collect();
    assert_eq!(parsed, configs);

    let publics: Vec<String> = parsed
        .iter()
        .map(|c| c.interface_public_key().unwrap().to_base64())
        .collect();

    // Reachable hubs list every other node by its host routes.
    let hub_a = &parsed[0];
    assert_eq!(hub_a.peers.len(), 3);
    assert_eq!(hub_a.peers[2].public_key, publics[3]);
    assert_eq!(hub_a.peers[2].allowed_ips, "10.20.0.4/32, fd20::4/128");

    // Clients only dial the hubs.
    for client in [&parsed[1], &parsed[3]] {
        let keys: Vec<&str> = client.peers.iter().map(|p| p.public_key.as_str()).collect();
        assert_eq!(keys, [publics[0].as_str(), publics[2].as_str()]);
        assert!(client.peers.iter().all(|p| p.persistent_keepalive == Some(25)));
    }
}

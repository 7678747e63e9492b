//! Agent end-to-end tests against a live registry server

mod common;
use common::test_router;

use phone_cluster::{Agent, ClientConfig, Error};

/// Serve the production router on an ephemeral port, returning its base URL
async fn spawn_server() -> String {
    let app = test_router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_agent_full_flow() {
    let server_url = spawn_server().await;
    let config = ClientConfig {
        server_url,
        client_name: "test-agent".to_string(),
    };
    let agent = Agent::new(config).unwrap();

    agent.health_check().await.unwrap();

    let pong = agent.ping().await.unwrap();
    assert_eq!(pong["received"], true);
    assert_eq!(pong["client"], "test-agent");

    let client_id = agent.register().await.unwrap();
    agent.heartbeat(&client_id).await.unwrap();
}

#[tokio::test]
async fn test_agent_heartbeat_for_unknown_id_fails() {
    let server_url = spawn_server().await;
    let config = ClientConfig {
        server_url,
        client_name: "test-agent".to_string(),
    };
    let agent = Agent::new(config).unwrap();

    let err = agent.heartbeat("nope").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_agent_health_check_fails_when_server_down() {
    // Port 1 is never listening
    let config = ClientConfig {
        server_url: "http://127.0.0.1:1".to_string(),
        client_name: "test-agent".to_string(),
    };
    let agent = Agent::new(config).unwrap();

    assert!(agent.health_check().await.is_err());
}

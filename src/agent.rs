//! Cluster agent: the client-side loop
//!
//! Verifies the server is reachable (health check, then ping), registers
//! under the configured name, and heartbeats on a fixed interval.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::{Error, Result};

/// Per-request timeout for all agent calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct RegisterResponse {
    client_id: String,
}

/// A registry client
pub struct Agent {
    config: ClientConfig,
    http: reqwest::Client,
}

impl Agent {
    /// Create an agent for the given configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { config, http })
    }

    /// Check the server's health endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the server is unreachable or unhealthy
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.config.server_url);
        let body: Value = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if body["status"] == "ok" {
            Ok(())
        } else {
            Err(Error::Config(format!("server unhealthy: {body}")))
        }
    }

    /// Send a reachability ping, returning the echoed response
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn ping(&self) -> Result<Value> {
        let url = format!("{}/ping", self.config.server_url);
        let body = self
            .http
            .post(&url)
            .json(&json!({ "client_name": self.config.client_name }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body)
    }

    /// Register this agent with the cluster, returning the assigned id
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or is rejected
    pub async fn register(&self) -> Result<String> {
        let url = format!("{}/v1/register", self.config.server_url);
        let body: RegisterResponse = self
            .http
            .post(&url)
            .json(&json!({ "name": self.config.client_name }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.client_id)
    }

    /// Send a heartbeat for a registered client id
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the id is unknown
    pub async fn heartbeat(&self, client_id: &str) -> Result<()> {
        let url = format!("{}/v1/heartbeat", self.config.server_url);
        self.http
            .post(&url)
            .json(&json!({ "client_id": client_id }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Run the agent loop until interrupted
    ///
    /// Aborts immediately if the server fails the initial health check;
    /// heartbeat failures after registration are logged and retried on
    /// the next tick.
    ///
    /// # Errors
    ///
    /// Returns error if the initial health check, ping, or registration
    /// fails
    pub async fn run(&self, interval: Duration) -> Result<()> {
        self.health_check().await?;
        self.ping().await?;

        let client_id = self.register().await?;
        tracing::info!(
            client_id = %client_id,
            name = %self.config.client_name,
            "registered with cluster"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = self.heartbeat(&client_id).await {
                tracing::warn!(error = %e, "heartbeat failed");
            }
        }
    }
}

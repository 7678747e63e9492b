//! Registry service: the registration/heartbeat protocol on top of the store
//!
//! Request payloads keep their fields as raw JSON values so that shape
//! validation (string-ness, emptiness, capability shape) is enforced here,
//! at the service boundary, before any storage access.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::clock;
use crate::db::{ClientRecord, ClientRepo, DbPool};
use crate::{Error, Result};

/// Registration request body
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub capabilities: Option<Value>,
}

/// Heartbeat request body
#[derive(Debug, Default, Deserialize)]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub client_id: Option<Value>,
}

/// Ping request body
#[derive(Debug, Default, Deserialize)]
pub struct PingRequest {
    #[serde(default)]
    pub client_name: Option<Value>,
}

/// Ping acknowledgment
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub received: bool,
    pub client: Value,
}

/// Stateless reachability probe: echoes the caller-supplied name back
///
/// Performs no validation and touches no storage; lets a client verify
/// the server is reachable before attempting registration.
#[must_use]
pub fn ping(req: PingRequest) -> PingResponse {
    PingResponse {
        received: true,
        client: req.client_name.unwrap_or(Value::Null),
    }
}

/// The client registry
///
/// Validates requests, derives identifiers, and translates between wire
/// payloads and store operations. Holds no record state of its own; the
/// store is the single source of truth.
#[derive(Clone)]
pub struct Registry {
    repo: ClientRepo,
}

impl Registry {
    /// Create a registry backed by the given pool
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self {
            repo: ClientRepo::new(pool),
        }
    }

    /// Register a new client, returning its generated id
    ///
    /// The name must be a JSON string that is non-empty after trimming.
    /// Capabilities must be a JSON object; any other shape is replaced
    /// with an empty object rather than rejected, keeping the contract
    /// permissive for forward compatibility of caller payloads.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a missing/blank/non-string name,
    /// `DuplicateKey` on a generated-id collision (never retried), or a
    /// database error.
    pub fn register(&self, req: RegisterRequest) -> Result<String> {
        let name = req
            .name
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(Error::InvalidArgument("name"))?;

        let capabilities = match req.capabilities {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let client_id = Uuid::new_v4().to_string();
        let now = clock::now_iso();

        let record = ClientRecord {
            client_id: client_id.clone(),
            name: name.to_string(),
            created_at: now.clone(),
            last_seen: now,
            capabilities,
        };
        self.repo.insert(&record)?;

        tracing::info!(client_id = %client_id, name = %record.name, "client registered");
        Ok(client_id)
    }

    /// Record a liveness signal for an existing client
    ///
    /// Updates `last_seen` only; every other field is untouched.
    /// Concurrent heartbeats for the same id are last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a missing/blank/non-string id,
    /// `NotFound` if the id is unknown, or a database error.
    pub fn heartbeat(&self, req: HeartbeatRequest) -> Result<()> {
        let client_id = req
            .client_id
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(Error::InvalidArgument("client_id"))?;

        let now = clock::now_iso();
        if self.repo.touch_last_seen(client_id, &now)? {
            tracing::debug!(client_id = %client_id, "heartbeat");
            Ok(())
        } else {
            Err(Error::NotFound(client_id.to_string()))
        }
    }

    /// Fetch a single client record
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown, or a database error.
    pub fn get_client(&self, client_id: &str) -> Result<ClientRecord> {
        self.repo
            .get(client_id)?
            .ok_or_else(|| Error::NotFound(client_id.to_string()))
    }

    /// List all registered clients, most recently registered first
    ///
    /// # Errors
    ///
    /// Returns a database error if the scan fails.
    pub fn list_clients(&self) -> Result<Vec<ClientRecord>> {
        self.repo.list_all()
    }
}

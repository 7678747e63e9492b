//! Client repository: the durable table behind the registry

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DbPool;
use crate::{Error, Result};

/// A registered client
///
/// `created_at` and `last_seen` are stored as the RFC 3339 strings the
/// clock produced, so retrieval reproduces them byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: String,
    pub name: String,
    pub created_at: String,
    pub last_seen: String,
    pub capabilities: Map<String, Value>,
}

/// Client repository
#[derive(Clone)]
pub struct ClientRepo {
    pool: DbPool,
}

impl ClientRepo {
    /// Create a new client repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new client record
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if `client_id` already exists, or a database
    /// error if the storage medium fails.
    pub fn insert(&self, record: &ClientRecord) -> Result<()> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let capabilities = serde_json::to_string(&record.capabilities)?;

        match conn.execute(
            "INSERT INTO clients (client_id, name, created_at, last_seen, capabilities)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.client_id,
                record.name,
                record.created_at,
                record.last_seen,
                capabilities
            ],
        ) {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::DuplicateKey(record.client_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a client by id (returns None if not found)
    ///
    /// # Errors
    ///
    /// Returns error if the database operation fails
    pub fn get(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let record = conn
            .query_row(
                "SELECT client_id, name, created_at, last_seen, capabilities
                 FROM clients WHERE client_id = ?1",
                [client_id],
                row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    /// List all clients, most recently registered first
    ///
    /// Snapshot at call time; no pagination.
    ///
    /// # Errors
    ///
    /// Returns error if the database operation fails
    pub fn list_all(&self) -> Result<Vec<ClientRecord>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn.prepare(
            "SELECT client_id, name, created_at, last_seen, capabilities
             FROM clients ORDER BY created_at DESC",
        )?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Update `last_seen` for an existing client
    ///
    /// Returns whether a row was updated, so the caller can distinguish
    /// "updated" from "no such client" in a single round trip.
    ///
    /// # Errors
    ///
    /// Returns error if the database operation fails
    pub fn touch_last_seen(&self, client_id: &str, timestamp: &str) -> Result<bool> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let updated = conn.execute(
            "UPDATE clients SET last_seen = ?1 WHERE client_id = ?2",
            params![timestamp, client_id],
        )?;

        Ok(updated > 0)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRecord> {
    let capabilities: String = row.get(4)?;
    let capabilities = serde_json::from_str(&capabilities).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ClientRecord {
        client_id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        last_seen: row.get(3)?,
        capabilities,
    })
}

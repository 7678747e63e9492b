//! Phone Cluster - a minimal fleet registry
//!
//! A server that lets distributed client processes (phones in a cluster)
//! register themselves, report liveness via heartbeats, and be enumerated
//! by an operator or controller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Transport                   │
//! │        axum HTTP/JSON endpoint layer         │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────┐
//! │              Registry Service                │
//! │   validation  │  id generation  │  protocol  │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────┐
//! │                   Store                      │
//! │        SQLite clients table (pooled)         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Records persist indefinitely; staleness is a read-time interpretation
//! left to callers of `last_seen`.

pub mod agent;
pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod registry;

pub use agent::Agent;
pub use config::{ClientConfig, ServerConfig};
pub use db::{ClientRecord, DbConn, DbPool};
pub use error::{Error, Result};
pub use registry::Registry;

//! Shared test utilities

use std::sync::Arc;

use phone_cluster::api::{self, ApiState};
use phone_cluster::{db, DbPool};

/// Set up an in-memory test database
#[must_use]
pub fn setup_test_db() -> DbPool {
    db::init_memory().expect("failed to init test db")
}

/// Build the production router over an in-memory database
#[must_use]
pub fn test_router() -> axum::Router {
    api::router(Arc::new(ApiState::new(setup_test_db())))
}

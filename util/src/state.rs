//! Application state container shared across Axum route handlers and services.
//!
//! Holds the database connection pool. Handlers receive it through Axum's
//! `State<T>` extractor; all coordination between requests happens in the store.

use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    /// Creates a new `AppState` around a SeaORM connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

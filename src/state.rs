use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;

/// Shared service state. Every store, lookup and role operation runs while
/// holding `db`, which makes each request a single serializable unit.
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
        }
    }

    /// Locks the connection. A request that panicked while holding it only
    /// fails itself: any open transaction was rolled back when it was
    /// dropped, so the connection is taken back and the poison cleared.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        match self.db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("recovering database connection after a panicked request");
                let guard = poisoned.into_inner();
                self.db.clear_poison();
                guard
            }
        }
    }
}

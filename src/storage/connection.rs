//! Lazily opened SQLite connection
//!
//! The provider owns at most one connection. It is opened on first use,
//! configured (foreign keys, SQL helper functions) and reused until
//! [`ConnectionProvider::disconnect`] drops it; the next call to
//! [`ConnectionProvider::connect`] opens a fresh one.

use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;

use crate::Result;
use crate::config::DatabaseConfig;
use crate::salary::comparable_salary;

pub struct ConnectionProvider {
    config: DatabaseConfig,
    conn: Option<Connection>,
}

impl ConnectionProvider {
    /// Create a provider without touching the database
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config, conn: None }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Return the cached connection, opening it first if needed
    pub fn connect(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => open_connection(&self.config)?,
        };
        Ok(self.conn.insert(conn))
    }

    /// Close the cached connection. Calling this when already closed is a no-op.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                tracing::warn!("Error while closing database connection: {}", e);
            } else {
                tracing::debug!("Closed connection to {}", self.config);
            }
        }
    }
}

impl Drop for ConnectionProvider {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn open_connection(config: &DatabaseConfig) -> Result<Connection> {
    let conn = if config.is_in_memory() {
        Connection::open_in_memory()?
    } else {
        Connection::open(&config.path)?
    };

    conn.pragma_update(None, "foreign_keys", true)?;
    register_functions(&conn)?;

    tracing::debug!("Opened connection to {}", config);
    Ok(conn)
}

/// Install the Rust helpers queries rely on.
///
/// - `comparable_salary(from, to)`: see [`crate::salary::comparable_salary`]
/// - `casefold(text)`: Unicode lowercase; SQLite's own `lower()` is ASCII-only
fn register_functions(conn: &Connection) -> Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("comparable_salary", 2, flags, |ctx| {
        let from: Option<i64> = ctx.get(0)?;
        let to: Option<i64> = ctx.get(1)?;
        Ok(comparable_salary(from, to))
    })?;

    conn.create_scalar_function("casefold", 1, flags, |ctx| {
        let text: Option<String> = ctx.get(0)?;
        Ok(text.map(|t| t.to_lowercase()))
    })?;

    Ok(())
}

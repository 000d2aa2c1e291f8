use crate::config::DatabaseConfig;
use crate::error::RegistryError;
use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use tracing::{debug, error, warn};

/// Opens one SQLite connection per unit of work.
///
/// There is no pool: every call to [`ConnectionManager::scoped`] connects, runs the
/// closure, and closes the connection before returning, on success and on error alike.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    options: SqliteConnectOptions,
}

impl ConnectionManager {
    pub fn new(cfg: &DatabaseConfig) -> Result<Self, RegistryError> {
        let url = cfg.url.trim();
        let driver = url.split_once(':').map(|(scheme, _)| scheme).unwrap_or(url);
        if !driver.eq_ignore_ascii_case("sqlite") {
            return Err(RegistryError::Config(format!(
                "unsupported database driver `{driver}`; expected a sqlite: URL"
            )));
        }
        // A fresh connection to an in-memory database is a fresh, empty database.
        if url.contains(":memory:") || url.contains("mode=memory") {
            return Err(RegistryError::Config(
                "in-memory SQLite is not supported; configure a database file".to_string(),
            ));
        }

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(cfg.create_if_missing);
        Ok(Self { options })
    }

    /// Run `f` against a freshly opened connection, then close it.
    ///
    /// `op` names the operation in logs. A connect failure is returned as
    /// [`RegistryError::Database`] without retrying. If `f` panics the connection is
    /// dropped, which releases the underlying handle.
    pub async fn scoped<T, F>(&self, op: &'static str, f: F) -> Result<T, RegistryError>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, RegistryError>>,
    {
        let mut conn = self.options.connect().await.inspect_err(|e| {
            error!(op, error = %e, "failed to open database connection");
        })?;
        debug!(op, "database connection established");

        let result = f(&mut conn).await;

        match conn.close().await {
            Ok(()) => debug!(op, "database connection closed"),
            Err(e) => warn!(op, error = %e, "database connection did not close cleanly"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir) -> DatabaseConfig {
        DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("conn.sqlite").display()),
            create_if_missing: true,
        }
    }

    #[test]
    fn rejects_other_drivers() {
        let cfg = DatabaseConfig {
            url: "postgres://localhost/banks".to_string(),
            create_if_missing: true,
        };
        assert!(matches!(
            ConnectionManager::new(&cfg),
            Err(RegistryError::Config(_))
        ));
    }

    #[test]
    fn rejects_in_memory_database() {
        let cfg = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            create_if_missing: true,
        };
        assert!(matches!(
            ConnectionManager::new(&cfg),
            Err(RegistryError::Config(_))
        ));
    }

    #[tokio::test]
    async fn state_persists_across_scoped_connections() {
        let dir = TempDir::new().expect("tempdir");
        let manager = ConnectionManager::new(&file_config(&dir)).expect("manager");

        manager
            .scoped("create", |conn| {
                Box::pin(async move {
                    sqlx::query("CREATE TABLE t (v INTEGER NOT NULL)")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("INSERT INTO t (v) VALUES (?)")
                        .bind(41_i64)
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .expect("first unit of work");

        let v: i64 = manager
            .scoped("read", |conn| {
                Box::pin(async move {
                    let row: (i64,) = sqlx::query_as("SELECT v + 1 FROM t")
                        .fetch_one(&mut *conn)
                        .await?;
                    Ok(row.0)
                })
            })
            .await
            .expect("second unit of work");
        assert_eq!(v, 42);
    }

    #[tokio::test]
    async fn error_inside_unit_of_work_is_returned_and_manager_stays_usable() {
        let dir = TempDir::new().expect("tempdir");
        let manager = ConnectionManager::new(&file_config(&dir)).expect("manager");

        let err = manager
            .scoped("broken", |conn| {
                Box::pin(async move {
                    sqlx::query("SELECT * FROM missing_table")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .expect_err("query against a missing table should fail");
        assert!(matches!(err, RegistryError::Database(_)));

        let one: i64 = manager
            .scoped("after", |conn| {
                Box::pin(async move {
                    let row: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&mut *conn).await?;
                    Ok(row.0)
                })
            })
            .await
            .expect("manager usable after a failed unit of work");
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn connect_failure_surfaces_as_database_error() {
        let dir = TempDir::new().expect("tempdir");
        let cfg = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("absent.sqlite").display()),
            create_if_missing: false,
        };
        let manager = ConnectionManager::new(&cfg).expect("manager");
        let err = manager
            .scoped("open", |_conn| Box::pin(async move { Ok(()) }))
            .await
            .expect_err("opening a missing file without create_if_missing should fail");
        assert!(matches!(err, RegistryError::Database(_)));
    }
}

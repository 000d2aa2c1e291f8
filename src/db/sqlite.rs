use crate::db::connection::ConnectionManager;
use crate::db::models::{Bank, BankInput};
use crate::db::schema::SQLITE_INIT;
use crate::error::RegistryError;
use sqlx::sqlite::SqliteConnection;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct BankStorage {
    connections: ConnectionManager,
}

impl BankStorage {
    pub fn new(connections: ConnectionManager) -> Self {
        Self { connections }
    }

    /// Initialize the schema by executing the bundled DDL. Safe to run on every start.
    pub async fn init_schema(&self) -> Result<(), RegistryError> {
        self.connections
            .scoped("init_schema", |conn| {
                Box::pin(async move {
                    // sqlx::query runs one statement at a time
                    for stmt in SQLITE_INIT.split(';') {
                        let s = stmt.trim();
                        if s.is_empty() {
                            continue;
                        }
                        sqlx::query(s).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .await?;
        info!("database schema initialized");
        Ok(())
    }

    /// All banks ordered by name.
    pub async fn list_all(&self) -> Result<Vec<Bank>, RegistryError> {
        let banks = self
            .connections
            .scoped("list_all", |conn| {
                Box::pin(async move {
                    let rows = sqlx::query_as::<_, Bank>(
                        "SELECT id, name, location FROM banks ORDER BY name",
                    )
                    .fetch_all(&mut *conn)
                    .await?;
                    Ok(rows)
                })
            })
            .await?;
        debug!(count = banks.len(), "listed banks");
        Ok(banks)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Bank>, RegistryError> {
        self.connections
            .scoped("get", move |conn| {
                Box::pin(async move { fetch_by_id(conn, id).await })
            })
            .await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, RegistryError> {
        self.connections
            .scoped("exists", move |conn| {
                Box::pin(async move { row_exists(conn, id).await })
            })
            .await
    }

    /// Insert a bank and return it with the id SQLite assigned.
    ///
    /// The id comes from the insert's own result on this connection, so concurrent
    /// inserts on other connections cannot leak into it.
    pub async fn create(&self, input: BankInput) -> Result<Bank, RegistryError> {
        let bank = self
            .connections
            .scoped("create", move |conn| {
                Box::pin(async move {
                    let done = sqlx::query("INSERT INTO banks (name, location) VALUES (?, ?)")
                        .bind(input.name())
                        .bind(input.location())
                        .execute(&mut *conn)
                        .await?;
                    Ok(input.into_bank(done.last_insert_rowid()))
                })
            })
            .await?;
        info!(bank_id = bank.id, name = %bank.name, location = %bank.location, "bank created");
        Ok(bank)
    }

    /// Overwrite name and location. `None` when no bank has this id.
    ///
    /// Concurrent updates to one id are last-writer-wins.
    pub async fn update(&self, id: i64, input: BankInput) -> Result<Option<Bank>, RegistryError> {
        let updated = self
            .connections
            .scoped("update", move |conn| {
                Box::pin(async move {
                    if !row_exists(conn, id).await? {
                        return Ok(None);
                    }
                    let done = sqlx::query("UPDATE banks SET name = ?, location = ? WHERE id = ?")
                        .bind(input.name())
                        .bind(input.location())
                        .bind(id)
                        .execute(&mut *conn)
                        .await?;
                    if done.rows_affected() == 0 {
                        return Ok(None);
                    }
                    Ok(Some(input.into_bank(id)))
                })
            })
            .await?;
        match &updated {
            Some(_) => info!(bank_id = id, "bank updated"),
            None => debug!(bank_id = id, "update skipped; bank not found"),
        }
        Ok(updated)
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, RegistryError> {
        let removed = self
            .connections
            .scoped("delete", move |conn| {
                Box::pin(async move {
                    if !row_exists(conn, id).await? {
                        return Ok(false);
                    }
                    let done = sqlx::query("DELETE FROM banks WHERE id = ?")
                        .bind(id)
                        .execute(&mut *conn)
                        .await?;
                    Ok(done.rows_affected() > 0)
                })
            })
            .await?;
        if removed {
            info!(bank_id = id, "bank deleted");
        } else {
            debug!(bank_id = id, "delete skipped; bank not found");
        }
        Ok(removed)
    }
}

async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Bank>, RegistryError> {
    let bank = sqlx::query_as::<_, Bank>("SELECT id, name, location FROM banks WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(bank)
}

async fn row_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, RegistryError> {
    let hit: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM banks WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(hit.is_some())
}

use migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

use crate::error::DataResult;

const PRAGMAS: [&str; 3] =
    ["PRAGMA foreign_keys=ON", "PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect_and_migrate(
    options: impl Into<ConnectOptions>,
) -> DataResult<DatabaseConnection> {
    let db = Database::connect(options).await?;

    for pragma in PRAGMAS {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }

    Migrator::up(&db, None).await?;
    tracing::debug!("database migrations applied");
    Ok(db)
}

/// Fresh in-memory database with the schema applied.
///
/// Pinned to a single pooled connection: every SQLite in-memory connection
/// is its own database.
#[cfg(test)]
pub(crate) async fn memory() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    connect_and_migrate(options).await.expect("in-memory database")
}

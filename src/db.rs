use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, RuntimeErr,
    SqlxSqliteConnector, Statement, sqlx::sqlite::SqlitePoolOptions,
};
use sea_orm_migration::MigratorTrait;

use crate::error::AppResult;

const SQLITE_PRAGMAS: &[&str] = &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> AppResult<DatabaseConnection> {
    let db = if is_in_memory(database_url) {
        connect_in_memory(database_url).await?
    } else {
        let mut opts = ConnectOptions::new(database_url.to_string());
        opts.max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .sqlx_logging(false);

        let db = Database::connect(opts).await?;
        if db.get_database_backend() == DbBackend::Sqlite {
            for pragma in SQLITE_PRAGMAS {
                db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                    .await?;
            }
        }
        db
    };

    migration::Migrator::up(&db, None).await?;
    tracing::debug!("migrations applied");

    Ok(db)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// An in-memory database lives exactly as long as its one connection, so the
/// pool never recycles it.
async fn connect_in_memory(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .max_lifetime(None)
        .idle_timeout(None)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(|err| DbErr::Conn(RuntimeErr::SqlxError(err)))?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

use crate::DatabaseSettings;
use log::debug;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};
use std::{str::FromStr, time::Duration};

static BIRDS_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/birds");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Connect options for one side of the store.
///
/// File databases get a WAL journal so readers never block the writer, and
/// the read side opens read-only. In-memory databases are shared by name so
/// both pools see the same tables.
fn connect_options(
    settings: &DatabaseSettings,
    access: Access,
) -> Result<SqliteConnectOptions, sqlx::Error> {
    let options = if settings.in_memory {
        SqliteConnectOptions::from_str(&format!(
            "sqlite:file:birdle_{}?mode=memory&cache=shared",
            settings.name
        ))?
    } else {
        let options = SqliteConnectOptions::new().filename(settings.database_path());
        match access {
            Access::Write => options
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            Access::Read => options.read_only(true),
        }
    };

    Ok(options
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(settings.busy_timeout_ms)))
}

async fn open_pool(
    settings: &DatabaseSettings,
    access: Access,
) -> Result<SqlitePool, sqlx::Error> {
    let size = match access {
        Access::Read => settings.readers,
        Access::Write => settings.writers,
    };
    let options = connect_options(settings, access)?;
    debug!("{:?} pool ({}..={}): {:?}", access, size.min, size.max, options);

    SqlitePoolOptions::new()
        .min_connections(size.min)
        .max_connections(size.max)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
        .connect_with(options)
        .await
}

/// Read and write pools over the sightings database
#[derive(Clone, Debug)]
pub struct DBConnection {
    /// File path, or `memory:<name>` for in-memory stores
    pub location: String,
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl DBConnection {
    /// Opens both pools and brings the schema up to date.
    /// The writer opens first so the file exists before the read-only side connects.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let write_pool = open_pool(settings, Access::Write).await?;
        BIRDS_MIGRATOR
            .run(&write_pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        let read_pool = open_pool(settings, Access::Read).await?;

        let location = if settings.in_memory {
            format!("memory:{}", settings.name)
        } else {
            settings.database_path().display().to_string()
        };

        Ok(Self::from_pools(location, read_pool, write_pool))
    }

    pub fn from_pools(location: String, read_pool: SqlitePool, write_pool: SqlitePool) -> Self {
        Self {
            location,
            read_pool,
            write_pool,
        }
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        for pool in [&self.read_pool, &self.write_pool] {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    pub async fn close(self) {
        self.read_pool.close().await;
        self.write_pool.close().await;
    }

    pub fn read(&self) -> &SqlitePool {
        &self.read_pool
    }

    pub fn write(&self) -> &SqlitePool {
        &self.write_pool
    }
}

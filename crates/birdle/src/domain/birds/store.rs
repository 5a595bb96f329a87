use async_trait::async_trait;
use birdle_core::RegionFilter;
use log::debug;
use sqlx::{QueryBuilder, Sqlite};

use crate::{domain::Error, infra::db::DBConnection};

/// Narrowing applied to the set of bird_region records.
/// `None` leaves that dimension unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BirdRegionQuery {
    pub region: Option<String>,
    pub family: Option<String>,
    /// Matches records whose bird name equals any entry. An empty list matches nothing.
    pub bird_names: Option<Vec<String>>,
}

impl BirdRegionQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// Region and family narrowing of a cleaned filter, ignoring its allow-list
    pub fn for_filter(filter: &RegionFilter) -> Self {
        Self {
            region: filter.region_name().map(str::to_string),
            family: filter.family_name().map(str::to_string),
            bird_names: None,
        }
    }

    pub fn with_bird_names(mut self, bird_names: Vec<String>) -> Self {
        self.bird_names = Some(bird_names);
        self
    }
}

/// Read-only view of the bird sightings store
#[async_trait]
pub trait BirdRegionRepository: Send + Sync {
    /// Distinct region names, ascending
    async fn region_names(&self) -> Result<Vec<String>, Error>;
    /// Distinct bird families, ascending
    async fn bird_families(&self) -> Result<Vec<String>, Error>;
    async fn bird_region_exists(&self, query: &BirdRegionQuery) -> Result<bool, Error>;
}

/// Names bound per existence query, well under SQLite's variable limit
const BIRD_NAME_CHUNK: usize = 500;

#[derive(Debug, Clone)]
pub struct BirdStore {
    db_connection: DBConnection,
}

impl BirdStore {
    pub fn new(db_connection: DBConnection) -> Self {
        Self { db_connection }
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        self.db_connection.ping().await
    }

    async fn exists(&self, mut builder: QueryBuilder<'_, Sqlite>) -> Result<bool, Error> {
        debug!("bird_region exists query: {}", builder.sql());

        let found: i64 = builder
            .build_query_scalar()
            .fetch_one(self.db_connection.read())
            .await?;

        Ok(found != 0)
    }
}

#[async_trait]
impl BirdRegionRepository for BirdStore {
    async fn region_names(&self) -> Result<Vec<String>, Error> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT name FROM region ORDER BY name ASC",
        )
        .fetch_all(self.db_connection.read())
        .await?;

        Ok(names)
    }

    async fn bird_families(&self) -> Result<Vec<String>, Error> {
        let families = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT family FROM bird ORDER BY family ASC",
        )
        .fetch_all(self.db_connection.read())
        .await?;

        Ok(families)
    }

    async fn bird_region_exists(&self, query: &BirdRegionQuery) -> Result<bool, Error> {
        let Some(bird_names) = &query.bird_names else {
            return self.exists(build_exists_query(query, None)).await;
        };

        let mut names: Vec<&str> = bird_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();

        for chunk in names.chunks(BIRD_NAME_CHUNK) {
            if self.exists(build_exists_query(query, Some(chunk))).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// `bird_names` narrows with a single `IN` list so long allow-lists stay flat.
/// `Some(&[])` matches nothing.
fn build_exists_query<'q>(
    query: &BirdRegionQuery,
    bird_names: Option<&[&str]>,
) -> QueryBuilder<'q, Sqlite> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT EXISTS (
            SELECT 1
            FROM bird_region
            JOIN bird ON bird.id = bird_region.bird_id
            JOIN region ON region.id = bird_region.region_id
            WHERE 1 = 1",
    );

    if let Some(region) = &query.region {
        builder.push(" AND region.name = ").push_bind(region.clone());
    }

    if let Some(family) = &query.family {
        builder.push(" AND bird.family = ").push_bind(family.clone());
    }

    match bird_names {
        Some([]) => {
            builder.push(" AND 0 = 1");
        }
        Some(names) => {
            builder.push(" AND bird.name IN (");
            let mut in_list = builder.separated(", ");
            for name in names {
                in_list.push_bind(name.to_string());
            }
            builder.push(")");
        }
        None => {}
    }

    builder.push(")");
    builder
}

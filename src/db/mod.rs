pub mod endpoints;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::models::Endpoint;
use crate::store::{EndpointStore, StoreError};

/// Postgres-backed [`EndpointStore`]. Uniqueness of `id` and `path` is enforced
/// by the table's unique indexes.
#[derive(Clone)]
pub struct PgEndpointStore {
    pool: PgPool,
}

impl PgEndpointStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl EndpointStore for PgEndpointStore {
    async fn find_all(&self) -> Result<Vec<Endpoint>, StoreError> {
        endpoints::find_all(&self.pool)
            .await?
            .into_iter()
            .map(Endpoint::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Endpoint, StoreError> {
        endpoints::find_by_id(&self.pool, id)
            .await?
            .ok_or(StoreError::NotFound)?
            .try_into()
    }

    async fn find_by_path(&self, path: &str) -> Result<Endpoint, StoreError> {
        endpoints::find_by_path(&self.pool, path)
            .await?
            .ok_or(StoreError::NotFound)?
            .try_into()
    }

    async fn insert(&self, endpoint: Endpoint) -> Result<Endpoint, StoreError> {
        endpoints::insert(&self.pool, &endpoint).await?.try_into()
    }

    async fn update_by_id(&self, id: Uuid, endpoint: Endpoint) -> Result<Endpoint, StoreError> {
        let (deleted_at, deleted_reason) = endpoint.deletion_columns();
        endpoints::update_live(
            &self.pool,
            id,
            &endpoint.name,
            &endpoint.destination,
            endpoint.updated_at,
            deleted_at,
            deleted_reason,
        )
        .await?
        .ok_or(StoreError::NotFound)?
        .try_into()
    }
}

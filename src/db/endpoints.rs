use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Endpoint, EndpointRow};

pub async fn find_all(pool: &PgPool) -> Result<Vec<EndpointRow>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRow>("SELECT * FROM endpoints ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<EndpointRow>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRow>("SELECT * FROM endpoints WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Matches deleted endpoints too; path uniqueness spans every record ever created.
pub async fn find_by_path(pool: &PgPool, path: &str) -> Result<Option<EndpointRow>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRow>("SELECT * FROM endpoints WHERE path = $1")
        .bind(path)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, endpoint: &Endpoint) -> Result<EndpointRow, sqlx::Error> {
    let (deleted_at, deleted_reason) = endpoint.deletion_columns();
    sqlx::query_as::<_, EndpointRow>(
        "INSERT INTO endpoints
             (id, name, path, destination, created_at, updated_at, deleted_at, deleted_reason)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(endpoint.id)
    .bind(&endpoint.name)
    .bind(&endpoint.path)
    .bind(&endpoint.destination)
    .bind(endpoint.created_at)
    .bind(endpoint.updated_at)
    .bind(deleted_at)
    .bind(deleted_reason)
    .fetch_one(pool)
    .await
}

/// Only live rows are written; `None` means missing or already deleted.
pub async fn update_live(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    destination: &str,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_reason: Option<&str>,
) -> Result<Option<EndpointRow>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRow>(
        "UPDATE endpoints
         SET name = $2, destination = $3, updated_at = $4, deleted_at = $5, deleted_reason = $6
         WHERE id = $1 AND deleted_at IS NULL
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(destination)
    .bind(updated_at)
    .bind(deleted_at)
    .bind(deleted_reason)
    .fetch_optional(pool)
    .await
}

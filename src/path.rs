//! Public path tokens. The store is the only authority on whether a token is free.

use rand::Rng;

use crate::error::AppError;
use crate::store::{EndpointStore, StoreError};

pub const PATH_LEN: usize = 16;

/// Upper bound on candidates drawn for a single allocation.
pub const MAX_DRAWS: usize = 16;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// A random URL- and cookie-safe token. Not checked against the store.
pub fn random_path() -> String {
    let mut rng = rand::rng();
    (0..PATH_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Draw tokens until one is owned by no endpoint, live or deleted.
pub async fn generate_unique_path(store: &dyn EndpointStore) -> Result<String, AppError> {
    generate_with(store, random_path).await
}

pub(crate) async fn generate_with(
    store: &dyn EndpointStore,
    mut draw: impl FnMut() -> String + Send,
) -> Result<String, AppError> {
    for _ in 0..MAX_DRAWS {
        let candidate = draw();
        match store.find_by_path(&candidate).await {
            Ok(_) => tracing::debug!(path = %candidate, "Path already taken, drawing again"),
            Err(StoreError::NotFound) => return Ok(candidate),
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(format!(
        "no free path found after {MAX_DRAWS} draws"
    )))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::id;
    use crate::models::Endpoint;
    use crate::store::MemoryEndpointStore;

    async fn seed(store: &MemoryEndpointStore, path: &str) {
        let endpoint = Endpoint::new(
            id::generate(),
            String::new(),
            path.to_string(),
            "https://example.com/hook".to_string(),
            Utc::now(),
        );
        store.insert(endpoint).await.unwrap();
    }

    #[test]
    fn random_path_uses_url_safe_alphabet() {
        for _ in 0..256 {
            let path = random_path();
            assert_eq!(path.len(), PATH_LEN);
            assert!(path.bytes().all(|b| ALPHABET.contains(&b)), "{path}");
        }
    }

    #[tokio::test]
    async fn never_returns_a_seeded_path() {
        let store = MemoryEndpointStore::new();
        let seeded: Vec<String> = (0..10).map(|i| format!("seeded-path-{i:04}")).collect();
        for path in &seeded {
            seed(&store, path).await;
        }

        let mut script = seeded.clone();
        script.truncate(6);
        script.push("fresh-path-00001".to_string());
        let mut draws = script.into_iter();

        let path = generate_with(&store, move || draws.next().unwrap())
            .await
            .unwrap();
        assert_eq!(path, "fresh-path-00001");

        let taken: HashSet<&String> = seeded.iter().collect();
        for _ in 0..32 {
            let path = generate_unique_path(&store).await.unwrap();
            assert!(!taken.contains(&path));
        }
    }

    #[tokio::test]
    async fn deleted_endpoints_still_own_their_path() {
        let store = MemoryEndpointStore::new();
        seed(&store, "deleted-path-001").await;
        let existing = store.find_by_path("deleted-path-001").await.unwrap();
        let deleted = existing.clone().soft_delete("old".to_string(), Utc::now());
        store.update_by_id(existing.id, deleted).await.unwrap();

        let mut draws = ["deleted-path-001", "new-path-000001"].into_iter();
        let path = generate_with(&store, move || draws.next().unwrap().to_string())
            .await
            .unwrap();
        assert_eq!(path, "new-path-000001");
    }

    #[tokio::test]
    async fn gives_up_after_bounded_draws() {
        let store = MemoryEndpointStore::new();
        seed(&store, "always-the-same0").await;

        let err = generate_with(&store, || "always-the-same0".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    struct BrokenStore;

    #[async_trait]
    impl EndpointStore for BrokenStore {
        async fn find_all(&self) -> Result<Vec<Endpoint>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn find_by_id(&self, _id: Uuid) -> Result<Endpoint, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn find_by_path(&self, _path: &str) -> Result<Endpoint, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn insert(&self, _endpoint: Endpoint) -> Result<Endpoint, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn update_by_id(&self, _id: Uuid, _endpoint: Endpoint) -> Result<Endpoint, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn store_failure_is_propagated_not_retried() {
        let mut calls = 0;
        let err = generate_with(&BrokenStore, || {
            calls += 1;
            random_path()
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(calls, 1);
    }
}

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{EndpointStore, StoreError};
use crate::models::Endpoint;

/// In-process store. The path index's entry API decides which of two racing
/// inserts owns a path.
#[derive(Default)]
pub struct MemoryEndpointStore {
    records: DashMap<Uuid, Endpoint>,
    /// path -> id
    paths: DashMap<String, Uuid>,
}

impl MemoryEndpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EndpointStore for MemoryEndpointStore {
    async fn find_all(&self) -> Result<Vec<Endpoint>, StoreError> {
        let mut all: Vec<Endpoint> = self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|e| e.id);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Endpoint, StoreError> {
        self.records
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_path(&self, path: &str) -> Result<Endpoint, StoreError> {
        let id = self.paths.get(path).map(|r| *r.value()).ok_or(StoreError::NotFound)?;
        self.find_by_id(id).await
    }

    async fn insert(&self, endpoint: Endpoint) -> Result<Endpoint, StoreError> {
        if self.records.contains_key(&endpoint.id) {
            return Err(StoreError::DuplicateKey("id".to_string()));
        }

        match self.paths.entry(endpoint.path.clone()) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey("path".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(endpoint.id);
            }
        }

        self.records.insert(endpoint.id, endpoint.clone());
        Ok(endpoint)
    }

    async fn update_by_id(&self, id: Uuid, endpoint: Endpoint) -> Result<Endpoint, StoreError> {
        let mut record = self.records.get_mut(&id).ok_or(StoreError::NotFound)?;
        if record.is_deleted() {
            return Err(StoreError::NotFound);
        }

        record.name = endpoint.name;
        record.destination = endpoint.destination;
        record.updated_at = endpoint.updated_at;
        record.lifecycle = endpoint.lifecycle;
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::id;

    fn endpoint(path: &str) -> Endpoint {
        Endpoint::new(
            id::generate(),
            String::new(),
            path.to_string(),
            "https://example.com/hook".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_rejects_taken_path() {
        let store = MemoryEndpointStore::new();
        store.insert(endpoint("same-path")).await.unwrap();

        let err = store.insert(endpoint("same-path")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(ref k) if k == "path"));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn racing_inserts_on_one_path_have_a_single_winner() {
        let store = Arc::new(MemoryEndpointStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(endpoint("contested-path00")).await
            }));
        }

        let mut wins = 0;
        let mut collisions = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(StoreError::DuplicateKey(_)) => collisions += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(collisions, 15);
    }

    #[tokio::test]
    async fn update_refuses_deleted_record_and_keeps_path() {
        let store = MemoryEndpointStore::new();
        let created = store.insert(endpoint("keep-my-path")).await.unwrap();

        let mut changed = created.clone();
        changed.path = "other-path".to_string();
        changed.name = "renamed".to_string();
        let updated = store.update_by_id(created.id, changed).await.unwrap();
        assert_eq!(updated.path, "keep-my-path");
        assert_eq!(updated.name, "renamed");

        let deleted = updated.clone().soft_delete("gone".to_string(), Utc::now());
        store.update_by_id(created.id, deleted.clone()).await.unwrap();

        let err = store.update_by_id(created.id, deleted).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn find_all_is_in_creation_order() {
        let store = MemoryEndpointStore::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.insert(endpoint(&format!("path-{i}"))).await.unwrap().id);
        }
        let listed: Vec<Uuid> = store.find_all().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(listed, ids);
    }
}

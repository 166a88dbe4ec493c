//! Endpoint lifecycle: create, read, update, soft-delete, and forward.
//!
//! Every entry point that resolves a single endpoint, by id or by path, goes
//! through [`Endpoint::ensure_live`], so a soft-deleted endpoint is always an
//! [`AppError::EndpointDeleted`] and never a usable result.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::IgnoredAny;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::AppError;
use crate::forward::{ForwardedResponse, Forwarder};
use crate::id;
use crate::models::{Endpoint, EndpointPatch, EndpointView};
use crate::path;
use crate::store::{EndpointStore, StoreError};

/// Inserts retried after losing a path race to a concurrent create.
pub const MAX_INSERT_ATTEMPTS: usize = 4;

pub struct EndpointService {
    store: Arc<dyn EndpointStore>,
    clock: Arc<dyn Clock>,
    forwarder: Forwarder,
}

impl EndpointService {
    pub fn new(store: Arc<dyn EndpointStore>, clock: Arc<dyn Clock>, forwarder: Forwarder) -> Self {
        Self {
            store,
            clock,
            forwarder,
        }
    }

    pub async fn create(
        &self,
        name: Option<String>,
        destination: String,
    ) -> Result<EndpointView, AppError> {
        validate_destination(&destination)?;

        let id = id::generate();
        let name = name.unwrap_or_default();

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let path = path::generate_unique_path(self.store.as_ref()).await?;
            let endpoint = Endpoint::new(id, name.clone(), path, destination.clone(), self.clock.now());

            match self.store.insert(endpoint).await {
                Ok(created) => {
                    tracing::info!(id = %created.id, path = %created.path, "Endpoint created");
                    return created.view();
                }
                Err(StoreError::DuplicateKey(key)) => {
                    tracing::warn!(attempt, %key, "Insert collided, regenerating path");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(format!(
            "could not insert endpoint after {MAX_INSERT_ATTEMPTS} attempts"
        )))
    }

    /// Every endpoint, deleted ones included.
    pub async fn get_all(&self) -> Result<Vec<EndpointView>, AppError> {
        self.store
            .find_all()
            .await?
            .iter()
            .map(Endpoint::view)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<EndpointView, AppError> {
        let id = id::decode(id)?;
        self.live_by_id(id).await?.view()
    }

    pub async fn get_by_path(&self, path: &str) -> Result<EndpointView, AppError> {
        self.live_by_path(path).await?.view()
    }

    pub async fn update(&self, id: &str, patch: EndpointPatch) -> Result<EndpointView, AppError> {
        if let Some(destination) = &patch.destination {
            validate_destination(destination)?;
        }
        let id = id::decode(id)?;

        let current = self.live_by_id(id).await?;
        let updated = self.write(id, current.apply(patch, self.clock.now())).await?;

        tracing::info!(id = %updated.id, "Endpoint updated");
        updated.view()
    }

    /// `Live -> Deleted`. Deleting an already-deleted endpoint fails.
    pub async fn soft_delete(&self, id: &str, reason: String) -> Result<EndpointView, AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::InvalidRequest("reason is required".to_string()));
        }
        let id = id::decode(id)?;

        let current = self.live_by_id(id).await?;
        let deleted = self
            .write(id, current.soft_delete(reason, self.clock.now()))
            .await?;

        tracing::info!(id = %deleted.id, path = %deleted.path, "Endpoint soft-deleted");
        deleted.view()
    }

    /// Relay `body` to the destination of the live endpoint owning `path`.
    /// A non-2xx answer from the destination is a normal result.
    pub async fn forward(&self, path: &str, body: Bytes) -> Result<ForwardedResponse, AppError> {
        let endpoint = self.live_by_path(path).await?;

        // Shape check only; the original bytes are what gets relayed.
        serde_json::from_slice::<HashMap<String, IgnoredAny>>(&body)
            .map_err(|e| AppError::InvalidRequest(format!("body must be a JSON object: {e}")))?;

        let response = self.forwarder.relay(&endpoint.destination, body).await?;
        tracing::info!(
            id = %endpoint.id,
            path = %endpoint.path,
            status = response.status.as_u16(),
            "Payload forwarded"
        );
        Ok(response)
    }

    async fn live_by_id(&self, id: Uuid) -> Result<Endpoint, AppError> {
        self.store.find_by_id(id).await?.ensure_live()
    }

    async fn live_by_path(&self, path: &str) -> Result<Endpoint, AppError> {
        self.store.find_by_path(path).await?.ensure_live()
    }

    async fn write(&self, id: Uuid, endpoint: Endpoint) -> Result<Endpoint, AppError> {
        match self.store.update_by_id(id, endpoint).await {
            Ok(stored) => Ok(stored),
            // The guarded write lost to a concurrent delete; report what is there now.
            Err(StoreError::NotFound) => match self.live_by_id(id).await {
                Ok(_) => Err(AppError::NotFound("endpoint not found".to_string())),
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_destination(destination: &str) -> Result<(), AppError> {
    if destination.trim().is_empty() {
        return Err(AppError::InvalidRequest("destination is required".to_string()));
    }

    let url = reqwest::Url::parse(destination)
        .map_err(|e| AppError::InvalidRequest(format!("destination is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(AppError::InvalidRequest(
            "destination must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(())
}

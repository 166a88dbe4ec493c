use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::extract::{ApiJson, ApiQuery};
use crate::envelope::Envelope;
use crate::error::AppError;
use crate::models::{EndpointPatch, EndpointView};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(alias = "uuid")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEndpoint {
    pub name: Option<String>,
    #[serde(default, alias = "redirect_to")]
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEndpoint {
    #[serde(alias = "uuid")]
    pub id: String,
    pub name: Option<String>,
    #[serde(alias = "redirect_to")]
    pub destination: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEndpoint {
    #[serde(alias = "uuid")]
    pub id: String,
    #[serde(default)]
    pub reason: String,
}

/// All endpoints, or a single one when `?id=` is given.
pub async fn list(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Response, AppError> {
    match query.id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let endpoint = state.endpoints.get_by_id(&id).await?;
            Ok(Envelope::ok("endpoint found.", endpoint).into_response())
        }
        None => {
            let endpoints = state.endpoints.get_all().await?;
            Ok(Envelope::ok("all endpoints.", endpoints).into_response())
        }
    }
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Envelope<EndpointView>, AppError> {
    let endpoint = state.endpoints.get_by_id(&id).await?;
    Ok(Envelope::ok("endpoint found.", endpoint))
}

pub async fn get_by_path(
    State(state): State<SharedState>,
    Path(path): Path<String>,
) -> Result<Envelope<EndpointView>, AppError> {
    let endpoint = state.endpoints.get_by_path(&path).await?;
    Ok(Envelope::ok("endpoint found.", endpoint))
}

pub async fn create(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateEndpoint>,
) -> Result<Envelope<EndpointView>, AppError> {
    let endpoint = state.endpoints.create(req.name, req.destination).await?;
    Ok(Envelope::ok("endpoint created.", endpoint))
}

pub async fn update(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<UpdateEndpoint>,
) -> Result<Envelope<EndpointView>, AppError> {
    let patch = EndpointPatch {
        name: req.name,
        destination: req.destination,
    };
    let endpoint = state.endpoints.update(&req.id, patch).await?;
    Ok(Envelope::ok("endpoint updated.", endpoint))
}

pub async fn delete(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<DeleteEndpoint>,
) -> Result<Envelope<EndpointView>, AppError> {
    let endpoint = state.endpoints.soft_delete(&req.id, req.reason).await?;
    Ok(Envelope::ok("endpoint deleted.", endpoint))
}

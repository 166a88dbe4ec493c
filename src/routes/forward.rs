use axum::extract::{Path, State};

use crate::error::AppError;
use crate::forward::ForwardedResponse;
use crate::routes::extract::ApiBytes;
use crate::state::SharedState;

/// Relay the request body to the endpoint owning `path`. The destination's
/// status and body come back unwrapped.
pub async fn send(
    State(state): State<SharedState>,
    Path(path): Path<String>,
    ApiBytes(body): ApiBytes,
) -> Result<ForwardedResponse, AppError> {
    state.endpoints.forward(&path, body).await
}

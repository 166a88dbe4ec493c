use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::error::AppError;

/// What the destination answered, relayed to the original caller untouched.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for ForwardedResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response.headers_mut().insert(CONTENT_TYPE, content_type);
            }
            None => {
                response.headers_mut().remove(CONTENT_TYPE);
            }
        }
        response
    }
}

/// Synchronous relay of a JSON payload to an endpoint's destination.
/// One attempt per call, bounded by the client timeout. Redirects are not
/// followed, so a 3xx from the destination reaches the caller as is.
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// Post `payload` byte for byte. The caller has already checked it is a JSON object.
    pub async fn relay(&self, destination: &str, payload: Bytes) -> Result<ForwardedResponse, AppError> {
        let resp = self
            .client
            .post(destination)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| AppError::ForwardFailed(format!("request to destination failed: {e}")))?;

        let status = resp.status();
        let content_type = resp.headers().get(CONTENT_TYPE).cloned();
        let body = resp
            .bytes()
            .await
            .map_err(|e| AppError::ForwardFailed(format!("reading destination response failed: {e}")))?;

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}

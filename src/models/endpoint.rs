use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::id;
use crate::store::StoreError;

/// Soft-delete state. `Deleted` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Live,
    Deleted { at: DateTime<Utc>, reason: String },
}

/// A public path token mapped to a private destination URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// Fields an update may change. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPatch {
    pub name: Option<String>,
    pub destination: Option<String>,
}

impl Endpoint {
    pub fn new(
        id: Uuid,
        name: String,
        path: String,
        destination: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            path,
            destination,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Live,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Deleted { .. })
    }

    /// Deleted endpoints are surfaced as an error, never as usable data.
    pub fn ensure_live(self) -> Result<Self, AppError> {
        match self.lifecycle {
            Lifecycle::Live => Ok(self),
            Lifecycle::Deleted { reason, .. } => Err(AppError::EndpointDeleted(reason)),
        }
    }

    pub fn apply(self, patch: EndpointPatch, now: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.unwrap_or(self.name),
            destination: patch.destination.unwrap_or(self.destination),
            updated_at: now,
            ..self
        }
    }

    pub fn soft_delete(self, reason: String, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            lifecycle: Lifecycle::Deleted { at: now, reason },
            ..self
        }
    }

    /// `(deleted_at, deleted_reason)` as persisted: both set or both null.
    pub fn deletion_columns(&self) -> (Option<DateTime<Utc>>, Option<&str>) {
        match &self.lifecycle {
            Lifecycle::Live => (None, None),
            Lifecycle::Deleted { at, reason } => (Some(*at), Some(reason.as_str())),
        }
    }

    pub fn view(&self) -> Result<EndpointView, AppError> {
        let (deleted_at, deleted_reason) = self.deletion_columns();
        Ok(EndpointView {
            id: id::encode(self.id)?,
            name: self.name.clone(),
            path: self.path.clone(),
            destination: self.destination.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at,
            deleted_reason: deleted_reason.map(str::to_string),
        })
    }
}

/// Display form returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointView {
    pub id: String,
    pub name: String,
    pub path: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_reason: Option<String>,
}

/// Row shape of the `endpoints` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EndpointRow {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_reason: Option<String>,
}

impl TryFrom<EndpointRow> for Endpoint {
    type Error = StoreError;

    fn try_from(row: EndpointRow) -> Result<Self, Self::Error> {
        let lifecycle = match (row.deleted_at, row.deleted_reason) {
            (None, None) => Lifecycle::Live,
            (Some(at), Some(reason)) => Lifecycle::Deleted { at, reason },
            _ => {
                return Err(StoreError::Corrupt(format!(
                    "endpoint {} has only one of deleted_at/deleted_reason",
                    row.id
                )));
            }
        };

        Ok(Endpoint {
            id: row.id,
            name: row.name,
            path: row.path,
            destination: row.destination,
            created_at: row.created_at,
            updated_at: row.updated_at,
            lifecycle,
        })
    }
}

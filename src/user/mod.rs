//! User records, their group associations and the derived payload.

mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User as returned by the creation flow. The derived payload is absent at
/// this point, enrichment runs after the response is sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// Lifecycle of the deferred payload fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "enrichment_status", rename_all = "lowercase")]
pub enum EnrichmentStatus {
    Pending,
    Done,
    Failed,
}

/// Read projection of a user with its group names and derived payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    /// Names of every associated group, name-ordered.
    pub group_names: Vec<String>,
    pub derived_payload: Option<serde_json::Value>,
    pub enrichment_status: EnrichmentStatus,
}

impl Profile {
    /// Whether `group_name` is among the user's current groups.
    pub fn member_of(&self, group_name: &str) -> bool {
        self.group_names.iter().any(|name| name == group_name)
    }
}

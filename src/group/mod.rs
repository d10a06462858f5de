//! Group records and the closed set of allowed names.

mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Group as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
}

/// Closed set of allowed group names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Regular,
    Admin,
}

impl GroupKind {
    pub const ALL: [Self; 2] = [Self::Regular, Self::Admin];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Admin => "admin",
        }
    }

    /// Match a raw name against the enumeration.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

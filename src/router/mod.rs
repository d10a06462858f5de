//! HTTP routing layer: body extractor and per-entity handler modules.

pub mod groups;
pub mod users;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::ServerError;

/// JSON body extractor that also runs `validator` rules.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;

        Ok(Self(value))
    }
}

/// Build an [`crate::AppState`] over a test pool, with enrichment pointed
/// at an unroutable address so spawned tasks fail fast and touch nothing.
#[cfg(test)]
pub fn state(pool: sqlx::PgPool) -> crate::AppState {
    use std::sync::Arc;

    use crate::config::{Configuration, Enrichment};

    let config = Configuration {
        enrichment: Enrichment {
            url: "http://127.0.0.1:9/".to_owned(),
            timeout_secs: 1,
            retry: false,
        },
        ..Configuration::default()
    };

    crate::AppState::new(Arc::new(config), pool).expect("cannot build test state")
}

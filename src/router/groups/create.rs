use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, max = 64, message = "Name must be 1 to 64 characters long."))]
    pub name: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
}

/// Handler to create group.
///
/// Name availability is checked before the insert; the unique constraint
/// on the name column covers the race between the two steps.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    state.groups.ensure_name_available(&body.name).await?;
    let group = state.groups.create(&body.name).await?;

    Ok((StatusCode::CREATED, Json(Response { id: group.id })))
}

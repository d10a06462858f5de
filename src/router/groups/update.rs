use axum::Json;
use axum::extract::{Path, State};
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

/// Handler to rename a group.
///
/// Existence, then name availability, then the write; no transaction
/// spans the three steps, the name constraint backstops the middle one.
pub async fn handler(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    state.groups.get(group_id).await?;
    state.groups.ensure_name_available(&body.name).await?;
    let group = state.groups.update(group_id, &body.name).await?;

    Ok(Json(Response { id: group.id }))
}

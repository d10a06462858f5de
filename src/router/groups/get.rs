use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::AppState;
use crate::error::Result;
use crate::group::Group;

/// List every group. An empty store answers with an empty list, not an
/// error.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Group>>> {
    Ok(Json(state.groups.list().await?))
}

/// Handler to fetch one group by identifier.
pub async fn handler(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Group>> {
    Ok(Json(state.groups.get(group_id).await?))
}

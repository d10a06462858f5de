use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::Result;

/// Handler to delete a group.
///
/// Association rows cascade; users that belonged to the group survive
/// without it.
pub async fn handler(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.groups.get(group_id).await?;
    state.groups.delete(group_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

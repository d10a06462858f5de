use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::Profile;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 64, message = "Name must be 1 to 64 characters long."))]
    pub name: String,
    /// Name of a group currently associated with the user. Proves the
    /// caller knows the association; membership itself is never changed.
    #[validate(length(min = 1, message = "Group name must not be empty."))]
    pub group_name: String,
}

/// Handler to rename a user.
pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Valid(body): Valid<Body>,
) -> Result<Json<Profile>> {
    let profile = state.users.get(user_id).await?;
    state.users.assert_member_of(&profile, &body.group_name)?;

    Ok(Json(state.users.update(user_id, &body.name).await?))
}

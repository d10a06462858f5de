use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::error::Result;

/// Handler to delete a user. Association rows cascade, groups survive.
pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.users.get(user_id).await?;
    state.users.delete(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::Method;
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    const ALICE_ID: &str = "0c3b4660-0532-4a91-85b2-67ac96a4030e";
    const REGULAR_ID: &str = "be2a91c4-df99-490d-9061-bc12f50a80b7";

    #[sqlx::test(fixtures("../../../fixtures/groups.sql", "../../../fixtures/users.sql"))]
    async fn test_delete_user_handler(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let path = format!("/user/{ALICE_ID}");
        let response = make_request(app.clone(), Method::DELETE, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = make_request(app.clone(), Method::GET, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The group the user belonged to survives.
        let response = make_request(
            app,
            Method::GET,
            &format!("/group/{REGULAR_ID}"),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[sqlx::test(fixtures("../../../fixtures/groups.sql", "../../../fixtures/users.sql"))]
    async fn test_delete_unknown_user(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let path = format!("/user/{}", uuid::Uuid::new_v4());
        let response = make_request(app.clone(), Method::DELETE, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Nothing was removed.
        let response = make_request(app, Method::GET, "/user", String::default()).await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let users: Vec<user::Profile> = serde_json::from_slice(&body).unwrap();
        assert_eq!(users.len(), 2);
    }
}

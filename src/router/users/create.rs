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
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 64, message = "Name must be 1 to 64 characters long."))]
    pub name: String,
    pub group_id: Uuid,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
}

/// Handler to create user.
///
/// The group is resolved before the user manager runs; the response is
/// produced before the enrichment task touches the record.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    state.groups.get(body.group_id).await?;
    let user = state.users.create(&body.name, body.group_id).await?;

    Ok((StatusCode::CREATED, Json(Response { id: user.id })))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::Method;
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::user::{EnrichmentStatus, Profile};
    use crate::*;

    const REGULAR_ID: &str = "be2a91c4-df99-490d-9061-bc12f50a80b7";

    #[sqlx::test(fixtures("../../../fixtures/groups.sql"))]
    async fn test_create_user_handler(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            app.clone(),
            Method::POST,
            "/user",
            json!({"name": "carol", "groupId": REGULAR_ID}).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();

        // Exactly one association, and no derived payload yet.
        let response = make_request(
            app,
            Method::GET,
            &format!("/user/{}", body.id),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let profile = response.into_body().collect().await.unwrap().to_bytes();
        let profile: Profile = serde_json::from_slice(&profile).unwrap();
        assert_eq!(profile.name, "carol");
        assert_eq!(profile.group_names, ["regular"]);
        assert!(profile.derived_payload.is_none());
    }

    #[sqlx::test(fixtures("../../../fixtures/groups.sql"))]
    async fn test_create_user_unknown_group(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            app.clone(),
            Method::POST,
            "/user",
            json!({"name": "carol", "groupId": uuid::Uuid::new_v4()}).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // No user record was created.
        let response = make_request(app, Method::GET, "/user", String::default()).await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let users: Vec<Profile> = serde_json::from_slice(&body).unwrap();
        assert!(users.is_empty());
    }

    #[sqlx::test(fixtures("../../../fixtures/groups.sql", "../../../fixtures/users.sql"))]
    async fn test_create_user_name_taken(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            app.clone(),
            Method::POST,
            "/user",
            json!({"name": "alice", "groupId": REGULAR_ID}).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = make_request(app, Method::GET, "/user", String::default()).await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let users: Vec<Profile> = serde_json::from_slice(&body).unwrap();
        assert_eq!(users.len(), 2);
    }

    #[sqlx::test(fixtures("../../../fixtures/groups.sql"))]
    async fn test_new_user_starts_pending(pool: Pool<Postgres>) {
        let state = router::state(pool.clone());
        let app = app(state);

        let response = make_request(
            app,
            Method::POST,
            "/user",
            json!({"name": "dave", "groupId": REGULAR_ID}).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();

        let status: EnrichmentStatus =
            sqlx::query_scalar("SELECT enrichment_status FROM users WHERE id = $1")
                .bind(body.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_ne!(status, EnrichmentStatus::Done);
    }
}

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::AppState;
use crate::error::Result;
use crate::user::Profile;

/// List every user projection. An empty store answers with an empty list,
/// not an error.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Profile>>> {
    Ok(Json(state.users.list().await?))
}

/// Handler to fetch one user projection by identifier.
pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>> {
    Ok(Json(state.users.get(user_id).await?))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::user::EnrichmentStatus;
    use crate::*;

    const ALICE_ID: &str = "0c3b4660-0532-4a91-85b2-67ac96a4030e";
    const BOB_ID: &str = "7d2ef5aa-8f4b-4d0e-9dd1-d0f63a21a2b1";

    #[sqlx::test(fixtures("../../../fixtures/groups.sql", "../../../fixtures/users.sql"))]
    async fn test_list_users(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(app, Method::GET, "/user", String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let users: Vec<Profile> = serde_json::from_slice(&body).unwrap();
        assert_eq!(users.len(), 2);

        let alice = &users[0];
        assert_eq!(alice.name, "alice");
        assert_eq!(alice.group_names, ["regular"]);
        assert_eq!(alice.enrichment_status, EnrichmentStatus::Done);
        let payload = alice.derived_payload.as_ref().unwrap();
        assert!(payload["current_user_url"].is_string());

        let bob = &users[1];
        assert_eq!(bob.group_names, ["admin", "regular"]);
        assert!(bob.derived_payload.is_none());
    }

    #[sqlx::test]
    async fn test_list_users_empty_store(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(app, Method::GET, "/user", String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let users: Vec<Profile> = serde_json::from_slice(&body).unwrap();
        assert!(users.is_empty());
    }

    #[sqlx::test(fixtures("../../../fixtures/groups.sql", "../../../fixtures/users.sql"))]
    async fn test_get_user_handler(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let path = format!("/user/{BOB_ID}");
        let response = make_request(app, Method::GET, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let profile: Profile = serde_json::from_slice(&body).unwrap();
        assert_eq!(profile.id.to_string(), BOB_ID);
        assert_eq!(profile.name, "bob");
        assert_eq!(profile.group_names, ["admin", "regular"]);
        assert_eq!(profile.enrichment_status, EnrichmentStatus::Pending);
    }

    #[sqlx::test(fixtures("../../../fixtures/groups.sql", "../../../fixtures/users.sql"))]
    async fn test_get_unknown_user(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let path = format!("/user/{}", uuid::Uuid::new_v4());
        let response = make_request(app, Method::GET, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(fixtures("../../../fixtures/groups.sql", "../../../fixtures/users.sql"))]
    async fn test_membership_is_reported_not_mutated(pool: Pool<Postgres>) {
        let state = router::state(pool);

        let profile = state.users.get(ALICE_ID.parse().unwrap()).await.unwrap();
        assert!(profile.member_of("regular"));
        assert!(!profile.member_of("admin"));
        assert!(state.users.assert_member_of(&profile, "regular").is_ok());
        assert!(state.users.assert_member_of(&profile, "admin").is_err());
    }
}

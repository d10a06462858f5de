//! Handle database requests for users.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::{Entity, Result, conflict_on_unique, not_found_on_fk};
use crate::user::{EnrichmentStatus, Profile, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a user and its single group association in one transaction.
    ///
    /// A unique violation on the user name is a conflict; a foreign-key
    /// violation on the association means the group vanished since the
    /// caller checked it.
    pub async fn insert(&self, user: &User, group_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO users (id, name) VALUES ($1, $2)")
            .bind(user.id)
            .bind(&user.name)
            .execute(&mut *tx)
            .await
            .map_err(|err| conflict_on_unique(err, Entity::User, &user.name))?;

        sqlx::query("INSERT INTO user_groups (user_id, group_id) VALUES ($1, $2)")
            .bind(user.id)
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(|err| not_found_on_fk(err, Entity::Group, group_id))?;

        tx.commit().await?;

        Ok(())
    }

    /// Whether a user with this exact name is already stored.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Find a user projection using `id` field.
    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&profile_query(Scope::One))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Every stored user projection, name-ordered.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(&profile_query(Scope::All))
            .fetch_all(&self.pool)
            .await?;

        Ok(profiles)
    }

    /// Overwrite a user's name in place.
    pub async fn update_name(&self, user_id: Uuid, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET name = $2 WHERE id = $1")
            .bind(user_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|err| conflict_on_unique(err, Entity::User, name))?;

        Ok(result.rows_affected() > 0)
    }

    /// Store the derived payload written by the enrichment task,
    /// overwriting whatever was there.
    pub async fn store_payload(&self, user_id: Uuid, payload: &serde_json::Value) -> Result<()> {
        sqlx::query("UPDATE users SET derived_payload = $2, enrichment_status = $3 WHERE id = $1")
            .bind(user_id)
            .bind(payload)
            .bind(EnrichmentStatus::Done)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record the enrichment outcome without touching the payload.
    pub async fn set_enrichment_status(
        &self,
        user_id: Uuid,
        status: EnrichmentStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE users SET enrichment_status = $2 WHERE id = $1")
            .bind(user_id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a user. Association rows cascade.
    pub async fn delete(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    One,
    All,
}

fn profile_query(scope: Scope) -> String {
    let filter = match scope {
        Scope::One => "WHERE u.id = $1",
        Scope::All => "",
    };

    format!(
        r#"SELECT
                u.id,
                u.name,
                u.derived_payload,
                u.enrichment_status,
                COALESCE(
                    ARRAY_AGG(g.name ORDER BY g.name)
                        FILTER (WHERE g.id IS NOT NULL),
                    '{{}}'
                ) AS group_names
            FROM users u
            LEFT JOIN user_groups ug ON ug.user_id = u.id
            LEFT JOIN groups g ON g.id = ug.group_id
            {filter}
            GROUP BY
                u.id,
                u.name,
                u.derived_payload,
                u.enrichment_status
            ORDER BY u.name"#
    )
}

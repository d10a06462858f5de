//! Handle database requests for groups.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::{Entity, Result, conflict_on_unique};
use crate::group::Group;

#[derive(Clone)]
pub struct GroupRepository {
    pool: Pool<Postgres>,
}

impl GroupRepository {
    /// Create a new [`GroupRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`Group`] into database.
    ///
    /// A unique violation on the name column is reported as a conflict.
    pub async fn insert(&self, group: &Group) -> Result<()> {
        sqlx::query("INSERT INTO groups (id, name) VALUES ($1, $2)")
            .bind(group.id)
            .bind(&group.name)
            .execute(&self.pool)
            .await
            .map_err(|err| conflict_on_unique(err, Entity::Group, &group.name))?;

        Ok(())
    }

    /// Find a group using `id` field.
    pub async fn find_by_id(&self, group_id: Uuid) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>("SELECT id, name FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    /// Whether a group with this exact name is already stored.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM groups WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Every stored group, name-ordered.
    pub async fn list(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>("SELECT id, name FROM groups ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }

    /// Overwrite a group's name in place.
    pub async fn update_name(&self, group_id: Uuid, name: &str) -> Result<Option<Group>> {
        let group =
            sqlx::query_as::<_, Group>("UPDATE groups SET name = $2 WHERE id = $1 RETURNING id, name")
                .bind(group_id)
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|err| conflict_on_unique(err, Entity::Group, name))?;

        Ok(group)
    }

    /// Delete a group. Association rows cascade, member users survive.
    pub async fn delete(&self, group_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! User manager.

use uuid::Uuid;

use crate::enrichment::Enricher;
use crate::error::{Entity, Result, ServerError};
use crate::user::{Profile, User, UserRepository};

/// User manager.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    enricher: Enricher,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(repo: UserRepository, enricher: Enricher) -> Self {
        Self { repo, enricher }
    }

    /// Create a user attached to one group and schedule its enrichment.
    ///
    /// The group's existence must already have been confirmed by the
    /// caller; a foreign-key violation still maps to a missing group. The
    /// returned record carries no derived payload yet.
    pub async fn create(&self, name: &str, group_id: Uuid) -> Result<User> {
        if self.repo.exists_by_name(name).await? {
            return Err(ServerError::Conflict {
                kind: Entity::User,
                name: name.to_owned(),
            });
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_owned(),
        };
        self.repo.insert(&user, group_id).await?;
        self.enricher.spawn(user.id);

        Ok(user)
    }

    /// All users; an empty store yields an empty list.
    pub async fn list(&self) -> Result<Vec<Profile>> {
        self.repo.list_profiles().await
    }

    /// Find a user projection using `id` field.
    pub async fn get(&self, user_id: Uuid) -> Result<Profile> {
        self.repo
            .find_profile(user_id)
            .await?
            .ok_or(ServerError::NotFound {
                kind: Entity::User,
                id: user_id,
            })
    }

    /// Consistency check used before renames: the supplied group name must
    /// already be associated with the user. Never mutates membership.
    pub fn assert_member_of(&self, profile: &Profile, group_name: &str) -> Result<()> {
        if profile.member_of(group_name) {
            Ok(())
        } else {
            Err(ServerError::NotAMember {
                user_id: profile.id,
                group: group_name.to_owned(),
            })
        }
    }

    /// Overwrite the user's name; membership checks are the caller's duty.
    pub async fn update(&self, user_id: Uuid, name: &str) -> Result<Profile> {
        if !self.repo.update_name(user_id, name).await? {
            return Err(ServerError::NotFound {
                kind: Entity::User,
                id: user_id,
            });
        }

        self.get(user_id).await
    }

    /// Delete a user once existence was confirmed by the caller.
    pub async fn delete(&self, user_id: Uuid) -> Result<()> {
        if self.repo.delete(user_id).await? {
            Ok(())
        } else {
            Err(ServerError::NotFound {
                kind: Entity::User,
                id: user_id,
            })
        }
    }
}

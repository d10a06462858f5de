//! Group manager.

use uuid::Uuid;

use crate::error::{Entity, Result, ServerError};
use crate::group::{Group, GroupKind, GroupRepository};

/// Group manager.
#[derive(Clone)]
pub struct GroupService {
    repo: GroupRepository,
}

impl GroupService {
    /// Create a new [`GroupService`].
    pub fn new(repo: GroupRepository) -> Self {
        Self { repo }
    }

    /// Whether `name` belongs to the closed set of group names.
    pub fn name_is_allowed(name: &str) -> bool {
        GroupKind::from_name(name).is_some()
    }

    /// Create a group with a fresh identifier.
    ///
    /// Callers check name availability first; the unique constraint on the
    /// name column still backstops concurrent creates.
    pub async fn create(&self, name: &str) -> Result<Group> {
        if !Self::name_is_allowed(name) {
            return Err(ServerError::UnknownGroupName {
                name: name.to_owned(),
            });
        }

        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_owned(),
        };
        self.repo.insert(&group).await?;

        Ok(group)
    }

    /// Fail with a conflict if a group already carries `name`.
    pub async fn ensure_name_available(&self, name: &str) -> Result<()> {
        if self.repo.exists_by_name(name).await? {
            return Err(ServerError::Conflict {
                kind: Entity::Group,
                name: name.to_owned(),
            });
        }

        Ok(())
    }

    /// Find a group using `id` field.
    pub async fn get(&self, group_id: Uuid) -> Result<Group> {
        self.repo
            .find_by_id(group_id)
            .await?
            .ok_or(ServerError::NotFound {
                kind: Entity::Group,
                id: group_id,
            })
    }

    /// All groups; an empty store yields an empty list.
    pub async fn list(&self) -> Result<Vec<Group>> {
        self.repo.list().await
    }

    /// Overwrite a group's name, re-validated against the enumeration.
    ///
    /// Existence and name availability are checked by the caller first.
    pub async fn update(&self, group_id: Uuid, name: &str) -> Result<Group> {
        if !Self::name_is_allowed(name) {
            return Err(ServerError::UnknownGroupName {
                name: name.to_owned(),
            });
        }

        self.repo
            .update_name(group_id, name)
            .await?
            .ok_or(ServerError::NotFound {
                kind: Entity::Group,
                id: group_id,
            })
    }

    /// Delete a group once existence was confirmed by the caller.
    pub async fn delete(&self, group_id: Uuid) -> Result<()> {
        if self.repo.delete(group_id).await? {
            Ok(())
        } else {
            Err(ServerError::NotFound {
                kind: Entity::Group,
                id: group_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_enumeration() {
        assert!(GroupService::name_is_allowed("regular"));
        assert!(GroupService::name_is_allowed("admin"));
        assert!(!GroupService::name_is_allowed("managers"));
        assert!(!GroupService::name_is_allowed("Regular"));
        assert!(!GroupService::name_is_allowed(""));
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(GroupKind::from_name("admin"), Some(GroupKind::Admin));
        assert_eq!(GroupKind::from_name("regular"), Some(GroupKind::Regular));
        assert_eq!(GroupKind::from_name("root"), None);
        assert_eq!(GroupKind::Admin.to_string(), "admin");
    }
}

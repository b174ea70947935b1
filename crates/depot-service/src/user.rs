//! User accounts and credentials.
//!
//! Plaintext passwords only ever pass through [`UserService::create`],
//! [`UserService::update_password`] and [`UserService::authenticate`]; the
//! store sees the argon2 hash.

use serde::Deserialize;
use tracing::{debug, info, warn};

use depot_core::validation::{
    validate_email, validate_full_name, validate_password, validate_username,
};
use depot_core::{EntityId, User, UserRole};
use depot_db::{DbError, UserStore};

use crate::error::{ensure_persisted, ServiceError, ServiceResult};
use crate::password::PasswordHasher;

/// Input for a new account. `password` is plaintext.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Business operations on user accounts.
#[derive(Debug, Clone)]
pub struct UserService<U> {
    repo: U,
    hasher: PasswordHasher,
}

impl<U: UserStore> UserService<U> {
    pub fn new(repo: U, hasher: PasswordHasher) -> Self {
        UserService { repo, hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// All users, ordered by id.
    pub async fn find_all(&self) -> ServiceResult<Vec<User>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Option<User>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Blank input finds nothing without touching the store.
    pub async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(None);
        }
        Ok(self.repo.find_by_username(username).await?)
    }

    pub async fn find_by_role(&self, role: UserRole) -> ServiceResult<Vec<User>> {
        Ok(self.repo.find_by_role(role).await?)
    }

    /// Validates the input, hashes the password and stores the account.
    pub async fn create(&self, input: NewUser) -> ServiceResult<User> {
        let username = validate_username(&input.username)?;
        let password = validate_password(&input.password)?;
        let email = validate_email(&input.email)?;
        let full_name = validate_full_name(&input.full_name)?;

        let hash = self.hasher.hash(&password)?;
        let user = User::new(username, hash, email, full_name, input.role)?;

        let inserted = self
            .repo
            .create(&user)
            .await
            .map_err(|e| ServiceError::duplicate_or_storage(e, "Username", &user.username))?;
        if !inserted {
            return Err(DbError::QueryFailed(format!(
                "user '{}' was not inserted",
                user.username
            ))
            .into());
        }

        let created = self
            .repo
            .find_by_username(&user.username)
            .await?
            .ok_or_else(|| DbError::not_found("User", &user.username))?;

        info!(id = created.id, username = %created.username, role = %created.role, "User created");
        Ok(created)
    }

    /// Replaces the profile fields of a stored user. The hash is written
    /// back unchanged.
    pub async fn update(&self, user: &User) -> ServiceResult<bool> {
        ensure_persisted(user.id, "User")?;

        let normalized = User {
            username: validate_username(&user.username)?,
            email: validate_email(&user.email)?,
            full_name: validate_full_name(&user.full_name)?,
            ..user.clone()
        }
        .validated()?;

        Ok(self
            .repo
            .update(&normalized)
            .await
            .map_err(|e| ServiceError::duplicate_or_storage(e, "Username", &normalized.username))?)
    }

    /// Sets a new password. `false` if the user does not exist, in which
    /// case nothing is written.
    pub async fn update_password(&self, id: EntityId, plaintext: &str) -> ServiceResult<bool> {
        let password = validate_password(plaintext)?;

        let Some(user) = self.repo.find_by_id(id).await? else {
            warn!(id, "Cannot change password of unknown user");
            return Ok(false);
        };

        let hash = self.hasher.hash(&password)?;
        let updated = self.repo.update(&user.with_password_hash(hash)?).await?;
        if updated {
            info!(id, "Password changed");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: EntityId) -> ServiceResult<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            info!(id, "User deleted");
        }
        Ok(deleted)
    }

    /// Checks a login. `None` for an unknown user or a wrong password.
    ///
    /// A matching hash made with an outdated cost is replaced on the spot;
    /// failing to store the new hash does not fail the login.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<Option<User>> {
        let Some(user) = self.find_by_username(username).await? else {
            debug!(username, "Login for unknown user");
            return Ok(None);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            warn!(username = %user.username, "Login rejected");
            return Ok(None);
        }

        if !self.hasher.needs_rehash(&user.password_hash) {
            return Ok(Some(user));
        }

        let upgraded = user.with_password_hash(self.hasher.hash(password)?)?;
        match self.repo.update(&upgraded).await {
            Ok(true) => {
                info!(id = upgraded.id, "Password hash upgraded");
                Ok(Some(upgraded))
            }
            Ok(false) => Ok(Some(user)),
            Err(e) => {
                warn!(id = user.id, error = %e, "Could not upgrade password hash");
                Ok(Some(user))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::fast_hasher;
    use crate::testing::MockUsers;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn input() -> NewUser {
        NewUser {
            username: "picker_01".to_string(),
            password: "Picker123".to_string(),
            email: "Picker@Depot.io".to_string(),
            full_name: "Ana Lopez".to_string(),
            role: UserRole::Picker,
        }
    }

    fn stored(id: EntityId, hash: &str) -> User {
        User {
            id,
            username: "picker_01".to_string(),
            password_hash: hash.to_string(),
            email: "picker@depot.io".to_string(),
            full_name: "Ana Lopez".to_string(),
            role: UserRole::Picker,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_before_storing() {
        let mut repo = MockUsers::new();
        repo.expect_create()
            .withf(|u: &User| {
                u.email == "picker@depot.io"
                    && u.password_hash.starts_with("$argon2id$")
                    && u.password_hash != "Picker123"
            })
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_find_by_username()
            .withf(|name: &str| name == "picker_01")
            .returning(|_| Ok(Some(stored(4, "$argon2id$stored"))));

        let service = UserService::new(repo, fast_hasher(1));
        assert_eq!(service.create(input()).await.unwrap().id, 4);
    }

    #[tokio::test]
    async fn test_create_rejects_weak_password() {
        let mut repo = MockUsers::new();
        repo.expect_create().never();

        let service = UserService::new(repo, fast_hasher(1));
        let err = service
            .create(NewUser {
                password: "picker123".to_string(),
                ..input()
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("uppercase"));
    }

    #[tokio::test]
    async fn test_duplicate_username_message() {
        let mut repo = MockUsers::new();
        repo.expect_create().returning(|_| {
            Err(DbError::UniqueViolation {
                field: "users.username".to_string(),
            })
        });

        let service = UserService::new(repo, fast_hasher(1));
        let err = service.create(input()).await.unwrap_err();
        assert_eq!(err.to_string(), "Username 'picker_01' already exists");
    }

    #[tokio::test]
    async fn test_update_password_replaces_only_the_hash() {
        let mut repo = MockUsers::new();
        repo.expect_find_by_id()
            .with(eq(4_i64))
            .returning(|id| Ok(Some(stored(id, "$argon2id$old"))));
        repo.expect_update()
            .withf(|u: &User| {
                u.id == 4 && u.username == "picker_01" && u.password_hash.starts_with("$argon2id$v=")
            })
            .times(1)
            .returning(|_| Ok(true));

        let service = UserService::new(repo, fast_hasher(1));
        assert!(service.update_password(4, "Newpass123").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_password_of_missing_user_never_updates() {
        let mut repo = MockUsers::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let service = UserService::new(repo, fast_hasher(1));
        assert!(!service.update_password(9, "Newpass123").await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_username_lookup_skips_store() {
        let mut repo = MockUsers::new();
        repo.expect_find_by_username().never();

        let service = UserService::new(repo, fast_hasher(1));
        assert!(service.find_by_username("  ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_accepts_current_hash_without_writing() {
        let hasher = fast_hasher(1);
        let hash = hasher.hash("Picker123").unwrap();

        let mut repo = MockUsers::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(stored(4, &hash))));
        repo.expect_update().never();

        let service = UserService::new(repo, hasher);
        assert!(service.authenticate("picker_01", "Picker123").await.unwrap().is_some());
        assert!(service.authenticate("picker_01", "Wrong1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_upgrades_outdated_hash() {
        let old = fast_hasher(1).hash("Picker123").unwrap();

        let mut repo = MockUsers::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(stored(4, &old))));
        repo.expect_update()
            .withf(|u: &User| u.password_hash.contains("t=2"))
            .times(1)
            .returning(|_| Ok(true));

        let service = UserService::new(repo, fast_hasher(2));
        let user = service
            .authenticate("picker_01", "Picker123")
            .await
            .unwrap()
            .unwrap();
        assert!(!service.hasher().needs_rehash(&user.password_hash));
    }

    #[tokio::test]
    async fn test_update_of_unsaved_user_is_invalid_argument() {
        let mut repo = MockUsers::new();
        repo.expect_update().never();

        let service = UserService::new(repo, fast_hasher(1));
        assert!(matches!(
            service.update(&stored(0, "$argon2id$x")).await,
            Err(ServiceError::InvalidArgument(_))
        ));
    }
}

//! # User Repository
//!
//! Database operations for user accounts. The `password` column only ever
//! holds a password hash.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

use depot_core::{EntityId, User, UserRole};

use super::{MapRow, Repository, SqlExecutor, UserStore};
use crate::connection::ConnectionFactory;
use crate::error::DbResult;

impl MapRow for User {
    fn map_row(row: &SqliteRow) -> DbResult<Self> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
        }
        .validated()?)
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    executor: SqlExecutor,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        UserRepository {
            executor: SqlExecutor::new(factory),
        }
    }
}

#[async_trait]
impl Repository<User, EntityId> for UserRepository {
    /// Inserts a new user; `created_at` is stamped here.
    async fn create(&self, user: &User) -> DbResult<bool> {
        debug!(username = %user.username, role = %user.role, "Inserting user");

        let affected = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO users (username, password, email, full_name, role, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .bind(&user.username)
                .bind(&user.password_hash)
                .bind(&user.email)
                .bind(&user.full_name)
                .bind(user.role)
                .bind(Utc::now()),
            )
            .await?;

        Ok(affected == 1)
    }

    /// Replaces every mutable column, password hash included.
    /// `created_at` never changes.
    async fn update(&self, user: &User) -> DbResult<bool> {
        debug!(id = user.id, "Updating user");

        let affected = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE users SET
                        username = ?2,
                        password = ?3,
                        email = ?4,
                        full_name = ?5,
                        role = ?6
                    WHERE id = ?1
                    "#,
                )
                .bind(user.id)
                .bind(&user.username)
                .bind(&user.password_hash)
                .bind(&user.email)
                .bind(&user.full_name)
                .bind(user.role),
            )
            .await?;

        Ok(affected > 0)
    }

    async fn delete(&self, id: EntityId) -> DbResult<bool> {
        debug!(id, "Deleting user");

        let affected = self
            .executor
            .execute(sqlx::query("DELETE FROM users WHERE id = ?1").bind(id))
            .await?;

        Ok(affected > 0)
    }

    async fn find_by_id(&self, id: EntityId) -> DbResult<Option<User>> {
        self.executor
            .fetch_optional(sqlx::query("SELECT * FROM users WHERE id = ?1").bind(id))
            .await
    }

    async fn find_all(&self) -> DbResult<Vec<User>> {
        self.executor
            .fetch_all(sqlx::query("SELECT * FROM users ORDER BY id"))
            .await
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.executor
            .fetch_optional(sqlx::query("SELECT * FROM users WHERE username = ?1").bind(username))
            .await
    }

    async fn find_by_role(&self, role: UserRole) -> DbResult<Vec<User>> {
        self.executor
            .fetch_all(
                sqlx::query("SELECT * FROM users WHERE role = ?1 ORDER BY username").bind(role),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    fn user(username: &str, role: UserRole) -> User {
        User::new(
            username,
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g",
            format!("{username}@depot.test"),
            "Test User",
            role,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_by_username() {
        let db = scratch().await;
        let repo = db.users();

        assert!(repo.create(&user("alice", UserRole::Manager)).await.unwrap());
        let alice = repo.find_by_username("alice").await.unwrap().unwrap();
        assert!(alice.id > 0);
        assert_eq!(alice.role, UserRole::Manager);
        assert_eq!(alice.email, "alice@depot.test");

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let db = scratch().await;
        let repo = db.users();
        repo.create(&user("alice", UserRole::Manager)).await.unwrap();

        let err = repo.create(&user("alice", UserRole::Picker)).await.unwrap_err();
        assert!(err.is_unique_violation(), "{err:?}");
    }

    #[tokio::test]
    async fn test_find_by_role_orders_by_username() {
        let db = scratch().await;
        let repo = db.users();
        for (name, role) in [
            ("zoe", UserRole::Picker),
            ("adam", UserRole::Picker),
            ("mia", UserRole::Receiver),
        ] {
            repo.create(&user(name, role)).await.unwrap();
        }

        let pickers: Vec<String> = repo
            .find_by_role(UserRole::Picker)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(pickers, ["adam", "zoe"]);
        assert!(repo.find_by_role(UserRole::Controller).await.unwrap().is_empty());

        let all: Vec<String> = repo.find_all().await.unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(all, ["zoe", "adam", "mia"]);
    }

    #[tokio::test]
    async fn test_update_persists_password_hash() {
        let db = scratch().await;
        let repo = db.users();
        repo.create(&user("alice", UserRole::Picker)).await.unwrap();
        let alice = repo.find_by_username("alice").await.unwrap().unwrap();

        let changed = alice.with_password_hash("$argon2id$new-hash").unwrap();
        assert!(repo.update(&changed).await.unwrap());

        let stored = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$argon2id$new-hash");
        assert_eq!(stored.created_at, alice.created_at);

        assert!(repo.delete(alice.id).await.unwrap());
        assert!(!repo.update(&changed).await.unwrap());
    }
}

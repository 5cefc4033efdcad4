use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a user unless the email is taken. Atomic with respect to
    /// concurrent callers: at most one insert per email succeeds, the rest get
    /// `StoreError::Conflict`.
    async fn insert_if_absent(&self, email: &str, password_hash: &str)
        -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert_if_absent(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        // rolled back on drop if anything below fails
        let mut tx = self.db.begin().await?;
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                StoreError::Conflict
            } else {
                StoreError::Database(e)
            }
        })?;

        let Some(user) = inserted else {
            return Err(StoreError::Conflict);
        };
        tx.commit().await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `sqlx::test` creates a throwaway database per test and applies ./migrations.
    // Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

    #[sqlx::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn duplicate_insert_is_a_conflict(pool: PgPool) {
        let store = PgUserStore::new(pool);
        let user = store
            .insert_if_absent("user-a@example.com", "hash-1")
            .await
            .unwrap();
        assert_eq!(user.email, "user-a@example.com");

        let err = store
            .insert_if_absent("user-a@example.com", "hash-2")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        let stored = store
            .find_by_email("user-a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, user.id);
        assert_eq!(stored.password_hash, "hash-1");
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn concurrent_inserts_admit_exactly_one(pool: PgPool) {
        let store = PgUserStore::new(pool);
        let (a, b) = tokio::join!(
            store.insert_if_absent("race@example.com", "hash-a"),
            store.insert_if_absent("race@example.com", "hash-b"),
        );
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::Conflict))));
    }
}

//! User Record Store: persistence seam for the `users` table.
//!
//! `AppState` holds an `Arc<dyn UserStore>`. Production uses `PgUserStore`;
//! tests use `MemoryUserStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::user::{NewUser, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts the user unless a row with the same external id exists.
    /// Returns `true` when a row was created.
    async fn insert_if_absent(&self, user: &NewUser) -> Result<bool, AppError>;

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, AppError>;

    /// Sets `is_pro` and stamps `pro_since` in a single write.
    /// Returns `None` when no row matches.
    async fn mark_pro(
        &self,
        external_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PgUserStore
// ────────────────────────────────────────────────────────────────────────────

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_if_absent(&self, user: &NewUser) -> Result<bool, AppError> {
        // Relies on users_external_id_key; concurrent first syncs collapse to one row.
        let result = sqlx::query(
            r#"
            INSERT INTO users (external_id, email, name, is_pro)
            VALUES ($1, $2, $3, FALSE)
            ON CONFLICT (external_id) DO NOTHING
            "#,
        )
        .bind(&user.external_id)
        .bind(&user.email)
        .bind(&user.name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn mark_pro(
        &self,
        external_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_pro = TRUE, pro_since = $2
            WHERE external_id = $1
            RETURNING *
            "#,
        )
        .bind(external_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryUserStore
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryUserStore;


#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(id: &str) -> NewUser {
        NewUser {
            external_id: id.to_string(),
            email: format!("{id}@x.com"),
            name: id.to_uppercase(),
        }
    }

    #[tokio::test]
    async fn test_memory_insert_if_absent_keeps_first_row() {
        let store = MemoryUserStore::new();
        assert!(store.insert_if_absent(&new_user("u1")).await.unwrap());

        let mut changed = new_user("u1");
        changed.email = "other@x.com".to_string();
        assert!(!store.insert_if_absent(&changed).await.unwrap());

        assert_eq!(store.len().await, 1);
        let user = store.find_by_external_id("u1").await.unwrap().unwrap();
        assert_eq!(user.email, "u1@x.com");
    }

    #[tokio::test]
    async fn test_memory_mark_pro_missing_row() {
        let store = MemoryUserStore::new();
        let result = store.mark_pro("ghost", Utc::now()).await.unwrap();
        assert!(result.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_memory_concurrent_inserts_produce_one_row() {
        let store = std::sync::Arc::new(MemoryUserStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_if_absent(&new_user("u1")).await.unwrap() })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    // Postgres-backed tests; run with DATABASE_URL set and `--ignored`.
    // sqlx applies ./migrations to a fresh database per test.

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_pg_insert_if_absent_keeps_first_row(pool: PgPool) {
        let store = PgUserStore::new(pool);
        assert!(store.insert_if_absent(&new_user("u1")).await.unwrap());

        let mut changed = new_user("u1");
        changed.email = "other@x.com".to_string();
        assert!(!store.insert_if_absent(&changed).await.unwrap());

        let user = store.find_by_external_id("u1").await.unwrap().unwrap();
        assert_eq!(user.email, "u1@x.com");
        assert!(!user.is_pro);
        assert!(user.pro_since.is_none());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_pg_mark_pro_returns_updated_row(pool: PgPool) {
        let store = PgUserStore::new(pool);
        store.insert_if_absent(&new_user("u1")).await.unwrap();
        store.insert_if_absent(&new_user("u2")).await.unwrap();

        let at = Utc::now();
        let user = store.mark_pro("u1", at).await.unwrap().unwrap();
        assert!(user.is_pro);
        // TIMESTAMPTZ keeps microseconds.
        assert_eq!(
            user.pro_since.map(|t| t.timestamp_micros()),
            Some(at.timestamp_micros())
        );

        let other = store.find_by_external_id("u2").await.unwrap().unwrap();
        assert!(!other.is_pro);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_pg_mark_pro_missing_row(pool: PgPool) {
        let store = PgUserStore::new(pool);
        assert!(store.mark_pro("ghost", Utc::now()).await.unwrap().is_none());
        assert!(store.find_by_external_id("ghost").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_pg_pro_flag_requires_timestamp(pool: PgPool) {
        let result = sqlx::query(
            "INSERT INTO users (external_id, email, name, is_pro) VALUES ('u1', 'a@x.com', 'A', TRUE)",
        )
        .execute(&pool)
        .await;

        match result {
            Err(sqlx::Error::Database(err)) => {
                assert_eq!(err.constraint(), Some("users_pro_since_matches_flag"));
            }
            other => panic!("expected a constraint violation, got {other:?}"),
        }
    }
}

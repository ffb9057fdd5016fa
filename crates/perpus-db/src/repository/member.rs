//! # Member Repository
//!
//! Registered borrowers. Read-only from the lending side; `insert` exists
//! for seeding and tests.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use perpus_core::Member;

/// Repository for member database operations.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    /// Creates a new MemberRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MemberRepository { pool }
    }

    /// Lists every member in store order.
    pub async fn list(&self) -> DbResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT id, name, address, phone FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = members.len(), "Listed members");
        Ok(members)
    }

    /// Registers a member and returns the assigned id.
    pub async fn insert(&self, name: &str, address: &str, phone: &str) -> DbResult<i64> {
        debug!(name = %name, "Inserting member");

        let result = sqlx::query("INSERT INTO users (name, address, phone) VALUES (?1, ?2, ?3)")
            .bind(name)
            .bind(address)
            .bind(phone)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.members();

        let first = repo.insert("Budi", "Jl. Merdeka 1", "0811").await.unwrap();
        repo.insert("Ani", "Jl. Sudirman 5", "0813").await.unwrap();

        let members = repo.list().await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, first);
        assert_eq!(members[0].to_string(), format!("[{first}] Budi - Jl. Merdeka 1 - 0811"));
        assert_eq!(members[1].name, "Ani");
    }
}

//! # Staff Repository
//!
//! Staff members who can act as lending agents.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use perpus_core::Staff;

/// Repository for staff database operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Lists every staff member in store order.
    pub async fn list(&self) -> DbResult<Vec<Staff>> {
        let staff = sqlx::query_as::<_, Staff>("SELECT id, name, role, phone FROM staff ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = staff.len(), "Listed staff");
        Ok(staff)
    }

    /// Adds a staff member and returns the assigned id.
    pub async fn insert(&self, name: &str, role: &str, phone: &str) -> DbResult<i64> {
        debug!(name = %name, role = %role, "Inserting staff member");

        let result = sqlx::query("INSERT INTO staff (name, role, phone) VALUES (?1, ?2, ?3)")
            .bind(name)
            .bind(role)
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
        let repo = db.staff();

        let id = repo.insert("Sari", "Librarian", "0812").await.unwrap();

        let staff = repo.list().await.unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].to_string(), format!("[{id}] Sari - Librarian - 0812"));
    }
}

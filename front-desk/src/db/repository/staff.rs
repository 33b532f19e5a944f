//! Staff Repository

use super::RepoResult;
use shared::models::Staff;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let staff = sqlx::query_as::<_, Staff>("SELECT id, name, is_active FROM staff WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(staff)
}

/// All staff, optionally filtered by active flag, ordered by name
pub async fn find_all(pool: &SqlitePool, is_active: Option<bool>) -> RepoResult<Vec<Staff>> {
    let staff = sqlx::query_as::<_, Staff>(
        "SELECT id, name, is_active FROM staff WHERE (?1 IS NULL OR is_active = ?1) ORDER BY name, id",
    )
    .bind(is_active)
    .fetch_all(pool)
    .await?;
    Ok(staff)
}

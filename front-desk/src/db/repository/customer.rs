//! Customer Repository (read-only; customers are owned by the host backend)

use super::RepoResult;
use shared::models::Customer;
use sqlx::SqlitePool;

const CUSTOMER_SELECT: &str = "SELECT id, first_name, last_name, phone, photo_ref FROM customer";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(&format!("{CUSTOMER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(customer)
}

/// Phone is the unique lookup key at check-in
pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(&format!("{CUSTOMER_SELECT} WHERE phone = ?"))
        .bind(phone.trim())
        .fetch_optional(pool)
        .await?;
    Ok(customer)
}

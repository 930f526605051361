use sqlx::SqlitePool;

use super::UserRecord;

/// Create a new user and return the stored row.
pub async fn create_user(pool: &SqlitePool, name: &str) -> Result<UserRecord, sqlx::Error> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (name)
        VALUES (?)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Find a user by ID.
pub async fn find_user_by_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, name
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// List all users in id order.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserRecord>, sqlx::Error> {
    let users = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, name
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Delete a user. Their posts go with them (FK cascade).
/// Returns whether a row was deleted.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

use chrono::Utc;
use sqlx::SqlitePool;

use super::PostRecord;

/// Create a new post with pre-encoded content.
/// Returns the created post.
pub async fn create_post(
    pool: &SqlitePool,
    title: &str,
    content_json: &str,
    user_id: i64,
) -> Result<PostRecord, sqlx::Error> {
    let post = sqlx::query_as::<_, PostRecord>(
        r#"
        INSERT INTO posts (title, content_json, user_id, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, title, content_json, user_id, created_at
        "#,
    )
    .bind(title)
    .bind(content_json)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID.
pub async fn find_post_by_id(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Option<PostRecord>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostRecord>(
        r#"
        SELECT id, title, content_json, user_id, created_at
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// List all posts in id order.
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<PostRecord>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostRecord>(
        r#"
        SELECT id, title, content_json, user_id, created_at
        FROM posts
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Find all posts by a user, newest first.
pub async fn find_posts_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<PostRecord>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostRecord>(
        r#"
        SELECT id, title, content_json, user_id, created_at
        FROM posts
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Update a post's title and/or content. A `None` leaves the column as is;
/// content is always replaced as a whole string, never patched.
/// Returns the updated row, or `None` if the post does not exist.
pub async fn update_post(
    pool: &SqlitePool,
    post_id: i64,
    title: Option<&str>,
    content_json: Option<&str>,
) -> Result<Option<PostRecord>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostRecord>(
        r#"
        UPDATE posts
        SET title = COALESCE(?, title),
            content_json = COALESCE(?, content_json)
        WHERE id = ?
        RETURNING id, title, content_json, user_id, created_at
        "#,
    )
    .bind(title)
    .bind(content_json)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Delete a post. Returns whether a row was deleted.
pub async fn delete_post(pool: &SqlitePool, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

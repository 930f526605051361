//! User schema and resolvers

use async_graphql::{
    ComplexObject, Context, ErrorExtensions, InputObject, Object, Result as GraphQLResult,
    SimpleObject,
};
use sqlx::SqlitePool;

use crate::db::{post_repo, user_repo, UserRecord};
use crate::error::AppError;
use crate::schema::content::Post;

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

#[ComplexObject]
impl User {
    /// Posts owned by this user, newest first.
    async fn posts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let records = post_repo::find_posts_by_user(pool, self.id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        records
            .into_iter()
            .map(Post::from_record)
            .collect::<Result<Vec<_>, AppError>>()
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn users(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<User>> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let users = user_repo::list_users(pool)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: i64) -> GraphQLResult<Option<User>> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let user = user_repo::find_user_by_id(pool, id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Ok(user.map(User::from))
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct CreateUserInput {
    pub name: String,
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: CreateUserInput,
    ) -> GraphQLResult<User> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let user = user_repo::create_user(pool, &input.name)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Ok(user.into())
    }

    /// Delete a user and, through the ownership cascade, every post they own.
    async fn delete_user(&self, ctx: &Context<'_>, id: i64) -> GraphQLResult<bool> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let deleted = user_repo::delete_user(pool, id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Ok(deleted)
    }
}

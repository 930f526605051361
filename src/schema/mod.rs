//! GraphQL schema assembly.

pub mod content;
pub mod user;

use async_graphql::{EmptySubscription, MergedObject, Schema};
use sqlx::SqlitePool;

use crate::config::GraphQLConfig;

/// Root query object
#[derive(MergedObject, Default)]
pub struct QueryRoot(user::UserQuery, content::ContentQuery);

/// Root mutation object
#[derive(MergedObject, Default)]
pub struct MutationRoot(user::UserMutation, content::ContentMutation);

/// GraphQL App Schema type
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema over a database pool.
pub fn build_schema(pool: SqlitePool, graphql: &GraphQLConfig) -> AppSchema {
    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(pool)
    .limit_depth(graphql.max_depth)
    .limit_complexity(graphql.max_complexity);

    if !graphql.introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}

//! Post schema: content types, queries and mutations.
//!
//! Two protocols meet here. The write path takes `PostContentInput`, an
//! exclusive-choice wrapper where the caller populates exactly one variant
//! field; it is translated into a validated `ContentVariant` before anything
//! touches storage. The read path decodes the stored payload and answers with
//! the `PostContent` union, where the variant is identified by `__typename`
//! and derived fields are computed on the fly.

use async_graphql::{
    ComplexObject, Context, ErrorExtensions, InputObject, Object, Result as GraphQLResult,
    SimpleObject, Union,
};
use sqlx::SqlitePool;
use tracing::error;

use crate::content::{codec, derive, ContentError, ContentVariant, TextFormat};
use crate::db::{post_repo, user_repo, PostRecord};
use crate::error::AppError;
use crate::schema::user::User;

// --- Output types ---

#[derive(Union, Clone, Debug)]
pub enum PostContent {
    Text(TextContent),
    Image(ImageContent),
    Link(LinkContent),
}

#[derive(SimpleObject, Clone, Debug)]
pub struct TextContent {
    pub body: String,
    pub format: TextFormat,
    /// Whitespace-delimited token count of `body`, computed at read time.
    pub word_count: i32,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct ImageContent {
    pub url: String,
    pub caption: Option<String>,
    pub dimensions: Option<ImageDimensions>,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct ImageDimensions {
    pub width: i32,
    pub height: i32,
    /// `"W:H"` reduced by the greatest common divisor, computed at read time.
    pub aspect_ratio: String,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct LinkContent {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
}

impl From<ContentVariant> for PostContent {
    fn from(variant: ContentVariant) -> Self {
        match variant {
            ContentVariant::Text { body, format } => {
                let word_count = derive::word_count(&body);
                PostContent::Text(TextContent {
                    body,
                    format,
                    word_count,
                })
            }
            ContentVariant::Image {
                url,
                caption,
                dimensions,
            } => PostContent::Image(ImageContent {
                url,
                caption,
                dimensions: dimensions.map(|d| ImageDimensions {
                    width: d.width(),
                    height: d.height(),
                    aspect_ratio: derive::aspect_ratio(&d),
                }),
            }),
            ContentVariant::Link {
                url,
                title,
                description,
            } => PostContent::Link(LinkContent {
                url,
                title,
                description,
            }),
        }
    }
}

// --- Input types ---

/// Exclusive-choice content input: exactly one of the fields must be set.
#[derive(InputObject, Clone, Debug)]
pub struct PostContentInput {
    pub text: Option<TextContentInput>,
    pub image: Option<ImageContentInput>,
    pub link: Option<LinkContentInput>,
}

#[derive(InputObject, Clone, Debug)]
pub struct TextContentInput {
    pub body: String,
    pub format: Option<TextFormat>,
}

#[derive(InputObject, Clone, Debug)]
pub struct ImageContentInput {
    pub url: String,
    pub caption: Option<String>,
    pub dimensions: Option<ImageDimensionsInput>,
}

#[derive(InputObject, Clone, Debug)]
pub struct ImageDimensionsInput {
    pub width: i32,
    pub height: i32,
}

#[derive(InputObject, Clone, Debug)]
pub struct LinkContentInput {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
}

impl PostContentInput {
    /// Enforce the single-selection contract, then construct the validated
    /// variant. Selection is checked before any field validation, so zero or
    /// multiple selections fail identically whether or not the populated
    /// payloads are themselves valid.
    pub fn into_variant(self) -> Result<ContentVariant, ContentError> {
        match (self.text, self.image, self.link) {
            (Some(text), None, None) => Ok(text.into_variant()),
            (None, Some(image), None) => image.into_variant(),
            (None, None, Some(link)) => Ok(link.into_variant()),
            (None, None, None) => Err(ContentError::VariantRequired),
            _ => Err(ContentError::AmbiguousVariant),
        }
    }
}

impl TextContentInput {
    fn into_variant(self) -> ContentVariant {
        ContentVariant::Text {
            body: self.body,
            format: self.format.unwrap_or_default(),
        }
    }
}

impl ImageContentInput {
    fn into_variant(self) -> Result<ContentVariant, ContentError> {
        let dimensions = match self.dimensions {
            Some(d) => Some(crate::content::ImageDimensions::new(d.width, d.height)?),
            None => None,
        };
        Ok(ContentVariant::Image {
            url: self.url,
            caption: self.caption,
            dimensions,
        })
    }
}

impl LinkContentInput {
    fn into_variant(self) -> ContentVariant {
        ContentVariant::Link {
            url: self.url,
            title: self.title,
            description: self.description,
        }
    }
}

// --- Post ---

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: PostContent,
    pub user_id: i64,
    pub created_at: String,
}

#[ComplexObject]
impl Post {
    /// The user who owns this post.
    async fn author(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let user = user_repo::find_user_by_id(pool, self.user_id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Ok(user.map(User::from))
    }
}

impl Post {
    /// Decode a stored row into the output shape. Derived fields are computed
    /// here, at read time, never persisted. A row whose content fails
    /// re-validation is reported as corrupt and logged.
    pub fn from_record(record: PostRecord) -> Result<Self, AppError> {
        let variant = codec::decode(&record.content_json).map_err(|err| {
            error!(post_id = record.id, error = %err, "stored post content failed validation");
            err
        })?;

        Ok(Self {
            id: record.id,
            title: record.title,
            content: variant.into(),
            user_id: record.user_id,
            created_at: record.created_at.to_rfc3339(),
        })
    }
}

// --- Query ---

#[derive(Default)]
pub struct ContentQuery;

#[Object]
impl ContentQuery {
    async fn posts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let records = post_repo::list_posts(pool)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        records
            .into_iter()
            .map(Post::from_record)
            .collect::<Result<Vec<_>, AppError>>()
            .map_err(|e| e.extend())
    }

    async fn post(&self, ctx: &Context<'_>, id: i64) -> GraphQLResult<Option<Post>> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let record = post_repo::find_post_by_id(pool, id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        match record {
            Some(record) => Ok(Some(Post::from_record(record).map_err(|e| e.extend())?)),
            None => Ok(None),
        }
    }
}

// --- Mutation ---

#[derive(InputObject, Clone, Debug)]
pub struct CreatePostInput {
    pub title: String,
    pub content: PostContentInput,
    pub user_id: i64,
}

#[derive(InputObject, Clone, Debug)]
pub struct UpdatePostInput {
    pub id: i64,
    pub title: Option<String>,
    /// Replaces the stored content wholesale when set.
    pub content: Option<PostContentInput>,
}

#[derive(Default)]
pub struct ContentMutation;

#[Object]
impl ContentMutation {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        input: CreatePostInput,
    ) -> GraphQLResult<Post> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        // Validate before anything touches storage: an invalid write is
        // rejected, never auto-corrected.
        let variant = input
            .content
            .into_variant()
            .map_err(|e| AppError::from(e).extend())?;

        let owner = user_repo::find_user_by_id(pool, input.user_id)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        if owner.is_none() {
            return Err(AppError::NotFound(format!("user {}", input.user_id)).extend());
        }

        let encoded = codec::encode(&variant);
        let record = post_repo::create_post(pool, &input.title, &encoded, input.user_id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Post::from_record(record).map_err(|e| e.extend())
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        input: UpdatePostInput,
    ) -> GraphQLResult<Post> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let encoded = match input.content {
            Some(content) => {
                let variant = content
                    .into_variant()
                    .map_err(|e| AppError::from(e).extend())?;
                Some(codec::encode(&variant))
            }
            None => None,
        };

        let record = post_repo::update_post(pool, input.id, input.title.as_deref(), encoded.as_deref())
            .await
            .map_err(|e| AppError::from(e).extend())?
            .ok_or_else(|| AppError::NotFound(format!("post {}", input.id)).extend())?;

        Post::from_record(record).map_err(|e| e.extend())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: i64) -> GraphQLResult<bool> {
        let pool = ctx
            .data::<SqlitePool>()
            .map_err(|_| "Database pool not available")?;

        let deleted = post_repo::delete_post(pool, id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Ok(deleted)
    }
}

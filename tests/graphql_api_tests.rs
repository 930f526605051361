//! End-to-end API tests.
//!
//! Each test drives the full stack, from GraphQL execution through content
//! validation and the storage codec down to the repositories, against its own
//! in-memory SQLite database. The pool is capped at one connection so every
//! statement sees the same in-memory database.

use async_graphql::{Request, Variables};
use serde_json::{json, Value};

use microblog::config::GraphQLConfig;
use microblog::db::{self, post_repo};
use microblog::schema::{build_schema, AppSchema};

const CONTENT_FRAGMENT: &str = r#"
    __typename
    ... on TextContent { body format wordCount }
    ... on ImageContent { url caption dimensions { width height aspectRatio } }
    ... on LinkContent { url title description }
"#;

fn create_post_mutation() -> String {
    format!(
        r#"
        mutation CreatePost($input: CreatePostInput!) {{
            createPost(input: $input) {{
                id
                title
                content {{ {CONTENT_FRAGMENT} }}
                userId
            }}
        }}
        "#
    )
}

async fn setup() -> (AppSchema, sqlx::SqlitePool) {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory pool");
    db::init_db(&pool).await.expect("schema init");
    let schema = build_schema(pool.clone(), &GraphQLConfig::default());
    (schema, pool)
}

async fn execute(schema: &AppSchema, query: &str) -> Value {
    let resp = schema.execute(query).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    resp.data.into_json().expect("json data")
}

async fn execute_with_vars(schema: &AppSchema, query: &str, vars: Value) -> async_graphql::Response {
    schema
        .execute(Request::new(query).variables(Variables::from_json(vars)))
        .await
}

async fn create_user(schema: &AppSchema, name: &str) -> i64 {
    let data = execute(
        schema,
        &format!(r#"mutation {{ createUser(input: {{ name: "{name}" }}) {{ id name }} }}"#),
    )
    .await;
    data["createUser"]["id"].as_i64().expect("user id")
}

fn error_codes(resp: &async_graphql::Response) -> Vec<String> {
    serde_json::to_value(&resp.errors)
        .expect("serializable errors")
        .as_array()
        .expect("error list")
        .iter()
        .filter_map(|e| e["extensions"]["code"].as_str().map(str::to_string))
        .collect()
}

// --- User queries ---

#[tokio::test]
async fn list_users_empty() {
    let (schema, _pool) = setup().await;
    let data = execute(&schema, "{ users { id name } }").await;
    assert_eq!(data["users"], json!([]));
}

#[tokio::test]
async fn create_user_returns_id_and_name() {
    let (schema, _pool) = setup().await;
    let data = execute(
        &schema,
        r#"mutation { createUser(input: { name: "Alice" }) { id name } }"#,
    )
    .await;
    assert_eq!(data["createUser"]["name"], "Alice");
    assert!(data["createUser"]["id"].is_i64());
}

#[tokio::test]
async fn get_user_by_id() {
    let (schema, _pool) = setup().await;
    let id = create_user(&schema, "Bob").await;

    let data = execute(&schema, &format!("{{ user(id: {id}) {{ id name }} }}")).await;
    assert_eq!(data["user"]["name"], "Bob");
}

#[tokio::test]
async fn get_user_not_found_is_null() {
    let (schema, _pool) = setup().await;
    let data = execute(&schema, "{ user(id: 999) { id name } }").await;
    assert_eq!(data["user"], Value::Null);
}

// --- Creating posts, one variant at a time ---

#[tokio::test]
async fn create_text_post() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "My Article",
                "content": {"text": {"body": "Hello world", "format": "MARKDOWN"}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);

    let data = resp.data.into_json().unwrap();
    let post = &data["createPost"];
    assert_eq!(post["title"], "My Article");
    assert_eq!(post["userId"], user_id);
    assert_eq!(post["content"]["__typename"], "TextContent");
    assert_eq!(post["content"]["body"], "Hello world");
    assert_eq!(post["content"]["format"], "MARKDOWN");
    assert_eq!(post["content"]["wordCount"], 2);
}

#[tokio::test]
async fn text_post_format_defaults_to_plain() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Plain text",
                "content": {"text": {"body": "Just text"}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);

    let data = resp.data.into_json().unwrap();
    assert_eq!(data["createPost"]["content"]["format"], "PLAIN");
}

#[tokio::test]
async fn create_image_post_without_dimensions() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Photo",
                "content": {"image": {"url": "https://example.com/img.png", "caption": "Nice view"}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);

    let data = resp.data.into_json().unwrap();
    let content = &data["createPost"]["content"];
    assert_eq!(content["__typename"], "ImageContent");
    assert_eq!(content["url"], "https://example.com/img.png");
    assert_eq!(content["caption"], "Nice view");
    assert_eq!(content["dimensions"], Value::Null);
}

#[tokio::test]
async fn create_image_post_with_dimensions() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "HD Photo",
                "content": {
                    "image": {
                        "url": "https://example.com/hd.png",
                        "dimensions": {"width": 1920, "height": 1080},
                    }
                },
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);

    let data = resp.data.into_json().unwrap();
    let content = &data["createPost"]["content"];
    assert_eq!(content["__typename"], "ImageContent");
    assert_eq!(content["caption"], Value::Null);
    assert_eq!(
        content["dimensions"],
        json!({"width": 1920, "height": 1080, "aspectRatio": "16:9"})
    );
}

#[tokio::test]
async fn create_link_post() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Cool link",
                "content": {
                    "link": {
                        "url": "https://example.com",
                        "title": "Example",
                        "description": "An example site",
                    }
                },
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);

    let data = resp.data.into_json().unwrap();
    let content = &data["createPost"]["content"];
    assert_eq!(content["__typename"], "LinkContent");
    assert_eq!(content["url"], "https://example.com");
    assert_eq!(content["title"], "Example");
    assert_eq!(content["description"], "An example site");
}

// --- Exclusive-choice contract ---

#[tokio::test]
async fn multiple_content_fields_rejected_and_nothing_persisted() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Bad post",
                "content": {
                    "text": {"body": "Hello"},
                    "image": {"url": "https://example.com/img.png"},
                },
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(!resp.errors.is_empty());
    assert_eq!(error_codes(&resp), vec!["AMBIGUOUS_VARIANT"]);

    let data = execute(&schema, "{ posts { id } }").await;
    assert_eq!(data["posts"], json!([]));
}

#[tokio::test]
async fn empty_content_choice_rejected() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Bad post",
                "content": {},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(!resp.errors.is_empty());
    assert_eq!(error_codes(&resp), vec!["VARIANT_REQUIRED"]);
}

#[tokio::test]
async fn missing_required_field_rejected() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    // `body` is non-null in the schema, so coercion itself rejects this.
    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Bad post",
                "content": {"text": {}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(!resp.errors.is_empty());

    let data = execute(&schema, "{ posts { id } }").await;
    assert_eq!(data["posts"], json!([]));
}

#[tokio::test]
async fn non_positive_dimensions_rejected() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Bad image",
                "content": {
                    "image": {
                        "url": "https://example.com/img.png",
                        "dimensions": {"width": 0, "height": 1080},
                    }
                },
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(!resp.errors.is_empty());
    assert_eq!(error_codes(&resp), vec!["VALIDATION"]);
    assert!(resp.errors[0].message.contains("dimensions.width"));
}

#[tokio::test]
async fn create_post_for_unknown_user_rejected() {
    let (schema, _pool) = setup().await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Orphan",
                "content": {"text": {"body": "Hi"}},
                "userId": 999,
            }
        }),
    )
    .await;
    assert!(!resp.errors.is_empty());
    assert_eq!(error_codes(&resp), vec!["NOT_FOUND"]);
}

// --- Reading stored content ---

#[tokio::test]
async fn created_posts_read_back_through_the_query_path() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    for (title, content) in [
        ("Text", json!({"text": {"body": "Hello world"}})),
        (
            "Image",
            json!({
                "image": {
                    "url": "https://x/i.png",
                    "dimensions": {"width": 1920, "height": 1080},
                }
            }),
        ),
    ] {
        let resp = execute_with_vars(
            &schema,
            &create_post_mutation(),
            json!({"input": {"title": title, "content": content, "userId": user_id}}),
        )
        .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
    }

    let data = execute(
        &schema,
        &format!("{{ posts {{ title content {{ {CONTENT_FRAGMENT} }} }} }}"),
    )
    .await;
    let posts = data["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);

    let text = &posts[0]["content"];
    assert_eq!(text["__typename"], "TextContent");
    assert_eq!(text["format"], "PLAIN");
    assert_eq!(text["wordCount"], 2);

    let image = &posts[1]["content"];
    assert_eq!(image["__typename"], "ImageContent");
    assert_eq!(image["caption"], Value::Null);
    assert_eq!(image["dimensions"]["aspectRatio"], "16:9");
}

#[tokio::test]
async fn list_posts_returns_typed_content() {
    let (schema, pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    // Seed the row directly, the way an earlier writer would have.
    post_repo::create_post(
        &pool,
        "Text post",
        r#"{"type": "text", "body": "Hi", "format": "plain"}"#,
        user_id,
    )
    .await
    .unwrap();

    let data = execute(
        &schema,
        &format!("{{ posts {{ id title content {{ {CONTENT_FRAGMENT} }} }} }}"),
    )
    .await;
    let posts = data["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["content"]["__typename"], "TextContent");
    assert_eq!(posts[0]["content"]["body"], "Hi");
    assert_eq!(posts[0]["content"]["wordCount"], 1);
}

#[tokio::test]
async fn legacy_row_without_format_reads_as_plain() {
    let (schema, pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    post_repo::create_post(
        &pool,
        "Old row",
        r#"{"type": "text", "body": "Hi"}"#,
        user_id,
    )
    .await
    .unwrap();

    let data = execute(
        &schema,
        &format!("{{ posts {{ content {{ {CONTENT_FRAGMENT} }} }} }}"),
    )
    .await;
    assert_eq!(data["posts"][0]["content"]["format"], "PLAIN");
}

#[tokio::test]
async fn corrupt_stored_content_surfaces_as_error() {
    let (schema, pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    post_repo::create_post(
        &pool,
        "Bad row",
        r#"{"type": "video", "url": "https://example.com/v.mp4"}"#,
        user_id,
    )
    .await
    .unwrap();

    let resp = execute_with_vars(
        &schema,
        &format!("{{ posts {{ content {{ {CONTENT_FRAGMENT} }} }} }}"),
        json!({}),
    )
    .await;
    assert!(!resp.errors.is_empty());
    assert_eq!(error_codes(&resp), vec!["CORRUPT_CONTENT"]);
}

#[tokio::test]
async fn post_by_id_and_author() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "First",
                "content": {"text": {"body": "a"}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);
    let post_id = resp.data.into_json().unwrap()["createPost"]["id"]
        .as_i64()
        .unwrap();

    let data = execute(
        &schema,
        &format!("{{ post(id: {post_id}) {{ title author {{ id name }} }} }}"),
    )
    .await;
    assert_eq!(data["post"]["title"], "First");
    assert_eq!(data["post"]["author"]["name"], "Alice");

    let data = execute(&schema, "{ post(id: 999) { id } }").await;
    assert_eq!(data["post"], Value::Null);
}

// --- User ↔ post relation ---

#[tokio::test]
async fn user_lists_their_posts() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    for (title, content) in [
        ("First", json!({"text": {"body": "a"}})),
        ("Second", json!({"image": {"url": "https://example.com/x.png"}})),
    ] {
        let resp = execute_with_vars(
            &schema,
            &create_post_mutation(),
            json!({"input": {"title": title, "content": content, "userId": user_id}}),
        )
        .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
    }

    let data = execute(
        &schema,
        &format!(
            "{{ user(id: {user_id}) {{ name posts {{ title content {{ {CONTENT_FRAGMENT} }} }} }} }}"
        ),
    )
    .await;
    assert_eq!(data["user"]["name"], "Alice");
    let posts = data["user"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    let titles: std::collections::HashSet<&str> = posts
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["First", "Second"].into_iter().collect());
}

#[tokio::test]
async fn user_with_no_posts_has_empty_list() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Bob").await;

    let data = execute(
        &schema,
        &format!("{{ user(id: {user_id}) {{ name posts {{ id title }} }} }}"),
    )
    .await;
    assert_eq!(data["user"]["posts"], json!([]));
}

#[tokio::test]
async fn deleting_a_user_deletes_their_posts() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Doomed",
                "content": {"text": {"body": "bye"}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);

    let data = execute(
        &schema,
        &format!("mutation {{ deleteUser(id: {user_id}) }}"),
    )
    .await;
    assert_eq!(data["deleteUser"], true);

    let data = execute(&schema, "{ users { id } posts { id } }").await;
    assert_eq!(data["users"], json!([]));
    assert_eq!(data["posts"], json!([]));
}

// --- Updating and deleting posts ---

#[tokio::test]
async fn update_post_replaces_content_wholesale() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Mutable",
                "content": {"text": {"body": "Hello world"}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);
    let post_id = resp.data.into_json().unwrap()["createPost"]["id"]
        .as_i64()
        .unwrap();

    let resp = execute_with_vars(
        &schema,
        &format!(
            r#"
            mutation UpdatePost($input: UpdatePostInput!) {{
                updatePost(input: $input) {{
                    title
                    content {{ {CONTENT_FRAGMENT} }}
                }}
            }}
            "#
        ),
        json!({
            "input": {
                "id": post_id,
                "content": {
                    "image": {
                        "url": "https://example.com/new.png",
                        "dimensions": {"width": 100, "height": 100},
                    }
                },
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);

    let data = resp.data.into_json().unwrap();
    assert_eq!(data["updatePost"]["title"], "Mutable");
    assert_eq!(data["updatePost"]["content"]["__typename"], "ImageContent");
    assert_eq!(
        data["updatePost"]["content"]["dimensions"]["aspectRatio"],
        "1:1"
    );
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
    let (schema, _pool) = setup().await;

    let resp = execute_with_vars(
        &schema,
        r#"mutation { updatePost(input: { id: 999, title: "nope" }) { id } }"#,
        json!({}),
    )
    .await;
    assert!(!resp.errors.is_empty());
    assert_eq!(error_codes(&resp), vec!["NOT_FOUND"]);
}

#[tokio::test]
async fn delete_post_removes_the_row() {
    let (schema, _pool) = setup().await;
    let user_id = create_user(&schema, "Alice").await;

    let resp = execute_with_vars(
        &schema,
        &create_post_mutation(),
        json!({
            "input": {
                "title": "Short lived",
                "content": {"link": {"url": "https://example.com", "title": "Example"}},
                "userId": user_id,
            }
        }),
    )
    .await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);
    let post_id = resp.data.into_json().unwrap()["createPost"]["id"]
        .as_i64()
        .unwrap();

    let data = execute(&schema, &format!("mutation {{ deletePost(id: {post_id}) }}")).await;
    assert_eq!(data["deletePost"], true);

    let data = execute(&schema, "{ posts { id } }").await;
    assert_eq!(data["posts"], json!([]));

    // Deleting again reports that nothing was there.
    let data = execute(&schema, &format!("mutation {{ deletePost(id: {post_id}) }}")).await;
    assert_eq!(data["deletePost"], false);
}

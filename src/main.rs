use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use tracing::info;
use tracing_subscriber::prelude::*;

use microblog::config::Config;
use microblog::db;
use microblog::schema::{build_schema, AppSchema};

async fn graphql_handler(schema: web::Data<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn health_handler() -> &'static str {
    "ok"
}

/// SDL (Schema Definition Language) endpoint for documentation and client
/// code generation.
async fn schema_handler(schema: web::Data<AppSchema>) -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(schema.sdl())
}

async fn playground_handler() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,microblog=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true),
        )
        .init();

    info!("Starting microblog API...");

    let config = Config::from_env()?;

    let pool = db::connect(&config.database.url, config.database.max_connections).await?;
    db::init_db(&pool).await?;
    info!(url = %config.database.url, "Database ready");

    let schema = build_schema(pool, &config.graphql);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("GraphQL API starting on http://{}", bind_addr);

    let playground = config.graphql.playground;
    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(schema.clone()))
            .route("/graphql", web::post().to(graphql_handler))
            .route("/schema", web::get().to(schema_handler))
            .route("/health", web::get().to(health_handler));

        if playground {
            app = app.route("/playground", web::get().to(playground_handler));
        }

        app
    })
    .workers(config.server.workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}

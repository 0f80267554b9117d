//! LivePage - a link-in-bio page publishing service

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use livepage::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxPageRepository, SqlxPostRepository, SqlxVerifiedUserRepository},
    },
    services::{GoogleAgeVerifier, KeywordClassifier, PageRenderer, PageService, PostService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "livepage=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LivePage...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let page_repo = Arc::new(SqlxPageRepository::new(pool.clone()));
    let post_repo = Arc::new(SqlxPostRepository::new(pool.clone()));
    let verified_user_repo = Arc::new(SqlxVerifiedUserRepository::new(pool.clone()));

    // Wire services
    let classifier = Arc::new(KeywordClassifier);
    let age_verifier = Arc::new(GoogleAgeVerifier::new(config.oauth.clone()));
    let page_service = Arc::new(PageService::new(
        page_repo,
        verified_user_repo,
        classifier,
        age_verifier,
        config.pages.clone(),
    ));
    let post_service = Arc::new(PostService::new(post_repo));
    let renderer = Arc::new(PageRenderer::new()?);

    let state = AppState {
        page_service,
        post_service,
        renderer,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

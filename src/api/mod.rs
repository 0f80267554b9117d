//! API layer - HTTP handlers and routing
//!
//! Endpoint names mirror the public contract:
//! - POST /createPage
//! - POST /updatePage
//! - GET  /explore
//! - POST /savePost
//! - GET  /getPosts
//! - GET  /getPage and GET /l/{slug} (HTML views)

pub mod error;
pub mod pages;
pub mod posts;
pub mod view;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

use crate::services::{PageRenderer, PageService, PostService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub page_service: Arc<PageService>,
    pub post_service: Arc<PostService>,
    pub renderer: Arc<PageRenderer>,
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/createPage", post(pages::create_page))
        .route("/updatePage", post(pages::update_page))
        .route("/explore", get(pages::explore))
        .route("/savePost", post(posts::save_post))
        .route("/getPosts", get(posts::get_posts))
        .route("/getPage", get(view::get_page))
        .route("/l/{slug}", get(view::page_by_slug))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use async_trait::async_trait;
    use axum_test::TestServer;

    use super::*;
    use crate::config::PagesConfig;
    use crate::db::repositories::{
        SqlxPageRepository, SqlxPostRepository, SqlxVerifiedUserRepository,
    };
    use crate::db::{create_test_pool, run_migrations};
    use crate::services::age::{AgeCredential, AgeVerification, AgeVerifier};
    use crate::services::KeywordClassifier;

    /// Verifier accepting any credential, attributed to a fixed email.
    pub struct AcceptAllVerifier;

    #[async_trait]
    impl AgeVerifier for AcceptAllVerifier {
        async fn verify(&self, _credential: &AgeCredential) -> anyhow::Result<AgeVerification> {
            Ok(AgeVerification {
                eligible: true,
                email: Some("adult@example.com".to_string()),
            })
        }
    }

    pub async fn test_server() -> TestServer {
        test_server_with_policy(PagesConfig::default()).await
    }

    pub async fn test_server_with_policy(policy: PagesConfig) -> TestServer {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let page_service = PageService::new(
            Arc::new(SqlxPageRepository::new(pool.clone())),
            Arc::new(SqlxVerifiedUserRepository::new(pool.clone())),
            Arc::new(KeywordClassifier),
            Arc::new(AcceptAllVerifier),
            policy,
        );
        let post_service = PostService::new(Arc::new(SqlxPostRepository::new(pool)));

        let state = AppState {
            page_service: Arc::new(page_service),
            post_service: Arc::new(post_service),
            renderer: Arc::new(PageRenderer::new().unwrap()),
        };

        TestServer::new(build_router(state, "http://localhost:3000")).unwrap()
    }
}

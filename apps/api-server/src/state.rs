//! Application state - shared across all handlers.

use std::sync::Arc;

use gazette_core::ports::{CategoryRepository, PostRepository};
use gazette_infra::{DatabaseConfig, InMemoryCategoryRepository, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use gazette_infra::{PostgresCategoryRepository, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
}

impl AppState {
    /// State backed by the in-memory repositories.
    pub fn in_memory() -> Self {
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new(categories.clone()));
        Self { posts, categories }
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(config) = db_config {
            match gazette_infra::database::connect(config).await {
                Ok(conn) => {
                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                        categories: Arc::new(PostgresCategoryRepository::new(conn)),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        }

        #[cfg(not(feature = "postgres"))]
        let _ = db_config;

        tracing::warn!("Database not configured or unreachable - using in-memory repositories");
        Self::in_memory()
    }
}

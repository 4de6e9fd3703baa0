//! # Web API Application State

use std::sync::Arc;

use sqlx::PgPool;

use super::auth::{AuthError, JwtAuthenticator};
use crate::config::QbankConfig;
use crate::paper::FsImageSource;

/// Shared state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<QbankConfig>,
    pub db_pool: PgPool,
    pub authenticator: Arc<JwtAuthenticator>,
    pub images: Arc<FsImageSource>,
}

impl AppState {
    pub fn new(config: QbankConfig, db_pool: PgPool) -> Result<Self, AuthError> {
        let authenticator = JwtAuthenticator::from_config(&config.auth)?;
        let images = FsImageSource::new(config.media.root_dir.clone());

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            authenticator: Arc::new(authenticator),
            images: Arc::new(images),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.db_pool
    }
}

//! API Gateway service - HTTP listener lifecycle.

use crate::auth::{HmacHasher, SessionKeys};
use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::router::{build_router, AppState};
use axum::Router;
use shared_types::Clock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use ur_02_rating_engine::RatingApi;
use ur_03_profile_reader::ProfileReader;
use ur_04_profile_store::AccountStore;

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl ApiGatewayService {
    /// Validates `config` and builds the session and credential machinery
    /// from it.
    pub fn new(
        config: GatewayConfig,
        accounts: Arc<dyn AccountStore>,
        reader: Arc<ProfileReader>,
        ratings: Arc<dyn RatingApi>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        let sessions = Arc::new(SessionKeys::new(
            &config.session.key,
            config.session.lifetime,
        )?);
        let hasher = Arc::new(HmacHasher::new(config.session.hash_iterations));

        let state = AppState {
            accounts,
            reader,
            ratings,
            sessions,
            hasher,
            clock,
        };
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Router with every route and layer attached.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config.cors)
    }

    /// Serves until `shutdown` turns true, then drains in-flight requests.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        info!(addr = %addr, "[ur-05] HTTP server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                while !*shutdown.borrow() {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await
            .map_err(GatewayError::Serve)?;

        info!("[ur-05] HTTP server stopped");
        Ok(())
    }
}

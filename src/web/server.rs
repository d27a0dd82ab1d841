//! Web server for secureshare.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{Config, SweeperConfig};
use crate::db::Database;
use crate::file::{BlobStore, Sweeper};
use crate::{Result, ShareError};

use super::handlers::AppState;
use super::router::create_app;

/// Web server for the file API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
    /// Sweeper settings.
    sweeper: SweeperConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Arc<Database>, storage: Arc<dyn BlobStore>) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| ShareError::Config(format!("invalid server address: {e}")))?;

        let app_state =
            AppState::new(db, storage).with_max_upload_size(config.storage.max_upload_size_bytes());

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins: config.server.cors_origins.clone(),
            sweeper: config.sweeper.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the expired-file sweeper in the background.
    fn start_sweeper_task(&self) {
        if !self.sweeper.enabled {
            tracing::info!("Sweeper disabled");
            return;
        }

        let sweeper = Sweeper::new(self.app_state.db.clone(), self.app_state.storage.clone())
            .with_interval(self.sweeper.interval_secs);
        tokio::spawn(sweeper.run());
    }

    /// Prepare storage, bind the listener and start the sweeper.
    async fn bind(self) -> Result<(TcpListener, Router)> {
        self.app_state.storage.ensure_root_exists()?;

        let listener = TcpListener::bind(self.addr).await?;

        // Start the sweeper only after a successful bind
        self.start_sweeper_task();

        let router = create_app(self.app_state, &self.cors_origins);
        Ok((listener, router))
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

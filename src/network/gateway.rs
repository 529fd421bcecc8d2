//! Gateway - WebSocket listener that accepts incoming connections.
//!
//! The Gateway binds a TCP socket and serves a single route. `GET /` with
//! upgrade headers becomes a WebSocket and gets its own [`Connection`] task;
//! a plain `GET /` answers the liveness check.

use crate::config::ListenConfig;
use crate::network::Connection;
use crate::state::{ConnectionIdGenerator, Registry};
use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Body of the health check response.
const HEALTH_BODY: &str = "sigrelay is running";

/// Shared by every request handler.
#[derive(Clone)]
struct GatewayState {
    listen: Arc<ListenConfig>,
    registry: Arc<Registry>,
    ids: Arc<ConnectionIdGenerator>,
    shutdown: CancellationToken,
}

/// The Gateway accepts incoming WebSocket connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    listen: ListenConfig,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(listen: ListenConfig, registry: Arc<Registry>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(listen.address).await?;
        info!(address = %listener.local_addr()?, "WebSocket listener bound");
        Ok(Self {
            listener,
            listen,
            registry,
        })
    }

    /// Address actually bound (differs from the configured one for port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway until `shutdown` is cancelled.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let state = GatewayState {
            listen: Arc::new(self.listen),
            registry: Arc::clone(&self.registry),
            ids: Arc::new(ConnectionIdGenerator::new()),
            shutdown: shutdown.clone(),
        };
        let app = Router::new().route("/", get(root)).with_state(state);

        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

        info!(registered = self.registry.len(), "Gateway stopped");
        Ok(())
    }
}

/// GET /
///
/// Upgrades to WebSocket when asked to, otherwise answers the health check.
async fn root(
    ws: Option<WebSocketUpgrade>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    State(state): State<GatewayState>,
) -> Response {
    let Some(ws) = ws else {
        return (StatusCode::OK, HEALTH_BODY).into_response();
    };

    let origin = headers.get(header::ORIGIN).and_then(|o| o.to_str().ok());
    if !state.listen.origin_allowed(origin) {
        warn!(%addr, origin = ?origin, "WebSocket CORS rejected");
        return (StatusCode::FORBIDDEN, "CORS origin not allowed").into_response();
    }

    let id = state.ids.next();
    info!(%addr, conn = %id, "WebSocket connection attempt");

    ws.on_failed_upgrade(move |e| warn!(%addr, error = %e, "WebSocket handshake failed"))
        .on_upgrade(move |socket| {
            Connection::new(id, addr, state.registry, socket, state.shutdown).run()
        })
}

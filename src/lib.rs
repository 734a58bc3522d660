pub mod api;
pub mod app_state;
pub mod clock;
pub mod config;
pub mod error;
pub mod inventory;
pub mod link;

use axum::Router;
use axum::body::Body;
use axum::extract::Extension;
use axum::http::Request;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

//
// Re-export
//
pub use api::{generate_link, log_request_errors, ping, redeem_link};
pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::ConfigError;
pub use inventory::{InventoryAdjuster, InventoryError, ShopifyClient};
pub use link::{
    Adjustment, Claims, Direction, IssuedLink, LinkError, LinkRequest, LinkSigner, PresentedLink,
    TargetId, Token, UsageError, verify_link,
};

/// All routes of the service over the given state
pub fn router(state: AppState) -> Router {
    // Spans carry the path only; link query strings contain signatures.
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        info_span!("request", method = %req.method(), path = %req.uri().path())
    });

    Router::new()
        .route("/gen", get(generate_link))
        .route("/adjust", get(redeem_link))
        .route("/ping", get(ping))
        .layer(axum::middleware::from_fn(api::log_request_errors))
        .layer(trace)
        .layer(Extension(state))
}

/// Serve on an already bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Build state from configuration, bind and serve until the server stops.
///
/// Configuration errors surface here, before anything is bound.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;

    let addr = format!("0.0.0.0:{}", config.listen_on_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");

    serve(listener, state).await?;
    Ok(())
}

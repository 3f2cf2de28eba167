use std::net::SocketAddr;

use axum::{Router, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::{CompressionLevel, compression::CompressionLayer};

use crate::{api, context::SharedContext, error::StartupError, info, success, warning};

pub fn router(ctx: SharedContext) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/NowPlaying", get(api::now_playing).options(api::preflight))
        .route(&ctx.session.login_path(), get(api::login))
        .route(api::CALLBACK_PATH, get(api::callback))
        .layer(middleware::map_response(api::cors))
        .layer(CompressionLayer::new().quality(CompressionLevel::Best))
        .with_state(ctx)
}

/// Serves the API on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, ctx: SharedContext) -> std::io::Result<()> {
    let app = router(ctx).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub async fn start_api_server(ctx: SharedContext) -> Result<(), StartupError> {
    let addr = ctx.config.server_address;
    let listener = TcpListener::bind(&addr).await?;
    success!("Listening on http://{}", listener.local_addr()?);

    serve(listener, ctx).await?;
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires.
///
/// A signal source that fails never resolves, so a missing Ctrl-C handler
/// keeps the server up instead of stopping it right after start.
pub async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warning!("Cannot listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

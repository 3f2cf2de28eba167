use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{api, context::SharedContext, info};

/// Starts the consent flow.
///
/// Hands out the admin cookie, binds the session to the caller IP and
/// redirects to Spotify's consent page.
pub async fn login(
    State(ctx): State<SharedContext>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let ip = api::client_ip(&ctx, &headers, addr);
    ctx.session.bind_ip(&ip).await;

    let auth_url = ctx
        .spotify
        .build_authorization_url(&api::callback_uri(&ctx, &headers));
    info!("Admin session started from {}", ip);

    (
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, auth_url),
            (header::SET_COOKIE, ctx.session.set_cookie_header()),
        ],
    )
        .into_response()
}

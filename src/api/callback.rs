use std::{collections::HashMap, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::{api, context::SharedContext, poller, success, utils, warning};

pub const SUCCESS_TEXT: &str = "Successfully Set Refresh Token";

fn failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "message": message,
        })),
    )
        .into_response()
}

/// Completes the consent flow.
///
/// The new refresh token is only made live after it produced a valid player
/// fetch and was written to disk. Any rejection leaves the current token in
/// place.
pub async fn callback(
    State(ctx): State<SharedContext>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let ip = api::client_ip(&ctx, &headers, addr);
    let cookie = api::cookie_value(&headers, ctx.session.cookie_name());
    if !ctx.session.is_authorized(cookie.as_deref(), &ip).await {
        warning!("Rejected admin callback from {}", ip);
        return StatusCode::BAD_REQUEST.into_response();
    }

    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let callback_uri = api::callback_uri(&ctx, &headers);
    let token = match ctx
        .spotify
        .exchange_authorization_code(code, &callback_uri)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return failure(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let snapshot = match ctx.fetch_snapshot_with(&token).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            poller::report_failure(&e);
            return failure(
                StatusCode::FAILED_DEPENDENCY,
                "Failed to generate valid refresh token. Try again!".to_string(),
            );
        }
    };

    if let Err(e) = ctx.tokens.replace(token).await {
        warning!("Failed to save refresh token: {}", e);
        return failure(StatusCode::BAD_REQUEST, e.to_string());
    }
    ctx.playback.apply(snapshot, utils::now_millis()).await;

    success!("Successfully updated refresh token by request from {}", ip);
    SUCCESS_TEXT.into_response()
}

use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::context::SharedContext;

pub async fn health(State(ctx): State<SharedContext>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": ctx.tokens.has_refresh_token().await,
    }))
}

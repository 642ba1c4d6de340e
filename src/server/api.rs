//! JSON endpoints backing the palette, contact form and music widget

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::ServerState;
use crate::contact::{ContactForm, MailError};
use crate::music;
use crate::palette::PaletteView;

#[derive(Debug, Default, Deserialize)]
pub(super) struct PaletteQuery {
    #[serde(default)]
    q: String,
}

/// `GET /api/palette?q=`
pub(super) async fn palette(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PaletteQuery>,
) -> Response {
    let commands = state.commands.borrow().clone();
    let view = PaletteView::search(&commands, &query.q);
    Json(view).into_response()
}

/// `POST /api/contact`
pub(super) async fn contact(
    State(state): State<Arc<ServerState>>,
    Json(form): Json<ContactForm>,
) -> Response {
    match state.mailer.send(&form).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(MailError::Invalid(errors)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
        }
        Err(e @ MailError::NotConfigured(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Contact delivery failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Failed to send message. Please try again later." })),
            )
                .into_response()
        }
    }
}

/// `GET /api/music/next`
pub(super) async fn music_next(State(state): State<Arc<ServerState>>) -> Response {
    match music::pick_random(&state.songs) {
        Some(song) => Json(song.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No songs configured" })),
        )
            .into_response(),
    }
}

//! HTTP surface: health check and webhook receiver

use crate::clients::ClientProvider;
use crate::handler::handle_pull_request;
use crate::webhook::{
    verify_signature, PullRequestPayload, DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER,
};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use nugget_config::BotSettings;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared state of the webhook server
pub struct AppState {
    /// Source of GitHub clients
    pub clients: Arc<dyn ClientProvider>,
    /// Lockfile detection settings
    pub settings: BotSettings,
    /// Webhook secret; signatures are not checked when unset
    pub webhook_secret: Option<String>,
}

/// Why a webhook delivery was rejected
#[derive(Debug)]
pub enum WebhookError {
    /// The signature header is missing or does not match the secret
    Unauthorized,
    /// The event header is missing or the payload is malformed
    BadRequest(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            WebhookError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "invalid signature").into_response()
            }
            WebhookError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        }
    }
}

/// Build the router: `GET /healthcheck`, `POST /webhook`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve until ctrl-c
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "nugget listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn healthcheck() -> &'static str {
    "OK"
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    let delivery = header(&headers, DELIVERY_HEADER).unwrap_or("-").to_string();

    if let Some(secret) = &state.webhook_secret {
        if !verify_signature(secret.as_bytes(), &body, header(&headers, SIGNATURE_HEADER)) {
            warn!(%delivery, "rejected delivery with bad signature");
            return Err(WebhookError::Unauthorized);
        }
    }

    let event = header(&headers, EVENT_HEADER)
        .ok_or_else(|| WebhookError::BadRequest(format!("missing {EVENT_HEADER} header")))?;

    match event {
        "ping" => {
            info!(%delivery, "received ping");
            Ok("pong".into_response())
        }
        "pull_request" => {
            let payload: PullRequestPayload = serde_json::from_slice(&body)
                .map_err(|err| WebhookError::BadRequest(format!("invalid payload: {err}")))?;

            if !payload.is_handled() {
                debug!(%delivery, action = %payload.action, "ignoring pull request action");
                return Ok(StatusCode::NO_CONTENT.into_response());
            }

            tokio::spawn(process_delivery(state, payload, delivery));
            Ok(StatusCode::ACCEPTED.into_response())
        }
        other => {
            debug!(%delivery, event = other, "ignoring event");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

async fn process_delivery(state: Arc<AppState>, payload: PullRequestPayload, delivery: String) {
    let event = payload.to_event();

    let api = match state.clients.client(payload.installation_id()).await {
        Ok(api) => api,
        Err(err) => {
            error!(%delivery, repo = %event.repo, pr = event.number, error = %err, "no GitHub client");
            return;
        }
    };

    match handle_pull_request(api.as_ref(), &state.settings, &event).await {
        Ok(outcome) => debug!(%delivery, ?outcome, "handled pull request"),
        Err(err) => {
            error!(%delivery, repo = %event.repo, pr = event.number, error = %err, "failed to handle pull request")
        }
    }
}

//! HTTP surface of the relay.

use crate::{ProviderClient, RelayError, RelayResult, RelaySecrets};
use activity_config_and_utils::Config;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Route that accepts authorization codes.
pub const TOKEN_ROUTE: &str = "/api/token";

/// Liveness route.
pub const HEALTH_ROUTE: &str = "/healthz";

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Build the relay router around `provider`.
pub fn router(provider: Arc<ProviderClient>) -> Router {
    Router::new()
        .route(TOKEN_ROUTE, post(exchange_token))
        .route(HEALTH_ROUTE, get(healthz))
        .with_state(provider)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn exchange_token(
    State(provider): State<Arc<ProviderClient>>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, RelayError> {
    match provider.exchange_code(&request.code).await {
        Ok(access_token) => {
            info!("authorization code exchanged");
            Ok(Json(TokenResponse { access_token }))
        }
        Err(err) => {
            warn!(error = %err, "token exchange failed");
            Err(err)
        }
    }
}

/// Serve `app` on an already bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, app: Router) -> RelayResult<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

/// Bind `config.relay_bind` and serve until ctrl-c.
///
/// The client secret is read from `ACTIVITY_CLIENT_SECRET` here and nowhere else.
pub async fn run(config: &Config) -> RelayResult<()> {
    let secrets = RelaySecrets::from_env(&config.client_id)?;
    let provider = ProviderClient::new(config.token_endpoint()?, secrets);
    let addr: SocketAddr = config.relay_bind.parse()?;

    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        token_endpoint = %provider.token_endpoint(),
        "token relay listening"
    );
    serve(listener, router(Arc::new(provider))).await
}

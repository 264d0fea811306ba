//! End-to-end setup runs against simulated and bridged hosts.

use activity_storage::{MemorySessionStorage, SessionStorage};
use async_trait::async_trait;
use axum::routing::post;
use axum::{Form, Json, Router};
use host_capability::{
    channel_transport, AccessToken, AuthorizationCode, HostBridge, HostError, HostMode,
    HostSdk, HostTransport, LaunchParams, SIMULATED_CODE,
};
use serde_json::{json, Value};
use session_orchestrator::{
    SessionOrchestrator, SessionStatus, SetupOptions, TOKEN_EXCHANGE_FAILED_MESSAGE,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use token_exchange::{
    ExchangeError, ExchangeResult, HttpTokenRelay, TokenExchangeClient, TokenRelay,
};
use token_relay::{ProviderClient, RelaySecrets};

/// Relay that answers with a fixed token and counts exchanges.
struct CountingRelay {
    token: Option<&'static str>,
    exchanges: AtomicUsize,
    codes: Mutex<Vec<String>>,
}

impl CountingRelay {
    fn new(token: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            token,
            exchanges: AtomicUsize::new(0),
            codes: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TokenRelay for CountingRelay {
    async fn exchange(&self, code: AuthorizationCode) -> ExchangeResult<AccessToken> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.codes.lock().unwrap().push(code.into_inner());
        self.token
            .map(AccessToken::new)
            .ok_or(ExchangeError::MissingToken)
    }
}

fn no_transport(_: &host_capability::Handshake) -> Result<Arc<dyn HostTransport>, HostError> {
    Err(HostError::TransportUnavailable("not embedded".into()))
}

fn simulated_host(storage: &MemorySessionStorage) -> Arc<HostSdk> {
    Arc::new(HostSdk::detect("123", &LaunchParams::default(), storage, no_transport).unwrap())
}

fn bridged_host() -> (Arc<HostSdk>, HostBridge) {
    let storage = MemorySessionStorage::new();
    let launch = LaunchParams::parse("?frame_id=f1&instance_id=i1&guild_id=g1&channel_id=c1");
    let (transport, bridge) = channel_transport(8);
    let sdk = HostSdk::detect("123", &launch, &storage, move |_| {
        Ok(Arc::new(transport) as Arc<dyn HostTransport>)
    })
    .unwrap();
    (Arc::new(sdk), bridge)
}

/// Session payload the bridged host returns for `token`.
fn echoed_payload(token: &str) -> Value {
    json!({
        "access_token": token,
        "user": {
            "id": "80351110224678912",
            "username": "nelly",
            "discriminator": "0",
            "avatar": null,
            "public_flags": 64
        },
        "scopes": ["identify", "guilds"],
        "expires": "2030-01-01T00:00:00Z",
        "application": {
            "id": "123",
            "name": "Activity",
            "icon": null,
            "description": ""
        }
    })
}

/// Drive the bridge: acknowledge ready, hand out a code, and answer
/// authenticate with `activate(token)`. Returns the commands seen.
fn drive_host(
    mut bridge: HostBridge,
    activate: fn(&str) -> Value,
) -> tokio::task::JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(request) = bridge.next_request().await {
            seen.push(request.command.clone());
            let reply = match request.command.as_str() {
                "ready" => Value::Null,
                "authorize" => json!({"code": "host_code"}),
                "authenticate" => {
                    let token = request.params["access_token"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string();
                    activate(&token)
                }
                _ => Value::Null,
            };
            request.respond(Ok(reply));
        }
        seen
    })
}

#[tokio::test]
async fn test_two_setup_signals_authenticate_once() {
    let storage = MemorySessionStorage::new();
    let host = simulated_host(&storage);
    let relay = CountingRelay::new(Some("tok"));
    let orchestrator = Arc::new(SessionOrchestrator::new(
        host.clone(),
        TokenExchangeClient::new("123", relay.clone()),
        SetupOptions::authenticated(None),
    ));

    let first = orchestrator.spawn_setup();
    let second = orchestrator.spawn_setup();
    let ran = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(ran.iter().filter(|ran| **ran).count(), 1);
    assert!(!orchestrator.setup().await);

    let counts = host.call_counts();
    assert_eq!(counts.authorize, 1);
    assert_eq!(counts.authenticate, 1);
    assert_eq!(relay.exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(orchestrator.context().status(), SessionStatus::Ready);
}

#[tokio::test]
async fn test_null_activation_is_authenticate_failed() {
    let (host, bridge) = bridged_host();
    let driver = drive_host(bridge, |_| Value::Null);
    let orchestrator = SessionOrchestrator::new(
        host.clone(),
        TokenExchangeClient::new("123", CountingRelay::new(Some("tok_123"))),
        SetupOptions::authenticated(None),
    );
    let mut context = orchestrator.context();

    orchestrator.setup().await;
    let snapshot = context.wait_terminal().await;

    assert_eq!(snapshot.status, SessionStatus::Error);
    assert_eq!(snapshot.error.as_deref(), Some("Authenticate command failed"));
    assert!(snapshot.access_token.is_none());
    assert!(!snapshot.authenticated);
    assert!(snapshot.session.is_none());
    assert_eq!(
        orchestrator.store().history(),
        vec![
            SessionStatus::Pending,
            SessionStatus::Loading,
            SessionStatus::Authenticating,
            SessionStatus::Error
        ]
    );

    drop(orchestrator);
    drop(context);
    drop(snapshot);
    drop(host);
    let seen = driver.await.unwrap();
    assert_eq!(seen, vec!["ready", "authorize", "authenticate"]);
}

#[tokio::test]
async fn test_token_and_echoed_payload_commit_together() {
    let (host, bridge) = bridged_host();
    let _driver = drive_host(bridge, echoed_payload);
    let relay = CountingRelay::new(Some("tok_123"));
    let orchestrator = SessionOrchestrator::new(
        host.clone(),
        TokenExchangeClient::new("123", relay.clone()),
        SetupOptions::authenticated(Some(vec!["identify".to_string()])),
    );
    let mut context = orchestrator.context();

    orchestrator.setup().await;
    let snapshot = context.wait_terminal().await;

    assert_eq!(snapshot.status, SessionStatus::Ready);
    assert_eq!(snapshot.access_token, Some(AccessToken::new("tok_123")));
    assert!(snapshot.authenticated);
    let expected: host_capability::SessionPayload =
        serde_json::from_value(echoed_payload("tok_123")).unwrap();
    assert_eq!(snapshot.session, Some(expected));
    assert_eq!(*relay.codes.lock().unwrap(), vec!["host_code".to_string()]);
    assert_eq!(snapshot.host.mode(), HostMode::Real);
    assert_eq!(snapshot.host.guild_id(), Some("g1"));
}

#[tokio::test]
async fn test_ready_only_skips_authenticating() {
    let (host, bridge) = bridged_host();
    let _driver = drive_host(bridge, echoed_payload);
    let relay = CountingRelay::new(Some("tok"));
    let orchestrator = SessionOrchestrator::new(
        host.clone(),
        TokenExchangeClient::new("123", relay.clone()),
        SetupOptions::ready_only(),
    );

    orchestrator.setup().await;

    assert_eq!(
        orchestrator.store().history(),
        vec![
            SessionStatus::Pending,
            SessionStatus::Loading,
            SessionStatus::Ready
        ]
    );
    assert_eq!(relay.exchanges.load(Ordering::SeqCst), 0);
    assert_eq!(host.call_counts().authorize, 0);
    assert!(orchestrator.context().snapshot().access_token.is_none());
}

#[tokio::test]
async fn test_context_gates_until_host_answers() {
    let (host, mut bridge) = bridged_host();
    let orchestrator = Arc::new(SessionOrchestrator::new(
        host,
        TokenExchangeClient::new("123", CountingRelay::new(Some("tok"))),
        SetupOptions::ready_only(),
    ));
    let mut context = orchestrator.context();
    assert_eq!(context.render_or("splash", |_| "app"), "splash");

    let setup = orchestrator.spawn_setup();

    // The handshake is parked on the bridge; the run sits in loading.
    let ready = bridge.next_request().await.unwrap();
    assert_eq!(ready.command, "ready");
    assert_eq!(context.status(), SessionStatus::Loading);
    assert_eq!(context.render_or("splash", |_| "app"), "splash");

    ready.respond(Ok(Value::Null));
    assert!(setup.await.unwrap());

    let snapshot = context.wait_terminal().await;
    assert_eq!(snapshot.status, SessionStatus::Ready);
    assert_eq!(context.render_or("splash", |_| "app"), "app");
}

#[tokio::test]
async fn test_host_failure_is_error_state() {
    let (host, mut bridge) = bridged_host();
    tokio::spawn(async move {
        while let Some(request) = bridge.next_request().await {
            request.respond(Err("host refused".to_string()));
        }
    });
    let orchestrator = SessionOrchestrator::new(
        host,
        TokenExchangeClient::new("123", CountingRelay::new(Some("tok"))),
        SetupOptions::authenticated(None),
    );

    orchestrator.setup().await;

    let state = orchestrator.store().current();
    assert_eq!(state.status, SessionStatus::Error);
    assert!(state.error.unwrap().contains("host refused"));
    assert_eq!(
        orchestrator.store().history(),
        vec![
            SessionStatus::Pending,
            SessionStatus::Loading,
            SessionStatus::Error
        ]
    );
}

#[tokio::test]
async fn test_simulation_session_comes_from_identity() {
    let storage = MemorySessionStorage::new();
    storage.set("user_id", "abc12345").unwrap();
    let host = simulated_host(&storage);
    let relay = CountingRelay::new(Some("tok"));
    let orchestrator = SessionOrchestrator::new(
        host.clone(),
        TokenExchangeClient::new("123", relay.clone()),
        SetupOptions::authenticated(None),
    );

    orchestrator.setup().await;

    let snapshot = orchestrator.context().snapshot();
    let session = snapshot.session.unwrap();
    assert_eq!(session.user.id, "abc12345");
    assert_eq!(session.user.username, "abc12345");
    // 'a' = 97, 97 % 5 = 2
    assert_eq!(session.user.discriminator, "2");
    assert_eq!(session.expires, "2112-02-01T00:00:00Z");
    assert_eq!(host.mode(), HostMode::Simulated);
    // Only the relay leg saw a code; activation made no exchange.
    assert_eq!(*relay.codes.lock().unwrap(), vec![SIMULATED_CODE.to_string()]);
    assert_eq!(relay.exchanges.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_full_stack_through_relay_server() {
    // Identity provider stand-in.
    let provider = Router::new().route(
        "/oauth2/token",
        post(|Form(form): Form<HashMap<String, String>>| async move {
            assert_eq!(form["grant_type"], "authorization_code");
            assert_eq!(form["code"], "host_code");
            Json(json!({"access_token": "tok_123", "token_type": "Bearer"}))
        }),
    );
    let provider_base = serve(provider).await;

    let provider_client = ProviderClient::new(
        url::Url::parse(&format!("{}/oauth2/token", provider_base)).unwrap(),
        RelaySecrets::new("123", "s3cret"),
    );
    let relay_base = serve(token_relay::router(Arc::new(provider_client))).await;

    let (host, bridge) = bridged_host();
    let _driver = drive_host(bridge, echoed_payload);
    let orchestrator = SessionOrchestrator::new(
        host,
        TokenExchangeClient::new("123", Arc::new(HttpTokenRelay::new(&relay_base).unwrap())),
        SetupOptions::authenticated(None),
    );

    orchestrator.setup().await;

    let state = orchestrator.store().current();
    assert_eq!(state.status, SessionStatus::Ready, "error: {:?}", state.error);
    assert_eq!(state.access_token, Some(AccessToken::new("tok_123")));
}

#[tokio::test]
async fn test_unreachable_relay_stores_generic_error() {
    // Bind then drop so the port refuses connections.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let relay_base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let storage = MemorySessionStorage::new();
    let orchestrator = SessionOrchestrator::new(
        simulated_host(&storage),
        TokenExchangeClient::new("123", Arc::new(HttpTokenRelay::new(&relay_base).unwrap())),
        SetupOptions::authenticated(None),
    );

    orchestrator.setup().await;

    let state = orchestrator.store().current();
    assert_eq!(state.status, SessionStatus::Error);
    assert_eq!(state.error.as_deref(), Some(TOKEN_EXCHANGE_FAILED_MESSAGE));
    assert!(state.access_token.is_none());
}

#[tokio::test]
async fn test_relay_status_error_hides_body() {
    let relay = Router::new().route(
        "/api/token",
        post(|| async {
            (
                axum::http::StatusCode::BAD_GATEWAY,
                Json(json!({"error": "upstream detail"})),
            )
        }),
    );
    let relay_base = serve(relay).await;

    let storage = MemorySessionStorage::new();
    let orchestrator = SessionOrchestrator::new(
        simulated_host(&storage),
        TokenExchangeClient::new("123", Arc::new(HttpTokenRelay::new(&relay_base).unwrap())),
        SetupOptions::authenticated(None),
    );

    orchestrator.setup().await;

    let error = orchestrator.context().snapshot().error.unwrap();
    assert_eq!(error, "Token exchange failed");
    assert!(!error.contains("upstream"));
    assert!(!error.contains(&relay_base));
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

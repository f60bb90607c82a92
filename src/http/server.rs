//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatcher
//! - Wire up middleware (request ID, tracing, timeout, powered-by)
//! - Resolve the session and form body for every request
//! - Dispatch requests to the drawn route table
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::accounts::UserStore;
use crate::app::{ActionContext, Flow, HelperRegistry};
use crate::config::AppConfig;
use crate::http::dispatch::RouteTable;
use crate::http::{request, response};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::{Params, ReverseRoutes};
use crate::session::{cookie, SessionStore};

/// Interval between sweeps of expired sessions.
const SESSION_SWEEP: Duration = Duration::from_secs(60);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub reverse: Arc<ReverseRoutes>,
    pub helpers: Arc<HelperRegistry>,
    pub users: UserStore,
    pub sessions: SessionStore,
    /// `listener.public_url`, the base of absolute links.
    pub public_url: Url,
    pub config: Arc<AppConfig>,
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over drawn application state.
    pub fn new(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = Arc::clone(&state.config);
        let powered_by = Some(config.security.powered_by.as_str())
            .filter(|v| !v.is_empty())
            .and_then(|v| HeaderValue::from_str(v).ok());

        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-powered-by"),
                powered_by,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(request::propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request::request_id(req.headers()),
                )
            }))
            .layer(request::set_request_id_layer())
    }

    /// The fully layered router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.state.routes.len(),
            "HTTP server starting"
        );

        let sweeper = {
            let sessions = self.state.sessions.clone();
            let mut stop = shutdown.subscribe();
            tokio::spawn(async move {
                let mut tick = tokio::time::interval(SESSION_SWEEP);
                loop {
                    tokio::select! {
                        _ = tick.tick() => {
                            let purged = sessions.purge_expired();
                            if purged > 0 {
                                tracing::debug!(purged, "Expired sessions removed");
                            }
                        }
                        _ = stop.recv() => break,
                    }
                }
            })
        };

        let mut stop = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        sweeper.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler.
/// Resolves session, body and verb, then runs the route table.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request::request_id(&parts.headers);
    let path = parts.uri.path().to_string();

    let form = if request::is_form(&parts.headers) {
        match axum::body::to_bytes(body, state.config.security.max_body_size).await {
            Ok(bytes) => request::parse_form(&bytes),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Request body rejected");
                return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
            }
        }
    } else {
        Params::new()
    };

    let verb = match request::effective_verb(&parts.method, &parts.headers, &form) {
        Ok(verb) => verb,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Unsupported method");
            metrics::record_request(parts.method.as_str(), 405, start_time);
            return (StatusCode::METHOD_NOT_ALLOWED, e.to_string()).into_response();
        }
    };

    let session_id = cookie::session_id(&parts.headers, &state.config.session.cookie_name);
    let session = state.sessions.load(session_id);

    tracing::debug!(
        request_id = %request_id,
        verb = %verb,
        path = %path,
        session_id = %session.id(),
        "Dispatching request"
    );

    let ctx = ActionContext {
        state: state.clone(),
        request_id: request_id.clone(),
        verb,
        path,
        headers: parts.headers,
        params: Params::new(),
        form,
        session: session.clone(),
    };

    let mut response = match state.routes.dispatch(ctx).await {
        Flow::Done(response) => response,
        Flow::Next(ctx) => {
            tracing::warn!(request_id = %request_id, verb = %verb, path = %ctx.path, "No route matched");
            metrics::record_unmatched(verb.as_str());
            response::not_found(&ctx.path)
        }
    };

    if session.needs_cookie() {
        response::set_cookie(&mut response, &cookie::set_cookie(&state.config.session, session.id()));
    }

    metrics::record_request(verb.as_str(), response.status().as_u16(), start_time);
    response
}

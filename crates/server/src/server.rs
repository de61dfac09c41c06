use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use chrono_tz::Tz;

use std::sync::Arc;

use crate::{
    Advisor, ServerError, SessionResolver, categories, chat, goals, health, summary, transactions,
};
use engine::Engine;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub sessions: Arc<dyn SessionResolver>,
    pub advisor: Arc<dyn Advisor>,
    /// Zone used to decide what "today" and "this month" are.
    pub timezone: Tz,
    /// History turns sent to the advisor with each message.
    pub chat_history_limit: u64,
}

async fn auth(
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if bearer.token().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let owner = match state.sessions.resolve(bearer.token()).await {
        Ok(owner) => owner,
        Err(err) => {
            tracing::debug!("session rejected: {err}");
            return Err(ServerError::Unauthorized);
        }
    };

    request.extensions_mut().insert(owner);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let authed = Router::new()
        .route("/summary", get(summary::get))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            axum::routing::patch(categories::update).delete(categories::delete),
        )
        .route("/goals", get(goals::list).post(goals::create))
        .route(
            "/goals/{id}",
            get(goals::get).patch(goals::update).delete(goals::delete),
        )
        .route(
            "/chat",
            get(chat::history).post(chat::send).delete(chat::clear),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/health", get(health::get))
        .merge(authed)
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

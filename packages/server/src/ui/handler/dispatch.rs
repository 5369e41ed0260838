//! Inbound frame dispatch.
//!
//! A table maps each `InboundKind` to a handler function. `Dispatcher::standard`
//! registers the four kinds the server understands; frames of a kind with no
//! registered handler are rejected with `DispatchError::Unrouted`.

use std::{collections::HashMap, sync::Arc};

use futures_util::future::{BoxFuture, FutureExt};
use thiserror::Error;

use crate::{
    domain::{ChatMessage, SessionId, Topic, ValueObjectError},
    infrastructure::dto::websocket::{
        InboundFrame, InboundKind, JoinRequest, SendRequest, SubscriptionRequest,
    },
    ui::state::AppState,
    usecase::SendMessageError,
};

/// Errors that drop a single inbound frame. None of them closes the connection.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid value: {0}")]
    InvalidValue(#[from] ValueObjectError),

    #[error("no handler registered for {0:?}")]
    Unrouted(InboundKind),
}

pub type HandlerFuture = BoxFuture<'static, Result<(), DispatchError>>;

/// Handler for one inbound kind: shared state, the receiving session and the payload.
pub type Handler = fn(Arc<AppState>, SessionId, serde_json::Value) -> HandlerFuture;

/// Dispatch table from inbound kind to handler
#[derive(Clone, Default)]
pub struct Dispatcher {
    routes: HashMap<InboundKind, Handler>,
}

impl Dispatcher {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the server's handlers for every inbound kind
    pub fn standard() -> Self {
        Self::new()
            .route(InboundKind::Subscribe, subscribe_route)
            .route(InboundKind::Unsubscribe, unsubscribe_route)
            .route(InboundKind::Join, join_route)
            .route(InboundKind::Send, send_route)
    }

    /// Register (or replace) the handler for `kind`
    pub fn route(mut self, kind: InboundKind, handler: Handler) -> Self {
        self.routes.insert(kind, handler);
        self
    }

    /// Decode `text` and run the handler registered for its kind
    pub async fn dispatch(
        &self,
        state: Arc<AppState>,
        session_id: &SessionId,
        text: &str,
    ) -> Result<(), DispatchError> {
        let frame: InboundFrame = serde_json::from_str(text)?;
        let handler = self
            .routes
            .get(&frame.kind)
            .ok_or(DispatchError::Unrouted(frame.kind))?;

        handler(state, session_id.clone(), frame.payload).await
    }
}

fn subscribe_route(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> HandlerFuture {
    handle_subscribe(state, session_id, payload).boxed()
}

fn unsubscribe_route(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> HandlerFuture {
    handle_unsubscribe(state, session_id, payload).boxed()
}

fn join_route(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> HandlerFuture {
    handle_join(state, session_id, payload).boxed()
}

fn send_route(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> HandlerFuture {
    handle_send(state, session_id, payload).boxed()
}

async fn handle_subscribe(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> Result<(), DispatchError> {
    let request: SubscriptionRequest = serde_json::from_value(payload)?;
    let topic: Topic = request.destination.parse()?;
    state.broadcaster.subscribe(&session_id, topic).await;
    Ok(())
}

async fn handle_unsubscribe(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> Result<(), DispatchError> {
    let request: SubscriptionRequest = serde_json::from_value(payload)?;
    let topic: Topic = request.destination.parse()?;
    state.broadcaster.unsubscribe(&session_id, topic).await;
    Ok(())
}

async fn handle_join(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> Result<(), DispatchError> {
    let request: JoinRequest = serde_json::from_value(payload)?;
    let user = request.into_user(state.clock.as_ref())?;

    // 結果通知が届くよう、入室前にユーザーの個別キューをこのセッションに紐付ける
    state
        .broadcaster
        .bind_user(user.id.clone(), session_id.clone())
        .await;

    let outcome = state
        .join_chat_room_usecase
        .execute(session_id.clone(), user)
        .await;
    tracing::debug!("Join on session '{}': {:?}", session_id, outcome);
    Ok(())
}

async fn handle_send(
    state: Arc<AppState>,
    session_id: SessionId,
    payload: serde_json::Value,
) -> Result<(), DispatchError> {
    let request: SendRequest = serde_json::from_value(payload)?;
    let json_message = serde_json::to_string(&request)?;
    let message = ChatMessage::from(request);

    match state
        .send_message_usecase
        .execute(&session_id, &message, &json_message)
        .await
    {
        Ok(()) => {}
        Err(SendMessageError::UnknownSession) => {
            tracing::debug!(
                "Dropped message '{}' from session '{}' that has not joined",
                message.id,
                session_id
            );
        }
        Err(e) => {
            tracing::warn!("Failed to relay message '{}': {}", message.id, e);
        }
    }
    Ok(())
}

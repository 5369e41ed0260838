//! WebSocket connection handlers.
//!
//! Each upgraded connection gets a fresh session id. Inbound text frames go through
//! the `Dispatcher`; outbound frames arrive on the session's channel and are pushed
//! by `pusher_loop`. When either side ends, `on_disconnect` runs exactly once.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::SessionId,
    ui::state::AppState,
    usecase::DisconnectError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames published to this session
/// * `sender` - WebSocket sink to send frames to this client
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = SessionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .broadcaster
        .register_session(session_id.clone(), tx)
        .await;
    tracing::info!("Session '{}' connected", session_id);

    let (sender, mut receiver) = socket.split();

    let recv_state = state.clone();
    let recv_session_id = session_id.clone();

    // Spawn a task to receive frames from this client
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on session '{}': {}", recv_session_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received frame on '{}': {}", recv_session_id, text.as_str());
                    if let Err(e) = recv_state
                        .dispatcher
                        .dispatch(recv_state.clone(), &recv_session_id, text.as_str())
                        .await
                    {
                        tracing::warn!("Dropped frame on session '{}': {}", recv_session_id, e);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", recv_session_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to push published frames to this client
    let send_task = pusher_loop(rx, sender);

    join_connection_tasks(recv_task, send_task).await;
    on_disconnect(&state, &session_id).await;
}

/// Waits for either task to complete, then aborts the other and waits until it has stopped.
///
/// When this returns no frame handler of the connection is still running, so
/// `on_disconnect` never interleaves with a join of the same session.
async fn join_connection_tasks(mut recv_task: JoinHandle<()>, mut send_task: JoinHandle<()>) {
    tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            let _ = send_task.await;
        }
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
    };
}

/// Lifecycle hook invoked once when a connection ends.
///
/// The session stops receiving frames first, then its user leaves the room so the
/// remaining occupants get the updated list.
pub async fn on_disconnect(state: &AppState, session_id: &SessionId) {
    state.broadcaster.unregister_session(session_id).await;

    match state.disconnect_session_usecase.execute(session_id).await {
        Ok(user) => {
            tracing::info!(
                "Session '{}' disconnected, '{}' removed from room {}",
                session_id,
                user.screen_name,
                user.room_id
            );
        }
        Err(DisconnectError::UnknownSession) => {
            tracing::info!("Session '{}' disconnected without joining", session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    /// Drop 時にフラグを立てる
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_join_connection_tasks_waits_for_aborted_recv_task() {
        // テスト項目: 送信側が先に終了したとき、受信側のタスクが停止してから戻る
        // given (前提条件): 受信側は処理中のまま終わらない
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(stopped.clone());
        let recv_task = tokio::spawn(async move {
            let _flag = flag;
            std::future::pending::<()>().await;
        });
        let send_task = tokio::spawn(async {});

        // when (操作):
        join_connection_tasks(recv_task, send_task).await;

        // then (期待する結果): 受信側のタスクは既に破棄されている
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_join_connection_tasks_waits_for_aborted_send_task() {
        // テスト項目: 受信側が先に終了したとき、送信側のタスクが停止してから戻る
        // given (前提条件):
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(stopped.clone());
        let recv_task = tokio::spawn(async {});
        let send_task = tokio::spawn(async move {
            let _flag = flag;
            std::future::pending::<()>().await;
        });

        // when (操作):
        join_connection_tasks(recv_task, send_task).await;

        // then (期待する結果):
        assert!(stopped.load(Ordering::SeqCst));
    }
}

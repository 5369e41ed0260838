//! End-to-end tests: a real server on an ephemeral port, WebSocket clients and HTTP calls.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use heya_server::ui::{AppState, Server};
use heya_shared::time::FixedClock;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Server running in a background task, stopped on drop
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let server = Server::new(AppState::in_memory(Arc::new(FixedClock::new(
            1672531200000,
        ))));
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.abort();
    }
}

struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestClient {
    async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url()).await.unwrap();
        Self { stream }
    }

    async fn send(&mut self, frame: Value) {
        self.stream
            .send(Message::text(frame.to_string()))
            .await
            .unwrap();
    }

    async fn subscribe_room(&mut self, room: i64) {
        for destination in [
            format!("/topic/chatroom{room}"),
            format!("/topic/chatroomUsers{room}"),
            format!("/topic/chatroomUserLeave{room}"),
        ] {
            self.send(json!({"type": "subscribe", "destination": destination}))
                .await;
        }
    }

    async fn join(&mut self, name: &str, room: i64) {
        self.send(json!({"type": "join", "roomId": room, "screenName": name}))
            .await;
    }

    /// Next frame as (destination, body)
    async fn recv(&mut self) -> (String, String) {
        loop {
            let msg = timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = msg {
                let frame: Value = serde_json::from_str(text.as_str()).unwrap();
                return (
                    frame["destination"].as_str().unwrap().to_string(),
                    frame["body"].as_str().unwrap().to_string(),
                );
            }
        }
    }

    async fn close(mut self) {
        self.stream.close(None).await.unwrap();
    }
}

fn frame(destination: &str, body: &str) -> (String, String) {
    (destination.to_string(), body.to_string())
}

#[tokio::test]
async fn test_two_person_room_scenario() {
    // テスト項目: A, B が入室 → C は満室 → A が切断 → B に在室者と退室通知が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = TestClient::connect(&server).await;
    let mut b = TestClient::connect(&server).await;
    let mut c = TestClient::connect(&server).await;

    // when (操作): A が入室
    a.subscribe_room(5).await;
    a.join("alice", 5).await;

    // then (期待する結果):
    assert_eq!(
        a.recv().await,
        frame("/user/queue/joinResponse", r#"{"status":"success"}"#)
    );
    assert_eq!(a.recv().await, frame("/topic/chatroomUsers5", r#"["alice"]"#));

    // when (操作): B が入室
    b.subscribe_room(5).await;
    b.join("bob", 5).await;

    // then (期待する結果):
    assert_eq!(
        b.recv().await,
        frame("/user/queue/joinResponse", r#"{"status":"success"}"#)
    );
    assert_eq!(
        b.recv().await,
        frame("/topic/chatroomUsers5", r#"["alice","bob"]"#)
    );
    assert_eq!(
        a.recv().await,
        frame("/topic/chatroomUsers5", r#"["alice","bob"]"#)
    );

    // when (操作): C が入室を試みる
    c.subscribe_room(5).await;
    c.join("carol", 5).await;

    // then (期待する結果):
    assert_eq!(
        c.recv().await,
        frame(
            "/user/queue/joinResponse",
            r#"{"message":"Chatroom is full","status":"fail"}"#
        )
    );

    // when (操作): A が切断
    a.close().await;

    // then (期待する結果): B と C の両方に届く（C も購読している）
    assert_eq!(b.recv().await, frame("/topic/chatroomUsers5", r#"["bob"]"#));
    assert_eq!(b.recv().await, frame("/topic/chatroomUserLeave5", "alice"));
    assert_eq!(c.recv().await, frame("/topic/chatroomUsers5", r#"["bob"]"#));
    assert_eq!(c.recv().await, frame("/topic/chatroomUserLeave5", "alice"));

    let detail: Value = reqwest::get(server.http_url("/api/rooms/5"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["id"], 5);
    assert_eq!(detail["users"].as_array().unwrap().len(), 1);
    assert_eq!(detail["users"][0]["screenName"], "bob");
    assert_eq!(detail["users"][0]["joinedAt"], "2023-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_send_is_relayed_to_target_room() {
    // テスト項目: 別のルームにいるユーザーからのメッセージも宛先ルームに中継される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut listener = TestClient::connect(&server).await;
    listener.subscribe_room(5).await;
    listener.join("bob", 5).await;
    listener.recv().await; // joinResponse
    listener.recv().await; // chatroomUsers5

    let mut sender = TestClient::connect(&server).await;
    sender.join("dave", 7).await;
    assert_eq!(
        sender.recv().await,
        frame("/user/queue/joinResponse", r#"{"status":"success"}"#)
    );

    // when (操作):
    sender
        .send(json!({
            "type": "send",
            "id": "m-1",
            "chatRoomId": "5",
            "sender": "dave",
            "message": "hello"
        }))
        .await;

    // then (期待する結果):
    assert_eq!(
        listener.recv().await,
        frame(
            "/topic/chatroom5",
            r#"{"id":"m-1","roomId":5,"sender":"dave","message":"hello"}"#
        )
    );
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    // テスト項目: 不正なフレームは破棄され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client.send(json!({"type": "shout", "volume": 11})).await;
    client
        .stream
        .send(Message::text("not json"))
        .await
        .unwrap();
    client.join("alice", 3).await;

    // then (期待する結果):
    assert_eq!(
        client.recv().await,
        frame("/user/queue/joinResponse", r#"{"status":"success"}"#)
    );
}

#[tokio::test]
async fn test_http_endpoints() {
    // テスト項目: ヘルスチェックとルーム一覧・詳細のステータスコード
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;
    client.join("alice", 9).await;
    client.recv().await; // joinResponse

    // when / then: health
    let health: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({"status": "ok"}));

    // when / then: rooms
    let rooms: Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms, json!([{"id": 9, "occupants": ["alice"]}]));

    // when / then: room detail status codes
    let invalid = reqwest::get(server.http_url("/api/rooms/0")).await.unwrap();
    assert_eq!(invalid.status(), reqwest::StatusCode::BAD_REQUEST);
    let missing = reqwest::get(server.http_url("/api/rooms/42")).await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

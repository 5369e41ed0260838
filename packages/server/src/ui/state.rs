//! Server state shared by every connection.

use std::sync::Arc;

use heya_shared::time::Clock;

use crate::{
    infrastructure::{
        broadcaster::WebSocketBroadcaster,
        registry::{InMemoryRoomRegistry, InMemorySessionRegistry},
    },
    usecase::{
        DisconnectSessionUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinChatRoomUseCase,
        LeaveChatRoomUseCase, SendMessageUseCase,
    },
};

use super::handler::dispatch::Dispatcher;

/// Shared application state
pub struct AppState {
    /// JoinChatRoomUseCase（入室のユースケース）
    pub join_chat_room_usecase: Arc<JoinChatRoomUseCase>,
    /// DisconnectSessionUseCase（切断のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 接続・購読の管理（UseCase からは `dyn Broadcaster` として見える）
    pub broadcaster: Arc<WebSocketBroadcaster>,
    /// join したユーザーの時刻
    pub clock: Arc<dyn Clock>,
    /// 受信フレームの種別ごとのハンドラ
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// インメモリの Registry で全ての依存を組み立てる
    ///
    /// 依存は以下の順に作られ、プロセスの終了まで共有されます:
    /// 1. Registry（Room / Session）
    /// 2. Broadcaster
    /// 3. UseCases
    /// 4. Dispatcher
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        // 1. Registry
        let rooms = Arc::new(InMemoryRoomRegistry::new());
        let sessions = Arc::new(InMemorySessionRegistry::new());

        // 2. Broadcaster（WebSocket 実装）
        let broadcaster = Arc::new(WebSocketBroadcaster::new());

        // 3. UseCases
        let leave_chat_room_usecase = Arc::new(LeaveChatRoomUseCase::new(
            rooms.clone(),
            broadcaster.clone(),
        ));
        let join_chat_room_usecase = Arc::new(JoinChatRoomUseCase::new(
            sessions.clone(),
            rooms.clone(),
            broadcaster.clone(),
            leave_chat_room_usecase.clone(),
        ));
        let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
            sessions.clone(),
            leave_chat_room_usecase,
        ));
        let send_message_usecase =
            Arc::new(SendMessageUseCase::new(sessions, broadcaster.clone()));
        let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(rooms.clone()));
        let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(rooms));

        // 4. Dispatcher
        Self {
            join_chat_room_usecase,
            disconnect_session_usecase,
            send_message_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
            broadcaster,
            clock,
            dispatcher: Dispatcher::standard(),
        }
    }
}

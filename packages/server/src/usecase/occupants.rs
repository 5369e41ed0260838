//! 在室者リストの配信（join と leave で共通）

use crate::domain::{Broadcaster, RoomId, RoomRegistry, Topic};

/// ルームの在室者の表示名を参加順の JSON 配列として在室者トピックに配信
///
/// 配信の失敗はログに残すだけで、呼び出し元には伝えない。
pub(super) async fn publish_occupant_names(
    rooms: &dyn RoomRegistry,
    broadcaster: &dyn Broadcaster,
    room_id: RoomId,
) {
    let names: Vec<String> = rooms
        .occupants(room_id)
        .await
        .into_iter()
        .map(|user| user.screen_name.as_str().to_string())
        .collect();

    let payload = match serde_json::to_string(&names) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Failed to encode occupants of room {}: {}", room_id, e);
            return;
        }
    };

    tracing::debug!("Current users in room {}: {}", room_id, payload);
    if let Err(e) = broadcaster.publish(Topic::Occupants(room_id), &payload).await {
        tracing::warn!("Failed to broadcast occupants of room {}: {}", room_id, e);
    }
}

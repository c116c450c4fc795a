//! UseCase: ファンアウト（在室中の全セッションへの配信）
//!
//! 在室テーブルのスナップショットをロック内で取得し、ロックを解放してから
//! 各セッションへ送信します。送信に失敗したセッションは切断済みとみなし、
//! 配信の最後に在室テーブルから取り除きます（eviction）。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Broadcaster::broadcast() の配信先選定（自分自身の除外あり / なし）
//! - 送信失敗したセッションの eviction と、他の受信者への配信継続

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ChatResponse, ChatSession, PresenceRepository, ResponseStatus, SessionRemoval,
    UserId,
};

/// Result of one fan-out pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
    /// Sessions the event was queued for
    pub delivered: usize,
    /// Users removed from presence because delivery failed
    pub evicted: Vec<UserId>,
}

/// Fan-out engine shared by join, message and leave
pub struct Broadcaster {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn PresenceRepository>,
}

impl Broadcaster {
    /// 新しい Broadcaster を作成
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// Deliver `event` to every present session except `exclude`.
    ///
    /// The online count attached to the event is the snapshot size, so it may
    /// already be stale by the time a recipient reads it.
    pub async fn broadcast(&self, event: ChatEvent, exclude: Option<UserId>) -> FanoutReport {
        // 1. ロック内でスナップショットを取得（送信はロックの外で行う）
        let recipients = self.repository.snapshot_for_fanout().await;
        let response = ChatResponse::new(event, ResponseStatus::Broadcast, recipients.len());

        // 2. 各セッションへ送信し、失敗したものを記録
        let mut delivered = 0;
        let mut stale: Vec<ChatSession> = Vec::new();
        for session in recipients {
            if Some(session.user_id) == exclude {
                continue;
            }
            match session.send(response.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        user_id = %session.user_id,
                        connection_id = %session.connection_id,
                        "Broadcast delivery failed, evicting: {}",
                        e
                    );
                    stale.push(session);
                }
            }
        }

        // 3. 送信に失敗したセッションを在室テーブルから削除
        let mut evicted = Vec::with_capacity(stale.len());
        for session in stale {
            if self.repository.remove_session(&session).await == SessionRemoval::Removed {
                evicted.push(session.user_id);
            }
        }

        tracing::debug!(
            kind = ?response.message.kind,
            delivered,
            evicted = evicted.len(),
            "Broadcast finished"
        );

        FanoutReport { delivered, evicted }
    }
}

//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者自身を含む全在室者への text イベント配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人在室中のメッセージ送信（送信者にもエコーされる）
//! - エッジケース：送信者のみが在室している場合
//! - 異常系：受信者の 1 人が切断済み（eviction され、他の配信は継続）

use std::sync::Arc;

use crate::domain::{ChatEvent, ChatSession, EventKind, PresenceRepository, Timestamp};

use super::broadcast::{Broadcaster, FanoutReport};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    broadcaster: Broadcaster,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self {
            broadcaster: Broadcaster::new(repository),
        }
    }

    /// メッセージ送信を実行
    ///
    /// 送信者の ID と表示名はセッションから取り、全在室者（送信者を含む）に配信します。
    pub async fn execute(&self, sender: &ChatSession, content: String) -> FanoutReport {
        let event = ChatEvent::from_user(
            sender.user_id,
            &sender.display_name,
            content,
            Timestamp::now(),
            EventKind::Text,
        );
        self.broadcaster.broadcast(event, None).await
    }
}

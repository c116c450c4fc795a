//! UseCase: チャットルームへの参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 在室テーブルへの登録、参加者本人への確認応答、他の参加者への join 通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目、2 人目の参加
//! - エッジケース：同じユーザー ID での再参加（last join wins）
//! - 異常系：本人の接続が既に閉じている

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ChatResponse, ChatSession, EventKind, PresenceRepository, ResponseStatus,
    SessionClosed, Timestamp,
};

use super::broadcast::{Broadcaster, FanoutReport};

/// チャット参加のユースケース
pub struct JoinChatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn PresenceRepository>,
    broadcaster: Broadcaster,
}

impl JoinChatUseCase {
    /// 新しい JoinChatUseCase を作成
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self {
            broadcaster: Broadcaster::new(repository.clone()),
            repository,
        }
    }

    /// チャット参加を実行
    ///
    /// 1. 在室テーブルに登録（同じユーザー ID の既存セッションは上書き）
    /// 2. 参加者本人にだけ `joined` 応答を送信
    /// 3. 本人以外の全員に `join` イベントを配信
    ///
    /// # Errors
    ///
    /// 本人への応答を送れなかった場合は `SessionClosed`。
    /// このときセッションは登録済みのままなので、呼び出し側で後始末すること。
    pub async fn execute(&self, session: ChatSession) -> Result<FanoutReport, SessionClosed> {
        let user_id = session.user_id;
        let name = session.display_name.clone();

        // 1. 在室テーブルに登録
        if let Some(previous) = self.repository.insert(session.clone()).await
            && !previous.same_connection(&session)
        {
            tracing::info!(
                user_id = %user_id,
                previous_connection = %previous.connection_id,
                connection_id = %session.connection_id,
                "Session replaced by a newer join"
            );
        }
        let online_count = self.repository.size().await;

        // 2. 本人への確認応答
        let now = Timestamp::now();
        let welcome = ChatEvent::system(format!("Welcome {name} to the chat room!"), now);
        session.send(ChatResponse::new(
            welcome,
            ResponseStatus::Joined,
            online_count,
        ))?;
        tracing::info!(user_id = %user_id, name = %name, online_count, "User joined the chat room");

        // 3. 他の参加者への通知
        let joined = ChatEvent::from_user(
            user_id,
            &name,
            format!("{name} joined the room"),
            now,
            EventKind::Join,
        );
        Ok(self.broadcaster.broadcast(joined, Some(user_id)).await)
    }
}

//! UseCase: 退室処理（明示的な leave と切断の両方）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatUseCase::execute() メソッド
//! - 自分のセッションだけが在室テーブルから削除されること
//! - 残りの在室者に leave イベントが配信されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人在室中の退室
//! - エッジケース：最後の 1 人の退室（通知対象なし）
//! - エッジケース：同じユーザー ID で新しい接続が参加済み（古い接続の退室は無視）

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ChatSession, EventKind, PresenceRepository, SessionRemoval, Timestamp,
};

use super::broadcast::{Broadcaster, FanoutReport};

/// 退室のユースケース
pub struct LeaveChatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn PresenceRepository>,
    broadcaster: Broadcaster,
}

impl LeaveChatUseCase {
    /// 新しい LeaveChatUseCase を作成
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self {
            broadcaster: Broadcaster::new(repository.clone()),
            repository,
        }
    }

    /// 退室を実行
    ///
    /// # Returns
    ///
    /// * `Some(FanoutReport)` - leave イベントを配信した
    /// * `None` - 同じユーザー ID が新しい接続で参加済みのため、何もしなかった
    pub async fn execute(&self, session: &ChatSession) -> Option<FanoutReport> {
        let user_id = session.user_id;
        let name = &session.display_name;

        // 1. 自分の接続のセッションだけを削除
        match self.repository.remove_session(session).await {
            SessionRemoval::Superseded => {
                tracing::debug!(
                    user_id = %user_id,
                    connection_id = %session.connection_id,
                    "Session already replaced by a newer connection, skipping leave"
                );
                return None;
            }
            // Absent: eviction 済み。他の在室者はまだ leave を受け取っていない
            SessionRemoval::Removed | SessionRemoval::Absent => {}
        }
        tracing::info!(user_id = %user_id, name = %name, "User left the chat room");

        // 2. 残りの在室者に通知
        let left = ChatEvent::from_user(
            user_id,
            name,
            format!("{name} left the room"),
            Timestamp::now(),
            EventKind::Leave,
        );
        Some(self.broadcaster.broadcast(left, Some(user_id)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ChatResponse, ConnectionIdFactory, DisplayName, ResponseStatus, SessionSender, UserId,
        },
        infrastructure::repository::InMemoryPresenceRepository,
    };
    use tokio::sync::mpsc;

    fn create_session(
        user_id: i64,
        name: &str,
    ) -> (ChatSession, mpsc::UnboundedReceiver<ChatResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = ChatSession::new(
            ConnectionIdFactory::generate(),
            UserId::new(user_id).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
            Timestamp::now(),
            SessionSender::new(tx),
        );
        (session, rx)
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_users() {
        // テスト項目: 退室すると自分だけが削除され、残りの在室者に leave イベントが届く
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let usecase = LeaveChatUseCase::new(repository.clone());
        let (alice, mut alice_rx) = create_session(1, "alice");
        let (bob, mut bob_rx) = create_session(2, "bob");
        let (charlie, mut charlie_rx) = create_session(3, "charlie");
        repository.insert(alice).await;
        repository.insert(bob.clone()).await;
        repository.insert(charlie).await;

        // when (操作): bob が退室
        let report = usecase.execute(&bob).await;

        // then (期待する結果):
        assert_eq!(report.unwrap().delivered, 2);
        assert_eq!(repository.size().await, 2);
        assert!(bob_rx.try_recv().is_err()); // 本人には届かない
        for rx in [&mut alice_rx, &mut charlie_rx] {
            let response = rx.try_recv().unwrap();
            assert_eq!(response.status, ResponseStatus::Broadcast);
            assert_eq!(response.message.kind, EventKind::Leave);
            assert_eq!(response.message.sender_user_id, 2);
            assert_eq!(response.message.content, "bob left the room");
        }
    }

    #[tokio::test]
    async fn test_last_user_leaves() {
        // テスト項目: 最後の 1 人が退室すると在室数は 0 になり、通知対象はない
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let usecase = LeaveChatUseCase::new(repository.clone());
        let (alice, _alice_rx) = create_session(1, "alice");
        repository.insert(alice.clone()).await;

        // when (操作):
        let report = usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(report.unwrap().delivered, 0);
        assert_eq!(repository.size().await, 0);
    }

    #[tokio::test]
    async fn test_leave_of_superseded_connection_is_ignored() {
        // テスト項目: 同じユーザー ID が新しい接続で参加済みなら、古い接続の退室は何もしない
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let usecase = LeaveChatUseCase::new(repository.clone());
        let (stale, _stale_rx) = create_session(1, "alice");
        let (fresh, mut fresh_rx) = create_session(1, "alice");
        let (bob, mut bob_rx) = create_session(2, "bob");
        repository.insert(stale.clone()).await;
        repository.insert(fresh).await;
        repository.insert(bob).await;

        // when (操作):
        let report = usecase.execute(&stale).await;

        // then (期待する結果):
        assert!(report.is_none());
        assert_eq!(repository.size().await, 2);
        assert!(fresh_rx.try_recv().is_err());
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_leave_after_eviction_still_notifies() {
        // テスト項目: eviction 済みのセッションでも、残りの在室者には leave イベントが届く
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let usecase = LeaveChatUseCase::new(repository.clone());
        let (alice, _alice_rx) = create_session(1, "alice");
        let (bob, mut bob_rx) = create_session(2, "bob");
        repository.insert(bob).await;

        // when (操作): alice は既に在室テーブルにいない
        let report = usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(report.unwrap().delivered, 1);
        assert_eq!(bob_rx.try_recv().unwrap().message.kind, EventKind::Leave);
    }
}

//! UseCase: 在室者一覧の取得

use std::sync::Arc;

use crate::domain::{ChatSession, PresenceRepository};

/// 在室者一覧取得のユースケース
pub struct ListPresenceUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn PresenceRepository>,
}

impl ListPresenceUseCase {
    /// 新しい ListPresenceUseCase を作成
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// 在室中のセッションをユーザー ID 順で返す
    pub async fn execute(&self) -> Vec<ChatSession> {
        let mut sessions = self.repository.snapshot_for_fanout().await;
        sessions.sort_by_key(|s| s.user_id);
        sessions
    }
}

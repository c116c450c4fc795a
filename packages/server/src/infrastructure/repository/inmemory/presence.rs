//! InMemory Presence Repository 実装
//!
//! ドメイン層が定義する PresenceRepository trait の具体的な実装。
//! HashMap を RwLock で保護し、チャットルームに在室中のセッションを保持します。
//!
//! ロックはマップの更新・コピーの間だけ保持し、送信中には保持しません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ChatSession, PresenceRepository, SessionRemoval, UserId};

/// インメモリ Presence Repository 実装
#[derive(Default)]
pub struct InMemoryPresenceRepository {
    /// 在室中のセッション（user_id -> ChatSession）
    sessions: RwLock<HashMap<UserId, ChatSession>>,
}

impl InMemoryPresenceRepository {
    /// 新しい InMemoryPresenceRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn insert(&self, session: ChatSession) -> Option<ChatSession> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.user_id, session)
    }

    async fn remove(&self, user_id: UserId) -> Option<ChatSession> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&user_id)
    }

    async fn remove_session(&self, session: &ChatSession) -> SessionRemoval {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&session.user_id) {
            Some(current) if current.same_connection(session) => {
                sessions.remove(&session.user_id);
                SessionRemoval::Removed
            }
            Some(_) => SessionRemoval::Superseded,
            None => SessionRemoval::Absent,
        }
    }

    async fn size(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    async fn snapshot_for_fanout(&self) -> Vec<ChatSession> {
        let sessions = self.sessions.read().await;
        sessions.values().cloned().collect()
    }
}

//! UseCase: 1 接続分のチャット受信ループ（状態機械）
//!
//! 接続ごとに 1 つのタスクがこのループを回し、全タスクが同じ在室テーブルを共有します。
//!
//! ```text
//! Disconnected --join--> Joined --leave--> (終了: Ok)
//!      |                   |
//!      +---- 受信エラー / 切断 / キャンセル / アイドルタイムアウト ----> (後始末して終了: Err)
//! ```
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChatConnectionUseCase::run() の状態遷移と、各遷移で送られるイベント
//! - 受信エラー・切断時の後始末（在室テーブルからの削除と leave 配信）
//! - 未参加でのメッセージ送信（error 応答のみ、在室テーブルは不変）
//! - 不明なアクションの無視
//!
//! ### どのような状況を想定しているか
//! - 受信側はテスト用の mpsc チャンネルをストリームとして渡す
//! - 送信側はセッションごとの mpsc チャンネルの受信側で検証する

use std::{sync::Arc, time::Duration};

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::domain::{
    ChatAction, ChatEvent, ChatResponse, ChatSession, ConnectionId, ConnectionIdFactory,
    DisplayName, PresenceRepository, ResponseStatus, SessionSender, Timestamp, UserId,
};

use super::{
    error::ChatError, join_chat::JoinChatUseCase, leave_chat::LeaveChatUseCase,
    send_message::SendMessageUseCase,
};

/// Sent to a connection that sends a message before joining
const NOT_JOINED_MESSAGE: &str = "Please join the chat room first";

/// Per-connection state
enum ConnectionState {
    Disconnected,
    Joined(ChatSession),
}

/// チャット接続のユースケース（Broadcast Engine）
pub struct ChatConnectionUseCase {
    join: JoinChatUseCase,
    send: SendMessageUseCase,
    leave: LeaveChatUseCase,
    /// Receive timeout; `None` waits forever
    idle_timeout: Option<Duration>,
}

impl ChatConnectionUseCase {
    /// 新しい ChatConnectionUseCase を作成
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self {
            join: JoinChatUseCase::new(repository.clone()),
            send: SendMessageUseCase::new(repository.clone()),
            leave: LeaveChatUseCase::new(repository),
            idle_timeout: None,
        }
    }

    /// Fail the receive loop when no action arrives within `idle_timeout`.
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Drive one connection until it leaves, fails, or is cancelled.
    ///
    /// `inbound` yields the actions received on the connection; `outbound` is
    /// this connection's own send handle. Whatever ends the loop, a joined
    /// session is removed from presence and the other users are told it left.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - the client sent `leave`
    /// * `Err(ChatError)` - receive failure, close, idle timeout, cancellation,
    ///   or a direct response that could not be queued
    pub async fn run<S, E>(
        &self,
        mut inbound: S,
        outbound: SessionSender,
        cancel: CancellationToken,
    ) -> Result<(), ChatError>
    where
        S: Stream<Item = Result<ChatAction, E>> + Unpin + Send,
        E: std::error::Error + Send + Sync + 'static,
    {
        let connection_id = ConnectionIdFactory::generate();
        let mut state = ConnectionState::Disconnected;
        tracing::debug!(connection_id = %connection_id, "Chat connection started");

        let result = self
            .receive_loop(connection_id, &mut inbound, &outbound, &cancel, &mut state)
            .await;

        if let ConnectionState::Joined(session) = state {
            self.leave.execute(&session).await;
        }

        tracing::debug!(connection_id = %connection_id, "Chat connection ended");
        result
    }

    async fn receive_loop<S, E>(
        &self,
        connection_id: ConnectionId,
        inbound: &mut S,
        outbound: &SessionSender,
        cancel: &CancellationToken,
        state: &mut ConnectionState,
    ) -> Result<(), ChatError>
    where
        S: Stream<Item = Result<ChatAction, E>> + Unpin + Send,
        E: std::error::Error + Send + Sync + 'static,
    {
        loop {
            let action = self.next_action(inbound, cancel).await?;
            tracing::debug!(connection_id = %connection_id, kind = action.kind(), "Received chat action");

            match action {
                ChatAction::Join { user_id, username } => {
                    let (user_id, name) =
                        match (UserId::new(user_id), DisplayName::new(username)) {
                            (Ok(user_id), Ok(name)) => (user_id, name),
                            (Err(e), _) | (_, Err(e)) => {
                                tracing::warn!(connection_id = %connection_id, "Rejected join: {}", e);
                                send_error(outbound, e.to_string())?;
                                continue;
                            }
                        };

                    // 別のユーザー ID で参加し直す場合は、以前の ID を退室させる
                    if let ConnectionState::Joined(previous) = &*state
                        && previous.user_id != user_id
                    {
                        self.leave.execute(previous).await;
                    }

                    let session = ChatSession::new(
                        connection_id,
                        user_id,
                        name,
                        Timestamp::now(),
                        outbound.clone(),
                    );
                    *state = ConnectionState::Joined(session.clone());
                    self.join.execute(session).await?;
                }
                ChatAction::Message { content } => match &*state {
                    ConnectionState::Joined(session) => {
                        self.send.execute(session, content).await;
                    }
                    ConnectionState::Disconnected => {
                        tracing::warn!(connection_id = %connection_id, "Message received before join");
                        send_error(outbound, NOT_JOINED_MESSAGE.to_string())?;
                    }
                },
                ChatAction::Leave => {
                    if let ConnectionState::Joined(session) =
                        std::mem::replace(state, ConnectionState::Disconnected)
                    {
                        self.leave.execute(&session).await;
                    }
                    return Ok(());
                }
                ChatAction::Unknown { kind } => {
                    tracing::warn!(connection_id = %connection_id, kind = %kind, "Ignoring unknown chat action");
                }
            }
        }
    }

    /// Wait for the next inbound action.
    ///
    /// Cancellation wins over a ready action.
    async fn next_action<S, E>(
        &self,
        inbound: &mut S,
        cancel: &CancellationToken,
    ) -> Result<ChatAction, ChatError>
    where
        S: Stream<Item = Result<ChatAction, E>> + Unpin + Send,
        E: std::error::Error + Send + Sync + 'static,
    {
        let next = async {
            match self.idle_timeout {
                Some(limit) => tokio::time::timeout(limit, inbound.next())
                    .await
                    .map_err(|_| ChatError::IdleTimeout(limit)),
                None => Ok(inbound.next().await),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ChatError::Cancelled),
            next = next => match next? {
                Some(Ok(action)) => Ok(action),
                Some(Err(e)) => Err(ChatError::Receive(Box::new(e))),
                None => Err(ChatError::ConnectionClosed),
            },
        }
    }
}

/// Report protocol misuse to the offending connection only.
fn send_error(outbound: &SessionSender, content: String) -> Result<(), ChatError> {
    let event = ChatEvent::system(content, Timestamp::now());
    outbound
        .send(ChatResponse::new(event, ResponseStatus::Error, 0))
        .map_err(|_| ChatError::WriterClosed)
}

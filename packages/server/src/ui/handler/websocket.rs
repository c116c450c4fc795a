//! WebSocket chat connection handler.
//!
//! Each upgraded socket is split into two halves:
//!
//! - a writer task that drains this connection's outbound queue into the socket
//! - the chat receive loop ([`ChatConnectionUseCase`]) fed by the inbound frames

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    future,
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ChatAction, ChatResponse, SessionSender},
    infrastructure::dto::websocket::{ChatRequest, ChatResponseDto},
    ui::state::AppState,
    usecase::{ChatConnectionUseCase, ChatError},
};

/// How long the writer may keep flushing queued responses after the receive loop ends
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    let cancel = state.shutdown.child_token();

    // Outbound queue for this connection, drained by its own writer
    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = tokio::spawn(write_responses(sender, rx, cancel.clone()));

    // Inbound frames up to the close frame, decoded into chat actions
    let inbound = receiver
        .take_while(|frame| future::ready(!matches!(frame, Ok(Message::Close(_)))))
        .filter_map(|frame| future::ready(decode_frame(frame)));

    let usecase = ChatConnectionUseCase::new(state.presence.clone())
        .with_idle_timeout(state.idle_timeout);
    let result = usecase
        .run(Box::pin(inbound), SessionSender::new(tx), cancel)
        .await;

    match &result {
        Ok(()) => tracing::info!("Chat connection ended by leave"),
        Err(ChatError::ConnectionClosed) => tracing::info!("Chat connection closed by client"),
        Err(e) => tracing::warn!("Chat connection ended: {}", e),
    }

    // Let the writer flush what is already queued, then stop it
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut send_task)
        .await
        .is_err()
    {
        tracing::debug!("Writer did not drain in time, aborting");
        send_task.abort();
    }
}

/// Drain the outbound queue into the socket.
///
/// Cancels `cancel` when the socket can no longer be written, so the receive
/// loop stops too.
async fn write_responses(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<ChatResponse>,
    cancel: CancellationToken,
) {
    while let Some(response) = rx.recv().await {
        let json = match serde_json::to_string(&ChatResponseDto::from(response)) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize chat response: {}", e);
                continue;
            }
        };
        if let Err(e) = sender.send(Message::Text(json.into())).await {
            tracing::debug!("Failed to write to WebSocket: {}", e);
            break;
        }
    }

    let _ = sender.close().await;
    cancel.cancel();
}

/// Map one inbound frame to a chat action.
///
/// Malformed JSON and non-text frames are dropped; transport errors pass through.
fn decode_frame(
    frame: Result<Message, axum::Error>,
) -> Option<Result<ChatAction, axum::Error>> {
    match frame {
        Ok(Message::Text(text)) => match serde_json::from_str::<ChatRequest>(&text) {
            Ok(request) => Some(Ok(request.into())),
            Err(e) => {
                tracing::warn!("Ignoring malformed chat frame: {}", e);
                None
            }
        },
        Ok(Message::Ping(_)) => {
            tracing::debug!("Received ping");
            None
        }
        Ok(_) => None,
        Err(e) => Some(Err(e)),
    }
}

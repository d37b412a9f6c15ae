use crate::{
    api::AppService,
    core::{
        errors::BillSplitError,
        messages::{ClientMessage, ServerMessage},
        models::{NewMember, Session},
    },
};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(service): State<Arc<AppService>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

/// One connection. Replies and session broadcasts are funnelled through a
/// single outbound queue so only one task writes to the socket.
async fn handle_socket(socket: WebSocket, service: Arc<AppService>) {
    let (mut sink, mut stream) = socket.split();
    let (outbound, mut queue) = mpsc::unbounded_channel::<ServerMessage>();

    let writer = tokio::spawn(async move {
        while let Some(message) = queue.recv().await {
            let text = match message.encode() {
                Ok(text) => text,
                Err(e) => {
                    warn!("Dropping unencodable message: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut connection = Connection::new(service, outbound);

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };

        connection.receive(text.as_str()).await;
    }

    if let Some(code) = &connection.session_code {
        info!("Client left session {}", code);
    }
    connection.stop_relay();
    writer.abort();
}

/// Protocol state of one client: the joined session and the task relaying
/// its broadcasts into the outbound queue.
pub(crate) struct Connection {
    service: Arc<AppService>,
    outbound: mpsc::UnboundedSender<ServerMessage>,
    session_code: Option<String>,
    relay: Option<JoinHandle<()>>,
}

impl Connection {
    pub(crate) fn new(service: Arc<AppService>, outbound: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Connection {
            service,
            outbound,
            session_code: None,
            relay: None,
        }
    }

    /// Handles one text frame; failures go back to the client as ERROR.
    pub(crate) async fn receive(&mut self, raw: &str) {
        if let Err(e) = self.handle(raw).await {
            debug!("Client message rejected: {}", e);
            self.reply(ServerMessage::error(&e));
        }
    }

    fn reply(&self, message: ServerMessage) {
        let _ = self.outbound.send(message);
    }

    pub(crate) fn stop_relay(&mut self) {
        if let Some(relay) = self.relay.take() {
            relay.abort();
        }
    }

    pub(crate) fn joined_code(&self) -> Result<&str, BillSplitError> {
        self.session_code.as_deref().ok_or(BillSplitError::NotJoined)
    }

    async fn handle(&mut self, raw: &str) -> Result<(), BillSplitError> {
        let message = ClientMessage::decode(raw)?;

        if let ClientMessage::JoinSession { code } = message {
            return self.join(Session::normalize_code(&code)).await;
        }

        let code = self.joined_code()?.to_string();
        let service = &self.service;
        match message {
            ClientMessage::JoinSession { .. } => {}
            ClientMessage::MemberAdded { name, slots } => {
                service
                    .add_member(&code, NewMember { name, slots })
                    .await?;
            }
            ClientMessage::MemberUpdated { id, name, slots } => {
                service.update_member(&code, id, name, slots).await?;
            }
            ClientMessage::MemberDeleted { id } => service.delete_member(&code, id).await?,
            ClientMessage::ExpenseAdded(expense) => {
                service.add_expense(&code, expense).await?;
            }
            ClientMessage::ExpenseUpdated(edit) => {
                let (id, update) = edit.into_parts();
                service.update_expense(&code, id, update).await?;
            }
            ClientMessage::ExpenseDeleted { id } => service.delete_expense(&code, id).await?,
            ClientMessage::GroupingUpdated { groups, enabled } => {
                service.update_grouping(&code, groups, enabled).await?;
            }
        }
        Ok(())
    }

    /// Subscribes before reading the session so no edit falls between the
    /// snapshot sent here and the first relayed event.
    async fn join(&mut self, code: String) -> Result<(), BillSplitError> {
        let mut events = self.service.subscribe(&code).await?;
        let view = self.service.get_session_view(&code).await?;

        self.stop_relay();
        let outbound = self.outbound.clone();
        let relay_code = code.clone();
        self.relay = Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(message) => {
                        if outbound.send(message).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Client on session {} lagged, {} messages skipped", relay_code, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));

        info!("Client joined session {}", code);
        self.session_code = Some(code);
        self.reply(ServerMessage::SessionData(Box::new(view)));
        Ok(())
    }
}

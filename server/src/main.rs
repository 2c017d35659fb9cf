use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tower_http::services::ServeDir;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use poker_server::broadcast::TableBroadcast;
use poker_server::router::ClientMessage;
use poker_server::scan::ScanIntake;
use poker_server::store::InMemoryStore;
use poker_server::tables::{ActorMsg, TableRegistry};
use texas_engine::ids::{PlayerId, TableId};
use texas_engine::table::Table;

#[derive(Clone)]
struct AppState {
    registry: Arc<TableRegistry>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: axum::extract::ws::WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(msg) = client_rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(Message::Text(text))) = ws_rx.next().await {
        let parsed: Result<ClientMessage, _> = serde_json::from_str(&text);
        let Ok(msg) = parsed else {
            let _ = client_tx.send(Message::Text(r#"{"type":"error","message":"bad_json"}"#.into()));
            continue;
        };

        let table_id = msg.table_id().clone();
        let handle = state.registry.handle_for(&table_id).await;
        let _ = handle.send(ActorMsg::Subscribe {
            viewer: player_id_hint(&msg),
            tx: client_tx.clone(),
        });

        if let ClientMessage::GetSnapshot { viewer, .. } = &msg {
            let (reply_tx, reply_rx) = oneshot::channel();
            let _ = handle.send(ActorMsg::Snapshot {
                viewer: viewer.clone(),
                reply: reply_tx,
            });
            if let Ok(snapshot) = reply_rx.await {
                if let Ok(text) = serde_json::to_string(&snapshot) {
                    let _ = client_tx.send(Message::Text(text));
                }
            }
            continue;
        }

        let Some((actor, command)) = msg.into_actor_command() else {
            let _ = client_tx.send(Message::Text(r#"{"type":"error","message":"no_command_for_message"}"#.into()));
            continue;
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = handle.send(ActorMsg::Apply { actor, command, reply: reply_tx });
        if let Ok(Err(err)) = reply_rx.await {
            let _ = client_tx.send(Message::Text(format!(r#"{{"type":"error","message":"{err}"}}"#)));
        }
    }

    let _ = writer.await;
}

/// Extracts the acting player's id from messages that carry one, so the
/// subscriber registered for this connection is tagged with it (needed for
/// the hole-card redaction the broadcast layer performs per viewer).
fn player_id_hint(msg: &ClientMessage) -> Option<PlayerId> {
    match msg {
        ClientMessage::Join { player_id, .. }
        | ClientMessage::Leave { player_id, .. }
        | ClientMessage::Raise { player_id, .. }
        | ClientMessage::Call { player_id, .. }
        | ClientMessage::Check { player_id, .. }
        | ClientMessage::Fold { player_id, .. }
        | ClientMessage::AllIn { player_id, .. } => Some(player_id.clone()),
        ClientMessage::GetSnapshot { viewer, .. } => viewer.clone(),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let store = InMemoryStore::new();
    store
        .create_table(Table::new(TableId::new("main"), "main", PlayerId::new("house-dealer"), 5, 10))
        .expect("seed table");

    let broadcast = Arc::new(TableBroadcast::new());
    let registry = Arc::new(TableRegistry::new(store, broadcast));

    // The scanner daemon is an external process; this demo binary only
    // stands up the consumer side of the queue so `ScanIntake` has
    // somewhere to run. A real deployment wires `scan_tx` to whatever
    // transport the scanner daemon publishes over.
    let (_scan_tx, scan_rx) = mpsc::channel(256);
    Arc::new(ScanIntake::new(registry.clone())).spawn(scan_rx);

    let state = AppState { registry };
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .nest_service("/", ServeDir::new("public"))
        .with_state(state);

    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

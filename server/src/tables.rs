//! The per-table actor: one `tokio::task` per table, mailbox-serialized,
//! grounded in `poker-ws::main::TableActor`. RPC commands and decoded scan
//! commands are both funneled through the same mailbox, giving the total
//! order per table that `engine::mutator::TableMutator`'s own lock doesn't
//! need to provide across the async boundary — the mailbox is the
//! serialization primitive, the mutator's mutex just protects the
//! synchronous core from being called from two places.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{info, warn};

use texas_engine::command::{Actor, Command};
use texas_engine::error::EngineError;
use texas_engine::ids::{PlayerId, TableId};
use texas_engine::mutator::TableMutator;
use texas_engine::snapshot::{self, TableSnapshot};

use crate::broadcast::{ClientTx, TableBroadcast};
use crate::store::InMemoryStore;

pub enum ActorMsg {
    Apply {
        actor: Actor,
        command: Command,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    Subscribe {
        viewer: Option<PlayerId>,
        tx: ClientTx,
    },
    Snapshot {
        viewer: Option<PlayerId>,
        reply: oneshot::Sender<TableSnapshot>,
    },
}

pub type ActorHandle = mpsc::UnboundedSender<ActorMsg>;

struct TableActor {
    table_id: TableId,
    rx: mpsc::UnboundedReceiver<ActorMsg>,
    mutator: Arc<TableMutator<InMemoryStore>>,
    broadcast: Arc<TableBroadcast>,
}

impl TableActor {
    fn spawn(table_id: TableId, mutator: Arc<TableMutator<InMemoryStore>>, broadcast: Arc<TableBroadcast>) -> ActorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut actor = TableActor {
            table_id,
            rx,
            mutator,
            broadcast,
        };
        tokio::spawn(async move {
            while let Some(msg) = actor.rx.recv().await {
                actor.handle(msg);
            }
        });
        tx
    }

    fn handle(&self, msg: ActorMsg) {
        match msg {
            ActorMsg::Apply { actor, command, reply } => {
                let result = self.mutator.apply(&self.table_id, actor, command, self.broadcast.as_ref());
                if let Err(err) = &result {
                    warn!(table_id = %self.table_id, %err, "command rejected");
                }
                let _ = reply.send(result);
            }
            ActorMsg::Subscribe { viewer, tx } => {
                info!(table_id = %self.table_id, viewer = ?viewer, "subscriber joined");
                self.broadcast.subscribe(&self.table_id, viewer, tx);
            }
            ActorMsg::Snapshot { viewer, reply } => {
                let snap = self
                    .mutator
                    .load(&self.table_id)
                    .map(|state| snapshot::snapshot(&state.table, &state.seats, state.hand.as_ref(), viewer.as_ref()));
                if let Ok(snap) = snap {
                    let _ = reply.send(snap);
                }
            }
        }
    }
}

/// Looks up or lazily spawns the actor for a table, and owns the shared
/// mutator/broadcast every actor is built from (one `TableMutator` per
/// process, since its lock registry is itself keyed by `TableId`).
pub struct TableRegistry {
    mutator: Arc<TableMutator<InMemoryStore>>,
    broadcast: Arc<TableBroadcast>,
    handles: Mutex<HashMap<TableId, ActorHandle>>,
}

impl TableRegistry {
    pub fn new(store: InMemoryStore, broadcast: Arc<TableBroadcast>) -> Self {
        Self {
            mutator: Arc::new(TableMutator::new(store)),
            broadcast,
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub async fn handle_for(&self, table_id: &TableId) -> ActorHandle {
        let mut handles = self.handles.lock().await;
        handles
            .entry(table_id.clone())
            .or_insert_with(|| TableActor::spawn(table_id.clone(), self.mutator.clone(), self.broadcast.clone()))
            .clone()
    }
}

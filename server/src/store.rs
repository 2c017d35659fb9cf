//! In-memory `TableStore`, the demo/test stand-in for the repeatable-read
//! persistence layer `engine::mutator::TableMutator` expects. A real
//! deployment swaps this for a row store without touching `texas_engine`.

use std::collections::HashMap;
use std::sync::Mutex;

use texas_engine::error::EngineError;
use texas_engine::ids::TableId;
use texas_engine::mutator::{TableState, TableStore};
use texas_engine::table::Table;

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<TableId, TableState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a brand new table with no seats and no hand. Returns
    /// `Fatal` if the id is already in use — callers create tables once,
    /// up front, outside the regular command flow.
    pub fn create_table(&self, table: Table) -> Result<(), EngineError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.contains_key(&table.id) {
            return Err(EngineError::Fatal(format!("table {} already exists", table.id)));
        }
        tables.insert(
            table.id.clone(),
            TableState {
                table,
                seats: Vec::new(),
                hand: None,
            },
        );
        Ok(())
    }
}

impl TableStore for InMemoryStore {
    fn load(&self, table_id: &TableId) -> Result<TableState, EngineError> {
        self.tables
            .lock()
            .unwrap()
            .get(table_id)
            .cloned()
            .ok_or_else(|| EngineError::Fatal(format!("unknown table {table_id}")))
    }

    fn commit(&self, state: TableState) -> Result<(), EngineError> {
        self.tables.lock().unwrap().insert(state.table.id.clone(), state);
        Ok(())
    }
}

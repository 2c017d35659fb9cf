//! `poker-server`: the asynchronous shell around `texas-engine` (the
//! transactional wrapper, the scan queue worker, the WebSocket transport,
//! structured logging). Mirrors `poker-ws`'s split from its engine crate —
//! everything here is I/O and scheduling; rule enforcement stays in
//! `texas_engine`.

pub mod broadcast;
pub mod router;
pub mod scan;
pub mod store;
pub mod tables;

pub use tables::TableRegistry;

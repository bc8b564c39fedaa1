//! Application state wiring the store and the routing table together.
//!
//! The shared store handle is created exactly once at process start and
//! reaches every handler invocation through this state -- handlers stay
//! independently testable with an injected in-memory store.

use std::sync::Arc;

use chatsync_core::dispatch::TriggerRouter;
use chatsync_infra::sqlite::document::SqliteDocumentStore;
use chatsync_infra::sqlite::pool::{DatabasePool, resolve_data_dir};

/// Concrete routing table pinned to the SQLite store.
pub type ConcreteTriggerRouter = TriggerRouter<SqliteDocumentStore>;

/// Shared application state used by the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub trigger_router: Arc<ConcreteTriggerRouter>,
}

impl AppState {
    /// Initialize the application state: open the database and build the
    /// routing table over it.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("chatsync.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let store = Arc::new(SqliteDocumentStore::new(db_pool));
        let trigger_router = Arc::new(TriggerRouter::new(store));

        Ok(Self { trigger_router })
    }
}

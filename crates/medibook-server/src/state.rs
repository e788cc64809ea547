use crate::config::ServerConfig;
use crate::directory::AdminDirectory;
use crate::documents::DocumentStore;
use crate::mailbox::Mailbox;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub mailbox: Arc<Mailbox>,
    pub documents: Arc<DocumentStore>,
    pub admins: Arc<AdminDirectory>,
}

impl AppState {
    pub fn new(pool: PgPool, config: ServerConfig, documents: DocumentStore) -> Self {
        Self {
            mailbox: Arc::new(Mailbox::new(pool.clone())),
            admins: Arc::new(AdminDirectory::new(pool.clone())),
            pool,
            config: Arc::new(config),
            documents: Arc::new(documents),
        }
    }
}

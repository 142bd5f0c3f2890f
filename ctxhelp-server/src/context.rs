//! ctxhelp-server/src/context.rs
//!
//! Builds the store, policy and service the HTTP router runs on.

use std::fs;
use std::sync::Arc;
use tracing::info;

use ctxhelp_common::models::NewContextHelp;
use ctxhelp_common::traits::auth_traits::EditorPolicy;
use ctxhelp_common::traits::repository_traits::ContextHelpRepository;
use ctxhelp_core::auth::RolePolicy;
use ctxhelp_core::repositories::{InMemoryContextHelpRepository, PostgresContextHelpRepository};
use ctxhelp_core::{ContextHelpService, Database, Error};

use crate::Args;

pub struct ServerContext {
    /// `None` in `--memory` mode.
    pub db: Option<Database>,
    pub service: Arc<ContextHelpService>,
}

impl ServerContext {
    pub async fn new(args: &Args) -> Result<Self, Error> {
        // 1) Store
        let db: Option<Database>;
        let repo: Arc<dyn ContextHelpRepository + Send + Sync>;
        if args.memory {
            info!("Using in-memory context help store (contents are lost on exit)");
            db = None;
            repo = Arc::new(InMemoryContextHelpRepository::new());
        } else {
            let pg = Database::new(&args.db_path).await?;
            pg.migrate().await?;
            repo = Arc::new(PostgresContextHelpRepository::new(pg.pool().clone()));
            db = Some(pg);
        }

        // 2) Who may edit
        info!("Help editors are members of role '{}'", args.editor_role);
        let policy: Arc<dyn EditorPolicy + Send + Sync> =
            Arc::new(RolePolicy::new(args.editor_role.clone()));

        // 3) Service
        let service = Arc::new(ContextHelpService::new(repo, policy)?);

        if let Some(path) = args.seed.as_ref() {
            let raw = fs::read_to_string(path)?;
            let entries: Vec<NewContextHelp> = serde_json::from_str(&raw)?;
            info!("Seeding {} entries from {}", entries.len(), path.display());
            service.seed(entries).await?;
        }

        Ok(Self { db, service })
    }
}

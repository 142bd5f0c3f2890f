// File: ctxhelp-core/src/repositories/memory.rs
//
// Process-local store. Used by tests and by the server's `--memory` mode.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use async_trait::async_trait;
use parking_lot::RwLock;
use ctxhelp_common::error::Error;
use ctxhelp_common::models::{ContextHelp, NewContextHelp};
use ctxhelp_common::traits::repository_traits::ContextHelpRepository;

pub struct InMemoryContextHelpRepository {
    rows: RwLock<BTreeMap<i32, ContextHelp>>,
    next_id: AtomicI32,
}

impl Default for InMemoryContextHelpRepository {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

impl InMemoryContextHelpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl ContextHelpRepository for InMemoryContextHelpRepository {
    async fn create_context_help(&self, new: &NewContextHelp) -> Result<ContextHelp, Error> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = new.clone().into_record(id);
        self.rows.write().insert(id, record.clone());
        Ok(record)
    }

    async fn get_context_help(&self, context_help_id: i32) -> Result<Option<ContextHelp>, Error> {
        Ok(self.rows.read().get(&context_help_id).cloned())
    }

    async fn list_context_help(&self) -> Result<Vec<ContextHelp>, Error> {
        let mut out: Vec<ContextHelp> = self.rows.read().values().cloned().collect();
        out.sort_by(|a, b| a.listing_key().cmp(&b.listing_key()));
        Ok(out)
    }

    async fn list_context_help_for_controller(
        &self,
        controller: &str,
    ) -> Result<Vec<ContextHelp>, Error> {
        // BTreeMap iteration is already id-ascending.
        Ok(self
            .rows
            .read()
            .values()
            .filter(|ch| ch.controller == controller)
            .cloned()
            .collect())
    }

    async fn update_context_help(&self, ch: &ContextHelp) -> Result<(), Error> {
        let mut rows = self.rows.write();
        match rows.get_mut(&ch.context_help_id) {
            Some(existing) => {
                *existing = ch.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("context help {}", ch.context_help_id))),
        }
    }

    async fn delete_context_help(&self, context_help_id: i32) -> Result<(), Error> {
        match self.rows.write().remove(&context_help_id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(format!("context help {context_help_id}"))),
        }
    }
}

use async_trait::async_trait;
use crate::error::Error;
use crate::models::{ContextHelp, NewContextHelp};

/// Persistent store of help entries.
///
/// No uniqueness is enforced on (controller, action, property); duplicates are
/// legal and settled by the resolver's tie-break.
#[async_trait]
pub trait ContextHelpRepository: Send + Sync {
    /// Inserts a new entry and returns it with its generated id.
    async fn create_context_help(&self, new: &NewContextHelp) -> Result<ContextHelp, Error>;

    async fn get_context_help(&self, context_help_id: i32) -> Result<Option<ContextHelp>, Error>;

    /// All entries ordered by (controller, action, property), nulls first, then id.
    /// Keys compare bytewise, so `"Zeta"` sorts before `"alpha"`.
    async fn list_context_help(&self) -> Result<Vec<ContextHelp>, Error>;

    /// Candidate set for one controller (exact match).
    async fn list_context_help_for_controller(
        &self,
        controller: &str,
    ) -> Result<Vec<ContextHelp>, Error>;

    /// Overwrites every field of the row with `ch.context_help_id`.
    /// Returns `Error::NotFound` if there is no such row.
    async fn update_context_help(&self, ch: &ContextHelp) -> Result<(), Error>;

    /// Returns `Error::NotFound` if there is no such row.
    async fn delete_context_help(&self, context_help_id: i32) -> Result<(), Error>;
}

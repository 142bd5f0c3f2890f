// File: ctxhelp-core/src/services/context_help_service.rs

use std::sync::Arc;
use tracing::{debug, info, warn};
use ctxhelp_common::models::{Actor, ContextHelp, HelpQuery, NewContextHelp};
use ctxhelp_common::traits::auth_traits::EditorPolicy;
use ctxhelp_common::traits::repository_traits::ContextHelpRepository;
use crate::Error;
use crate::render::{HelpDisplay, HelpRenderer, HelpStyle};
use crate::resolver;

/// Editor CRUD plus page lookups over one help store.
pub struct ContextHelpService {
    repo: Arc<dyn ContextHelpRepository + Send + Sync>,
    policy: Arc<dyn EditorPolicy + Send + Sync>,
    renderer: HelpRenderer,
}

impl ContextHelpService {
    pub fn new(
        repo: Arc<dyn ContextHelpRepository + Send + Sync>,
        policy: Arc<dyn EditorPolicy + Send + Sync>,
    ) -> Result<Self, Error> {
        debug!("Initializing ContextHelpService");
        Ok(Self {
            repo,
            policy,
            renderer: HelpRenderer::new()?,
        })
    }

    pub fn may_edit(&self, actor: &Actor) -> bool {
        self.policy.may_edit(actor)
    }

    /// `Forbidden` unless `actor` may edit; `what` names the attempted write in the log.
    pub fn require_editor(&self, actor: &Actor, what: &str) -> Result<(), Error> {
        if self.may_edit(actor) {
            return Ok(());
        }
        warn!(
            "Rejected {} of context help by {:?}",
            what,
            actor.name.as_deref().unwrap_or("<anonymous>")
        );
        Err(Error::Forbidden(format!("not allowed to {what} context help")))
    }

    // ------------------------------------------------------------
    // Editor surface
    // ------------------------------------------------------------

    pub async fn list(&self) -> Result<Vec<ContextHelp>, Error> {
        self.repo.list_context_help().await
    }

    pub async fn get(&self, context_help_id: i32) -> Result<ContextHelp, Error> {
        self.repo
            .get_context_help(context_help_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("context help {context_help_id}")))
    }

    /// Blank form for the create page, pre-filled from the page that linked to it.
    pub fn create_template(
        &self,
        controller: Option<&str>,
        action: Option<&str>,
        property: Option<&str>,
    ) -> NewContextHelp {
        NewContextHelp {
            controller: controller.unwrap_or_default().to_string(),
            action: action.map(str::to_string),
            property: property.map(str::to_string),
            help_text: None,
            tooltip: None,
        }
    }

    pub async fn create(&self, actor: &Actor, new: NewContextHelp) -> Result<ContextHelp, Error> {
        self.require_editor(actor, "create")?;
        let new = new.normalized()?;
        let created = self.repo.create_context_help(&new).await?;
        info!(
            "Created context help {} for {}/{:?}/{:?}",
            created.context_help_id, created.controller, created.action, created.property
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        context_help_id: i32,
        changes: NewContextHelp,
    ) -> Result<ContextHelp, Error> {
        self.require_editor(actor, "edit")?;
        let record = changes.normalized()?.into_record(context_help_id);
        self.repo.update_context_help(&record).await?;
        info!("Updated context help {}", context_help_id);
        Ok(record)
    }

    pub async fn delete(&self, actor: &Actor, context_help_id: i32) -> Result<(), Error> {
        self.require_editor(actor, "delete")?;
        self.repo.delete_context_help(context_help_id).await?;
        info!("Deleted context help {}", context_help_id);
        Ok(())
    }

    /// Inserts entries without a policy check; used for start-up seeding.
    pub async fn seed(&self, entries: Vec<NewContextHelp>) -> Result<usize, Error> {
        let mut count = 0;
        for new in entries {
            self.repo.create_context_help(&new.normalized()?).await?;
            count += 1;
        }
        info!("Seeded {} context help entries", count);
        Ok(count)
    }

    // ------------------------------------------------------------
    // Lookup surface
    // ------------------------------------------------------------

    /// The single best entry for `query`, if any.
    pub async fn lookup(&self, query: &HelpQuery) -> Result<Option<ContextHelp>, Error> {
        let candidates = self
            .repo
            .list_context_help_for_controller(query.controller())
            .await?;
        let found = resolver::resolve_owned(query, &candidates);
        debug!(
            "lookup {}/{:?}/{:?} => {:?} ({} candidates)",
            query.controller(),
            query.action(),
            query.property(),
            found.as_ref().map(|ch| ch.context_help_id),
            candidates.len()
        );
        Ok(found)
    }

    /// Every entry that applies to `query`, best first. The head is what
    /// [`lookup`](Self::lookup) returns.
    pub async fn ranked(&self, query: &HelpQuery) -> Result<Vec<ContextHelp>, Error> {
        let candidates = self
            .repo
            .list_context_help_for_controller(query.controller())
            .await?;
        Ok(resolver::rank(query, &candidates).into_iter().cloned().collect())
    }

    /// Display data for `query`, including the edit link when `actor` may edit.
    pub async fn display(
        &self,
        query: &HelpQuery,
        label: Option<&str>,
        style: HelpStyle,
        actor: &Actor,
    ) -> Result<HelpDisplay, Error> {
        let resolved = self.lookup(query).await?;
        Ok(HelpDisplay::for_query(
            query,
            label,
            resolved.as_ref(),
            self.may_edit(actor),
            style,
        ))
    }

    /// HTML fragment for `query`.
    pub async fn render(
        &self,
        query: &HelpQuery,
        label: Option<&str>,
        style: HelpStyle,
        actor: &Actor,
    ) -> Result<String, Error> {
        let display = self.display(query, label, style, actor).await?;
        self.renderer.render(&display)
    }
}

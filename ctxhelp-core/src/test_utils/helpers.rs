// File: ctxhelp-core/src/test_utils/helpers.rs

use std::sync::Arc;
use sqlx::{Pool, Postgres};
use sqlx::postgres::PgPoolOptions;
use ctxhelp_common::models::NewContextHelp;
use crate::Error;
use crate::auth::EditorPolicy;
use crate::db::Database;
use crate::repositories::InMemoryContextHelpRepository;
use crate::services::ContextHelpService;

/// The Postgres URL for repository tests, if the environment provides one.
/// Tests that need a live database skip themselves when this is `None`.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok().filter(|v| !v.trim().is_empty())
}

/// Create a connection pool to the test DB.
pub async fn create_test_db_pool(url: &str) -> Result<Pool<Postgres>, Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Wipes out test data so each test can start fresh.
pub async fn clean_database(pool: &Pool<Postgres>) -> Result<(), Error> {
    sqlx::query("TRUNCATE TABLE context_help RESTART IDENTITY;")
        .execute(pool)
        .await?;

    Ok(())
}

/// Returns a migrated, empty test DB handle.
pub async fn setup_test_database(url: &str) -> Result<Database, Error> {
    let pool = create_test_db_pool(url).await?;
    let db = Database::from_pool(pool);
    db.migrate().await?;
    clean_database(db.pool()).await?;

    Ok(db)
}

/// A service over a fresh in-memory store, plus the store itself for assertions.
pub fn in_memory_service(
    policy: Arc<dyn EditorPolicy + Send + Sync>,
) -> Result<(Arc<ContextHelpService>, Arc<InMemoryContextHelpRepository>), Error> {
    let repo = Arc::new(InMemoryContextHelpRepository::new());
    let svc = ContextHelpService::new(repo.clone(), policy)?;
    Ok((Arc::new(svc), repo))
}

/// The four entries used throughout the tests: page-wide, action-only,
/// property-only and action+property, all for controller `Course`.
pub fn course_fixture() -> Vec<NewContextHelp> {
    vec![
        NewContextHelp::new("Course").with_help_text("All about courses"),
        NewContextHelp::new("Course")
            .with_action("Edit")
            .with_help_text("Editing a course"),
        NewContextHelp::new("Course")
            .with_property("Title")
            .with_help_text("The course title")
            .with_tooltip("Title"),
        NewContextHelp::new("Course")
            .with_action("Edit")
            .with_property("Title")
            .with_help_text("Changing the title")
            .with_tooltip("New title"),
    ]
}

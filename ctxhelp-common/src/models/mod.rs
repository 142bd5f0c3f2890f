// File: ctxhelp-common/src/models/mod.rs
pub mod actor;
pub mod context_help;
pub mod help_query;

pub use actor::Actor;
pub use context_help::{ContextHelp, NewContextHelp};
pub use help_query::HelpQuery;

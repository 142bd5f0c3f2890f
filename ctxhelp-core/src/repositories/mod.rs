// src/repositories/mod.rs

pub use ctxhelp_common::traits::repository_traits::ContextHelpRepository;

pub use memory::InMemoryContextHelpRepository;
pub use postgres::PostgresContextHelpRepository;

pub mod memory;
pub mod postgres;

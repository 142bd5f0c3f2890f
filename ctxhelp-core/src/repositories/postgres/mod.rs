// src/repositories/postgres/mod.rs

pub mod context_help;

pub use context_help::PostgresContextHelpRepository;

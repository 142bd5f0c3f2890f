// File: src/services/mod.rs

pub mod context_help_service;

pub use context_help_service::ContextHelpService;

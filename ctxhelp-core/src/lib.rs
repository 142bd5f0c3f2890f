// src/lib.rs

pub mod db;
pub mod repositories;
pub mod resolver;
pub mod render;
pub mod auth;
pub mod services;
pub mod http;
pub mod test_utils;

pub use db::Database;
pub use ctxhelp_common::error::Error;
pub use ctxhelp_common::models;
pub use services::ContextHelpService;

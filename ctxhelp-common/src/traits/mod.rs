pub mod auth_traits;
pub mod repository_traits;

pub use auth_traits::EditorPolicy;
pub use repository_traits::ContextHelpRepository;

pub mod auth_handlers;
pub mod error;
pub mod file_handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub mod agent;
pub mod config_manager;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;
pub mod translate;

pub use config_manager::Config;
pub use routes::create_app;
pub use state::AppState;
pub use translate::{TranslateError, TranslationRequest, TranslationResult, Translator};

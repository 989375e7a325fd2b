pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod locale;
pub mod models;
pub mod mutations;
pub mod query;
pub mod state;
pub mod summary;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;

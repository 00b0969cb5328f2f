pub mod actions;
pub mod app;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod filter;
pub mod gate;
pub mod handlers;
pub mod mock;
pub mod models;
pub mod notify;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use backend::{GameBackend, HttpBackend};
pub use config::AppConfig;
pub use mock::MockBackend;
pub use state::AppState;
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};

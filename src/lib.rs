pub mod achievements;
pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod profile;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{Store, resolve_data_path};

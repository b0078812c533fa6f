pub mod analytics;
pub mod app;
pub mod errors;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod state;
pub mod storage;

pub use analytics::{MoodReport, analyze};
pub use app::router;
pub use models::CheckIn;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};

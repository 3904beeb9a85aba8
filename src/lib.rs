pub mod aggregate;
pub mod app;
pub mod config;
pub mod errors;
pub mod estimate;
pub mod factors;
pub mod goal;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod score;
pub mod source;
pub mod state;

pub use app::router;
pub use config::Settings;
pub use state::AppState;

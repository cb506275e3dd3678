pub mod aggregation;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod records;
pub mod registry;
pub mod scoring;
pub mod state;
pub mod storage;
pub mod targets;
pub mod team;
pub mod ui;
pub mod views;

pub use app::router;
pub use config::AppConfig;
pub use registry::CategoryRegistry;
pub use state::{AppState, load_documents};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SalesRepository};

pub mod cli;
pub mod config;
pub mod draft;
pub mod models;
pub mod store;
pub mod sync;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{LogEntry, WorkItem};
pub use store::{KvStore, SqliteStore};
pub use sync::SyncEngine;
pub use utils::Profile;

use chrono::{DateTime, Utc};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod telemetry;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::utils;

use entities::work_entry::WorkCollection;

pub struct AppState {
    pub name: String,
    pub work: WorkCollection,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(name: impl Into<String>, work: WorkCollection) -> Self {
        AppState {
            name: name.into(),
            work,
            started_at: Utc::now(),
        }
    }
}

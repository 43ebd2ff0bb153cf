//! Juicery Server - operations backend for a juice-processing plant
//!
//! Customer intake, QR-tracked crates, pallets and shelves, the order status
//! workflow, SMS notifications and label printing.
//!
//! # Module structure
//!
//! ```text
//! juicery-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── workflow/      # intake, status transitions, pallet/shelf assignment, bin
//! ├── events/        # event bus and WebSocket transport
//! ├── notify/        # SMS gateways and auto-notify
//! ├── printing/      # order labels on the network printer
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod events;
pub mod notify;
pub mod printing;
pub mod utils;
pub mod workflow;

pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use events::EventBus;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Initialize logging from the loaded config
///
/// Keep the returned guard alive for the life of the process when logging to
/// files.
pub fn setup_environment(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    )
}

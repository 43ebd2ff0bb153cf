//! Shared server state
//!
//! Cloned into every handler by axum. Everything inside is either `Arc` or a
//! cheap handle (pool, broadcast sender).

use std::sync::Arc;

use sqlx::SqlitePool;

use super::{Config, Result};
use crate::db::DbService;
use crate::events::EventBus;
use crate::notify::{LogGateway, SmsGateway, SnsGateway};
use crate::printing::PrintService;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub events: EventBus,
    pub sms: Arc<dyn SmsGateway>,
    pub printer: Arc<PrintService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, sms: Arc<dyn SmsGateway>) -> Self {
        let events = EventBus::with_capacity(config.event_channel_capacity);
        let printer = Arc::new(PrintService::from_config(&config));
        Self {
            config: Arc::new(config),
            pool: db.pool,
            events,
            sms,
            printer,
        }
    }

    /// Open the database and pick the SMS gateway from the config
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;

        let sms: Arc<dyn SmsGateway> = if config.sms_enabled {
            Arc::new(SnsGateway::from_env(config.sms_sender_id.clone()).await)
        } else {
            Arc::new(LogGateway)
        };
        tracing::info!(gateway = sms.name(), "SMS gateway ready");

        if !PrintService::from_config(config).is_configured() {
            tracing::warn!("PRINTER_HOST not set, label printing disabled");
        }

        Ok(Self::new(config.clone(), db, sms))
    }

    /// State over an existing database with the log-only SMS gateway
    ///
    /// Used by tests
    pub fn with_db(config: Config, db: DbService) -> Self {
        Self::new(config, db, Arc::new(LogGateway))
    }

    /// Start background subscribers
    pub fn start_background_tasks(&self) {
        if self.config.sms_notify_on_ready {
            crate::notify::spawn_auto_notify(self.pool.clone(), &self.events, self.sms.clone());
        }
    }
}

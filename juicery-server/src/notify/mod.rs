//! Customer notifications
//!
//! - [`gateway`] - SMS transport (AWS SNS, or log-only when disabled)
//! - [`notify_order_ready`] - "ready for pickup" text for one order
//! - [`spawn_auto_notify`] - background subscriber texting on every `orderReady`

pub mod gateway;

use std::sync::Arc;

use shared::message::ServerEvent;
use shared::models::{Customer, Order};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::instrument;

pub use gateway::{LogGateway, SmsError, SmsGateway, SnsGateway};

use crate::db::repository::{customer, order};
use crate::events::EventBus;
use crate::utils::{AppError, ErrorCode, ServiceResult};

/// Text sent when an order can be picked up
pub fn ready_message(customer: &Customer, order: &Order) -> String {
    format!(
        "Hi {}, your juice order #{} ({} pouches) is ready for pickup.",
        customer.name, order.id, order.total_pouches
    )
}

/// Send the "ready for pickup" SMS for an order to its customer
#[instrument(skip(pool, sms), fields(gateway = sms.name()))]
pub async fn notify_order_ready(pool: &SqlitePool, sms: &dyn SmsGateway, order_id: i64) -> ServiceResult<()> {
    let order = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::order_not_found(order_id))?;
    let customer = customer::get(pool, order.customer_id).await?;

    let message = ready_message(&customer, &order);
    sms.send(&customer.phone, &message).await.map_err(|e| {
        tracing::error!(order_id, error = %e, "Ready SMS failed");
        AppError::with_message(ErrorCode::SmsFailed, e.to_string()).with_detail("order_id", order_id)
    })?;

    Ok(())
}

/// Text the customer whenever an order becomes ready
///
/// Failures are logged and never retried. The task ends when the bus closes.
pub fn spawn_auto_notify(pool: SqlitePool, events: &EventBus, sms: Arc<dyn SmsGateway>) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        tracing::info!(gateway = sms.name(), "SMS auto-notify started");
        loop {
            match rx.recv().await {
                Ok(ServerEvent::OrderReady { order_id }) => {
                    if let Err(e) = notify_order_ready(&pool, sms.as_ref(), order_id).await {
                        let e = AppError::from(e);
                        tracing::warn!(order_id, error = %e, "Auto-notify failed");
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Auto-notify lagged, some ready orders not texted");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::info!("SMS auto-notify stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGateway {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SmsGateway for RecordingGateway {
        async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError> {
            self.sent.lock().unwrap().push((phone.to_string(), message.to_string()));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl SmsGateway for FailingGateway {
        async fn send(&self, _phone: &str, _message: &str) -> Result<(), SmsError> {
            Err(SmsError::Gateway("throttled".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    async fn seed(pool: &SqlitePool) -> i64 {
        let req = shared::models::IntakeRequest {
            name: "Anna".into(),
            phone: "+358401234567".into(),
            email: None,
            address: None,
            total_pouches: Some(5),
            weight_kg: None,
            comment: None,
        };
        crate::workflow::register_order(pool, &EventBus::new(), Default::default(), req)
            .await
            .unwrap()
            .order
            .id
    }

    #[tokio::test]
    async fn test_notify_sends_to_customer_phone() {
        let db = crate::db::DbService::in_memory().await.unwrap();
        let id = seed(&db.pool).await;
        let gw = RecordingGateway::default();

        notify_order_ready(&db.pool, &gw, id).await.unwrap();

        let sent = gw.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+358401234567");
        assert!(sent[0].1.contains(&format!("#{id}")));
        assert!(sent[0].1.contains("ready for pickup"));
    }

    #[tokio::test]
    async fn test_gateway_failure_maps_to_sms_failed() {
        let db = crate::db::DbService::in_memory().await.unwrap();
        let id = seed(&db.pool).await;
        let err = AppError::from(notify_order_ready(&db.pool, &FailingGateway, id).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::SmsFailed);

        let err = AppError::from(notify_order_ready(&db.pool, &FailingGateway, 404).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn test_auto_notify_texts_on_ready() {
        let db = crate::db::DbService::in_memory().await.unwrap();
        let id = seed(&db.pool).await;
        let bus = EventBus::new();
        let gw = Arc::new(RecordingGateway::default());
        let handle = spawn_auto_notify(db.pool.clone(), &bus, gw.clone());

        bus.publish(ServerEvent::OrderCreated { order_id: id });
        bus.publish(ServerEvent::OrderReady { order_id: id });

        for _ in 0..50 {
            if !gw.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(gw.sent.lock().unwrap().len(), 1);
        handle.abort();
    }
}

//! Customer intake: one customer, one pending order and its crates

use shared::message::ServerEvent;
use shared::models::{IntakeRequest, IntakeResult};
use shared::qr::QrKind;
use sqlx::SqlitePool;
use tracing::instrument;

use super::packing;
use crate::core::Config;
use crate::db::repository::customer::{self, CustomerInsert};
use crate::db::repository::{crates, order::{self, OrderInsert}};
use crate::events::EventBus;
use crate::utils::{AppError, ErrorCode, ServiceResult};

/// Largest pouch total one order may register (500 crates)
pub const DEFAULT_MAX_ORDER_POUCHES: i64 = 4000;

/// Intake parameters taken from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakeRules {
    /// Pouch yield per kilogram when only the weight is recorded
    pub pouches_per_kg: f64,
    pub max_pouches: i64,
}

impl Default for IntakeRules {
    fn default() -> Self {
        Self {
            pouches_per_kg: 0.2,
            max_pouches: DEFAULT_MAX_ORDER_POUCHES,
        }
    }
}

impl From<&Config> for IntakeRules {
    fn from(config: &Config) -> Self {
        Self {
            pouches_per_kg: config.pouches_per_kg,
            max_pouches: config.max_order_pouches,
        }
    }
}

/// Pouch total of an intake, from the explicit count or the fruit weight
///
/// Fails before any I/O when required fields are blank, the order would be
/// empty or it exceeds `rules.max_pouches`.
pub fn validate(req: &IntakeRequest, rules: IntakeRules) -> Result<i64, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Customer name is required").with_detail("field", "name"));
    }
    if req.phone.trim().is_empty() {
        return Err(AppError::validation("Customer phone is required").with_detail("field", "phone"));
    }

    let pouches = match (req.total_pouches, req.weight_kg) {
        (Some(total), _) => total,
        (None, Some(kg)) if kg > 0.0 => packing::pouches_for_weight(kg, rules.pouches_per_kg),
        (None, Some(_)) => {
            return Err(AppError::validation("Weight must be positive").with_detail("field", "weight_kg"));
        }
        (None, None) => {
            return Err(AppError::validation("Either total_pouches or weight_kg is required")
                .with_detail("field", "total_pouches"));
        }
    };

    if pouches < 1 {
        return Err(AppError::new(ErrorCode::OrderEmpty).with_detail("total_pouches", pouches));
    }
    if pouches > rules.max_pouches {
        return Err(AppError::out_of_range("total_pouches", pouches, rules.max_pouches));
    }
    Ok(pouches)
}

/// Register a customer with a new order and its crates in one transaction
///
/// Emits `orderCreated` after commit.
#[instrument(skip(pool, events, req), fields(customer = %req.name))]
pub async fn register_order(
    pool: &SqlitePool,
    events: &EventBus,
    rules: IntakeRules,
    req: IntakeRequest,
) -> ServiceResult<IntakeResult> {
    let total_pouches = validate(&req, rules)?;
    let loads = packing::pack(total_pouches);
    let now = shared::util::now_millis();
    let comment = req.comment.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let mut tx = pool.begin().await?;

    let customer = customer::insert(
        &mut *tx,
        CustomerInsert {
            name: req.name.trim(),
            phone: req.phone.trim(),
            email: req.email.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            address: req.address.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        },
        now,
    )
    .await?;

    let order = order::insert(
        &mut *tx,
        OrderInsert {
            customer_id: customer.id,
            total_pouches,
            weight_kg: req.weight_kg,
            comment,
        },
        now,
    )
    .await?;

    let mut registered = Vec::with_capacity(loads.len());
    for pouch_count in loads {
        let qr = QrKind::Crate.generate();
        registered.push(crates::insert(&mut *tx, order.id, pouch_count, &qr, now).await?);
    }

    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        customer_id = customer.id,
        total_pouches,
        crates = registered.len(),
        "Order registered"
    );
    events.publish(ServerEvent::OrderCreated { order_id: order.id });

    Ok(IntakeResult {
        customer,
        order,
        crates: registered,
    })
}

//! Order label printing
//!
//! Wraps the network label printer with the juicery label layout: customer
//! name, intake date and pouch count filled into the stored job.

use juicery_printer::{LabelJob, LabelPrinter, NetworkLabelPrinter, PrintError, PrintOutcome};
use serde::Serialize;
use shared::models::{Customer, Order};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::core::Config;
use crate::db::repository::{customer, order};
use crate::utils::{AppError, ErrorCode, ServiceResult};

/// Result of a label print request
#[derive(Debug, Clone, Serialize)]
pub struct LabelPrintResult {
    pub order_id: i64,
    pub outcome: PrintOutcome,
    /// Printer stayed silent; the label is assumed printed
    pub assumed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrinterStatus {
    pub configured: bool,
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PrintService {
    printer: Option<NetworkLabelPrinter>,
    job: String,
}

impl PrintService {
    pub fn new(printer: Option<NetworkLabelPrinter>, job: impl Into<String>) -> Self {
        Self {
            printer,
            job: job.into(),
        }
    }

    /// Printer from `PRINTER_HOST`/`PRINTER_PORT`; no printer when the host is unset
    pub fn from_config(config: &Config) -> Self {
        let printer = config.printer_host.as_ref().map(|host| {
            NetworkLabelPrinter::new(host.clone(), config.printer_port)
                .with_connect_timeout(config.printer_connect_timeout())
                .with_ack_timeout(config.printer_ack_timeout())
        });
        Self::new(printer, config.printer_job.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.printer.is_some()
    }

    /// Label job for an order
    pub fn label_for(&self, customer: &Customer, order: &Order) -> LabelJob {
        let date = shared::util::millis_to_date(order.created_at)
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_default();
        LabelJob::new(self.job.clone())
            .field("CUSTOMER", customer.name.clone())
            .field("DATE", date)
            .field("POUCHES", order.total_pouches.to_string())
    }

    /// Print the label of one order
    #[instrument(skip(self, pool))]
    pub async fn print_order_label(&self, pool: &SqlitePool, order_id: i64) -> ServiceResult<LabelPrintResult> {
        let order = order::find_by_id(pool, order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))?;
        let customer = customer::get(pool, order.customer_id).await?;

        let Some(printer) = &self.printer else {
            return Err(AppError::with_message(ErrorCode::PrinterNotAvailable, "No label printer configured").into());
        };

        let job = self.label_for(&customer, &order);
        let outcome = printer.print_label(&job).await.map_err(|e| {
            tracing::error!(order_id, printer = %printer.addr(), error = %e, "Label print failed");
            print_error(e)
        })?;

        if outcome.is_assumed() {
            tracing::warn!(order_id, "Printer did not acknowledge, label assumed printed");
        } else {
            tracing::info!(order_id, "Label printed");
        }

        Ok(LabelPrintResult {
            order_id,
            outcome,
            assumed: outcome.is_assumed(),
        })
    }

    pub async fn status(&self) -> PrinterStatus {
        match &self.printer {
            Some(printer) => PrinterStatus {
                configured: true,
                online: printer.is_online().await,
                address: Some(printer.addr()),
            },
            None => PrinterStatus {
                configured: false,
                online: false,
                address: None,
            },
        }
    }
}

fn print_error(e: PrintError) -> AppError {
    let code = match &e {
        e if e.is_unreachable() => ErrorCode::PrinterNotAvailable,
        PrintError::InvalidConfig(_) => ErrorCode::ConfigError,
        _ => ErrorCode::PrintFailed,
    };
    AppError::with_message(code, e.to_string())
}

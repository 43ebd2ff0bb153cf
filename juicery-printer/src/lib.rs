//! # juicery-printer
//!
//! Label printer adapter for Videojet-family inkjet printers driven over raw TCP.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - building the line protocol (`SEL`, `SET`, `PRN`, each terminated by `\r`)
//! - the request/response exchange with bounded waits
//! - reachability probing
//!
//! WHAT goes on a label (customer name, intake date) is decided by the server.
//!
//! ## Example
//!
//! ```ignore
//! use juicery_printer::{LabelJob, LabelPrinter, NetworkLabelPrinter};
//!
//! let job = LabelJob::new("1")
//!     .field("CUSTOMER", "Anna Virtanen")
//!     .field("DATE", "14.09.2024");
//!
//! let printer = NetworkLabelPrinter::new("192.168.1.50", 3100);
//! let outcome = printer.print_label(&job).await?;
//! ```

mod command;
mod error;
mod printer;

// Re-exports
pub use command::{LabelCommand, LabelJob};
pub use error::{PrintError, PrintResult};
pub use printer::{LabelPrinter, NetworkLabelPrinter, PrintOutcome};

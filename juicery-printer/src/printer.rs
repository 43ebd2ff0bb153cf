//! Network label printer
//!
//! After each command the printer may answer with a line of its own. `ACK...`
//! confirms the command, any other text rejects it. Many units never answer,
//! so silence within the ack window (or a closed connection) is accepted and
//! the job is reported as assumed rather than confirmed.

use crate::command::LabelJob;
use crate::error::{PrintError, PrintResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tracing::{debug, info, instrument, warn};

/// How a completed job was acknowledged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintOutcome {
    /// Every command was acknowledged
    Confirmed,
    /// At least one command got no reply; delivery assumed
    Assumed,
}

impl PrintOutcome {
    pub fn is_assumed(&self) -> bool {
        matches!(self, PrintOutcome::Assumed)
    }
}

/// Trait for label printer adapters
#[allow(async_fn_in_trait)]
pub trait LabelPrinter {
    /// Run a complete label job
    async fn print_label(&self, job: &LabelJob) -> PrintResult<PrintOutcome>;

    /// Check if the printer is reachable
    async fn is_online(&self) -> bool;
}

/// Reply to a single command
enum Reply {
    Ack,
    Silent,
    Closed,
    Other(String),
}

/// Read side of a job connection
///
/// A reply can straddle two ack windows, so the partial line is kept here
/// rather than per read.
struct ReplyReader {
    inner: BufReader<OwnedReadHalf>,
    line: Vec<u8>,
}

impl ReplyReader {
    fn new(read_half: OwnedReadHalf) -> Self {
        Self {
            inner: BufReader::new(read_half),
            line: Vec::new(),
        }
    }
}

/// Label printer reachable over raw TCP
#[derive(Debug, Clone)]
pub struct NetworkLabelPrinter {
    host: String,
    port: u16,
    connect_timeout: Duration,
    ack_timeout: Duration,
}

impl NetworkLabelPrinter {
    /// Create a new network printer with a 3s connect timeout and 1s ack window
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: Duration::from_secs(3),
            ack_timeout: Duration::from_secs(1),
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set how long to wait for a reply after each command
    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    /// `host:port` of the printer
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    async fn connect(&self) -> PrintResult<TcpStream> {
        if self.host.trim().is_empty() {
            return Err(PrintError::InvalidConfig("Printer host is empty".into()));
        }
        tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr())))?
        .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr(), e)))
    }

    async fn read_reply(&self, reader: &mut ReplyReader) -> PrintResult<Reply> {
        let ReplyReader { inner, line } = reader;
        // Bytes read before the window closes stay in `line` for the next call
        match tokio::time::timeout(self.ack_timeout, inner.read_until(b'\r', line)).await {
            Err(_) => Ok(Reply::Silent),
            Ok(Ok(0)) => Ok(Reply::Closed),
            Ok(Ok(_)) => {
                let text = String::from_utf8_lossy(line).trim().to_string();
                line.clear();
                if text.is_empty() {
                    Ok(Reply::Silent)
                } else if text.starts_with("ACK") {
                    Ok(Reply::Ack)
                } else {
                    Ok(Reply::Other(text))
                }
            }
            Ok(Err(e)) => Err(PrintError::Io(e)),
        }
    }
}

impl LabelPrinter for NetworkLabelPrinter {
    #[instrument(skip(self, job), fields(addr = %self.addr()))]
    async fn print_label(&self, job: &LabelJob) -> PrintResult<PrintOutcome> {
        info!("Connecting to printer");
        let stream = self.connect().await?;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = ReplyReader::new(read_half);

        let mut outcome = PrintOutcome::Confirmed;
        let mut peer_closed = false;

        for cmd in job.commands() {
            let written = async {
                write_half.write_all(&cmd.encode()).await?;
                write_half.flush().await
            }
            .await;

            if peer_closed {
                // Nothing left to confirm once the printer hung up
                if written.is_err() {
                    break;
                }
                continue;
            }
            written?;
            match self.read_reply(&mut reader).await? {
                Reply::Ack => debug!(command = %cmd, "Command acknowledged"),
                Reply::Silent => {
                    debug!(command = %cmd, "No reply, assuming accepted");
                    outcome = PrintOutcome::Assumed;
                }
                Reply::Closed => {
                    debug!(command = %cmd, "Printer closed the connection");
                    outcome = PrintOutcome::Assumed;
                    peer_closed = true;
                }
                Reply::Other(reply) => {
                    warn!(command = %cmd, reply = %reply, "Printer rejected command");
                    return Err(PrintError::Rejected {
                        command: cmd.to_string(),
                        reply,
                    });
                }
            }
        }

        let _ = write_half.shutdown().await;
        info!(?outcome, "Label job sent");
        Ok(outcome)
    }

    #[instrument(skip(self), fields(addr = %self.addr()))]
    async fn is_online(&self) -> bool {
        match self.connect().await {
            Ok(_) => {
                info!("Printer online");
                true
            }
            Err(e) => {
                warn!(error = %e, "Printer offline");
                false
            }
        }
    }
}


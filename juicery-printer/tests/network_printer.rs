//! Exchange tests against a fake printer on localhost

use std::time::Duration;

use juicery_printer::{LabelJob, LabelPrinter, NetworkLabelPrinter, PrintError, PrintOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[derive(Clone, Copy)]
enum Mode {
    /// Reply `ACK` to every line
    Ack,
    /// Read everything, never reply
    Silent,
    /// Reply `ACK` until the print command, then an error code
    RejectPrint,
    /// Split the first `ACK` across the client's ack window, then `ACK`
    SlowFirstAck,
}

/// Spawn a one-connection fake printer; received lines arrive on the channel
async fn fake_printer(mode: Mode) -> (u16, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut first = true;
        loop {
            let mut buf = Vec::new();
            match reader.read_until(b'\r', &mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = String::from_utf8_lossy(&buf).trim().to_string();
            let is_print = line.starts_with("PRN");
            let _ = tx.send(line);
            if matches!(mode, Mode::SlowFirstAck) && std::mem::take(&mut first) {
                let _ = write_half.write_all(b"AC").await;
                tokio::time::sleep(Duration::from_millis(150)).await;
                if write_half.write_all(b"K\r").await.is_err() {
                    break;
                }
                continue;
            }
            let reply: Option<&[u8]> = match mode {
                Mode::Ack => Some(b"ACK\r"),
                Mode::Silent => None,
                Mode::RejectPrint if is_print => Some(b"ERR 07 ribbon\r"),
                Mode::RejectPrint | Mode::SlowFirstAck => Some(b"ACK\r"),
            };
            if let Some(reply) = reply {
                if write_half.write_all(reply).await.is_err() {
                    break;
                }
            }
        }
    });

    (port, rx)
}

fn printer(port: u16) -> NetworkLabelPrinter {
    NetworkLabelPrinter::new("127.0.0.1", port)
        .with_connect_timeout(Duration::from_millis(500))
        .with_ack_timeout(Duration::from_millis(100))
}

fn job() -> LabelJob {
    LabelJob::new("1")
        .field("CUSTOMER", "Anna Virtanen")
        .field("DATE", "14.09.2024")
}

#[tokio::test]
async fn acknowledged_job_is_confirmed() {
    let (port, mut rx) = fake_printer(Mode::Ack).await;

    let outcome = printer(port).print_label(&job()).await.unwrap();
    assert_eq!(outcome, PrintOutcome::Confirmed);

    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
        if lines.len() == 4 {
            break;
        }
    }
    assert_eq!(
        lines,
        vec![
            "SEL 1",
            "SET CUSTOMER Anna Virtanen",
            "SET DATE 14.09.2024",
            "PRN 1"
        ]
    );
}

#[tokio::test]
async fn silent_printer_is_assumed_ok() {
    let (port, _rx) = fake_printer(Mode::Silent).await;

    let outcome = printer(port).print_label(&job()).await.unwrap();
    assert_eq!(outcome, PrintOutcome::Assumed);
    assert!(outcome.is_assumed());
}

#[tokio::test]
async fn non_ack_reply_is_rejection() {
    let (port, _rx) = fake_printer(Mode::RejectPrint).await;

    let err = printer(port).print_label(&job()).await.unwrap_err();
    match err {
        PrintError::Rejected { command, reply } => {
            assert_eq!(command, "PRN 1");
            assert_eq!(reply, "ERR 07 ribbon");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn reply_split_across_ack_window_is_not_a_rejection() {
    let (port, _rx) = fake_printer(Mode::SlowFirstAck).await;

    // First command times out mid-reply; the rest of "ACK" completes later
    let outcome = printer(port).print_label(&job()).await.unwrap();
    assert_eq!(outcome, PrintOutcome::Assumed);
}

#[tokio::test]
async fn unreachable_printer_fails_to_connect() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let p = printer(port);
    let err = p.print_label(&job()).await.unwrap_err();
    assert!(err.is_unreachable(), "unexpected error: {err:?}");
    assert!(!p.is_online().await);
}

#[tokio::test]
async fn is_online_when_listening() {
    let (port, _rx) = fake_printer(Mode::Ack).await;
    assert!(printer(port).is_online().await);
}

#[tokio::test]
async fn empty_host_is_config_error() {
    let err = NetworkLabelPrinter::new("  ", 3100)
        .print_label(&job())
        .await
        .unwrap_err();
    assert!(matches!(err, PrintError::InvalidConfig(_)));
}

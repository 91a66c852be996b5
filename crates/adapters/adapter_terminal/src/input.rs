//! Line input shared between the command loop and confirmation prompts.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tracing::warn;

/// Receiver of input lines, shared by every reader.
///
/// Whoever holds the lock owns the next line, so a prompt issued while a
/// command runs gets the answer rather than the command loop.
pub type SharedLines = Arc<Mutex<mpsc::Receiver<String>>>;

/// Wrap a receiver for sharing.
#[must_use]
pub fn shared_lines(receiver: mpsc::Receiver<String>) -> SharedLines {
    Arc::new(Mutex::new(receiver))
}

/// Spawn a task forwarding standard input line by line.
///
/// The channel closes at end of input or on a read error.
#[must_use]
pub fn stdin_lines() -> SharedLines {
    let (sender, receiver) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if sender.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "failed to read standard input");
                    break;
                }
            }
        }
    });
    shared_lines(receiver)
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pluggable event persistence.
//!
//! The original implementation's event persistence hook was a no-op stub
//! (see REDESIGN FLAGS); this implementation wires a real one. Recording
//! runs off the hot path: `EventSink::record` only enqueues onto a bounded
//! channel, and a dedicated task drains it, so a slow or stalled sink
//! backend never blocks dispatch or broadcast.

use bridge_core::Event;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Receives every event the Bridge processes, for audit or replay.
pub trait EventSink: Send + Sync {
    fn record(&self, event: Event);
}

/// Discards everything. Used when no persistence path is configured.
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: Event) {}
}

/// Appends one JSON object per line to a file, via a background drain task.
pub struct FileSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl FileSink {
    /// Spawn the drain task and return a sink handle. `path`'s parent
    /// directory is created if missing.
    pub async fn spawn(path: PathBuf) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::OpenOptions::new().create(true).append(true).open(&path).await?;

        let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
        tokio::spawn(async move {
            let mut file = file;
            while let Some(event) = rx.recv().await {
                match serde_json::to_vec(&event) {
                    Ok(mut line) => {
                        line.push(b'\n');
                        if let Err(err) = file.write_all(&line).await {
                            error!(%err, "event sink write failed");
                        }
                    }
                    Err(err) => warn!(%err, "event sink serialization failed"),
                }
            }
        });
        Ok(Self { tx })
    }
}

impl EventSink for FileSink {
    fn record(&self, event: Event) {
        if self.tx.send(event).is_err() {
            warn!("event sink drain task is gone, dropping event");
        }
    }
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;

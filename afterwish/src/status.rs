//! Observable operation status
//!
//! Every component that talks to the identity provider or the record store
//! owns one tracker. The state is published on a `watch` channel so a view
//! can subscribe to it.

use std::fmt::Display;

use tokio::sync::watch;

/// In-flight flag and last error of the owning component
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStatus {
    pub in_flight: bool,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct StatusTracker {
    tx: watch::Sender<OperationStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(OperationStatus::default());
        Self { tx }
    }

    /// Mark an attempt as started; clears the previous error.
    pub fn begin(&self) {
        self.tx.send_replace(OperationStatus {
            in_flight: true,
            last_error: None,
        });
    }

    /// Mark the current attempt as finished with the given outcome.
    pub fn finish<T, E: Display>(&self, result: &std::result::Result<T, E>) {
        let last_error = result.as_ref().err().map(|e| e.to_string());
        self.tx.send_replace(OperationStatus {
            in_flight: false,
            last_error,
        });
    }

    /// Record a failure that happened before any call was made.
    pub fn fail(&self, message: impl Into<String>) {
        self.tx.send_replace(OperationStatus {
            in_flight: false,
            last_error: Some(message.into()),
        });
    }

    pub fn current(&self) -> OperationStatus {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationStatus> {
        self.tx.subscribe()
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

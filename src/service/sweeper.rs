//! Expiry sweeper
//!
//! Background task that periodically removes expired ACL entries. The
//! sweep goes through the same versioned write path as grants and
//! revokes, so it can never race a concurrent renewal into a lost update.

use crate::store::BoxedAclStore;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle to a running sweep task
pub struct ExpirySweeper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ExpirySweeper {
    /// Spawn the sweep loop
    pub fn spawn(store: BoxedAclStore, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let child = cancel.child_token();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a freshly
            // started service does not sweep before it has served anything.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = child.cancelled() => {
                        debug!("Expiry sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        match store.sweep_expired(Utc::now()).await {
                            Ok(removed) if removed > 0 => {
                                debug!(removed, "Expiry sweep completed");
                            }
                            Ok(_) => {}
                            Err(e) => {
                                // Expired entries are already invisible to
                                // evaluation; a failed sweep only delays
                                // physical removal.
                                warn!(error = %e, "Expiry sweep failed");
                            }
                        }
                    }
                }
            }
        });

        Self { cancel, handle }
    }

    /// Stop the loop and wait for it to finish
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

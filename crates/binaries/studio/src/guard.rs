use std::sync::{Mutex, PoisonError};
use studio_client::upload::NavigationGuard;
use tokio::task::JoinHandle;
use tracing::warn;

/// Exit code of a process ended by SIGINT.
const INTERRUPTED: i32 = 130;

/// Asks for a second Ctrl-C before abandoning an upload in progress.
#[derive(Default)]
pub struct CtrlCGuard {
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl CtrlCGuard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NavigationGuard for CtrlCGuard {
    fn arm(&self) {
        let listener = tokio::spawn(async {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            warn!("Upload in progress, leaving now loses unfinished images. Press Ctrl-C again to abort.");
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(INTERRUPTED);
            }
        });
        let previous = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(listener);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn disarm(&self) {
        if let Some(listener) = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            listener.abort();
        }
    }
}

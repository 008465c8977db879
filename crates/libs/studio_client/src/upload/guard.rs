use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Hook that asks the user to confirm before leaving while uploads run.
pub trait NavigationGuard: Send + Sync {
    fn arm(&self);
    fn disarm(&self);
}

/// Arms a guard for as long as it lives.
pub struct UploadSession {
    guard: Arc<dyn NavigationGuard>,
}

impl UploadSession {
    #[must_use]
    pub fn begin(guard: Arc<dyn NavigationGuard>) -> Self {
        guard.arm();
        Self { guard }
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        self.guard.disarm();
    }
}

/// Guard backed by an atomic flag, for front ends that poll it.
#[derive(Debug, Default)]
pub struct FlagGuard {
    armed: AtomicBool,
    sessions: AtomicUsize,
}

impl FlagGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// How many times the guard has been armed.
    #[must_use]
    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }
}

impl NavigationGuard for FlagGuard {
    fn arm(&self) {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_arms_until_dropped() {
        let guard = Arc::new(FlagGuard::new());
        {
            let _session = UploadSession::begin(guard.clone());
            assert!(guard.is_armed());
        }
        assert!(!guard.is_armed());
        assert_eq!(guard.sessions(), 1);
    }
}

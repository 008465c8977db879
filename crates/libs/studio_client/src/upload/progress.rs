use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Upload percentage (0..=100) per filename.
pub type ProgressSnapshot = BTreeMap<String, u8>;

/// Per-file progress of the current batch. Clones share state; front ends
/// follow it through [`ProgressTracker::subscribe`].
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    tx: Arc<watch::Sender<ProgressSnapshot>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(ProgressSnapshot::new());
        Self { tx: Arc::new(tx) }
    }
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.tx.subscribe()
    }

    /// Starts tracking a batch, every file at 0%.
    pub fn start<S: AsRef<str>>(&self, names: &[S]) {
        self.tx.send_replace(
            names
                .iter()
                .map(|name| (name.as_ref().to_owned(), 0))
                .collect(),
        );
    }

    /// Records `sent` of `total` bytes. A file's percentage never goes down.
    pub fn update(&self, name: &str, sent: u64, total: u64) {
        let percent = percent(sent, total);
        self.tx.send_if_modified(|snapshot| {
            let entry = snapshot.entry(name.to_owned()).or_insert(0);
            if percent > *entry {
                *entry = percent;
                true
            } else {
                false
            }
        });
    }

    pub fn complete(&self, name: &str) {
        self.update(name, 1, 1);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<u8> {
        self.tx.borrow().get(name).copied()
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.tx.borrow().clone()
    }

    pub fn clear(&self) {
        self.tx.send_replace(ProgressSnapshot::new());
    }
}

fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = sent.min(total).saturating_mul(100) / total;
    u8::try_from(percent).unwrap_or(100)
}

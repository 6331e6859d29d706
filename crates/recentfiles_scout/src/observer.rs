//! Consumer boundary of a scan session.
//!
//! Every callback runs synchronously on the session's worker thread. A
//! consumer that must react on a specific thread (a UI loop, a CLI main
//! thread) should forward the signal, e.g. through the
//! `mpsc::Sender<ScanEvent>` implementation below.

use crate::error::ScoutError;
use crate::types::{FileRecord, ScanSummary};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Receiver of lifecycle signals for one session.
///
/// Per session: `on_started` first, then zero or more `on_batch` in
/// production order, then exactly one of `on_completed`, `on_aborted` or
/// `on_error`. Nothing is delivered after the terminal signal.
pub trait ScanObserver: Send + 'static {
    /// A new session began; consumers clear previously accumulated results here.
    fn on_started(&mut self, _root: &Path) {}

    fn on_batch(&mut self, batch: Vec<FileRecord>);

    fn on_completed(&mut self, _summary: &ScanSummary) {}

    /// The session was stopped. Matches buffered since the last batch are dropped.
    fn on_aborted(&mut self);

    /// The session failed and has terminated.
    fn on_error(&mut self, error: ScoutError);
}

/// Lifecycle signal as a value, for channel-based consumers.
#[derive(Debug)]
pub enum ScanEvent {
    Started { root: PathBuf },
    Batch(Vec<FileRecord>),
    Completed(ScanSummary),
    Aborted,
    Failed(ScoutError),
}

impl ScanEvent {
    /// Whether no further events follow this one for the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanEvent::Completed(_) | ScanEvent::Aborted | ScanEvent::Failed(_)
        )
    }
}

// A disconnected receiver means the consumer is gone; events are dropped.
impl ScanObserver for mpsc::Sender<ScanEvent> {
    fn on_started(&mut self, root: &Path) {
        let _ = self.send(ScanEvent::Started {
            root: root.to_path_buf(),
        });
    }

    fn on_batch(&mut self, batch: Vec<FileRecord>) {
        let _ = self.send(ScanEvent::Batch(batch));
    }

    fn on_completed(&mut self, summary: &ScanSummary) {
        let _ = self.send(ScanEvent::Completed(summary.clone()));
    }

    fn on_aborted(&mut self) {
        let _ = self.send(ScanEvent::Aborted);
    }

    fn on_error(&mut self, error: ScoutError) {
        let _ = self.send(ScanEvent::Failed(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn sender_forwards_events_in_order() {
        let (mut tx, rx) = mpsc::channel::<ScanEvent>();
        tx.on_started(Path::new("/root"));
        tx.on_batch(vec![FileRecord::new(
            PathBuf::from("/root/a.txt"),
            SystemTime::now(),
            1,
        )]);
        tx.on_completed(&ScanSummary::default());
        drop(tx);

        let events: Vec<ScanEvent> = rx.into_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], ScanEvent::Started { root } if root == Path::new("/root")));
        assert!(matches!(&events[1], ScanEvent::Batch(batch) if batch.len() == 1));
        assert!(events[2].is_terminal());
    }

    #[test]
    fn sender_ignores_disconnected_receiver() {
        let (mut tx, rx) = mpsc::channel::<ScanEvent>();
        drop(rx);
        tx.on_aborted();
        tx.on_error(ScoutError::WorkerPanicked);
    }

    #[test]
    fn terminal_events() {
        assert!(ScanEvent::Aborted.is_terminal());
        assert!(ScanEvent::Completed(ScanSummary::default()).is_terminal());
        assert!(!ScanEvent::Batch(Vec::new()).is_terminal());
        assert!(!ScanEvent::Started {
            root: PathBuf::from("/")
        }
        .is_terminal());
    }
}

//! Converge Event Port
//!
//! Provides an observable interface for convergence runs.
//! Enables progress reporting, JSON event streams, and debugging.

use std::path::PathBuf;

/// What happened to the distribution during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionChange {
    Created,
    Updated,
    Unchanged,
}

impl DistributionChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionChange::Created => "created",
            DistributionChange::Updated => "updated",
            DistributionChange::Unchanged => "unchanged",
        }
    }
}

/// Event emitted during a convergence run
#[derive(Debug, Clone)]
pub enum ConvergeEvent {
    /// Run started
    Started {
        source: PathBuf,
        bucket: String,
        asset_count: usize,
    },

    /// Remote state was read and diffed
    Planned {
        uploads: usize,
        deletions: usize,
        unchanged: usize,
    },

    /// Object uploaded
    ObjectUploaded { key: String, bytes: usize },

    /// Object already current
    ObjectSkipped { key: String },

    /// Object removed because its asset is gone
    ObjectDeleted { key: String },

    /// Public access block applied (only emitted when it changed)
    BucketSecured { bucket: String },

    /// Distribution converged
    DistributionReady {
        id: String,
        domain: String,
        change: DistributionChange,
    },

    /// Bucket policy checked against the distribution
    PolicyBound { changed: bool },

    /// Invalidation accepted by the provider
    InvalidationSubmitted { id: String, paths: Vec<String> },

    /// Invalidation rejected; paths stay pending for the next run
    InvalidationFailed { paths: Vec<String>, error: String },

    /// Invalidation reported complete (only with waiting enabled)
    InvalidationCompleted { id: String },

    /// Run completed
    Completed {
        uploaded: usize,
        deleted: usize,
        mutations: usize,
    },
}

/// Trait for receiving converge events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait ConvergeEventSink: Send + Sync {
    fn on_event(&self, event: ConvergeEvent);

    /// Check if this sink wants per-object events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ConvergeEventSink for NoopEventSink {
    fn on_event(&self, _event: ConvergeEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingEventSink {
        events: Arc<Mutex<Vec<ConvergeEvent>>>,
    }

    impl ConvergeEventSink for RecordingEventSink {
        fn on_event(&self, event: ConvergeEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            events: events.clone(),
        };

        sink.on_event(ConvergeEvent::Started {
            source: PathBuf::from("site"),
            bucket: "my-site".to_string(),
            asset_count: 2,
        });
        sink.on_event(ConvergeEvent::ObjectUploaded {
            key: "index.html".to_string(),
            bytes: 12,
        });

        assert_eq!(events.lock().unwrap().len(), 2);
        assert!(sink.wants_detailed_events());
    }

    #[test]
    fn noop_sink_wants_no_details() {
        assert!(!NoopEventSink.wants_detailed_events());
    }

    #[test]
    fn distribution_change_labels() {
        assert_eq!(DistributionChange::Created.as_str(), "created");
        assert_eq!(DistributionChange::Unchanged.as_str(), "unchanged");
    }
}
